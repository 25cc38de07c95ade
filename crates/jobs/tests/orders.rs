#![cfg(unix)]

mod common;

use std::sync::Arc;
use std::time::Instant;

use autoplay_core::{Order, OrderKind, OutcomeKind};
use jobs::{job_for, Job, JobContext, ManagementConfig, WaitJob};
use tempfile::TempDir;

#[tokio::test]
async fn dump_supervised_converts_the_configured_record() {
    let tmp = TempDir::new().unwrap();
    let engine = common::stub_engine(tmp.path(), "pass");

    let config = ManagementConfig {
        dump_sgf_file: tmp.path().join("source.sgf"),
        dump_data_file: tmp.path().join("converted.txt"),
        ..common::test_config(tmp.path(), &engine)
    };
    let ctx = JobContext::new("", Arc::new(config), None);

    let mut job = job_for(OrderKind::DumpSupervised, ctx);
    let order = Order::new(OrderKind::DumpSupervised)
        .with("minVersion", "0.17")
        .with("network", "testnet");
    job.init(&order).unwrap();

    let outcome = job.execute().await;
    assert_eq!(outcome.kind(), OutcomeKind::Done, "{outcome:?}");
    assert!(tmp.path().join("converted.txt").exists());

    let log = common::read_log(tmp.path());
    assert!(log.contains("dump_supervised"));
    assert!(!log.contains("genmove"));
}

#[tokio::test]
async fn wait_job_reports_waited() {
    let tmp = TempDir::new().unwrap();
    let engine = common::stub_engine(tmp.path(), "pass");
    let mut job = WaitJob::new(common::test_context(tmp.path(), &engine));

    let order = Order::new(OrderKind::Wait)
        .with("minVersion", "0.17")
        .with("minutes", "0");
    job.init(&order).unwrap();

    let begin = Instant::now();
    let outcome = job.execute().await;
    assert_eq!(outcome.kind(), OutcomeKind::Waited);
    assert!(begin.elapsed().as_secs() < 5);
}

#[tokio::test]
async fn missing_required_key_is_a_config_error() {
    let tmp = TempDir::new().unwrap();
    let engine = common::stub_engine(tmp.path(), "pass");

    // No network id anywhere.
    let mut job = job_for(
        OrderKind::SelfPlay,
        common::test_context(tmp.path(), &engine),
    );
    let order = Order::new(OrderKind::SelfPlay).with("minVersion", "0.17");
    assert!(job.init(&order).is_err());

    // Malformed resume move count.
    let order = Order::new(OrderKind::SelfPlay)
        .with("minVersion", "0.17")
        .with("network", "testnet")
        .with("moves", "not-a-number");
    let mut job = job_for(
        OrderKind::SelfPlay,
        common::test_context(tmp.path(), &engine),
    );
    assert!(job.init(&order).is_err());
}
