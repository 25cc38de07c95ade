#![cfg(unix)]

mod common;

use autoplay_core::{Order, OrderKind, OutcomeKind};
use jobs::{Job, ValidationJob};
use tempfile::TempDir;

fn match_order() -> Order {
    Order::new(OrderKind::Validation)
        .with("minVersion", "0.17")
        .with("firstNet", "alpha")
        .with("secondNet", "beta")
}

#[tokio::test]
async fn resignation_on_first_move_scores_for_the_opponent() {
    let tmp = TempDir::new().unwrap();
    let engine = common::stub_engine(tmp.path(), "resign");
    let mut job = ValidationJob::new(common::test_context(tmp.path(), &engine));

    job.init(&match_order()).unwrap();
    let outcome = job.execute().await;

    assert_eq!(outcome.kind(), OutcomeKind::Win, "{outcome:?}");
    assert_eq!(outcome.get("winner"), Some("white"));
    assert_eq!(outcome.get("score"), Some("W+Resign"));
    assert_eq!(outcome.get("moves"), Some("1"));

    // The resignation was forwarded into the second engine.
    let log = common::read_log(tmp.path());
    assert!(log.contains("play black resign"));

    // The record was written and post-processed from the first driver.
    let file = outcome.get("file").unwrap();
    let sgf = std::fs::read_to_string(tmp.path().join(format!("{file}.sgf"))).unwrap();
    assert!(sgf.contains("PW[TestNet 0.17 beta]"), "{sgf}");
}

#[tokio::test]
async fn full_match_alternates_engines() {
    let tmp = TempDir::new().unwrap();
    let engine = common::stub_engine(tmp.path(), "pass");
    let mut job = ValidationJob::new(common::test_context(tmp.path(), &engine));

    job.init(&match_order()).unwrap();
    let outcome = job.execute().await;

    assert_eq!(outcome.kind(), OutcomeKind::Win, "{outcome:?}");
    assert_eq!(outcome.get("winner"), Some("black"));
    // Both generated passes were forwarded into the opposing engine.
    let log = common::read_log(tmp.path());
    assert!(log.contains("genmove b"));
    assert!(log.contains("genmove w"));
    assert!(log.contains("play black pass"));
    assert!(log.contains("play white pass"));
    assert_eq!(outcome.get("moves"), Some("2"));
}

#[tokio::test]
async fn store_request_keeps_the_match_record() {
    let tmp = TempDir::new().unwrap();
    let engine = common::stub_engine(tmp.path(), "pass");
    let mut job = ValidationJob::new(common::test_context(tmp.path(), &engine));
    job.init(&match_order()).unwrap();

    job.store();
    let outcome = job.execute().await;

    assert_eq!(outcome.kind(), OutcomeKind::StoreForResume, "{outcome:?}");
    let sgf = outcome.get("sgf").unwrap();
    assert!(tmp.path().join(format!("{sgf}.sgf")).exists());

    let log = common::read_log(tmp.path());
    assert!(!log.contains("final_score"));
}
