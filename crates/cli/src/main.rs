use std::sync::Arc;

use anyhow::Result;
use autoplay_core::{Order, OrderKind};
use clap::{Parser, Subcommand};
use events::{EventBus, GameEvent};
use jobs::{job_for, JobContext, ManagementConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "autoplay")]
#[command(about = "Self-play and match game generation for GTP engines", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Extra engine options for this device slot (e.g. "--gpu 1")
    #[arg(long, default_value = "", global = true)]
    device: String,

    /// Minimum engine version accepted by the handshake
    #[arg(long, default_value = "0.17", global = true)]
    min_version: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one self-play game and produce a record plus training features
    Selfplay {
        /// Network id resolved against the configured networks directory
        #[arg(long)]
        network: String,

        /// Extra engine options
        #[arg(long, default_value = "")]
        options: String,

        /// Comma-separated setup commands sent after the handshake
        #[arg(long)]
        commands: Option<String>,

        /// Ask the engine for a diagnostic dump after the game
        #[arg(long)]
        debug: bool,

        /// Scratch basename of a stored game to resume
        #[arg(long)]
        resume: Option<String>,

        /// Move count the stored game was paused at
        #[arg(long, default_value_t = 0)]
        moves: u32,
    },
    /// Play one match game between two networks
    Match {
        #[arg(long)]
        first: String,

        #[arg(long)]
        second: String,

        #[arg(long, default_value = "")]
        options: String,

        #[arg(long, default_value = "")]
        options_second: String,
    },
    /// Convert the configured supervised record into training features
    Dump {
        #[arg(long)]
        network: String,
    },
    /// Occupy the slot without playing
    Wait {
        #[arg(long, default_value_t = 1)]
        minutes: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let cwd = std::env::current_dir()?;
    let config = Arc::new(ManagementConfig::read(&cwd).await);

    let (kind, order) = build_order(&cli);

    let bus = EventBus::new();
    let mut rx = bus.subscribe();
    let printer = tokio::spawn(async move {
        while let Ok(envelope) = rx.recv().await {
            match envelope.event {
                GameEvent::MovePlayed {
                    move_num,
                    side,
                    text,
                    ..
                } => println!("{move_num:>3} {side} {text}"),
                GameEvent::GameEnded { winner, moves, .. } => println!(
                    "game over after {moves} moves, winner: {}",
                    winner.unwrap_or_else(|| "unknown".to_string())
                ),
                _ => {}
            }
        }
    });

    let mut job = job_for(kind, JobContext::new(cli.device.clone(), config, Some(bus)));
    job.init(&order)?;

    // A single interrupt pauses the running game so it can be resumed.
    let handle = job.handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, storing the current game for resume");
            handle.store();
        }
    });

    let outcome = job.execute().await;
    printer.abort();

    println!();
    println!("outcome: {}", outcome.kind().as_str());
    for (key, value) in outcome.properties() {
        println!("  {key}: {value}");
    }

    if outcome.is_error() {
        std::process::exit(1);
    }
    Ok(())
}

fn build_order(cli: &Cli) -> (OrderKind, Order) {
    match &cli.command {
        Commands::Selfplay {
            network,
            options,
            commands,
            debug,
            resume,
            moves,
        } => {
            let kind = if resume.is_some() {
                OrderKind::RestoreSelfPlay
            } else {
                OrderKind::SelfPlay
            };
            let mut order = Order::new(kind)
                .with("minVersion", cli.min_version.as_str())
                .with("network", network.as_str())
                .with("options", options.as_str())
                .with("moves", moves.to_string());
            if *debug {
                order.insert("debug", "true");
            }
            if let Some(commands) = commands {
                order.insert("gtpCommands", commands.as_str());
            }
            if let Some(resume) = resume {
                order.insert("sgf", resume.as_str());
            }
            (kind, order)
        }
        Commands::Match {
            first,
            second,
            options,
            options_second,
        } => {
            let order = Order::new(OrderKind::Validation)
                .with("minVersion", cli.min_version.as_str())
                .with("firstNet", first.as_str())
                .with("secondNet", second.as_str())
                .with("options", options.as_str())
                .with("optionsSecond", options_second.as_str());
            (OrderKind::Validation, order)
        }
        Commands::Dump { network } => {
            let order = Order::new(OrderKind::DumpSupervised)
                .with("minVersion", cli.min_version.as_str())
                .with("network", network.as_str());
            (OrderKind::DumpSupervised, order)
        }
        Commands::Wait { minutes } => {
            let order = Order::new(OrderKind::Wait)
                .with("minVersion", cli.min_version.as_str())
                .with("minutes", minutes.to_string());
            (OrderKind::Wait, order)
        }
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "autoplay=info,jobs=info,gtp=info".into()),
        )
        .init();
}
