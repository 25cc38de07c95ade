//! Self-play: a single engine plays both sides of one game.

use async_trait::async_trait;
use autoplay_core::{Engine, Order, OrderKind, Outcome, OutcomeKind};
use events::GameEvent;
use gtp::GameSession;
use tokio::fs;
use tracing::{error, info};

use crate::error::{JobError, Result};
use crate::job::{Job, JobContext};
use crate::state::{JobState, StateHandle};

pub struct SelfPlayJob {
    ctx: JobContext,
    engine: Option<Engine>,
    resume: Option<String>,
    resume_moves: u32,
    debug: bool,
    restore: bool,
}

impl SelfPlayJob {
    pub fn new(ctx: JobContext) -> Self {
        Self {
            ctx,
            engine: None,
            resume: None,
            resume_moves: 0,
            debug: false,
            restore: false,
        }
    }

    async fn run(&mut self) -> Result<Outcome> {
        let engine = self.engine.clone().ok_or(JobError::Uninitialized)?;
        let opts = self.ctx.start_options(self.resume.clone(), self.resume_moves);
        let mut game = GameSession::start(engine, opts).await?;

        // The resumed scratch files are stale once the position is loaded.
        if let Some(resume) = self.resume.clone() {
            let work_dir = self.ctx.config.work_dir.clone();
            let _ = fs::remove_file(work_dir.join(format!("{resume}.sgf"))).await;
            if self.restore {
                if let Err(err) = game.load_training_data(&resume).await {
                    game.quit().await;
                    return Err(err.into());
                }
                let _ = fs::remove_file(work_dir.join(format!("{resume}.train"))).await;
            }
        }

        self.ctx.publish(GameEvent::GameStarted {
            file: game.id().to_string(),
        });

        let result = self.drive(&mut game).await;
        game.quit().await;
        result
    }

    async fn drive(&mut self, game: &mut GameSession) -> Result<Outcome> {
        loop {
            game.request_move().await?;
            game.wait_for_move().await?;
            game.read_move().await?;
            self.ctx.publish(GameEvent::MovePlayed {
                file: game.id().to_string(),
                move_num: game.move_count(),
                side: game.to_move().to_string(),
                text: game.last_move().to_string(),
            });
            if !(game.next_move() && self.ctx.running()) {
                break;
            }
        }

        match self.ctx.state.snapshot() {
            JobState::Running => {
                info!(id = %game.id(), moves = game.move_count(), "game has ended");
                game.query_result().await?;
                game.write_record().await?;
                if let Some(engine) = &self.engine {
                    game.post_process_record(engine, false, true).await?;
                }
                game.dump_training_features().await?;
                if self.debug {
                    game.dump_debug_log().await?;
                }
                self.ctx.publish(GameEvent::GameEnded {
                    file: game.id().to_string(),
                    winner: game.winner_name().map(str::to_string),
                    moves: game.move_count(),
                });
                Ok(Outcome::new(OutcomeKind::GeneratedFile)
                    .with("file", game.id())
                    .with("winner", game.winner_name().unwrap_or_default())
                    .with("moves", game.move_count().to_string()))
            }
            JobState::Storing => {
                info!(id = %game.id(), moves = game.move_count(), "storing game for resume");
                game.write_record().await?;
                game.save_training_data().await?;
                Ok(Outcome::new(OutcomeKind::StoreForResume)
                    .with("sgf", game.id())
                    .with("moves", game.move_count().to_string()))
            }
            // The scheduler decides what happens after a finish request;
            // there is no outcome payload to report.
            JobState::Finishing => Ok(Outcome::new(OutcomeKind::Error)),
        }
    }
}

#[async_trait]
impl Job for SelfPlayJob {
    fn init(&mut self, order: &Order) -> Result<()> {
        self.ctx.base_init(order)?;
        let local_net = self.ctx.config.net_filepath.clone();
        self.engine = Some(self.ctx.build_engine(
            order,
            "network",
            &local_net,
            "options",
            "gtpCommands",
        )?);
        self.debug = order.flag("debug");
        self.resume = order
            .get("sgf")
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        self.resume_moves = order.count("moves")?;
        self.restore = order.kind() == OrderKind::RestoreSelfPlay;
        Ok(())
    }

    async fn execute(&mut self) -> Outcome {
        match self.run().await {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(error = %err, "self-play job failed");
                self.ctx.publish(GameEvent::Error {
                    message: err.to_string(),
                    context: Some("self_play".to_string()),
                });
                Outcome::error(err.to_string())
            }
        }
    }

    fn handle(&self) -> StateHandle {
        self.ctx.state.clone()
    }
}
