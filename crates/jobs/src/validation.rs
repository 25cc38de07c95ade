//! Validation: two engines play one match game against each other.
//!
//! The drivers are strictly alternated; the side to move generates a move
//! and the result is forwarded into the other engine so both keep a
//! consistent board.

use async_trait::async_trait;
use autoplay_core::{Color, Engine, Order, Outcome, OutcomeKind};
use events::GameEvent;
use gtp::GameSession;
use tokio::fs;
use tracing::{error, info};

use crate::error::{JobError, Result};
use crate::job::{Job, JobContext};
use crate::state::{JobState, StateHandle};

pub struct ValidationJob {
    ctx: JobContext,
    engines: Option<(Engine, Engine)>,
    resume: Option<String>,
    resume_moves: u32,
}

impl ValidationJob {
    pub fn new(ctx: JobContext) -> Self {
        Self {
            ctx,
            engines: None,
            resume: None,
            resume_moves: 0,
        }
    }

    async fn run(&mut self) -> Result<Outcome> {
        let (first_engine, second_engine) =
            self.engines.clone().ok_or(JobError::Uninitialized)?;
        let opts = self.ctx.start_options(self.resume.clone(), self.resume_moves);

        let mut first = GameSession::start(first_engine, opts.clone()).await?;
        let mut second = match GameSession::start(second_engine, opts).await {
            Ok(session) => session,
            Err(err) => {
                first.quit().await;
                return Err(err.into());
            }
        };

        if let Some(resume) = &self.resume {
            let stale = self.ctx.config.work_dir.join(format!("{resume}.sgf"));
            let _ = fs::remove_file(stale).await;
        }

        self.ctx.publish(GameEvent::GameStarted {
            file: first.id().to_string(),
        });

        let result = self.drive(&mut first, &mut second).await;
        first.quit().await;
        second.quit().await;
        result
    }

    async fn drive(
        &mut self,
        first: &mut GameSession,
        second: &mut GameSession,
    ) -> Result<Outcome> {
        let start_color = first.to_move();
        {
            // Arranged the opposite way around on purpose: the loop swaps
            // at the top of each iteration, so its first action already
            // picks the side to move without a special first iteration.
            let mut mover = (&mut *second, start_color.opponent());
            let mut opponent = (&mut *first, start_color);

            loop {
                std::mem::swap(&mut mover, &mut opponent);
                let color: Color = mover.1;

                mover.0.request_move().await?;
                mover.0.wait_for_move().await?;
                mover.0.read_move().await?;
                self.ctx.publish(GameEvent::MovePlayed {
                    file: mover.0.id().to_string(),
                    move_num: mover.0.move_count(),
                    side: color.to_string(),
                    text: mover.0.last_move().to_string(),
                });

                let text = mover.0.last_move().to_string();
                opponent.0.forward_move(color, &text).await?;

                if !(mover.0.next_move() && self.ctx.running()) {
                    break;
                }
            }
        }

        match self.ctx.state.snapshot() {
            JobState::Running => {
                info!(id = %first.id(), moves = first.move_count(), "match has ended");
                first.query_result().await?;
                let score = first.result_text().trim().to_string();
                first.write_record().await?;
                if let Some((_, second_engine)) = &self.engines {
                    first
                        .post_process_record(second_engine, score == "B+Resign", false)
                        .await?;
                }
                self.ctx.publish(GameEvent::GameEnded {
                    file: first.id().to_string(),
                    winner: first.winner_name().map(str::to_string),
                    moves: first.move_count(),
                });
                Ok(Outcome::new(OutcomeKind::Win)
                    .with("score", score.as_str())
                    .with("winner", first.winner_name().unwrap_or_default())
                    .with("file", first.id())
                    .with("moves", first.move_count().to_string()))
            }
            JobState::Storing => {
                info!(id = %first.id(), moves = first.move_count(), "storing match for resume");
                first.write_record().await?;
                Ok(Outcome::new(OutcomeKind::StoreForResume)
                    .with("sgf", first.id())
                    .with("moves", first.move_count().to_string()))
            }
            JobState::Finishing => Ok(Outcome::new(OutcomeKind::Error)),
        }
    }
}

#[async_trait]
impl Job for ValidationJob {
    fn init(&mut self, order: &Order) -> Result<()> {
        self.ctx.base_init(order)?;
        let local_net = self.ctx.config.net_filepath.clone();
        let component_net = self.ctx.config.component_net_filepath.clone();
        let first = self
            .ctx
            .build_engine(order, "firstNet", &local_net, "options", "gtpCommands")?;
        let second = self.ctx.build_engine(
            order,
            "secondNet",
            &component_net,
            "optionsSecond",
            "gtpCommandsSecond",
        )?;
        self.engines = Some((first, second));
        self.resume = order
            .get("sgf")
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        self.resume_moves = order.count("moves")?;
        Ok(())
    }

    async fn execute(&mut self) -> Outcome {
        match self.run().await {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(error = %err, "validation job failed");
                self.ctx.publish(GameEvent::Error {
                    message: err.to_string(),
                    context: Some("validation".to_string()),
                });
                Outcome::error(err.to_string())
            }
        }
    }

    fn handle(&self) -> StateHandle {
        self.ctx.state.clone()
    }
}
