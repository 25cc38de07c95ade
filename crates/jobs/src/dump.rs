//! Supervised dump: convert a configured game record into training
//! features with a single engine command, no move loop.

use async_trait::async_trait;
use autoplay_core::{Engine, Order, Outcome, OutcomeKind};
use events::GameEvent;
use gtp::GameSession;
use tracing::{error, info};

use crate::error::{JobError, Result};
use crate::job::{Job, JobContext};
use crate::state::StateHandle;

pub struct DumpSupervisedJob {
    ctx: JobContext,
    engine: Option<Engine>,
}

impl DumpSupervisedJob {
    pub fn new(ctx: JobContext) -> Self {
        Self { ctx, engine: None }
    }

    async fn run(&mut self) -> Result<Outcome> {
        let engine = self.engine.clone().ok_or(JobError::Uninitialized)?;
        let mut game = GameSession::start(engine, self.ctx.start_options(None, 0)).await?;

        let src = self.ctx.config.dump_sgf_file.clone();
        let dst = self.ctx.config.dump_data_file.clone();
        info!(src = %src.display(), dst = %dst.display(), "converting supervised record");

        let result = game.dump_supervised(&src, &dst).await;
        game.quit().await;
        result?;

        Ok(Outcome::new(OutcomeKind::Done))
    }
}

#[async_trait]
impl Job for DumpSupervisedJob {
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
        Ok(())
    }

    async fn execute(&mut self) -> Outcome {
        match self.run().await {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(error = %err, "supervised dump job failed");
                self.ctx.publish(GameEvent::Error {
                    message: err.to_string(),
                    context: Some("dump_supervised".to_string()),
                });
                Outcome::error(err.to_string())
            }
        }
    }

    fn handle(&self) -> StateHandle {
        self.ctx.state.clone()
    }
}
