//! Wait: a scheduler filler that sleeps for a configured duration.

use std::time::Duration;

use async_trait::async_trait;
use autoplay_core::{Order, Outcome, OutcomeKind};
use tracing::info;

use crate::error::Result;
use crate::job::{Job, JobContext};
use crate::state::StateHandle;

pub struct WaitJob {
    ctx: JobContext,
    minutes: u32,
}

impl WaitJob {
    pub fn new(ctx: JobContext) -> Self {
        Self { ctx, minutes: 0 }
    }
}

#[async_trait]
impl Job for WaitJob {
    fn init(&mut self, order: &Order) -> Result<()> {
        self.ctx.base_init(order)?;
        self.minutes = order.count("minutes")?;
        Ok(())
    }

    async fn execute(&mut self) -> Outcome {
        info!(minutes = self.minutes, "waiting");
        tokio::time::sleep(Duration::from_secs(u64::from(self.minutes) * 60)).await;
        Outcome::new(OutcomeKind::Waited)
    }

    fn handle(&self) -> StateHandle {
        self.ctx.state.clone()
    }
}
