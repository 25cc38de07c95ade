//! The job abstraction the scheduler drives.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use autoplay_core::{Engine, Order, OrderKind, Outcome, Version};
use events::{EventBus, EventEnvelope, GameEvent};
use gtp::StartOptions;

use crate::config::ManagementConfig;
use crate::error::{JobError, Result};
use crate::state::{JobState, StateHandle};
use crate::{DumpSupervisedJob, SelfPlayJob, ValidationJob, WaitJob};

/// Engine flags every spawned instance gets: GTP mode, quiet output, and
/// the weights flag the network file is appended to.
const ENGINE_MODE_OPTIONS: &str = "-g -q -w";

/// A cancellable, resumable unit of work.
///
/// `init` validates the work order and builds engine descriptors without
/// touching any subprocess; `execute` runs the whole job and yields exactly
/// one outcome. Cancellation requests arrive through the [`StateHandle`]
/// returned by `handle` and are honored at move-loop check points.
#[async_trait]
pub trait Job: Send {
    fn init(&mut self, order: &Order) -> Result<()>;
    async fn execute(&mut self) -> Outcome;
    fn handle(&self) -> StateHandle;

    /// Ask the job to stop once the current game completes.
    fn finish(&self) {
        self.handle().finish();
    }

    /// Ask the job to pause now and persist a resumable state.
    fn store(&self) {
        self.handle().store();
    }
}

/// Build the job variant matching a work order kind.
pub fn job_for(kind: OrderKind, ctx: JobContext) -> Box<dyn Job> {
    match kind {
        OrderKind::SelfPlay | OrderKind::RestoreSelfPlay => Box::new(SelfPlayJob::new(ctx)),
        OrderKind::Validation => Box::new(ValidationJob::new(ctx)),
        OrderKind::DumpSupervised => Box::new(DumpSupervisedJob::new(ctx)),
        OrderKind::Wait => Box::new(WaitJob::new(ctx)),
    }
}

/// State and collaborators shared by every job variant.
pub struct JobContext {
    pub state: StateHandle,
    /// Extra per-slot engine options (device selection).
    pub device: String,
    pub min_version: Version,
    pub config: Arc<ManagementConfig>,
    pub bus: Option<EventBus>,
}

impl JobContext {
    pub fn new(
        device: impl Into<String>,
        config: Arc<ManagementConfig>,
        bus: Option<EventBus>,
    ) -> Self {
        Self {
            state: StateHandle::new(),
            device: device.into(),
            min_version: Version::default(),
            config,
            bus,
        }
    }

    /// Order parsing shared by every variant: the minimum engine version
    /// the handshake enforces.
    pub fn base_init(&mut self, order: &Order) -> Result<()> {
        self.min_version = order.require("minVersion")?.parse()?;
        Ok(())
    }

    pub fn running(&self) -> bool {
        self.state.snapshot() == JobState::Running
    }

    pub fn publish(&self, event: GameEvent) {
        if let Some(bus) = &self.bus {
            bus.publish(EventEnvelope::new(event));
        }
    }

    /// Build an engine descriptor from the order keys one side uses.
    ///
    /// The network comes from the configured local file when the order sets
    /// `use_local_network`, otherwise from the networks directory keyed by
    /// the order's network id.
    pub fn build_engine(
        &self,
        order: &Order,
        net_key: &str,
        local_net: &Path,
        options_key: &str,
        commands_key: &str,
    ) -> Result<Engine> {
        let network = if order.flag("use_local_network") {
            local_net.to_path_buf()
        } else {
            let id = order.require(net_key)?;
            self.config.networks_dir.join(format!("{id}.gz"))
        };

        let binary = match &self.config.engine_binary {
            Some(path) => path.clone(),
            None => gtp::find_engine_binary().ok_or(JobError::EngineNotFound)?,
        };

        let options = [
            order.get(options_key).unwrap_or_default(),
            self.device.as_str(),
            ENGINE_MODE_OPTIONS,
        ]
        .iter()
        .filter(|part| !part.trim().is_empty())
        .map(|part| part.trim())
        .collect::<Vec<_>>()
        .join(" ");

        let commands = order
            .get(commands_key)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Engine::new(binary, network)
            .with_options(options)
            .with_commands(commands))
    }

    /// Session start options for this job's configuration.
    pub fn start_options(&self, resume: Option<String>, resume_moves: u32) -> StartOptions {
        StartOptions {
            min_version: self.min_version,
            resume,
            resume_moves,
            preload_dir: self.config.preload_dir(),
            work_dir: self.config.work_dir.clone(),
        }
    }
}
