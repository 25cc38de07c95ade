//! Shared read-only configuration jobs consume from the scheduler.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, warn};

const CONFIG_FILE: &str = ".autoplay/config.toml";

/// Project-level configuration stored in `.autoplay/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagementConfig {
    /// Directory downloaded network weights live in.
    pub networks_dir: PathBuf,
    /// Local network used when a work order sets `use_local_network`.
    pub net_filepath: PathBuf,
    /// Opponent network for local validation matches.
    pub component_net_filepath: PathBuf,
    /// Directory of existing training data preloaded into each engine.
    pub training_data_dir: PathBuf,
    /// Whether to preload existing training data on engine start.
    pub load_training_data: bool,
    /// Source record for supervised conversion jobs.
    pub dump_sgf_file: PathBuf,
    /// Destination file of supervised conversion jobs.
    pub dump_data_file: PathBuf,
    /// Directory scratch files (records, training state) are written to.
    pub work_dir: PathBuf,
    /// Explicit engine binary; discovered from PATH when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_binary: Option<PathBuf>,
}

impl Default for ManagementConfig {
    fn default() -> Self {
        Self {
            networks_dir: PathBuf::from("networks"),
            net_filepath: PathBuf::new(),
            component_net_filepath: PathBuf::new(),
            training_data_dir: PathBuf::new(),
            load_training_data: false,
            dump_sgf_file: PathBuf::new(),
            dump_data_file: PathBuf::new(),
            work_dir: PathBuf::from("."),
            engine_binary: None,
        }
    }
}

impl ManagementConfig {
    /// Read config from a project directory, falling back to defaults.
    pub async fn read(project_path: &Path) -> Self {
        let config_path = project_path.join(CONFIG_FILE);

        if !config_path.exists() {
            debug!(path = %config_path.display(), "config file does not exist, using defaults");
            return Self::default();
        }

        match fs::read_to_string(&config_path).await {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => {
                    debug!(path = %config_path.display(), "config loaded");
                    config
                }
                Err(e) => {
                    warn!(path = %config_path.display(), error = %e, "failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                warn!(path = %config_path.display(), error = %e, "failed to read config file, using defaults");
                Self::default()
            }
        }
    }

    /// Write config to a project directory.
    pub async fn write(&self, project_path: &Path) -> std::io::Result<()> {
        let config_path = project_path.join(CONFIG_FILE);

        if let Some(dir) = config_path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir).await?;
            }
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(&config_path, content).await?;
        debug!(path = %config_path.display(), "config saved");

        Ok(())
    }

    /// Training-data directory to preload, when enabled and configured.
    pub fn preload_dir(&self) -> Option<PathBuf> {
        if self.load_training_data && !self.training_data_dir.as_os_str().is_empty() {
            Some(self.training_data_dir.clone())
        } else {
            None
        }
    }
}
