use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// How to launch one engine instance: binary, network weights, command-line
/// options and extra setup commands sent after the handshake.
///
/// Built once per job from a work order; never mutated after the engine
/// process starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Engine {
    pub binary: PathBuf,
    pub network: PathBuf,
    pub options: String,
    pub commands: Vec<String>,
}

impl Engine {
    pub fn new(binary: impl Into<PathBuf>, network: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            network: network.into(),
            options: String::new(),
            commands: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: impl Into<String>) -> Self {
        self.options = options.into();
        self
    }

    pub fn with_commands(mut self, commands: Vec<String>) -> Self {
        self.commands = commands;
        self
    }

    /// Full command line used to spawn the engine process.
    pub fn command_line(&self) -> String {
        let mut cmd = self.binary.display().to_string();
        if !self.options.trim().is_empty() {
            cmd.push(' ');
            cmd.push_str(self.options.trim());
        }
        cmd.push(' ');
        cmd.push_str(&self.network.display().to_string());
        cmd
    }

    /// Network identifier: the weights file name with extensions stripped.
    pub fn network_id(&self) -> String {
        let name = self
            .network
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = name.strip_suffix(".gz").unwrap_or(&name);
        Path::new(name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line() {
        let engine = Engine::new("leelaz", "networks/abc123.gz").with_options("-g -q -w");
        assert_eq!(engine.command_line(), "leelaz -g -q -w networks/abc123.gz");
    }

    #[test]
    fn test_command_line_without_options() {
        let engine = Engine::new("leelaz", "net.gz");
        assert_eq!(engine.command_line(), "leelaz net.gz");
    }

    #[test]
    fn test_network_id_strips_extensions() {
        let engine = Engine::new("leelaz", "networks/abc123def456.txt.gz");
        assert_eq!(engine.network_id(), "abc123def456");

        let engine = Engine::new("leelaz", "networks/plain.gz");
        assert_eq!(engine.network_id(), "plain");
    }
}
