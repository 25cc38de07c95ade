use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Discriminant of a completed unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    /// A finished game produced a record and training features.
    GeneratedFile,
    /// A paused game was persisted for a later resume.
    StoreForResume,
    /// A match game finished with a declared winner.
    Win,
    /// A wait order elapsed.
    Waited,
    /// A one-shot conversion finished.
    Done,
    /// The work order failed and should be redone.
    Error,
}

impl OutcomeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GeneratedFile => "generated_file",
            Self::StoreForResume => "store_for_resume",
            Self::Win => "win",
            Self::Waited => "waited",
            Self::Done => "done",
            Self::Error => "error",
        }
    }
}

/// The immutable result a job returns to the scheduler: a kind plus a
/// string-keyed property map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outcome {
    kind: OutcomeKind,
    properties: BTreeMap<String, String>,
}

impl Outcome {
    pub fn new(kind: OutcomeKind) -> Self {
        Self {
            kind,
            properties: BTreeMap::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(OutcomeKind::Error).with("error", message)
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn kind(&self) -> OutcomeKind {
        self.kind
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    pub fn is_error(&self) -> bool {
        self.kind == OutcomeKind::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let outcome = Outcome::new(OutcomeKind::GeneratedFile)
            .with("file", "ab12cd34")
            .with("moves", "211");
        assert_eq!(outcome.kind(), OutcomeKind::GeneratedFile);
        assert_eq!(outcome.get("file"), Some("ab12cd34"));
        assert_eq!(outcome.get("moves"), Some("211"));
        assert_eq!(outcome.get("winner"), None);
        assert!(!outcome.is_error());
    }

    #[test]
    fn test_error_outcome() {
        let outcome = Outcome::error("engine failed to launch");
        assert!(outcome.is_error());
        assert_eq!(outcome.get("error"), Some("engine failed to launch"));
    }
}
