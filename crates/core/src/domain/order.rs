use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// The kind of work a job is asked to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderKind {
    #[default]
    SelfPlay,
    RestoreSelfPlay,
    Validation,
    DumpSupervised,
    Wait,
}

impl OrderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SelfPlay => "self_play",
            Self::RestoreSelfPlay => "restore_self_play",
            Self::Validation => "validation",
            Self::DumpSupervised => "dump_supervised",
            Self::Wait => "wait",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "self_play" => Some(Self::SelfPlay),
            "restore_self_play" => Some(Self::RestoreSelfPlay),
            "validation" => Some(Self::Validation),
            "dump_supervised" => Some(Self::DumpSupervised),
            "wait" => Some(Self::Wait),
            _ => None,
        }
    }
}

/// A work order handed to a job by the scheduler: a kind plus an opaque
/// string-keyed parameter map. Each job variant interprets a fixed subset
/// of keys and ignores the rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    kind: OrderKind,
    parameters: BTreeMap<String, String>,
}

impl Order {
    pub fn new(kind: OrderKind) -> Self {
        Self {
            kind,
            parameters: BTreeMap::new(),
        }
    }

    pub fn kind(&self) -> OrderKind {
        self.kind
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.parameters.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.parameters.contains_key(key)
    }

    /// Required string parameter; absence is a configuration error.
    pub fn require(&self, key: &str) -> Result<&str> {
        self.get(key)
            .ok_or_else(|| CoreError::MissingParameter(key.to_string()))
    }

    /// `true` iff the parameter is present with the literal value `"true"`.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key) == Some("true")
    }

    /// Numeric parameter defaulting to zero when absent; a present but
    /// malformed value is a configuration error.
    pub fn count(&self, key: &str) -> Result<u32> {
        match self.get(key) {
            None => Ok(0),
            Some(raw) => raw.parse().map_err(|_| CoreError::invalid(key, raw)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_present_and_missing() {
        let order = Order::new(OrderKind::SelfPlay).with("network", "abc123");
        assert_eq!(order.require("network").unwrap(), "abc123");
        assert!(matches!(
            order.require("options"),
            Err(CoreError::MissingParameter(_))
        ));
    }

    #[test]
    fn test_flag() {
        let order = Order::new(OrderKind::SelfPlay)
            .with("debug", "true")
            .with("use_local_network", "false");
        assert!(order.flag("debug"));
        assert!(!order.flag("use_local_network"));
        assert!(!order.flag("absent"));
    }

    #[test]
    fn test_count_defaults_and_rejects() {
        let order = Order::new(OrderKind::RestoreSelfPlay)
            .with("moves", "42")
            .with("minutes", "soon");
        assert_eq!(order.count("moves").unwrap(), 42);
        assert_eq!(order.count("absent").unwrap(), 0);
        assert!(matches!(
            order.count("minutes"),
            Err(CoreError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!(OrderKind::parse("validation"), Some(OrderKind::Validation));
        assert_eq!(OrderKind::parse("nonsense"), None);
        assert_eq!(OrderKind::Wait.as_str(), "wait");
    }
}
