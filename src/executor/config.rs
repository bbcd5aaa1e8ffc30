//! Executor configuration

use serde::Deserialize;

use crate::observability::Severity;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Emit FILTER_* log events.
    pub logging_enabled: bool,
    /// Events below this severity are dropped.
    pub min_log_severity: Severity,
    /// Skip remaining predicates once no candidate rows are left.
    pub short_circuit_empty: bool,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            logging_enabled: false,
            min_log_severity: Severity::Info,
            short_circuit_empty: true,
        }
    }
}

impl ExecutorConfig {
    /// Config with logging on at the default severity.
    pub fn enabled() -> Self {
        Self {
            logging_enabled: true,
            ..Self::default()
        }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    /// Whether an event at `severity` should be written.
    pub fn should_log(&self, severity: Severity) -> bool {
        self.logging_enabled && severity >= self.min_log_severity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_quiet() {
        let config = ExecutorConfig::default();
        assert!(!config.logging_enabled);
        assert!(config.short_circuit_empty);
        assert!(!config.should_log(Severity::Error));
    }

    #[test]
    fn test_enabled_respects_min_severity() {
        let config = ExecutorConfig::enabled();
        assert!(config.should_log(Severity::Info));
        assert!(!config.should_log(Severity::Trace));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: ExecutorConfig =
            serde_json::from_str(r#"{"logging_enabled":true,"min_log_severity":"TRACE"}"#)
                .unwrap();
        assert!(config.should_log(Severity::Trace));
        assert!(config.short_circuit_empty);
    }

    #[test]
    fn test_deserialize_empty_object() {
        let config: ExecutorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ExecutorConfig::default());
    }
}
