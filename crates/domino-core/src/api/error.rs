use thiserror::Error;

/// Failure to load a [`ToyConfig`](super::config::ToyConfig).
///
/// Configuration is the only fallible surface of the core; malformed
/// gameplay input is ignored instead of reported.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("config field `{field}` {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: &'static str) -> Self {
        Self::Invalid { field, reason }
    }
}
