//! Error types
//!
//! Only setup and registration APIs return errors. The per-tick pipeline
//! never fails: degenerate math falls back to safe defaults and missing
//! collaborators read as "nothing there".

use thiserror::Error;

use crate::physics::BodyHandle;
use crate::player::CharacterId;

/// Errors raised while loading or validating tuning configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the override file failed.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// The override file is not valid JSON for [`SimConfig`](crate::config::SimConfig).
    #[error("failed to parse config JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// A value is out of its accepted range.
    #[error("invalid config value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Errors raised by simulation setup calls.
#[derive(Debug, Error, PartialEq)]
pub enum SimError {
    #[error("unknown character {0:?}")]
    UnknownCharacter(CharacterId),
    #[error("physics service has no body {0:?}")]
    UnknownBody(BodyHandle),
    #[error("projectile limit of {max} reached")]
    ProjectileCapReached { max: usize },
}
