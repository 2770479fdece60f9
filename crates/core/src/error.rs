use crate::types::EntityKind;
use thiserror::Error;

pub type PlanResult<T> = Result<T, PlanError>;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: i64 },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl PlanError {
    pub fn not_found(kind: EntityKind, id: i64) -> Self {
        PlanError::NotFound { kind, id }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        PlanError::Validation(msg.into())
    }

    /// Short machine-readable code used in API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            PlanError::NotFound { .. } => "not_found",
            PlanError::Validation(_) => "validation_failed",
            PlanError::Conflict(_) => "conflict",
            PlanError::Config(_) => "config_error",
            PlanError::Internal(_) => "internal_error",
        }
    }
}

impl From<config::ConfigError> for PlanError {
    fn from(err: config::ConfigError) -> Self {
        PlanError::Config(err.to_string())
    }
}
