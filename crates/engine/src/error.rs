//! The module contains the errors the engine can throw.
//!
//! Every variant except [`Database`] is a deterministic caller-input or
//! state error: retrying with the same input yields the same failure, so
//! callers should surface them verbatim instead of retrying.
//!
//! [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" not found!")]
    KeyNotFound(String),
    #[error("Invalid title: {0}")]
    InvalidTitle(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid member: {0}")]
    InvalidMember(String),
    #[error("Duplicate member: {0}")]
    DuplicateMember(String),
    #[error("Split mismatch: {0}")]
    SplitMismatch(String),
    #[error("Empty split target: {0}")]
    EmptySplitTarget(String),
    /// A stored value failed to decode back into its domain type.
    #[error("Invalid value: {0}")]
    InvalidValue(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::InvalidTitle(a), Self::InvalidTitle(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidMember(a), Self::InvalidMember(b)) => a == b,
            (Self::DuplicateMember(a), Self::DuplicateMember(b)) => a == b,
            (Self::SplitMismatch(a), Self::SplitMismatch(b)) => a == b,
            (Self::EmptySplitTarget(a), Self::EmptySplitTarget(b)) => a == b,
            (Self::InvalidValue(a), Self::InvalidValue(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
