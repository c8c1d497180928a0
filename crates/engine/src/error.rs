//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`Validation`] thrown when user input is rejected before any write.
//! - [`KeyNotFound`] thrown when an item is not found.
//! - [`Overflow`] thrown when a total does not fit in the money type.
//! - [`Database`], [`Io`], [`Json`] and [`Csv`] wrap failures of the
//!   underlying store, filesystem and encoders.
//!
//!  [`Validation`]: EngineError::Validation
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`Overflow`]: EngineError::Overflow
//!  [`Database`]: EngineError::Database
//!  [`Io`]: EngineError::Io
//!  [`Json`]: EngineError::Json
//!  [`Csv`]: EngineError::Csv
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0}")]
    Validation(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Invalid transaction type: {0}")]
    InvalidKind(String),
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),
    #[error("Amount overflow: {0}")]
    Overflow(String),
    #[error("Legacy store error: {0}")]
    LegacyStore(String),
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::InvalidKind(a), Self::InvalidKind(b)) => a == b,
            (Self::InvalidPeriod(a), Self::InvalidPeriod(b)) => a == b,
            (Self::Overflow(a), Self::Overflow(b)) => a == b,
            (Self::LegacyStore(a), Self::LegacyStore(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            (Self::Io(a), Self::Io(b)) => a.kind() == b.kind(),
            (Self::Json(a), Self::Json(b)) => a.to_string() == b.to_string(),
            (Self::Csv(a), Self::Csv(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
