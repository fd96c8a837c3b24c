// src/error/response.rs
//
// User-facing error mapping
//
// - Maps internal errors to short, stable messages
// - Local errors (validation, permission) keep their own text
// - Store and infrastructure errors get a generic message and are logged

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;
use crate::error::AppError;

/// Error taxonomy exposed to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Duplicate title, missing field, malformed import
    Validation,

    /// Read-only principal tried to write
    Permission,

    /// Referenced record does not exist
    NotFound,

    /// Any failure of the document store
    Store,

    /// Configuration or other local failure
    Internal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub kind: ErrorKind,
    pub message: String,
    pub details: Option<String>,
}

impl ErrorResponse {
    /// `fallback` is the generic message shown for remote failures
    pub fn from_app_error(error: &AppError, fallback: &str) -> Self {
        match error {
            AppError::Domain(domain_error) => {
                let kind = match domain_error {
                    DomainError::PermissionDenied(_) => ErrorKind::Permission,
                    DomainError::NotFound(_) => ErrorKind::NotFound,
                    _ => ErrorKind::Validation,
                };
                log::warn!("Rejected: {}", domain_error);
                Self::new(kind, domain_error.to_string(), None)
            }

            AppError::NotFound => {
                log::error!("{}: record not found in store", fallback);
                Self::new(
                    ErrorKind::NotFound,
                    fallback.to_string(),
                    Some(error.to_string()),
                )
            }

            AppError::Config(message) => {
                log::error!("Config error: {}", message);
                Self::new(ErrorKind::Internal, error.to_string(), None)
            }

            AppError::Database(_)
            | AppError::Pool(_)
            | AppError::Serialization(_)
            | AppError::Io(_)
            | AppError::Other(_) => {
                log::error!("{}: {:?}", fallback, error);
                Self::new(
                    ErrorKind::Store,
                    fallback.to_string(),
                    Some("Check logs for details".to_string()),
                )
            }
        }
    }

    pub fn permission(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Permission, message.into(), None)
    }

    fn new(kind: ErrorKind, message: String, details: Option<String>) -> Self {
        Self {
            success: false,
            kind,
            message,
            details,
        }
    }
}
