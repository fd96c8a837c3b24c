// src/error/mod.rs

pub mod response;
pub mod types;

pub use response::{ErrorKind, ErrorResponse};
pub use types::{AppError, AppResult};
