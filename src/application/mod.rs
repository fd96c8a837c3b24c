// src/application/mod.rs
//
// Application Layer
//
// ARCHITECTURE:
// - Sits above the catalog core
// - Owns the access-control gate and the user-facing feedback (forms, notifications)
// - Translates between DTOs and domain entities

pub mod commands;
pub mod controller;
pub mod dto;
pub mod form;
pub mod notification;
pub mod state;

pub use commands::*;
pub use controller::{
    CatalogController, GUEST_DELETE_MESSAGE, GUEST_EDIT_MESSAGE, GUEST_IMPORT_MESSAGE,
    GUEST_SAVE_MESSAGE,
};
pub use dto::*;
pub use form::{EntryForm, REQUIRED_FIELDS_MESSAGE};
pub use notification::{Notification, NotificationKind, Notifier, DEFAULT_DISMISS_AFTER};
pub use state::AppState;
