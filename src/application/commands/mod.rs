// src/application/commands/mod.rs
//
// Command Handlers
//
// ARCHITECTURE:
// - Commands are thin adapters between the CLI and the controller / catalog
// - Commands accept DTOs, return DTOs
// - Commands NEVER contain business logic

pub mod entry_commands;

pub use entry_commands::*;
