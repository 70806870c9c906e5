// Law-firm CMS backend - multilingual content over SQLite

// HTTP surface
pub mod api;
pub mod app_state;
pub mod config;

// Multilingual content model: kinds, resolver, projector
pub mod content;

// Core types and primitives
pub mod core;

// Persistence - SQLite pool and content tables
pub mod infrastructure;

// Write coordination and reads per content kind, inbox
pub mod services;

// Common utilities
pub mod error;

// Re-exports for convenience
pub use error::{AppError, AppResult};
