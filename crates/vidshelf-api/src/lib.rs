//! Vidshelf API Library
//!
//! This crate provides the HTTP API handlers, middleware, and application setup.

pub mod constants;
mod handlers;
mod middleware;
pub mod setup;
mod telemetry;

pub mod error;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
