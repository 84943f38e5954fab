//! Vidshelf Core Library
//!
//! This crate provides the domain models, error types, configuration and upload
//! admission rules shared by the storage, database and API crates.

pub mod admission;
pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use admission::{AdmissionMode, AdmissionPolicy, AdmissionRejection};
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
