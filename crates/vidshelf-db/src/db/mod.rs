//! Database repositories for data access layer
//
// Video records and upload reservations
mod reservation;
mod video;
//
// Transaction utilities
pub mod transaction;

pub use video::VideoRepository;

/// Schema migrations embedded from the workspace `migrations/` directory.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");
