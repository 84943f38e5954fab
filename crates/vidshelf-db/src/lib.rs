//! Vidshelf Database Library
//!
//! Postgres persistence for video records and, in reserved admission mode, the
//! ledger of capacity held for granted uploads.

pub mod db;
pub mod traits;

pub use db::transaction::TransactionGuard;
pub use db::{VideoRepository, MIGRATOR};
pub use traits::VideoStore;
