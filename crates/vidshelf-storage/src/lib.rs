//! Vidshelf Storage Library
//!
//! Object storage gateway for video files. Clients never stream video bytes
//! through the API: they receive a presigned PUT URL from [`UploadSigner`] and
//! upload directly to the bucket. The server only signs and deletes.
//!
//! # Storage key format
//!
//! Keys are flat: `{unix_seconds}-{filename}`. Keys must not contain `..` or a
//! leading `/`; see the `keys` module.

pub mod factory;
pub(crate) mod keys;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod signer;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-s3")]
pub use s3::{S3Credentials, S3Storage};
pub use signer::UploadSigner;
pub use traits::{Storage, StorageError, StorageResult};
