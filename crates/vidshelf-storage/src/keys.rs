//! Storage key checks shared by all backends.

use crate::traits::{StorageError, StorageResult};

/// Reject keys that are empty, absolute, or contain parent-directory segments.
pub(crate) fn validate_key(storage_key: &str) -> StorageResult<()> {
    if storage_key.is_empty() {
        return Err(StorageError::InvalidKey("key is empty".to_string()));
    }
    if storage_key.starts_with('/') {
        return Err(StorageError::InvalidKey(format!(
            "key must not start with '/': {}",
            storage_key
        )));
    }
    if storage_key.contains("..") {
        return Err(StorageError::InvalidKey(format!(
            "key must not contain '..': {}",
            storage_key
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(validate_key("1700000000-clip.mp4").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("/1700000000-clip.mp4").is_err());
        assert!(validate_key("a/../b").is_err());
    }
}
