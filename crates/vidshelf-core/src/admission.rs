//! Upload admission control.
//!
//! Before an upload permission is issued, the requested size is checked against a
//! per-upload cap and against the aggregate capacity left in the bucket. The
//! decision is a pure function of the requested size and the current total; callers
//! are responsible for obtaining a fresh total from the record store immediately
//! before evaluating.
//!
//! Accepting does not debit anything. In best-effort mode the size only counts once
//! the client registers the video, so concurrent grants can jointly overshoot the
//! capacity. The reserved mode in `vidshelf-db` closes that gap by evaluating
//! against committed sizes plus outstanding reservations under a database lock.

use std::fmt;
use std::str::FromStr;

/// 1 GiB.
pub const DEFAULT_MAX_UPLOAD_SIZE: u64 = 1024 * 1024 * 1024;

/// 9.5 GiB.
pub const DEFAULT_MAX_STORAGE_CAPACITY: u64 = 9 * 1024 * 1024 * 1024 + 512 * 1024 * 1024;

const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Render a byte count as GiB with two decimals, e.g. `1.50`.
pub fn format_gib(bytes: u64) -> String {
    format!("{:.2}", bytes as f64 / BYTES_PER_GIB)
}

/// Why an upload was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AdmissionRejection {
    #[error("requested {requested} bytes exceeds per-upload limit of {max} bytes")]
    TooLarge { requested: u64, max: u64 },

    #[error("requested {requested} bytes with {current_total} bytes in use leaves only {available} bytes available")]
    QuotaExceeded {
        requested: u64,
        current_total: u64,
        available: u64,
    },
}

/// Fixed caps applied to every upload request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdmissionPolicy {
    pub max_upload_size: u64,
    pub max_storage_capacity: u64,
}

impl Default for AdmissionPolicy {
    fn default() -> Self {
        Self {
            max_upload_size: DEFAULT_MAX_UPLOAD_SIZE,
            max_storage_capacity: DEFAULT_MAX_STORAGE_CAPACITY,
        }
    }
}

impl AdmissionPolicy {
    pub fn new(max_upload_size: u64, max_storage_capacity: u64) -> Self {
        Self {
            max_upload_size,
            max_storage_capacity,
        }
    }

    /// Decide whether an upload of `requested_size` bytes may proceed given
    /// `current_total` bytes already accounted for.
    ///
    /// The per-upload cap is checked first, so an oversized request is always
    /// `TooLarge` no matter how much capacity remains.
    pub fn evaluate(&self, requested_size: u64, current_total: u64) -> Result<(), AdmissionRejection> {
        self.check_upload_size(requested_size)?;

        if current_total.saturating_add(requested_size) > self.max_storage_capacity {
            return Err(AdmissionRejection::QuotaExceeded {
                requested: requested_size,
                current_total,
                available: self.available(current_total),
            });
        }

        Ok(())
    }

    /// Per-upload cap alone. Accepted sizes never exceed `max_upload_size`, so
    /// callers can convert them for storage after this passes.
    pub fn check_upload_size(&self, requested_size: u64) -> Result<(), AdmissionRejection> {
        if requested_size > self.max_upload_size {
            return Err(AdmissionRejection::TooLarge {
                requested: requested_size,
                max: self.max_upload_size,
            });
        }
        Ok(())
    }

    /// Capacity left given `current_total` bytes in use.
    pub fn available(&self, current_total: u64) -> u64 {
        self.max_storage_capacity.saturating_sub(current_total)
    }
}

/// How the aggregate check is carried out relative to concurrent requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdmissionMode {
    /// Read the committed total and evaluate; nothing is held back for granted
    /// but not yet registered uploads.
    #[default]
    BestEffort,
    /// Hold a reservation for each granted upload until it is registered or its
    /// grant expires.
    Reserved,
}

impl FromStr for AdmissionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "best_effort" | "best-effort" => Ok(AdmissionMode::BestEffort),
            "reserved" => Ok(AdmissionMode::Reserved),
            other => Err(format!(
                "Invalid admission mode '{}'. Must be one of: best_effort, reserved",
                other
            )),
        }
    }
}

impl fmt::Display for AdmissionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdmissionMode::BestEffort => write!(f, "best_effort"),
            AdmissionMode::Reserved => write!(f, "reserved"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GIB: u64 = 1024 * 1024 * 1024;

    #[test]
    fn test_default_caps() {
        let policy = AdmissionPolicy::default();
        assert_eq!(policy.max_upload_size, 1_073_741_824);
        assert_eq!(policy.max_storage_capacity, 10_200_547_328);
    }

    #[test]
    fn test_oversized_upload_is_too_large_even_with_empty_bucket() {
        let policy = AdmissionPolicy::default();
        for current_total in [0, GIB, policy.max_storage_capacity, u64::MAX] {
            assert_eq!(
                policy.evaluate(GIB + 1, current_total),
                Err(AdmissionRejection::TooLarge {
                    requested: GIB + 1,
                    max: GIB
                })
            );
        }
    }

    #[test]
    fn test_check_upload_size_ignores_usage() {
        let policy = AdmissionPolicy::default();
        assert_eq!(policy.check_upload_size(GIB), Ok(()));
        assert_eq!(
            policy.check_upload_size(u64::MAX),
            Err(AdmissionRejection::TooLarge {
                requested: u64::MAX,
                max: GIB
            })
        );
    }

    #[test]
    fn test_quota_exceeded_when_sum_passes_capacity() {
        let policy = AdmissionPolicy::default();
        let result = policy.evaluate(1_073_741_824, 9_200_000_000);
        assert_eq!(
            result,
            Err(AdmissionRejection::QuotaExceeded {
                requested: 1_073_741_824,
                current_total: 9_200_000_000,
                available: 1_000_547_328,
            })
        );
    }

    #[test]
    fn test_accepts_within_both_caps() {
        let policy = AdmissionPolicy::default();
        // 9_000_000_000 + 1 GiB = 10_073_741_824, still under the 9.5 GiB cap
        assert_eq!(policy.evaluate(1_073_741_824, 9_000_000_000), Ok(()));
        assert_eq!(policy.evaluate(500_000_000, 9_000_000_000), Ok(()));
        assert_eq!(policy.evaluate(500_000_000, 9_200_000_000), Ok(()));
        assert_eq!(policy.evaluate(0, 0), Ok(()));
    }

    #[test]
    fn test_exact_fit_is_accepted() {
        let policy = AdmissionPolicy::new(GIB, 4 * GIB);
        assert_eq!(policy.evaluate(GIB, 3 * GIB), Ok(()));
        assert_eq!(policy.evaluate(GIB, GIB), Ok(()));
        assert!(matches!(
            policy.evaluate(GIB, 3 * GIB + 1),
            Err(AdmissionRejection::QuotaExceeded { available, .. }) if available == GIB - 1
        ));
    }

    #[test]
    fn test_over_capacity_total_reports_zero_available() {
        let policy = AdmissionPolicy::new(GIB, 4 * GIB);
        assert_eq!(
            policy.evaluate(1, u64::MAX),
            Err(AdmissionRejection::QuotaExceeded {
                requested: 1,
                current_total: u64::MAX,
                available: 0,
            })
        );
    }

    #[test]
    fn test_admission_mode_parsing() {
        assert_eq!("best_effort".parse::<AdmissionMode>(), Ok(AdmissionMode::BestEffort));
        assert_eq!("Reserved".parse::<AdmissionMode>(), Ok(AdmissionMode::Reserved));
        assert!("strict".parse::<AdmissionMode>().is_err());
        assert_eq!(AdmissionMode::default(), AdmissionMode::BestEffort);
    }

    #[test]
    fn test_format_gib() {
        assert_eq!(format_gib(GIB), "1.00");
        assert_eq!(format_gib(DEFAULT_MAX_STORAGE_CAPACITY), "9.50");
    }
}
