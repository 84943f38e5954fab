//! Upload reservation ledger for reserved admission mode.
//!
//! Every reservation is written while holding a transaction-scoped advisory
//! lock, so two admissions can never both read the same total and both succeed
//! past the capacity.

use chrono::{DateTime, Utc};
use vidshelf_core::{AdmissionPolicy, AppError};

use super::transaction::TransactionGuard;
use super::video::VideoRepository;

/// Advisory lock key serializing admission decisions ("vidshelf" in ASCII).
const ADMISSION_LOCK_KEY: i64 = 0x7669_6473_6865_6c66;

impl VideoRepository {
    /// Evaluate `policy` against committed sizes plus live reservations and, on
    /// acceptance, hold `size` bytes for `storage_key` until `expires_at`.
    #[tracing::instrument(skip(self, policy), fields(db.table = "upload_reservations"))]
    pub async fn reserve_upload(
        &self,
        storage_key: &str,
        size: u64,
        expires_at: DateTime<Utc>,
        policy: &AdmissionPolicy,
    ) -> Result<(), AppError> {
        // Oversized requests are TooLarge before anything touches the database.
        policy.check_upload_size(size)?;
        let size_db = i64::try_from(size)
            .map_err(|_| AppError::InvalidInput("Size is out of range".to_string()))?;

        let mut tx = TransactionGuard::begin(&self.pool).await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(ADMISSION_LOCK_KEY)
            .execute(tx.conn()?)
            .await?;

        let purged = sqlx::query("DELETE FROM upload_reservations WHERE expires_at <= NOW()")
            .execute(tx.conn()?)
            .await?
            .rows_affected();
        if purged > 0 {
            tracing::debug!(purged, "Expired upload reservations purged");
        }

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT (
                (SELECT COALESCE(SUM(size), 0) FROM videos)
                + (SELECT COALESCE(SUM(size), 0) FROM upload_reservations)
            )::BIGINT
            "#,
        )
        .fetch_one(tx.conn()?)
        .await?;
        let current_total = u64::try_from(total).unwrap_or(0);

        if let Err(rejection) = policy.evaluate(size, current_total) {
            tx.rollback().await?;
            return Err(rejection.into());
        }

        sqlx::query(
            r#"
            INSERT INTO upload_reservations (storage_key, size, expires_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (storage_key)
            DO UPDATE SET size = EXCLUDED.size, expires_at = EXCLUDED.expires_at
            "#,
        )
        .bind(storage_key)
        .bind(size_db)
        .bind(expires_at)
        .execute(tx.conn()?)
        .await?;

        tx.commit().await?;

        tracing::info!(
            storage_key = %storage_key,
            size,
            current_total,
            "Upload capacity reserved"
        );

        Ok(())
    }

    /// Drop the reservation for `storage_key`, if any.
    #[tracing::instrument(skip(self), fields(db.table = "upload_reservations"))]
    pub async fn release_reservation(&self, storage_key: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM upload_reservations WHERE storage_key = $1")
            .bind(storage_key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
