//! Database transaction utilities
//!
//! Multi-step writes (registration consuming a reservation, reservation under the
//! admission lock) run inside a [`TransactionGuard`].

use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use vidshelf_core::AppError;

/// A database transaction wrapper that must be finished explicitly.
///
/// Dropping an unfinished guard rolls the transaction back (sqlx does this when
/// the inner transaction is dropped) and logs a warning.
///
/// # Example
///
/// ```ignore
/// use vidshelf_db::TransactionGuard;
///
/// async fn example(pool: &sqlx::PgPool) -> Result<(), vidshelf_core::AppError> {
///     let mut tx = TransactionGuard::begin(pool).await?;
///     sqlx::query("DELETE FROM ...").execute(tx.conn()?).await?;
///     tx.commit().await?;
///     Ok(())
/// }
/// ```
pub struct TransactionGuard {
    transaction: Option<Transaction<'static, Postgres>>,
}

impl TransactionGuard {
    /// Begin a new database transaction
    pub async fn begin(pool: &PgPool) -> Result<Self, AppError> {
        let transaction = pool.begin().await?;
        Ok(Self {
            transaction: Some(transaction),
        })
    }

    /// Connection to run statements on inside the transaction.
    pub fn conn(&mut self) -> Result<&mut PgConnection, AppError> {
        self.transaction
            .as_deref_mut()
            .ok_or_else(|| AppError::Internal("transaction already finished".to_string()))
    }

    /// Commit the transaction
    pub async fn commit(mut self) -> Result<(), AppError> {
        if let Some(tx) = self.transaction.take() {
            tx.commit().await?;
        }
        Ok(())
    }

    /// Rollback the transaction
    pub async fn rollback(mut self) -> Result<(), AppError> {
        if let Some(tx) = self.transaction.take() {
            tx.rollback().await?;
        }
        Ok(())
    }
}

impl Drop for TransactionGuard {
    fn drop(&mut self) {
        if self.transaction.is_some() {
            tracing::warn!(
                "Transaction was dropped without explicit commit or rollback - rolling back"
            );
        }
    }
}
