//! Video record repository: CRUD for the videos table.

use sqlx::{PgPool, Postgres};
use vidshelf_core::models::{NewVideo, VideoRecord};
use vidshelf_core::AppError;

use super::transaction::TransactionGuard;

const VIDEO_COLUMNS: &str = "id, title, url, video_key, size, created_at, updated_at, deleted_at";

/// Postgres `unique_violation`
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Clone)]
pub struct VideoRepository {
    pub(super) pool: PgPool,
}

impl VideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All records, oldest first.
    #[tracing::instrument(skip(self), fields(db.table = "videos"))]
    pub async fn find_all(&self) -> Result<Vec<VideoRecord>, AppError> {
        let videos = sqlx::query_as::<Postgres, VideoRecord>(&format!(
            "SELECT {} FROM videos ORDER BY id ASC",
            VIDEO_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(videos)
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos"))]
    pub async fn find_by_id(&self, id: i64) -> Result<Option<VideoRecord>, AppError> {
        let video = sqlx::query_as::<Postgres, VideoRecord>(&format!(
            "SELECT {} FROM videos WHERE id = $1",
            VIDEO_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(video)
    }

    /// Insert a record and consume any upload reservation held for its key.
    #[tracing::instrument(skip(self, video), fields(db.table = "videos", video_key = %video.video_key))]
    pub async fn create(&self, video: NewVideo) -> Result<VideoRecord, AppError> {
        let mut tx = TransactionGuard::begin(&self.pool).await?;

        let inserted = sqlx::query_as::<Postgres, VideoRecord>(&format!(
            r#"
            INSERT INTO videos (title, url, video_key, size)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            VIDEO_COLUMNS
        ))
        .bind(&video.title)
        .bind(&video.url)
        .bind(&video.video_key)
        .bind(video.size)
        .fetch_one(tx.conn()?)
        .await;

        let record = match inserted {
            Ok(record) => record,
            Err(sqlx::Error::Database(db_err))
                if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) =>
            {
                tx.rollback().await?;
                return Err(AppError::InvalidInput(format!(
                    "Video key '{}' is already registered",
                    video.video_key
                )));
            }
            Err(e) => return Err(e.into()),
        };

        let consumed = sqlx::query("DELETE FROM upload_reservations WHERE storage_key = $1")
            .bind(&video.video_key)
            .execute(tx.conn()?)
            .await?
            .rows_affected();

        tx.commit().await?;

        tracing::info!(
            video_id = record.id,
            size = record.size,
            reservation_consumed = consumed > 0,
            "Video registered"
        );

        Ok(record)
    }

    /// Hard delete. Returns whether a row was removed.
    #[tracing::instrument(skip(self), fields(db.table = "videos"))]
    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Sum of `size` over all records; 0 when there are none.
    #[tracing::instrument(skip(self), fields(db.table = "videos"))]
    pub async fn sum_sizes(&self) -> Result<u64, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(size), 0)::BIGINT FROM videos")
            .fetch_one(&self.pool)
            .await?;

        Ok(u64::try_from(total).unwrap_or(0))
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
