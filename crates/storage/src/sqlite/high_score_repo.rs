use async_trait::async_trait;
use sqlx::Row;
use trivia_core::model::HighScore;

use crate::repository::{HighScoreRepository, StorageError};

use super::mapping::{conn, score_from_i64, score_to_i64, ser};
use super::{PREFERENCE_GROUP, SCORE_KEY, SqliteRepository};

#[async_trait]
impl HighScoreRepository for SqliteRepository {
    async fn get_high_score(&self) -> Result<Option<HighScore>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT value, updated_at
            FROM preferences
            WHERE group_name = ?1 AND key = ?2
            ",
        )
        .bind(PREFERENCE_GROUP)
        .bind(SCORE_KEY)
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let value: i64 = row.try_get("value").map_err(ser)?;
        let updated_at: chrono::DateTime<chrono::Utc> = row.try_get("updated_at").map_err(ser)?;
        Ok(Some(HighScore::new(score_from_i64(value)?, updated_at)))
    }

    async fn ratchet_high_score(&self, candidate: HighScore) -> Result<bool, StorageError> {
        if candidate.score().value() == 0 {
            return Ok(false);
        }

        // Compare-and-write in one statement; the conflict branch only fires on improvement.
        let result = sqlx::query(
            r"
            INSERT INTO preferences (group_name, key, value, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(group_name, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            WHERE excluded.value > preferences.value
            ",
        )
        .bind(PREFERENCE_GROUP)
        .bind(SCORE_KEY)
        .bind(score_to_i64(candidate.score()))
        .bind(candidate.achieved_at())
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(result.rows_affected() > 0)
    }
}
