//! Monotonic per-platform fix counters.

use super::Store;
use linkfix_core::error::LinkfixError;

impl Store {
    /// Atomically increment the fix counter for a platform and return the
    /// new count. A single upsert statement, so concurrent increments for
    /// the same tag are never lost.
    pub async fn increment_fix_count(&self, platform: &str) -> Result<i64, LinkfixError> {
        let count: i64 = sqlx::query_scalar(
            "INSERT INTO link_fixes (platform, count) VALUES (?, 1) \
             ON CONFLICT(platform) DO UPDATE SET count = count + 1 \
             RETURNING count",
        )
        .bind(platform)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| LinkfixError::Store(format!("increment for {platform} failed: {e}")))?;

        Ok(count)
    }

    /// Current count for a platform, 0 when no fixes were recorded yet.
    pub async fn fix_count(&self, platform: &str) -> Result<i64, LinkfixError> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT count FROM link_fixes WHERE platform = ?")
                .bind(platform)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| LinkfixError::Store(format!("count query failed: {e}")))?;

        Ok(row.map(|(c,)| c).unwrap_or(0))
    }

    /// All recorded counts, ordered by platform name.
    pub async fn all_fix_counts(&self) -> Result<Vec<(String, i64)>, LinkfixError> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT platform, count FROM link_fixes ORDER BY platform")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| LinkfixError::Store(format!("counts query failed: {e}")))?;

        Ok(rows)
    }
}
