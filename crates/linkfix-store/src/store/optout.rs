//! Per-user opt-out preferences for automatic link fixing.

use super::Store;
use linkfix_core::error::LinkfixError;

impl Store {
    /// Whether a user has opted out of automatic fixing. Unknown users
    /// default to opted in (`false`).
    pub async fn is_opted_out(&self, user_id: &str) -> Result<bool, LinkfixError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT user_id FROM opted_out_users WHERE user_id = ?")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| LinkfixError::Store(format!("opt-out lookup failed: {e}")))?;

        Ok(row.is_some())
    }

    /// Set a user's opt-out state. Idempotent; returns whether the stored
    /// state actually changed.
    pub async fn set_opted_out(
        &self,
        user_id: &str,
        opted_out: bool,
    ) -> Result<bool, LinkfixError> {
        let result = if opted_out {
            sqlx::query("INSERT OR IGNORE INTO opted_out_users (user_id) VALUES (?)")
                .bind(user_id)
                .execute(&self.pool)
                .await
        } else {
            sqlx::query("DELETE FROM opted_out_users WHERE user_id = ?")
                .bind(user_id)
                .execute(&self.pool)
                .await
        };

        result
            .map(|r| r.rows_affected() > 0)
            .map_err(|e| LinkfixError::Store(format!("opt-out update failed: {e}")))
    }
}
