//! Message sending and slash-command registration.

use super::TelegramChannel;
use linkfix_core::error::LinkfixError;
use tracing::warn;

impl TelegramChannel {
    /// Send a text message to a specific chat.
    ///
    /// No parse mode: replies carry raw links and must reach the client
    /// verbatim so its embed preview kicks in.
    pub(crate) async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), LinkfixError> {
        let url = format!("{}/sendMessage", self.base_url);
        let body = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
        });

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| LinkfixError::Channel(format!("telegram send failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let error_text = resp.text().await.unwrap_or_default();
            return Err(LinkfixError::Channel(format!(
                "telegram send failed ({status}): {error_text}"
            )));
        }

        Ok(())
    }

    /// Register the bot's slash commands so clients offer completion.
    /// Failure here is cosmetic; the bot still answers typed commands.
    pub(crate) async fn register_commands(&self) {
        let url = format!("{}/setMyCommands", self.base_url);
        let body = serde_json::json!({
            "commands": [
                { "command": "fix", "description": "Fix a social media link for me" },
                { "command": "prefs", "description": "Show or change automatic fixing preferences" },
                { "command": "stats", "description": "Show how many links have been fixed" },
                { "command": "help", "description": "Show available commands" },
            ]
        });

        match self.client.post(&url).json(&body).send().await {
            Ok(resp) if resp.status().is_success() => {}
            Ok(resp) => warn!("telegram setMyCommands failed: {}", resp.status()),
            Err(e) => warn!("telegram setMyCommands failed: {e}"),
        }
    }
}
