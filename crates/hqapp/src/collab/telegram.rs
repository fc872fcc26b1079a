use super::MessageSink;
use crate::error::{HqError, Result};
use serde_json::json;
use std::time::Duration;
use tracing::debug;

const API_BASE: &str = "https://api.telegram.org";
const TIMEOUT: Duration = Duration::from_secs(15);

/// Sends messages through the Telegram Bot API (`sendMessage`).
pub struct TelegramSink {
    agent: ureq::Agent,
    token: String,
    base_url: String,
}

impl TelegramSink {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(token, API_BASE)
    }

    /// Point the sink at another Bot API server.
    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(TIMEOUT).build(),
            token: token.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/bot{}/sendMessage", self.base_url, self.token)
    }
}

impl MessageSink for TelegramSink {
    fn send(&self, chat_id: &str, text: &str) -> Result<()> {
        let body = json!({ "chat_id": chat_id, "text": text });
        match self.agent.post(&self.endpoint()).send_json(body) {
            Ok(_) => {
                debug!(chat_id, bytes = text.len(), "telegram message sent");
                Ok(())
            }
            Err(ureq::Error::Status(code, response)) => {
                let details = response.into_string().unwrap_or_default();
                Err(HqError::Collaborator(format!(
                    "Telegram rejected message ({}): {}",
                    code, details
                )))
            }
            // Transport errors carry the URL, which embeds the token.
            Err(ureq::Error::Transport(transport)) => Err(HqError::Collaborator(format!(
                "Telegram unreachable: {}",
                transport.kind()
            ))),
        }
    }
}
