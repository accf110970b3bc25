use crate::error::Result;
use crate::item::TrackedItem;
use std::time::Duration;

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Fire-and-forget dispatch of a change message. Failures never
/// propagate to the poll engine.
pub trait Notifier {
    fn send(&self, message: &str);
}

/// The message posted when an item's status changes.
pub fn change_message(item: &TrackedItem) -> String {
    format!("🔔 *Update:* {}\n📝 {}", item.label, item.status)
}

/// Posts messages to a Telegram chat through the Bot API.
pub struct TelegramNotifier {
    http: reqwest::blocking::Client,
    base_url: String,
    token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.telegram.org";

    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            token: token.into(),
            chat_id: chat_id.into(),
        })
    }

    fn try_send(&self, message: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.base_url, self.token);
        self.http
            .post(&url)
            .json(&serde_json::json!({
                "chat_id": self.chat_id,
                "text": message,
                "parse_mode": "Markdown",
            }))
            .send()?
            .error_for_status()?;
        Ok(())
    }

    /// Connectivity self-test: validates the bot token via `getMe`.
    pub fn probe(&self) -> std::result::Result<(), String> {
        let url = format!("{}/bot{}/getMe", self.base_url, self.token);
        match self.http.get(&url).send() {
            Ok(res) if res.status().is_success() => Ok(()),
            Ok(_) => Err("invalid token".to_string()),
            Err(e) => Err(format!("network error: {e}")),
        }
    }
}

impl Notifier for TelegramNotifier {
    fn send(&self, message: &str) {
        if let Err(e) = self.try_send(message) {
            tracing::warn!(error = %e, "notification delivery failed");
        }
    }
}
