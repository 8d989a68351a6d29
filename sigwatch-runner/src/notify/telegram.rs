//! Telegram Bot API notifier (`sendMessage`).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{Notifier, NotifyError};
use crate::config::ConfigError;

pub const TOKEN_VAR: &str = "TELEGRAM_TOKEN";
pub const CHAT_ID_VAR: &str = "CHAT_ID";

/// Bot token and destination chat. Never logged.
#[derive(Clone)]
pub struct TelegramCredentials {
    pub token: String,
    pub chat_id: String,
}

impl std::fmt::Debug for TelegramCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramCredentials")
            .field("token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

impl TelegramCredentials {
    /// Read `TELEGRAM_TOKEN` and `CHAT_ID` from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read credentials through an arbitrary lookup. Empty values count as missing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &'static str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::MissingCredential(name))
        };
        Ok(Self {
            token: read(TOKEN_VAR)?,
            chat_id: read(CHAT_ID_VAR)?,
        })
    }
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

pub struct TelegramNotifier {
    client: reqwest::blocking::Client,
    credentials: TelegramCredentials,
    base_url: String,
}

impl TelegramNotifier {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.telegram.org";

    pub fn new(credentials: TelegramCredentials) -> Result<Self, NotifyError> {
        Self::with_base_url(credentials, Self::DEFAULT_BASE_URL)
    }

    pub fn with_base_url(
        credentials: TelegramCredentials,
        base_url: &str,
    ) -> Result<Self, NotifyError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| NotifyError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            credentials,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.base_url, self.credentials.token)
    }
}

impl Notifier for TelegramNotifier {
    fn name(&self) -> &str {
        "telegram"
    }

    fn send(&self, text: &str) -> Result<(), NotifyError> {
        let body = SendMessage {
            chat_id: &self.credentials.chat_id,
            text,
        };

        // reqwest errors can carry the URL, which contains the token
        let resp = self
            .client
            .post(self.send_message_url())
            .json(&body)
            .send()
            .map_err(|e| NotifyError::Transport(e.without_url().to_string()))?;

        let status = resp.status();
        let parsed: Option<ApiResponse> = resp.json().ok();

        match parsed {
            Some(api) if status.is_success() && api.ok => Ok(()),
            other => Err(NotifyError::Rejected {
                service: "telegram",
                status: status.as_u16(),
                description: other
                    .and_then(|api| api.description)
                    .unwrap_or_else(|| "no description".into()),
            }),
        }
    }
}
