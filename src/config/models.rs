// src/config/models.rs
use chrono::{FixedOffset, Offset, Utc};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";

/// Source key for `DISCORD_HEART_URL`. Takes precedence over `webhook_url`.
pub const WEBHOOK_URL_KEY: &str = "discord_heart_url";

#[derive(Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "default_server_url")]
    pub server_url: String,

    #[serde(default)]
    pub webhook_url: String,

    #[serde(default = "default_check_interval")]
    pub check_interval_secs: u64,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Wall-clock minute at which the hourly report fires.
    #[serde(default)]
    pub report_minute: u32,

    #[serde(default = "default_utc_offset")]
    pub utc_offset_hours: i32,

    #[serde(default = "default_zone_label")]
    pub zone_label: String,

    #[serde(default = "default_bot_username")]
    pub bot_username: String,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("DISCORD_HEART_URL is not set; a webhook URL is required")]
    MissingWebhookUrl,

    #[error("SERVER_URL must not be empty")]
    EmptyServerUrl,

    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),

    #[error("report_minute must be within 0..=59, got {0}")]
    InvalidReportMinute(u32),

    #[error("utc_offset_hours must be within -23..=23, got {0}")]
    InvalidUtcOffset(i32),
}

impl Settings {
    pub fn new(server_url: impl Into<String>, webhook_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            webhook_url: webhook_url.into(),
            check_interval_secs: default_check_interval(),
            request_timeout_secs: default_request_timeout(),
            report_minute: 0,
            utc_offset_hours: default_utc_offset(),
            zone_label: default_zone_label(),
            bot_username: default_bot_username(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.webhook_url.trim().is_empty() {
            return Err(ConfigError::MissingWebhookUrl);
        }
        if self.server_url.trim().is_empty() {
            return Err(ConfigError::EmptyServerUrl);
        }
        if self.check_interval_secs == 0 {
            return Err(ConfigError::ZeroDuration("check_interval_secs"));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroDuration("request_timeout_secs"));
        }
        if self.report_minute > 59 {
            return Err(ConfigError::InvalidReportMinute(self.report_minute));
        }
        if !(-23..=23).contains(&self.utc_offset_hours) {
            return Err(ConfigError::InvalidUtcOffset(self.utc_offset_hours));
        }
        Ok(())
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Fixed offset used for report timestamps and the hourly trigger.
    /// Falls back to UTC for offsets `validate` would reject.
    pub fn timezone(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_hours * 3600)
            .unwrap_or_else(|| Utc.fix())
    }
}

// The webhook URL embeds its own credential, keep it out of logs.
impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let masked = if self.webhook_url.is_empty() { "<unset>" } else { "**********" };
        f.debug_struct("Settings")
            .field("server_url", &self.server_url)
            .field("webhook_url", &masked)
            .field("check_interval_secs", &self.check_interval_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("report_minute", &self.report_minute)
            .field("utc_offset_hours", &self.utc_offset_hours)
            .field("zone_label", &self.zone_label)
            .field("bot_username", &self.bot_username)
            .finish()
    }
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

fn default_check_interval() -> u64 {
    60
}

fn default_request_timeout() -> u64 {
    10
}

fn default_utc_offset() -> i32 {
    9
}

fn default_zone_label() -> String {
    "KST".to_string()
}

fn default_bot_username() -> String {
    "Heartbeat Monitor".to_string()
}
