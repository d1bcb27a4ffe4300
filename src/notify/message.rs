// src/notify/message.rs
use chrono::{DateTime, FixedOffset};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Recovered,
    ScheduledCheck,
    ServerDown,
    Degraded,
    ScriptError,
}

/// Everything a template needs besides its kind.
#[derive(Debug, Clone)]
pub struct AlertContext<'a> {
    pub timestamp: &'a str,
    pub server_url: &'a str,
    pub response_time: Option<&'a str>,
    pub error: Option<&'a str>,
}

pub fn format_timestamp(now: DateTime<FixedOffset>, zone_label: &str) -> String {
    format!("{} {}", now.format("%Y-%m-%d %H:%M:%S"), zone_label)
}

pub fn render_alert(kind: AlertKind, ctx: &AlertContext<'_>) -> String {
    let response_time = ctx.response_time.unwrap_or("unknown");
    let error = ctx.error.unwrap_or("Unknown error");

    let (header, status_line, detail_line) = match kind {
        AlertKind::Recovered => (
            "💚 **API Recovered** 💚",
            "✅ **Status**: Operating normally",
            format!("⚡ **Response time**: {}", response_time),
        ),
        AlertKind::ScheduledCheck => (
            "💚 **API Scheduled Check** 💚",
            "✅ **Status**: Operating normally",
            format!("⚡ **Response time**: {}", response_time),
        ),
        AlertKind::ServerDown => (
            "🔴 **API Server Down** 🔴",
            "💀 **Status**: Server not responding",
            format!("❌ **Error**: {}", error),
        ),
        AlertKind::Degraded => (
            "⚠️ **API Issue Detected** ⚠️",
            "🟡 **Status**: Server responding poorly",
            format!("❌ **Error**: {}", error),
        ),
        AlertKind::ScriptError => (
            "🚨 **Monitor Script Error** 🚨",
            "🛠️ **Status**: Health check could not run",
            format!("❌ **Error**: {}", error),
        ),
    };

    format!(
        "{}\n🕐 **Time**: {}\n{}\n{}\n🌐 **Server**: {}",
        header, ctx.timestamp, status_line, detail_line, ctx.server_url
    )
}
