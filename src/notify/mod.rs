// src/notify/mod.rs
mod message;
mod webhook;

pub use message::{format_timestamp, render_alert, AlertContext, AlertKind};
pub use webhook::{Notifier, NotifyError, WebhookNotifier};
