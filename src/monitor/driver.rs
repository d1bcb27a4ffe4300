// src/monitor/driver.rs
use crate::config::Settings;
use crate::health::{HealthChecker, HealthProbe, HealthReport};
use crate::notify::{
    format_timestamp, render_alert, AlertContext, AlertKind, Notifier, WebhookNotifier,
};
use crate::policy::{continuous_alert, single_check_alert, LastStatus};
use anyhow::Result;
use chrono::{DateTime, FixedOffset, Timelike, Utc};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinError;
use tokio::time::sleep;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Stops a running [`Monitor::run`] loop at its next boundary.
#[derive(Clone)]
pub struct ShutdownHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        let _ = self.tx.send(true);
    }
}

pub struct Monitor {
    settings: Settings,
    probe: Arc<dyn HealthProbe>,
    notifier: Arc<dyn Notifier>,
    last_status: LastStatus,
    clock: Clock,
    shutdown_tx: Arc<watch::Sender<bool>>,
    shutdown_rx: watch::Receiver<bool>,
}

impl Monitor {
    pub fn new(
        settings: Settings,
        probe: Arc<dyn HealthProbe>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Self {
            settings,
            probe,
            notifier,
            last_status: LastStatus::Unknown,
            clock: Arc::new(Utc::now),
            shutdown_tx: Arc::new(shutdown_tx),
            shutdown_rx,
        }
    }

    /// Wire the real HTTP checker and webhook notifier from settings.
    pub fn from_settings(settings: Settings) -> Result<Self> {
        let checker = HealthChecker::new(settings.request_timeout())?;
        let notifier = WebhookNotifier::new(
            settings.webhook_url.clone(),
            settings.bot_username.clone(),
            settings.request_timeout(),
        )?;

        Ok(Self::new(settings, Arc::new(checker), Arc::new(notifier)))
    }

    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn last_status(&self) -> LastStatus {
        self.last_status
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            tx: self.shutdown_tx.clone(),
        }
    }

    /// Continuous mode. Checks, then sleeps a fixed interval, until shut down.
    pub async fn run(&mut self) {
        let mut shutdown_rx = self.shutdown_rx.clone();

        info!(
            "Starting heartbeat monitor for {} every {:?}",
            self.settings.server_url,
            self.settings.check_interval()
        );

        while !*shutdown_rx.borrow() {
            self.run_cycle().await;

            tokio::select! {
                _ = sleep(self.settings.check_interval()) => {}
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        info!("Heartbeat monitor shutting down");
                        break;
                    }
                }
            }
        }
    }

    /// One continuous-mode iteration. Returns the alert that was sent, if any.
    pub async fn run_cycle(&mut self) -> Option<AlertKind> {
        let span = info_span!("check", check_id = %Uuid::new_v4());

        async {
            let report = match self.spawn_check().await {
                Ok(report) => report,
                Err(e) => {
                    error!("Monitoring error: {}", describe_join_error(e));
                    return None;
                }
            };

            let now = self.local_now();
            let alert = continuous_alert(
                self.last_status,
                report.status,
                now.minute(),
                self.settings.report_minute,
            );

            if let Some(kind) = alert {
                self.send_alert(kind, now, &report).await;
            }

            self.last_status = LastStatus::Known(report.status);
            info!("Status: {}", report.status);

            alert
        }
        .instrument(span)
        .await
    }

    /// Single-check mode. Alerts only when the target is not healthy, or when
    /// the check itself could not complete.
    pub async fn run_once(&self) -> Option<AlertKind> {
        let span = info_span!("check", check_id = %Uuid::new_v4());

        async {
            let report = match self.spawn_check().await {
                Ok(report) => report,
                Err(e) => {
                    let description = describe_join_error(e);
                    error!("Health check routine failed: {}", description);
                    let report = HealthReport::unhealthy(description);
                    self.send_alert(AlertKind::ScriptError, self.local_now(), &report)
                        .await;
                    return Some(AlertKind::ScriptError);
                }
            };

            info!("Status: {}", report.status);

            let kind = single_check_alert(report.status)?;
            self.send_alert(kind, self.local_now(), &report).await;
            Some(kind)
        }
        .instrument(span)
        .await
    }

    // Probe and notifier each run on their own task so a panic inside
    // either surfaces as a JoinError instead of unwinding through the driver.
    async fn spawn_check(&self) -> Result<HealthReport, JoinError> {
        let probe = self.probe.clone();
        let base_url = self.settings.server_url.clone();

        tokio::spawn(async move { probe.check(&base_url).await }).await
    }

    async fn send_alert(&self, kind: AlertKind, now: DateTime<FixedOffset>, report: &HealthReport) {
        let timestamp = format_timestamp(now, &self.settings.zone_label);
        let message = render_alert(
            kind,
            &AlertContext {
                timestamp: &timestamp,
                server_url: &self.settings.server_url,
                response_time: report.response_time.as_deref(),
                error: report.error.as_deref(),
            },
        );

        info!("Sending {:?} notification", kind);
        let notifier = self.notifier.clone();
        let delivery = tokio::spawn(async move { notifier.notify(&message).await });
        if let Err(e) = delivery.await {
            error!("Notification delivery failed: {}", describe_join_error(e));
        }
    }

    fn local_now(&self) -> DateTime<FixedOffset> {
        (self.clock)().with_timezone(&self.settings.timezone())
    }
}

fn describe_join_error(e: JoinError) -> String {
    if !e.is_panic() {
        return e.to_string();
    }

    let payload = e.into_panic();
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("task panicked: {}", message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("task panicked: {}", message)
    } else {
        "task panicked".to_string()
    }
}
