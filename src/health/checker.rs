// src/health/checker.rs
use super::status::HealthReport;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tokio::time::{timeout, Duration, Instant};
use tracing::{debug, warn};
use url::Url;

pub const RESPONSE_TIME_HEADER: &str = "X-Process-Time";
pub const CONNECTION_REFUSED: &str = "Connection refused - server is not running";

const HEALTH_PATH: &str = "health";

/// Anything that can turn a base URL into a [`HealthReport`].
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn check(&self, base_url: &str) -> HealthReport;
}

#[derive(Debug, Clone)]
pub struct HealthChecker {
    client: Client,
    timeout: Duration,
}

impl HealthChecker {
    pub fn new(request_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            timeout: request_timeout,
        })
    }

    /// Probe `{base_url}/health` once and classify the outcome.
    pub async fn check(&self, base_url: &str) -> HealthReport {
        let url = match health_url(base_url) {
            Ok(url) => url,
            Err(e) => return HealthReport::unhealthy(e.to_string()),
        };

        let start = Instant::now();
        let result = timeout(self.timeout, self.probe(url.clone())).await;
        let elapsed = start.elapsed();

        let report = match result {
            Ok(Ok(report)) => report,
            Ok(Err(e)) if e.is_timeout() => HealthReport::unhealthy(self.timeout_message()),
            Ok(Err(e)) if e.is_connect() => {
                debug!("Connection to {} failed: {}", url, e);
                HealthReport::down(CONNECTION_REFUSED)
            }
            Ok(Err(e)) => HealthReport::unhealthy(e.to_string()),
            Err(_) => HealthReport::unhealthy(self.timeout_message()),
        };

        match &report.error {
            None => debug!("Health check on {} succeeded in {:?}", url, elapsed),
            Some(error) => warn!(
                "Health check on {} returned {}: {}",
                url, report.status, error
            ),
        }

        report
    }

    async fn probe(&self, url: Url) -> Result<HealthReport, reqwest::Error> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Ok(HealthReport::unhealthy(format!("HTTP {}", status.as_u16())));
        }

        let response_time = response
            .headers()
            .get(RESPONSE_TIME_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        let body = response.json::<serde_json::Value>().await?;
        Ok(HealthReport::healthy(response_time, body))
    }

    fn timeout_message(&self) -> String {
        format!("Request timeout ({}s)", self.timeout.as_secs())
    }
}

#[async_trait]
impl HealthProbe for HealthChecker {
    async fn check(&self, base_url: &str) -> HealthReport {
        HealthChecker::check(self, base_url).await
    }
}

fn health_url(base_url: &str) -> Result<Url, url::ParseError> {
    Url::parse(&format!("{}/{}", base_url.trim_end_matches('/'), HEALTH_PATH))
}
