// src/health/status.rs
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
    Down,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Unhealthy => "unhealthy",
            HealthStatus::Down => "down",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single probe. Failures are carried as data.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub response_time: Option<String>,
    pub error: Option<String>,
    pub body: Option<serde_json::Value>,
}

impl HealthReport {
    pub fn healthy(response_time: Option<String>, body: serde_json::Value) -> Self {
        Self {
            status: HealthStatus::Healthy,
            response_time,
            error: None,
            body: Some(body),
        }
    }

    pub fn unhealthy(error: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Unhealthy,
            response_time: None,
            error: Some(error.into()),
            body: None,
        }
    }

    pub fn down(error: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Down,
            response_time: None,
            error: Some(error.into()),
            body: None,
        }
    }
}
