// src/health/mod.rs
mod checker;
mod status;

pub use checker::{HealthChecker, HealthProbe, CONNECTION_REFUSED, RESPONSE_TIME_HEADER};
pub use status::{HealthReport, HealthStatus};
