// src/policy/decision.rs
use crate::health::HealthStatus;
use crate::notify::AlertKind;

/// Status remembered from the previous cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LastStatus {
    #[default]
    Unknown,
    Known(HealthStatus),
}

impl LastStatus {
    pub fn differs_from(&self, current: HealthStatus) -> bool {
        match self {
            LastStatus::Unknown => true,
            LastStatus::Known(previous) => *previous != current,
        }
    }
}

/// Continuous mode: alert on any transition, and on every check that lands on
/// the report minute. An `Unknown` previous status counts as a transition, so
/// the first cycle always reports.
pub fn continuous_alert(
    previous: LastStatus,
    current: HealthStatus,
    minute: u32,
    report_minute: u32,
) -> Option<AlertKind> {
    let status_changed = previous.differs_from(current);
    let hourly_report = minute == report_minute;

    if !status_changed && !hourly_report {
        return None;
    }

    Some(match current {
        HealthStatus::Healthy if status_changed => AlertKind::Recovered,
        HealthStatus::Healthy => AlertKind::ScheduledCheck,
        HealthStatus::Down => AlertKind::ServerDown,
        HealthStatus::Unhealthy => AlertKind::Degraded,
    })
}

/// Single-check mode: stay quiet unless something is wrong.
pub fn single_check_alert(current: HealthStatus) -> Option<AlertKind> {
    match current {
        HealthStatus::Healthy => None,
        HealthStatus::Down => Some(AlertKind::ServerDown),
        HealthStatus::Unhealthy => Some(AlertKind::Degraded),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn status() -> impl Strategy<Value = HealthStatus> {
        prop_oneof![
            Just(HealthStatus::Healthy),
            Just(HealthStatus::Unhealthy),
            Just(HealthStatus::Down),
        ]
    }

    fn last_status() -> impl Strategy<Value = LastStatus> {
        prop_oneof![Just(LastStatus::Unknown), status().prop_map(LastStatus::Known)]
    }

    #[test]
    fn test_healthy_to_down_off_the_hour() {
        let alert = continuous_alert(
            LastStatus::Known(HealthStatus::Healthy),
            HealthStatus::Down,
            17,
            0,
        );
        assert_eq!(alert, Some(AlertKind::ServerDown));
    }

    #[test]
    fn test_steady_healthy_on_the_hour() {
        let alert = continuous_alert(
            LastStatus::Known(HealthStatus::Healthy),
            HealthStatus::Healthy,
            0,
            0,
        );
        assert_eq!(alert, Some(AlertKind::ScheduledCheck));
    }

    #[test]
    fn test_unhealthy_to_healthy_is_recovery() {
        let alert = continuous_alert(
            LastStatus::Known(HealthStatus::Unhealthy),
            HealthStatus::Healthy,
            23,
            0,
        );
        assert_eq!(alert, Some(AlertKind::Recovered));
    }

    #[test]
    fn test_steady_unhealthy_on_the_hour_repeats_degraded() {
        let alert = continuous_alert(
            LastStatus::Known(HealthStatus::Unhealthy),
            HealthStatus::Unhealthy,
            0,
            0,
        );
        assert_eq!(alert, Some(AlertKind::Degraded));
    }

    #[test]
    fn test_first_cycle_always_reports() {
        assert_eq!(
            continuous_alert(LastStatus::Unknown, HealthStatus::Healthy, 42, 0),
            Some(AlertKind::Recovered)
        );
        assert_eq!(
            continuous_alert(LastStatus::Unknown, HealthStatus::Unhealthy, 42, 0),
            Some(AlertKind::Degraded)
        );
    }

    #[test]
    fn test_custom_report_minute() {
        let steady = LastStatus::Known(HealthStatus::Healthy);
        assert_eq!(continuous_alert(steady, HealthStatus::Healthy, 0, 30), None);
        assert_eq!(
            continuous_alert(steady, HealthStatus::Healthy, 30, 30),
            Some(AlertKind::ScheduledCheck)
        );
    }

    #[test]
    fn test_single_check_mode() {
        assert_eq!(single_check_alert(HealthStatus::Healthy), None);
        assert_eq!(
            single_check_alert(HealthStatus::Down),
            Some(AlertKind::ServerDown)
        );
        assert_eq!(
            single_check_alert(HealthStatus::Unhealthy),
            Some(AlertKind::Degraded)
        );
    }

    proptest! {
        #[test]
        fn prop_decision_is_deterministic(
            previous in last_status(),
            current in status(),
            minute in 0u32..60,
        ) {
            prop_assert_eq!(
                continuous_alert(previous, current, minute, 0),
                continuous_alert(previous, current, minute, 0)
            );
        }

        #[test]
        fn prop_steady_status_off_the_hour_is_silent(
            current in status(),
            minute in 1u32..60,
        ) {
            prop_assert_eq!(
                continuous_alert(LastStatus::Known(current), current, minute, 0),
                None
            );
        }

        #[test]
        fn prop_transition_to_down_always_alerts(
            previous in prop_oneof![Just(HealthStatus::Healthy), Just(HealthStatus::Unhealthy)],
            minute in 0u32..60,
        ) {
            prop_assert_eq!(
                continuous_alert(LastStatus::Known(previous), HealthStatus::Down, minute, 0),
                Some(AlertKind::ServerDown)
            );
        }

        #[test]
        fn prop_single_check_alerts_iff_not_healthy(current in status()) {
            prop_assert_eq!(
                single_check_alert(current).is_some(),
                current != HealthStatus::Healthy
            );
        }
    }
}
