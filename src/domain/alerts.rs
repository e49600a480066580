//! Transient admin notifications
//!
//! An [`AlertCenter`] is owned by whoever renders notifications and handed to
//! the code that raises them. An alert is shown, dismisses itself once its
//! duration has elapsed, and is cleared on navigation.

use std::time::{Duration, Instant};

use crate::AdminError;

pub const ERROR_DURATION: Duration = Duration::from_millis(5_000);
pub const SUCCESS_DURATION: Duration = Duration::from_millis(3_000);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertKind {
    Error,
    Success,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AlertVariant {
    #[default]
    Inline,
    Floating,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alert {
    pub message: String,
    pub kind: AlertKind,
    pub variant: AlertVariant,
    pub duration: Duration,
    shown_at: Instant,
}

impl Alert {
    pub fn expires_at(&self) -> Instant {
        self.shown_at + self.duration
    }
}

#[derive(Debug, Default)]
pub struct AlertCenter {
    current: Option<Alert>,
}

impl AlertCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, message: impl Into<String>, variant: AlertVariant, duration: Option<Duration>, now: Instant) {
        self.show(message.into(), AlertKind::Error, variant, duration.unwrap_or(ERROR_DURATION), now);
    }

    pub fn success(&mut self, message: impl Into<String>, variant: AlertVariant, duration: Option<Duration>, now: Instant) {
        self.show(message.into(), AlertKind::Success, variant, duration.unwrap_or(SUCCESS_DURATION), now);
    }

    /// Raises the outcome of a back-office action the way the admin UI reports it.
    pub fn report<T>(&mut self, outcome: &Result<T, AdminError>, success_message: &str, now: Instant) {
        match outcome {
            Ok(_) => self.success(success_message, AlertVariant::Floating, None, now),
            Err(e) if e.is_client_error() => self.error(e.to_string(), AlertVariant::Inline, None, now),
            Err(_) => self.error("Something went wrong. Please try again.", AlertVariant::Floating, None, now),
        }
    }

    /// The visible alert, if any. Expired alerts are dismissed here.
    pub fn visible(&mut self, now: Instant) -> Option<&Alert> {
        if self.current.as_ref().is_some_and(|a| now >= a.expires_at()) {
            self.current = None;
        }
        self.current.as_ref()
    }

    pub fn on_navigate(&mut self) {
        self.clear();
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    fn show(&mut self, message: String, kind: AlertKind, variant: AlertVariant, duration: Duration, now: Instant) {
        self.current = Some(Alert { message, kind, variant, duration, shown_at: now });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_dismiss() {
        let t0 = Instant::now();
        let mut alerts = AlertCenter::new();
        alerts.success("Saved", AlertVariant::Inline, None, t0);
        assert!(alerts.visible(t0 + Duration::from_millis(2_999)).is_some());
        assert!(alerts.visible(t0 + SUCCESS_DURATION).is_none());
    }

    #[test]
    fn test_newer_alert_replaces_older() {
        let t0 = Instant::now();
        let mut alerts = AlertCenter::new();
        alerts.success("Saved", AlertVariant::Inline, None, t0);
        alerts.error("Failed", AlertVariant::Floating, Some(Duration::from_secs(1)), t0);
        let shown = alerts.visible(t0).unwrap();
        assert_eq!(shown.kind, AlertKind::Error);
        assert_eq!(shown.variant, AlertVariant::Floating);
        assert_eq!(shown.expires_at(), t0 + Duration::from_secs(1));
    }

    #[test]
    fn test_navigation_clears() {
        let t0 = Instant::now();
        let mut alerts = AlertCenter::new();
        alerts.error("Failed", AlertVariant::Inline, None, t0);
        alerts.on_navigate();
        assert!(alerts.visible(t0).is_none());
    }

    #[test]
    fn test_report_hides_infrastructure_detail() {
        let t0 = Instant::now();
        let mut alerts = AlertCenter::new();
        let outcome: Result<(), AdminError> = Err(AdminError::Storage("connection refused".into()));
        alerts.report(&outcome, "Saved", t0);
        assert_eq!(alerts.visible(t0).unwrap().message, "Something went wrong. Please try again.");

        let outcome: Result<(), AdminError> = Err(AdminError::CategoryInUse(3));
        alerts.report(&outcome, "Deleted", t0);
        assert_eq!(alerts.visible(t0).unwrap().message, "Cannot delete: 3 products are still in this category.");
        assert_eq!(alerts.visible(t0).unwrap().duration, ERROR_DURATION);
    }
}
