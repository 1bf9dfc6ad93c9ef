use serde::{Deserialize, Serialize};

use crate::types::{RiskAssessment, RiskColor};

pub const ALERTS_ENABLED_TITLE: &str = "AstraSync Alerts Enabled";
pub const ALERTS_ENABLED_BODY: &str = "You will receive risk notifications.";

/// Tillatelse fra OS/nettleser. `Default` = brukeren har ikke svart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Granted,
    Denied,
    Default,
}

/// Varslingstjenesten. Forbruker av scoreren, ikke en del av den.
pub trait Notifier {
    fn is_supported(&self) -> bool;
    fn permission(&self) -> Permission;
    fn request_permission(&mut self) -> Permission;
    fn notify(&mut self, title: &str, body: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertsStatus {
    Enabled,
    Denied,
    Unsupported,
}

/// Be om tillatelse og bekreft med et første varsel.
pub fn enable_alerts<N: Notifier + ?Sized>(notifier: &mut N) -> AlertsStatus {
    if !notifier.is_supported() {
        log::warn!("Notifications not supported on this platform");
        return AlertsStatus::Unsupported;
    }
    match notifier.request_permission() {
        Permission::Granted => {
            notifier.notify(ALERTS_ENABLED_TITLE, ALERTS_ENABLED_BODY);
            AlertsStatus::Enabled
        }
        Permission::Denied | Permission::Default => {
            log::info!("Notification permission denied");
            AlertsStatus::Denied
        }
    }
}

/// Varsle når risikoen er på eller over terskelen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertPolicy {
    pub threshold: RiskColor,
}

impl Default for AlertPolicy {
    fn default() -> Self {
        Self { threshold: RiskColor::Red }
    }
}

impl AlertPolicy {
    pub fn new(threshold: RiskColor) -> Self {
        Self { threshold }
    }

    pub fn should_alert(&self, assessment: &RiskAssessment) -> bool {
        assessment.risk_color >= self.threshold
    }

    /// Sender varsel hvis policyen slår til og tillatelse er gitt.
    /// Returnerer om et varsel faktisk ble sendt.
    pub fn dispatch<N: Notifier + ?Sized>(&self, notifier: &mut N, assessment: &RiskAssessment) -> bool {
        if !self.should_alert(assessment) {
            return false;
        }
        if !notifier.is_supported() || notifier.permission() != Permission::Granted {
            log::debug!(
                "alert for {} suppressed (no notification permission)",
                assessment.risk_color
            );
            return false;
        }
        let (title, body) = alert_message(assessment);
        notifier.notify(&title, &body);
        true
    }
}

pub fn alert_message(assessment: &RiskAssessment) -> (String, String) {
    let title = format!("AstraSync risk: {}", assessment.risk_color);
    let body = if assessment.reasons.is_empty() {
        format!("Confidence {}%", assessment.confidence)
    } else {
        format!(
            "{} (confidence {}%)",
            assessment.reasons.join(", "),
            assessment.confidence
        )
    };
    (title, body)
}

/// Skriver varsler til loggen. Nyttig på server og i hodeløse miljøer.
#[derive(Debug, Clone)]
pub struct LogNotifier {
    permission: Permission,
    answer: Permission,
    sent: usize,
}

impl LogNotifier {
    /// `answer` er svaret `request_permission` gir.
    pub fn new(answer: Permission) -> Self {
        Self { permission: Permission::Default, answer, sent: 0 }
    }

    pub fn granted() -> Self {
        Self { permission: Permission::Granted, answer: Permission::Granted, sent: 0 }
    }

    pub fn sent(&self) -> usize {
        self.sent
    }
}

impl Notifier for LogNotifier {
    fn is_supported(&self) -> bool {
        true
    }

    fn permission(&self) -> Permission {
        self.permission
    }

    fn request_permission(&mut self) -> Permission {
        self.permission = self.answer;
        self.permission
    }

    fn notify(&mut self, title: &str, body: &str) {
        self.sent += 1;
        log::warn!("[{}] {}", title, body);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_notifier_remembers_answer() {
        let mut n = LogNotifier::new(Permission::Granted);
        assert_eq!(n.permission(), Permission::Default);
        assert_eq!(enable_alerts(&mut n), AlertsStatus::Enabled);
        assert_eq!(n.permission(), Permission::Granted);
        assert_eq!(n.sent(), 1);
    }

    #[test]
    fn denied_sends_nothing() {
        let mut n = LogNotifier::new(Permission::Denied);
        assert_eq!(enable_alerts(&mut n), AlertsStatus::Denied);
        assert_eq!(n.sent(), 0);
    }
}
