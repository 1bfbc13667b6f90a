//! The notification collaborator.
//!
//! Notifications are best-effort and never part of a database transaction:
//! [`Notifier::send`] reports whether the message was delivered and the
//! caller decides how to surface a failure.

use async_trait::async_trait;
use serde_json::Value;

/// The messages the marketplace sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationTemplate {
    /// Sent to each confirmed passenger when a ride finishes. Data: `username`,
    /// `from_city`, `to_city`, `link`.
    ReviewInvitation,
    /// Sent to each refunded passenger when a driver cancels. Data: `username`,
    /// `from_city`, `to_city`, `refunded`.
    RideCancelled,
}

impl NotificationTemplate {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ReviewInvitation => "review_invitation",
            Self::RideCancelled => "ride_cancelled",
        }
    }

    /// Render subject and plain-text body from template data. Missing keys
    /// render as empty strings.
    pub fn render(self, data: &Value) -> Notification {
        let field = |key: &str| match data.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        };
        match self {
            Self::ReviewInvitation => Notification {
                subject: format!(
                    "[EcoRide] How was your ride {} → {}?",
                    field("from_city"),
                    field("to_city")
                ),
                body: format!(
                    "Hello {},\n\nYour ride from {} to {} has arrived. \
                     Tell us how it went:\n{}\n\nThis link expires in a few days.",
                    field("username"),
                    field("from_city"),
                    field("to_city"),
                    field("link")
                ),
            },
            Self::RideCancelled => Notification {
                subject: format!(
                    "[EcoRide] Ride {} → {} cancelled",
                    field("from_city"),
                    field("to_city")
                ),
                body: format!(
                    "Hello {},\n\nThe driver cancelled the ride from {} to {}. \
                     {} credits have been returned to your balance.",
                    field("username"),
                    field("from_city"),
                    field("to_city"),
                    field("refunded")
                ),
            },
        }
    }
}

/// A rendered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub body: String,
}

/// Delivers notifications to users.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send `template` rendered with `data` to `recipient`. Returns whether
    /// the message was delivered. Implementations log their own failures.
    async fn send(&self, recipient: &str, template: NotificationTemplate, data: &Value) -> bool;
}

/// Notifier used when no SMTP server is configured: writes the message to
/// the log and reports it as delivered.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, recipient: &str, template: NotificationTemplate, data: &Value) -> bool {
        let message = template.render(data);
        tracing::info!(
            to = recipient,
            template = template.as_str(),
            subject = %message.subject,
            "Notification (log only)"
        );
        true
    }
}
