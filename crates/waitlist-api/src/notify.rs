//! Best-effort welcome email dispatch.
//!
//! Registration success is defined by durable persistence alone; whatever
//! happens here is logged and swallowed. Sends are bounded by a per-day
//! counter living in the record store, so the cap holds across processes.

use std::sync::Arc;

use chrono::Utc;
use resend_client::{ResendClient, SendEmailRequest};
use tracing::{error, info, warn};

use crate::signup::SignupRecord;
use crate::store::SignupStore;

/// Result of a notification attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Sent,
    Skipped(SkipReason),
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No Resend credential configured.
    NotConfigured,
    /// Today's quota is exhausted; no attempt is made.
    DailyCapReached,
}

/// Sends the welcome email for fresh signups.
pub struct Notifier {
    client: Option<ResendClient>,
    from: String,
    daily_cap: u32,
    store: Arc<dyn SignupStore>,
}

impl Notifier {
    pub fn new(
        client: Option<ResendClient>,
        from: impl Into<String>,
        daily_cap: u32,
        store: Arc<dyn SignupStore>,
    ) -> Self {
        Self {
            client,
            from: from.into(),
            daily_cap,
            store,
        }
    }

    /// Send the welcome email for a committed signup.
    pub async fn notify(&self, record: &SignupRecord) -> Outcome {
        let Some(client) = &self.client else {
            warn!(email = %record.email, "Resend not configured, skipping welcome email");
            return Outcome::Skipped(SkipReason::NotConfigured);
        };

        // Reserve quota before attempting: the cap bounds attempts (cost),
        // not successful deliveries.
        let today = Utc::now().date_naive();
        match self.store.try_reserve_send(today, self.daily_cap).await {
            Ok(true) => {}
            Ok(false) => {
                warn!(
                    email = %record.email,
                    cap = self.daily_cap,
                    "Daily email cap reached, skipping welcome email"
                );
                return Outcome::Skipped(SkipReason::DailyCapReached);
            }
            Err(e) => {
                error!(email = %record.email, error = %e, "Could not reserve email quota");
                return Outcome::Failed;
            }
        }

        let first_name = record.first_name.as_deref().unwrap_or("there");
        let request = SendEmailRequest {
            from: self.from.clone(),
            to: vec![record.email.clone()],
            subject: format!("Welcome to the Waitlist, {first_name}!"),
            html: welcome_html(first_name),
        };

        match client.send(&request).await {
            Ok(sent) => {
                info!(email = %record.email, id = %sent.id, "Welcome email sent");
                Outcome::Sent
            }
            Err(e) => {
                error!(email = %record.email, error = %e, "Welcome email failed");
                Outcome::Failed
            }
        }
    }
}

fn welcome_html(first_name: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body style="font-family: sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px;">
    <div style="font-size: 24px; font-weight: bold; margin-bottom: 20px;">Hey {first_name}, you're in!</div>
    <p>Thanks for signing up for our waitlist. We're thrilled to have you.</p>
    <div style="background: #f0f9ff; padding: 15px; border-radius: 8px; margin: 20px 0;">
        <strong>What happens next?</strong><br>
        We'll notify you as soon as it's your turn to get access. Stay tuned!
    </div>
    <p>In the meantime, keep an eye on your inbox for updates and early access opportunities.</p>
    <div style="font-size: 12px; color: #666; margin-top: 30px; border-top: 1px solid #eee; padding-top: 20px;">
        <p>You received this email because you signed up for our waitlist.</p>
    </div>
</body>
</html>"#
    )
}
