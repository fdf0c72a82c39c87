use crate::shared::usecase::UseCase;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use storefront_domain::{render_cart_reminder, CartCandidate, EmailBranding};
use storefront_infra::{OutgoingEmail, StorefrontContext};
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

/// One pass of the abandoned cart nurture sequence over every customer
/// with an active cart snapshot.
///
/// Each customer gets at most one reminder per pass, and the reminder is only
/// recorded as sent after the mail transport accepted it. Failures and
/// panics are contained to the customer they happened for.
#[derive(Debug)]
pub struct SendCartRemindersUseCase {}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// Customers with an active cart snapshot
    pub candidates: usize,
    /// Reminders delivered and recorded
    pub sent: usize,
    /// Reminders that were due but could not be delivered or recorded
    pub failed: usize,
    /// The pass was skipped because no mail transport is configured
    pub mail_disabled: bool,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

#[derive(Debug, PartialEq)]
enum ReminderOutcome {
    NotDue,
    Sent,
    Failed,
}

async fn process_candidate(
    candidate: &CartCandidate,
    now: i64,
    branding: &EmailBranding,
    ctx: &StorefrontContext,
) -> ReminderOutcome {
    let reminder = match ctx.config.cart_nurture.policy.decide(now, &candidate.cart) {
        Some(reminder) => reminder,
        None => return ReminderOutcome::NotDue,
    };
    let snapshot_at = match candidate.cart.snapshot_at {
        Some(snapshot_at) => snapshot_at,
        None => return ReminderOutcome::NotDue,
    };

    let rendered = render_cart_reminder(
        reminder,
        &candidate.first_name,
        &candidate.cart.items,
        branding,
    );
    let email = OutgoingEmail {
        to: candidate.email.clone(),
        subject: rendered.subject,
        html: rendered.html,
    };

    let send_timeout = ctx.config.cart_nurture.send_timeout;
    match timeout(send_timeout, ctx.mailer.send(&email)).await {
        Ok(Ok(())) => {
            info!(
                "Abandoned cart email #{} sent to {}",
                reminder.number(),
                candidate.email
            );
        }
        Ok(Err(e)) => {
            warn!(
                "Failed to send abandoned cart email #{} to {}: {:?}",
                reminder.number(),
                candidate.email,
                e
            );
            return ReminderOutcome::Failed;
        }
        Err(_) => {
            warn!(
                "Sending abandoned cart email #{} to {} timed out after {:?}",
                reminder.number(),
                candidate.email,
                send_timeout
            );
            return ReminderOutcome::Failed;
        }
    }

    match ctx
        .repos
        .customers
        .set_reminder_sent(&candidate.customer_id, snapshot_at, reminder)
        .await
    {
        Ok(true) => ReminderOutcome::Sent,
        Ok(false) => {
            // Checkout or cart change while the email was in flight
            info!(
                "Cart of customer {} changed while sending abandoned cart email #{}, not recording it",
                candidate.customer_id,
                reminder.number()
            );
            ReminderOutcome::Sent
        }
        Err(e) => {
            error!(
                "Unable to record abandoned cart email #{} for customer {}: {:?}",
                reminder.number(),
                candidate.customer_id,
                e
            );
            ReminderOutcome::Failed
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendCartRemindersUseCase {
    type Response = CycleReport;

    type Error = UseCaseError;

    const NAME: &'static str = "SendCartReminders";

    async fn execute(&mut self, ctx: &StorefrontContext) -> Result<Self::Response, Self::Error> {
        if !ctx.mailer.is_configured() {
            debug!("Mail transport is not configured, skipping abandoned cart reminders");
            return Ok(CycleReport {
                mail_disabled: true,
                ..Default::default()
            });
        }

        let candidates = ctx
            .repos
            .customers
            .find_cart_candidates()
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        let now = ctx.sys.get_timestamp_millis();
        let branding = EmailBranding {
            store_name: ctx.config.store_name(),
            base_url: ctx.config.frontend_url.clone(),
        };

        let mut report = CycleReport {
            candidates: candidates.len(),
            ..Default::default()
        };
        for candidate in &candidates {
            let outcome = AssertUnwindSafe(process_candidate(candidate, now, &branding, ctx))
                .catch_unwind()
                .await
                .unwrap_or_else(|_| {
                    error!(
                        "Abandoned cart email for customer {} panicked",
                        candidate.customer_id
                    );
                    ReminderOutcome::Failed
                });
            match outcome {
                ReminderOutcome::Sent => report.sent += 1,
                ReminderOutcome::Failed => report.failed += 1,
                ReminderOutcome::NotDue => {}
            }
        }

        Ok(report)
    }
}
