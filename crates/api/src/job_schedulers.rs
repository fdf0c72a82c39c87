use crate::{
    cart::send_cart_reminders::{CycleReport, SendCartRemindersUseCase},
    shared::usecase::execute,
};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use storefront_infra::StorefrontContext;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};

/// Runs one abandoned cart pass. A panic inside the pass is logged and
/// contained so that the next pass still runs.
pub async fn run_cart_nurture_cycle(ctx: &StorefrontContext) -> Option<CycleReport> {
    let usecase = SendCartRemindersUseCase {};
    match AssertUnwindSafe(execute(usecase, ctx)).catch_unwind().await {
        Ok(Ok(report)) => {
            if report.sent > 0 || report.failed > 0 {
                info!(
                    "Abandoned cart pass done. Candidates: {}, sent: {}, failed: {}",
                    report.candidates, report.sent, report.failed
                );
            }
            Some(report)
        }
        // Already logged by the usecase executor
        Ok(Err(_)) => None,
        Err(_) => {
            error!("Abandoned cart pass panicked");
            None
        }
    }
}

/// Periodically sends abandoned cart reminders.
///
/// Passes run one after another on a single task, so a slow pass delays the
/// next one instead of overlapping it. Ticks missed while a pass was running
/// are skipped.
pub struct CartNurtureScheduler {
    ctx: StorefrontContext,
    handle: Option<JoinHandle<()>>,
}

impl CartNurtureScheduler {
    pub fn new(ctx: StorefrontContext) -> Self {
        Self { ctx, handle: None }
    }

    /// Starts the periodic passes. The first pass runs one interval after
    /// start. Calling this on a running scheduler does nothing.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }

        let ctx = self.ctx.clone();
        let period = ctx.config.cart_nurture.interval;
        info!("Starting abandoned cart scheduler with interval: {:?}", period);
        let handle = actix_web::rt::spawn(async move {
            let mut interval = interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                run_cart_nurture_cycle(&ctx).await;
            }
        });
        self.handle = Some(handle);
    }

    /// Stops future passes. Safe to call when the scheduler is not running.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            info!("Stopped abandoned cart scheduler");
        }
    }

    pub fn is_running(&self) -> bool {
        match &self.handle {
            Some(handle) => !handle.is_finished(),
            None => false,
        }
    }

    /// Runs a single pass right away, independent of the schedule
    pub async fn run_cycle(&self) -> Option<CycleReport> {
        run_cart_nurture_cycle(&self.ctx).await
    }
}

impl Drop for CartNurtureScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
