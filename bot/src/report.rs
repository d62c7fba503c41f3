use crate::reconcile::thousands;
use crate::scheduler::StopReason;
use crate::trader::Outcome;
use rolimons::RequestTag;
use std::time::Duration;
use time::OffsetDateTime;

/// Receives everything a cycle or the scheduler wants the operator to see.
pub(crate) trait Reporter: Send + Sync {
    fn cycle_started(&self, cycle: u64);
    fn inventory_loaded(&self, tradeable: usize, on_hold: usize);
    fn offer_summary(&self, offer_count: usize, total_value: i64, tags: &[RequestTag]);
    fn warning(&self, message: &str);
    fn outcome(&self, outcome: &Outcome);
    fn next_run(&self, wait: Duration);
    fn stopped(&self, reason: StopReason);
}

/// Forwards reports to the `log` facade.
pub(crate) struct LogReporter;

impl Reporter for LogReporter {
    fn cycle_started(&self, cycle: u64) {
        log::info!("── Run #{cycle} ──");
    }

    fn inventory_loaded(&self, tradeable: usize, on_hold: usize) {
        log::debug!("Inventory: {tradeable} tradeable, {on_hold} on hold");
    }

    fn offer_summary(&self, offer_count: usize, total_value: i64, tags: &[RequestTag]) {
        log::info!(
            "Offering {offer_count} item(s) | total value: {}",
            thousands(total_value)
        );
        log::info!("Requesting: {}", join_tags(tags));
    }

    fn warning(&self, message: &str) {
        log::warn!("{message}");
    }

    fn outcome(&self, outcome: &Outcome) {
        match outcome {
            Outcome::Posted { ad_url } => log::info!("Trade ad posted! {ad_url}"),
            Outcome::Preview {
                offer_count,
                total_value,
            } => log::info!(
                "[DRY RUN] Trade ad with {offer_count} item(s) worth {} was NOT posted",
                thousands(*total_value)
            ),
            Outcome::Cooldown => {
                log::warn!("Cooldown not expired, Rolimons requires 15 minutes between posts")
            }
            Outcome::AuthFailure => {
                log::error!("Invalid or expired _RoliVerification cookie");
                log::error!("Update `roli_verification` in the config or set ROLI_VERIFICATION");
            }
            Outcome::RateLimited => log::error!("Rate limit reached (max 60 ads per 24 hours)"),
            Outcome::PrivateInventory(message) => log::error!("{message}"),
            Outcome::Failed(message) => log::error!("Unexpected error: {message}"),
        }
    }

    fn next_run(&self, wait: Duration) {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        let next = now + wait;
        log::info!(
            "Next run: {:02}:{:02}:{:02} (in {} min)",
            next.hour(),
            next.minute(),
            next.second(),
            wait.as_secs() / 60
        );
    }

    fn stopped(&self, reason: StopReason) {
        match reason {
            StopReason::Unrecoverable => {
                log::error!("Stopping bot, fix the problem above and restart")
            }
            StopReason::Cancelled => log::info!("Bot stopped."),
            StopReason::Completed => log::debug!("Single run finished"),
        }
    }
}

pub(crate) fn join_tags(tags: &[RequestTag]) -> String {
    tags.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
