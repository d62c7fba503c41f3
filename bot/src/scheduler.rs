use crate::report::Reporter;
use crate::trader::{Outcome, Trader};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

/// Rolimons rejects posts closer together than this.
pub(crate) const MIN_INTERVAL: Duration = Duration::from_secs(15 * 60);
pub(crate) const RATE_LIMIT_BACKOFF: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    ContinueAtInterval,
    Backoff,
    Stop,
}

impl From<&Outcome> for Action {
    fn from(outcome: &Outcome) -> Self {
        match outcome {
            Outcome::Posted { .. }
            | Outcome::Preview { .. }
            | Outcome::Cooldown
            | Outcome::Failed(_) => Self::ContinueAtInterval,
            Outcome::RateLimited => Self::Backoff,
            Outcome::AuthFailure | Outcome::PrivateInventory(_) => Self::Stop,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StopReason {
    /// Needs the operator to fix credentials or privacy settings.
    Unrecoverable,
    Cancelled,
    /// Single cycle finished in run-once mode.
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum State {
    Idle,
    Running,
    WaitingInterval,
    WaitingBackoff,
    Stopped(StopReason),
}

pub(crate) struct Scheduler {
    trader: Trader,
    interval: Duration,
    reporter: Arc<dyn Reporter>,
    state: State,
    cycles: u64,
}

impl Scheduler {
    pub fn new(trader: Trader, interval: Duration, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            trader,
            interval: interval.max(MIN_INTERVAL),
            reporter,
            state: State::Idle,
            cycles: 0,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    fn wait_for(&self, action: Action) -> Option<(State, Duration)> {
        match action {
            Action::ContinueAtInterval => Some((State::WaitingInterval, self.interval)),
            Action::Backoff => Some((State::WaitingBackoff, RATE_LIMIT_BACKOFF)),
            Action::Stop => None,
        }
    }

    async fn cycle(&mut self) -> Outcome {
        self.state = State::Running;
        self.cycles += 1;
        self.reporter.cycle_started(self.cycles);

        let outcome = self.trader.run_cycle(self.reporter.as_ref()).await;
        self.reporter.outcome(&outcome);
        outcome
    }

    /// Executes exactly one cycle without entering the loop.
    pub async fn run_once(&mut self) -> Outcome {
        let outcome = self.cycle().await;
        self.state = State::Stopped(match Action::from(&outcome) {
            Action::Stop => StopReason::Unrecoverable,
            _ => StopReason::Completed,
        });
        outcome
    }

    /// Loops until an unrecoverable outcome or until `cancel` fires during a wait.
    pub async fn run(&mut self, cancel: CancellationToken) -> StopReason {
        let reason = loop {
            if cancel.is_cancelled() {
                break StopReason::Cancelled;
            }

            let outcome = self.cycle().await;
            let Some((waiting, wait)) = self.wait_for(Action::from(&outcome)) else {
                break StopReason::Unrecoverable;
            };

            self.state = waiting;
            self.reporter.next_run(wait);

            tokio::select! {
                _ = cancel.cancelled() => break StopReason::Cancelled,
                _ = sleep(wait) => {}
            }
        };

        self.state = State::Stopped(reason);
        self.reporter.stopped(reason);
        reason
    }
}
