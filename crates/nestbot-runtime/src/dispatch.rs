use std::time::Duration;

use anyhow::bail;
use nestbot_telegram::{ChatTransport, TransportError};
use tokio::sync::watch;

use crate::backoff::{
    FetchBackoff, DEFAULT_BACKOFF_CEILING_SECONDS, DEFAULT_MAX_CONSECUTIVE_FAILURES,
};
use crate::router::{CommandRouter, Effect};

pub const DEFAULT_POLL_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Requested long-poll timeout; the transport clamps it to the range the
    /// platform accepts.
    pub poll_timeout_seconds: u64,
    pub backoff_ceiling_seconds: u64,
    pub max_consecutive_failures: u32,
    /// Run a single fetch/route cycle and exit. Used for smoke testing a
    /// deployment without leaving a poller running.
    pub poll_once: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            poll_timeout_seconds: DEFAULT_POLL_TIMEOUT_SECONDS,
            backoff_ceiling_seconds: DEFAULT_BACKOFF_CEILING_SECONDS,
            max_consecutive_failures: DEFAULT_MAX_CONSECUTIVE_FAILURES,
            poll_once: false,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
/// Counters for one fetch/route cycle, logged after each successful cycle.
pub struct CycleReport {
    pub fetched_events: usize,
    pub handled_events: usize,
    pub handler_failures: usize,
}

/// Serial fetch/route/advance loop. Owns the cursor; each event is routed at
/// most once and the cursor advances past it whether or not its outbound
/// effect was delivered.
pub struct DispatchLoop<T: ChatTransport> {
    transport: T,
    router: CommandRouter,
    backoff: FetchBackoff,
    cursor: u64,
    config: DispatchConfig,
}

impl<T: ChatTransport> DispatchLoop<T> {
    pub fn new(transport: T, router: CommandRouter, config: DispatchConfig) -> Self {
        let backoff = FetchBackoff::new(
            config.backoff_ceiling_seconds,
            config.max_consecutive_failures,
        );
        Self {
            transport,
            router,
            backoff,
            cursor: 0,
            config,
        }
    }

    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    /// Runs until shutdown is signalled or the fetch failure streak exceeds
    /// the fatal threshold. Shutdown is checked between cycles and while
    /// sleeping in backoff, never mid-cycle.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> anyhow::Result<()> {
        loop {
            if *shutdown.borrow() {
                println!("dispatch loop stopping: reason=shutdown cursor={}", self.cursor);
                return Ok(());
            }
            match self.poll_once().await {
                Ok(report) => {
                    self.backoff.on_success();
                    println!(
                        "dispatch cycle: cursor={} fetched={} handled={} handler_failures={}",
                        self.cursor,
                        report.fetched_events,
                        report.handled_events,
                        report.handler_failures
                    );
                    if self.config.poll_once {
                        return Ok(());
                    }
                }
                Err(error) => {
                    let decision = self.backoff.on_failure();
                    if decision.should_stop {
                        bail!(
                            "fetch failure streak exceeded {} consecutive failures: {error}",
                            self.config.max_consecutive_failures
                        );
                    }
                    if self.config.poll_once {
                        return Err(error.into());
                    }
                    eprintln!(
                        "fetch failed: streak={} sleep_seconds={} error={error}",
                        self.backoff.consecutive_failures(),
                        decision.sleep_seconds
                    );
                    tokio::select! {
                        _ = shutdown.changed() => {}
                        _ = tokio::time::sleep(Duration::from_secs(decision.sleep_seconds)) => {}
                    }
                }
            }
        }
    }

    async fn poll_once(&mut self) -> Result<CycleReport, TransportError> {
        let events = self
            .transport
            .fetch_events(self.cursor, self.config.poll_timeout_seconds)
            .await?;
        let mut report = CycleReport {
            fetched_events: events.len(),
            ..CycleReport::default()
        };
        for event in &events {
            let effect = self.router.route(event).await;
            match self.execute_effect(effect).await {
                Ok(()) => report.handled_events = report.handled_events.saturating_add(1),
                Err(error) => {
                    report.handler_failures = report.handler_failures.saturating_add(1);
                    eprintln!("outbound delivery failed: event_id={} error={error}", event.id);
                }
            }
            // The cursor advances past every event, handled or not; failed
            // events are never redelivered.
            self.cursor = self.cursor.max(event.id);
        }
        Ok(report)
    }

    async fn execute_effect(&self, effect: Effect) -> Result<(), TransportError> {
        match effect {
            Effect::SendText { chat_id, text } => self.transport.send_text(chat_id, &text).await,
            Effect::SendTextWithOptions { chat_id, text, options } => {
                self.transport
                    .send_text_with_options(chat_id, &text, &options)
                    .await
            }
            Effect::AcknowledgeAction { action_id } => {
                self.transport.acknowledge_action(&action_id).await
            }
            Effect::NoOp => Ok(()),
        }
    }
}
