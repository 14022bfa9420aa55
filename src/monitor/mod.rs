//! Live log and account-change monitoring for Solana programs
//!
//! The monitor is a single-cycle state machine (Stopped -> Monitoring ->
//! Stopped). Observed events arrive on an internal channel fed by an
//! [`EventSource`]; classified alerts and stats snapshots leave on an
//! outbound [`MonitorNotice`] channel, so consumers subscribe without the
//! monitor holding references to them.

pub mod classify;
pub mod rpc;


use std::collections::{HashMap, VecDeque};

use log::{debug, info, warn};
use serde_json::json;
use solana_pubkey::Pubkey;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time::{interval_at, Duration, Instant};

use crate::constants::{
    HIGH_VALUE_THRESHOLD, RAPID_UPDATE_THRESHOLD, RAPID_UPDATE_WINDOW_MS, STATS_INTERVAL_SECS,
};
use crate::errors::AuditorResult;
use crate::models::{Alert, AlertCategory, MonitoringStats, Severity};

use self::classify::{classify_error, classify_log_text, extract_amounts};

pub use self::rpc::{
    analyze_historical_transactions, HistoricalAnalysis, PollingEventSource, SignatureRecord,
};

/// Identifier of a registered subscription, retained for teardown.
pub type SubscriptionId = u64;

/// Log lines emitted by one confirmed transaction touching a program.
#[derive(Debug, Clone)]
pub struct ProgramLogEvent {
    pub program_id: Pubkey,
    pub signature: String,
    pub logs: Vec<String>,
    pub err: Option<String>,
}

/// A data change on an account owned by a monitored program.
#[derive(Debug, Clone)]
pub struct AccountChangeEvent {
    pub program_id: Pubkey,
    pub account: Pubkey,
    pub slot: u64,
    /// Observation time in unix milliseconds, stamped at the source
    pub observed_at_ms: u64,
}

/// Events delivered to the monitor's processing loop.
#[derive(Debug, Clone)]
pub enum MonitorEvent {
    Logs(ProgramLogEvent),
    AccountChange(AccountChangeEvent),
    Shutdown,
}

/// Notifications the monitor emits for reporting consumers.
#[derive(Debug, Clone)]
pub enum MonitorNotice {
    /// A classified alert
    Alert(Alert),
    /// The same alert, after it has been written to the log
    AlertLogged(Alert),
    /// Periodic stats snapshot
    StatsUpdate(MonitoringStats),
    /// Final stats snapshot on teardown
    MonitoringStopped(MonitoringStats),
}

/// Push-based subscription endpoint for program events.
///
/// Implementations deliver events into the sender they are handed at
/// subscription time. Registration happens inside an async runtime.
pub trait EventSource {
    /// Subscribe to log lines per confirmed transaction touching the program.
    fn subscribe_logs(
        &mut self,
        program_id: &Pubkey,
        events: UnboundedSender<MonitorEvent>,
    ) -> AuditorResult<SubscriptionId>;

    /// Subscribe to data changes on accounts owned by the program.
    fn subscribe_account_changes(
        &mut self,
        program_id: &Pubkey,
        events: UnboundedSender<MonitorEvent>,
    ) -> AuditorResult<SubscriptionId>;

    /// Tear down a subscription.
    fn unsubscribe(&mut self, id: SubscriptionId) -> AuditorResult<()>;
}

/// Monitor lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Stopped,
    Monitoring,
}

/// Handle for requesting shutdown of a running monitor loop.
#[derive(Clone)]
pub struct MonitorShutdown {
    events: UnboundedSender<MonitorEvent>,
}

impl MonitorShutdown {
    /// Ask the monitor loop to stop.
    pub fn shutdown(&self) {
        let _ = self.events.send(MonitorEvent::Shutdown);
    }
}

/// Live monitor over a set of Solana programs.
pub struct LogMonitor<S> {
    source: S,
    state: MonitorState,
    subscriptions: Vec<SubscriptionId>,
    stats: MonitoringStats,
    /// Per-account update timestamps inside the rapid-update window
    windows: HashMap<Pubkey, VecDeque<u64>>,
    events_tx: UnboundedSender<MonitorEvent>,
    events_rx: UnboundedReceiver<MonitorEvent>,
    notices: UnboundedSender<MonitorNotice>,
}

impl<S: EventSource> LogMonitor<S> {
    /// Create a monitor over the given event source.
    ///
    /// Returns the monitor and the receiving end of its notice channel.
    pub fn new(source: S) -> (Self, UnboundedReceiver<MonitorNotice>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (notices_tx, notices_rx) = mpsc::unbounded_channel();

        let monitor = Self {
            source,
            state: MonitorState::Stopped,
            subscriptions: Vec::new(),
            stats: MonitoringStats::default(),
            windows: HashMap::new(),
            events_tx,
            events_rx,
            notices: notices_tx,
        };

        (monitor, notices_rx)
    }

    /// Current lifecycle state.
    pub fn state(&self) -> MonitorState {
        self.state
    }

    /// Current stats counters.
    pub fn stats(&self) -> &MonitoringStats {
        &self.stats
    }

    /// Handle for stopping the monitor loop from elsewhere.
    pub fn shutdown_handle(&self) -> MonitorShutdown {
        MonitorShutdown {
            events: self.events_tx.clone(),
        }
    }

    /// Begin monitoring the given programs.
    ///
    /// Registers a log subscription and an account-change subscription per
    /// program. Calling start on a monitor that is already running logs a
    /// warning and changes nothing. A restart resets the stats counters.
    pub fn start(&mut self, programs: &[Pubkey]) -> AuditorResult<()> {
        if self.state == MonitorState::Monitoring {
            warn!("Monitor already running; start request ignored");
            return Ok(());
        }

        self.stats = MonitoringStats::default();
        self.windows.clear();

        for program_id in programs {
            let id = self
                .source
                .subscribe_logs(program_id, self.events_tx.clone())?;
            self.subscriptions.push(id);

            let id = self
                .source
                .subscribe_account_changes(program_id, self.events_tx.clone())?;
            self.subscriptions.push(id);
        }

        self.state = MonitorState::Monitoring;
        info!("Monitoring {} program(s)", programs.len());
        Ok(())
    }

    /// Stop monitoring and tear down every retained subscription.
    ///
    /// Teardown is best-effort: failures are logged and the remaining
    /// subscriptions are still released. Stopping an already-stopped monitor
    /// is a no-op.
    pub fn stop(&mut self) {
        if self.state == MonitorState::Stopped {
            debug!("stop() on a stopped monitor; nothing to do");
            return;
        }

        self.state = MonitorState::Stopped;

        for id in std::mem::take(&mut self.subscriptions) {
            if let Err(err) = self.source.unsubscribe(id) {
                warn!("Failed to tear down subscription {}: {}", id, err);
            }
        }

        info!(
            "Monitoring stopped: {} event(s), {} alert(s)",
            self.stats.total_events, self.stats.alerts_generated
        );
        let _ = self
            .notices
            .send(MonitorNotice::MonitoringStopped(self.stats.clone()));
    }

    /// Drive the processing loop until the monitor stops.
    ///
    /// Interleaves event handling with the periodic stats report; the timer
    /// exits together with the loop the first time it observes the stopped
    /// state.
    pub async fn run(&mut self) {
        let period = Duration::from_secs(STATS_INTERVAL_SECS);
        let mut ticker = interval_at(Instant::now() + period, period);

        loop {
            if self.state != MonitorState::Monitoring {
                break;
            }

            tokio::select! {
                event = self.events_rx.recv() => match event {
                    Some(MonitorEvent::Logs(event)) => self.handle_log_event(&event),
                    Some(MonitorEvent::AccountChange(event)) => self.handle_account_change(&event),
                    Some(MonitorEvent::Shutdown) | None => self.stop(),
                },
                _ = ticker.tick() => self.report_stats(),
            }
        }
    }

    /// Classify one log event and update the counters.
    pub fn handle_log_event(&mut self, event: &ProgramLogEvent) {
        self.stats.total_events += 1;
        self.stats.record_program_activity(&event.program_id);

        let text = event.logs.join("\n");
        let mut alerts_emitted = 0u64;

        for pattern in classify_log_text(&text) {
            let alert = Alert::new(
                AlertCategory::Attack,
                Severity::High,
                &event.program_id,
                format!(
                    "pattern '{}' matched in transaction {}",
                    pattern.name(),
                    event.signature
                ),
            )
            .with_metadata(json!({
                "pattern": pattern.name(),
                "signature": event.signature,
            }));
            self.emit_alert(alert);
            alerts_emitted += 1;
        }

        if let Some(amount) = extract_amounts(&text)
            .into_iter()
            .find(|&amount| amount > HIGH_VALUE_THRESHOLD)
        {
            let alert = Alert::new(
                AlertCategory::HighValue,
                Severity::Medium,
                &event.program_id,
                format!(
                    "transfer of {} base units in transaction {}",
                    amount, event.signature
                ),
            )
            .with_metadata(json!({
                "amount": amount,
                "signature": event.signature,
            }));
            self.emit_alert(alert);
            alerts_emitted += 1;
        }

        if alerts_emitted > 0 {
            self.stats.suspicious_events += 1;
        }

        // Error classification is independent of alert emission.
        if let Some(err) = &event.err {
            if let Some(bucket) = classify_error(err) {
                self.stats.record_attack_pattern(bucket.name());
            }
        }
    }

    /// Track one account change in its sliding window.
    pub fn handle_account_change(&mut self, event: &AccountChangeEvent) {
        self.stats.total_events += 1;

        let updates_in_window = {
            let window = self.windows.entry(event.account).or_default();
            let cutoff = event.observed_at_ms.saturating_sub(RAPID_UPDATE_WINDOW_MS);
            while window.front().is_some_and(|&at| at < cutoff) {
                window.pop_front();
            }
            window.push_back(event.observed_at_ms);
            window.len()
        };

        if updates_in_window > RAPID_UPDATE_THRESHOLD {
            let alert = Alert::new(
                AlertCategory::Anomaly,
                Severity::Medium,
                &event.program_id,
                format!(
                    "rapid state mutation: {} updates to {} within {}ms",
                    updates_in_window, event.account, RAPID_UPDATE_WINDOW_MS
                ),
            )
            .with_metadata(json!({
                "account": event.account.to_string(),
                "slot": event.slot,
            }));
            self.emit_alert(alert);
            self.stats.suspicious_events += 1;
        }
    }

    fn emit_alert(&mut self, alert: Alert) {
        self.stats.alerts_generated += 1;
        warn!(
            "ALERT [{:?}/{:?}] program {}: {}",
            alert.category, alert.severity, alert.program_id, alert.detail
        );
        let _ = self.notices.send(MonitorNotice::Alert(alert.clone()));
        let _ = self.notices.send(MonitorNotice::AlertLogged(alert));
    }

    fn report_stats(&self) {
        info!(
            "Stats: {} event(s), {} suspicious, {} alert(s)",
            self.stats.total_events, self.stats.suspicious_events, self.stats.alerts_generated
        );
        let _ = self
            .notices
            .send(MonitorNotice::StatsUpdate(self.stats.clone()));
    }
}
