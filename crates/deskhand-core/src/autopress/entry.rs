//! A single running autopress entry.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, error, info_span, warn};

use deskhand_protocols::{InvocationSource, TargetContext};

use crate::sequence::{SequenceCommand, SequenceEngine, SequencePolicy, SequenceRecord};

/// Point-in-time view of an autopress entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutopressStatus {
    pub id: String,
    pub interval_ms: u64,
    pub commands: Vec<SequenceCommand>,
    /// Completed ticks.
    pub ticks: u64,
    /// Failed steps summed over all ticks.
    pub failed_steps: u64,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub(crate) struct EntryStats {
    ticks: AtomicU64,
    failed_steps: AtomicU64,
}

pub(crate) struct AutopressEntry {
    id: String,
    interval_ms: u64,
    commands: Arc<Vec<SequenceCommand>>,
    started_at: DateTime<Utc>,
    stats: Arc<EntryStats>,
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl AutopressEntry {
    /// Spawn the timer loop for a new entry. The first tick fires one
    /// interval after spawning.
    pub(crate) fn spawn(
        runtime: &tokio::runtime::Handle,
        id: String,
        commands: Vec<SequenceCommand>,
        interval_ms: u64,
        sequence: SequenceEngine,
        targets: TargetContext,
    ) -> Self {
        let commands = Arc::new(commands);
        let stats = Arc::new(EntryStats::default());
        let token = CancellationToken::new();

        let span = info_span!("autopress", id = %id);
        let handle = runtime.spawn(
            run_loop(
                id.clone(),
                commands.clone(),
                Duration::from_millis(interval_ms),
                sequence,
                targets,
                stats.clone(),
                token.clone(),
            )
            .instrument(span),
        );

        Self {
            id,
            interval_ms,
            commands,
            started_at: Utc::now(),
            stats,
            token,
            handle,
        }
    }

    /// Prevent any further tick from starting.
    pub(crate) fn cancel(&self) {
        self.token.cancel();
    }

    /// Cancel and wait for an in-flight tick to finish.
    pub(crate) async fn join(self) {
        self.token.cancel();
        if let Err(e) = self.handle.await {
            warn!("Autopress '{}' loop ended abnormally: {}", self.id, e);
        }
    }

    pub(crate) fn status(&self) -> AutopressStatus {
        AutopressStatus {
            id: self.id.clone(),
            interval_ms: self.interval_ms,
            commands: self.commands.as_ref().clone(),
            ticks: self.stats.ticks.load(Ordering::SeqCst),
            failed_steps: self.stats.failed_steps.load(Ordering::SeqCst),
            started_at: self.started_at,
        }
    }
}

async fn run_loop(
    id: String,
    commands: Arc<Vec<SequenceCommand>>,
    period: Duration,
    sequence: SequenceEngine,
    targets: TargetContext,
    stats: Arc<EntryStats>,
    token: CancellationToken,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = ticker.tick() => {}
        }
        if token.is_cancelled() {
            break;
        }

        // Each tick runs as its own task so a panicking step fails the tick
        // instead of ending the loop.
        let tick_task = tokio::spawn(
            run_tick(id.clone(), commands.clone(), sequence.clone(), targets.clone())
                .in_current_span(),
        );

        let outcome = tick_task.await;
        let tick = stats.ticks.fetch_add(1, Ordering::SeqCst) + 1;
        match outcome {
            Ok(record) if record.failed > 0 => {
                stats
                    .failed_steps
                    .fetch_add(record.failed as u64, Ordering::SeqCst);
                warn!(
                    "Tick {} finished with {}/{} failed steps",
                    tick, record.failed, record.executed
                );
            }
            Ok(_) => debug!("Tick {} finished", tick),
            Err(e) => {
                stats.failed_steps.fetch_add(1, Ordering::SeqCst);
                error!("Tick {} aborted: {}", tick, e);
            }
        }
    }

    debug!("Autopress loop stopped");
}

async fn run_tick(
    id: String,
    commands: Arc<Vec<SequenceCommand>>,
    sequence: SequenceEngine,
    targets: TargetContext,
) -> SequenceRecord {
    sequence
        .run(None, &commands, SequencePolicy::repeating(), &targets, |_| {
            InvocationSource::Autopress { id: id.clone() }
        })
        .await
}
