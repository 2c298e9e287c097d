use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Atomic counters tracking pipeline outcomes.
///
/// All counters use relaxed ordering. For a consistent point-in-time view,
/// call [`snapshot`](Self::snapshot).
#[derive(Debug, Default)]
pub struct GatewayMetrics {
    /// Events handed to the pipeline.
    pub events_received: AtomicU64,
    /// Events where at least one path could not read its store.
    pub events_failed: AtomicU64,
    /// Rules that matched, summed over all events.
    pub rules_matched: AtomicU64,
    /// Rule action intents dispatched.
    pub actions_dispatched: AtomicU64,
    /// Rule action intents that returned `ok: true`.
    pub actions_succeeded: AtomicU64,
    /// Rule action intents that returned `ok: false`.
    pub actions_failed: AtomicU64,
    /// Workflows whose trigger matched and whose steps ran.
    pub workflows_executed: AtomicU64,
    /// Enabled workflow steps dispatched.
    pub steps_attempted: AtomicU64,
    /// Workflow steps that returned `ok: false`.
    pub steps_failed: AtomicU64,
}

fn add(counter: &AtomicU64, n: usize) {
    counter.fetch_add(u64::try_from(n).unwrap_or(u64::MAX), Ordering::Relaxed);
}

impl GatewayMetrics {
    pub fn increment_events_received(&self) {
        self.events_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_events_failed(&self) {
        self.events_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_rules_matched(&self, n: usize) {
        add(&self.rules_matched, n);
    }

    /// Record a batch of dispatched rule actions.
    pub fn record_actions(&self, succeeded: usize, failed: usize) {
        add(&self.actions_dispatched, succeeded + failed);
        add(&self.actions_succeeded, succeeded);
        add(&self.actions_failed, failed);
    }

    /// Record one executed workflow.
    pub fn record_workflow(&self, attempted: usize, failed: usize) {
        self.workflows_executed.fetch_add(1, Ordering::Relaxed);
        add(&self.steps_attempted, attempted);
        add(&self.steps_failed, failed);
    }

    /// Take a consistent point-in-time snapshot of all counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            events_received: self.events_received.load(Ordering::Relaxed),
            events_failed: self.events_failed.load(Ordering::Relaxed),
            rules_matched: self.rules_matched.load(Ordering::Relaxed),
            actions_dispatched: self.actions_dispatched.load(Ordering::Relaxed),
            actions_succeeded: self.actions_succeeded.load(Ordering::Relaxed),
            actions_failed: self.actions_failed.load(Ordering::Relaxed),
            workflows_executed: self.workflows_executed.load(Ordering::Relaxed),
            steps_attempted: self.steps_attempted.load(Ordering::Relaxed),
            steps_failed: self.steps_failed.load(Ordering::Relaxed),
        }
    }
}

/// A plain data snapshot of [`GatewayMetrics`] at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub events_received: u64,
    pub events_failed: u64,
    pub rules_matched: u64,
    pub actions_dispatched: u64,
    pub actions_succeeded: u64,
    pub actions_failed: u64,
    pub workflows_executed: u64,
    pub steps_attempted: u64,
    pub steps_failed: u64,
}
