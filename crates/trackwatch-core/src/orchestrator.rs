use crate::engine::{poll_items, TickReport};
use crate::error::Result;
use crate::notify::Notifier;
use crate::provider::TrackingProvider;
use crate::schedule::{is_eligible, SchedulingPolicy};
use crate::store::Store;
use chrono::{DateTime, Utc};

/// Runs one full load-schedule-poll-save cycle. The caller owns the
/// wall-clock cadence; `tick` takes `&mut self`, so a driver cannot
/// start a tick while a previous one is in flight.
pub struct Orchestrator<P: TrackingProvider, N: Notifier> {
    store: Store,
    policy: Box<dyn SchedulingPolicy>,
    provider: P,
    notifier: N,
}

impl<P: TrackingProvider, N: Notifier> Orchestrator<P, N> {
    pub fn new(
        store: Store,
        policy: Box<dyn SchedulingPolicy>,
        provider: P,
        notifier: N,
    ) -> Self {
        Self {
            store,
            policy,
            provider,
            notifier,
        }
    }

    pub fn tick(&mut self) -> Result<TickReport> {
        self.tick_at(Utc::now())
    }

    /// Ticks more frequent than the computed interval are no-ops for
    /// items whose interval has not elapsed; a tick with nothing
    /// eligible never rewrites the store.
    pub fn tick_at(&mut self, now: DateTime<Utc>) -> Result<TickReport> {
        let mut items = self.store.load()?;

        let active = items.values().filter(|i| !i.delivered).count();
        let interval = self.policy.interval_minutes(active);

        let eligible: Vec<String> = items
            .values()
            .filter(|i| is_eligible(i, now, interval))
            .map(|i| i.code.clone())
            .collect();

        tracing::info!(
            active,
            interval_minutes = interval,
            eligible = eligible.len(),
            "tick"
        );

        let report = poll_items(&mut items, &eligible, &self.provider, &self.notifier, now);
        if report.mutated {
            self.store.save(&items)?;
        }
        Ok(report)
    }
}
