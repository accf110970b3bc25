use crate::item::TrackedItem;
use chrono::{DateTime, Duration, Utc};

pub const MINUTES_PER_DAY: u32 = 1440;
pub const DAYS_PER_MONTH: u32 = 30;

/// Computes the minimum allowed interval between polls of one item.
/// Selected once at startup; the per-tick logic never branches on
/// which policy is in effect.
pub trait SchedulingPolicy {
    fn interval_minutes(&self, active_items: usize) -> u32;
}

/// Fixed short interval for development and manual testing.
#[derive(Debug, Clone, Copy)]
pub struct FixedInterval(pub u32);

impl SchedulingPolicy for FixedInterval {
    fn interval_minutes(&self, _active_items: usize) -> u32 {
        self.0
    }
}

/// Spreads a daily call allowance across the active items. A safety
/// margin is reserved below the allowance so manual probes and
/// off-schedule calls cannot blow the budget.
#[derive(Debug, Clone, Copy)]
pub struct QuotaDerivedInterval {
    pub daily_allowance: u32,
    pub safety_margin: u32,
}

impl QuotaDerivedInterval {
    pub fn new(daily_allowance: u32, safety_margin: u32) -> Self {
        Self {
            daily_allowance,
            safety_margin,
        }
    }

    fn working_budget(&self) -> u32 {
        self.daily_allowance.saturating_sub(self.safety_margin).max(1)
    }
}

impl SchedulingPolicy for QuotaDerivedInterval {
    fn interval_minutes(&self, active_items: usize) -> u32 {
        let n = active_items.max(1) as u32;
        // floor(1440 / (budget / n)), kept in integer arithmetic.
        MINUTES_PER_DAY * n / self.working_budget()
    }
}

/// An item may be polled this tick iff it is not delivered and its
/// interval has elapsed since the last check. The boundary is strict:
/// `now == last + interval` is not yet eligible.
pub fn is_eligible(item: &TrackedItem, now: DateTime<Utc>, interval_minutes: u32) -> bool {
    if item.delivered {
        return false;
    }
    match item.last_checked_at {
        None => true,
        Some(last) => now > last + Duration::minutes(i64::from(interval_minutes)),
    }
}
