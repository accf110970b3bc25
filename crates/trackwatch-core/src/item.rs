use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status assigned when an item is created, before the first poll.
pub const AWAITING_STATUS: &str = "Awaiting";

/// Status recorded when the provider returns an empty event list.
pub const NO_STATUS: &str = "No status";

/// Substring (case-insensitive) that marks a status as terminal.
pub const DELIVERED_MARKER: &str = "delivered";

/// One tracked shipment: its code, last known status, and polling
/// bookkeeping. The store owns all instances; the poll engine borrows
/// them for the duration of one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedItem {
    pub code: String,
    pub label: String,
    pub status: String,
    #[serde(default)]
    pub delivered: bool,
    #[serde(default)]
    pub last_checked_at: Option<DateTime<Utc>>,
}

impl TrackedItem {
    pub fn new(code: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            label: label.into(),
            status: AWAITING_STATUS.to_string(),
            delivered: false,
            last_checked_at: None,
        }
    }

    /// Apply a freshly observed status. Returns true if the status
    /// changed from the stored one; sets the terminal flag when the
    /// new status contains the delivered marker.
    pub fn apply_status(&mut self, new_status: &str) -> bool {
        if new_status == self.status {
            return false;
        }
        self.status = new_status.to_string();
        if new_status.to_lowercase().contains(DELIVERED_MARKER) {
            self.delivered = true;
        }
        true
    }
}
