use crate::error::TrackError;
use crate::item::NO_STATUS;
use crate::notify::{change_message, Notifier};
use crate::provider::TrackingProvider;
use crate::store::Items;
use chrono::{DateTime, Utc};

/// What happened to one item during a tick. Failures are carried here
/// so tests and callers can inspect them without parsing log output.
#[derive(Debug)]
pub enum PollOutcome {
    StatusChanged { status: String, delivered: bool },
    Unchanged,
    Failed(TrackError),
}

#[derive(Debug, Default)]
pub struct TickReport {
    pub outcomes: Vec<(String, PollOutcome)>,
    pub mutated: bool,
}

impl TickReport {
    pub fn changed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, PollOutcome::StatusChanged { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, PollOutcome::Failed(_)))
            .count()
    }
}

/// Poll every eligible item once. Each item is handled independently:
/// a lookup failure leaves that item untouched (still eligible next
/// tick) and never aborts the rest of the loop.
pub fn poll_items<P: TrackingProvider, N: Notifier>(
    items: &mut Items,
    eligible: &[String],
    provider: &P,
    notifier: &N,
    now: DateTime<Utc>,
) -> TickReport {
    let mut report = TickReport::default();

    for code in eligible {
        let Some(item) = items.get_mut(code) else {
            continue;
        };

        let events = match provider.lookup(code) {
            Ok(events) => events,
            Err(e) => {
                tracing::warn!(code = %code, error = %e, "lookup failed, will retry next tick");
                report.outcomes.push((code.clone(), PollOutcome::Failed(e)));
                continue;
            }
        };

        let new_status = events
            .first()
            .map(|e| e.description.clone())
            .unwrap_or_else(|| NO_STATUS.to_string());

        let outcome = if item.apply_status(&new_status) {
            tracing::info!(code = %code, status = %item.status, "status changed");
            notifier.send(&change_message(item));
            PollOutcome::StatusChanged {
                status: item.status.clone(),
                delivered: item.delivered,
            }
        } else {
            tracing::debug!(code = %code, "status unchanged");
            PollOutcome::Unchanged
        };

        item.last_checked_at = Some(now);
        report.mutated = true;
        report.outcomes.push((code.clone(), outcome));
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::item::TrackedItem;
    use crate::provider::TrackingEvent;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Scripted provider: per-code canned responses.
    #[derive(Default)]
    struct FakeProvider {
        responses: HashMap<String, std::result::Result<Vec<String>, ()>>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeProvider {
        fn ok(mut self, code: &str, descriptions: &[&str]) -> Self {
            self.responses.insert(
                code.to_string(),
                Ok(descriptions.iter().map(|s| s.to_string()).collect()),
            );
            self
        }

        fn failing(mut self, code: &str) -> Self {
            self.responses.insert(code.to_string(), Err(()));
            self
        }
    }

    impl TrackingProvider for FakeProvider {
        fn lookup(&self, code: &str) -> Result<Vec<TrackingEvent>> {
            self.calls.borrow_mut().push(code.to_string());
            match self.responses.get(code) {
                Some(Ok(descs)) => Ok(descs
                    .iter()
                    .map(|d| TrackingEvent {
                        description: d.clone(),
                    })
                    .collect()),
                Some(Err(())) => Err(TrackError::Provider { status: 503 }),
                None => Ok(vec![]),
            }
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        messages: RefCell<Vec<String>>,
    }

    impl Notifier for RecordingNotifier {
        fn send(&self, message: &str) {
            self.messages.borrow_mut().push(message.to_string());
        }
    }

    fn one_item(code: &str) -> Items {
        let mut items = Items::new();
        items.insert(code.to_string(), TrackedItem::new(code, "Parcel"));
        items
    }

    #[test]
    fn status_change_updates_item_and_notifies_once() {
        let mut items = one_item("X1");
        let provider = FakeProvider::default().ok("X1", &["In transit", "Posted"]);
        let notifier = RecordingNotifier::default();
        let now = Utc::now();

        let report = poll_items(&mut items, &["X1".to_string()], &provider, &notifier, now);

        let item = &items["X1"];
        assert_eq!(item.status, "In transit");
        assert!(!item.delivered);
        assert_eq!(item.last_checked_at, Some(now));
        assert!(report.mutated);
        assert_eq!(report.changed(), 1);

        let messages = notifier.messages.borrow();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("In transit"));
    }

    #[test]
    fn unchanged_status_does_not_renotify() {
        let mut items = one_item("X1");
        let provider = FakeProvider::default().ok("X1", &["In transit"]);
        let notifier = RecordingNotifier::default();
        let eligible = vec!["X1".to_string()];

        poll_items(&mut items, &eligible, &provider, &notifier, Utc::now());
        let report = poll_items(&mut items, &eligible, &provider, &notifier, Utc::now());

        // Second identical poll: no new notification, but the check
        // timestamp still advanced, so the tick is a mutation.
        assert_eq!(notifier.messages.borrow().len(), 1);
        assert!(report.mutated);
        assert_eq!(report.changed(), 0);
    }

    #[test]
    fn delivered_status_sets_terminal_flag() {
        let mut items = one_item("X1");
        let provider = FakeProvider::default().ok("X1", &["Package delivered"]);
        let notifier = RecordingNotifier::default();

        poll_items(
            &mut items,
            &["X1".to_string()],
            &provider,
            &notifier,
            Utc::now(),
        );
        assert!(items["X1"].delivered);
    }

    #[test]
    fn failed_lookup_leaves_item_untouched() {
        let mut items = one_item("X1");
        let before = items["X1"].clone();
        let provider = FakeProvider::default().failing("X1");
        let notifier = RecordingNotifier::default();

        let report = poll_items(
            &mut items,
            &["X1".to_string()],
            &provider,
            &notifier,
            Utc::now(),
        );

        assert_eq!(items["X1"], before);
        assert!(items["X1"].last_checked_at.is_none());
        assert!(!report.mutated);
        assert_eq!(report.failed(), 1);
        assert!(notifier.messages.borrow().is_empty());
    }

    #[test]
    fn one_failure_does_not_block_other_items() {
        let mut items = one_item("A1");
        items.insert("B2".to_string(), TrackedItem::new("B2", "Second"));
        let provider = FakeProvider::default()
            .failing("A1")
            .ok("B2", &["In transit"]);
        let notifier = RecordingNotifier::default();

        let report = poll_items(
            &mut items,
            &["A1".to_string(), "B2".to_string()],
            &provider,
            &notifier,
            Utc::now(),
        );

        assert_eq!(provider.calls.borrow().len(), 2);
        assert_eq!(items["B2"].status, "In transit");
        assert!(report.mutated);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.changed(), 1);
    }

    #[test]
    fn empty_event_list_becomes_no_status_sentinel() {
        let mut items = one_item("X1");
        let provider = FakeProvider::default().ok("X1", &[]);
        let notifier = RecordingNotifier::default();
        let now = Utc::now();

        let report = poll_items(&mut items, &["X1".to_string()], &provider, &notifier, now);

        // Not a failure: the check timestamp advances and the change
        // from the awaiting sentinel is notified.
        assert_eq!(items["X1"].status, NO_STATUS);
        assert_eq!(items["X1"].last_checked_at, Some(now));
        assert!(report.mutated);
        assert_eq!(notifier.messages.borrow().len(), 1);
    }

    #[test]
    fn first_event_wins_over_older_ones() {
        let mut items = one_item("X1");
        let provider =
            FakeProvider::default().ok("X1", &["Out for delivery", "In transit", "Posted"]);
        let notifier = RecordingNotifier::default();

        poll_items(
            &mut items,
            &["X1".to_string()],
            &provider,
            &notifier,
            Utc::now(),
        );
        assert_eq!(items["X1"].status, "Out for delivery");
    }
}
