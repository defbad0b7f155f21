use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::core::RentalEvent;

/// 記録済みイベント
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub recorded_at: DateTime<Utc>,
    pub event: RentalEvent,
}

/// Bounded log of the events the store has committed, oldest first.
#[derive(Debug, Default)]
pub(crate) struct Journal {
    limit: usize,
    entries: VecDeque<JournalEntry>,
}

impl Journal {
    pub(crate) fn new(limit: usize) -> Self {
        Self {
            limit,
            entries: VecDeque::new(),
        }
    }

    pub(crate) fn record<E, I>(&mut self, events: I)
    where
        E: Into<RentalEvent>,
        I: IntoIterator<Item = E>,
    {
        if self.limit == 0 {
            return;
        }
        let recorded_at = Utc::now();
        for event in events {
            if self.entries.len() == self.limit {
                self.entries.pop_front();
            }
            self.entries.push_back(JournalEntry {
                recorded_at,
                event: event.into(),
            });
        }
    }

    pub(crate) fn entries(&self) -> Vec<JournalEntry> {
        self.entries.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::core::{CarEvent, CarId};

    use super::*;

    fn changed(id: u64) -> CarEvent {
        CarEvent::CarAvailabilityChanged {
            id: CarId::from(id),
            available: false,
        }
    }

    #[test]
    fn test_journal_drops_oldest() {
        let mut journal = Journal::new(2);
        journal.record([changed(1), changed(2), changed(3)]);
        let events = journal
            .entries()
            .into_iter()
            .map(|e| e.event)
            .collect::<Vec<_>>();
        assert_eq!(events, vec![RentalEvent::from(changed(2)), RentalEvent::from(changed(3))]);
    }

    #[test]
    fn test_disabled_journal() {
        let mut journal = Journal::new(0);
        journal.record([changed(1)]);
        assert!(journal.entries().is_empty());
    }
}
