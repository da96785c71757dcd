use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use memechat_schema::{ChatTurn, HistoryRecord};

/// Where completed turns go once they have been sent to the client.
pub trait HistoryStore: Send + Sync {
    fn record(&self, turn: &ChatTurn);
    /// Oldest first.
    fn list(&self) -> Vec<HistoryRecord>;
}

/// Keeps nothing; the history endpoint always answers with an empty list.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHistory;

impl HistoryStore for NoHistory {
    fn record(&self, _turn: &ChatTurn) {}

    fn list(&self) -> Vec<HistoryRecord> {
        Vec::new()
    }
}

/// Bounded, process-local history. Oldest turns are evicted first.
#[derive(Debug)]
pub struct InMemoryHistory {
    capacity: usize,
    records: Mutex<VecDeque<HistoryRecord>>,
}

impl InMemoryHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            records: Mutex::new(VecDeque::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl HistoryStore for InMemoryHistory {
    fn record(&self, turn: &ChatTurn) {
        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        if records.len() == self.capacity {
            records.pop_front();
        }
        records.push_back(HistoryRecord::from(turn));
    }

    fn list(&self) -> Vec<HistoryRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use memechat_schema::ToneSymbol;

    use super::*;

    fn turn(text: &str) -> ChatTurn {
        ChatTurn {
            user_text: text.into(),
            reply_text: format!("re: {text}"),
            symbol: ToneSymbol::default(),
            chosen_media_url: "default.jpeg".into(),
            candidate_urls: vec!["default.jpeg".into()],
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn no_history_is_always_empty() {
        let store = NoHistory;
        store.record(&turn("hi"));
        assert!(store.list().is_empty());
    }

    #[test]
    fn in_memory_keeps_order_and_evicts_oldest() {
        let store = InMemoryHistory::new(2);
        store.record(&turn("one"));
        store.record(&turn("two"));
        store.record(&turn("three"));

        let messages: Vec<String> = store.list().into_iter().map(|r| r.message).collect();
        assert_eq!(messages, vec!["two", "three"]);
        assert_eq!(store.len(), 2);
    }
}
