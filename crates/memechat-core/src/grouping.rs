//! Splits a flat, chronologically ordered history into conversations.

use chrono::{DateTime, TimeDelta, Utc};
use memechat_schema::{ChatTurn, HistoryRecord};
use serde::Serialize;

/// Inactivity gap that starts a new conversation.
pub fn default_session_gap() -> TimeDelta {
    TimeDelta::minutes(5)
}

const TITLE_MAX_CHARS: usize = 25;

pub trait Timestamped {
    fn timestamp(&self) -> DateTime<Utc>;
}

impl Timestamped for DateTime<Utc> {
    fn timestamp(&self) -> DateTime<Utc> {
        *self
    }
}

impl Timestamped for HistoryRecord {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl Timestamped for ChatTurn {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Partition `records` wherever two neighbours are at least `gap` apart.
///
/// Input order is kept as given (no re-sort); concatenating the output
/// yields the input.
pub fn group_conversations<R, I>(records: I, gap: TimeDelta) -> Vec<Vec<R>>
where
    R: Timestamped,
    I: IntoIterator<Item = R>,
{
    let mut sessions: Vec<Vec<R>> = Vec::new();
    let mut current: Vec<R> = Vec::new();
    let mut previous: Option<DateTime<Utc>> = None;

    for record in records {
        let at = record.timestamp();
        if let Some(prev) = previous {
            if at - prev >= gap {
                sessions.push(std::mem::take(&mut current));
            }
        }
        previous = Some(at);
        current.push(record);
    }

    if !current.is_empty() {
        sessions.push(current);
    }

    sessions
}

/// A conversation as listed in the sidebar: its opening line plus turns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationSession {
    pub title: String,
    pub started_at: DateTime<Utc>,
    pub turns: Vec<HistoryRecord>,
}

pub fn session_title(first_message: &str) -> String {
    if first_message.chars().count() > TITLE_MAX_CHARS {
        let head: String = first_message.chars().take(TITLE_MAX_CHARS).collect();
        format!("{head}...")
    } else {
        first_message.to_string()
    }
}

pub fn conversation_sessions(history: Vec<HistoryRecord>, gap: TimeDelta) -> Vec<ConversationSession> {
    group_conversations(history, gap)
        .into_iter()
        .filter_map(|turns| {
            let first = turns.first()?;
            Some(ConversationSession {
                title: session_title(&first.message),
                started_at: first.timestamp,
                turns,
            })
        })
        .collect()
}
