//! World event journal: fire-and-forget log entries from gameplay systems.
pub mod plugin;
pub mod systems;

pub use plugin::JournalPlugin;

use std::collections::VecDeque;

use bevy::prelude::*;
use serde::Serialize;

const DEFAULT_JOURNAL_CAPACITY: usize = 128;

/// Journalled action categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JournalAction {
    Spoke,
    Gathered,
    GatherCancelled,
    Collected,
    ChatOpened,
    ChatClosed,
}

impl JournalAction {
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn label(self) -> &'static str {
        match self {
            Self::Spoke => "spoke",
            Self::Gathered => "gathered",
            Self::GatherCancelled => "gather_cancelled",
            Self::Collected => "collected",
            Self::ChatOpened => "chat_opened",
            Self::ChatClosed => "chat_closed",
        }
    }
}

/// Fire-and-forget world log entry. Emitters never wait on delivery.
#[derive(Message, Debug, Clone)]
pub struct JournalEvent {
    pub actor: String,
    pub action: JournalAction,
    pub message: String,
    pub target: Option<String>,
    pub details: Option<String>,
    pub location: Option<Vec3>,
}

impl JournalEvent {
    pub fn new(
        actor: impl Into<String>,
        action: JournalAction,
        message: impl Into<String>,
    ) -> Self {
        Self {
            actor: actor.into(),
            action,
            message: message.into(),
            target: None,
            details: None,
            location: None,
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_location(mut self, location: Vec3) -> Self {
        self.location = Some(location);
        self
    }
}

/// Timestamped journal entry retained in memory.
#[derive(Debug, Clone)]
pub struct JournalEntry {
    pub at_seconds: f64,
    pub event: JournalEvent,
}

/// Rolling in-memory journal for UI consumers and diagnostics.
#[derive(Resource, Debug)]
pub struct Journal {
    capacity: usize,
    entries: VecDeque<JournalEntry>,
}

impl Journal {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: VecDeque::new(),
        }
    }

    pub fn push(&mut self, entry: JournalEntry) {
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn entries(&self) -> impl Iterator<Item = &JournalEntry> {
        self.entries.iter()
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Journal {
    fn default() -> Self {
        Self::new(DEFAULT_JOURNAL_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(message: &str) -> JournalEntry {
        JournalEntry {
            at_seconds: 0.0,
            event: JournalEvent::new("Player", JournalAction::Gathered, message),
        }
    }

    #[test]
    fn journal_evicts_oldest_entries() {
        let mut journal = Journal::new(2);
        journal.push(entry("first"));
        journal.push(entry("second"));
        journal.push(entry("third"));

        assert_eq!(journal.len(), 2);
        let messages: Vec<_> = journal
            .entries()
            .map(|entry| entry.event.message.as_str())
            .collect();
        assert_eq!(messages, vec!["second", "third"]);
    }

    #[test]
    fn builder_attaches_optional_fields() {
        let event = JournalEvent::new("Maren", JournalAction::Spoke, "Hello there.")
            .with_target("Player")
            .with_details("greeting")
            .with_location(Vec3::new(1.0, 0.0, 2.0));

        assert_eq!(event.target.as_deref(), Some("Player"));
        assert_eq!(event.details.as_deref(), Some("greeting"));
        assert_eq!(event.location, Some(Vec3::new(1.0, 0.0, 2.0)));
        assert_eq!(event.action.label(), "spoke");
    }
}
