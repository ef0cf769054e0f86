//! Systems that persist journal events in memory and on disk.
use std::{
    fs::{create_dir_all, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use bevy::prelude::*;
use serde::Serialize;

use super::{Journal, JournalEntry, JournalEvent};

const DEFAULT_JOURNAL_LOG_PATH: &str = "logs/journal.jsonl";

/// Disk sink appending journal entries as JSON lines.
#[derive(Resource, Debug)]
pub struct JournalSink {
    output_path: PathBuf,
    directory_ready: bool,
    write_failed: bool,
}

impl JournalSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: path.into(),
            directory_ready: false,
            write_failed: false,
        }
    }

    fn append(&mut self, entry: &JournalEntry) {
        if self.write_failed {
            return;
        }

        if !self.directory_ready {
            if let Some(parent) = self.output_path.parent().filter(|p| *p != Path::new("")) {
                if let Err(err) = create_dir_all(parent) {
                    warn!(
                        "Journal log directory {} unavailable ({}); disk logging disabled",
                        parent.display(),
                        err
                    );
                    self.write_failed = true;
                    return;
                }
            }
            self.directory_ready = true;
        }

        let record = JournalRecord::from_entry(entry);
        let line = match serde_json::to_string(&record) {
            Ok(line) => line,
            Err(err) => {
                warn!("Failed to serialize journal entry: {}", err);
                return;
            }
        };

        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.output_path)
            .and_then(|mut file| writeln!(file, "{}", line));

        if let Err(err) = result {
            warn!(
                "Failed to write {} ({}); disk logging disabled",
                self.output_path.display(),
                err
            );
            self.write_failed = true;
        }
    }
}

impl Default for JournalSink {
    fn default() -> Self {
        Self::new(DEFAULT_JOURNAL_LOG_PATH)
    }
}

#[derive(Debug, Serialize)]
struct JournalRecord<'a> {
    at_seconds: f64,
    actor: &'a str,
    action: super::JournalAction,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    target: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<[f32; 3]>,
}

impl<'a> JournalRecord<'a> {
    fn from_entry(entry: &'a JournalEntry) -> Self {
        Self {
            at_seconds: entry.at_seconds,
            actor: &entry.event.actor,
            action: entry.event.action,
            message: &entry.event.message,
            target: entry.event.target.as_deref(),
            details: entry.event.details.as_deref(),
            location: entry.event.location.map(|v| [v.x, v.y, v.z]),
        }
    }
}

/// Drains pending journal messages into the rolling journal and the sink.
pub fn record_journal_events(
    time: Res<Time>,
    mut journal: ResMut<Journal>,
    mut sink: ResMut<JournalSink>,
    mut events: MessageReader<JournalEvent>,
) {
    let now = time.elapsed_secs_f64();

    for event in events.read() {
        let entry = JournalEntry {
            at_seconds: now,
            event: event.clone(),
        };
        sink.append(&entry);
        journal.push(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::JournalAction;

    #[test]
    fn record_system_fills_journal() {
        let mut app = App::new();
        app.add_plugins(bevy::time::TimePlugin);
        app.init_resource::<Journal>();
        app.insert_resource(JournalSink::new(
            std::env::temp_dir().join("reachwood-journal-test.jsonl"),
        ));
        app.add_message::<JournalEvent>();
        app.add_systems(Update, record_journal_events);

        app.world_mut().write_message(JournalEvent::new(
            "Player",
            JournalAction::Collected,
            "Picked up 2 wood.",
        ));
        app.update();

        let journal = app.world().resource::<Journal>();
        assert_eq!(journal.len(), 1);
    }

    #[test]
    fn record_serializes_location_as_array() {
        let entry = JournalEntry {
            at_seconds: 1.5,
            event: JournalEvent::new("Player", JournalAction::Gathered, "Gathered 1 stone.")
                .with_location(Vec3::new(2.0, 0.0, -3.0)),
        };

        let json = serde_json::to_string(&JournalRecord::from_entry(&entry)).unwrap();
        assert!(json.contains("\"location\":[2.0,0.0,-3.0]"));
        assert!(json.contains("\"action\":\"gathered\""));
        assert!(!json.contains("\"target\""));
    }
}
