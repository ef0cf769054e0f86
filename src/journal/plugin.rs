//! Journal plugin wiring the rolling log and disk sink.
use bevy::prelude::*;

use crate::core::plugin::TickSet;

use super::{
    systems::{record_journal_events, JournalSink},
    Journal, JournalEvent,
};

pub struct JournalPlugin;

impl Plugin for JournalPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Journal>()
            .init_resource::<JournalSink>()
            .add_message::<JournalEvent>()
            .add_systems(Update, record_journal_events.in_set(TickSet::Surface));
    }
}
