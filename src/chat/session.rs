//! Chat session state machine.
use bevy::prelude::*;

/// The modal dialogue session: closed, or open against exactly one actor.
///
/// The input lock is raised while a generation call is in flight so a second
/// send cannot be issued before the first settles.
#[derive(Resource, Debug, Default)]
pub struct ChatSession {
    state: ChatState,
    input_locked: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum ChatState {
    #[default]
    Closed,
    Open {
        target: Entity,
    },
}

impl ChatSession {
    pub fn is_open(&self) -> bool {
        matches!(self.state, ChatState::Open { .. })
    }

    pub fn target(&self) -> Option<Entity> {
        match self.state {
            ChatState::Open { target } => Some(target),
            ChatState::Closed => None,
        }
    }

    /// True when the session is open and still pointed at exactly `entity`.
    pub fn is_open_with(&self, entity: Entity) -> bool {
        self.target() == Some(entity)
    }

    /// Opens the session against `target`. Returns false when a session is
    /// already open (with any target); reentry only refocuses the input.
    pub fn open(&mut self, target: Entity) -> bool {
        if self.is_open() {
            return false;
        }
        self.state = ChatState::Open { target };
        self.input_locked = false;
        true
    }

    /// Closes the session, returning the previous target. No-op when closed.
    pub fn close(&mut self) -> Option<Entity> {
        let target = self.target();
        self.state = ChatState::Closed;
        self.input_locked = false;
        target
    }

    pub fn lock_input(&mut self) {
        self.input_locked = true;
    }

    pub fn unlock_input(&mut self) {
        self.input_locked = false;
    }

    pub fn input_locked(&self) -> bool {
        self.input_locked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entities(count: usize) -> Vec<Entity> {
        let mut world = World::new();
        (0..count).map(|_| world.spawn_empty().id()).collect()
    }

    #[test]
    fn open_is_rejected_while_already_open() {
        let ids = entities(2);
        let mut session = ChatSession::default();

        assert!(session.open(ids[0]));
        assert!(!session.open(ids[1]));
        assert!(session.is_open_with(ids[0]));
    }

    #[test]
    fn close_is_idempotent_and_reports_the_target() {
        let ids = entities(1);
        let mut session = ChatSession::default();
        session.open(ids[0]);

        assert_eq!(session.close(), Some(ids[0]));
        assert_eq!(session.close(), None);
        assert!(!session.is_open());
    }

    #[test]
    fn closing_releases_the_input_lock() {
        let ids = entities(1);
        let mut session = ChatSession::default();
        session.open(ids[0]);
        session.lock_input();
        assert!(session.input_locked());

        session.close();
        assert!(!session.input_locked());

        session.open(ids[0]);
        assert!(!session.input_locked());
    }

    #[test]
    fn open_with_tracks_the_exact_target() {
        let ids = entities(2);
        let mut session = ChatSession::default();
        session.open(ids[0]);

        assert!(session.is_open_with(ids[0]));
        assert!(!session.is_open_with(ids[1]));
    }
}
