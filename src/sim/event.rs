//! Match event log
//!
//! Events are stamped with strictly increasing ids that are never reused,
//! even after old entries are compacted away.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::state::PlayerId;

/// Default number of events kept in the window
pub const DEFAULT_EVENT_WINDOW: usize = 256;

/// What happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    Shoot {
        player_id: PlayerId,
        dx: f32,
        dy: f32,
        power: f32,
    },
    /// `course_number` is the hole index in the registry
    NewCourse { course_number: usize },
    Sink { player_id: PlayerId },
    Collision { max_depth: f32 },
    GameOver,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    pub id: u64,
    #[serde(flatten)]
    pub kind: EventKind,
}

/// Append-only event window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    events: VecDeque<GameEvent>,
    next_id: u64,
    /// Most events held at once, 0 keeps everything
    window: usize,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_WINDOW)
    }
}

impl EventLog {
    pub fn new(window: usize) -> Self {
        Self {
            events: VecDeque::new(),
            next_id: 1,
            window,
        }
    }

    /// Append an event, returning its id
    pub fn push(&mut self, kind: EventKind) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.events.push_back(GameEvent { id, kind });
        if self.window > 0 {
            while self.events.len() > self.window {
                self.events.pop_front();
            }
        }
        id
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }

    /// Events newer than `id`
    pub fn since(&self, id: u64) -> impl Iterator<Item = &GameEvent> {
        self.events.iter().filter(move |e| e.id > id)
    }

    /// Drop every event up to and including `id`
    pub fn acknowledge(&mut self, id: u64) {
        while self.events.front().is_some_and(|e| e.id <= id) {
            self.events.pop_front();
        }
    }

    pub fn last(&self) -> Option<&GameEvent> {
        self.events.back()
    }

    /// Id the next event will get
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
