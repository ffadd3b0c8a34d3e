//! Match state and player bookkeeping
//!
//! Everything a host needs to snapshot, replay or render a match lives in
//! `GameState`. Maps are `BTreeMap` so iteration order never depends on
//! hashing.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::event::{EventKind, EventLog};
use crate::consts::MAX_PLAYERS;
use crate::course::CourseRegistry;
use crate::physics::{Body, BodyId, World};
use crate::scoring::PersistedState;
use crate::settings::Settings;

pub type PlayerId = String;

/// Per-player match record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerDetails {
    pub player_id: PlayerId,
    /// Ball skin slot, 0..MAX_PLAYERS
    pub player_type: u8,
    /// Shots on the current hole
    pub shots: u32,
    /// Shots over the whole match
    pub total_shots: u32,
}

/// Where the match is, derived from `GameState`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// No hole selected yet
    AwaitingFirstCourse,
    InCourse,
    /// Hole finished, waiting on the course countdown
    BetweenCourses,
    GameOver,
}

/// Where one player's ball is, derived from `GameState`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallPhase {
    NotInPlay,
    AwaitingShot,
    Moving,
    Sunk,
}

/// Aim gauge of the player whose turn it is, mirrored for spectators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AimState {
    pub player_id: PlayerId,
    pub dragging: bool,
    pub px: f32,
    pub py: f32,
    pub power: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverResult {
    Won,
    Lost,
}

/// Complete match state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Copied in at setup so replays never read outside configuration
    pub settings: Settings,
    /// Logical host time in milliseconds
    pub game_time: u64,
    pub frame_count: u64,

    /// Players in join order
    pub players: Vec<PlayerDetails>,
    pub joined_players: Vec<PlayerId>,
    pub whose_turn: Option<PlayerId>,
    /// Turn countdown deadline, 0 when inactive
    pub next_turn_at: u64,
    /// Course countdown deadline, 0 when inactive
    pub next_course_at: u64,
    /// Player whose shot is still rolling
    pub pending_shot: Option<PlayerId>,
    pub events: EventLog,

    /// Campaign index picked with `SelectLevel`
    pub selected_course: Option<usize>,
    /// Single hole picked with `SelectLevel`, `None` plays the campaign
    pub selected_hole: Option<usize>,
    /// Position of the current hole within the campaign
    pub course_number: usize,
    /// Registry index of the loaded hole
    pub current_hole: Option<usize>,
    /// Players who sank on this hole, in sink order
    pub completed: Vec<PlayerId>,
    pub course_complete: bool,
    pub game_over: bool,
    /// Set when a hole loads, cleared by the next tick
    pub start_game: bool,
    pub total_par: u32,
    pub shots_this_course: u32,

    pub world: World,
    pub start: Vec2,
    pub goal: Vec2,
    pub par: u32,
    pub aim: Option<AimState>,

    /// Best scores by player, written on every sink
    pub persisted: BTreeMap<PlayerId, PersistedState>,
    pub results: Option<BTreeMap<PlayerId, GameOverResult>>,
}

impl GameState {
    /// Set up a match. The first hole's world is shown as a preview until a
    /// level is selected.
    pub fn new(registry: &CourseRegistry, settings: Settings, player_ids: &[PlayerId]) -> Self {
        let preview = registry.course(0);
        let mut state = Self {
            events: EventLog::new(settings.event_window),
            settings,
            game_time: 0,
            frame_count: 0,
            players: Vec::new(),
            joined_players: Vec::new(),
            whose_turn: None,
            next_turn_at: 0,
            next_course_at: 0,
            pending_shot: None,
            selected_course: None,
            selected_hole: None,
            course_number: 0,
            current_hole: None,
            completed: Vec::new(),
            course_complete: false,
            game_over: false,
            start_game: true,
            total_par: 0,
            shots_this_course: 0,
            world: preview.map(|c| c.world.clone()).unwrap_or_default(),
            start: preview.map(|c| c.start).unwrap_or_default(),
            goal: preview.map(|c| c.goal).unwrap_or_default(),
            par: preview.map(|c| c.par).unwrap_or_default(),
            aim: None,
            persisted: BTreeMap::new(),
            results: None,
        };

        for id in player_ids {
            if !state.joined_players.contains(id) {
                state.joined_players.push(id.clone());
            }
            state.add_player(id);
        }
        state
    }

    pub fn phase(&self) -> MatchPhase {
        if self.game_over {
            MatchPhase::GameOver
        } else if self.current_hole.is_none() {
            MatchPhase::AwaitingFirstCourse
        } else if self.next_course_at != 0 {
            MatchPhase::BetweenCourses
        } else {
            MatchPhase::InCourse
        }
    }

    pub fn ball_phase(&self, player_id: &str) -> BallPhase {
        if self.is_completed(player_id) {
            return BallPhase::Sunk;
        }
        match self.ball(player_id) {
            None => BallPhase::NotInPlay,
            Some(ball) if ball.is_resting() => BallPhase::AwaitingShot,
            Some(_) => BallPhase::Moving,
        }
    }

    pub fn player(&self, player_id: &str) -> Option<&PlayerDetails> {
        self.players.iter().find(|p| p.player_id == player_id)
    }

    pub fn player_mut(&mut self, player_id: &str) -> Option<&mut PlayerDetails> {
        self.players.iter_mut().find(|p| p.player_id == player_id)
    }

    pub fn has_player(&self, player_id: &str) -> bool {
        self.player(player_id).is_some()
    }

    pub fn is_completed(&self, player_id: &str) -> bool {
        self.completed.iter().any(|p| p == player_id)
    }

    /// Players who can still take a shot on this hole
    pub fn eligible_players(&self) -> impl Iterator<Item = &PlayerDetails> {
        self.players.iter().filter(|p| !self.is_completed(&p.player_id))
    }

    /// The ball owned by `player_id`, if it is on the course
    pub fn ball(&self, player_id: &str) -> Option<&Body> {
        self.world
            .dynamic_bodies()
            .find(|b| b.data.player_id.as_deref() == Some(player_id))
    }

    pub fn ball_id(&self, player_id: &str) -> Option<BodyId> {
        self.ball(player_id).map(|b| b.id)
    }

    pub fn ball_mut(&mut self, player_id: &str) -> Option<&mut Body> {
        self.world
            .dynamic_bodies_mut()
            .find(|b| b.data.player_id.as_deref() == Some(player_id))
    }

    pub(crate) fn emit(&mut self, kind: EventKind) -> u64 {
        self.events.push(kind)
    }

    /// Add a player if missing. They take the lowest free skin slot and
    /// start level with the current leader's total.
    pub fn add_player(&mut self, player_id: &str) {
        if self.has_player(player_id) {
            return;
        }
        let player_type = (0..MAX_PLAYERS as u8)
            .find(|slot| self.players.iter().all(|p| p.player_type != *slot))
            .unwrap_or(0);
        let total_shots = self.players.iter().map(|p| p.total_shots).max().unwrap_or(0);
        self.players.push(PlayerDetails {
            player_id: player_id.to_string(),
            player_type,
            shots: 0,
            total_shots,
        });
    }

    /// Drop a player everywhere. Returns their former index in `players`.
    pub fn remove_player(&mut self, player_id: &str) -> Option<usize> {
        let index = self.players.iter().position(|p| p.player_id == player_id);
        self.players.retain(|p| p.player_id != player_id);
        self.joined_players.retain(|p| p != player_id);
        self.completed.retain(|p| p != player_id);
        if self.pending_shot.as_deref() == Some(player_id) {
            self.pending_shot = None;
        }
        if self.aim.as_ref().is_some_and(|a| a.player_id == player_id) {
            self.aim = None;
        }
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::test_support::{ids, registry};

    #[test]
    fn test_setup_previews_first_hole() {
        let registry = registry();
        let state = GameState::new(&registry, Settings::default(), &ids(&["a", "b"]));
        assert_eq!(state.phase(), MatchPhase::AwaitingFirstCourse);
        assert_eq!(state.players.len(), 2);
        assert_eq!(state.joined_players, ids(&["a", "b"]));
        assert_eq!(state.start, registry.course(0).expect("hole 0").start);
        assert!(state.whose_turn.is_none());
        assert_eq!(state.ball_phase("a"), BallPhase::NotInPlay);
    }

    #[test]
    fn test_player_slots_and_late_join_totals() {
        let registry = registry();
        let mut state = GameState::new(&registry, Settings::default(), &ids(&["a", "b", "c"]));
        state.players[0].total_shots = 7;
        state.players[2].total_shots = 4;
        state.remove_player("b");
        state.add_player("d");
        let d = state.player("d").expect("d");
        assert_eq!(d.player_type, 1);
        assert_eq!(d.total_shots, 7);

        // Re-adding is a no-op
        state.add_player("d");
        assert_eq!(state.players.len(), 3);
    }

    #[test]
    fn test_seventh_player_reuses_slot_zero() {
        let registry = registry();
        let names: Vec<PlayerId> = (0..7).map(|i| format!("p{i}")).collect();
        let state = GameState::new(&registry, Settings::default(), &names);
        assert_eq!(state.players[5].player_type, 5);
        assert_eq!(state.players[6].player_type, 0);
    }

    #[test]
    fn test_remove_player_clears_references() {
        let registry = registry();
        let mut state = GameState::new(&registry, Settings::default(), &ids(&["a", "b"]));
        state.completed.push("b".into());
        state.pending_shot = Some("b".into());
        assert_eq!(state.remove_player("b"), Some(1));
        assert!(state.completed.is_empty());
        assert!(state.pending_shot.is_none());
        assert_eq!(state.remove_player("b"), None);
    }
}
