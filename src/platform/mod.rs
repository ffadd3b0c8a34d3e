//! Host runtime binding
//!
//! The host owns the clock and the network. It hands the core a single
//! ordered stream of inputs; `MatchRunner` records that stream so a match can
//! be replayed, or rolled back to a snapshot and re-run with corrected inputs.

pub mod bot;

use std::collections::BTreeMap;
use std::sync::Arc;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::course::CourseRegistry;
use crate::persistence::{PersistenceError, ScoreStore};
use crate::settings::Settings;
use crate::sim::{Action, GameOverResult, GameState, PlayerId, TickInput, apply_action, player_joined, player_left, tick};

pub use bot::Bot;

/// One entry of the host's input stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostInput {
    Tick(TickInput),
    Action {
        player_id: PlayerId,
        action: Action,
        game_time: u64,
    },
    PlayerJoined {
        player_id: PlayerId,
    },
    PlayerLeft {
        player_id: PlayerId,
        game_time: u64,
    },
}

/// Feed one host input into the match
pub fn apply_input(state: &mut GameState, registry: &CourseRegistry, input: &HostInput) {
    match input {
        HostInput::Tick(tick_input) => tick(state, registry, tick_input),
        HostInput::Action {
            player_id,
            action,
            game_time,
        } => apply_action(state, registry, player_id, action, *game_time),
        HostInput::PlayerJoined { player_id } => player_joined(state, player_id),
        HostInput::PlayerLeft { player_id, game_time } => player_left(state, player_id, *game_time),
    }
}

/// A point the runner can roll back to
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub state: GameState,
    /// Inputs applied before the snapshot was taken
    pub log_len: usize,
}

/// Owns a match and the inputs that produced it
#[derive(Debug, Clone)]
pub struct MatchRunner {
    registry: Arc<CourseRegistry>,
    initial: GameState,
    state: GameState,
    log: Vec<HostInput>,
    results_reported: bool,
}

impl MatchRunner {
    pub fn setup(registry: Arc<CourseRegistry>, settings: Settings, player_ids: &[PlayerId]) -> Self {
        let state = GameState::new(&registry, settings, player_ids);
        info!("Match set up for {} players", player_ids.len());
        Self {
            registry,
            initial: state.clone(),
            state,
            log: Vec::new(),
            results_reported: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn registry(&self) -> &CourseRegistry {
        &self.registry
    }

    /// Every input applied so far, in order
    pub fn log(&self) -> &[HostInput] {
        &self.log
    }

    pub fn apply(&mut self, input: HostInput) {
        apply_input(&mut self.state, &self.registry, &input);
        self.log.push(input);
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state.clone(),
            log_len: self.log.len(),
        }
    }

    /// Restore `snapshot` and re-apply `corrected` in place of everything
    /// that followed it
    pub fn rollback(&mut self, snapshot: &Snapshot, corrected: Vec<HostInput>) {
        if snapshot.log_len > self.log.len() {
            warn!(
                "Snapshot is ahead of the log ({} > {}), ignoring rollback",
                snapshot.log_len,
                self.log.len()
            );
            return;
        }
        self.state = snapshot.state.clone();
        self.log.truncate(snapshot.log_len);
        if self.state.results.is_none() {
            self.results_reported = false;
        }
        for input in corrected {
            self.apply(input);
        }
    }

    /// Run `inputs` from `initial` and return the resulting state
    pub fn replay(registry: &CourseRegistry, initial: &GameState, inputs: &[HostInput]) -> GameState {
        let mut state = initial.clone();
        for input in inputs {
            apply_input(&mut state, registry, input);
        }
        state
    }

    /// Re-run the whole log from setup
    pub fn replay_log(&self) -> GameState {
        Self::replay(&self.registry, &self.initial, &self.log)
    }

    /// Final results, handed out once per match
    pub fn take_results(&mut self) -> Option<BTreeMap<PlayerId, GameOverResult>> {
        if self.results_reported {
            return None;
        }
        let results = self.state.results.clone()?;
        self.results_reported = true;
        Some(results)
    }

    /// Pull stored records for every player in the match. Returns how many
    /// were found.
    pub fn load_scores(&mut self, store: &dyn ScoreStore) -> Result<usize, PersistenceError> {
        let mut found = 0;
        let player_ids: Vec<PlayerId> = self.state.players.iter().map(|p| p.player_id.clone()).collect();
        for player_id in player_ids {
            if let Some(record) = store.load(&player_id)? {
                self.initial.persisted.insert(player_id.clone(), record.clone());
                self.state.persisted.insert(player_id, record);
                found += 1;
            }
        }
        Ok(found)
    }

    /// Write every player's record to `store`. Returns how many were written.
    pub fn flush_scores(&self, store: &mut dyn ScoreStore) -> Result<usize, PersistenceError> {
        for (player_id, record) in &self.state.persisted {
            store.save(player_id, record)?;
        }
        Ok(self.state.persisted.len())
    }
}
