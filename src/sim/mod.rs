//! Deterministic match simulation
//!
//! All gameplay rules live here. This module must stay pure and deterministic:
//! - Fixed timestep only, time comes from the host
//! - No randomness
//! - Stable iteration order (insertion order or `BTreeMap`)
//! - No rendering, transport or storage dependencies

pub mod actions;
pub mod effects;
pub mod event;
pub mod goal;
pub mod progression;
pub mod state;
pub mod tick;

pub use actions::{Action, apply_action, player_joined, player_left};
pub use event::{EventKind, EventLog, GameEvent};
pub use progression::is_final_hole;
pub use state::{AimState, BallPhase, GameOverResult, GameState, MatchPhase, PlayerDetails, PlayerId};
pub use tick::{TickInput, tick};

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::course::{Campaign, CourseRegistry, compile_course};
    use crate::settings::Settings;

    /// Logical milliseconds per test tick
    pub const TICK_MS: u64 = 33;

    fn flat_course(title: &str) -> String {
        format!(
            r##"<svg xmlns="http://www.w3.org/2000/svg"><g>
  <title>{title}</title>
  <rect id="floor" x="0" y="400" width="2000" height="60" fill="#a5e306"/>
  <rect id="wall_left" x="-40" y="100" width="40" height="360" fill="#487d8f"/>
  <rect id="wall_right" x="2000" y="100" width="40" height="360" fill="#487d8f"/>
  <ellipse cx="100" cy="381" rx="10" ry="10" fill="#00ff00"/>
  <ellipse cx="1800" cy="400" rx="15" ry="15" fill="#ff0000"/>
</g></svg>"##
        )
    }

    /// Three flat holes; campaign 0 plays all of them, campaign 1 only the last
    pub fn registry() -> CourseRegistry {
        let courses = ["Flat One,3", "Flat Two,4", "Flat Three,2"]
            .iter()
            .map(|title| compile_course(&flat_course(title)).expect("test course compiles"))
            .collect();
        CourseRegistry::from_courses(
            courses,
            vec![Campaign::new("Flats", "flats", [0, 1, 2]), Campaign::new("Solo", "solo", [2])],
        )
    }

    pub fn ids(names: &[&str]) -> Vec<PlayerId> {
        names.iter().map(|n| n.to_string()).collect()
    }

    pub fn input_for(state: &GameState) -> TickInput {
        TickInput {
            game_time: state.game_time + TICK_MS,
            live_players: state.players.iter().map(|p| p.player_id.clone()).collect(),
        }
    }

    pub fn tick_once(state: &mut GameState, registry: &CourseRegistry) {
        let input = input_for(state);
        tick(state, registry, &input);
    }

    pub fn act(state: &mut GameState, registry: &CourseRegistry, player_id: &str, action: &Action) {
        let now = state.game_time;
        apply_action(state, registry, player_id, action, now);
    }

    /// Tick until every ball on the course has settled
    pub fn tick_until_rest(state: &mut GameState, registry: &CourseRegistry) {
        for _ in 0..600 {
            tick_once(state, registry);
            if state.world.at_rest() {
                return;
            }
        }
        panic!("balls never came to rest");
    }

    /// Campaign 0 loaded, every ball spawned and resting
    pub fn started_match(players: &[&str]) -> (CourseRegistry, GameState) {
        let registry = registry();
        let mut state = GameState::new(&registry, Settings::default(), &ids(players));
        act(&mut state, &registry, players[0], &Action::SelectLevel { course: 0, hole: None });
        tick_until_rest(&mut state, &registry);
        (registry, state)
    }
}
