//! Fixed timestep match tick
//!
//! A pure function of the current state and the host's tick input. It never
//! reads wall-clock time or randomness, so every client replaying the same
//! inputs arrives at the same state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{GameState, PlayerId};
use super::{effects, goal, progression};
use crate::consts::*;
use crate::course::CourseRegistry;

/// What the host supplies each tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    /// Logical host time in milliseconds
    pub game_time: u64,
    /// Players currently connected
    pub live_players: Vec<PlayerId>,
}

/// Advance the match by one fixed timestep
pub fn tick(state: &mut GameState, registry: &CourseRegistry, input: &TickInput) {
    state.frame_count += 1;
    state.game_time = input.game_time;
    state.start_game = false;

    if state.current_hole.is_none() || state.game_over {
        return;
    }

    for ball in state.world.dynamic_bodies_mut() {
        ball.data.out_of_bounds = false;
    }
    spawn_balls(state);

    // Two half steps keep fast balls from tunnelling through thin walls
    let half_step = state.settings.tick_ms() / 2.0;
    let mut records = state.world.step(half_step);
    records.extend(state.world.step(half_step));

    effects::apply_collisions(state, &records);
    effects::restore_bouncers(state);

    if state.world.at_rest() {
        for _ in 0..state.settings.settle_steps {
            state.world.step(half_step);
        }
    }

    goal::check_sinks(state);
    goal::check_bounds(state);
    purge_departed(state);

    state.course_complete = !state.players.is_empty() && state.completed.len() == state.players.len();

    progression::update_turn(state, &input.live_players);
    progression::update_course(state, registry);
}

/// Give every player still on this hole a ball at the tee
fn spawn_balls(state: &mut GameState) {
    let missing: Vec<(usize, PlayerId)> = state
        .players
        .iter()
        .enumerate()
        .filter(|(_, p)| !state.is_completed(&p.player_id) && state.ball(&p.player_id).is_none())
        .map(|(i, p)| (i, p.player_id.clone()))
        .collect();

    for (index, player_id) in missing {
        let spawn = state.start + Vec2::new(index as f32 * SPAWN_OFFSET, 0.0);
        let mut ball = state.world.create_circle(spawn, BALL_RADIUS, BALL_MASS, 1.0, 1.0);
        ball.data.player_id = Some(player_id);
        ball.data.shot_origin = Some(spawn);
        state.world.add_body(ball);
    }
}

/// Balls of players who left are taken off the course
fn purge_departed(state: &mut GameState) {
    let departed: Vec<_> = state
        .world
        .all_bodies()
        .iter()
        .filter(|b| b.data.player_id.as_deref().is_some_and(|id| !state.has_player(id)))
        .map(|b| b.id)
        .collect();
    for id in departed {
        state.world.remove_body(id);
    }
}
