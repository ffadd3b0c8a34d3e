//! Player actions and host membership events
//!
//! Actions arrive from remote clients in a single total order. Anything that
//! fails a precondition is ignored rather than reported, so every replaying
//! client takes the same path.

use glam::Vec2;
use log::debug;
use serde::{Deserialize, Serialize};

use super::event::EventKind;
use super::progression::{advance_turn, select_turn_from, start_course};
use super::state::{AimState, GameState};
use crate::course::CourseRegistry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Hit the ball along `(dx, dy)` scaled by `power`
    Shoot { dx: f32, dy: f32, power: f32 },
    /// Aim gauge update from the player whose turn it is
    DragUpdate {
        dragging: bool,
        px: f32,
        py: f32,
        power: f32,
    },
    EndTurn,
    /// Jump to a campaign, or to one hole of it
    SelectLevel { course: usize, hole: Option<usize> },
}

/// Apply one action from `player_id` at logical time `now`
pub fn apply_action(state: &mut GameState, registry: &CourseRegistry, player_id: &str, action: &Action, now: u64) {
    match *action {
        Action::Shoot { dx, dy, power } => shoot(state, player_id, dx, dy, power),
        Action::DragUpdate {
            dragging,
            px,
            py,
            power,
        } => drag_update(state, player_id, dragging, px, py, power),
        Action::EndTurn => end_turn(state, player_id, now),
        Action::SelectLevel { course, hole } => select_level(state, registry, course, hole),
    }
}

fn shoot(state: &mut GameState, player_id: &str, dx: f32, dy: f32, power: f32) {
    if state.current_hole.is_none() || state.game_over || state.next_course_at != 0 {
        return;
    }
    if !(dx.is_finite() && dy.is_finite() && power.is_finite()) {
        return;
    }
    if !state.has_player(player_id) || state.is_completed(player_id) {
        return;
    }
    let strict = !state.settings.mania_mode;
    if strict
        && (state.whose_turn.as_deref() != Some(player_id) || state.pending_shot.is_some() || state.next_turn_at != 0)
    {
        return;
    }
    if !state.ball(player_id).is_some_and(|b| b.is_resting()) {
        return;
    }

    let power = power.clamp(0.0, state.settings.max_power);
    if let Some(player) = state.player_mut(player_id) {
        player.shots += 1;
        player.total_shots += 1;
    }
    state.shots_this_course += 1;

    if let Some(ball) = state.ball_mut(player_id) {
        ball.data.shot_origin = Some(ball.center);
        ball.velocity += Vec2::new(dx, dy) * power;
        ball.resting_time = 0.0;
    }

    state.emit(EventKind::Shoot {
        player_id: player_id.to_string(),
        dx,
        dy,
        power,
    });
    if strict {
        state.pending_shot = Some(player_id.to_string());
    }
    debug!("{} shoots ({}, {}) x {}", player_id, dx, dy, power);
}

fn drag_update(state: &mut GameState, player_id: &str, dragging: bool, px: f32, py: f32, power: f32) {
    if state.whose_turn.as_deref() != Some(player_id) {
        return;
    }
    if !(px.is_finite() && py.is_finite() && power.is_finite()) {
        return;
    }
    state.aim = Some(AimState {
        player_id: player_id.to_string(),
        dragging,
        px,
        py,
        power: power.clamp(0.0, state.settings.max_power),
    });
}

fn end_turn(state: &mut GameState, player_id: &str, now: u64) {
    if state.game_over || state.next_course_at != 0 || state.current_hole.is_none() {
        return;
    }
    if state.whose_turn.as_deref() == Some(player_id) {
        advance_turn(state, now);
    }
}

fn select_level(state: &mut GameState, registry: &CourseRegistry, course: usize, hole: Option<usize>) {
    if state.game_over {
        return;
    }
    let Some(campaign) = registry.campaign(course) else {
        return;
    };
    let Some(target) = hole.or_else(|| campaign.holes.first().copied()) else {
        return;
    };
    let Some(position) = campaign.position(target) else {
        return;
    };
    if state.current_hole.is_some() && state.selected_course == Some(course) && state.selected_hole == hole {
        return;
    }

    state.selected_course = Some(course);
    state.selected_hole = hole;
    state.course_number = position;
    state.next_course_at = 0;
    start_course(state, registry, target);
}

/// Host event: a player connected
pub fn player_joined(state: &mut GameState, player_id: &str) {
    if !state.joined_players.iter().any(|p| p == player_id) {
        state.joined_players.push(player_id.to_string());
    }
    state.add_player(player_id);
    debug!("{} joined", player_id);
}

/// Host event: a player disconnected for good
pub fn player_left(state: &mut GameState, player_id: &str, now: u64) {
    let had_turn = state.whose_turn.as_deref() == Some(player_id);
    let index = state.remove_player(player_id);
    if had_turn && !state.game_over {
        select_turn_from(state, index.unwrap_or(0), now);
    }
    debug!("{} left", player_id);
}
