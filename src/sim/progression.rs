//! Turn order and hole progression

use std::collections::BTreeMap;

use log::{debug, info};

use super::event::EventKind;
use super::state::{GameOverResult, GameState, PlayerId};
use crate::course::CourseRegistry;

/// Hand the turn to the next eligible player after the current one
pub(crate) fn advance_turn(state: &mut GameState, now: u64) {
    let start = state
        .whose_turn
        .as_deref()
        .and_then(|id| state.players.iter().position(|p| p.player_id == id))
        .map_or(0, |i| i + 1);
    select_turn_from(state, start, now);
}

/// Scan `players` in join order from `start`, wrapping, skipping anyone who
/// already sank. With nobody left the hole is over.
pub(crate) fn select_turn_from(state: &mut GameState, start: usize, now: u64) {
    state.next_turn_at = 0;
    state.pending_shot = None;

    let count = state.players.len();
    let next = (0..count)
        .map(|offset| (start + offset) % count)
        .map(|i| &state.players[i].player_id)
        .find(|id| !state.is_completed(id))
        .cloned();

    match next {
        Some(id) => {
            debug!("Turn: {}", id);
            state.whose_turn = Some(id);
        }
        None => {
            state.whose_turn = None;
            if count > 0 {
                begin_course_transition(state, now);
            }
        }
    }
}

/// Turn bookkeeping for one tick
pub(crate) fn update_turn(state: &mut GameState, live_players: &[PlayerId]) {
    if state.next_course_at != 0 {
        return;
    }
    let now = state.game_time;

    let stale = match state.whose_turn.as_deref() {
        None => state.eligible_players().next().is_some(),
        Some(id) => !state.has_player(id) || state.is_completed(id) || !live_players.iter().any(|p| p == id),
    };
    if stale {
        advance_turn(state, now);
        return;
    }

    if state.next_turn_at != 0 {
        if now >= state.next_turn_at {
            advance_turn(state, now);
        }
        return;
    }

    if let Some(shooter) = state.pending_shot.as_deref() {
        let settled = state.ball(shooter).is_none_or(|ball| ball.is_resting());
        if settled {
            state.next_turn_at = now + state.settings.turn_delay_ms;
        }
    }
}

/// Hole bookkeeping for one tick
pub(crate) fn update_course(state: &mut GameState, registry: &CourseRegistry) {
    let now = state.game_time;
    if state.next_course_at == 0 {
        if state.course_complete {
            begin_course_transition(state, now);
        }
        return;
    }
    if now < state.next_course_at {
        return;
    }

    state.next_course_at = 0;
    if is_final_hole(state, registry) {
        finish_match(state);
    } else {
        load_next_course(state, registry);
    }
}

/// Start the countdown to the next hole
pub(crate) fn begin_course_transition(state: &mut GameState, now: u64) {
    if state.next_course_at != 0 || state.current_hole.is_none() || state.game_over {
        return;
    }
    state.next_course_at = now + state.settings.course_delay_ms;
    state.whose_turn = None;
    state.next_turn_at = 0;
    state.pending_shot = None;
    info!(
        "Hole {:?} complete, next in {}ms",
        state.current_hole, state.settings.course_delay_ms
    );
}

/// A single picked hole is always final, otherwise the campaign's last hole
pub fn is_final_hole(state: &GameState, registry: &CourseRegistry) -> bool {
    if state.selected_hole.is_some() {
        return true;
    }
    state
        .selected_course
        .and_then(|c| registry.campaign(c))
        .is_none_or(|campaign| state.course_number + 1 >= campaign.holes.len())
}

fn load_next_course(state: &mut GameState, registry: &CourseRegistry) {
    let next = state
        .selected_course
        .and_then(|c| registry.campaign(c))
        .and_then(|campaign| campaign.holes.get(state.course_number + 1).copied());
    match next {
        Some(hole) => {
            state.course_number += 1;
            start_course(state, registry, hole);
        }
        None => finish_match(state),
    }
}

/// Load `hole` from the registry. Unknown holes are ignored.
pub(crate) fn start_course(state: &mut GameState, registry: &CourseRegistry, hole: usize) -> bool {
    let Some(course) = registry.course(hole) else {
        return false;
    };

    state.total_par = state.total_par.saturating_add(course.par);
    state.shots_this_course = 0;
    state.emit(EventKind::NewCourse { course_number: hole });
    state.completed.clear();
    state.world = course.world.clone();
    state.start = course.start;
    state.goal = course.goal;
    state.par = course.par;
    state.current_hole = Some(hole);
    state.course_complete = false;
    state.start_game = true;
    state.aim = None;

    let joined = state.joined_players.clone();
    for id in &joined {
        state.add_player(id);
    }
    for player in &mut state.players {
        player.shots = 0;
    }

    state.whose_turn = state.players.first().map(|p| p.player_id.clone());
    state.next_turn_at = 0;
    state.next_course_at = 0;
    state.pending_shot = None;

    info!("Hole {}: {} (par {})", hole, course.name, course.par);
    true
}

/// End the match; the lowest total wins, earliest joiner on ties
pub(crate) fn finish_match(state: &mut GameState) {
    if state.game_over {
        return;
    }
    state.game_over = true;
    state.whose_turn = None;
    state.next_turn_at = 0;
    state.next_course_at = 0;
    state.pending_shot = None;
    state.emit(EventKind::GameOver);

    let winner = state
        .players
        .iter()
        .min_by_key(|p| p.total_shots)
        .map(|p| p.player_id.clone());
    let results: BTreeMap<PlayerId, GameOverResult> = state
        .players
        .iter()
        .map(|p| {
            let result = if Some(&p.player_id) == winner.as_ref() {
                GameOverResult::Won
            } else {
                GameOverResult::Lost
            };
            (p.player_id.clone(), result)
        })
        .collect();

    info!(
        "Match over after {} shots against par {}: winner {:?}",
        state.players.iter().map(|p| p.total_shots).sum::<u32>(),
        state.total_par,
        winner
    );
    state.results = Some(results);
}
