//! Goal and bounds monitor

use log::{debug, info};

use super::event::EventKind;
use super::state::{GameState, PlayerId};
use crate::consts::GOAL_RADIUS;
use crate::physics::BodyId;
use crate::scoring::{saturating_i32, to_par_name};

/// Remove balls that reached the hole and record their scores
pub(crate) fn check_sinks(state: &mut GameState) {
    let goal = state.goal;
    let sunk: Vec<(BodyId, PlayerId)> = state
        .world
        .dynamic_bodies()
        .filter_map(|b| b.data.player_id.as_ref().map(|owner| (b, owner)))
        .filter(|(b, owner)| state.has_player(owner) && (goal - b.center).length() < b.bounds() + GOAL_RADIUS)
        .map(|(b, owner)| (b.id, owner.clone()))
        .collect();

    for (body_id, player_id) in sunk {
        state.world.remove_body(body_id);
        if state.is_completed(&player_id) {
            continue;
        }
        state.completed.push(player_id.clone());
        state.emit(EventKind::Sink {
            player_id: player_id.clone(),
        });

        let shots = state.player(&player_id).map_or(0, |p| p.shots);
        if let Some(hole) = state.current_hole {
            let par = state.par;
            let improved = state.persisted.entry(player_id.clone()).or_default().record(hole, par, shots);
            info!(
                "{} sank hole {} in {} ({}){}",
                player_id,
                hole,
                shots,
                to_par_name(saturating_i32(par), saturating_i32(shots)),
                if improved { ", new best" } else { "" }
            );
        }
    }
}

/// Return balls that fell off the course to where their last shot started
pub(crate) fn check_bounds(state: &mut GameState) {
    let limit = state.world.bounds(true).max.y + state.settings.out_of_bounds_margin;
    let start = state.start;
    for ball in state.world.dynamic_bodies_mut() {
        if ball.data.player_id.is_none() || ball.center.y <= limit {
            continue;
        }
        let origin = ball.data.shot_origin.unwrap_or(start);
        debug!("Ball {} out of bounds, back to {}", ball.id, origin);
        ball.place(origin);
        ball.data.out_of_bounds = true;
    }
}
