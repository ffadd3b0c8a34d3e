//! Computer players for the headless demo
//!
//! Bots live on the host side of the boundary: they read the match state and
//! produce ordinary actions, so their randomness never enters the core.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::rotate;
use crate::sim::{Action, BallPhase, GameState, MatchPhase, PlayerId};

/// Upward loft added to every shot
const LOFT: f32 = 0.6;
/// Power per pixel of horizontal distance to the hole
const POWER_PER_PIXEL: f32 = 0.35;
const MIN_POWER: f32 = 30.0;
/// Largest aim error in radians
const AIM_JITTER: f32 = 0.15;

#[derive(Debug, Clone)]
pub struct Bot {
    pub player_id: PlayerId,
    rng: Pcg32,
}

impl Bot {
    pub fn new(player_id: &str, seed: u64) -> Self {
        Self {
            player_id: player_id.to_string(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// The shot this bot wants to take now, if it may take one
    pub fn decide(&mut self, state: &GameState) -> Option<Action> {
        if state.phase() != MatchPhase::InCourse || state.ball_phase(&self.player_id) != BallPhase::AwaitingShot {
            return None;
        }
        if !state.settings.mania_mode
            && (state.whose_turn.as_deref() != Some(self.player_id.as_str())
                || state.pending_shot.is_some()
                || state.next_turn_at != 0)
        {
            return None;
        }

        let ball = state.ball(&self.player_id)?.center;
        let to_goal = state.goal - ball;
        let side = if to_goal.x < 0.0 { -1.0 } else { 1.0 };
        let aim = Vec2::new(side, -LOFT).normalize();
        let aim = rotate(aim, self.rng.random_range(-AIM_JITTER..AIM_JITTER));

        let power = (to_goal.x.abs() * POWER_PER_PIXEL).max(MIN_POWER) * self.rng.random_range(0.8..1.2);
        Some(Action::Shoot {
            dx: aim.x,
            dy: aim.y,
            power: power.min(state.settings.max_power),
        })
    }
}
