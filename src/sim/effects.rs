//! Collision effects: bouncers inflate and kick whatever hit them

use log::trace;

use super::event::EventKind;
use super::state::GameState;
use crate::physics::{BodyId, CollisionRecord};

/// React to this tick's collision records
pub(crate) fn apply_collisions(state: &mut GameState, records: &[CollisionRecord]) {
    for record in records {
        bounce(state, record.body_a, record.body_b);
        bounce(state, record.body_b, record.body_a);
    }

    if let Some(max_depth) = records.iter().map(|r| r.depth).reduce(f32::max) {
        state.emit(EventKind::Collision { max_depth });
    }
}

fn bounce(state: &mut GameState, bouncer_id: BodyId, other_id: BodyId) {
    let now = state.game_time;
    let settings = &state.settings;
    let (scale, impulse, window) = (settings.bouncer_scale, settings.bouncer_impulse, settings.deflate_window_ms);

    let Some(bouncer) = state.world.body(bouncer_id).filter(|b| b.enabled) else {
        return;
    };
    let Some(original) = bouncer.data.original_bounds else {
        return;
    };
    let inflated = bouncer.data.deflate_until.is_some();
    let center = bouncer.center;

    if !inflated {
        if let Some(other) = state.world.body_mut(other_id).filter(|b| b.enabled && b.is_dynamic()) {
            other.velocity += (other.center - center).normalize_or_zero() * impulse;
            trace!("Bouncer {} kicked body {}", bouncer_id, other_id);
        }
    }

    if let Some(bouncer) = state.world.body_mut(bouncer_id) {
        bouncer.set_bounds(original * scale);
        bouncer.data.deflate_until = Some(now + window);
    }
}

/// Shrink bouncers whose deflate window has passed
pub(crate) fn restore_bouncers(state: &mut GameState) {
    let now = state.game_time;
    for body in state.world.all_bodies_mut().filter(|b| b.enabled) {
        let (Some(until), Some(original)) = (body.data.deflate_until, body.data.original_bounds) else {
            continue;
        };
        if until < now {
            body.set_bounds(original);
            body.data.deflate_until = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{BALL_MASS, BALL_RADIUS};
    use crate::settings::Settings;
    use crate::sim::test_support::{ids, registry};
    use glam::Vec2;

    fn bouncer_scene() -> (GameState, BodyId, BodyId) {
        let registry = registry();
        let mut state = GameState::new(&registry, Settings::default(), &ids(&["a"]));
        let mut bumper = state.world.create_circle(Vec2::new(0.0, 0.0), 20.0, 0.0, 1.0, 0.5);
        bumper.data.original_bounds = Some(20.0);
        let bumper = state.world.add_body(bumper);
        let mut ball = state.world.create_circle(Vec2::new(30.0, 0.0), BALL_RADIUS, BALL_MASS, 1.0, 1.0);
        ball.data.player_id = Some("a".into());
        let ball = state.world.add_body(ball);
        (state, bumper, ball)
    }

    fn record(a: BodyId, b: BodyId, depth: f32) -> CollisionRecord {
        CollisionRecord {
            body_a: a,
            body_b: b,
            depth,
        }
    }

    #[test]
    fn test_bouncer_inflates_and_kicks() {
        let (mut state, bumper, ball) = bouncer_scene();
        state.game_time = 1000;
        apply_collisions(&mut state, &[record(ball, bumper, 2.0), record(bumper, ball, 3.5)]);

        let bumper_body = state.world.body(bumper).expect("bumper");
        assert_eq!(bumper_body.bounds(), 25.0);
        assert_eq!(bumper_body.data.deflate_until, Some(2000));

        // One kick only: the second record finds the bouncer already inflated
        let ball_body = state.world.body(ball).expect("ball");
        assert_eq!(ball_body.velocity, Vec2::new(300.0, 0.0));

        let collisions: Vec<_> = state.events.iter().map(|e| e.kind.clone()).collect();
        assert_eq!(collisions, vec![EventKind::Collision { max_depth: 3.5 }]);
    }

    #[test]
    fn test_static_other_body_is_not_kicked() {
        let (mut state, bumper, _) = bouncer_scene();
        let wall = state.world.create_rectangle(Vec2::new(0.0, 40.0), 100.0, 10.0, 0.0, 1.0, 0.5);
        let wall = state.world.add_body(wall);
        apply_collisions(&mut state, &[record(bumper, wall, 1.0)]);
        assert_eq!(state.world.body(wall).map(|w| w.velocity), Some(Vec2::ZERO));
        assert!(state.world.body(bumper).is_some_and(|b| b.data.deflate_until.is_some()));
    }

    #[test]
    fn test_bouncer_restores_after_window() {
        let (mut state, bumper, ball) = bouncer_scene();
        state.game_time = 100;
        apply_collisions(&mut state, &[record(ball, bumper, 1.0)]);

        state.game_time = 1100;
        restore_bouncers(&mut state);
        assert_eq!(state.world.body(bumper).map(|b| b.bounds()), Some(25.0));

        state.game_time = 1101;
        restore_bouncers(&mut state);
        let bumper_body = state.world.body(bumper).expect("bumper");
        assert_eq!(bumper_body.bounds(), 20.0);
        assert!(bumper_body.data.deflate_until.is_none());
    }

    #[test]
    fn test_no_records_no_event() {
        let (mut state, _, _) = bouncer_scene();
        apply_collisions(&mut state, &[]);
        assert!(state.events.is_empty());
    }
}
