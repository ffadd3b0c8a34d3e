//! Turf Golf - deterministic core of a turn-based multiplayer mini-golf game
//!
//! Core modules:
//! - `material`: Fill color to surface material lookup
//! - `physics`: Value-typed rigid body world (the physics collaborator)
//! - `course`: SVG course compiler and the read-only course registry
//! - `sim`: Deterministic match state machine (turns, shots, hazards, events)
//! - `scoring`: Best-score records and par labels
//! - `persistence`: Score store backends
//! - `platform`: Host runtime binding (action log, replay, rollback)
//! - `settings`: Match pacing and tuning

pub mod course;
pub mod material;
pub mod persistence;
pub mod physics;
pub mod platform;
pub mod scoring;
pub mod settings;
pub mod sim;

pub use course::{Course, CourseRegistry};
pub use scoring::{PersistedState, to_par_name};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Ball collision radius
    pub const BALL_RADIUS: f32 = 18.0;
    /// Ball mass (course geometry uses 1 for dynamic props)
    pub const BALL_MASS: f32 = 10.0;
    /// Sink distance is ball bounds + this
    pub const GOAL_RADIUS: f32 = 30.0;
    /// Horizontal spawn offset per join index so balls never overlap exactly
    pub const SPAWN_OFFSET: f32 = 1.0;

    /// Maximum simultaneous players (player_type slots)
    pub const MAX_PLAYERS: usize = 6;

    /// World gravity (side-on view, +y is down)
    pub const GRAVITY: Vec2 = Vec2::new(0.0, 200.0);
    /// Velocity retained per `DAMPING_REFERENCE_MS` of simulated time
    pub const WORLD_DAMPING: f32 = 0.94;
    pub const DAMPING_REFERENCE_MS: f32 = 30.0;
    /// Joint solver passes per step
    pub const JOINT_ITERATIONS: u32 = 5;

    /// Below this speed a body accumulates resting time
    pub const REST_SPEED: f32 = 6.0;
    /// Seconds of low speed before a body counts as at rest
    pub const REST_TIME: f32 = 1.0;
    /// Closing speed under which contacts are treated as inelastic
    pub const RESTITUTION_THRESHOLD: f32 = 12.0;
    /// Closing speed a contact needs to be reported as a collision
    pub const IMPACT_SPEED: f32 = 20.0;

    /// Permeability assigned to water hazards
    pub const WATER_PERMEABILITY: f32 = 0.05;
}

/// Rotate a vector by `angle` radians
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Scalar cross product of two 2D vectors
#[inline]
pub fn cross(a: Vec2, b: Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Cross product of a scalar angular velocity with a lever arm
#[inline]
pub fn cross_scalar(w: f32, r: Vec2) -> Vec2 {
    Vec2::new(-w * r.y, w * r.x)
}
