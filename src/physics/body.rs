//! Rigid bodies and their game payload

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::REST_TIME;
use crate::material::MaterialType;
use crate::rotate;

/// Stable body identifier, unique within a world
pub type BodyId = u32;

/// Collision shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { radius: f32 },
    Rectangle { width: f32, height: f32 },
}

impl Shape {
    /// Bounding radius (the circle radius for circles)
    pub fn bounds(&self) -> f32 {
        match *self {
            Shape::Circle { radius } => radius,
            Shape::Rectangle { width, height } => (width * width + height * height).sqrt() / 2.0,
        }
    }

    fn moment_of_inertia(&self, mass: f32) -> f32 {
        match *self {
            Shape::Circle { radius } => 0.5 * mass * radius * radius,
            Shape::Rectangle { width, height } => mass * (width * width + height * height) / 12.0,
        }
    }
}

/// Game payload carried by a body
///
/// The physics step never reads this except for `player_id` in `World::at_rest`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BodyData {
    pub material: Option<MaterialType>,
    /// `id` attribute of the drawing element this body came from
    pub svg_id: Option<String>,
    /// Owner, for golf balls
    pub player_id: Option<String>,
    /// Presentation sprite for decorative bodies
    pub sprite: Option<String>,
    /// Held in place by a spin anchor
    pub pinned: bool,
    /// Bouncer radius before any inflation
    pub original_bounds: Option<f32>,
    /// Logical time a bouncer deflates back to `original_bounds`
    pub deflate_until: Option<u64>,
    /// Where the ball sat when its latest shot was taken
    pub shot_origin: Option<Vec2>,
    /// Set for one tick after an out-of-bounds recovery
    pub out_of_bounds: bool,
}

/// A rigid body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub id: BodyId,
    pub shape: Shape,
    pub center: Vec2,
    /// Rotation in radians
    pub angle: f32,
    pub velocity: Vec2,
    pub angular_velocity: f32,
    /// Zero mass means static
    pub mass: f32,
    pub friction: f32,
    pub restitution: f32,
    /// Non-zero bodies are liquids: overlapping bodies are slowed, not blocked
    pub permeability: f32,
    /// Disabled bodies are kept for presentation but skipped by the step
    pub enabled: bool,
    /// Seconds spent below `REST_SPEED`
    pub resting_time: f32,
    pub data: BodyData,
}

impl Body {
    pub(crate) fn new(id: BodyId, shape: Shape, center: Vec2, mass: f32, friction: f32, restitution: f32) -> Self {
        Self {
            id,
            shape,
            center,
            angle: 0.0,
            velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            mass: mass.max(0.0),
            friction,
            restitution,
            permeability: 0.0,
            enabled: true,
            resting_time: 0.0,
            data: BodyData::default(),
        }
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.mass <= 0.0
    }

    #[inline]
    pub fn is_dynamic(&self) -> bool {
        !self.is_static()
    }

    pub fn inv_mass(&self) -> f32 {
        if self.is_static() { 0.0 } else { 1.0 / self.mass }
    }

    pub fn inv_inertia(&self) -> f32 {
        if self.is_static() {
            return 0.0;
        }
        let inertia = self.shape.moment_of_inertia(self.mass);
        if inertia > 0.0 { 1.0 / inertia } else { 0.0 }
    }

    /// Bounding radius used by the goal test and bouncer inflation
    pub fn bounds(&self) -> f32 {
        self.shape.bounds()
    }

    /// Resize the shape so its bounding radius becomes `bounds`
    pub fn set_bounds(&mut self, bounds: f32) {
        match &mut self.shape {
            Shape::Circle { radius } => *radius = bounds,
            Shape::Rectangle { width, height } => {
                let current = (*width * *width + *height * *height).sqrt() / 2.0;
                if current > 0.0 {
                    let scale = bounds / current;
                    *width *= scale;
                    *height *= scale;
                }
            }
        }
    }

    /// Rotate in place by `angle` radians
    pub fn rotate_by(&mut self, angle: f32) {
        self.angle += angle;
    }

    pub fn is_resting(&self) -> bool {
        self.resting_time >= REST_TIME
    }

    /// Teleport, dropping all motion
    pub fn place(&mut self, center: Vec2) {
        self.center = center;
        self.velocity = Vec2::ZERO;
        self.angular_velocity = 0.0;
        self.resting_time = 0.0;
    }

    /// World-space corners of a rectangle (or the bounding square of a circle)
    pub fn corners(&self) -> [Vec2; 4] {
        let half = self.half_extents();
        [
            Vec2::new(-half.x, -half.y),
            Vec2::new(half.x, -half.y),
            Vec2::new(half.x, half.y),
            Vec2::new(-half.x, half.y),
        ]
        .map(|c| self.center + rotate(c, self.angle))
    }

    pub(crate) fn half_extents(&self) -> Vec2 {
        match self.shape {
            Shape::Circle { radius } => Vec2::splat(radius),
            Shape::Rectangle { width, height } => Vec2::new(width / 2.0, height / 2.0),
        }
    }

    /// Axis-aligned bounding box as (min, max)
    pub fn aabb(&self) -> (Vec2, Vec2) {
        match self.shape {
            Shape::Circle { radius } => (self.center - Vec2::splat(radius), self.center + Vec2::splat(radius)),
            Shape::Rectangle { .. } => {
                let corners = self.corners();
                let min = corners.iter().fold(Vec2::splat(f32::INFINITY), |acc, c| acc.min(*c));
                let max = corners.iter().fold(Vec2::splat(f32::NEG_INFINITY), |acc, c| acc.max(*c));
                (min, max)
            }
        }
    }
}
