//! The physics world: body storage, joints and the fixed step
//!
//! `World` is a plain value. Cloning it is a field-by-field copy, which is how
//! a match instantiates a course template and how hosts snapshot state for
//! rollback. Iteration is always in body insertion order, so two clones fed
//! the same steps stay bit-identical.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{Body, BodyId, Shape};
use super::collision::{Contact, contact};
use crate::consts::*;
use crate::{cross, cross_scalar};

/// Distance constraint between two bodies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Joint {
    pub body_a: BodyId,
    pub body_b: BodyId,
    /// Center distance the joint maintains
    pub rest_length: f32,
    /// Elastic give, 0 is rigid
    pub strength: f32,
}

/// A collision reported by `World::step`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionRecord {
    pub body_a: BodyId,
    pub body_b: BodyId,
    pub depth: f32,
}

/// Axis-aligned bounds of a set of bodies
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

/// Fraction of penetration removed per step
const POSITION_CORRECTION: f32 = 0.8;
/// Penetration tolerated without correction
const PENETRATION_SLOP: f32 = 0.05;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub gravity: Vec2,
    /// Linear velocity kept per `DAMPING_REFERENCE_MS`
    pub damping: f32,
    /// Angular velocity kept per `DAMPING_REFERENCE_MS`
    pub angular_damping: f32,
    pub joint_iterations: u32,
    bodies: Vec<Body>,
    joints: Vec<Joint>,
    next_id: BodyId,
}

impl Default for World {
    fn default() -> Self {
        Self::new(GRAVITY)
    }
}

impl World {
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity,
            damping: WORLD_DAMPING,
            angular_damping: WORLD_DAMPING,
            joint_iterations: JOINT_ITERATIONS,
            bodies: Vec::new(),
            joints: Vec::new(),
            next_id: 1,
        }
    }

    fn allocate_id(&mut self) -> BodyId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Create (but do not add) a circle body. Zero mass makes it static.
    pub fn create_circle(&mut self, center: Vec2, radius: f32, mass: f32, friction: f32, restitution: f32) -> Body {
        let id = self.allocate_id();
        Body::new(id, Shape::Circle { radius: radius.max(0.0) }, center, mass, friction, restitution)
    }

    /// Create (but do not add) a rectangle body centered on `center`
    pub fn create_rectangle(
        &mut self,
        center: Vec2,
        width: f32,
        height: f32,
        mass: f32,
        friction: f32,
        restitution: f32,
    ) -> Body {
        let id = self.allocate_id();
        let shape = Shape::Rectangle {
            width: width.max(0.0),
            height: height.max(0.0),
        };
        Body::new(id, shape, center, mass, friction, restitution)
    }

    pub fn add_body(&mut self, body: Body) -> BodyId {
        let id = body.id;
        self.bodies.push(body);
        id
    }

    /// Remove a body and every joint attached to it
    pub fn remove_body(&mut self, id: BodyId) -> Option<Body> {
        let index = self.bodies.iter().position(|b| b.id == id)?;
        self.joints.retain(|j| j.body_a != id && j.body_b != id);
        Some(self.bodies.remove(index))
    }

    /// Exclude a body from simulation while keeping it in the scene
    pub fn disable_body(&mut self, id: BodyId) {
        if let Some(body) = self.body_mut(id) {
            body.enabled = false;
            body.velocity = Vec2::ZERO;
            body.angular_velocity = 0.0;
        }
    }

    /// Join two distinct bodies. `rest_length` defaults to their current
    /// center distance. Returns false if either body is missing or both ends
    /// name the same body.
    pub fn create_joint(&mut self, body_a: BodyId, body_b: BodyId, rest_length: Option<f32>, strength: f32) -> bool {
        if body_a == body_b {
            return false;
        }
        let (Some(a), Some(b)) = (self.body(body_a), self.body(body_b)) else {
            return false;
        };
        let rest_length = rest_length
            .filter(|len| len.is_finite())
            .unwrap_or_else(|| (b.center - a.center).length())
            .max(0.0);
        self.joints.push(Joint {
            body_a,
            body_b,
            rest_length,
            strength: strength.clamp(0.0, 1.0),
        });
        true
    }

    /// Rotate a body in place by `angle` radians
    pub fn rotate_body(&mut self, id: BodyId, angle: f32) {
        if let Some(body) = self.body_mut(id) {
            body.rotate_by(angle);
        }
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|b| b.id == id)
    }

    pub fn all_bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn all_bodies_mut(&mut self) -> impl Iterator<Item = &mut Body> {
        self.bodies.iter_mut()
    }

    pub fn enabled_bodies(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter().filter(|b| b.enabled)
    }

    pub fn dynamic_bodies(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter().filter(|b| b.enabled && b.is_dynamic())
    }

    pub fn dynamic_bodies_mut(&mut self) -> impl Iterator<Item = &mut Body> {
        self.bodies.iter_mut().filter(|b| b.enabled && b.is_dynamic())
    }

    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    /// Bounds of the enabled bodies (only static ones when `static_only`)
    pub fn bounds(&self, static_only: bool) -> Bounds {
        let mut boxes = self
            .enabled_bodies()
            .filter(|b| !static_only || b.is_static())
            .map(Body::aabb);
        let Some(first) = boxes.next() else {
            return Bounds::default();
        };
        let (min, max) = boxes.fold(first, |(min, max), (lo, hi)| (min.min(lo), max.max(hi)));
        Bounds { min, max }
    }

    /// True when every ball owned by a player has come to rest
    pub fn at_rest(&self) -> bool {
        self.dynamic_bodies()
            .filter(|b| b.data.player_id.is_some())
            .all(Body::is_resting)
    }

    fn jointed(&self, a: BodyId, b: BodyId) -> bool {
        self.joints
            .iter()
            .any(|j| (j.body_a == a && j.body_b == b) || (j.body_a == b && j.body_b == a))
    }

    /// Advance the world by `dt_ms` milliseconds, returning the impacts seen
    pub fn step(&mut self, dt_ms: f32) -> Vec<CollisionRecord> {
        if dt_ms <= 0.0 {
            return Vec::new();
        }
        let dt = dt_ms / 1000.0;
        let linear_keep = self.damping.powf(dt_ms / DAMPING_REFERENCE_MS);
        let angular_keep = self.angular_damping.powf(dt_ms / DAMPING_REFERENCE_MS);
        let gravity = self.gravity;

        for body in self.dynamic_bodies_mut() {
            body.velocity = (body.velocity + gravity * dt) * linear_keep;
            body.angular_velocity *= angular_keep;
            body.center += body.velocity * dt;
            body.angle += body.angular_velocity * dt;
        }

        for _ in 0..self.joint_iterations {
            self.solve_joints();
        }

        let records = self.solve_contacts();

        for body in self.dynamic_bodies_mut() {
            if body.velocity.length() < REST_SPEED && body.angular_velocity.abs() < 0.1 {
                body.resting_time += dt;
            } else {
                body.resting_time = 0.0;
            }
        }

        records
    }

    fn index_of(&self, id: BodyId) -> Option<usize> {
        self.bodies.iter().position(|b| b.id == id)
    }

    fn solve_joints(&mut self) {
        for j in 0..self.joints.len() {
            let joint = self.joints[j].clone();
            let (Some(ia), Some(ib)) = (self.index_of(joint.body_a), self.index_of(joint.body_b)) else {
                continue;
            };
            if ia == ib {
                continue;
            }
            let (a, b) = pair_mut(&mut self.bodies, ia, ib);
            let inv_a = a.inv_mass();
            let inv_b = b.inv_mass();
            let total = inv_a + inv_b;
            if total <= 0.0 {
                continue;
            }

            let delta = b.center - a.center;
            let dist = delta.length();
            if dist <= f32::EPSILON {
                continue;
            }
            let dir = delta / dist;
            let error = (dist - joint.rest_length) * (1.0 - joint.strength);
            let correction = dir * (error / total);
            a.center += correction * inv_a;
            b.center -= correction * inv_b;

            // Drop relative motion along the joint axis
            let rel = (b.velocity - a.velocity).dot(dir) * (1.0 - joint.strength);
            let impulse = dir * (rel / total);
            a.velocity += impulse * inv_a;
            b.velocity -= impulse * inv_b;
        }
    }

    fn solve_contacts(&mut self) -> Vec<CollisionRecord> {
        let mut records = Vec::new();
        let count = self.bodies.len();
        for i in 0..count {
            for k in (i + 1)..count {
                let (a, b) = (&self.bodies[i], &self.bodies[k]);
                if !a.enabled || !b.enabled || (a.is_static() && b.is_static()) {
                    continue;
                }
                if self.jointed(a.id, b.id) {
                    continue;
                }
                let Some(hit) = contact(a, b) else {
                    continue;
                };

                let (a, b) = pair_mut(&mut self.bodies, i, k);
                if a.permeability > 0.0 || b.permeability > 0.0 {
                    soak(a, b);
                    continue;
                }
                let impact = resolve(a, b, &hit);
                if impact > IMPACT_SPEED {
                    records.push(CollisionRecord {
                        body_a: a.id,
                        body_b: b.id,
                        depth: hit.depth,
                    });
                }
            }
        }
        records
    }
}

/// Mutable references to two distinct bodies
fn pair_mut(bodies: &mut [Body], i: usize, k: usize) -> (&mut Body, &mut Body) {
    if i < k {
        let (left, right) = bodies.split_at_mut(k);
        (&mut left[i], &mut right[0])
    } else {
        let (left, right) = bodies.split_at_mut(i);
        (&mut right[0], &mut left[k])
    }
}

/// Liquids slow whatever floats in them instead of blocking it
fn soak(a: &mut Body, b: &mut Body) {
    let liquid = a.permeability.max(b.permeability);
    for body in [a, b] {
        if body.is_dynamic() && body.permeability <= 0.0 {
            body.velocity *= liquid;
            body.angular_velocity *= liquid;
        }
    }
}

/// Push two bodies apart and exchange impulses. Returns the closing speed.
fn resolve(a: &mut Body, b: &mut Body, hit: &Contact) -> f32 {
    let inv_a = a.inv_mass();
    let inv_b = b.inv_mass();
    let total = inv_a + inv_b;
    if total <= 0.0 {
        return 0.0;
    }
    let n = hit.normal;

    let correction = n * ((hit.depth - PENETRATION_SLOP).max(0.0) / total * POSITION_CORRECTION);
    a.center -= correction * inv_a;
    b.center += correction * inv_b;

    let ii_a = a.inv_inertia();
    let ii_b = b.inv_inertia();
    let ra = hit.point - a.center;
    let rb = hit.point - b.center;

    let rel = (b.velocity + cross_scalar(b.angular_velocity, rb)) - (a.velocity + cross_scalar(a.angular_velocity, ra));
    let closing = rel.dot(n);
    if closing >= 0.0 {
        return 0.0;
    }

    let restitution = if -closing < RESTITUTION_THRESHOLD {
        0.0
    } else {
        a.restitution.min(b.restitution)
    };
    let ra_n = cross(ra, n);
    let rb_n = cross(rb, n);
    let denom = total + ra_n * ra_n * ii_a + rb_n * rb_n * ii_b;
    let jn = -(1.0 + restitution) * closing / denom;
    apply_impulse(a, b, n * jn, ra, rb);

    // Coulomb friction along the contact tangent
    let rel = (b.velocity + cross_scalar(b.angular_velocity, rb)) - (a.velocity + cross_scalar(a.angular_velocity, ra));
    let tangent = (rel - n * rel.dot(n)).normalize_or_zero();
    if tangent != Vec2::ZERO {
        let ra_t = cross(ra, tangent);
        let rb_t = cross(rb, tangent);
        let denom_t = total + ra_t * ra_t * ii_a + rb_t * rb_t * ii_b;
        let mu = (a.friction * b.friction).sqrt();
        let jt = (-rel.dot(tangent) / denom_t).clamp(-jn * mu, jn * mu);
        apply_impulse(a, b, tangent * jt, ra, rb);
    }

    -closing
}

fn apply_impulse(a: &mut Body, b: &mut Body, impulse: Vec2, ra: Vec2, rb: Vec2) {
    a.velocity -= impulse * a.inv_mass();
    a.angular_velocity -= cross(ra, impulse) * a.inv_inertia();
    b.velocity += impulse * b.inv_mass();
    b.angular_velocity += cross(rb, impulse) * b.inv_inertia();
}
