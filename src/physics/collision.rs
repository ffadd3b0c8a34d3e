//! Contact generation between circles and oriented rectangles
//!
//! Every test returns the contact normal pointing from the first body toward
//! the second, plus the penetration depth along it.

use glam::Vec2;

use super::body::{Body, Shape};
use crate::rotate;

/// A single contact between two overlapping bodies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Contact point in world space
    pub point: Vec2,
    /// Unit normal from the first body toward the second
    pub normal: Vec2,
    /// Penetration depth along `normal`
    pub depth: f32,
}

impl Contact {
    fn flipped(self) -> Self {
        Self {
            normal: -self.normal,
            ..self
        }
    }
}

/// Signed distance from `p` to a circle
#[inline]
pub fn sd_circle(p: Vec2, center: Vec2, radius: f32) -> f32 {
    (p - center).length() - radius
}

/// Find the contact between two bodies, if they overlap
pub fn contact(a: &Body, b: &Body) -> Option<Contact> {
    match (a.shape, b.shape) {
        (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
            circle_circle(a.center, ra, b.center, rb)
        }
        (Shape::Rectangle { .. }, Shape::Circle { radius }) => rect_circle(a, b.center, radius),
        (Shape::Circle { radius }, Shape::Rectangle { .. }) => {
            rect_circle(b, a.center, radius).map(Contact::flipped)
        }
        (Shape::Rectangle { .. }, Shape::Rectangle { .. }) => rect_rect(a, b),
    }
}

fn circle_circle(ca: Vec2, ra: f32, cb: Vec2, rb: f32) -> Option<Contact> {
    let distance = sd_circle(cb, ca, ra + rb);
    if distance >= 0.0 {
        return None;
    }
    let delta = cb - ca;
    let len = delta.length();
    // Concentric circles: push apart along +x so the outcome is reproducible
    let normal = if len > f32::EPSILON { delta / len } else { Vec2::X };
    Some(Contact {
        point: ca + normal * ra,
        normal,
        depth: -distance,
    })
}

/// Contact with normal pointing from the rectangle toward the circle
fn rect_circle(rect: &Body, center: Vec2, radius: f32) -> Option<Contact> {
    let half = rect.half_extents();
    let local = rotate(center - rect.center, -rect.angle);
    let closest = local.clamp(-half, half);

    if closest == local {
        // Circle center inside the rectangle: leave through the nearest face
        let to_x = half.x - local.x.abs();
        let to_y = half.y - local.y.abs();
        let (local_normal, face_distance) = if to_x < to_y {
            (Vec2::new(local.x.signum(), 0.0), to_x)
        } else {
            (Vec2::new(0.0, if local.y < 0.0 { -1.0 } else { 1.0 }), to_y)
        };
        let normal = rotate(local_normal, rect.angle);
        return Some(Contact {
            point: center - normal * face_distance,
            normal,
            depth: radius + face_distance,
        });
    }

    let delta = local - closest;
    let dist = delta.length();
    if dist >= radius {
        return None;
    }
    let normal = rotate(delta / dist, rect.angle);
    Some(Contact {
        point: rect.center + rotate(closest, rect.angle),
        normal,
        depth: radius - dist,
    })
}

fn project(corners: &[Vec2; 4], axis: Vec2) -> (f32, f32) {
    corners.iter().fold((f32::INFINITY, f32::NEG_INFINITY), |(min, max), c| {
        let d = c.dot(axis);
        (min.min(d), max.max(d))
    })
}

/// Separating axis test between two oriented rectangles
fn rect_rect(a: &Body, b: &Body) -> Option<Contact> {
    let ca = a.corners();
    let cb = b.corners();
    let axes = [
        rotate(Vec2::X, a.angle),
        rotate(Vec2::Y, a.angle),
        rotate(Vec2::X, b.angle),
        rotate(Vec2::Y, b.angle),
    ];

    let mut best: Option<(f32, Vec2)> = None;
    for axis in axes {
        let (min_a, max_a) = project(&ca, axis);
        let (min_b, max_b) = project(&cb, axis);
        let overlap = max_a.min(max_b) - min_a.max(min_b);
        if overlap <= 0.0 {
            return None;
        }
        if best.is_none_or(|(depth, _)| overlap < depth) {
            let normal = if (b.center - a.center).dot(axis) < 0.0 { -axis } else { axis };
            best = Some((overlap, normal));
        }
    }

    let (depth, normal) = best?;
    // Deepest corner of `b` along the normal
    let point = cb
        .iter()
        .copied()
        .min_by(|p, q| p.dot(normal).total_cmp(&q.dot(normal)))
        .unwrap_or(b.center);
    Some(Contact { point, normal, depth })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn circle(center: Vec2, radius: f32) -> Body {
        Body::new(1, Shape::Circle { radius }, center, 1.0, 1.0, 0.5)
    }

    fn rect(center: Vec2, width: f32, height: f32) -> Body {
        Body::new(2, Shape::Rectangle { width, height }, center, 0.0, 1.0, 0.5)
    }

    #[test]
    fn circles_touching() {
        let a = circle(Vec2::ZERO, 10.0);
        let b = circle(Vec2::new(15.0, 0.0), 10.0);
        let c = contact(&a, &b).expect("overlap");
        assert_eq!(c.normal, Vec2::X);
        assert!((c.depth - 5.0).abs() < 1e-5);

        let far = circle(Vec2::new(25.0, 0.0), 10.0);
        assert!(contact(&a, &far).is_none());
    }

    #[test]
    fn ball_resting_on_floor() {
        let floor = rect(Vec2::new(0.0, 50.0), 200.0, 20.0);
        // Floor top is y=40; ball bottom at y=42
        let ball = circle(Vec2::new(10.0, 32.0), 10.0);
        let c = contact(&ball, &floor).expect("overlap");
        // Normal from ball toward floor points down
        assert!((c.normal - Vec2::Y).length() < 1e-5);
        assert!((c.depth - 2.0).abs() < 1e-4);
    }

    #[test]
    fn circle_center_inside_rectangle() {
        let block = rect(Vec2::ZERO, 100.0, 20.0);
        let ball = circle(Vec2::new(0.0, -8.0), 5.0);
        let c = contact(&block, &ball).expect("overlap");
        assert!((c.normal - Vec2::NEG_Y).length() < 1e-5);
        assert!((c.depth - 7.0).abs() < 1e-4);
    }

    #[test]
    fn rotated_rectangles_separate() {
        let a = rect(Vec2::ZERO, 20.0, 20.0);
        let mut b = rect(Vec2::new(22.0, 0.0), 20.0, 20.0);
        assert!(contact(&a, &b).is_none());
        b.rotate_by(std::f32::consts::FRAC_PI_4);
        let c = contact(&a, &b).expect("corner reaches into a");
        assert!(c.normal.x > 0.9);
        assert!(c.depth > 0.0);
    }
}
