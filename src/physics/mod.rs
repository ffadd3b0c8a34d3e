//! Rigid body physics used by the simulation
//!
//! A deliberately small engine: circles and oriented rectangles, distance
//! joints, impulse contacts with friction, and liquids. Everything is a value
//! type so worlds can be cloned, serialized and replayed.

pub mod body;
pub mod collision;
pub mod world;

pub use body::{Body, BodyData, BodyId, Shape};
pub use collision::{Contact, contact, sd_circle};
pub use world::{Bounds, CollisionRecord, Joint, World};
