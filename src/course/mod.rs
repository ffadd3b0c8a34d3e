//! Courses: compiled from SVG drawings, held in a read-only registry

pub mod compiler;
pub mod drawing;
pub mod registry;
pub mod transform;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::physics::World;

pub use compiler::compile_course;
pub use registry::{Campaign, CourseRegistry};
pub use transform::Transform;

/// One playable hole, immutable once compiled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Where balls spawn
    pub start: Vec2,
    /// Center of the hole
    pub goal: Vec2,
    /// Template scene; matches clone it when the hole loads
    pub world: World,
    pub name: String,
    pub par: u32,
}

#[derive(Debug, Error)]
pub enum CourseError {
    #[error("course drawing is not well-formed XML: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("course drawing has no <title>")]
    MissingTitle,
    #[error("course asset {asset}: {source}")]
    InAsset {
        asset: String,
        #[source]
        source: Box<CourseError>,
    },
}
