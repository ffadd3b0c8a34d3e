//! Course registry
//!
//! Every hole is compiled once, up front, and never mutated afterwards.
//! Matches hold the registry behind an `Arc` and clone only the template
//! world of the hole they load.

use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::{Course, CourseError, compile_course};

/// Embedded course drawings, in hole order
const BUILTIN_ASSETS: [(&str, &str); 8] = [
    ("first_tee.svg", include_str!("../../assets/courses/first_tee.svg")),
    ("hill_climb.svg", include_str!("../../assets/courses/hill_climb.svg")),
    ("bumper_alley.svg", include_str!("../../assets/courses/bumper_alley.svg")),
    ("windmill.svg", include_str!("../../assets/courses/windmill.svg")),
    ("water_carry.svg", include_str!("../../assets/courses/water_carry.svg")),
    ("rope_bridge.svg", include_str!("../../assets/courses/rope_bridge.svg")),
    ("sand_trap.svg", include_str!("../../assets/courses/sand_trap.svg")),
    ("pegboard.svg", include_str!("../../assets/courses/pegboard.svg")),
];

/// A named run of holes players can pick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    pub name: String,
    pub id: String,
    pub holes: Vec<usize>,
}

impl Campaign {
    pub fn new(name: &str, id: &str, holes: impl Into<Vec<usize>>) -> Self {
        Self {
            name: name.to_string(),
            id: id.to_string(),
            holes: holes.into(),
        }
    }

    /// Position of `hole` within the campaign
    pub fn position(&self, hole: usize) -> Option<usize> {
        self.holes.iter().position(|&h| h == hole)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CourseRegistry {
    courses: Vec<Course>,
    campaigns: Vec<Campaign>,
}

impl CourseRegistry {
    /// Compile the embedded courses
    pub fn builtin() -> Result<Self, CourseError> {
        let campaigns = vec![
            Campaign::new("Meadow Links", "meadow", [0, 1, 2, 3]),
            Campaign::new("Quarry Run", "quarry", [4, 5, 6, 7]),
        ];
        Self::from_assets(BUILTIN_ASSETS, campaigns)
    }

    /// Compile `(asset name, svg)` pairs in hole order
    pub fn from_assets<'a>(
        assets: impl IntoIterator<Item = (&'a str, &'a str)>,
        campaigns: Vec<Campaign>,
    ) -> Result<Self, CourseError> {
        let courses = assets
            .into_iter()
            .map(|(asset, svg)| {
                compile_course(svg).map_err(|source| CourseError::InAsset {
                    asset: asset.to_string(),
                    source: Box::new(source),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let registry = Self::from_courses(courses, campaigns);
        info!(
            "Course registry ready: {} holes in {} campaigns",
            registry.len(),
            registry.campaigns.len()
        );
        Ok(registry)
    }

    /// Build from already compiled courses. Campaign holes that do not exist
    /// are dropped.
    pub fn from_courses(courses: Vec<Course>, mut campaigns: Vec<Campaign>) -> Self {
        let count = courses.len();
        for campaign in &mut campaigns {
            campaign.holes.retain(|&hole| {
                let known = hole < count;
                if !known {
                    warn!("Campaign {} names unknown hole {}", campaign.id, hole);
                }
                known
            });
        }
        Self { courses, campaigns }
    }

    pub fn course(&self, hole: usize) -> Option<&Course> {
        self.courses.get(hole)
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn campaign(&self, index: usize) -> Option<&Campaign> {
        self.campaigns.get(index)
    }

    pub fn campaigns(&self) -> &[Campaign] {
        &self.campaigns
    }

    /// First campaign containing `hole`
    pub fn campaign_of(&self, hole: usize) -> Option<usize> {
        self.campaigns.iter().position(|c| c.position(hole).is_some())
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_builtin_courses_compile() {
        let registry = CourseRegistry::builtin().expect("builtin courses compile");
        assert_eq!(registry.len(), 8);
        assert_eq!(registry.campaigns().len(), 2);
        for course in registry.courses() {
            assert!(!course.name.is_empty());
            assert!(course.par > 0, "{} has no par", course.name);
            assert_ne!(course.start, Vec2::ZERO, "{} has no tee", course.name);
            assert_ne!(course.goal, Vec2::ZERO, "{} has no hole", course.name);
            // The hole must sit inside the playable area
            let bounds = course.world.bounds(true);
            assert!(course.goal.y <= bounds.max.y, "{} hole below the course", course.name);
        }
        assert_eq!(registry.course(0).map(|c| c.name.as_str()), Some("First Tee"));
        assert!(registry.course(8).is_none());
    }

    #[test]
    fn test_builtin_hazards_present() {
        let registry = CourseRegistry::builtin().expect("builtin courses compile");
        let windmill = registry.course(3).expect("windmill");
        assert!(windmill.world.all_bodies().iter().any(|b| b.data.pinned));
        let water = registry.course(4).expect("water carry");
        assert!(water.world.all_bodies().iter().any(|b| b.permeability > 0.0));
        let bridge = registry.course(5).expect("rope bridge");
        assert_eq!(bridge.world.joints().len(), 6);
    }

    #[test]
    fn test_campaign_lookup() {
        let registry = CourseRegistry::builtin().expect("builtin courses compile");
        assert_eq!(registry.campaign_of(5), Some(1));
        assert_eq!(registry.campaign(1).and_then(|c| c.position(5)), Some(1));
        assert_eq!(registry.campaign_of(42), None);
    }

    #[test]
    fn test_bad_asset_names_the_file() {
        let err = CourseRegistry::from_assets([("broken.svg", "<svg>")], Vec::new()).expect_err("bad xml");
        assert!(err.to_string().contains("broken.svg"));
    }

    #[test]
    fn test_unknown_campaign_holes_dropped() {
        let registry = CourseRegistry::from_courses(Vec::new(), vec![Campaign::new("Empty", "empty", [0, 1])]);
        assert!(registry.campaign(0).is_some_and(|c| c.holes.is_empty()));
    }
}
