//! Surface materials
//!
//! Course authors paint geometry with a fixed palette; the fill color decides
//! the material the presentation layer draws and the hazards the sim applies.

use serde::{Deserialize, Serialize};

/// Fill of the circle marking where balls spawn
pub const START_MARKER: &str = "#00ff00";
/// Fill of the circle marking the hole
pub const GOAL_MARKER: &str = "#ff0000";
/// Fill that, combined with a `class`, marks decorative sprites
pub const DECORATION_FILL: &str = "#000000";

/// Material painted on a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum MaterialType {
    #[default]
    Grass = 1,
    Stone0 = 2,
    Stone1 = 3,
    Stone2 = 4,
    Stone3 = 5,
    Water = 6,
    Bouncer = 7,
    Block = 8,
    Peg = 10,
    Wood = 11,
    RedGrass = 12,
    Sand = 13,
}

const FILL_TABLE: [(&str, MaterialType); 12] = [
    ("#a5e306", MaterialType::Grass),
    ("#ff7f00", MaterialType::RedGrass),
    ("#a8cbcc", MaterialType::Stone0),
    ("#8bb8be", MaterialType::Stone1),
    ("#5b8b95", MaterialType::Stone2),
    ("#487d8f", MaterialType::Stone3),
    ("#ffff00", MaterialType::Bouncer),
    ("#0000ff", MaterialType::Block),
    ("#00ffff", MaterialType::Peg),
    ("#ff00ff", MaterialType::Wood),
    ("#f7ba3e", MaterialType::Sand),
    ("#3fa9f5", MaterialType::Water),
];

impl MaterialType {
    /// Resolve a fill color; anything unrecognised is grass
    pub fn from_fill(fill: Option<&str>) -> Self {
        let Some(fill) = fill else {
            return Self::default();
        };
        let fill = fill.trim();
        FILL_TABLE
            .iter()
            .find(|(color, _)| color.eq_ignore_ascii_case(fill))
            .map(|(_, material)| *material)
            .unwrap_or_default()
    }

    /// Bouncers inflate on impact and kick the other body away
    pub fn is_bouncer(self) -> bool {
        self == Self::Bouncer
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Grass => "grass",
            Self::Stone0 => "stone0",
            Self::Stone1 => "stone1",
            Self::Stone2 => "stone2",
            Self::Stone3 => "stone3",
            Self::Water => "water",
            Self::Bouncer => "bouncer",
            Self::Block => "block",
            Self::Peg => "peg",
            Self::Wood => "wood",
            Self::RedGrass => "redgrass",
            Self::Sand => "sand",
        }
    }
}

/// True when `fill` is the given reserved marker color
pub fn is_fill(fill: Option<&str>, marker: &str) -> bool {
    fill.is_some_and(|f| f.trim().eq_ignore_ascii_case(marker))
}
