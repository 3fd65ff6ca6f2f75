//! Flavor tags and round selections
//!
//! The game knows exactly eight flavor tags, two per round stage. Every lookup
//! keyed by a tag is an exhaustive `match`, so adding a tag is a compile error
//! everywhere a table needs a new arm.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Sentinel wire value for a skipped round
pub const SKIP: &str = "Skip";

/// The stage a round asks about, in play order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundStage {
    Style,
    Sweetness,
    Texture,
    Topping,
}

impl RoundStage {
    pub const ALL: [RoundStage; 4] = [
        RoundStage::Style,
        RoundStage::Sweetness,
        RoundStage::Texture,
        RoundStage::Topping,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Style => "style",
            Self::Sweetness => "sweetness",
            Self::Texture => "texture",
            Self::Topping => "topping",
        }
    }

    /// The two tags offered in this stage
    pub fn choices(&self) -> [FlavorTag; 2] {
        match self {
            Self::Style => [FlavorTag::Adventure, FlavorTag::Classic],
            Self::Sweetness => [FlavorTag::Rich, FlavorTag::Light],
            Self::Texture => [FlavorTag::Smooth, FlavorTag::Crunchy],
            Self::Topping => [FlavorTag::Sprinkles, FlavorTag::Caramel],
        }
    }
}

impl fmt::Display for RoundStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the eight fixed round choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FlavorTag {
    Adventure,
    Classic,
    Light,
    Rich,
    Smooth,
    Crunchy,
    Sprinkles,
    Caramel,
}

impl FlavorTag {
    pub const ALL: [FlavorTag; 8] = [
        FlavorTag::Adventure,
        FlavorTag::Classic,
        FlavorTag::Light,
        FlavorTag::Rich,
        FlavorTag::Smooth,
        FlavorTag::Crunchy,
        FlavorTag::Sprinkles,
        FlavorTag::Caramel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Adventure => "Adventure",
            Self::Classic => "Classic",
            Self::Light => "Light",
            Self::Rich => "Rich",
            Self::Smooth => "Smooth",
            Self::Crunchy => "Crunchy",
            Self::Sprinkles => "Sprinkles",
            Self::Caramel => "Caramel",
        }
    }

    pub fn stage(&self) -> RoundStage {
        match self {
            Self::Adventure | Self::Classic => RoundStage::Style,
            Self::Light | Self::Rich => RoundStage::Sweetness,
            Self::Smooth | Self::Crunchy => RoundStage::Texture,
            Self::Sprinkles | Self::Caramel => RoundStage::Topping,
        }
    }

    /// Name of the backend inventory ingredient this tag maps to
    pub fn backend_ingredient(&self) -> &'static str {
        match self {
            Self::Adventure => "Rum flavoring (extract)",
            Self::Classic => "Vanilla extract",
            Self::Light => "Lemons (fresh)",
            Self::Rich => "Dark chocolate (70%+ callets)",
            Self::Smooth => "Heavy cream (35-40%)",
            Self::Crunchy => "Hazelnuts (roasted)",
            Self::Sprinkles => "Mini marshmallows",
            Self::Caramel => "Sea-salt caramel drizzle (Jack Sparrow)",
        }
    }
}

impl fmt::Display for FlavorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FlavorTag {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "adventure" => Ok(Self::Adventure),
            "classic" => Ok(Self::Classic),
            "light" => Ok(Self::Light),
            "rich" => Ok(Self::Rich),
            "smooth" => Ok(Self::Smooth),
            "crunchy" => Ok(Self::Crunchy),
            "sprinkles" => Ok(Self::Sprinkles),
            "caramel" => Ok(Self::Caramel),
            _ => Err(DomainError::parse(format!("Unknown flavor tag: {}", s))),
        }
    }
}

/// What a player did in one round.
///
/// Serialized as the tag name, or `"Skip"` for a declined round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Selection {
    Flavor(FlavorTag),
    Skip,
}

impl Selection {
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::Skip)
    }

    pub fn flavor(&self) -> Option<FlavorTag> {
        match self {
            Self::Flavor(tag) => Some(*tag),
            Self::Skip => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flavor(tag) => tag.as_str(),
            Self::Skip => SKIP,
        }
    }
}

impl From<FlavorTag> for Selection {
    fn from(tag: FlavorTag) -> Self {
        Self::Flavor(tag)
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Selection {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case(SKIP) {
            return Ok(Self::Skip);
        }
        s.parse::<FlavorTag>().map(Self::Flavor)
    }
}

impl TryFrom<String> for Selection {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Selection> for String {
    fn from(selection: Selection) -> String {
        selection.as_str().to_string()
    }
}
