//! Quality tiers and effective-tier resolution.
//!
//! A tier can be stored at four levels (lesson, section, project, folder).
//! [`resolve_effective_tier`] is the only place that decides which one wins.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Rate class controlling how much creator effort a lesson costs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Basic,
    Interactive,
    Advanced,
    Immersive,
}

impl Default for QualityTier {
    fn default() -> Self {
        Self::Interactive
    }
}

impl QualityTier {
    /// Canonical ordering used by every tier table.
    pub const ALL: [QualityTier; 4] =
        [QualityTier::Basic, QualityTier::Interactive, QualityTier::Advanced, QualityTier::Immersive];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match *self {
            Self::Basic => "basic",
            Self::Interactive => "interactive",
            Self::Advanced => "advanced",
            Self::Immersive => "immersive",
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match *self {
            Self::Basic => "Basic",
            Self::Interactive => "Interactive",
            Self::Advanced => "Advanced",
            Self::Immersive => "Immersive",
        }
    }

    /// Creation effort as a percentage of completion time.
    #[must_use]
    pub const fn rate_percent(&self) -> u64 {
        match *self {
            Self::Basic => 150,
            Self::Interactive => 200,
            Self::Advanced => 300,
            Self::Immersive => 400,
        }
    }

    /// Position in [`QualityTier::ALL`].
    #[must_use]
    pub const fn index(&self) -> usize {
        match *self {
            Self::Basic => 0,
            Self::Interactive => 1,
            Self::Advanced => 2,
            Self::Immersive => 3,
        }
    }

    /// Lenient conversion: unknown or empty values become the default tier.
    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        raw.parse().unwrap_or_else(|_| {
            tracing::debug!(tier = %raw, "unrecognized quality tier, using default");
            Self::default()
        })
    }
}

impl FromStr for QualityTier {
    type Err = CoreError;

    /// Strict parse accepting canonical names and legacy aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" | "starter" => Ok(Self::Basic),
            "interactive" | "medium" => Ok(Self::Interactive),
            "advanced" => Ok(Self::Advanced),
            "immersive" | "professional" => Ok(Self::Immersive),
            other => Err(CoreError::UnknownTier(other.to_owned())),
        }
    }
}

impl std::fmt::Display for QualityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tier values found along one lesson's ancestry, innermost first.
#[derive(Debug, Clone, Copy, Default)]
pub struct TierChain<'a> {
    pub lesson: Option<&'a str>,
    pub section: Option<&'a str>,
    pub project: Option<&'a str>,
    pub folder: Option<&'a str>,
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Resolve the tier that applies to a lesson.
///
/// Picks the first non-blank value in lesson → section → project → folder
/// order and normalizes it. A picked value that is not a known tier does not
/// fall through to the next level; it becomes `interactive`.
#[must_use]
pub fn resolve_effective_tier(chain: TierChain<'_>) -> QualityTier {
    present(chain.lesson)
        .or_else(|| present(chain.section))
        .or_else(|| present(chain.project))
        .or_else(|| present(chain.folder))
        .map_or_else(QualityTier::default, QualityTier::normalize)
}
