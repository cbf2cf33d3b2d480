pub mod input;
pub mod roster;
pub mod validate;

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CalculationMethod {
    Direct,
    WithEngagement,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Deliverables {
    Reels,
    Stories,
    #[serde(rename = "Reels+Stories")]
    ReelsAndStories,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SizeClass {
    Macro,
    Mid,
    Micro,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TargetAudience {
    Newcomers,
    Investors,
    #[serde(rename = "Newcomers&Investors")]
    NewcomersAndInvestors,
}

impl CalculationMethod {
    pub const ALL: [CalculationMethod; 2] = [Self::Direct, Self::WithEngagement];

    pub fn as_slug(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::WithEngagement => "with_engagement",
        }
    }

    pub fn formula(&self) -> &'static str {
        match self {
            Self::Direct => "Expected Sales = Expected Reach × Conversion Rate",
            Self::WithEngagement => {
                "Expected Sales = Expected Reach × Engagement Rate × Conversion Rate"
            }
        }
    }
}

impl SizeClass {
    pub const ALL: [SizeClass; 3] = [Self::Macro, Self::Mid, Self::Micro];

    pub fn color_hex(&self) -> &'static str {
        match self {
            Self::Macro => "#1F77B4",
            Self::Mid => "#FF7F0E",
            Self::Micro => "#2CA02C",
        }
    }
}

impl Display for CalculationMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let display = match self {
            Self::Direct => "Direct (Reach → Sales)",
            Self::WithEngagement => "With Engagement (Reach → Engagement → Sales)",
        };
        write!(f, "{display}")
    }
}

impl Display for Deliverables {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let display = match self {
            Self::Reels => "Reels",
            Self::Stories => "Stories",
            Self::ReelsAndStories => "Reels+Stories",
        };
        write!(f, "{display}")
    }
}

impl Display for SizeClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let display = match self {
            Self::Macro => "Macro",
            Self::Mid => "Mid",
            Self::Micro => "Micro",
        };
        write!(f, "{display}")
    }
}

impl Display for TargetAudience {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let display = match self {
            Self::Newcomers => "Newcomers",
            Self::Investors => "Investors",
            Self::NewcomersAndInvestors => "Newcomers&Investors",
        };
        write!(f, "{display}")
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct ParseOptionError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseOptionError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Lowercases and strips whitespace so "Reels + Stories" and "reels+stories"
/// compare equal.
fn normalize_option(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase()
}

impl FromStr for CalculationMethod {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_option(s).as_str() {
            "direct" => Ok(Self::Direct),
            "with_engagement" | "withengagement" | "with-engagement" | "engagement" => {
                Ok(Self::WithEngagement)
            }
            _ => Err(ParseOptionError::new("calculation method", s)),
        }
    }
}

impl FromStr for Deliverables {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_option(s).as_str() {
            "reels" => Ok(Self::Reels),
            "stories" => Ok(Self::Stories),
            "reels+stories" => Ok(Self::ReelsAndStories),
            _ => Err(ParseOptionError::new("deliverables", s)),
        }
    }
}

impl FromStr for SizeClass {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_option(s).as_str() {
            "macro" => Ok(Self::Macro),
            "mid" => Ok(Self::Mid),
            "micro" => Ok(Self::Micro),
            _ => Err(ParseOptionError::new("size class", s)),
        }
    }
}

impl FromStr for TargetAudience {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_option(s).as_str() {
            "newcomers" => Ok(Self::Newcomers),
            "investors" => Ok(Self::Investors),
            "newcomers&investors" => Ok(Self::NewcomersAndInvestors),
            _ => Err(ParseOptionError::new("target audience", s)),
        }
    }
}

/// Validated campaign-wide parameters. Rates here are fractions in [0, 1].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CampaignParameters {
    pub budget: f64,
    pub avg_order_value: f64,
    pub conversion_rate: f64,
    pub calculation_method: CalculationMethod,
    pub use_adjustment: bool,
    pub cost_factor: f64,
    pub attribution_factor: f64,
}

/// Validated influencer row. `reach_rate` and `engagement_rate` stay in
/// percent (0–100).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InfluencerRecord {
    pub name: String,
    pub followers: u64,
    pub reach_rate: f64,
    pub engagement_rate: f64,
    pub deliverables: Deliverables,
    pub cost: f64,
    pub size: SizeClass,
    pub target: TargetAudience,
}
