use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::campaign::roster::default_influencers;

/// Campaign parameters as entered, before validation. Rates are percentages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawCampaign {
    #[serde(default = "default_budget")]
    pub budget: f64,
    #[serde(default = "default_avg_order_value")]
    pub avg_order_value: f64,
    #[serde(default = "default_conversion_rate_pct")]
    pub conversion_rate_pct: f64,
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default = "default_true")]
    pub use_adjustment: bool,
    #[serde(default = "default_cost_factor")]
    pub cost_factor: f64,
    #[serde(default = "default_attribution_pct")]
    pub attribution_pct: f64,
}

/// One influencer row as entered. Enum fields are free strings here so the
/// validator can name the offending row and field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawInfluencer {
    #[serde(default)]
    pub name: String,
    pub followers: i64,
    pub reach_rate: f64,
    pub engagement_rate: f64,
    pub deliverables: String,
    pub cost: f64,
    pub size: String,
    pub target: String,
}

/// A campaign document: optional parameters plus influencer rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CampaignInput {
    #[serde(default)]
    pub campaign: Option<RawCampaign>,
    #[serde(default)]
    pub influencers: Vec<RawInfluencer>,
}

#[derive(Debug, Clone, Default)]
pub struct CampaignOverrides {
    pub budget: Option<f64>,
    pub avg_order_value: Option<f64>,
    pub conversion_rate_pct: Option<f64>,
    pub method: Option<String>,
    pub disable_adjustment: bool,
    pub cost_factor: Option<f64>,
    pub attribution_pct: Option<f64>,
}

impl RawCampaign {
    pub fn apply_overrides(&mut self, overrides: &CampaignOverrides) {
        if let Some(budget) = overrides.budget {
            self.budget = budget;
        }
        if let Some(aov) = overrides.avg_order_value {
            self.avg_order_value = aov;
        }
        if let Some(rate) = overrides.conversion_rate_pct {
            self.conversion_rate_pct = rate;
        }
        if let Some(method) = &overrides.method {
            self.method = method.clone();
        }
        if overrides.disable_adjustment {
            self.use_adjustment = false;
        }
        if let Some(factor) = overrides.cost_factor {
            self.cost_factor = factor;
        }
        if let Some(pct) = overrides.attribution_pct {
            self.attribution_pct = pct;
        }
    }
}

impl CampaignInput {
    /// Reads a TOML or JSON document, chosen by file extension (TOML unless
    /// the extension is `.json`).
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed reading campaign input: {}", path.display()))?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if is_json {
            serde_json::from_str(&data)
                .with_context(|| format!("failed parsing JSON campaign: {}", path.display()))
        } else {
            toml::from_str(&data)
                .with_context(|| format!("failed parsing TOML campaign: {}", path.display()))
        }
    }

    /// Fills the gaps of a partial document: the campaign section falls back
    /// to `defaults` and an empty roster falls back to the default roster.
    pub fn resolve(self, defaults: &RawCampaign) -> (RawCampaign, Vec<RawInfluencer>) {
        let campaign = self.campaign.unwrap_or_else(|| defaults.clone());
        let influencers = if self.influencers.is_empty() {
            default_influencers()
        } else {
            self.influencers
        };
        (campaign, influencers)
    }

    pub fn sample() -> Self {
        Self {
            campaign: Some(RawCampaign::default()),
            influencers: default_influencers(),
        }
    }
}

impl Default for RawCampaign {
    fn default() -> Self {
        Self {
            budget: default_budget(),
            avg_order_value: default_avg_order_value(),
            conversion_rate_pct: default_conversion_rate_pct(),
            method: default_method(),
            use_adjustment: true,
            cost_factor: default_cost_factor(),
            attribution_pct: default_attribution_pct(),
        }
    }
}

fn default_budget() -> f64 {
    30_000.0
}

fn default_avg_order_value() -> f64 {
    400.0
}

fn default_conversion_rate_pct() -> f64 {
    4.0
}

fn default_method() -> String {
    "direct".to_string()
}

fn default_cost_factor() -> f64 {
    1.5
}

fn default_attribution_pct() -> f64 {
    60.0
}

fn default_true() -> bool {
    true
}
