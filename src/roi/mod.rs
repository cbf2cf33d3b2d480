pub mod calculator;

use serde::{Deserialize, Serialize};

use crate::campaign::{
    CalculationMethod, CampaignParameters, Deliverables, SizeClass, TargetAudience,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultRecord {
    pub name: String,
    pub size: SizeClass,
    pub deliverables: Deliverables,
    pub target: TargetAudience,
    pub expected_reach: u64,
    pub expected_sales: u64,
    pub revenue: f64,
    pub adjusted_revenue: f64,
    pub adjusted_cost: f64,
    /// `None` when `adjusted_cost` is zero.
    pub roi_percent: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct AggregateTotals {
    pub total_reach: u64,
    pub total_sales: u64,
    pub total_revenue: f64,
    pub total_cost: f64,
    pub total_roi_percent: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AdjustmentSummary {
    pub cost_factor: f64,
    pub attribution_factor: f64,
}

impl AdjustmentSummary {
    pub fn from_params(params: &CampaignParameters) -> Option<Self> {
        params.use_adjustment.then_some(Self {
            cost_factor: params.cost_factor,
            attribution_factor: params.attribution_factor,
        })
    }
}

/// Everything a presentation layer needs from one computation run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoiReport {
    pub method: CalculationMethod,
    pub budget: f64,
    pub results: Vec<ResultRecord>,
    pub totals: AggregateTotals,
    pub adjustment: Option<AdjustmentSummary>,
}

impl RoiReport {
    pub fn budget_remaining(&self) -> f64 {
        self.budget - self.totals.total_cost
    }
}
