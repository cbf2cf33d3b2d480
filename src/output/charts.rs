//! Chart data derived from per-influencer results, plus a terminal renderer.

use serde::{Deserialize, Serialize};

use crate::campaign::SizeClass;
use crate::output::format::{format_currency, format_percent};
use crate::roi::ResultRecord;

pub const COST_COLOR: &str = "#FF6B6B";
pub const REVENUE_COLOR: &str = "#4ECDC4";

const BAR_WIDTH: usize = 40;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoiBar {
    pub name: String,
    pub size: SizeClass,
    pub color: String,
    pub roi_percent: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CostRevenueBar {
    pub name: String,
    pub cost: f64,
    pub revenue: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReachSlice {
    pub name: String,
    pub reach: u64,
    pub share_percent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartSet {
    pub roi_by_influencer: Vec<RoiBar>,
    pub cost_vs_revenue: Vec<CostRevenueBar>,
    pub reach_distribution: Vec<ReachSlice>,
}

pub fn build_charts(results: &[ResultRecord]) -> ChartSet {
    ChartSet {
        roi_by_influencer: roi_bars(results),
        cost_vs_revenue: cost_revenue_bars(results),
        reach_distribution: reach_shares(results),
    }
}

pub fn roi_bars(results: &[ResultRecord]) -> Vec<RoiBar> {
    results
        .iter()
        .map(|r| RoiBar {
            name: r.name.clone(),
            size: r.size,
            color: r.size.color_hex().to_string(),
            roi_percent: r.roi_percent,
        })
        .collect()
}

pub fn cost_revenue_bars(results: &[ResultRecord]) -> Vec<CostRevenueBar> {
    results
        .iter()
        .map(|r| CostRevenueBar {
            name: r.name.clone(),
            cost: r.adjusted_cost,
            revenue: r.adjusted_revenue,
        })
        .collect()
}

/// Share of total reach per influencer; all shares are zero when nobody is
/// reached.
pub fn reach_shares(results: &[ResultRecord]) -> Vec<ReachSlice> {
    let total = results
        .iter()
        .fold(0u64, |acc, r| acc.saturating_add(r.expected_reach));
    results
        .iter()
        .map(|r| ReachSlice {
            name: r.name.clone(),
            reach: r.expected_reach,
            share_percent: if total == 0 {
                0.0
            } else {
                r.expected_reach as f64 / total as f64 * 100.0
            },
        })
        .collect()
}

pub fn render_charts_text(charts: &ChartSet) -> String {
    let label_width = charts
        .roi_by_influencer
        .iter()
        .map(|b| b.name.chars().count())
        .max()
        .unwrap_or(0);
    let mut out = String::new();

    out.push_str("ROI by KOL\n");
    let max_roi = charts
        .roi_by_influencer
        .iter()
        .filter_map(|b| b.roi_percent)
        .fold(0.0_f64, |acc, v| acc.max(v.abs()));
    for bar in &charts.roi_by_influencer {
        let value = bar.roi_percent.unwrap_or(0.0);
        out.push_str(&format!(
            "  {:<label_width$} [{:<5}] {} {}\n",
            bar.name,
            bar.size.to_string(),
            bar_glyphs(value.abs(), max_roi, if value < 0.0 { '░' } else { '█' }),
            bar.roi_percent
                .map(format_percent)
                .unwrap_or_else(|| "-".to_string()),
        ));
    }

    out.push_str("\nCost vs. Revenue by KOL\n");
    let max_amount = charts
        .cost_vs_revenue
        .iter()
        .fold(0.0_f64, |acc, b| acc.max(b.cost).max(b.revenue));
    for bar in &charts.cost_vs_revenue {
        out.push_str(&format!(
            "  {:<label_width$} cost    {} {}\n",
            bar.name,
            bar_glyphs(bar.cost, max_amount, '▒'),
            format_currency(bar.cost),
        ));
        out.push_str(&format!(
            "  {:<label_width$} revenue {} {}\n",
            "",
            bar_glyphs(bar.revenue, max_amount, '█'),
            format_currency(bar.revenue),
        ));
    }

    out.push_str("\nReach distribution by KOL\n");
    for slice in &charts.reach_distribution {
        out.push_str(&format!(
            "  {:<label_width$} {} {:.1}%\n",
            slice.name,
            bar_glyphs(slice.share_percent, 100.0, '█'),
            slice.share_percent,
        ));
    }
    out
}

fn bar_glyphs(value: f64, max: f64, glyph: char) -> String {
    let filled = if max > 0.0 {
        ((value / max) * BAR_WIDTH as f64).round() as usize
    } else {
        0
    };
    let filled = filled.min(BAR_WIDTH);
    let mut bar = std::iter::repeat(glyph).take(filled).collect::<String>();
    bar.push_str(&" ".repeat(BAR_WIDTH - filled));
    bar
}
