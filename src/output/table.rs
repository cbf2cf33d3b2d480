use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Row, Table};

use crate::campaign::{CalculationMethod, SizeClass};
use crate::output::format::{
    format_currency, format_number, format_optional_percent, format_percent,
};
use crate::roi::{AdjustmentSummary, AggregateTotals, ResultRecord, RoiReport};

pub fn size_color(size: SizeClass) -> Color {
    match size {
        SizeClass::Macro => Color::Rgb {
            r: 0x1F,
            g: 0x77,
            b: 0xB4,
        },
        SizeClass::Mid => Color::Rgb {
            r: 0xFF,
            g: 0x7F,
            b: 0x0E,
        },
        SizeClass::Micro => Color::Rgb {
            r: 0x2C,
            g: 0xA0,
            b: 0x2C,
        },
    }
}

pub fn render_results_table(results: &[ResultRecord]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "KOL",
        "Size",
        "Deliverables",
        "Reach",
        "Sales",
        "Revenue",
        "Cost",
        "ROI (%)",
        "Target",
    ]);

    for r in results {
        let roi_cell = match r.roi_percent {
            Some(roi) if roi >= 0.0 => Cell::new(format_percent(roi)).fg(Color::Green),
            Some(roi) => Cell::new(format_percent(roi)).fg(Color::Red),
            None => Cell::new(format_optional_percent(None)),
        };
        table.add_row(Row::from(vec![
            Cell::new(&r.name),
            Cell::new(r.size.to_string()).fg(size_color(r.size)),
            Cell::new(r.deliverables.to_string()),
            Cell::new(format_number(r.expected_reach)).set_alignment(CellAlignment::Right),
            Cell::new(format_number(r.expected_sales)).set_alignment(CellAlignment::Right),
            Cell::new(format_currency(r.adjusted_revenue)).set_alignment(CellAlignment::Right),
            Cell::new(format_currency(r.adjusted_cost)).set_alignment(CellAlignment::Right),
            roi_cell.set_alignment(CellAlignment::Right),
            Cell::new(r.target.to_string()),
        ]));
    }
    table.to_string()
}

pub fn render_kpi_table(totals: &AggregateTotals) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Campaign ROI",
        "Total Reach",
        "Estimated Sales",
        "Projected Revenue",
        "Total Cost",
    ]);
    table.add_row(vec![
        format_percent(totals.total_roi_percent),
        format_number(totals.total_reach),
        format_number(totals.total_sales),
        format_currency(totals.total_revenue),
        format_currency(totals.total_cost),
    ]);
    table.to_string()
}

pub fn render_adjustment_summary(adjustment: &AdjustmentSummary) -> String {
    format!(
        "Adjustment factors applied\n  Additional cost factor: {:.1}x\n  Attribution factor: {:.0}%",
        adjustment.cost_factor,
        adjustment.attribution_factor * 100.0
    )
}

pub fn render_report(report: &RoiReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("Method: {}\n", report.method));
    out.push_str(&render_kpi_table(&report.totals));
    out.push('\n');
    out.push_str(&render_results_table(&report.results));
    out.push_str(&format!(
        "\nBudget: {} (remaining {})",
        format_currency(report.budget),
        format_currency(report.budget_remaining())
    ));
    if let Some(adjustment) = &report.adjustment {
        out.push('\n');
        out.push_str(&render_adjustment_summary(adjustment));
    }
    out
}

pub fn render_methodology() -> String {
    let mut out = String::new();
    for method in CalculationMethod::ALL {
        out.push_str(&format!("{method}\n  {}\n\n", method.formula()));
    }
    out.push_str(
        "ROI (%) = ((Revenue × Attribution Factor - Cost × Cost Factor) / (Cost × Cost Factor)) × 100\n",
    );
    out.push_str("Influencers with zero adjusted cost have no ROI (shown as \"-\").");
    out
}

#[cfg(test)]
mod tests {
    use super::{render_adjustment_summary, render_methodology};
    use crate::roi::AdjustmentSummary;

    #[test]
    fn adjustment_summary_uses_multiplier_and_percent() {
        let text = render_adjustment_summary(&AdjustmentSummary {
            cost_factor: 1.5,
            attribution_factor: 0.6,
        });
        assert!(text.contains("1.5x"));
        assert!(text.contains("60%"));
    }

    #[test]
    fn methodology_lists_both_methods() {
        let text = render_methodology();
        assert!(text.contains("Expected Reach × Conversion Rate"));
        assert!(text.contains("Engagement Rate"));
    }
}
