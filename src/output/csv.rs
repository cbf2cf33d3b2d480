use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::output::format::{format_currency, format_percent};
use crate::roi::ResultRecord;

pub const EXPORT_HEADER: [&str; 9] = [
    "KOL",
    "Size",
    "Deliverables",
    "Expected Reach",
    "Expected Sales",
    "Adjusted Revenue",
    "Adjusted Cost",
    "ROI (%)",
    "Target Audience",
];

/// Spreadsheet export of per-influencer results. Counts are plain integers so
/// they stay numeric in a spreadsheet; totals are not included.
pub fn results_to_csv(results: &[ResultRecord]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(EXPORT_HEADER)?;
    for r in results {
        writer.write_record([
            r.name.clone(),
            r.size.to_string(),
            r.deliverables.to_string(),
            r.expected_reach.to_string(),
            r.expected_sales.to_string(),
            format_currency(r.adjusted_revenue),
            format_currency(r.adjusted_cost),
            r.roi_percent.map(format_percent).unwrap_or_default(),
            r.target.to_string(),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn write_results_csv(path: &Path, results: &[ResultRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed creating export directory: {}", parent.display()))?;
    }
    let data = results_to_csv(results)?;
    fs::write(path, data).with_context(|| format!("failed writing export: {}", path.display()))
}
