use crate::campaign::{CalculationMethod, CampaignParameters, InfluencerRecord};
use crate::roi::{AdjustmentSummary, AggregateTotals, ResultRecord, RoiReport};

/// Computes per-influencer results in input order plus totals built from the
/// summed fields. Pure: no I/O and no state between calls.
pub fn compute(
    params: &CampaignParameters,
    influencers: &[InfluencerRecord],
) -> (Vec<ResultRecord>, AggregateTotals) {
    let results = influencers
        .iter()
        .map(|influencer| compute_record(params, influencer))
        .collect::<Vec<_>>();
    let totals = aggregate(&results);
    (results, totals)
}

pub fn compute_report(params: &CampaignParameters, influencers: &[InfluencerRecord]) -> RoiReport {
    let (results, totals) = compute(params, influencers);
    RoiReport {
        method: params.calculation_method,
        budget: params.budget,
        results,
        totals,
        adjustment: AdjustmentSummary::from_params(params),
    }
}

pub fn compute_record(params: &CampaignParameters, influencer: &InfluencerRecord) -> ResultRecord {
    let expected_reach = truncate(influencer.followers as f64 * (influencer.reach_rate / 100.0));
    let expected_sales = expected_sales(params, expected_reach, influencer.engagement_rate);

    let revenue = expected_sales as f64 * params.avg_order_value;
    let adjusted_revenue = revenue * params.attribution_factor;
    let adjusted_cost = influencer.cost * params.cost_factor;

    ResultRecord {
        name: influencer.name.clone(),
        size: influencer.size,
        deliverables: influencer.deliverables,
        target: influencer.target,
        expected_reach,
        expected_sales,
        revenue,
        adjusted_revenue,
        adjusted_cost,
        roi_percent: roi_percent(adjusted_revenue, adjusted_cost),
    }
}

pub fn expected_sales(params: &CampaignParameters, expected_reach: u64, engagement_rate: f64) -> u64 {
    let reach = expected_reach as f64;
    match params.calculation_method {
        CalculationMethod::Direct => truncate(reach * params.conversion_rate),
        CalculationMethod::WithEngagement => {
            truncate(reach * (engagement_rate / 100.0) * params.conversion_rate)
        }
    }
}

/// ROI in percent, or `None` when there is no cost to divide by.
pub fn roi_percent(revenue: f64, cost: f64) -> Option<f64> {
    if cost == 0.0 {
        return None;
    }
    Some(((revenue - cost) / cost) * 100.0)
}

pub fn aggregate(results: &[ResultRecord]) -> AggregateTotals {
    let mut totals = AggregateTotals::default();
    for r in results {
        totals.total_reach = totals.total_reach.saturating_add(r.expected_reach);
        totals.total_sales = totals.total_sales.saturating_add(r.expected_sales);
        totals.total_revenue += r.adjusted_revenue;
        totals.total_cost += r.adjusted_cost;
    }
    totals.total_roi_percent = if totals.total_cost > 0.0 {
        ((totals.total_revenue - totals.total_cost) / totals.total_cost) * 100.0
    } else {
        0.0
    };
    totals
}

// Inputs are validated non-negative, so truncation and floor agree.
fn truncate(value: f64) -> u64 {
    value.trunc() as u64
}

#[cfg(test)]
mod tests {
    use super::{aggregate, compute, compute_record, compute_report, roi_percent};
    use crate::campaign::validate::MAX_FOLLOWERS;
    use crate::campaign::{
        CalculationMethod, CampaignParameters, Deliverables, InfluencerRecord, SizeClass,
        TargetAudience,
    };

    fn params(method: CalculationMethod, adjusted: bool) -> CampaignParameters {
        CampaignParameters {
            budget: 30_000.0,
            avg_order_value: 400.0,
            conversion_rate: 4.0 / 100.0,
            calculation_method: method,
            use_adjustment: adjusted,
            cost_factor: if adjusted { 1.5 } else { 1.0 },
            attribution_factor: if adjusted { 60.0 / 100.0 } else { 1.0 },
        }
    }

    fn influencer(followers: u64, rate: f64, cost: f64) -> InfluencerRecord {
        InfluencerRecord {
            name: "Isabela Martin".to_string(),
            followers,
            reach_rate: rate,
            engagement_rate: rate,
            deliverables: Deliverables::Reels,
            cost,
            size: SizeClass::Macro,
            target: TargetAudience::NewcomersAndInvestors,
        }
    }

    #[test]
    fn direct_method_without_adjustment() {
        let r = compute_record(
            &params(CalculationMethod::Direct, false),
            &influencer(1_000_000, 7.0, 10_000.0),
        );
        assert_eq!(r.expected_reach, 70_000);
        assert_eq!(r.expected_sales, 2_800);
        assert!((r.revenue - 1_120_000.0).abs() < 1e-6);
        assert_eq!(r.adjusted_revenue, r.revenue);
        assert_eq!(r.adjusted_cost, 10_000.0);
        let roi = r.roi_percent.expect("cost is non-zero");
        assert!((roi - 11_100.0).abs() < 1e-6);
    }

    #[test]
    fn engagement_method_truncates_sales() {
        let r = compute_record(
            &params(CalculationMethod::WithEngagement, false),
            &influencer(1_000_000, 7.0, 10_000.0),
        );
        assert_eq!(r.expected_reach, 70_000);
        assert_eq!(r.expected_sales, 196);
    }

    #[test]
    fn adjustment_factors_apply_to_revenue_and_cost() {
        let r = compute_record(
            &params(CalculationMethod::Direct, true),
            &influencer(1_000_000, 7.0, 10_000.0),
        );
        assert!((r.adjusted_revenue - 672_000.0).abs() < 1e-6);
        assert!((r.adjusted_cost - 15_000.0).abs() < 1e-9);
        let roi = r.roi_percent.expect("cost is non-zero");
        assert!((roi - 4_380.0).abs() < 1e-6);
    }

    #[test]
    fn reach_is_floored_not_rounded() {
        let r = compute_record(
            &params(CalculationMethod::Direct, false),
            &influencer(999, 10.0, 1.0),
        );
        assert_eq!(r.expected_reach, 99);
        assert_eq!(r.expected_sales, 3);
    }

    #[test]
    fn method_only_changes_sales() {
        let row = influencer(800_000, 6.0, 7_500.0);
        let direct = compute_record(&params(CalculationMethod::Direct, true), &row);
        let engaged = compute_record(&params(CalculationMethod::WithEngagement, true), &row);
        assert_eq!(direct.expected_reach, engaged.expected_reach);
        assert_eq!(direct.adjusted_cost, engaged.adjusted_cost);
        assert!(engaged.expected_sales < direct.expected_sales);
    }

    #[test]
    fn zero_cost_record_has_no_roi() {
        assert!(roi_percent(100.0, 0.0).is_none());
        let r = compute_record(
            &params(CalculationMethod::Direct, true),
            &influencer(1_000_000, 7.0, 0.0),
        );
        assert_eq!(r.adjusted_cost, 0.0);
        assert!(r.roi_percent.is_none());
    }

    #[test]
    fn zero_total_cost_yields_zero_total_roi() {
        let rows = vec![influencer(1_000_000, 7.0, 0.0), influencer(200_000, 10.0, 0.0)];
        let (results, totals) = compute(&params(CalculationMethod::Direct, true), &rows);
        assert!(totals.total_revenue > 0.0);
        assert_eq!(totals.total_cost, 0.0);
        assert_eq!(totals.total_roi_percent, 0.0);
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn totals_are_sums_not_averages() {
        let rows = vec![
            influencer(1_000_000, 7.0, 10_000.0),
            influencer(800_000, 6.0, 7_500.0),
            influencer(300_000, 9.0, 7_000.0),
            influencer(200_000, 10.0, 5_500.0),
        ];
        let (results, totals) = compute(&params(CalculationMethod::Direct, true), &rows);
        assert_eq!(
            totals.total_reach,
            results.iter().map(|r| r.expected_reach).sum::<u64>()
        );
        assert_eq!(
            totals.total_sales,
            results.iter().map(|r| r.expected_sales).sum::<u64>()
        );
        let cost = results.iter().map(|r| r.adjusted_cost).sum::<f64>();
        let revenue = results.iter().map(|r| r.adjusted_revenue).sum::<f64>();
        assert!((totals.total_cost - cost).abs() < 1e-9);
        assert!((totals.total_revenue - revenue).abs() < 1e-6);
        let expected = (revenue - cost) / cost * 100.0;
        assert!((totals.total_roi_percent - expected).abs() < 1e-9);
        assert_eq!(aggregate(&results), totals);
    }

    #[test]
    fn capped_followers_aggregate_without_overflow() {
        let rows = vec![influencer(MAX_FOLLOWERS as u64, 100.0, 1.0); 4];
        let (results, totals) = compute(&params(CalculationMethod::Direct, false), &rows);
        assert_eq!(results[0].expected_reach, MAX_FOLLOWERS as u64);
        assert_eq!(totals.total_reach, 4 * MAX_FOLLOWERS as u64);
    }

    #[test]
    fn reach_sum_saturates_instead_of_wrapping() {
        let mut record = compute_record(
            &params(CalculationMethod::Direct, false),
            &influencer(1_000, 10.0, 1.0),
        );
        record.expected_reach = u64::MAX;
        record.expected_sales = u64::MAX;
        let totals = aggregate(&[record.clone(), record]);
        assert_eq!(totals.total_reach, u64::MAX);
        assert_eq!(totals.total_sales, u64::MAX);
    }

    #[test]
    fn results_keep_input_order_and_are_deterministic() {
        let mut second = influencer(10, 50.0, 1.0);
        second.name = "Second".to_string();
        let rows = vec![influencer(1_000_000, 7.0, 10_000.0), second];
        let p = params(CalculationMethod::WithEngagement, true);
        let first_run = compute(&p, &rows);
        let second_run = compute(&p, &rows);
        assert_eq!(first_run, second_run);
        assert_eq!(first_run.0[1].name, "Second");
    }

    #[test]
    fn report_carries_adjustment_only_when_enabled() {
        let rows = vec![influencer(1_000, 10.0, 100.0)];
        let report = compute_report(&params(CalculationMethod::Direct, false), &rows);
        assert!(report.adjustment.is_none());
        let report = compute_report(&params(CalculationMethod::Direct, true), &rows);
        let adjustment = report.adjustment.expect("adjustment enabled");
        assert!((adjustment.cost_factor - 1.5).abs() < 1e-12);
        assert!((report.budget_remaining() - (30_000.0 - 150.0)).abs() < 1e-9);
    }
}
