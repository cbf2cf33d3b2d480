use std::str::FromStr;

use thiserror::Error;

use crate::campaign::input::{RawCampaign, RawInfluencer};
use crate::campaign::{
    CalculationMethod, CampaignParameters, Deliverables, InfluencerRecord, SizeClass,
    TargetAudience,
};

/// Upper bound on an influencer's follower count; keeps reach totals well
/// inside `u64`.
pub const MAX_FOLLOWERS: i64 = 10_000_000_000;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("{field} must be a finite number")]
    NotFinite { field: String },
    #[error("{field} must not be negative (got {value})")]
    Negative { field: String, value: f64 },
    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("{field} must be at least {min} (got {value})")]
    BelowMinimum { field: String, value: f64, min: f64 },
    #[error("{field} has invalid value {value:?}; expected one of {expected}")]
    InvalidOption {
        field: String,
        value: String,
        expected: &'static str,
    },
    #[error("at least one influencer is required")]
    EmptyRoster,
}

impl ValidationError {
    /// Path of the offending input field, e.g. `influencers[2].reach_rate`.
    pub fn field(&self) -> &str {
        match self {
            Self::NotFinite { field }
            | Self::Negative { field, .. }
            | Self::OutOfRange { field, .. }
            | Self::BelowMinimum { field, .. }
            | Self::InvalidOption { field, .. } => field,
            Self::EmptyRoster => "influencers",
        }
    }
}

pub fn validate_campaign(raw: &RawCampaign) -> Result<CampaignParameters, ValidationError> {
    let budget = non_negative("budget", raw.budget)?;
    let avg_order_value = non_negative("avg_order_value", raw.avg_order_value)?;
    let conversion_rate = percent("conversion_rate_pct", raw.conversion_rate_pct)? / 100.0;
    let calculation_method = option::<CalculationMethod>(
        "method".to_string(),
        &raw.method,
        "direct, with_engagement",
    )?;

    // Factors are only read when adjustment is on; otherwise they are inert.
    let (cost_factor, attribution_factor) = if raw.use_adjustment {
        let cost_factor = finite("cost_factor", raw.cost_factor)?;
        if cost_factor < 1.0 {
            return Err(ValidationError::BelowMinimum {
                field: "cost_factor".to_string(),
                value: cost_factor,
                min: 1.0,
            });
        }
        let attribution = percent("attribution_pct", raw.attribution_pct)? / 100.0;
        (cost_factor, attribution)
    } else {
        (1.0, 1.0)
    };

    Ok(CampaignParameters {
        budget,
        avg_order_value,
        conversion_rate,
        calculation_method,
        use_adjustment: raw.use_adjustment,
        cost_factor,
        attribution_factor,
    })
}

pub fn validate_influencer(
    index: usize,
    raw: &RawInfluencer,
) -> Result<InfluencerRecord, ValidationError> {
    let field = |name: &str| format!("influencers[{index}].{name}");

    if raw.followers < 0 {
        return Err(ValidationError::Negative {
            field: field("followers"),
            value: raw.followers as f64,
        });
    }
    if raw.followers > MAX_FOLLOWERS {
        return Err(ValidationError::OutOfRange {
            field: field("followers"),
            value: raw.followers as f64,
            min: 0.0,
            max: MAX_FOLLOWERS as f64,
        });
    }
    let reach_rate = percent(&field("reach_rate"), raw.reach_rate)?;
    let engagement_rate = percent(&field("engagement_rate"), raw.engagement_rate)?;
    let cost = non_negative(&field("cost"), raw.cost)?;
    let deliverables = option::<Deliverables>(
        field("deliverables"),
        &raw.deliverables,
        "Reels, Stories, Reels+Stories",
    )?;
    let size = option::<SizeClass>(field("size"), &raw.size, "Macro, Mid, Micro")?;
    let target = option::<TargetAudience>(
        field("target"),
        &raw.target,
        "Newcomers, Investors, Newcomers&Investors",
    )?;

    Ok(InfluencerRecord {
        name: raw.name.clone(),
        followers: raw.followers as u64,
        reach_rate,
        engagement_rate,
        deliverables,
        cost,
        size,
        target,
    })
}

pub fn validate_influencers(
    raw: &[RawInfluencer],
) -> Result<Vec<InfluencerRecord>, ValidationError> {
    if raw.is_empty() {
        return Err(ValidationError::EmptyRoster);
    }
    raw.iter()
        .enumerate()
        .map(|(idx, row)| validate_influencer(idx, row))
        .collect()
}

/// Validates a whole form: campaign first, then rows in order. The first
/// failure wins.
pub fn validate_input(
    campaign: &RawCampaign,
    influencers: &[RawInfluencer],
) -> Result<(CampaignParameters, Vec<InfluencerRecord>), ValidationError> {
    let params = validate_campaign(campaign)?;
    let records = validate_influencers(influencers)?;
    Ok((params, records))
}

fn finite(field: &str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::NotFinite {
            field: field.to_string(),
        })
    }
}

fn non_negative(field: &str, value: f64) -> Result<f64, ValidationError> {
    let value = finite(field, value)?;
    if value < 0.0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
            value,
        });
    }
    Ok(positive_zero(value))
}

fn percent(field: &str, value: f64) -> Result<f64, ValidationError> {
    let value = finite(field, value)?;
    if !(0.0..=100.0).contains(&value) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            value,
            min: 0.0,
            max: 100.0,
        });
    }
    Ok(positive_zero(value))
}

// -0.0 would otherwise leak into formatted output.
fn positive_zero(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

fn option<T: FromStr>(
    field: String,
    value: &str,
    expected: &'static str,
) -> Result<T, ValidationError> {
    T::from_str(value).map_err(|_| ValidationError::InvalidOption {
        field,
        value: value.to_string(),
        expected,
    })
}

#[cfg(test)]
mod tests {
    use super::{
        validate_campaign, validate_influencers, validate_input, ValidationError, MAX_FOLLOWERS,
    };
    use crate::campaign::input::{RawCampaign, RawInfluencer};
    use crate::campaign::roster::default_influencers;
    use crate::campaign::{CalculationMethod, Deliverables, TargetAudience};

    fn row() -> RawInfluencer {
        default_influencers().remove(0)
    }

    #[test]
    fn converts_percentages_to_fractions() {
        let params = validate_campaign(&RawCampaign::default()).expect("valid defaults");
        assert!((params.conversion_rate - 0.04).abs() < 1e-12);
        assert!((params.attribution_factor - 0.6).abs() < 1e-12);
        assert!((params.cost_factor - 1.5).abs() < 1e-12);
        assert_eq!(params.calculation_method, CalculationMethod::Direct);
    }

    #[test]
    fn disabled_adjustment_forces_unit_factors() {
        let raw = RawCampaign {
            use_adjustment: false,
            cost_factor: 0.2,
            attribution_pct: 250.0,
            ..RawCampaign::default()
        };
        let params = validate_campaign(&raw).expect("inert factors are ignored");
        assert_eq!(params.cost_factor, 1.0);
        assert_eq!(params.attribution_factor, 1.0);
    }

    #[test]
    fn rejects_cost_factor_below_one() {
        let raw = RawCampaign {
            cost_factor: 0.9,
            ..RawCampaign::default()
        };
        let err = validate_campaign(&raw).expect_err("cost factor below 1");
        assert_eq!(err.field(), "cost_factor");
    }

    #[test]
    fn rejects_out_of_range_conversion_rate() {
        let raw = RawCampaign {
            conversion_rate_pct: 100.5,
            ..RawCampaign::default()
        };
        let err = validate_campaign(&raw).expect_err("rate above 100");
        assert!(matches!(err, ValidationError::OutOfRange { .. }));
        assert_eq!(err.field(), "conversion_rate_pct");
    }

    #[test]
    fn rejects_out_of_range_attribution() {
        let raw = RawCampaign {
            attribution_pct: 120.0,
            ..RawCampaign::default()
        };
        let err = validate_campaign(&raw).expect_err("attribution above 100");
        assert!(matches!(err, ValidationError::OutOfRange { .. }));
        assert_eq!(err.field(), "attribution_pct");

        let raw = RawCampaign {
            attribution_pct: -5.0,
            ..RawCampaign::default()
        };
        let err = validate_campaign(&raw).expect_err("negative attribution");
        assert_eq!(err.field(), "attribution_pct");
    }

    #[test]
    fn percent_bounds_are_inclusive() {
        for bound in [0.0, 100.0] {
            let raw = RawCampaign {
                conversion_rate_pct: bound,
                attribution_pct: bound,
                ..RawCampaign::default()
            };
            let params = validate_campaign(&raw).expect("bounds are accepted");
            assert_eq!(params.conversion_rate, bound / 100.0);
            assert_eq!(params.attribution_factor, bound / 100.0);

            let mut influencer = row();
            influencer.reach_rate = bound;
            influencer.engagement_rate = bound;
            let records = validate_influencers(&[influencer]).expect("bounds are accepted");
            assert_eq!(records[0].reach_rate, bound);
        }
    }

    #[test]
    fn rejects_follower_counts_above_cap() {
        let mut rows = default_influencers();
        rows[3].followers = i64::MAX;
        let err = validate_influencers(&rows).expect_err("followers above cap");
        assert!(matches!(err, ValidationError::OutOfRange { .. }));
        assert_eq!(err.field(), "influencers[3].followers");

        let mut at_cap = row();
        at_cap.followers = MAX_FOLLOWERS;
        assert!(validate_influencers(&[at_cap]).is_ok());
    }

    #[test]
    fn rejects_negative_and_nan_amounts() {
        let raw = RawCampaign {
            avg_order_value: -1.0,
            ..RawCampaign::default()
        };
        assert_eq!(
            validate_campaign(&raw).expect_err("negative aov").field(),
            "avg_order_value"
        );

        let raw = RawCampaign {
            budget: f64::NAN,
            ..RawCampaign::default()
        };
        assert!(matches!(
            validate_campaign(&raw),
            Err(ValidationError::NotFinite { .. })
        ));
    }

    #[test]
    fn rejects_unknown_method() {
        let raw = RawCampaign {
            method: "magic".to_string(),
            ..RawCampaign::default()
        };
        let err = validate_campaign(&raw).expect_err("unknown method");
        assert_eq!(err.field(), "method");
    }

    #[test]
    fn identifies_offending_row_and_field() {
        let mut rows = default_influencers();
        rows[2].reach_rate = -3.0;
        let err = validate_influencers(&rows).expect_err("negative reach");
        assert_eq!(err.field(), "influencers[2].reach_rate");

        let mut rows = default_influencers();
        rows[1].size = "Huge".to_string();
        let err = validate_influencers(&rows).expect_err("bad size");
        assert_eq!(err.field(), "influencers[1].size");

        let mut rows = vec![row()];
        rows[0].followers = -10;
        let err = validate_influencers(&rows).expect_err("negative followers");
        assert_eq!(err.field(), "influencers[0].followers");
    }

    #[test]
    fn empty_roster_is_rejected() {
        assert_eq!(
            validate_input(&RawCampaign::default(), &[]).expect_err("empty"),
            ValidationError::EmptyRoster
        );
    }

    #[test]
    fn accepts_zero_cost_rows() {
        let mut raw = row();
        raw.cost = 0.0;
        let records = validate_influencers(&[raw]).expect("zero cost is allowed");
        assert_eq!(records[0].cost, 0.0);
        assert_eq!(records[0].deliverables, Deliverables::Reels);
        assert_eq!(records[0].target, TargetAudience::NewcomersAndInvestors);
    }
}
