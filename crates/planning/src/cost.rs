//! Line item cost calculation.

use mediaplan_core::money::round_money;
use mediaplan_core::{PlanError, PlanResult, RateModel};
use rust_decimal::Decimal;

const PER_MILLE: Decimal = Decimal::ONE_THOUSAND;

/// Total cost of `units` bought at `rate` under `rate_model`, rounded to cents.
///
/// CPM and dCPM are priced per thousand units, CPCV and CPC per unit.
/// Any other model is priced like CPM.
pub fn compute_total_cost(rate_model: &RateModel, rate: Decimal, units: Decimal) -> PlanResult<Decimal> {
    if rate.is_sign_negative() && !rate.is_zero() {
        return Err(PlanError::validation("rate must not be negative"));
    }
    if units.is_sign_negative() && !units.is_zero() {
        return Err(PlanError::validation("units must not be negative"));
    }
    let gross = rate
        .checked_mul(units)
        .ok_or_else(|| PlanError::validation(format!("cost of {units} units at {rate} is out of range")))?;
    let cost = if rate_model.is_per_mille() {
        gross / PER_MILLE
    } else {
        gross
    };
    Ok(round_money(cost))
}

/// Cost of a line item from its stored pricing fields.
pub fn line_item_cost(rate_model: &RateModel, cpm_rate: Decimal, impressions: u64) -> PlanResult<Decimal> {
    compute_total_cost(rate_model, cpm_rate, Decimal::from(impressions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn cpm_prices_per_thousand() {
        let cost = line_item_cost(&RateModel::Cpm, dec("25.00"), 1_000_000).unwrap();
        assert_eq!(cost.to_string(), "25000.00");
    }

    #[test]
    fn dcpm_matches_cpm() {
        let cost = line_item_cost(&RateModel::Dcpm, dec("12.50"), 40_000).unwrap();
        assert_eq!(cost.to_string(), "500.00");
    }

    #[test]
    fn cpc_prices_per_unit() {
        let cost = line_item_cost(&RateModel::Cpc, dec("2.50"), 100).unwrap();
        assert_eq!(cost.to_string(), "250.00");
    }

    #[test]
    fn cpcv_prices_per_unit() {
        let cost = line_item_cost(&RateModel::Cpcv, dec("0.03"), 150_000).unwrap();
        assert_eq!(cost.to_string(), "4500.00");
    }

    #[test]
    fn unknown_model_falls_back_to_cpm() {
        let model = RateModel::from("vCPM");
        let cost = line_item_cost(&model, dec("10"), 5_000).unwrap();
        assert_eq!(cost.to_string(), "50.00");
    }

    #[test]
    fn result_is_rounded_to_cents() {
        // 3.333 * 1 / 1000 = 0.003333
        assert_eq!(line_item_cost(&RateModel::Cpm, dec("3.333"), 1).unwrap().to_string(), "0.00");
        // 7.77 * 333 / 1000 = 2.58741
        assert_eq!(line_item_cost(&RateModel::Cpm, dec("7.77"), 333).unwrap().to_string(), "2.59");
        // midpoint rounds away from zero
        assert_eq!(line_item_cost(&RateModel::Cpc, dec("0.005"), 1).unwrap().to_string(), "0.01");
    }

    #[test]
    fn zero_units_cost_nothing() {
        assert_eq!(line_item_cost(&RateModel::Cpm, dec("25"), 0).unwrap().to_string(), "0.00");
    }

    #[test]
    fn negative_inputs_are_rejected() {
        assert!(compute_total_cost(&RateModel::Cpm, dec("-1"), dec("10")).is_err());
        assert!(compute_total_cost(&RateModel::Cpm, dec("1"), dec("-10")).is_err());
    }

    #[test]
    fn overflow_is_a_validation_error() {
        let huge = Decimal::MAX;
        assert!(matches!(
            compute_total_cost(&RateModel::Cpc, huge, dec("2")),
            Err(PlanError::Validation(_))
        ));
    }

    proptest! {
        #[test]
        fn per_mille_models_divide_by_thousand(cents in 0u64..10_000_000, units in 0u64..1_000_000_000) {
            let rate = Decimal::new(cents as i64, 2);
            let expected = round_money(rate * Decimal::from(units) / Decimal::ONE_THOUSAND);
            for model in [RateModel::Cpm, RateModel::Dcpm] {
                prop_assert_eq!(line_item_cost(&model, rate, units).unwrap(), expected);
            }
        }

        #[test]
        fn per_unit_models_multiply(cents in 0u64..10_000_000, units in 0u64..1_000_000_000) {
            let rate = Decimal::new(cents as i64, 2);
            let expected = round_money(rate * Decimal::from(units));
            for model in [RateModel::Cpcv, RateModel::Cpc] {
                let cost = line_item_cost(&model, rate, units).unwrap();
                prop_assert_eq!(cost, expected);
                prop_assert_eq!(cost.scale(), 2);
            }
        }
    }
}
