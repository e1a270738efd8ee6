//! Pricing-model evaluation
//!
//! Converts a pricing model and observed metrics into a gross lamport
//! amount. Multiplications run in u128; a product that does not fit u64
//! fails rather than wrapping. Absent metrics count as zero.

use crate::fees::apply_rounding;
use crate::types::{MetricInputs, PricingModel, Rounding};
use client_core::{Error, Result};

/// Impressions per CPM unit
pub const CPM_UNIT: u128 = 1_000;

fn fit_u64(value: u128, what: &str) -> Result<u64> {
    u64::try_from(value)
        .map_err(|_| Error::InvalidArgument(format!("{} overflows u64: {}", what, value)))
}

/// Compute the gross amount owed for a campaign's delivered metrics
pub fn calculate_pricing_amount(
    pricing: &PricingModel,
    metrics: &MetricInputs,
    rounding: Rounding,
) -> Result<u64> {
    match pricing {
        PricingModel::Flat { amount } => Ok(*amount),
        PricingModel::PerView { price } => {
            let product = metrics.views() as u128 * *price as u128;
            fit_u64(product, "views * price")
        }
        PricingModel::PerImpression { price } => {
            let product = metrics.impressions() as u128 * *price as u128;
            fit_u64(product, "impressions * price")
        }
        PricingModel::Cpm { price } => {
            let product = metrics.impressions() as u128 * *price as u128;
            fit_u64(apply_rounding(product, CPM_UNIT, rounding), "cpm amount")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_ignores_metrics() {
        let metrics = MetricInputs {
            views: Some(1_000_000),
            impressions: Some(1_000_000),
        };
        let amount = calculate_pricing_amount(
            &PricingModel::Flat { amount: 42 },
            &metrics,
            Rounding::Floor,
        )
        .unwrap();
        assert_eq!(amount, 42);
    }

    #[test]
    fn test_per_view_multiplies() {
        let metrics = MetricInputs {
            views: Some(30),
            impressions: None,
        };
        let amount = calculate_pricing_amount(
            &PricingModel::PerView { price: 7 },
            &metrics,
            Rounding::Floor,
        )
        .unwrap();
        assert_eq!(amount, 210);
    }

    #[test]
    fn test_absent_metrics_default_to_zero() {
        let amount = calculate_pricing_amount(
            &PricingModel::PerImpression { price: 1_000 },
            &MetricInputs::default(),
            Rounding::Floor,
        )
        .unwrap();
        assert_eq!(amount, 0);
    }

    #[test]
    fn test_cpm_rounding_boundary() {
        // 500 impressions at price 3 per 1000: 1.5 lamports
        let metrics = MetricInputs {
            views: None,
            impressions: Some(500),
        };
        let pricing = PricingModel::Cpm { price: 3 };

        let rounded =
            calculate_pricing_amount(&pricing, &metrics, Rounding::Round).unwrap();
        assert_eq!(rounded, 2);

        let floored =
            calculate_pricing_amount(&pricing, &metrics, Rounding::Floor).unwrap();
        assert_eq!(floored, 1);

        let ceiled = calculate_pricing_amount(&pricing, &metrics, Rounding::Ceil).unwrap();
        assert_eq!(ceiled, 2);
    }

    #[test]
    fn test_overflow_is_rejected_not_wrapped() {
        let metrics = MetricInputs {
            views: Some(u64::MAX),
            impressions: None,
        };
        let err = calculate_pricing_amount(
            &PricingModel::PerView { price: 2 },
            &metrics,
            Rounding::Floor,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_cpm_large_volume_stays_exact() {
        // 1_234_567 impressions at 999 per 1000: 1_233_332.433 → floor
        let metrics = MetricInputs {
            views: None,
            impressions: Some(1_234_567),
        };
        let amount = calculate_pricing_amount(
            &PricingModel::Cpm { price: 999 },
            &metrics,
            Rounding::Floor,
        )
        .unwrap();
        assert_eq!(amount, 1_233_332);
    }
}
