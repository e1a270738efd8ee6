//! Settlement quotes
//!
//! A quote is the pricing amount run through the fee engine, with an
//! optional ceiling. The cap clamps the gross *before* fees, so fee and
//! net both derive from the capped gross.

use crate::fees::calculate_fee_breakdown;
use crate::pricing::calculate_pricing_amount;
use crate::types::{MetricInputs, PricingModel, QuoteOptions, SettlementQuote};
use client_core::Result;
use tracing::debug;

/// Compute the settlement quote for a campaign's delivered metrics
pub fn calculate_settlement_quote(
    pricing: &PricingModel,
    metrics: &MetricInputs,
    options: &QuoteOptions,
) -> Result<SettlementQuote> {
    let gross = calculate_pricing_amount(pricing, metrics, options.pricing_rounding)?;

    let (effective_gross, capped) = match options.cap_amount {
        Some(cap) if gross > cap => (cap, true),
        _ => (gross, false),
    };

    let breakdown = calculate_fee_breakdown(effective_gross, &options.fee)?;
    debug!(
        gross,
        effective_gross, capped, fee = breakdown.fee, "computed settlement quote"
    );

    Ok(SettlementQuote {
        breakdown,
        capped,
        cap_amount: options.cap_amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FeeConfig, Rounding};

    fn impressions(count: u64) -> MetricInputs {
        MetricInputs {
            views: None,
            impressions: Some(count),
        }
    }

    #[test]
    fn test_uncapped_quote() {
        let quote = calculate_settlement_quote(
            &PricingModel::PerImpression { price: 10 },
            &impressions(100),
            &QuoteOptions::default(),
        )
        .unwrap();
        assert_eq!(quote.breakdown.gross, 1000);
        assert_eq!(quote.breakdown.net, 1000);
        assert!(!quote.capped);
        assert!(quote.cap_amount.is_none());
    }

    #[test]
    fn test_cap_clamps_gross_before_fees() {
        let options = QuoteOptions {
            cap_amount: Some(500),
            fee: FeeConfig {
                fee_bps: Some(1000),
                ..Default::default()
            },
            pricing_rounding: Rounding::Floor,
        };
        let quote = calculate_settlement_quote(
            &PricingModel::PerImpression { price: 10 },
            &impressions(100),
            &options,
        )
        .unwrap();
        // gross 1000 capped to 500; 10% fee computed from the capped gross
        assert!(quote.capped);
        assert_eq!(quote.cap_amount, Some(500));
        assert_eq!(quote.breakdown.gross, 500);
        assert_eq!(quote.breakdown.fee, 50);
        assert_eq!(quote.breakdown.net, 450);
    }

    #[test]
    fn test_cap_equal_to_gross_is_not_capped() {
        let options = QuoteOptions {
            cap_amount: Some(1000),
            ..Default::default()
        };
        let quote = calculate_settlement_quote(
            &PricingModel::Flat { amount: 1000 },
            &MetricInputs::default(),
            &options,
        )
        .unwrap();
        assert!(!quote.capped);
        assert_eq!(quote.breakdown.gross, 1000);
    }

    #[test]
    fn test_pricing_rounding_flows_through() {
        let options = QuoteOptions {
            pricing_rounding: Rounding::Round,
            ..Default::default()
        };
        let quote = calculate_settlement_quote(
            &PricingModel::Cpm { price: 3 },
            &impressions(500),
            &options,
        )
        .unwrap();
        assert_eq!(quote.breakdown.gross, 2);
    }
}
