//! Fee breakdown computation
//!
//! Exact integer arithmetic only: the basis-point product is taken in
//! u128, divided under the configured rounding mode, and clamped. A fee
//! exceeding the gross is an input error, never a silent clamp.

use crate::types::{FeeBreakdown, FeeConfig, FeeTotals, Rounding};
use client_core::{Error, Result};

/// Basis-point denominator (10_000 bps = 100%)
pub const BPS_DENOMINATOR: u128 = 10_000;

/// Integer division under a rounding mode. `denominator` must be non-zero.
pub(crate) fn apply_rounding(numerator: u128, denominator: u128, rounding: Rounding) -> u128 {
    match rounding {
        Rounding::Floor => numerator / denominator,
        Rounding::Ceil => (numerator + denominator - 1) / denominator,
        Rounding::Round => (numerator + denominator / 2) / denominator,
    }
}

fn validate(config: &FeeConfig) -> Result<()> {
    if let Some(bps) = config.fee_bps {
        if bps > 10_000 {
            return Err(Error::InvalidArgument(format!(
                "fee_bps must be at most 10000, got {}",
                bps
            )));
        }
    }
    if let (Some(min), Some(max)) = (config.min_fee, config.max_fee) {
        if min > max {
            return Err(Error::InvalidArgument(format!(
                "min_fee {} exceeds max_fee {}",
                min, max
            )));
        }
    }
    Ok(())
}

/// Compute the gross/fee/net decomposition for a settlement amount.
///
/// A configured `flat_amount` replaces the basis-point computation. The
/// min/max clamp applies to the fee from either path. Fails with
/// [`Error::InvalidArgument`] when the final fee exceeds the gross.
pub fn calculate_fee_breakdown(gross: u64, config: &FeeConfig) -> Result<FeeBreakdown> {
    validate(config)?;

    let raw_fee: u128 = match config.flat_amount {
        Some(flat) => flat as u128,
        None => {
            let bps = config.fee_bps.unwrap_or(0) as u128;
            apply_rounding(gross as u128 * bps, BPS_DENOMINATOR, config.rounding)
        }
    };

    let mut fee = raw_fee;
    if let Some(min) = config.min_fee {
        fee = fee.max(min as u128);
    }
    if let Some(max) = config.max_fee {
        fee = fee.min(max as u128);
    }

    if fee > gross as u128 {
        return Err(Error::InvalidArgument(format!(
            "fee {} exceeds gross {}",
            fee, gross
        )));
    }

    // fee <= gross <= u64::MAX at this point
    let fee = fee as u64;
    Ok(FeeBreakdown {
        gross,
        fee,
        net: gross - fee,
    })
}

/// Breakdown plus the fee-on-top total (`gross + fee`).
///
/// Fails with [`Error::InvalidArgument`] when the total overflows u64.
pub fn calculate_fee_totals(gross: u64, config: &FeeConfig) -> Result<FeeTotals> {
    let breakdown = calculate_fee_breakdown(gross, config)?;
    let total = breakdown.gross.checked_add(breakdown.fee).ok_or_else(|| {
        Error::InvalidArgument("gross plus fee overflows u64".to_string())
    })?;
    Ok(FeeTotals { breakdown, total })
}
