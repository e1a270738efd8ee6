//! Settlement quoting engine
//!
//! Pure computation over unsigned lamport amounts: pricing models,
//! basis-point fees with configurable rounding and clamping, and capped
//! settlement quotes. No I/O, no floating point, no wrapping arithmetic.
//!
//! # Invariants
//!
//! - `net + fee == gross` for every breakdown
//! - Fees are non-decreasing in the gross for a fixed config
//! - Overflow and fee-exceeds-gross are input errors, never silent

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod fees;
pub mod pricing;
pub mod quote;
pub mod types;

// Re-exports
pub use client_core::{Error, Result};
pub use fees::{calculate_fee_breakdown, calculate_fee_totals};
pub use pricing::calculate_pricing_amount;
pub use quote::calculate_settlement_quote;
pub use types::{
    FeeBreakdown, FeeConfig, FeeTotals, MetricInputs, PricingModel, QuoteOptions, Rounding,
    SettlementQuote,
};
