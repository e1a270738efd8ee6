//! Quoting data types
//!
//! All money values are unsigned lamport amounts. Intermediate products
//! are computed in u128 so no multiplication can wrap.

use serde::{Deserialize, Serialize};

/// Integer division rounding mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rounding {
    /// Truncate toward zero
    #[default]
    Floor,
    /// Round up on any remainder
    Ceil,
    /// Round half up
    Round,
}

/// Fee configuration for a settlement
///
/// A configured `flat_amount` overrides the basis-point computation
/// entirely. `min_fee` must not exceed `max_fee` when both are present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeeConfig {
    /// Fee in basis points (1/100 of a percent), 0..=10_000
    pub fee_bps: Option<u16>,

    /// Flat fee that replaces the basis-point computation
    pub flat_amount: Option<u64>,

    /// Lower clamp on the computed fee
    pub min_fee: Option<u64>,

    /// Upper clamp on the computed fee
    pub max_fee: Option<u64>,

    /// Rounding mode for the basis-point division
    pub rounding: Rounding,
}

/// Gross/fee/net decomposition of a settlement amount.
///
/// Invariant: `net + fee == gross`, all non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    /// Amount before fees
    pub gross: u64,

    /// Fee withheld
    pub fee: u64,

    /// Amount payable after fees
    pub net: u64,
}

/// Breakdown plus the fee-on-top total an advertiser is invoiced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeTotals {
    /// Gross/fee/net decomposition
    pub breakdown: FeeBreakdown,

    /// `gross + fee`
    pub total: u64,
}

/// How a campaign pays for delivered advertising
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PricingModel {
    /// Fixed amount regardless of metrics
    Flat {
        /// Amount in lamports
        amount: u64,
    },
    /// Price per recorded view
    PerView {
        /// Price per view in lamports
        price: u64,
    },
    /// Price per recorded impression
    PerImpression {
        /// Price per impression in lamports
        price: u64,
    },
    /// Price per 1000 impressions
    Cpm {
        /// Price per 1000 impressions in lamports
        price: u64,
    },
}

/// Observed usage metrics for a campaign
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MetricInputs {
    /// Recorded views
    pub views: Option<u64>,

    /// Recorded impressions
    pub impressions: Option<u64>,
}

impl MetricInputs {
    /// Views, defaulting to 0 when absent
    pub fn views(&self) -> u64 {
        self.views.unwrap_or(0)
    }

    /// Impressions, defaulting to 0 when absent
    pub fn impressions(&self) -> u64 {
        self.impressions.unwrap_or(0)
    }
}

/// A computed settlement quote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementQuote {
    /// Gross/fee/net decomposition, computed from the capped gross
    pub breakdown: FeeBreakdown,

    /// Whether the cap reduced the gross
    pub capped: bool,

    /// The configured cap, when one was set
    pub cap_amount: Option<u64>,
}

/// Options for [`crate::calculate_settlement_quote`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuoteOptions {
    /// Ceiling on the gross settlement amount
    pub cap_amount: Option<u64>,

    /// Fee configuration applied to the (capped) gross
    pub fee: FeeConfig,

    /// Rounding mode for the pricing computation
    pub pricing_rounding: Rounding,
}
