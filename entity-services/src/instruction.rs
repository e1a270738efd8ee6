//! Instruction payloads for the board and metrics-oracle programs
//!
//! Each program takes a single tagged enum as its payload. Variant order
//! is part of the wire format and must not be reordered.

use crate::accounts::{DeviceStatus, LocationStatus};
use client_core::types::Address;
use client_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Operations accepted by the board program
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BoardInstruction {
    /// Create the caller's advertiser profile
    CreateAdvertiser,

    /// Create a campaign under the caller's advertiser profile
    CreateCampaign {
        /// Display name
        name: String,
        /// Description shown to providers
        description: String,
        /// Creative image URL
        image_url: String,
        /// Initial budget in lamports
        budget: u64,
    },

    /// Top up a campaign's available budget
    AddBudget {
        /// Campaign index under the caller's advertiser
        campaign_idx: u64,
        /// Amount to add in lamports
        amount: u64,
    },

    /// Withdraw unreserved budget from a campaign
    WithdrawBudget {
        /// Campaign index under the caller's advertiser
        campaign_idx: u64,
        /// Amount to withdraw in lamports
        amount: u64,
    },

    /// Close a campaign and refund its remaining budget
    CloseCampaign {
        /// Campaign index under the caller's advertiser
        campaign_idx: u64,
    },

    /// Create the caller's provider profile
    CreateProvider,

    /// Register a location under the caller's provider profile
    RegisterLocation {
        /// Display name
        name: String,
        /// Description shown to advertisers
        description: String,
        /// Booking price in lamports
        price: u64,
        /// Oracle allowed to report metrics for this location
        oracle_authority: Address,
    },

    /// Update a campaign's descriptive fields; unset fields keep their value
    UpdateCampaign {
        /// Campaign index under the caller's advertiser
        campaign_idx: u64,
        /// New display name
        name: Option<String>,
        /// New description
        description: Option<String>,
        /// New creative image URL
        image_url: Option<String>,
    },

    /// Update a location's descriptive fields or price; unset fields keep
    /// their value
    UpdateLocation {
        /// Location index under the caller's provider
        location_idx: u64,
        /// New display name
        name: Option<String>,
        /// New description
        description: Option<String>,
        /// New booking price in lamports
        price: Option<u64>,
    },

    /// Change a location's availability state
    SetLocationStatus {
        /// Location index under the caller's provider
        location_idx: u64,
        /// New state
        status: LocationStatus,
    },

    /// Book a location for a campaign, reserving the price from the
    /// campaign's budget
    BookLocation,

    /// Cancel a live booking, releasing the reserved budget
    CancelBooking,

    /// Settle a booking, paying `amount` out of the reserved budget
    SettleBooking {
        /// Gross settlement amount in lamports
        amount: u64,
    },
}

/// Operations accepted by the metrics-oracle program
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OracleInstruction {
    /// Create the caller's device registry
    CreateDeviceRegistry,

    /// Register a device under the caller's registry
    RegisterDevice {
        /// Location the device is mounted at
        location: Address,
        /// Oracle allowed to push metrics through this device
        oracle_authority: Address,
    },

    /// Record delivered views and impressions for a device
    ReportDeviceMetrics {
        /// Device index under the caller's registry
        device_idx: u8,
        /// Views delivered since the last report
        views: u64,
        /// Impressions delivered since the last report
        impressions: u64,
    },

    /// Change a device's operational state
    SetDeviceStatus {
        /// Device index under the caller's registry
        device_idx: u8,
        /// New state
        status: DeviceStatus,
    },

    /// Move a device to another location
    UpdateDeviceLocation {
        /// Device index under the caller's registry
        device_idx: u8,
        /// New location
        location: Address,
    },

    /// Change the oracle allowed to push metrics through a device
    UpdateDeviceOracle {
        /// Device index under the caller's registry
        device_idx: u8,
        /// New oracle authority
        oracle_authority: Address,
    },
}

/// Serialize an instruction payload
pub fn encode<T: Serialize>(payload: &T) -> Result<Vec<u8>> {
    bincode::serialize(payload)
        .map_err(|e| Error::sdk(format!("failed to encode instruction: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_tags_are_stable() {
        // The leading u32 tag follows declaration order
        let create = encode(&BoardInstruction::CreateAdvertiser).unwrap();
        assert_eq!(&create[..4], &[0, 0, 0, 0]);

        let close = encode(&BoardInstruction::CloseCampaign { campaign_idx: 0 }).unwrap();
        assert_eq!(&close[..4], &[4, 0, 0, 0]);
    }

    #[test]
    fn test_payload_round_trip() {
        let original = OracleInstruction::ReportDeviceMetrics {
            device_idx: 9,
            views: 120,
            impressions: 80,
        };
        let bytes = encode(&original).unwrap();
        let decoded: OracleInstruction = bincode::deserialize(&bytes).unwrap();
        match decoded {
            OracleInstruction::ReportDeviceMetrics {
                device_idx,
                views,
                impressions,
            } => {
                assert_eq!(device_idx, 9);
                assert_eq!(views, 120);
                assert_eq!(impressions, 80);
            }
            other => panic!("expected ReportDeviceMetrics, got {:?}", other),
        }
    }
}
