//! On-ledger account layouts and decoding

use client_core::types::Address;
use client_core::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Advertiser profile account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvertiserAccount {
    /// Controlling authority
    pub authority: Address,

    /// Index the next campaign will be created at
    pub last_campaign_id: u64,

    /// Number of live campaigns
    pub campaign_count: u64,
}

/// Campaign lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CampaignStatus {
    /// Accepting bookings and spending budget
    Active,
    /// Closed by the advertiser
    Closed,
}

/// Campaign account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignAccount {
    /// Controlling authority
    pub authority: Address,

    /// Index under the advertiser's campaign scheme
    pub campaign_idx: u64,

    /// Display name
    pub name: String,

    /// Description shown to providers
    pub description: String,

    /// Creative image URL
    pub image_url: String,

    /// Lifecycle state
    pub status: CampaignStatus,

    /// Budget not yet committed to bookings
    pub available_budget: u64,

    /// Budget committed to live bookings
    pub reserved_budget: u64,
}

/// Ad-space provider profile account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderAccount {
    /// Controlling authority
    pub authority: Address,

    /// Index the next location will be registered at
    pub last_location_id: u64,

    /// Number of registered locations
    pub location_count: u64,
}

/// Location availability state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationStatus {
    /// Open for booking
    Available,
    /// Booked by a campaign
    Booked {
        /// The booking campaign's address
        campaign: Address,
    },
    /// Taken offline by the provider
    Inactive,
}

/// Physical ad location account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationAccount {
    /// Owning provider authority
    pub authority: Address,

    /// Index under the provider's location scheme
    pub location_idx: u64,

    /// Booking price in lamports
    pub price: u64,

    /// Oracle allowed to report metrics for this location
    pub oracle_authority: Address,

    /// Display name
    pub name: String,

    /// Description shown to advertisers
    pub description: String,

    /// Availability state
    pub status: LocationStatus,
}

/// Booking lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    /// Live booking accruing delivery
    Active,
    /// Cancelled before settlement
    Cancelled,
    /// Settled and paid out
    Settled,
}

/// Booking account linking one campaign to one location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingAccount {
    /// Booking campaign
    pub campaign: Address,

    /// Booked location
    pub location: Address,

    /// Advertiser authority behind the campaign
    pub advertiser: Address,

    /// Provider authority behind the location
    pub provider: Address,

    /// Oracle allowed to settle this booking
    pub oracle_authority: Address,

    /// Agreed booking price in lamports
    pub price: u64,

    /// Lifecycle state
    pub status: BookingStatus,

    /// Creation timestamp, ledger time
    pub created_at: i64,

    /// Last state-change timestamp, ledger time
    pub updated_at: i64,

    /// Amount paid out at settlement, 0 until settled
    pub settled_amount: u64,
}

/// Device registry account; one per authority, capacity 256 devices
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceRegistryAccount {
    /// Controlling authority
    pub authority: Address,

    /// Index the next device will be registered at
    pub last_device_id: u8,

    /// Number of registered devices
    pub device_count: u8,
}

/// Device operational state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceStatus {
    /// Reporting metrics
    Active,
    /// Powered down or unreachable
    Inactive,
    /// Temporarily out of service
    Maintenance,
}

/// Metrics-reporting device account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceAccount {
    /// Controlling authority
    pub authority: Address,

    /// Index under the registry's device scheme
    pub device_id: u8,

    /// Location this device is mounted at
    pub location: Address,

    /// Oracle allowed to push metrics through this device
    pub oracle_authority: Address,

    /// Operational state
    pub status: DeviceStatus,

    /// Cumulative recorded views
    pub views: u64,

    /// Cumulative recorded impressions
    pub impressions: u64,
}

/// Decode raw account bytes fetched from `address`
pub fn decode_account<T: DeserializeOwned>(address: &Address, bytes: &[u8]) -> Result<T> {
    bincode::deserialize(bytes)
        .map_err(|e| Error::sdk(format!("failed to decode account {}: {}", address, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_round_trip() {
        let account = AdvertiserAccount {
            authority: Address::new_from_array([5u8; 32]),
            last_campaign_id: 3,
            campaign_count: 2,
        };
        let bytes = bincode::serialize(&account).unwrap();
        let decoded: AdvertiserAccount =
            decode_account(&Address::new_from_array([0u8; 32]), &bytes).unwrap();
        assert_eq!(decoded.last_campaign_id, 3);
        assert_eq!(decoded.authority, account.authority);
    }

    #[test]
    fn test_decode_garbage_is_an_error() {
        let result: Result<CampaignAccount> =
            decode_account(&Address::new_from_array([0u8; 32]), &[1, 2, 3]);
        assert!(result.is_err());
    }
}
