//! Entity services over the advertising ledger
//!
//! One service per on-ledger entity, all sharing a [`ClientContext`]:
//! advertisers, campaigns, providers, locations, and metrics devices.
//! Each service derives addresses locally, submits instructions through
//! the error-classifying executor, and exposes account watches through
//! the subscription manager.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod accounts;
pub mod advertiser;
pub mod campaign;
pub mod context;
pub mod device;
pub mod instruction;
pub mod location;
pub mod provider;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports
pub use accounts::{
    AdvertiserAccount, BookingAccount, BookingStatus, CampaignAccount, CampaignStatus,
    DeviceAccount, DeviceRegistryAccount, DeviceStatus, LocationAccount, LocationStatus,
    ProviderAccount,
};
pub use advertiser::AdvertiserService;
pub use campaign::{CampaignMetadata, CampaignService};
pub use client_core::{Error, Result};
pub use context::ClientContext;
pub use device::DeviceService;
pub use instruction::{BoardInstruction, OracleInstruction};
pub use location::{BookingSettlement, LocationMetadata, LocationService};
pub use provider::ProviderService;
