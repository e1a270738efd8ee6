//! Seed-scheme registry for entity addresses
//!
//! Each entity kind maps to a fixed, ordered seed layout: a literal tag,
//! the authority address, and optionally an index of a fixed width. The
//! registry is a process-wide constant and is never mutated.

use crate::derive::{encode_index_u64, encode_index_u8, find_derived_address};
use crate::error::{Error, Result};
use crate::types::Address;

/// Entity kinds with a registered seed scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Advertiser profile, one per authority
    Advertiser,
    /// Campaign, indexed per advertiser
    Campaign,
    /// Ad-space provider profile, one per authority
    Provider,
    /// Physical location, indexed per provider
    Location,
    /// Metrics-reporting device, indexed per registry
    Device,
    /// Device registry, one per authority
    DeviceRegistry,
}

/// Width of the index component in a seed scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexWidth {
    /// Scheme takes no index
    None,
    /// 1-byte unsigned index
    U8,
    /// 8-byte little-endian unsigned index
    U64,
}

/// A registered seed layout: tag, authority bytes, optional index
#[derive(Debug, Clone, Copy)]
pub struct SeedScheme {
    /// Entity kind this scheme belongs to
    pub kind: EntityKind,
    /// Literal tag component
    pub tag: &'static [u8],
    /// Index component width
    pub index: IndexWidth,
}

/// Seed tag for the booking account linking a campaign to a location
pub const BOOKING_TAG: &[u8] = b"campaign_location";

/// The fixed, process-wide scheme registry
pub const SCHEMES: [SeedScheme; 6] = [
    SeedScheme {
        kind: EntityKind::Advertiser,
        tag: b"advertiser",
        index: IndexWidth::None,
    },
    SeedScheme {
        kind: EntityKind::Campaign,
        tag: b"campaign",
        index: IndexWidth::U64,
    },
    SeedScheme {
        kind: EntityKind::Provider,
        tag: b"provider",
        index: IndexWidth::None,
    },
    SeedScheme {
        kind: EntityKind::Location,
        tag: b"location",
        index: IndexWidth::U64,
    },
    SeedScheme {
        kind: EntityKind::Device,
        tag: b"device",
        index: IndexWidth::U8,
    },
    SeedScheme {
        kind: EntityKind::DeviceRegistry,
        tag: b"device_registry",
        index: IndexWidth::None,
    },
];

/// Look up the scheme for an entity kind
pub fn scheme(kind: EntityKind) -> &'static SeedScheme {
    match kind {
        EntityKind::Advertiser => &SCHEMES[0],
        EntityKind::Campaign => &SCHEMES[1],
        EntityKind::Provider => &SCHEMES[2],
        EntityKind::Location => &SCHEMES[3],
        EntityKind::Device => &SCHEMES[4],
        EntityKind::DeviceRegistry => &SCHEMES[5],
    }
}

/// Derive the canonical address for an entity.
///
/// The index must be present exactly when the scheme calls for one, and is
/// range-checked for the scheme's width before encoding.
pub fn derive_entity_address(
    kind: EntityKind,
    program_id: &Address,
    authority: &Address,
    index: Option<i128>,
) -> Result<(Address, u8)> {
    let scheme = scheme(kind);

    let encoded: Option<Vec<u8>> = match (scheme.index, index) {
        (IndexWidth::None, None) => None,
        (IndexWidth::None, Some(_)) => {
            return Err(Error::InvalidArgument(format!(
                "{:?} addresses take no index",
                kind
            )));
        }
        (IndexWidth::U8, Some(value)) => Some(encode_index_u8(value)?.to_vec()),
        (IndexWidth::U64, Some(value)) => Some(encode_index_u64(value)?.to_vec()),
        (_, None) => {
            return Err(Error::InvalidArgument(format!(
                "{:?} addresses require an index",
                kind
            )));
        }
    };

    match &encoded {
        Some(bytes) => find_derived_address(
            program_id,
            &[scheme.tag, authority.as_bytes(), bytes.as_slice()],
        ),
        None => find_derived_address(program_id, &[scheme.tag, authority.as_bytes()]),
    }
}

/// Derive the booking address for a (campaign, location) pair
pub fn derive_booking_address(
    program_id: &Address,
    campaign: &Address,
    location: &Address,
) -> Result<(Address, u8)> {
    find_derived_address(
        program_id,
        &[BOOKING_TAG, campaign.as_bytes(), location.as_bytes()],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn program() -> Address {
        Address::new_from_array([1u8; 32])
    }

    fn authority() -> Address {
        Address::new_from_array([2u8; 32])
    }

    #[test]
    fn test_every_kind_is_registered() {
        for kind in [
            EntityKind::Advertiser,
            EntityKind::Campaign,
            EntityKind::Provider,
            EntityKind::Location,
            EntityKind::Device,
            EntityKind::DeviceRegistry,
        ] {
            assert_eq!(scheme(kind).kind, kind);
        }
    }

    #[test]
    fn test_index_required_for_indexed_schemes() {
        let err =
            derive_entity_address(EntityKind::Campaign, &program(), &authority(), None)
                .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_index_rejected_for_unindexed_schemes() {
        let err =
            derive_entity_address(EntityKind::Advertiser, &program(), &authority(), Some(0))
                .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_device_scheme_is_one_byte() {
        assert!(
            derive_entity_address(EntityKind::Device, &program(), &authority(), Some(255))
                .is_ok()
        );
        assert!(
            derive_entity_address(EntityKind::Device, &program(), &authority(), Some(256))
                .is_err()
        );
        assert!(
            derive_entity_address(EntityKind::Device, &program(), &authority(), Some(-1))
                .is_err()
        );
    }

    #[test]
    fn test_distinct_indices_yield_distinct_addresses() {
        let (first, _) =
            derive_entity_address(EntityKind::Campaign, &program(), &authority(), Some(0))
                .unwrap();
        let (second, _) =
            derive_entity_address(EntityKind::Campaign, &program(), &authority(), Some(1))
                .unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_booking_address_is_order_sensitive() {
        let campaign = Address::new_from_array([8u8; 32]);
        let location = Address::new_from_array([9u8; 32]);

        let (forward, _) = derive_booking_address(&program(), &campaign, &location).unwrap();
        let (reversed, _) = derive_booking_address(&program(), &location, &campaign).unwrap();
        assert_ne!(forward, reversed);
    }
}
