//! Property-based tests for address derivation
//!
//! These verify the two load-bearing invariants:
//! - Determinism: same (program, seeds) always yields the same (address, bump)
//! - Off-curve: a derived address is never a valid signing key's public point

use client_core::derive::{find_derived_address, is_off_curve};
use client_core::types::Address;
use proptest::prelude::*;

/// Strategy for generating 32-byte program ids
fn address_strategy() -> impl Strategy<Value = Address> {
    any::<[u8; 32]>().prop_map(Address::new_from_array)
}

/// Strategy for generating a valid seed list (1..=4 seeds, 1..=32 bytes each)
fn seeds_strategy() -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(prop::collection::vec(any::<u8>(), 1..=32), 1..=4)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_derivation_is_deterministic(
        program in address_strategy(),
        seeds in seeds_strategy(),
    ) {
        let refs: Vec<&[u8]> = seeds.iter().map(|s| s.as_slice()).collect();
        let first = find_derived_address(&program, &refs).unwrap();
        let second = find_derived_address(&program, &refs).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_derived_addresses_are_off_curve(
        program in address_strategy(),
        seeds in seeds_strategy(),
    ) {
        let refs: Vec<&[u8]> = seeds.iter().map(|s| s.as_slice()).collect();
        let (address, _) = find_derived_address(&program, &refs).unwrap();
        prop_assert!(is_off_curve(address.as_bytes()));
    }

    #[test]
    fn prop_bump_is_canonical(
        program in address_strategy(),
        seeds in seeds_strategy(),
    ) {
        // Every bump above the accepted one must have been on-curve
        let refs: Vec<&[u8]> = seeds.iter().map(|s| s.as_slice()).collect();
        let (_, bump) = find_derived_address(&program, &refs).unwrap();
        for rejected in (bump as u16 + 1)..=255 {
            let digest_is_candidate = client_core::derive::create_derived_address(
                &refs,
                rejected as u8,
                &program,
            );
            prop_assert!(digest_is_candidate.is_err());
        }
    }

    #[test]
    fn prop_program_id_separates_domains(
        seeds in seeds_strategy(),
    ) {
        let program_a = Address::new_from_array([0xAA; 32]);
        let program_b = Address::new_from_array([0xBB; 32]);
        let refs: Vec<&[u8]> = seeds.iter().map(|s| s.as_slice()).collect();
        let (addr_a, _) = find_derived_address(&program_a, &refs).unwrap();
        let (addr_b, _) = find_derived_address(&program_b, &refs).unwrap();
        prop_assert_ne!(addr_a, addr_b);
    }
}
