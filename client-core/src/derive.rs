//! Deterministic program-derived address computation
//!
//! A derived address is the SHA-256 digest of the seed list, a bump byte,
//! the program id, and a fixed domain separator — accepted only when the
//! digest is *not* a valid curve point, so a derived address can never
//! collide with a real signing key. The search scans bumps 255 down to 0
//! and takes the first off-curve candidate; same inputs always yield the
//! same `(address, bump)`.

use crate::error::{Error, Result};
use crate::types::Address;
use curve25519_dalek::edwards::CompressedEdwardsY;
use sha2::{Digest, Sha256};

/// Domain separator appended to every candidate digest
pub const DERIVED_ADDRESS_MARKER: &[u8] = b"ProgramDerivedAddress";

/// Maximum number of seeds in a derivation
pub const MAX_SEEDS: usize = 16;

/// Maximum length of a single seed, in bytes
pub const MAX_SEED_LEN: usize = 32;

/// Whether the 32 bytes fail to decompress as an Edwards point.
///
/// Off-curve is the acceptance condition for derived addresses.
pub fn is_off_curve(bytes: &[u8; 32]) -> bool {
    CompressedEdwardsY(*bytes).decompress().is_none()
}

fn validate_seeds(seeds: &[&[u8]]) -> Result<()> {
    if seeds.is_empty() {
        return Err(Error::InvalidArgument(
            "at least one seed is required".to_string(),
        ));
    }
    if seeds.len() > MAX_SEEDS {
        return Err(Error::InvalidArgument(format!(
            "too many seeds: {} (max {})",
            seeds.len(),
            MAX_SEEDS
        )));
    }
    for (position, seed) in seeds.iter().enumerate() {
        if seed.is_empty() {
            return Err(Error::InvalidArgument(format!(
                "seed {} is zero-length",
                position
            )));
        }
        if seed.len() > MAX_SEED_LEN {
            return Err(Error::InvalidArgument(format!(
                "seed {} is {} bytes (max {})",
                position,
                seed.len(),
                MAX_SEED_LEN
            )));
        }
    }
    Ok(())
}

fn candidate_digest(seeds: &[&[u8]], bump: u8, program_id: &Address) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for seed in seeds {
        hasher.update(seed);
    }
    hasher.update([bump]);
    hasher.update(program_id.as_bytes());
    hasher.update(DERIVED_ADDRESS_MARKER);
    hasher.finalize().into()
}

/// Compute the derived address for a seed list and an explicit bump.
///
/// Fails with [`Error::InvalidArgument`] when the candidate digest lands on
/// the curve, i.e. the bump is not valid for these seeds.
pub fn create_derived_address(
    seeds: &[&[u8]],
    bump: u8,
    program_id: &Address,
) -> Result<Address> {
    validate_seeds(seeds)?;
    let digest = candidate_digest(seeds, bump, program_id);
    if !is_off_curve(&digest) {
        return Err(Error::InvalidArgument(format!(
            "bump {} yields an on-curve address for these seeds",
            bump
        )));
    }
    Ok(Address::new_from_array(digest))
}

/// Find the canonical derived address for a seed list.
///
/// Scans bumps from 255 down to 0 and returns the first off-curve
/// candidate together with the bump that produced it. Exhausting the full
/// range indicates a malformed seed set and fails with
/// [`Error::InvalidArgument`] rather than panicking.
pub fn find_derived_address(program_id: &Address, seeds: &[&[u8]]) -> Result<(Address, u8)> {
    validate_seeds(seeds)?;
    for bump in (0u8..=255).rev() {
        let digest = candidate_digest(seeds, bump, program_id);
        if is_off_curve(&digest) {
            return Ok((Address::new_from_array(digest), bump));
        }
    }
    Err(Error::InvalidArgument(
        "derivation exhausted: no valid bump for the given seeds".to_string(),
    ))
}

/// Encode a 1-byte entity index.
///
/// Values outside `0..=255` fail with [`Error::InvalidArgument`]; the
/// index is never silently truncated.
pub fn encode_index_u8(index: i128) -> Result<[u8; 1]> {
    if !(0..=255).contains(&index) {
        return Err(Error::InvalidArgument(format!(
            "index {} out of range for a 1-byte scheme (0..=255)",
            index
        )));
    }
    Ok([index as u8])
}

/// Encode an 8-byte little-endian entity index.
///
/// Negative values and values exceeding the unsigned 64-bit range fail
/// with [`Error::InvalidArgument`].
pub fn encode_index_u64(index: i128) -> Result<[u8; 8]> {
    if index < 0 {
        return Err(Error::InvalidArgument(
            "index must be a non-negative integer".to_string(),
        ));
    }
    if index > u64::MAX as i128 {
        return Err(Error::InvalidArgument(
            "index exceeds the u64 range".to_string(),
        ));
    }
    Ok((index as u64).to_le_bytes())
}
