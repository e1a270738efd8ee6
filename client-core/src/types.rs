//! Core data types shared across the SDK

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 32-byte account address on the ledger.
///
/// Wallet-owned addresses are ed25519 public keys supplied by the caller;
/// program-derived addresses are computed by [`crate::derive`] and carry an
/// associated bump byte. The address itself is immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address([u8; 32]);

impl Address {
    /// Create from a raw 32-byte array
    pub const fn new_from_array(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Decode a base58 string to an address at compile time.
    ///
    /// Only supports the standard Bitcoin base58 alphabet. Panics at compile
    /// time if the decoded output is not exactly 32 bytes.
    pub const fn from_base58(s: &str) -> Self {
        const ALPHABET: &[u8] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

        const fn char_to_val(c: u8) -> u8 {
            let mut i = 0;
            while i < ALPHABET.len() {
                if ALPHABET[i] == c {
                    return i as u8;
                }
                i += 1;
            }
            panic!("invalid base58 character");
        }

        let bytes = s.as_bytes();
        // Little-endian accumulator
        let mut buf = [0u8; 64];
        let mut buf_len: usize = 0;

        let mut i = 0;
        while i < bytes.len() {
            let val = char_to_val(bytes[i]) as u32;
            let mut j = 0;
            let mut carry = val;
            while j < buf_len {
                carry += (buf[j] as u32) * 58;
                buf[j] = (carry & 0xFF) as u8;
                carry >>= 8;
                j += 1;
            }
            while carry > 0 {
                buf[buf_len] = (carry & 0xFF) as u8;
                carry >>= 8;
                buf_len += 1;
            }
            i += 1;
        }

        // Leading '1's encode leading zero bytes
        let mut leading = 0;
        while leading < bytes.len() && bytes[leading] == b'1' {
            leading += 1;
        }

        if leading + buf_len != 32 {
            panic!("base58 decoded length is not 32 bytes");
        }

        let mut out = [0u8; 32];
        let mut k = 0;
        while k < buf_len {
            out[31 - k] = buf[k];
            k += 1;
        }
        Self(out)
    }

    /// Raw bytes of the address
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<&ed25519_dalek::VerifyingKey> for Address {
    fn from(key: &ed25519_dalek::VerifyingKey) -> Self {
        Self(key.to_bytes())
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", bs58::encode(&self.0).into_string())
    }
}

impl FromStr for Address {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decoded = bs58::decode(s)
            .into_vec()
            .map_err(|e| crate::Error::InvalidArgument(format!("invalid base58 address: {}", e)))?;
        let bytes: [u8; 32] = decoded.try_into().map_err(|v: Vec<u8>| {
            crate::Error::InvalidArgument(format!(
                "address must decode to 32 bytes, got {}",
                v.len()
            ))
        })?;
        Ok(Self(bytes))
    }
}

/// New state of a subscribed account, as reported by the transport
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountUpdate {
    /// Raw account data
    pub data: Vec<u8>,

    /// Account balance in lamports
    pub lamports: u64,

    /// Program that owns the account
    pub owner: Address,

    /// Slot at which the change was observed
    pub slot: u64,
}

/// A batch of log lines emitted by a program, as reported by the transport
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsEvent {
    /// Signature of the transaction that produced the logs
    pub signature: String,

    /// Emitted log lines, in order
    pub logs: Vec<String>,

    /// Error string when the transaction failed
    pub err: Option<String>,

    /// Slot at which the logs were emitted
    pub slot: u64,
}

/// Account reference inside an instruction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountMeta {
    /// Referenced account
    pub address: Address,

    /// Whether the account must sign
    pub is_signer: bool,

    /// Whether the account may be mutated
    pub is_writable: bool,
}

impl AccountMeta {
    /// Writable account reference
    pub fn writable(address: Address, is_signer: bool) -> Self {
        Self {
            address,
            is_signer,
            is_writable: true,
        }
    }

    /// Read-only account reference
    pub fn readonly(address: Address, is_signer: bool) -> Self {
        Self {
            address,
            is_signer,
            is_writable: false,
        }
    }
}

/// A single operation submitted to a program.
///
/// The SDK does not construct or sign transactions itself; it hands the
/// instruction to the transport, which wraps, signs, and confirms it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instruction {
    /// Target program
    pub program_id: Address,

    /// Ordered account references
    pub accounts: Vec<AccountMeta>,

    /// Serialized operation payload
    pub data: Vec<u8>,
}

/// Decoded account data paired with the address it was fetched from
#[derive(Debug, Clone)]
pub struct AccountWithAddress<T> {
    /// Account address
    pub address: Address,

    /// Decoded account contents
    pub data: T,
}
