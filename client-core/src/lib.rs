//! AdGrid client core
//!
//! Foundation crate for the AdGrid SDK: canonical address derivation, the
//! uniform error taxonomy, the transport capability boundary, and the
//! execution choke point that classifies every ledger-facing failure.
//!
//! # Architecture
//!
//! - **Pure derivation**: addresses are a deterministic function of seeds
//!   and a program id; the off-curve search guarantees no collision with
//!   signing keys
//! - **Single error boundary**: all faults surface as one of five kinds
//! - **Injected transport**: the network layer is a trait implemented by
//!   the consuming application; this crate never opens a connection

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod config;
pub mod derive;
pub mod error;
pub mod executor;
pub mod seeds;
pub mod transport;
pub mod types;

// Re-exports
pub use config::{ClientConfig, Commitment, BOARD_PROGRAM_ID, ORACLE_PROGRAM_ID};
pub use error::{map_to_error, Error, RawResult, Result, TransportError};
pub use executor::{fetch_account_or_err, TransactionExecutor};
pub use seeds::{derive_booking_address, derive_entity_address, EntityKind};
pub use transport::{AccountHandler, LedgerTransport, LogsHandler, SubscriptionId};
pub use types::{AccountMeta, AccountUpdate, AccountWithAddress, Address, Instruction, LogsEvent};
