//! Subscription lifecycle management
//!
//! Owns live subscriptions to account-change and program-log notifications
//! and hands callers a revocation capability instead of a raw id:
//! cancelling twice is safe, `close_all` drains everything concurrently,
//! and a transport rejection never leaves a dangling mapping.
//!
//! Ordering: notifications for a single address arrive in the order the
//! transport received them; there is no ordering guarantee across
//! addresses or between account and log subscriptions.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod handle;
pub mod manager;
pub mod metrics;

pub use handle::{Cancellation, SubscriptionKind};
pub use manager::SubscriptionManager;
