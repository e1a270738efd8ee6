//! Execution choke point for ledger-facing calls
//!
//! Every read or write against the ledger flows through here so that
//! callers see uniform error shapes regardless of which underlying fault
//! occurred. Successful results pass through unchanged; failures are
//! classified by [`map_to_error`]. Nothing is retried.

use crate::error::{map_to_error, Error, RawResult, Result};
use crate::types::Address;
use std::future::Future;
use tracing::{debug, warn};

const ACCOUNT_NOT_FOUND: &str = "account does not exist";

/// Wraps arbitrary asynchronous ledger operations with error classification
#[derive(Debug, Default, Clone, Copy)]
pub struct TransactionExecutor;

impl TransactionExecutor {
    /// Create a new executor
    pub fn new() -> Self {
        Self
    }

    /// Run `operation`, classifying any failure with `label` as context
    pub async fn run<T, F>(&self, label: &str, operation: F) -> Result<T>
    where
        F: Future<Output = RawResult<T>>,
    {
        debug!(label, "executing ledger operation");
        operation.await.map_err(|raw| {
            let mapped = map_to_error(raw, Some(label));
            warn!(label, error = %mapped, "ledger operation failed");
            mapped
        })
    }
}

/// Run `fetcher` for `address`, translating a missing account into
/// [`Error::AccountNotFound`].
///
/// Any failure whose message matches "account does not exist"
/// (case-insensitive) becomes `AccountNotFound(address)`; every other
/// failure is classified with `label` as context.
pub async fn fetch_account_or_err<T, F>(label: &str, address: &Address, fetcher: F) -> Result<T>
where
    F: Future<Output = RawResult<T>>,
{
    fetcher.await.map_err(|raw| {
        if raw.message().to_ascii_lowercase().contains(ACCOUNT_NOT_FOUND) {
            debug!(label, %address, "account does not exist");
            Error::AccountNotFound(*address)
        } else {
            map_to_error(raw, Some(label))
        }
    })
}
