//! Network transport capability boundary
//!
//! The SDK assumes exactly five capabilities of the underlying network
//! stack and nothing more. Implementations live outside this crate; tests
//! substitute mocks at this seam.

use crate::error::RawResult;
use crate::types::{AccountUpdate, Address, Instruction, LogsEvent};
use async_trait::async_trait;
use std::sync::Arc;

/// Identifier the transport assigns to a live subscription
pub type SubscriptionId = u64;

/// Handler invoked with an account's new state on each change.
///
/// Runs in the transport's dispatch context; panics inside the handler are
/// not caught by the SDK and propagate to that context.
pub type AccountHandler = Arc<dyn Fn(AccountUpdate) + Send + Sync>;

/// Handler invoked with each log batch for a subscribed program.
///
/// Same dispatch and panic semantics as [`AccountHandler`].
pub type LogsHandler = Arc<dyn Fn(LogsEvent) + Send + Sync>;

/// The five capabilities the SDK requires of the network layer
#[async_trait]
pub trait LedgerTransport: Send + Sync {
    /// Fetch the raw account bytes at an address
    async fn fetch_account(&self, address: &Address) -> RawResult<Vec<u8>>;

    /// Submit an operation and await confirmation, returning its signature
    async fn submit(&self, instruction: Instruction) -> RawResult<String>;

    /// Register a handler for changes to one account
    async fn subscribe_account(
        &self,
        address: &Address,
        handler: AccountHandler,
    ) -> RawResult<SubscriptionId>;

    /// Register a handler for the log stream of one program
    async fn subscribe_logs(
        &self,
        program_id: &Address,
        handler: LogsHandler,
    ) -> RawResult<SubscriptionId>;

    /// Tear down a subscription by id
    async fn unsubscribe(&self, id: SubscriptionId) -> RawResult<()>;
}
