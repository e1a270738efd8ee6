//! Shared client context the entity services are built over

use crate::accounts::decode_account;
use client_core::config::ClientConfig;
use client_core::error::map_to_error;
use client_core::executor::{fetch_account_or_err, TransactionExecutor};
use client_core::transport::{AccountHandler, LedgerTransport};
use client_core::types::{AccountUpdate, AccountWithAddress, Address, Instruction};
use client_core::{Error, Result};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use subscriptions::{Cancellation, SubscriptionManager};
use tracing::warn;

/// Transport, executor, subscription manager, and configuration bundled
/// behind one `Arc` so the services can share them cheaply.
pub struct ClientContext {
    /// Ledger transport
    pub transport: Arc<dyn LedgerTransport>,
    /// Error-classifying execution wrapper
    pub executor: TransactionExecutor,
    /// Subscription lifecycle manager
    pub subscriptions: SubscriptionManager,
    /// Client configuration
    pub config: ClientConfig,
}

impl ClientContext {
    /// Build a context over a transport and configuration
    pub fn new(transport: Arc<dyn LedgerTransport>, config: ClientConfig) -> Arc<Self> {
        Arc::new(Self {
            subscriptions: SubscriptionManager::new(transport.clone()),
            executor: TransactionExecutor::new(),
            transport,
            config,
        })
    }

    /// Resolve the signing authority for an operation.
    ///
    /// An explicit argument wins over the configured default; neither
    /// present is [`Error::MissingWallet`].
    pub fn resolve_authority(&self, authority: Option<Address>) -> Result<Address> {
        authority
            .or(self.config.authority)
            .ok_or(Error::MissingWallet)
    }

    /// Submit an instruction through the executor
    pub(crate) async fn submit(&self, label: &str, instruction: Instruction) -> Result<String> {
        self.executor
            .run(label, self.transport.submit(instruction))
            .await
    }

    /// Fetch and decode one account
    pub(crate) async fn fetch<T: DeserializeOwned>(
        &self,
        label: &str,
        address: &Address,
    ) -> Result<AccountWithAddress<T>> {
        let bytes =
            fetch_account_or_err(label, address, self.transport.fetch_account(address)).await?;
        Ok(AccountWithAddress {
            address: *address,
            data: decode_account(address, &bytes)?,
        })
    }

    /// Subscribe to one account, decoding each notification before
    /// handing it to `handler`. Notifications that fail to decode are
    /// logged and dropped.
    pub(crate) async fn observe<T, H>(
        &self,
        label: &'static str,
        address: Address,
        handler: H,
    ) -> Result<Cancellation>
    where
        T: DeserializeOwned + Send + 'static,
        H: Fn(AccountWithAddress<T>) + Send + Sync + 'static,
    {
        let decoding: AccountHandler = Arc::new(move |update: AccountUpdate| {
            match decode_account::<T>(&address, &update.data) {
                Ok(data) => handler(AccountWithAddress { address, data }),
                Err(err) => warn!(label, %address, error = %err, "dropping undecodable notification"),
            }
        });
        self.subscriptions
            .subscribe_to_account(&address, decoding)
            .await
            .map_err(|raw| map_to_error(raw, Some(label)))
    }
}

impl std::fmt::Debug for ClientContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_authority_wins_over_configured_default() {
        let configured = Address::new_from_array([1u8; 32]);
        let explicit = Address::new_from_array([2u8; 32]);

        let mut config = ClientConfig::default();
        config.authority = Some(configured);
        let context = ClientContext::new(crate::testing::MockLedger::empty(), config);

        assert_eq!(context.resolve_authority(Some(explicit)).unwrap(), explicit);
        assert_eq!(context.resolve_authority(None).unwrap(), configured);
    }

    #[test]
    fn test_no_authority_anywhere_is_missing_wallet() {
        let context =
            ClientContext::new(crate::testing::MockLedger::empty(), ClientConfig::default());
        assert!(matches!(
            context.resolve_authority(None),
            Err(Error::MissingWallet)
        ));
    }
}
