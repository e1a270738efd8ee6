//! Subscription lifecycle manager

use crate::handle::{Cancellation, Registry, SubscriptionKind};
use crate::metrics::{ACTIVE_SUBSCRIPTIONS, SUBSCRIBE_TOTAL};
use client_core::transport::{AccountHandler, LedgerTransport, LogsHandler, SubscriptionId};
use client_core::types::Address;
use client_core::{RawResult, TransportError};
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Owns every live subscription opened through it.
///
/// Holds two mappings — subscription id to watched address (account
/// changes) and subscription id to program id (log streams). Callers
/// receive a [`Cancellation`] capability, never the id itself. Transport
/// rejections during subscribe are propagated unmapped and leave no
/// mapping behind.
pub struct SubscriptionManager {
    transport: Arc<dyn LedgerTransport>,
    accounts: Registry,
    logs: Registry,
}

impl SubscriptionManager {
    /// Create a manager over a transport
    pub fn new(transport: Arc<dyn LedgerTransport>) -> Self {
        Self {
            transport,
            accounts: Arc::new(Mutex::new(HashMap::new())),
            logs: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Subscribe to state changes of one account.
    ///
    /// `handler` is invoked with the account's new raw state on every
    /// change, in the order the transport received them. Handler panics
    /// propagate to the transport's dispatch context.
    pub async fn subscribe_to_account(
        &self,
        address: &Address,
        handler: AccountHandler,
    ) -> RawResult<Cancellation> {
        let kind = SubscriptionKind::Account;
        let id = match self.transport.subscribe_account(address, handler).await {
            Ok(id) => id,
            Err(err) => {
                SUBSCRIBE_TOTAL
                    .with_label_values(&[kind.as_str(), "error"])
                    .inc();
                return Err(err);
            }
        };
        self.record(kind, id, *address, &self.accounts).await;
        Ok(Cancellation::new(
            kind,
            id,
            self.accounts.clone(),
            self.transport.clone(),
        ))
    }

    /// Subscribe to the log stream of one program
    pub async fn subscribe_to_program_logs(
        &self,
        program_id: &Address,
        handler: LogsHandler,
    ) -> RawResult<Cancellation> {
        let kind = SubscriptionKind::ProgramLogs;
        let id = match self.transport.subscribe_logs(program_id, handler).await {
            Ok(id) => id,
            Err(err) => {
                SUBSCRIBE_TOTAL
                    .with_label_values(&[kind.as_str(), "error"])
                    .inc();
                return Err(err);
            }
        };
        self.record(kind, id, *program_id, &self.logs).await;
        Ok(Cancellation::new(
            kind,
            id,
            self.logs.clone(),
            self.transport.clone(),
        ))
    }

    async fn record(
        &self,
        kind: SubscriptionKind,
        id: SubscriptionId,
        target: Address,
        registry: &Registry,
    ) {
        registry.lock().await.insert(id, target);
        SUBSCRIBE_TOTAL
            .with_label_values(&[kind.as_str(), "ok"])
            .inc();
        ACTIVE_SUBSCRIPTIONS.with_label_values(&[kind.as_str()]).inc();
        info!(id, kind = kind.as_str(), %target, "subscription opened");
    }

    /// Number of live subscriptions of both kinds
    pub async fn active_count(&self) -> usize {
        self.accounts.lock().await.len() + self.logs.lock().await.len()
    }

    /// Cancel every outstanding subscription of both kinds.
    ///
    /// Both mappings are drained up front, so outstanding [`Cancellation`]
    /// handles and a repeated `close_all` become no-ops. All transport
    /// cancellations run concurrently; failures are collected and reported
    /// after every one has settled, so one failed cancellation does not
    /// leave the rest subscribed. An empty manager is a no-op.
    pub async fn close_all(&self) -> RawResult<()> {
        let mut drained: Vec<(SubscriptionKind, SubscriptionId)> = Vec::new();

        for (kind, registry) in [
            (SubscriptionKind::Account, &self.accounts),
            (SubscriptionKind::ProgramLogs, &self.logs),
        ] {
            let mut map = registry.lock().await;
            drained.extend(map.keys().map(|&id| (kind, id)));
            map.clear();
            ACTIVE_SUBSCRIPTIONS
                .with_label_values(&[kind.as_str()])
                .set(0);
        }

        if drained.is_empty() {
            return Ok(());
        }

        info!(count = drained.len(), "closing all subscriptions");
        let results = join_all(
            drained
                .iter()
                .map(|&(_, id)| self.transport.unsubscribe(id)),
        )
        .await;

        let failures: Vec<String> = drained
            .iter()
            .zip(results)
            .filter_map(|(&(kind, id), result)| {
                result
                    .err()
                    .map(|err| format!("{} {}: {}", kind.as_str(), id, err))
            })
            .collect();

        if failures.is_empty() {
            Ok(())
        } else {
            warn!(failed = failures.len(), total = drained.len(), "close_all incomplete");
            Err(TransportError::Message(format!(
                "{} of {} cancellations failed: {}",
                failures.len(),
                drained.len(),
                failures.join("; ")
            )))
        }
    }
}

impl std::fmt::Debug for SubscriptionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionManager").finish_non_exhaustive()
    }
}
