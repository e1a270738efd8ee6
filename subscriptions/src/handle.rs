//! Revocation capability for a live subscription

use crate::metrics::{ACTIVE_SUBSCRIPTIONS, CANCEL_TOTAL};
use client_core::transport::{LedgerTransport, SubscriptionId};
use client_core::types::Address;
use client_core::RawResult;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

pub(crate) type Registry = Arc<Mutex<HashMap<SubscriptionId, Address>>>;

/// What a subscription observes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionKind {
    /// Account-change notifications for one address
    Account,
    /// Log-stream notifications for one program
    ProgramLogs,
}

impl SubscriptionKind {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            SubscriptionKind::Account => "account",
            SubscriptionKind::ProgramLogs => "program_logs",
        }
    }
}

/// Capability to revoke one subscription.
///
/// The caller never sees the transport-assigned id; this handle is the only
/// way to tear the subscription down. The first [`cancel`](Self::cancel)
/// deregisters at the transport and removes the manager's mapping entry;
/// every later call — including after the manager's `close_all` — is an
/// idempotent no-op with no transport traffic.
pub struct Cancellation {
    kind: SubscriptionKind,
    id: SubscriptionId,
    registry: Registry,
    transport: Arc<dyn LedgerTransport>,
}

impl Cancellation {
    pub(crate) fn new(
        kind: SubscriptionKind,
        id: SubscriptionId,
        registry: Registry,
        transport: Arc<dyn LedgerTransport>,
    ) -> Self {
        Self {
            kind,
            id,
            registry,
            transport,
        }
    }

    /// What this subscription observes
    pub fn kind(&self) -> SubscriptionKind {
        self.kind
    }

    /// Revoke the subscription.
    ///
    /// The mapping entry is removed before the transport call and is never
    /// re-added, even when the transport-side unsubscribe fails; that
    /// failure is returned unmapped for the caller to classify.
    pub async fn cancel(&self) -> RawResult<()> {
        let removed = self.registry.lock().await.remove(&self.id);
        if removed.is_none() {
            debug!(id = self.id, kind = self.kind.as_str(), "already cancelled");
            return Ok(());
        }

        ACTIVE_SUBSCRIPTIONS
            .with_label_values(&[self.kind.as_str()])
            .dec();

        match self.transport.unsubscribe(self.id).await {
            Ok(()) => {
                CANCEL_TOTAL
                    .with_label_values(&[self.kind.as_str(), "ok"])
                    .inc();
                Ok(())
            }
            Err(err) => {
                CANCEL_TOTAL
                    .with_label_values(&[self.kind.as_str(), "error"])
                    .inc();
                Err(err)
            }
        }
    }
}

impl std::fmt::Debug for Cancellation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cancellation")
            .field("kind", &self.kind)
            .field("id", &self.id)
            .finish()
    }
}
