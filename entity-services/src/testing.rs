//! In-memory ledger double shared by the service tests

use async_trait::async_trait;
use client_core::transport::{AccountHandler, LedgerTransport, LogsHandler, SubscriptionId};
use client_core::types::{Address, Instruction};
use client_core::{RawResult, TransportError};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Route tracing output through the test harness capture.
///
/// Safe to call from every test; only the first call installs the
/// subscriber.
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Transport backed by a map of pre-seeded accounts
pub(crate) struct MockLedger {
    accounts: Mutex<HashMap<Address, Vec<u8>>>,
    submitted: Mutex<Vec<Instruction>>,
    next_id: AtomicU64,
}

impl MockLedger {
    pub(crate) fn empty() -> Arc<Self> {
        Arc::new(Self {
            accounts: Mutex::new(HashMap::new()),
            submitted: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        })
    }

    /// Seed an account with an encoded value
    pub(crate) fn put<T: Serialize>(&self, address: Address, account: &T) {
        let bytes = bincode::serialize(account).unwrap();
        self.accounts.lock().unwrap().insert(address, bytes);
    }

    /// Instructions submitted so far, oldest first
    pub(crate) fn submitted(&self) -> Vec<Instruction> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl LedgerTransport for MockLedger {
    async fn fetch_account(&self, address: &Address) -> RawResult<Vec<u8>> {
        self.accounts
            .lock()
            .unwrap()
            .get(address)
            .cloned()
            .ok_or_else(|| TransportError::Message("Account does not exist".to_string()))
    }

    async fn submit(&self, instruction: Instruction) -> RawResult<String> {
        self.submitted.lock().unwrap().push(instruction);
        Ok("mock-signature".to_string())
    }

    async fn subscribe_account(
        &self,
        _address: &Address,
        _handler: AccountHandler,
    ) -> RawResult<SubscriptionId> {
        Ok(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    async fn subscribe_logs(
        &self,
        _program_id: &Address,
        _handler: LogsHandler,
    ) -> RawResult<SubscriptionId> {
        Ok(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    async fn unsubscribe(&self, _id: SubscriptionId) -> RawResult<()> {
        Ok(())
    }
}
