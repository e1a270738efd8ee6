//! Advertiser profile operations

use crate::accounts::AdvertiserAccount;
use crate::context::ClientContext;
use crate::instruction::{encode, BoardInstruction};
use client_core::seeds::{derive_entity_address, EntityKind};
use client_core::types::{AccountMeta, AccountWithAddress, Address, Instruction};
use client_core::Result;
use std::sync::Arc;
use subscriptions::Cancellation;
use tracing::info;

/// One advertiser profile per authority, at a derived address
#[derive(Debug)]
pub struct AdvertiserService {
    context: Arc<ClientContext>,
}

impl AdvertiserService {
    /// Build the service over a shared context
    pub fn new(context: Arc<ClientContext>) -> Self {
        Self { context }
    }

    /// Address of the profile owned by `authority`
    pub fn address_for(&self, authority: &Address) -> Result<Address> {
        let (address, _) = derive_entity_address(
            EntityKind::Advertiser,
            &self.context.config.board_program,
            authority,
            None,
        )?;
        Ok(address)
    }

    /// Create the caller's advertiser profile and return its initial state
    pub async fn create(
        &self,
        authority: Option<Address>,
    ) -> Result<AccountWithAddress<AdvertiserAccount>> {
        let signer = self.context.resolve_authority(authority)?;
        let advertiser = self.address_for(&signer)?;

        let instruction = Instruction {
            program_id: self.context.config.board_program,
            accounts: vec![
                AccountMeta::writable(advertiser, false),
                AccountMeta::writable(signer, true),
            ],
            data: encode(&BoardInstruction::CreateAdvertiser)?,
        };
        let signature = self.context.submit("createAdvertiser", instruction).await?;
        info!(%advertiser, %signature, "advertiser profile created");

        self.fetch_by_address(&advertiser).await
    }

    /// Fetch the profile owned by `authority`
    pub async fn fetch(&self, authority: &Address) -> Result<AccountWithAddress<AdvertiserAccount>> {
        let address = self.address_for(authority)?;
        self.fetch_by_address(&address).await
    }

    /// Fetch a profile at a known address
    pub async fn fetch_by_address(
        &self,
        address: &Address,
    ) -> Result<AccountWithAddress<AdvertiserAccount>> {
        self.context.fetch("fetchAdvertiser", address).await
    }

    /// Watch the profile owned by `authority` for state changes
    pub async fn observe<H>(&self, authority: &Address, handler: H) -> Result<Cancellation>
    where
        H: Fn(AccountWithAddress<AdvertiserAccount>) + Send + Sync + 'static,
    {
        let address = self.address_for(authority)?;
        self.context
            .observe("observeAdvertiser", address, handler)
            .await
    }
}
