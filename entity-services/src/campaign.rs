//! Campaign lifecycle operations
//!
//! Campaigns live at derived addresses indexed per advertiser; the next
//! index always comes from the advertiser profile on the ledger, never
//! from local state.

use crate::accounts::{AdvertiserAccount, CampaignAccount};
use crate::context::ClientContext;
use crate::instruction::{encode, BoardInstruction};
use client_core::seeds::{derive_entity_address, EntityKind};
use client_core::types::{AccountMeta, AccountWithAddress, Address, Instruction};
use client_core::{Error, Result};
use quoting::{calculate_settlement_quote, MetricInputs, PricingModel, QuoteOptions, SettlementQuote};
use std::sync::Arc;
use subscriptions::Cancellation;
use tracing::{debug, info};

/// Descriptive fields of a campaign
#[derive(Debug, Clone)]
pub struct CampaignMetadata {
    /// Display name
    pub name: String,
    /// Description shown to providers
    pub description: String,
    /// Creative image URL
    pub image_url: String,
}

/// Campaign operations for one advertiser authority at a time
#[derive(Debug)]
pub struct CampaignService {
    context: Arc<ClientContext>,
}

impl CampaignService {
    /// Build the service over a shared context
    pub fn new(context: Arc<ClientContext>) -> Self {
        Self { context }
    }

    /// Address of campaign `index` under `authority`
    pub fn address_for(&self, authority: &Address, index: u64) -> Result<Address> {
        let (address, _) = derive_entity_address(
            EntityKind::Campaign,
            &self.context.config.board_program,
            authority,
            Some(index.into()),
        )?;
        Ok(address)
    }

    fn advertiser_address(&self, authority: &Address) -> Result<Address> {
        let (address, _) = derive_entity_address(
            EntityKind::Advertiser,
            &self.context.config.board_program,
            authority,
            None,
        )?;
        Ok(address)
    }

    /// Create a campaign with an initial budget.
    ///
    /// Requires the caller's advertiser profile to exist; the new
    /// campaign's index is the profile's `last_campaign_id`.
    pub async fn create(
        &self,
        metadata: CampaignMetadata,
        budget: u64,
        authority: Option<Address>,
    ) -> Result<AccountWithAddress<CampaignAccount>> {
        let signer = self.context.resolve_authority(authority)?;
        let advertiser = self.advertiser_address(&signer)?;
        let profile: AccountWithAddress<AdvertiserAccount> =
            self.context.fetch("createCampaign", &advertiser).await?;

        let index = profile.data.last_campaign_id;
        let campaign = self.address_for(&signer, index)?;
        debug!(%campaign, index, "creating campaign");

        let instruction = Instruction {
            program_id: self.context.config.board_program,
            accounts: vec![
                AccountMeta::writable(campaign, false),
                AccountMeta::writable(advertiser, false),
                AccountMeta::writable(signer, true),
            ],
            data: encode(&BoardInstruction::CreateCampaign {
                name: metadata.name,
                description: metadata.description,
                image_url: metadata.image_url,
                budget,
            })?,
        };
        let signature = self.context.submit("createCampaign", instruction).await?;
        info!(%campaign, index, %signature, "campaign created");

        self.fetch_by_address(&campaign).await
    }

    /// Top up a campaign's available budget
    pub async fn add_budget(
        &self,
        campaign_idx: u64,
        amount: u64,
        authority: Option<Address>,
    ) -> Result<String> {
        if amount == 0 {
            return Err(Error::InvalidArgument(
                "budget amount must be positive".to_string(),
            ));
        }
        self.campaign_op(
            "addBudget",
            BoardInstruction::AddBudget {
                campaign_idx,
                amount,
            },
            campaign_idx,
            authority,
        )
        .await
    }

    /// Withdraw unreserved budget from a campaign
    pub async fn withdraw_budget(
        &self,
        campaign_idx: u64,
        amount: u64,
        authority: Option<Address>,
    ) -> Result<String> {
        if amount == 0 {
            return Err(Error::InvalidArgument(
                "budget amount must be positive".to_string(),
            ));
        }
        self.campaign_op(
            "withdrawBudget",
            BoardInstruction::WithdrawBudget {
                campaign_idx,
                amount,
            },
            campaign_idx,
            authority,
        )
        .await
    }

    /// Update a campaign's descriptive fields.
    ///
    /// At least one field must be set; unset fields keep their value.
    pub async fn update(
        &self,
        campaign_idx: u64,
        name: Option<String>,
        description: Option<String>,
        image_url: Option<String>,
        authority: Option<Address>,
    ) -> Result<String> {
        if name.is_none() && description.is_none() && image_url.is_none() {
            return Err(Error::InvalidArgument(
                "campaign update carries no changes".to_string(),
            ));
        }
        self.campaign_op(
            "updateCampaign",
            BoardInstruction::UpdateCampaign {
                campaign_idx,
                name,
                description,
                image_url,
            },
            campaign_idx,
            authority,
        )
        .await
    }

    /// Close a campaign, refunding remaining budget to the authority
    pub async fn close(&self, campaign_idx: u64, authority: Option<Address>) -> Result<String> {
        self.campaign_op(
            "closeCampaign",
            BoardInstruction::CloseCampaign { campaign_idx },
            campaign_idx,
            authority,
        )
        .await
    }

    async fn campaign_op(
        &self,
        label: &str,
        payload: BoardInstruction,
        campaign_idx: u64,
        authority: Option<Address>,
    ) -> Result<String> {
        let signer = self.context.resolve_authority(authority)?;
        let advertiser = self.advertiser_address(&signer)?;
        let campaign = self.address_for(&signer, campaign_idx)?;

        let instruction = Instruction {
            program_id: self.context.config.board_program,
            accounts: vec![
                AccountMeta::writable(campaign, false),
                AccountMeta::writable(advertiser, false),
                AccountMeta::writable(signer, true),
            ],
            data: encode(&payload)?,
        };
        let signature = self.context.submit(label, instruction).await?;
        info!(%campaign, label, %signature, "campaign updated");
        Ok(signature)
    }

    /// Fetch campaign `index` under `authority`
    pub async fn fetch(
        &self,
        authority: &Address,
        index: u64,
    ) -> Result<AccountWithAddress<CampaignAccount>> {
        let address = self.address_for(authority, index)?;
        self.fetch_by_address(&address).await
    }

    /// Fetch a campaign at a known address
    pub async fn fetch_by_address(
        &self,
        address: &Address,
    ) -> Result<AccountWithAddress<CampaignAccount>> {
        self.context.fetch("fetchCampaign", address).await
    }

    /// Fetch every surviving campaign under `authority`.
    ///
    /// Walks indices up to the advertiser profile's `last_campaign_id`;
    /// indices whose account no longer exists (closed campaigns) are
    /// skipped, any other failure aborts the walk.
    pub async fn list(&self, authority: &Address) -> Result<Vec<AccountWithAddress<CampaignAccount>>> {
        let advertiser = self.advertiser_address(authority)?;
        let profile: AccountWithAddress<AdvertiserAccount> =
            self.context.fetch("listCampaigns", &advertiser).await?;

        let mut campaigns = Vec::new();
        for index in 0..profile.data.last_campaign_id {
            let address = self.address_for(authority, index)?;
            match self.fetch_by_address(&address).await {
                Ok(campaign) => campaigns.push(campaign),
                Err(Error::AccountNotFound(_)) => continue,
                Err(err) => return Err(err),
            }
        }
        Ok(campaigns)
    }

    /// Watch campaign `index` under `authority` for state changes
    pub async fn observe<H>(
        &self,
        authority: &Address,
        index: u64,
        handler: H,
    ) -> Result<Cancellation>
    where
        H: Fn(AccountWithAddress<CampaignAccount>) + Send + Sync + 'static,
    {
        let address = self.address_for(authority, index)?;
        self.context.observe("observeCampaign", address, handler).await
    }

    /// Quote what settling the given delivery against this campaign
    /// would pay out, without touching the ledger.
    pub fn preview_settlement(
        &self,
        pricing: &PricingModel,
        metrics: &MetricInputs,
        options: &QuoteOptions,
    ) -> Result<SettlementQuote> {
        calculate_settlement_quote(pricing, metrics, options)
    }
}
