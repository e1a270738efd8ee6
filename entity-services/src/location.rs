//! Location registry operations
//!
//! Locations are indexed per provider the same way campaigns are indexed
//! per advertiser. The booking address ties one campaign to one location
//! and is derived, never stored client-side.

use crate::accounts::{BookingAccount, LocationAccount, LocationStatus, ProviderAccount};
use crate::context::ClientContext;
use crate::instruction::{encode, BoardInstruction};
use client_core::seeds::{derive_booking_address, derive_entity_address, EntityKind};
use client_core::types::{AccountMeta, AccountWithAddress, Address, Instruction};
use client_core::{Error, Result};
use quoting::{calculate_settlement_quote, MetricInputs, PricingModel, QuoteOptions, SettlementQuote};
use std::sync::Arc;
use subscriptions::Cancellation;
use tracing::{debug, info};

/// Descriptive fields of a location
#[derive(Debug, Clone)]
pub struct LocationMetadata {
    /// Display name
    pub name: String,
    /// Description shown to advertisers
    pub description: String,
    /// Booking price in lamports
    pub price: u64,
    /// Oracle allowed to report metrics for this location
    pub oracle_authority: Address,
}

/// Outcome of settling a booking: the refetched booking account and the
/// locally computed quote the payout was validated against
#[derive(Debug, Clone)]
pub struct BookingSettlement {
    /// Booking state after settlement
    pub booking: AccountWithAddress<BookingAccount>,
    /// Quote whose gross was submitted for payout
    pub quote: SettlementQuote,
}

/// Location operations for one provider authority at a time
#[derive(Debug)]
pub struct LocationService {
    context: Arc<ClientContext>,
}

impl LocationService {
    /// Build the service over a shared context
    pub fn new(context: Arc<ClientContext>) -> Self {
        Self { context }
    }

    /// Address of location `index` under `authority`
    pub fn address_for(&self, authority: &Address, index: u64) -> Result<Address> {
        let (address, _) = derive_entity_address(
            EntityKind::Location,
            &self.context.config.board_program,
            authority,
            Some(index.into()),
        )?;
        Ok(address)
    }

    /// Address of the booking account for a (campaign, location) pair
    pub fn booking_address(&self, campaign: &Address, location: &Address) -> Result<Address> {
        let (address, _) =
            derive_booking_address(&self.context.config.board_program, campaign, location)?;
        Ok(address)
    }

    fn provider_address(&self, authority: &Address) -> Result<Address> {
        let (address, _) = derive_entity_address(
            EntityKind::Provider,
            &self.context.config.board_program,
            authority,
            None,
        )?;
        Ok(address)
    }

    /// Register a location under the caller's provider profile.
    ///
    /// Requires the profile to exist; the new location's index is the
    /// profile's `last_location_id`.
    pub async fn create(
        &self,
        metadata: LocationMetadata,
        authority: Option<Address>,
    ) -> Result<AccountWithAddress<LocationAccount>> {
        let signer = self.context.resolve_authority(authority)?;
        let provider = self.provider_address(&signer)?;
        let profile: AccountWithAddress<ProviderAccount> =
            self.context.fetch("registerLocation", &provider).await?;

        let index = profile.data.last_location_id;
        let location = self.address_for(&signer, index)?;
        debug!(%location, index, "registering location");

        let instruction = Instruction {
            program_id: self.context.config.board_program,
            accounts: vec![
                AccountMeta::writable(location, false),
                AccountMeta::writable(provider, false),
                AccountMeta::writable(signer, true),
            ],
            data: encode(&BoardInstruction::RegisterLocation {
                name: metadata.name,
                description: metadata.description,
                price: metadata.price,
                oracle_authority: metadata.oracle_authority,
            })?,
        };
        let signature = self.context.submit("registerLocation", instruction).await?;
        info!(%location, index, %signature, "location registered");

        self.fetch_by_address(&location).await
    }

    /// Update a location's descriptive fields or price.
    ///
    /// At least one field must be set; unset fields keep their value.
    pub async fn update(
        &self,
        location_idx: u64,
        name: Option<String>,
        description: Option<String>,
        price: Option<u64>,
        authority: Option<Address>,
    ) -> Result<String> {
        if name.is_none() && description.is_none() && price.is_none() {
            return Err(Error::InvalidArgument(
                "location update carries no changes".to_string(),
            ));
        }
        self.location_op(
            "updateLocation",
            BoardInstruction::UpdateLocation {
                location_idx,
                name,
                description,
                price,
            },
            location_idx,
            authority,
        )
        .await
    }

    /// Change a location's availability state
    pub async fn set_status(
        &self,
        location_idx: u64,
        status: LocationStatus,
        authority: Option<Address>,
    ) -> Result<String> {
        self.location_op(
            "setLocationStatus",
            BoardInstruction::SetLocationStatus {
                location_idx,
                status,
            },
            location_idx,
            authority,
        )
        .await
    }

    async fn location_op(
        &self,
        label: &str,
        payload: BoardInstruction,
        location_idx: u64,
        authority: Option<Address>,
    ) -> Result<String> {
        let signer = self.context.resolve_authority(authority)?;
        let provider = self.provider_address(&signer)?;
        let location = self.address_for(&signer, location_idx)?;

        let instruction = Instruction {
            program_id: self.context.config.board_program,
            accounts: vec![
                AccountMeta::writable(location, false),
                AccountMeta::writable(provider, false),
                AccountMeta::writable(signer, true),
            ],
            data: encode(&payload)?,
        };
        let signature = self.context.submit(label, instruction).await?;
        info!(%location, label, %signature, "location updated");
        Ok(signature)
    }

    /// Book `location` for `campaign`, reserving the price from the
    /// campaign's budget. Returns the booking account.
    pub async fn book(
        &self,
        campaign: &Address,
        location: &Address,
        authority: Option<Address>,
    ) -> Result<AccountWithAddress<BookingAccount>> {
        let signature = self
            .booking_op("bookLocation", BoardInstruction::BookLocation, campaign, location, authority)
            .await?;
        let booking = self.booking_address(campaign, location)?;
        info!(%booking, %signature, "location booked");
        self.fetch_booking(campaign, location).await
    }

    /// Cancel a live booking, releasing the reserved budget
    pub async fn cancel_booking(
        &self,
        campaign: &Address,
        location: &Address,
        authority: Option<Address>,
    ) -> Result<AccountWithAddress<BookingAccount>> {
        let signature = self
            .booking_op("cancelBooking", BoardInstruction::CancelBooking, campaign, location, authority)
            .await?;
        let booking = self.booking_address(campaign, location)?;
        info!(%booking, %signature, "booking cancelled");
        self.fetch_booking(campaign, location).await
    }

    /// Settle a booking against delivered metrics.
    ///
    /// The quote is computed locally first; when the caller sets no cap,
    /// the booking's agreed price becomes the cap, so the payout can never
    /// exceed what was reserved. The quoted gross is submitted for payout
    /// and returned with the refetched booking for validation.
    pub async fn settle_booking(
        &self,
        campaign: &Address,
        location: &Address,
        pricing: &PricingModel,
        metrics: &MetricInputs,
        options: &QuoteOptions,
        authority: Option<Address>,
    ) -> Result<BookingSettlement> {
        let mut options = options.clone();
        if options.cap_amount.is_none() {
            let booking = self.fetch_booking(campaign, location).await?;
            options.cap_amount = Some(booking.data.price);
        }
        let quote = calculate_settlement_quote(pricing, metrics, &options)?;
        debug!(
            gross = quote.breakdown.gross,
            fee = quote.breakdown.fee,
            capped = quote.capped,
            "settling booking at quoted gross"
        );

        let signature = self
            .booking_op(
                "settleBooking",
                BoardInstruction::SettleBooking {
                    amount: quote.breakdown.gross,
                },
                campaign,
                location,
                authority,
            )
            .await?;
        let booking = self.fetch_booking(campaign, location).await?;
        info!(
            booking = %booking.address,
            %signature,
            amount = quote.breakdown.gross,
            "booking settled"
        );
        Ok(BookingSettlement { booking, quote })
    }

    async fn booking_op(
        &self,
        label: &str,
        payload: BoardInstruction,
        campaign: &Address,
        location: &Address,
        authority: Option<Address>,
    ) -> Result<String> {
        let signer = self.context.resolve_authority(authority)?;
        let booking = self.booking_address(campaign, location)?;

        let instruction = Instruction {
            program_id: self.context.config.board_program,
            accounts: vec![
                AccountMeta::writable(booking, false),
                AccountMeta::writable(*campaign, false),
                AccountMeta::writable(*location, false),
                AccountMeta::writable(signer, true),
            ],
            data: encode(&payload)?,
        };
        self.context.submit(label, instruction).await
    }

    /// Fetch the booking account for a (campaign, location) pair
    pub async fn fetch_booking(
        &self,
        campaign: &Address,
        location: &Address,
    ) -> Result<AccountWithAddress<BookingAccount>> {
        let address = self.booking_address(campaign, location)?;
        self.context.fetch("fetchBooking", &address).await
    }

    /// Fetch location `index` under `authority`
    pub async fn fetch(
        &self,
        authority: &Address,
        index: u64,
    ) -> Result<AccountWithAddress<LocationAccount>> {
        let address = self.address_for(authority, index)?;
        self.fetch_by_address(&address).await
    }

    /// Fetch a location at a known address
    pub async fn fetch_by_address(
        &self,
        address: &Address,
    ) -> Result<AccountWithAddress<LocationAccount>> {
        self.context.fetch("fetchLocation", address).await
    }

    /// Fetch every surviving location under `authority`
    pub async fn list(&self, authority: &Address) -> Result<Vec<AccountWithAddress<LocationAccount>>> {
        let provider = self.provider_address(authority)?;
        let profile: AccountWithAddress<ProviderAccount> =
            self.context.fetch("listLocations", &provider).await?;

        let mut locations = Vec::new();
        for index in 0..profile.data.last_location_id {
            let address = self.address_for(authority, index)?;
            match self.fetch_by_address(&address).await {
                Ok(location) => locations.push(location),
                Err(Error::AccountNotFound(_)) => continue,
                Err(err) => return Err(err),
            }
        }
        Ok(locations)
    }

    /// Watch location `index` under `authority` for state changes
    pub async fn observe<H>(
        &self,
        authority: &Address,
        index: u64,
        handler: H,
    ) -> Result<Cancellation>
    where
        H: Fn(AccountWithAddress<LocationAccount>) + Send + Sync + 'static,
    {
        let address = self.address_for(authority, index)?;
        self.context.observe("observeLocation", address, handler).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::BookingStatus;
    use crate::testing::MockLedger;
    use client_core::config::ClientConfig;
    use quoting::FeeConfig;

    fn authority() -> Address {
        Address::new_from_array([13u8; 32])
    }

    fn service(ledger: Arc<MockLedger>) -> LocationService {
        crate::testing::init_tracing();
        let mut config = ClientConfig::default();
        config.authority = Some(authority());
        LocationService::new(ClientContext::new(ledger, config))
    }

    fn location(idx: u64) -> LocationAccount {
        LocationAccount {
            authority: authority(),
            location_idx: idx,
            price: 2_500,
            oracle_authority: Address::new_from_array([14u8; 32]),
            name: "Station concourse".to_string(),
            description: String::new(),
            status: LocationStatus::Available,
        }
    }

    #[tokio::test]
    async fn test_create_uses_provider_index() {
        let ledger = MockLedger::empty();
        let service = service(ledger.clone());

        let provider = service.provider_address(&authority()).unwrap();
        ledger.put(
            provider,
            &ProviderAccount {
                authority: authority(),
                last_location_id: 2,
                location_count: 2,
            },
        );
        let expected = service.address_for(&authority(), 2).unwrap();
        ledger.put(expected, &location(2));

        let metadata = LocationMetadata {
            name: "Station concourse".to_string(),
            description: "North exit".to_string(),
            price: 2_500,
            oracle_authority: Address::new_from_array([14u8; 32]),
        };
        let created = service.create(metadata, None).await.unwrap();
        assert_eq!(created.address, expected);
        assert_eq!(created.data.location_idx, 2);
    }

    #[tokio::test]
    async fn test_list_walks_provider_indices() {
        let ledger = MockLedger::empty();
        let service = service(ledger.clone());

        let provider = service.provider_address(&authority()).unwrap();
        ledger.put(
            provider,
            &ProviderAccount {
                authority: authority(),
                last_location_id: 2,
                location_count: 2,
            },
        );
        for idx in 0..2u64 {
            let address = service.address_for(&authority(), idx).unwrap();
            ledger.put(address, &location(idx));
        }

        let listed = service.list(&authority()).await.unwrap();
        assert_eq!(listed.len(), 2);
    }

    fn booking(price: u64, campaign: Address, location: Address) -> BookingAccount {
        BookingAccount {
            campaign,
            location,
            advertiser: Address::new_from_array([24u8; 32]),
            provider: authority(),
            oracle_authority: Address::new_from_array([14u8; 32]),
            price,
            status: BookingStatus::Active,
            created_at: 1_700_000_000,
            updated_at: 1_700_000_000,
            settled_amount: 0,
        }
    }

    #[tokio::test]
    async fn test_book_targets_derived_booking_account() {
        let ledger = MockLedger::empty();
        let service = service(ledger.clone());

        let campaign = Address::new_from_array([21u8; 32]);
        let location_address = Address::new_from_array([23u8; 32]);
        let expected = service
            .booking_address(&campaign, &location_address)
            .unwrap();
        ledger.put(expected, &booking(2_500, campaign, location_address));

        let booked = service
            .book(&campaign, &location_address, None)
            .await
            .unwrap();
        assert_eq!(booked.address, expected);
        assert_eq!(booked.data.status, BookingStatus::Active);

        let submitted = ledger.submitted();
        assert_eq!(submitted[0].accounts[0].address, expected);
        assert_eq!(submitted[0].accounts[1].address, campaign);
        assert_eq!(submitted[0].accounts[2].address, location_address);
    }

    #[tokio::test]
    async fn test_settle_booking_submits_the_quoted_gross() {
        let ledger = MockLedger::empty();
        let service = service(ledger.clone());

        let campaign = Address::new_from_array([21u8; 32]);
        let location_address = Address::new_from_array([23u8; 32]);
        let address = service
            .booking_address(&campaign, &location_address)
            .unwrap();
        // Price 500 becomes the cap: delivery is worth 1000, payout is 500
        ledger.put(address, &booking(500, campaign, location_address));

        let options = QuoteOptions {
            fee: FeeConfig {
                fee_bps: Some(1_000),
                ..Default::default()
            },
            ..Default::default()
        };
        let settlement = service
            .settle_booking(
                &campaign,
                &location_address,
                &PricingModel::PerView { price: 10 },
                &MetricInputs {
                    views: Some(100),
                    impressions: None,
                },
                &options,
                None,
            )
            .await
            .unwrap();

        assert!(settlement.quote.capped);
        assert_eq!(settlement.quote.breakdown.gross, 500);
        assert_eq!(settlement.quote.breakdown.fee, 50);
        assert_eq!(settlement.quote.breakdown.net, 450);

        let submitted = ledger.submitted();
        assert_eq!(submitted.len(), 1);
        let payload: BoardInstruction = bincode::deserialize(&submitted[0].data).unwrap();
        assert!(matches!(
            payload,
            BoardInstruction::SettleBooking { amount: 500 }
        ));
    }

    #[tokio::test]
    async fn test_settle_booking_honors_an_explicit_cap() {
        let ledger = MockLedger::empty();
        let service = service(ledger.clone());

        let campaign = Address::new_from_array([21u8; 32]);
        let location_address = Address::new_from_array([23u8; 32]);
        let address = service
            .booking_address(&campaign, &location_address)
            .unwrap();
        ledger.put(address, &booking(500, campaign, location_address));

        let options = QuoteOptions {
            cap_amount: Some(300),
            ..Default::default()
        };
        let settlement = service
            .settle_booking(
                &campaign,
                &location_address,
                &PricingModel::Flat { amount: 1_000 },
                &MetricInputs::default(),
                &options,
                None,
            )
            .await
            .unwrap();
        assert_eq!(settlement.quote.breakdown.gross, 300);
    }

    #[tokio::test]
    async fn test_update_requires_a_change() {
        let ledger = MockLedger::empty();
        let service = service(ledger.clone());

        let err = service
            .update(0, None, None, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(ledger.submitted().is_empty());
    }

    #[test]
    fn test_booking_address_depends_on_both_sides() {
        let ledger = MockLedger::empty();
        let service = service(ledger);

        let campaign = Address::new_from_array([21u8; 32]);
        let other_campaign = Address::new_from_array([22u8; 32]);
        let location = Address::new_from_array([23u8; 32]);

        let first = service.booking_address(&campaign, &location).unwrap();
        let second = service.booking_address(&other_campaign, &location).unwrap();
        assert_ne!(first, second);
    }
}
