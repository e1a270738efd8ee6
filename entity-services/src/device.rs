//! Device registry and metrics-reporting operations
//!
//! Devices live under the metrics-oracle program. A registry holds at
//! most 256 devices because the device seed index is a single byte;
//! registering past that limit fails at derivation, before any
//! instruction is submitted.

use crate::accounts::{DeviceAccount, DeviceRegistryAccount, DeviceStatus};
use crate::context::ClientContext;
use crate::instruction::{encode, OracleInstruction};
use client_core::seeds::{derive_entity_address, EntityKind};
use client_core::types::{AccountMeta, AccountWithAddress, Address, Instruction};
use client_core::{Error, Result};
use std::sync::Arc;
use subscriptions::Cancellation;
use tracing::{debug, info};

/// Device operations for one registry authority at a time
#[derive(Debug)]
pub struct DeviceService {
    context: Arc<ClientContext>,
}

impl DeviceService {
    /// Build the service over a shared context
    pub fn new(context: Arc<ClientContext>) -> Self {
        Self { context }
    }

    /// Address of the registry owned by `authority`
    pub fn registry_address_for(&self, authority: &Address) -> Result<Address> {
        let (address, _) = derive_entity_address(
            EntityKind::DeviceRegistry,
            &self.context.config.oracle_program,
            authority,
            None,
        )?;
        Ok(address)
    }

    /// Address of device `index` under `authority`
    pub fn address_for(&self, authority: &Address, index: u8) -> Result<Address> {
        let (address, _) = derive_entity_address(
            EntityKind::Device,
            &self.context.config.oracle_program,
            authority,
            Some(index.into()),
        )?;
        Ok(address)
    }

    /// Create the caller's device registry and return its initial state
    pub async fn create_registry(
        &self,
        authority: Option<Address>,
    ) -> Result<AccountWithAddress<DeviceRegistryAccount>> {
        let signer = self.context.resolve_authority(authority)?;
        let registry = self.registry_address_for(&signer)?;

        let instruction = Instruction {
            program_id: self.context.config.oracle_program,
            accounts: vec![
                AccountMeta::writable(registry, false),
                AccountMeta::writable(signer, true),
            ],
            data: encode(&OracleInstruction::CreateDeviceRegistry)?,
        };
        let signature = self
            .context
            .submit("createDeviceRegistry", instruction)
            .await?;
        info!(%registry, %signature, "device registry created");

        self.context.fetch("fetchDeviceRegistry", &registry).await
    }

    /// Register a device at `location` under the caller's registry.
    ///
    /// The new device's index is the registry's `last_device_id`.
    pub async fn register_device(
        &self,
        location: Address,
        oracle_authority: Address,
        authority: Option<Address>,
    ) -> Result<AccountWithAddress<DeviceAccount>> {
        let signer = self.context.resolve_authority(authority)?;
        let registry = self.registry_address_for(&signer)?;
        let state: AccountWithAddress<DeviceRegistryAccount> =
            self.context.fetch("registerDevice", &registry).await?;

        let index = state.data.last_device_id;
        let device = self.address_for(&signer, index)?;
        debug!(%device, index, "registering device");

        let instruction = Instruction {
            program_id: self.context.config.oracle_program,
            accounts: vec![
                AccountMeta::writable(device, false),
                AccountMeta::writable(registry, false),
                AccountMeta::readonly(location, false),
                AccountMeta::writable(signer, true),
            ],
            data: encode(&OracleInstruction::RegisterDevice {
                location,
                oracle_authority,
            })?,
        };
        let signature = self.context.submit("registerDevice", instruction).await?;
        info!(%device, index, %signature, "device registered");

        self.fetch_by_address(&device).await
    }

    /// Record delivered views and impressions for a device.
    ///
    /// Reporting zero for both is rejected locally.
    pub async fn report_metrics(
        &self,
        device_idx: u8,
        views: u64,
        impressions: u64,
        authority: Option<Address>,
    ) -> Result<String> {
        if views == 0 && impressions == 0 {
            return Err(Error::InvalidArgument(
                "metrics report must carry views or impressions".to_string(),
            ));
        }
        self.device_op(
            "reportDeviceMetrics",
            OracleInstruction::ReportDeviceMetrics {
                device_idx,
                views,
                impressions,
            },
            device_idx,
            authority,
        )
        .await
    }

    /// Move a device to another location
    pub async fn update_location(
        &self,
        device_idx: u8,
        location: Address,
        authority: Option<Address>,
    ) -> Result<String> {
        self.device_op(
            "updateDeviceLocation",
            OracleInstruction::UpdateDeviceLocation {
                device_idx,
                location,
            },
            device_idx,
            authority,
        )
        .await
    }

    /// Change the oracle allowed to push metrics through a device
    pub async fn update_oracle(
        &self,
        device_idx: u8,
        oracle_authority: Address,
        authority: Option<Address>,
    ) -> Result<String> {
        self.device_op(
            "updateDeviceOracle",
            OracleInstruction::UpdateDeviceOracle {
                device_idx,
                oracle_authority,
            },
            device_idx,
            authority,
        )
        .await
    }

    /// Change a device's operational state
    pub async fn set_status(
        &self,
        device_idx: u8,
        status: DeviceStatus,
        authority: Option<Address>,
    ) -> Result<String> {
        self.device_op(
            "setDeviceStatus",
            OracleInstruction::SetDeviceStatus { device_idx, status },
            device_idx,
            authority,
        )
        .await
    }

    async fn device_op(
        &self,
        label: &str,
        payload: OracleInstruction,
        device_idx: u8,
        authority: Option<Address>,
    ) -> Result<String> {
        let signer = self.context.resolve_authority(authority)?;
        let registry = self.registry_address_for(&signer)?;
        let device = self.address_for(&signer, device_idx)?;

        let instruction = Instruction {
            program_id: self.context.config.oracle_program,
            accounts: vec![
                AccountMeta::writable(device, false),
                AccountMeta::readonly(registry, false),
                AccountMeta::writable(signer, true),
            ],
            data: encode(&payload)?,
        };
        let signature = self.context.submit(label, instruction).await?;
        info!(%device, label, %signature, "device updated");
        Ok(signature)
    }

    /// Fetch the registry owned by `authority`
    pub async fn fetch_registry(
        &self,
        authority: &Address,
    ) -> Result<AccountWithAddress<DeviceRegistryAccount>> {
        let address = self.registry_address_for(authority)?;
        self.context.fetch("fetchDeviceRegistry", &address).await
    }

    /// Fetch device `index` under `authority`
    pub async fn fetch(
        &self,
        authority: &Address,
        index: u8,
    ) -> Result<AccountWithAddress<DeviceAccount>> {
        let address = self.address_for(authority, index)?;
        self.fetch_by_address(&address).await
    }

    /// Fetch a device at a known address
    pub async fn fetch_by_address(
        &self,
        address: &Address,
    ) -> Result<AccountWithAddress<DeviceAccount>> {
        self.context.fetch("fetchDevice", address).await
    }

    /// Fetch every surviving device under `authority`
    pub async fn list(&self, authority: &Address) -> Result<Vec<AccountWithAddress<DeviceAccount>>> {
        let state = self.fetch_registry(authority).await?;

        let mut devices = Vec::new();
        for index in 0..state.data.last_device_id {
            let address = self.address_for(authority, index)?;
            match self.fetch_by_address(&address).await {
                Ok(device) => devices.push(device),
                Err(Error::AccountNotFound(_)) => continue,
                Err(err) => return Err(err),
            }
        }
        Ok(devices)
    }

    /// Watch device `index` under `authority` for state changes
    pub async fn observe<H>(
        &self,
        authority: &Address,
        index: u8,
        handler: H,
    ) -> Result<Cancellation>
    where
        H: Fn(AccountWithAddress<DeviceAccount>) + Send + Sync + 'static,
    {
        let address = self.address_for(authority, index)?;
        self.context.observe("observeDevice", address, handler).await
    }
}
