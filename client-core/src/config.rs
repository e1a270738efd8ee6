//! Client configuration
//!
//! An explicitly constructed value passed into the client — there is no
//! process-wide mutable singleton.

use crate::types::Address;
use serde::{Deserialize, Serialize};

/// Canonical board program deployment
pub const BOARD_PROGRAM_ID: Address =
    Address::from_base58("915wZsHsUJ7Pdei1XUY8jtdfia7D8t4r9XkhGD3TvrDV");

/// Canonical metrics-oracle program deployment
pub const ORACLE_PROGRAM_ID: Address =
    Address::from_base58("9hpXQKdSM4gJLa37Lb259dNJ5J2d6wA2sy2sAzni5nNF");

/// Confirmation level requested from the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    /// Observed by the node
    Processed,
    /// Voted on by a supermajority
    Confirmed,
    /// Rooted and irreversible
    Finalized,
}

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// RPC endpoint
    pub rpc_url: String,

    /// Websocket endpoint for subscriptions
    pub ws_url: String,

    /// Confirmation level for reads and subscriptions
    pub commitment: Commitment,

    /// Board program id
    pub board_program: Address,

    /// Metrics-oracle program id
    pub oracle_program: Address,

    /// Default signing authority, when the caller does not pass one
    pub authority: Option<Address>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://api.devnet.solana.com".to_string(),
            ws_url: "wss://api.devnet.solana.com".to_string(),
            commitment: Commitment::Confirmed,
            board_program: BOARD_PROGRAM_ID,
            oracle_program: ORACLE_PROGRAM_ID,
            authority: None,
        }
    }
}

impl ClientConfig {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::Error::InvalidArgument(format!("Failed to read config: {}", e)))?;
        let config: ClientConfig = toml::from_str(&content)
            .map_err(|e| crate::Error::InvalidArgument(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Load defaults with environment overrides
    pub fn from_env() -> crate::Result<Self> {
        let mut config = ClientConfig::default();

        if let Ok(url) = std::env::var("ADGRID_RPC_URL") {
            config.rpc_url = url;
        }

        if let Ok(url) = std::env::var("ADGRID_WS_URL") {
            config.ws_url = url;
        }

        if let Ok(authority) = std::env::var("ADGRID_AUTHORITY") {
            config.authority = Some(authority.parse()?);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.commitment, Commitment::Confirmed);
        assert_eq!(config.board_program, BOARD_PROGRAM_ID);
        assert!(config.authority.is_none());
    }

    #[test]
    fn test_program_ids_are_distinct() {
        assert_ne!(BOARD_PROGRAM_ID, ORACLE_PROGRAM_ID);
    }

    #[test]
    fn test_parse_from_toml() {
        let raw = r#"
            rpc_url = "http://localhost:8899"
            ws_url = "ws://localhost:8900"
            commitment = "finalized"
            board_program = [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1]
            oracle_program = [2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2]
        "#;
        let config: ClientConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.commitment, Commitment::Finalized);
        assert_eq!(config.board_program, Address::new_from_array([1u8; 32]));
    }
}
