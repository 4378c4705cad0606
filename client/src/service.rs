//! Boundary to the encrypted value service (relayer / KMS gateway).

use std::collections::HashMap;

use async_trait::async_trait;
use confidential_staking_primitives::EncryptedHandle;
use serde::{Deserialize, Serialize};
use sp_core::H160;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("request rejected: {0}")]
    Rejected(String),
    #[error("transport: {0}")]
    Transport(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandleContractPair {
    pub handle: EncryptedHandle,
    pub contract_address: H160,
}

/// Everything the service needs to re-encrypt `handles` to the ephemeral key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecryptionRequest {
    pub handles: Vec<HandleContractPair>,
    pub private_key: String,
    pub public_key: String,
    /// Hex, no `0x`.
    pub signature: String,
    pub contract_addresses: Vec<H160>,
    pub user_address: H160,
    pub start_timestamp: u64,
    pub duration_days: u64,
}

#[async_trait]
pub trait EncryptedValueService: Send + Sync {
    /// False until the service has finished initializing.
    fn is_ready(&self) -> bool;

    fn chain_id(&self) -> u64;

    /// Verifying contract of the EIP-712 consent domain.
    fn decryption_contract(&self) -> H160;

    /// Plaintexts keyed by handle. Handles the service has nothing for may be absent.
    async fn user_decrypt(
        &self,
        request: DecryptionRequest,
    ) -> Result<HashMap<EncryptedHandle, u64>, ServiceError>;
}

pub fn handle_hex(handle: &EncryptedHandle) -> String {
    format!("0x{}", hex::encode(handle.as_bytes()))
}
