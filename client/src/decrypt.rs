use std::{
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use confidential_staking_primitives::EncryptedHandle;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use sp_core::H160;
use tracing::{debug, instrument, warn};

use crate::{
    eip712::{Eip712Domain, UserDecryptRequest, DEFAULT_DOMAIN_NAME, DEFAULT_DOMAIN_VERSION},
    keypair::EphemeralKeypair,
    service::{handle_hex, DecryptionRequest, EncryptedValueService, HandleContractPair, ServiceError},
    signer::{ConsentSigner, SignerError},
};

pub const DEFAULT_VALIDITY_DAYS: u64 = 10;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DecryptConfig {
    /// How long a signed consent stays valid.
    pub validity_days: u64,
    pub domain_name: String,
    pub domain_version: String,
}

impl Default for DecryptConfig {
    fn default() -> Self {
        Self {
            validity_days: DEFAULT_VALIDITY_DAYS,
            domain_name: DEFAULT_DOMAIN_NAME.into(),
            domain_version: DEFAULT_DOMAIN_VERSION.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DecryptError {
    #[error("encrypted value service is not ready")]
    ServiceUnavailable,
    #[error("no signer available")]
    SignerUnavailable,
    #[error("no holder identity bound to this session")]
    NotAuthenticated,
    #[error("holder declined to sign the decryption consent")]
    SignatureDeclined,
    #[error(transparent)]
    Signer(SignerError),
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl DecryptError {
    /// True if retrying after fixing a precondition (service up, signer connected,
    /// identity bound, user approval) can succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ServiceUnavailable
                | Self::SignerUnavailable
                | Self::NotAuthenticated
                | Self::SignatureDeclined
        )
    }
}

impl From<SignerError> for DecryptError {
    fn from(e: SignerError) -> Self {
        match e {
            SignerError::Declined => Self::SignatureDeclined,
            other => Self::Signer(other),
        }
    }
}

/// User decryption for one holder session.
pub struct Decryptor<S> {
    service: Arc<S>,
    signer: Option<Arc<dyn ConsentSigner>>,
    identity: Option<H160>,
    config: DecryptConfig,
}

impl<S: EncryptedValueService> Decryptor<S> {
    pub fn new(service: Arc<S>) -> Self {
        Self { service, signer: None, identity: None, config: DecryptConfig::default() }
    }

    pub fn with_signer(mut self, signer: Arc<dyn ConsentSigner>) -> Self {
        self.signer = Some(signer);
        self
    }

    pub fn with_identity(mut self, identity: H160) -> Self {
        self.identity = Some(identity);
        self
    }

    pub fn with_config(mut self, config: DecryptConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &DecryptConfig {
        &self.config
    }

    /// Plaintext behind `handle`, which must be readable by the holder through `contract`.
    #[instrument(skip(self, handle), fields(handle = %handle_hex(&handle)))]
    pub async fn decrypt(
        &self,
        handle: EncryptedHandle,
        contract: H160,
    ) -> Result<u64, DecryptError> {
        if handle.is_zero() {
            debug!("zero handle, nothing to decrypt");
            return Ok(0);
        }
        if !self.service.is_ready() {
            return Err(DecryptError::ServiceUnavailable);
        }
        let signer = self.signer.as_ref().ok_or(DecryptError::SignerUnavailable)?;
        let user_address = self.identity.ok_or(DecryptError::NotAuthenticated)?;

        let keypair = EphemeralKeypair::generate();
        let contract_addresses = vec![contract];
        let consent = UserDecryptRequest {
            public_key: keypair.public_key().to_vec(),
            contract_addresses: contract_addresses.clone(),
            start_timestamp: unix_now(),
            duration_days: self.config.validity_days,
            extra_data: Vec::new(),
        };
        let domain = self.domain();

        let signature = signer.sign_typed_data(&domain, &consent).await.map_err(|e| {
            warn!(error = %e, "consent not signed");
            DecryptError::from(e)
        })?;

        let request = DecryptionRequest {
            handles: vec![HandleContractPair { handle, contract_address: contract }],
            private_key: keypair.private_key_hex(),
            public_key: keypair.public_key_hex(),
            signature: signature.to_hex(),
            contract_addresses,
            user_address,
            start_timestamp: consent.start_timestamp,
            duration_days: consent.duration_days,
        };
        let result = self.service.user_decrypt(request).await?;

        match result.get(&handle) {
            Some(v) => Ok(*v),
            None => {
                debug!("service returned no entry, reading as zero");
                Ok(0)
            }
        }
    }

    /// Decrypt independent `(handle, contract)` pairs concurrently. Fails as a whole if any
    /// request fails; results are in input order.
    pub async fn decrypt_many(
        &self,
        requests: &[(EncryptedHandle, H160)],
    ) -> Result<Vec<u64>, DecryptError> {
        try_join_all(requests.iter().map(|(h, c)| self.decrypt(*h, *c))).await
    }

    fn domain(&self) -> Eip712Domain {
        Eip712Domain {
            name: self.config.domain_name.clone(),
            version: self.config.domain_version.clone(),
            chain_id: self.service.chain_id(),
            verifying_contract: self.service.decryption_contract(),
        }
    }
}

fn unix_now() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or_default()
}
