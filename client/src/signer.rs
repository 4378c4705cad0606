//! Holder credentials that sign decryption consent.

use async_trait::async_trait;
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use sp_core::{hashing::keccak_256, H160};

use crate::eip712::{Eip712Domain, UserDecryptRequest};

#[derive(Debug, thiserror::Error)]
pub enum SignerError {
    /// The holder refused, or abandoned, the signature prompt.
    #[error("signature request declined")]
    Declined,
    #[error("invalid signing key")]
    InvalidKey,
    #[error("malformed signature")]
    MalformedSignature,
    #[error("signing failed: {0}")]
    Failed(String),
}

/// 65-byte `r || s || v` ECDSA signature with `v` in `{27, 28}`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ConsentSignature(pub [u8; 65]);

impl ConsentSignature {
    /// Hex without `0x`, as the service expects it.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl core::fmt::Debug for ConsentSignature {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "ConsentSignature(0x{})", self.to_hex())
    }
}

/// Long-term credential of a holder, typically a wallet. Signing may wait on the user.
#[async_trait]
pub trait ConsentSigner: Send + Sync {
    fn address(&self) -> H160;

    async fn sign_typed_data(
        &self,
        domain: &Eip712Domain,
        request: &UserDecryptRequest,
    ) -> Result<ConsentSignature, SignerError>;
}

/// In-process secp256k1 signer.
pub struct LocalSigner {
    key: SigningKey,
    address: H160,
}

impl LocalSigner {
    pub fn from_bytes(secret: &[u8; 32]) -> Result<Self, SignerError> {
        let key = SigningKey::from_slice(secret).map_err(|_| SignerError::InvalidKey)?;
        Ok(Self::from_key(key))
    }

    pub fn random() -> Self {
        Self::from_key(SigningKey::random(&mut OsRng))
    }

    fn from_key(key: SigningKey) -> Self {
        let address = address_of(key.verifying_key());
        Self { key, address }
    }

    pub fn sign_digest(&self, digest: &[u8; 32]) -> Result<ConsentSignature, SignerError> {
        let (sig, recid) = self
            .key
            .sign_prehash_recoverable(digest)
            .map_err(|e| SignerError::Failed(e.to_string()))?;
        let mut out = [0u8; 65];
        out[..64].copy_from_slice(&sig.to_bytes());
        out[64] = 27 + recid.to_byte();
        Ok(ConsentSignature(out))
    }
}

#[async_trait]
impl ConsentSigner for LocalSigner {
    fn address(&self) -> H160 {
        self.address
    }

    async fn sign_typed_data(
        &self,
        domain: &Eip712Domain,
        request: &UserDecryptRequest,
    ) -> Result<ConsentSignature, SignerError> {
        self.sign_digest(&request.signing_digest(domain))
    }
}

/// Ethereum-style address of a public key: last 20 bytes of keccak of the uncompressed point.
pub fn address_of(key: &VerifyingKey) -> H160 {
    let point = key.to_encoded_point(false);
    let hash = keccak_256(&point.as_bytes()[1..]);
    H160::from_slice(&hash[12..])
}

/// Address that produced `signature` over `digest`.
pub fn recover_signer(digest: &[u8; 32], signature: &ConsentSignature) -> Result<H160, SignerError> {
    let sig = Signature::from_slice(&signature.0[..64]).map_err(|_| SignerError::MalformedSignature)?;
    let v = signature.0[64];
    let recid = v
        .checked_sub(27)
        .and_then(RecoveryId::from_byte)
        .ok_or(SignerError::MalformedSignature)?;
    let key = VerifyingKey::recover_from_prehash(digest, &sig, recid)
        .map_err(|_| SignerError::MalformedSignature)?;
    Ok(address_of(&key))
}
