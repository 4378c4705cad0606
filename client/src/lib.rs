//! # confidential-staking-client
//!
//! Off-chain half of confidential staking. Balances, stakes and totals live on-chain as
//! [`EncryptedHandle`]s; this crate turns a handle back into a plaintext for a holder who
//! is entitled to it, and carries the small helpers a front-end needs around staking.
//!
//! ## User decryption
//!
//! [`Decryptor::decrypt`] runs one request end to end:
//!
//! 1. the zero handle short-circuits to `0` without touching the service;
//! 2. a fresh [`EphemeralKeypair`] is generated for the request;
//! 3. a [`UserDecryptRequest`] binds that key, the contract set and a validity window;
//! 4. the holder's [`ConsentSigner`] signs it as EIP-712 typed data;
//! 5. everything is submitted to the [`EncryptedValueService`];
//! 6. the plaintext for the handle is read from the reply, missing meaning `0`.
//!
//! ```rust,ignore
//! let decryptor = Decryptor::new(service)
//!     .with_signer(Arc::new(LocalSigner::random()))
//!     .with_identity(holder);
//! let stake = decryptor.decrypt(stake_handle, staking_contract).await?;
//! ```
//!
//! ## Helpers
//!
//! - [`operator_expiry`] computes the `until` for an operator grant.
//! - [`parse_amount`] / [`format_amount`] convert between decimal strings and base units.

pub mod amount;
pub mod authorize;
pub mod decrypt;
pub mod eip712;
pub mod keypair;
pub mod service;
pub mod signer;

pub use amount::{format_amount, parse_amount, AmountError};
pub use authorize::{operator_expiry, AuthorizeError, DEFAULT_OPERATOR_DURATION};
pub use confidential_staking_primitives::EncryptedHandle;
pub use decrypt::{DecryptConfig, DecryptError, Decryptor};
pub use eip712::{Eip712Domain, UserDecryptRequest};
pub use keypair::EphemeralKeypair;
pub use service::{DecryptionRequest, EncryptedValueService, HandleContractPair, ServiceError};
pub use signer::{recover_signer, ConsentSignature, ConsentSigner, LocalSigner, SignerError};
pub use sp_core::H160;
