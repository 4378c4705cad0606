//! Types and traits for confidential staking crates
#![cfg_attr(not(feature = "std"), no_std)]

use frame_support::{pallet_prelude::*, BoundedVec};
use parity_scale_codec::DecodeWithMemTracking;

/// Opaque reference to a ciphertext held by the encrypted value service.
///
/// Handles carry no arithmetic and no ordering. Two handles comparing equal means they
/// reference the same ciphertext; it says nothing about the plaintexts of different
/// handles. All value combination goes through [`HomomorphicBackend`].
#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Encode,
    Decode,
    DecodeWithMemTracking,
    MaxEncodedLen,
    TypeInfo,
    RuntimeDebug,
)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct EncryptedHandle([u8; 32]);

impl EncryptedHandle {
    /// "No encrypted value yet". Reads as plaintext zero and is never sent for decryption.
    pub const ZERO: Self = Self([0u8; 32]);

    pub const fn from_raw(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub const fn to_raw(self) -> [u8; 32] {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Identity check against [`Self::ZERO`]; never a plaintext comparison.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl From<[u8; 32]> for EncryptedHandle {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// Proof blob attesting that a handle encrypts a well-formed value for a
/// (destination contract, submitter) pair.
pub type MaxProofLen = ConstU32<8192>;
pub type InputProof = BoundedVec<u8, MaxProofLen>;

/// A caller-submitted ciphertext together with its validity proof.
#[derive(Clone, PartialEq, Eq, Encode, Decode, TypeInfo, RuntimeDebug)]
pub struct EncryptedInput {
    pub handle: EncryptedHandle,
    pub proof: InputProof,
}

impl EncryptedInput {
    pub fn new(handle: EncryptedHandle, proof: InputProof) -> Self {
        Self { handle, proof }
    }
}

/// Runtime-side boundary to the encrypted value service (the FHE coprocessor).
///
/// Every operand position accepts [`EncryptedHandle::ZERO`] as plaintext zero. Results
/// are fresh handles; callers must not assume anything about their byte values.
pub trait HomomorphicBackend<AccountId> {
    /// Check `input.proof` binds `input.handle` to `contract` and `submitter`.
    /// Returns the handle usable by `contract` from now on.
    fn verify_input(
        input: &EncryptedInput,
        contract: &AccountId,
        submitter: &AccountId,
    ) -> Result<EncryptedHandle, DispatchError>;

    fn add(lhs: EncryptedHandle, rhs: EncryptedHandle) -> Result<EncryptedHandle, DispatchError>;

    fn sub(lhs: EncryptedHandle, rhs: EncryptedHandle) -> Result<EncryptedHandle, DispatchError>;

    /// Encrypted boolean `lhs <= rhs`.
    fn le(lhs: EncryptedHandle, rhs: EncryptedHandle) -> Result<EncryptedHandle, DispatchError>;

    /// Encrypted `if cond { if_true } else { if_false }`.
    fn select(
        cond: EncryptedHandle,
        if_true: EncryptedHandle,
        if_false: EncryptedHandle,
    ) -> Result<EncryptedHandle, DispatchError>;

    /// Persistently allow `who` to use and request decryption of `handle`.
    fn allow(handle: EncryptedHandle, who: &AccountId);

    /// Allow anyone to request decryption of `handle`.
    fn allow_public(handle: EncryptedHandle);

    fn is_allowed(handle: EncryptedHandle, who: &AccountId) -> bool;
}

// Operator

/// Unix timestamp in seconds.
pub type Moment = u64;

pub trait OperatorRegistry<AccountId, AssetId, Moment> {
    /// Return true if `operator` is currently authorized to operate for (`holder`, `asset`) at `now`.
    fn is_operator(holder: &AccountId, asset: &AssetId, operator: &AccountId, now: Moment)
        -> bool;
}

impl<AccountId, AssetId, Moment> OperatorRegistry<AccountId, AssetId, Moment> for () {
    fn is_operator(
        _holder: &AccountId,
        _asset: &AssetId,
        _operator: &AccountId,
        _now: Moment,
    ) -> bool {
        false
    }
}

/// Confidential token ledger as seen by other pallets.
pub trait ConfidentialLedger<AccountId, AssetId> {
    /// Encrypted balance of `who`; the zero handle if `who` never received value.
    fn balance_of(asset: AssetId, who: &AccountId) -> EncryptedHandle;

    /// Move the amount encrypted in `input` from `from` to `to` on behalf of `operator`.
    ///
    /// `input` must have been encrypted for `operator` by `from`. Returns the handle of
    /// the amount actually moved.
    fn transfer_from(
        asset: AssetId,
        operator: &AccountId,
        from: &AccountId,
        to: &AccountId,
        input: &EncryptedInput,
    ) -> Result<EncryptedHandle, DispatchError>;

    /// Move an already-verified handle owned by `from` to `to`.
    /// Returns the handle of the amount actually moved.
    fn transfer(
        asset: AssetId,
        from: &AccountId,
        to: &AccountId,
        amount: EncryptedHandle,
    ) -> Result<EncryptedHandle, DispatchError>;
}
