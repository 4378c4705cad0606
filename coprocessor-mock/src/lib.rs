//! Plaintext-backed [`HomomorphicBackend`] for tests.
//!
//! Every "ciphertext" is a fresh random-looking handle whose plaintext is kept in
//! unhashed storage of the current externalities. Each `TestExternalities` therefore
//! owns an isolated coprocessor, and a rolled-back dispatch also rolls back the
//! ciphertexts it created.
//!
//! Proofs are `blake2_256(handle, contract, submitter)`, which is enough to reject
//! inputs replayed against another contract or submitted by another account.
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use alloc::vec::Vec;
use core::marker::PhantomData;

use confidential_staking_primitives::{
    EncryptedHandle, EncryptedInput, HomomorphicBackend, InputProof,
};
use frame_support::storage::unhashed;
use parity_scale_codec::Encode;
use sp_io::hashing::blake2_256;
use sp_runtime::DispatchError;

const PLAINTEXT_PREFIX: &[u8] = b"MockCoprocessor:pt:";
const ACL_PREFIX: &[u8] = b"MockCoprocessor:acl:";
const PUBLIC_PREFIX: &[u8] = b"MockCoprocessor:pub:";
const NONCE_KEY: &[u8] = b"MockCoprocessor:nonce";

pub const UNKNOWN_HANDLE: DispatchError = DispatchError::Other("unknown handle");

pub struct MockCoprocessor<AccountId>(PhantomData<AccountId>);

fn key(prefix: &[u8], parts: &[&[u8]]) -> Vec<u8> {
    let mut k = prefix.to_vec();
    for p in parts {
        k.extend_from_slice(p);
    }
    k
}

fn plaintext_key(handle: &EncryptedHandle) -> Vec<u8> {
    key(PLAINTEXT_PREFIX, &[handle.as_bytes()])
}

impl<AccountId: Encode> MockCoprocessor<AccountId> {
    /// Client-side `encryptAndProve`: encrypt `value` for `contract`, submitted by `submitter`.
    pub fn encrypt(value: u64, contract: &AccountId, submitter: &AccountId) -> EncryptedInput {
        let handle = Self::store(value);
        let proof: InputProof = Self::binding(&handle, contract, submitter)
            .to_vec()
            .try_into()
            .expect("32 bytes fit in InputProof");
        EncryptedInput::new(handle, proof)
    }

    /// Trivially encrypt `value` with no proof; used to seed balances in tests.
    pub fn encrypt_trivial(value: u64) -> EncryptedHandle {
        Self::store(value)
    }

    /// Test oracle: plaintext behind `handle`.
    pub fn plaintext(handle: EncryptedHandle) -> u64 {
        Self::read(handle).expect("handle was created by this coprocessor")
    }

    /// User decryption as the service would serve it: plaintext only if `who` may see it.
    pub fn decrypt_for(handle: EncryptedHandle, who: &AccountId) -> Option<u64> {
        if handle.is_zero() {
            return Some(0);
        }
        if !<Self as HomomorphicBackend<AccountId>>::is_allowed(handle, who) {
            return None;
        }
        Self::read(handle).ok()
    }

    fn binding(handle: &EncryptedHandle, contract: &AccountId, submitter: &AccountId) -> [u8; 32] {
        blake2_256(&(b"input", handle, contract, submitter).encode())
    }

    fn acl_key(handle: &EncryptedHandle, who: &AccountId) -> Vec<u8> {
        key(ACL_PREFIX, &[handle.as_bytes(), &blake2_256(&who.encode())])
    }

    fn store(value: u64) -> EncryptedHandle {
        let nonce: u64 = unhashed::get_or_default(NONCE_KEY);
        unhashed::put(NONCE_KEY, &nonce.wrapping_add(1));
        let handle = EncryptedHandle::from_raw(blake2_256(&(b"handle", nonce).encode()));
        unhashed::put(&plaintext_key(&handle), &value);
        handle
    }

    fn read(handle: EncryptedHandle) -> Result<u64, DispatchError> {
        if handle.is_zero() {
            return Ok(0);
        }
        unhashed::get(&plaintext_key(&handle)).ok_or(UNKNOWN_HANDLE)
    }
}

impl<AccountId: Encode> HomomorphicBackend<AccountId> for MockCoprocessor<AccountId> {
    fn verify_input(
        input: &EncryptedInput,
        contract: &AccountId,
        submitter: &AccountId,
    ) -> Result<EncryptedHandle, DispatchError> {
        let expected = Self::binding(&input.handle, contract, submitter);
        if input.proof.as_slice() != expected.as_slice() {
            return Err(DispatchError::Other("input proof mismatch"));
        }
        Self::read(input.handle)?;
        Self::allow(input.handle, contract);
        Ok(input.handle)
    }

    fn add(lhs: EncryptedHandle, rhs: EncryptedHandle) -> Result<EncryptedHandle, DispatchError> {
        Ok(Self::store(Self::read(lhs)?.wrapping_add(Self::read(rhs)?)))
    }

    fn sub(lhs: EncryptedHandle, rhs: EncryptedHandle) -> Result<EncryptedHandle, DispatchError> {
        Ok(Self::store(Self::read(lhs)?.wrapping_sub(Self::read(rhs)?)))
    }

    fn le(lhs: EncryptedHandle, rhs: EncryptedHandle) -> Result<EncryptedHandle, DispatchError> {
        Ok(Self::store((Self::read(lhs)? <= Self::read(rhs)?) as u64))
    }

    fn select(
        cond: EncryptedHandle,
        if_true: EncryptedHandle,
        if_false: EncryptedHandle,
    ) -> Result<EncryptedHandle, DispatchError> {
        let picked = if Self::read(cond)? != 0 { if_true } else { if_false };
        Ok(Self::store(Self::read(picked)?))
    }

    fn allow(handle: EncryptedHandle, who: &AccountId) {
        unhashed::put(&Self::acl_key(&handle, who), &true);
    }

    fn allow_public(handle: EncryptedHandle) {
        unhashed::put(&key(PUBLIC_PREFIX, &[handle.as_bytes()]), &true);
    }

    fn is_allowed(handle: EncryptedHandle, who: &AccountId) -> bool {
        unhashed::exists(&key(PUBLIC_PREFIX, &[handle.as_bytes()]))
            || unhashed::exists(&Self::acl_key(&handle, who))
    }
}
