//! **pallet-confidential-staking**
//!
//! Holders stake an encrypted amount of a supported token into this pallet's account and
//! later withdraw their whole stake. Stakes and per-token totals are encrypted handles;
//! the pallet tracks them with homomorphic `add`/`sub` and never sees a plaintext.
//!
//! ## Flow
//! 1. The holder grants [`Pallet::account_id`] operator rights on the token
//!    (`pallet-operators`) and encrypts the amount for that account.
//! 2. `stake` pulls the amount through the token ledger's `transfer_from`. Whatever the
//!    ledger reports as moved (an encrypted zero if the balance was short) is added to
//!    both the holder's stake and the token total.
//! 3. `withdraw_all` clears the stake, subtracts it from the total and pays it back with
//!    the ledger's handle `transfer`.
//!
//! After every call, `TotalStaked[asset]` decrypts to the sum of `Stakes[*][asset]`.
//! Totals are publicly decryptable; a stake is decryptable by its holder and this pallet.
//!
//! The supported token set is fixed at genesis.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use alloc::{collections::BTreeSet, vec::Vec};

use confidential_staking_primitives::{
    ConfidentialLedger, EncryptedHandle, EncryptedInput, HomomorphicBackend, InputProof,
};
use frame_support::{pallet_prelude::*, PalletId};
use frame_system::pallet_prelude::*;
use sp_runtime::traits::{AccountIdConversion, MaybeSerializeDeserialize};

pub use pallet::*;

#[cfg(test)]
mod mock;

const LOG_TARGET: &str = "runtime::confidential-staking";

pub trait WeightInfo {
    fn stake() -> Weight;
    fn withdraw_all() -> Weight;
}

impl WeightInfo for () {
    fn stake() -> Weight {
        Weight::from_parts(120_000, 0)
    }
    fn withdraw_all() -> Weight {
        Weight::from_parts(100_000, 0)
    }
}

#[frame_support::pallet]
pub mod pallet {
    use super::*;

    #[pallet::config]
    pub trait Config: frame_system::Config {
        type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

        type AssetId: Parameter + Member + Copy + Ord + MaxEncodedLen + MaybeSerializeDeserialize;

        type Backend: HomomorphicBackend<Self::AccountId>;

        /// Token ledger holding the balances being staked.
        type Ledger: ConfidentialLedger<Self::AccountId, Self::AssetId>;

        /// Derives the staking account: the operator holders authorize and the contract
        /// stake inputs are encrypted for.
        #[pallet::constant]
        type PalletId: Get<PalletId>;

        #[pallet::constant]
        type MaxSupportedTokens: Get<u32>;

        type WeightInfo: WeightInfo;
    }

    #[pallet::pallet]
    pub struct Pallet<T>(_);

    #[pallet::storage]
    pub type SupportedTokens<T: Config> =
        StorageValue<_, BoundedVec<T::AssetId, T::MaxSupportedTokens>, ValueQuery>;

    /// (holder, asset) -> encrypted stake
    #[pallet::storage]
    pub type Stakes<T: Config> = StorageDoubleMap<
        _,
        Blake2_128Concat,
        T::AccountId,
        Blake2_128Concat,
        T::AssetId,
        EncryptedHandle,
        ValueQuery,
    >;

    /// asset -> encrypted sum of all stakes
    #[pallet::storage]
    pub type TotalStaked<T: Config> =
        StorageMap<_, Blake2_128Concat, T::AssetId, EncryptedHandle, ValueQuery>;

    #[pallet::genesis_config]
    #[derive(frame_support::DefaultNoBound)]
    pub struct GenesisConfig<T: Config> {
        pub supported_tokens: Vec<T::AssetId>,
    }

    #[pallet::genesis_build]
    impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
        fn build(&self) {
            let mut seen = BTreeSet::new();
            for token in &self.supported_tokens {
                assert!(seen.insert(*token), "duplicate supported token {token:?}");
            }
            let tokens: BoundedVec<_, T::MaxSupportedTokens> = self
                .supported_tokens
                .clone()
                .try_into()
                .expect("supported tokens exceed MaxSupportedTokens");
            SupportedTokens::<T>::put(tokens);
        }
    }

    #[pallet::event]
    #[pallet::generate_deposit(pub(super) fn deposit_event)]
    pub enum Event<T: Config> {
        Staked {
            who: T::AccountId,
            asset: T::AssetId,
            encrypted_amount: EncryptedHandle,
        },
        Withdrawn {
            who: T::AccountId,
            asset: T::AssetId,
            encrypted_amount: EncryptedHandle,
        },
    }

    #[pallet::error]
    pub enum Error<T> {
        UnsupportedToken,
    }

    #[pallet::call]
    impl<T: Config> Pallet<T> {
        /// Stake the amount in `handle`. The input must be encrypted for
        /// [`Pallet::account_id`] by the caller, and that account must be a live operator
        /// of the caller on `asset`.
        #[pallet::call_index(0)]
        #[pallet::weight(T::WeightInfo::stake())]
        pub fn stake(
            origin: OriginFor<T>,
            asset: T::AssetId,
            handle: EncryptedHandle,
            proof: InputProof,
        ) -> DispatchResult {
            let who = ensure_signed(origin)?;
            ensure!(Self::is_supported(&asset), Error::<T>::UnsupportedToken);

            let staking = Self::account_id();
            let input = EncryptedInput::new(handle, proof);
            let moved = T::Ledger::transfer_from(asset, &staking, &who, &staking, &input)?;

            let stake = T::Backend::add(Stakes::<T>::get(&who, asset), moved)?;
            Stakes::<T>::insert(&who, asset, stake);
            T::Backend::allow(stake, &staking);
            T::Backend::allow(stake, &who);

            Self::update_total(asset, |total| T::Backend::add(total, moved))?;

            log::debug!(target: LOG_TARGET, "{:?} staked on {:?}", who, asset);
            Self::deposit_event(Event::Staked { who, asset, encrypted_amount: moved });
            Ok(())
        }

        /// Withdraw the caller's entire stake of `asset` back to its token balance.
        #[pallet::call_index(1)]
        #[pallet::weight(T::WeightInfo::withdraw_all())]
        pub fn withdraw_all(origin: OriginFor<T>, asset: T::AssetId) -> DispatchResult {
            let who = ensure_signed(origin)?;
            ensure!(Self::is_supported(&asset), Error::<T>::UnsupportedToken);

            let stake = Stakes::<T>::get(&who, asset);
            if stake.is_zero() {
                Self::deposit_event(Event::Withdrawn {
                    who,
                    asset,
                    encrypted_amount: EncryptedHandle::ZERO,
                });
                return Ok(());
            }

            Stakes::<T>::remove(&who, asset);
            Self::update_total(asset, |total| T::Backend::sub(total, stake))?;
            T::Ledger::transfer(asset, &Self::account_id(), &who, stake)?;

            log::debug!(target: LOG_TARGET, "{:?} withdrew stake on {:?}", who, asset);
            Self::deposit_event(Event::Withdrawn { who, asset, encrypted_amount: stake });
            Ok(())
        }
    }

    impl<T: Config> Pallet<T> {
        #[inline]
        pub fn account_id() -> T::AccountId {
            T::PalletId::get().into_account_truncating()
        }

        /// Encrypted stake of `who`; the zero handle if it never staked or fully withdrew.
        pub fn stake_of(who: &T::AccountId, asset: T::AssetId) -> EncryptedHandle {
            Stakes::<T>::get(who, asset)
        }

        pub fn total_staked(asset: T::AssetId) -> EncryptedHandle {
            TotalStaked::<T>::get(asset)
        }

        pub fn supported_tokens() -> Vec<T::AssetId> {
            SupportedTokens::<T>::get().into_inner()
        }

        pub fn is_supported(asset: &T::AssetId) -> bool {
            SupportedTokens::<T>::get().contains(asset)
        }

        fn update_total(
            asset: T::AssetId,
            f: impl FnOnce(EncryptedHandle) -> Result<EncryptedHandle, DispatchError>,
        ) -> DispatchResult {
            let total = f(TotalStaked::<T>::get(asset))?;
            TotalStaked::<T>::insert(asset, total);
            T::Backend::allow(total, &Self::account_id());
            T::Backend::allow_public(total);
            Ok(())
        }
    }
}
