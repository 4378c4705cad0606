//! pallet-confidential-assets: encrypted token balances.
//!
//! Balances are [`EncryptedHandle`]s kept per `(asset, account)`; an account that never
//! received value reads as the zero handle. All arithmetic happens in `T::Backend`, so
//! the pallet never learns an amount and never branches on one: a transfer larger than
//! the sender's balance moves an encrypted zero instead of failing.
//!
//! Value moves two ways:
//! - `transfer_from`: an operator (the holder itself, or an account holding a live grant
//!   in `T::Operators`) submits an input encrypted for it by the holder.
//! - `transfer`: a pallet moves a handle it already holds, e.g. staking paying out.
//!
//! Both return the handle of the amount that actually moved.

#![cfg_attr(not(feature = "std"), no_std)]

use confidential_staking_primitives::{
    ConfidentialLedger, EncryptedHandle, EncryptedInput, HomomorphicBackend, InputProof, Moment,
    OperatorRegistry,
};
use frame_support::{pallet_prelude::*, traits::UnixTime, PalletId};
use frame_system::pallet_prelude::*;
use sp_runtime::traits::AccountIdConversion;

pub use pallet::*;

#[cfg(test)]
mod mock;

const LOG_TARGET: &str = "runtime::confidential-assets";

pub trait WeightInfo {
    fn confidential_transfer() -> Weight;
    fn confidential_transfer_from() -> Weight;
}

impl WeightInfo for () {
    fn confidential_transfer() -> Weight {
        Weight::from_parts(50_000, 0)
    }
    fn confidential_transfer_from() -> Weight {
        Weight::from_parts(60_000, 0)
    }
}

#[frame_support::pallet]
pub mod pallet {
    use super::*;

    #[pallet::config]
    pub trait Config: frame_system::Config {
        type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

        type AssetId: Parameter + Member + Copy + Ord + MaxEncodedLen;

        /// Encrypted value service.
        type Backend: HomomorphicBackend<Self::AccountId>;

        type Operators: OperatorRegistry<Self::AccountId, Self::AssetId, Moment>;

        type Time: UnixTime;

        /// The ledger's own account. Inputs to `confidential_transfer` are encrypted for it.
        #[pallet::constant]
        type PalletId: Get<PalletId>;

        type WeightInfo: WeightInfo;
    }

    #[pallet::pallet]
    pub struct Pallet<T>(_);

    #[pallet::storage]
    pub type Balances<T: Config> = StorageDoubleMap<
        _,
        Blake2_128Concat,
        T::AssetId,
        Blake2_128Concat,
        T::AccountId,
        EncryptedHandle,
        ValueQuery,
    >;

    #[pallet::event]
    #[pallet::generate_deposit(pub(super) fn deposit_event)]
    pub enum Event<T: Config> {
        ConfidentialTransfer {
            asset: T::AssetId,
            from: T::AccountId,
            to: T::AccountId,
            encrypted_amount: EncryptedHandle,
        },
    }

    #[pallet::error]
    pub enum Error<T> {
        /// Caller is neither the holder nor a live operator of the holder.
        NotAuthorized,
        /// Input proof does not bind the handle to this operator and holder.
        InvalidProof,
        /// Sender may not use the handle it is trying to move.
        HandleNotAllowed,
    }

    #[pallet::call]
    impl<T: Config> Pallet<T> {
        /// Move the amount in `handle` from the caller to `to`. The input must be
        /// encrypted for [`Pallet::account_id`] by the caller.
        #[pallet::call_index(0)]
        #[pallet::weight(T::WeightInfo::confidential_transfer())]
        pub fn confidential_transfer(
            origin: OriginFor<T>,
            asset: T::AssetId,
            to: T::AccountId,
            handle: EncryptedHandle,
            proof: InputProof,
        ) -> DispatchResult {
            let from = ensure_signed(origin)?;
            let input = EncryptedInput::new(handle, proof);
            let amount = T::Backend::verify_input(&input, &Self::account_id(), &from)
                .map_err(|_| Error::<T>::InvalidProof)?;
            Self::move_balance(asset, &from, &to, amount)?;
            Ok(())
        }

        /// Move `from`'s balance as its operator. The input must be encrypted for the
        /// caller by `from`.
        #[pallet::call_index(1)]
        #[pallet::weight(T::WeightInfo::confidential_transfer_from())]
        pub fn confidential_transfer_from(
            origin: OriginFor<T>,
            asset: T::AssetId,
            from: T::AccountId,
            to: T::AccountId,
            handle: EncryptedHandle,
            proof: InputProof,
        ) -> DispatchResult {
            let operator = ensure_signed(origin)?;
            let input = EncryptedInput::new(handle, proof);
            <Self as ConfidentialLedger<_, _>>::transfer_from(asset, &operator, &from, &to, &input)?;
            Ok(())
        }
    }

    impl<T: Config> Pallet<T> {
        #[inline]
        pub fn account_id() -> T::AccountId {
            T::PalletId::get().into_account_truncating()
        }

        pub fn confidential_balance_of(asset: T::AssetId, who: &T::AccountId) -> EncryptedHandle {
            Balances::<T>::get(asset, who)
        }

        pub fn now() -> Moment {
            T::Time::now().as_secs()
        }

        /// Debit `min(amount, balance)` from `from` and credit it to `to`, where the
        /// min is taken under encryption (over-balance moves zero).
        pub(crate) fn move_balance(
            asset: T::AssetId,
            from: &T::AccountId,
            to: &T::AccountId,
            amount: EncryptedHandle,
        ) -> Result<EncryptedHandle, DispatchError> {
            let from_balance = Balances::<T>::get(asset, from);
            let sufficient = T::Backend::le(amount, from_balance)?;
            let moved = T::Backend::select(sufficient, amount, EncryptedHandle::ZERO)?;

            let from_new = T::Backend::sub(from_balance, moved)?;
            Self::set_balance(asset, from, from_new);
            let to_new = T::Backend::add(Balances::<T>::get(asset, to), moved)?;
            Self::set_balance(asset, to, to_new);

            T::Backend::allow(moved, from);
            T::Backend::allow(moved, to);

            log::debug!(
                target: LOG_TARGET,
                "confidential transfer on {:?}: {:?} -> {:?}",
                asset, from, to,
            );
            Self::deposit_event(Event::ConfidentialTransfer {
                asset,
                from: from.clone(),
                to: to.clone(),
                encrypted_amount: moved,
            });
            Ok(moved)
        }

        fn set_balance(asset: T::AssetId, who: &T::AccountId, handle: EncryptedHandle) {
            Balances::<T>::insert(asset, who, handle);
            T::Backend::allow(handle, who);
        }
    }
}

impl<T: Config> ConfidentialLedger<T::AccountId, T::AssetId> for Pallet<T> {
    fn balance_of(asset: T::AssetId, who: &T::AccountId) -> EncryptedHandle {
        Self::confidential_balance_of(asset, who)
    }

    fn transfer_from(
        asset: T::AssetId,
        operator: &T::AccountId,
        from: &T::AccountId,
        to: &T::AccountId,
        input: &EncryptedInput,
    ) -> Result<EncryptedHandle, DispatchError> {
        let authorized =
            operator == from || T::Operators::is_operator(from, &asset, operator, Self::now());
        ensure!(authorized, Error::<T>::NotAuthorized);

        let amount = T::Backend::verify_input(input, operator, from).map_err(|e| {
            log::debug!(target: LOG_TARGET, "rejected input from {:?}: {:?}", from, e);
            Error::<T>::InvalidProof
        })?;
        Self::move_balance(asset, from, to, amount)
    }

    fn transfer(
        asset: T::AssetId,
        from: &T::AccountId,
        to: &T::AccountId,
        amount: EncryptedHandle,
    ) -> Result<EncryptedHandle, DispatchError> {
        ensure!(T::Backend::is_allowed(amount, from), Error::<T>::HandleNotAllowed);
        Self::move_balance(asset, from, to, amount)
    }
}
