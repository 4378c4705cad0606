//! **pallet-operators**
//!
//! Holder-issued, time-bounded operator grants. A grant is keyed by
//! `(asset, holder, operator)` and carries only an expiry in unix seconds; there is no
//! allowance amount. While `expiry > now` the operator may move any amount of the
//! holder's balance of `asset` through the ledger's `transfer_from` path.
//!
//! - `set_operator` creates or overwrites a grant. The expiry must be strictly in the
//!   future, so re-granting is how holders renew.
//! - `revoke_operator` removes a grant before it lapses.
//! - Other pallets consult grants through [`OperatorRegistry`].

#![cfg_attr(not(feature = "std"), no_std)]

pub use confidential_staking_primitives::Moment;
use confidential_staking_primitives::OperatorRegistry;
use frame_support::{pallet_prelude::*, traits::UnixTime};
use frame_system::pallet_prelude::*;

pub use pallet::*;

#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;
#[cfg(test)]
mod mock;

const LOG_TARGET: &str = "runtime::operators";

pub trait WeightInfo {
    fn set_operator() -> Weight;
    fn revoke_operator() -> Weight;
}

impl WeightInfo for () {
    fn set_operator() -> Weight {
        Weight::from_parts(20_000, 0)
    }
    fn revoke_operator() -> Weight {
        Weight::from_parts(20_000, 0)
    }
}

#[frame_support::pallet]
pub mod pallet {
    use super::*;

    #[pallet::config]
    pub trait Config: frame_system::Config {
        type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

        type AssetId: Parameter + Member + Copy + Ord + MaxEncodedLen;

        /// Wall-clock source for expiry checks.
        type Time: UnixTime;

        type WeightInfo: WeightInfo;
    }

    #[pallet::pallet]
    pub struct Pallet<T>(_);

    /// (asset, holder, operator) -> expiry
    #[pallet::storage]
    pub type Grants<T: Config> = StorageNMap<
        _,
        (
            NMapKey<Blake2_128Concat, T::AssetId>,
            NMapKey<Blake2_128Concat, T::AccountId>,
            NMapKey<Blake2_128Concat, T::AccountId>,
        ),
        Moment,
        OptionQuery,
    >;

    #[pallet::event]
    #[pallet::generate_deposit(pub(super) fn deposit_event)]
    pub enum Event<T: Config> {
        OperatorSet {
            asset: T::AssetId,
            holder: T::AccountId,
            operator: T::AccountId,
            until: Moment,
        },
        OperatorRevoked {
            asset: T::AssetId,
            holder: T::AccountId,
            operator: T::AccountId,
        },
    }

    #[pallet::error]
    pub enum Error<T> {
        /// Expiry is not strictly in the future.
        InvalidExpiry,
        /// No grant exists for this (asset, holder, operator).
        NoSuchGrant,
    }

    #[pallet::call]
    impl<T: Config> Pallet<T> {
        /// Let `operator` move the caller's `asset` balance until `until` (unix seconds).
        /// Overwrites any previous grant for the same operator.
        #[pallet::call_index(0)]
        #[pallet::weight(T::WeightInfo::set_operator())]
        pub fn set_operator(
            origin: OriginFor<T>,
            asset: T::AssetId,
            operator: T::AccountId,
            until: Moment,
        ) -> DispatchResult {
            let holder = ensure_signed(origin)?;
            let now = Self::now();
            ensure!(until > now, Error::<T>::InvalidExpiry);

            Grants::<T>::insert((asset, holder.clone(), operator.clone()), until);
            log::debug!(
                target: LOG_TARGET,
                "operator {:?} granted on {:?} by {:?} until {} (now {})",
                operator, asset, holder, until, now,
            );

            Self::deposit_event(Event::OperatorSet { asset, holder, operator, until });
            Ok(())
        }

        #[pallet::call_index(1)]
        #[pallet::weight(T::WeightInfo::revoke_operator())]
        pub fn revoke_operator(
            origin: OriginFor<T>,
            asset: T::AssetId,
            operator: T::AccountId,
        ) -> DispatchResult {
            let holder = ensure_signed(origin)?;
            let key = (asset, holder.clone(), operator.clone());
            ensure!(Grants::<T>::contains_key(key.clone()), Error::<T>::NoSuchGrant);
            Grants::<T>::remove(key);

            Self::deposit_event(Event::OperatorRevoked { asset, holder, operator });
            Ok(())
        }
    }

    impl<T: Config> Pallet<T> {
        pub fn now() -> Moment {
            T::Time::now().as_secs()
        }

        /// Stored expiry, live or not.
        pub fn operator_expiry(
            asset: T::AssetId,
            holder: &T::AccountId,
            operator: &T::AccountId,
        ) -> Option<Moment> {
            Grants::<T>::get((asset, holder.clone(), operator.clone()))
        }
    }
}

impl<T: Config> OperatorRegistry<T::AccountId, T::AssetId, Moment> for Pallet<T> {
    fn is_operator(
        holder: &T::AccountId,
        asset: &T::AssetId,
        operator: &T::AccountId,
        now: Moment,
    ) -> bool {
        Self::operator_expiry(*asset, holder, operator).is_some_and(|until| until > now)
    }
}
