//! Benchmarking for `pallet-operators`.

use super::*;
use frame_benchmarking::v2::*;
use frame_system::RawOrigin;

#[benchmarks(where T::AssetId: Default)]
mod benchmarks {
    use super::*;

    // set_operator(asset, operator, until), overwriting an existing grant
    #[benchmark]
    fn set_operator() {
        let holder: T::AccountId = whitelisted_caller();
        let operator: T::AccountId = account("operator", 0, 0);
        let asset = T::AssetId::default();
        let until = Pallet::<T>::now() + 86_400;
        Grants::<T>::insert((asset, holder.clone(), operator.clone()), until);

        #[extrinsic_call]
        set_operator(RawOrigin::Signed(holder.clone()), asset, operator.clone(), until + 1);

        assert_eq!(Pallet::<T>::operator_expiry(asset, &holder, &operator), Some(until + 1));
    }

    #[benchmark]
    fn revoke_operator() {
        let holder: T::AccountId = whitelisted_caller();
        let operator: T::AccountId = account("operator", 0, 0);
        let asset = T::AssetId::default();
        Grants::<T>::insert((asset, holder.clone(), operator.clone()), Pallet::<T>::now() + 1);

        #[extrinsic_call]
        revoke_operator(RawOrigin::Signed(holder.clone()), asset, operator.clone());

        assert_eq!(Pallet::<T>::operator_expiry(asset, &holder, &operator), None);
    }

    impl_benchmark_test_suite!(Pallet, crate::mock::new_test_ext(), crate::mock::Runtime);
}
