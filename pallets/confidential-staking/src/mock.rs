use crate::pallet as pallet_confidential_staking;
use confidential_staking_primitives::{EncryptedHandle, EncryptedInput, HomomorphicBackend};
use coprocessor_mock::MockCoprocessor;
use frame_support::{
    assert_ok, construct_runtime, derive_impl, parameter_types,
    traits::{ConstU32, ConstU64},
    PalletId,
};
use sp_runtime::BuildStorage;

pub type AccountId = u64;
pub type AssetId = u32;
pub const ALICE: AccountId = 1;
pub const BOB: AccountId = 2;
pub const CHARLIE: AccountId = 3;

pub const TOKEN_A: AssetId = 1;
pub const TOKEN_B: AssetId = 2;
pub const TOKEN_C: AssetId = 3;
pub const UNSUPPORTED: AssetId = 9;

pub const GENESIS_TIME: u64 = 1_700_000_000;
pub const DAY: u64 = 86_400;

pub type Co = MockCoprocessor<AccountId>;

#[derive_impl(frame_system::config_preludes::TestDefaultConfig)]
impl frame_system::Config for Runtime {
    type Block = frame_system::mocking::MockBlock<Runtime>;
}

impl pallet_timestamp::Config for Runtime {
    type Moment = u64;
    type OnTimestampSet = ();
    type MinimumPeriod = ConstU64<1>;
    type WeightInfo = ();
}

impl pallet_operators::Config for Runtime {
    type RuntimeEvent = RuntimeEvent;
    type AssetId = AssetId;
    type Time = Timestamp;
    type WeightInfo = ();
}

parameter_types! {
    pub const LedgerPalletId: PalletId = PalletId(*b"cnfd/ldg");
    pub const StakingPalletId: PalletId = PalletId(*b"cnfd/stk");
}

impl pallet_confidential_assets::Config for Runtime {
    type RuntimeEvent = RuntimeEvent;
    type AssetId = AssetId;
    type Backend = Co;
    type Operators = Operators;
    type Time = Timestamp;
    type PalletId = LedgerPalletId;
    type WeightInfo = ();
}

impl pallet_confidential_staking::Config for Runtime {
    type RuntimeEvent = RuntimeEvent;
    type AssetId = AssetId;
    type Backend = Co;
    type Ledger = ConfidentialAssets;
    type PalletId = StakingPalletId;
    type MaxSupportedTokens = ConstU32<8>;
    type WeightInfo = ();
}

construct_runtime!(
    pub enum Runtime {
        System: frame_system,
        Timestamp: pallet_timestamp,
        Operators: pallet_operators,
        ConfidentialAssets: pallet_confidential_assets,
        ConfidentialStaking: pallet_confidential_staking,
    }
);

pub fn new_test_ext() -> sp_io::TestExternalities {
    let mut t = frame_system::GenesisConfig::<Runtime>::default()
        .build_storage()
        .unwrap();
    pallet_confidential_staking::GenesisConfig::<Runtime> {
        supported_tokens: vec![TOKEN_A, TOKEN_B, TOKEN_C],
    }
    .assimilate_storage(&mut t)
    .unwrap();
    let mut ext = sp_io::TestExternalities::new(t);
    ext.execute_with(|| {
        System::set_block_number(1);
        set_now(GENESIS_TIME);
    });
    ext
}

pub fn set_now(secs: u64) {
    Timestamp::set_timestamp(secs * 1_000);
}

pub fn staking() -> AccountId {
    ConfidentialStaking::account_id()
}

/// Seed `who` with an encrypted token balance of `amount`.
pub fn fund(asset: AssetId, who: AccountId, amount: u64) {
    let handle = Co::encrypt_trivial(amount);
    pallet_confidential_assets::Balances::<Runtime>::insert(asset, who, handle);
    Co::allow(handle, &who);
}

/// Authorize the staking account on `asset` for one day.
pub fn authorize(who: AccountId, asset: AssetId) {
    let now = pallet_operators::Pallet::<Runtime>::now();
    assert_ok!(Operators::set_operator(
        RuntimeOrigin::signed(who),
        asset,
        staking(),
        now + DAY
    ));
}

/// `who` encrypts `value` for the staking account.
pub fn stake_input(value: u64, who: AccountId) -> EncryptedInput {
    Co::encrypt(value, &staking(), &who)
}

pub fn do_stake(who: AccountId, asset: AssetId, value: u64) {
    let input = stake_input(value, who);
    assert_ok!(ConfidentialStaking::stake(
        RuntimeOrigin::signed(who),
        asset,
        input.handle,
        input.proof
    ));
}

pub fn balance(asset: AssetId, who: AccountId) -> u64 {
    Co::plaintext(ConfidentialAssets::confidential_balance_of(asset, &who))
}

pub fn staked(who: AccountId, asset: AssetId) -> u64 {
    Co::plaintext(ConfidentialStaking::stake_of(&who, asset))
}

pub fn total(asset: AssetId) -> u64 {
    Co::plaintext(ConfidentialStaking::total_staked(asset))
}

/// Handles as stored, for identity comparisons.
pub fn snapshot(who: AccountId, asset: AssetId) -> (EncryptedHandle, EncryptedHandle, EncryptedHandle) {
    (
        ConfidentialAssets::confidential_balance_of(asset, &who),
        ConfidentialStaking::stake_of(&who, asset),
        ConfidentialStaking::total_staked(asset),
    )
}
