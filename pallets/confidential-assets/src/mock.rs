use crate::pallet as pallet_confidential_assets;
use confidential_staking_primitives::{EncryptedHandle, EncryptedInput, HomomorphicBackend};
use coprocessor_mock::MockCoprocessor;
use frame_support::{construct_runtime, derive_impl, parameter_types, traits::ConstU64, PalletId};
use sp_runtime::BuildStorage;

pub type AccountId = u64;
pub type AssetId = u32;
pub const ALICE: AccountId = 1;
pub const BOB: AccountId = 2;
pub const CHARLIE: AccountId = 3;
pub const ASSET: AssetId = 7;
pub const OTHER_ASSET: AssetId = 8;

pub const GENESIS_TIME: u64 = 1_700_000_000;

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

construct_runtime!(
    pub enum Runtime {
        System: frame_system,
        Timestamp: pallet_timestamp,
        Operators: pallet_operators,
        ConfidentialAssets: pallet_confidential_assets,
    }
);

// Build a fresh externalities for each test.
pub fn new_test_ext() -> sp_io::TestExternalities {
    let t = frame_system::GenesisConfig::<Runtime>::default()
        .build_storage()
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

/// Seed `who` with an encrypted balance of `amount`, as a mint would.
pub fn fund(asset: AssetId, who: AccountId, amount: u64) -> EncryptedHandle {
    let handle = Co::encrypt_trivial(amount);
    crate::Balances::<Runtime>::insert(asset, who, handle);
    Co::allow(handle, &who);
    handle
}

/// Plaintext balance, via the coprocessor oracle.
pub fn balance(asset: AssetId, who: AccountId) -> u64 {
    Co::plaintext(ConfidentialAssets::confidential_balance_of(asset, &who))
}

/// `holder` encrypts `value` for `contract`.
pub fn input_for(value: u64, contract: AccountId, holder: AccountId) -> EncryptedInput {
    Co::encrypt(value, &contract, &holder)
}
