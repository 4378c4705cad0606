use crate::pallet as pallet_operators;
use frame_support::{construct_runtime, derive_impl, traits::ConstU64};
use sp_runtime::BuildStorage;

pub type AccountId = u64;
pub type AssetId = u32;
pub const ALICE: AccountId = 1;
pub const BOB: AccountId = 2;
pub const STAKING: AccountId = 99;
pub const ASSET: AssetId = 7;
pub const OTHER_ASSET: AssetId = 8;

/// Wall clock at genesis, in seconds.
pub const GENESIS_TIME: u64 = 1_700_000_000;

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

construct_runtime!(
    pub enum Runtime {
        System: frame_system,
        Timestamp: pallet_timestamp,
        Operators: pallet_operators,
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

/// Move the wall clock to `secs` (unix seconds).
pub fn set_now(secs: u64) {
    Timestamp::set_timestamp(secs * 1_000);
}
