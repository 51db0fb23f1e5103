use soroban_sdk::{contracttype, U256};

/// Vesting state of one owner's balance on one side
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MaturityRecord {
    /// Balance-weighted open timestamp
    pub open_time: u64,
    /// Payoff ratio at the start of the vesting window (Q128)
    pub floor: U256,
}
