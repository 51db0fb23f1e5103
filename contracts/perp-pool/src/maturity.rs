use crate::storage::{get_maturity, remove_maturity, set_maturity};
use perp_math::{close_ratio, merge_record, q128};
use perp_types::{Error, MaturityRecord, PoolParams, Side};
use soroban_sdk::{Address, Env, U256};

/// Vesting multiplier for `owner` closing `side` at `now`.
/// Opening legs pay in reserve tokens and are never discounted.
pub fn ratio_for_close(env: &Env, params: &PoolParams, owner: &Address, side: Side, now: u64) -> Result<U256, Error> {
    if !side.is_position() {
        return Ok(q128(env));
    }
    let record = get_maturity(env, owner, side.code());
    close_ratio(env, side, record.as_ref(), now, params)
}

/// Record `owner` will hold on `side` after `minted` more tokens.
/// Fails with LocktimeOrder when the current balance is still locked.
pub fn record_after_open(
    env: &Env,
    params: &PoolParams,
    owner: &Address,
    side: Side,
    held: u128,
    minted: u128,
    now: u64,
) -> Result<MaturityRecord, Error> {
    let existing = get_maturity(env, owner, side.code());
    merge_record(env, existing.as_ref(), held, minted, now, params)
}

pub fn commit_open(env: &Env, owner: &Address, side: Side, record: &MaturityRecord) {
    set_maturity(env, owner, side.code(), record);
}

/// Drop the record once nothing is left to vest
pub fn commit_close(env: &Env, owner: &Address, side: Side, remaining: u128) {
    if remaining == 0 {
        remove_maturity(env, owner, side.code());
    }
}
