use crate::full_math::{mul_div_u256, q128, zero};
use perp_types::{Error, MaturityRecord, PoolParams, Side};
use soroban_sdk::{Env, U256};

/// Payoff ratio (Q128) of a balance opened at `record.open_time`.
///
/// Zero while locked, then linear from `floor` to 1 across the vesting
/// window, then 1. Balances without a record are fully vested.
pub fn vesting_ratio(env: &Env, record: Option<&MaturityRecord>, now: u64, params: &PoolParams) -> U256 {
    let one = q128(env);
    let record = match record {
        Some(r) => r,
        None => return one,
    };
    let age = now.saturating_sub(record.open_time);
    if age < params.maturity {
        return zero(env);
    }
    let vested = age - params.maturity;
    if params.maturity_vest == 0 || vested >= params.maturity_vest {
        return one;
    }

    let floor = if record.floor > one { one.clone() } else { record.floor.clone() };
    let headroom = one.sub(&floor);
    let gain = mul_div_u256(
        env,
        &headroom,
        &U256::from_u128(env, vested as u128),
        &U256::from_u128(env, params.maturity_vest as u128),
    )
    .unwrap_or(headroom);
    floor.add(&gain)
}

/// Ratio for the close leg; a locked balance is rejected instead of paying 0
pub fn close_ratio(
    env: &Env,
    side: Side,
    record: Option<&MaturityRecord>,
    now: u64,
    params: &PoolParams,
) -> Result<U256, Error> {
    let ratio = vesting_ratio(env, record, now, params);
    if ratio == zero(env) {
        return Err(if side.is_leveraged() {
            Error::InsufficientExpirationD
        } else {
            Error::InsufficientExpirationC
        });
    }
    Ok(ratio)
}

/// Record for a balance opened from nothing at `now`
pub fn fresh_record(now: u64, params: &PoolParams) -> MaturityRecord {
    MaturityRecord {
        open_time: now,
        floor: params.maturity_rate.clone(),
    }
}

/// Record standing in for a balance held without one (initial mint or a
/// ledger transfer): already past its lock and vesting window.
pub fn vested_record(env: &Env, now: u64, params: &PoolParams) -> MaturityRecord {
    MaturityRecord {
        open_time: now.saturating_sub(params.maturity.saturating_add(params.maturity_vest)),
        floor: q128(env),
    }
}

/// Record after opening `added` onto an existing `held` balance.
///
/// The existing balance must have passed its lock. The merged open time is
/// the balance-weighted mean rounded up; the merged floor is the weighted
/// mean of both floors scaled by `discount_rate`.
pub fn merge_record(
    env: &Env,
    existing: Option<&MaturityRecord>,
    held: u128,
    added: u128,
    now: u64,
    params: &PoolParams,
) -> Result<MaturityRecord, Error> {
    if held == 0 {
        return Ok(fresh_record(now, params));
    }
    let vested;
    let existing = match existing {
        Some(r) => r,
        None => {
            vested = vested_record(env, now, params);
            &vested
        }
    };
    if now < existing.open_time.saturating_add(params.maturity) {
        return Err(Error::LocktimeOrder);
    }
    if added == 0 {
        return Ok(existing.clone());
    }

    let held_w = U256::from_u128(env, held);
    let added_w = U256::from_u128(env, added);
    let weight = held_w.add(&added_w);

    let time_sum = U256::from_u128(env, existing.open_time as u128)
        .mul(&held_w)
        .add(&U256::from_u128(env, now as u128).mul(&added_w));
    let one = U256::from_u32(env, 1);
    let open_time = time_sum
        .add(&weight.sub(&one))
        .div(&weight)
        .to_u128()
        .map(|t| t as u64)
        .unwrap_or(now)
        .min(now);

    let floor_sum = existing
        .floor
        .mul(&held_w)
        .add(&params.maturity_rate.mul(&added_w));
    let mean_floor = floor_sum.div(&weight);
    let floor = mul_div_u256(env, &mean_floor, &params.discount_rate, &q128(env)).unwrap_or(mean_floor);

    Ok(MaturityRecord { open_time, floor })
}
