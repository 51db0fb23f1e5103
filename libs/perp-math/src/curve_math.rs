use crate::full_math::{max_u256, mul_div_u256, mul_q128_saturating, q128, u256_max, zero};
use crate::price_math::inverse_ratio;
use perp_types::{Error, PoolState, Reserves};
use soroban_sdk::{Env, U256};

/// Reserve claimed by a side with coefficient `v` at ratio `z`.
///
/// ```text
/// r = v·z              if v·z <= R/2
/// r = R - R²/(4·v·z)   otherwise
/// ```
///
/// The second branch is the asymptote: the side approaches R as z grows and
/// takes all of it once R²/(4·v·z) drops below one unit. Requires
/// total < 2^127.
pub fn reserve_of(env: &Env, v: &U256, z: &U256, total: u128) -> u128 {
    let zero = zero(env);
    if v == &zero || z == &zero || total == 0 {
        return 0;
    }
    let r = U256::from_u128(env, total);

    // v·z <= R/2  <=>  v <= (R << 127) / z
    let limit = r.shl(127).div(z);
    if v <= &limit {
        return v.mul(z).shr(128).to_u128().unwrap_or(total / 2);
    }

    // w = v·z in reserve units, saturating; w >= R/2 here
    let w = max_u256(mul_q128_saturating(env, v, z, &u256_max(env)), U256::from_u32(env, 1));
    let half = total / 2;
    let minuend = r.mul(&r).div(&w).shr(2).to_u128().map_or(half, |m| m.min(half));
    total - minuend
}

/// Coefficient that makes `reserve_of(v, z, total) == r`.
///
/// Saturates instead of failing at the ends of the range: an empty side gets
/// the smallest coefficient (one unit, so it can still be priced later) and a
/// side holding all of `total` gets U256::MAX. None only when the exact
/// coefficient of an interior reserve needs more than 256 bits.
pub fn coefficient_of(env: &Env, r: u128, z: &U256, total: u128) -> Option<U256> {
    let zero = zero(env);
    let one = U256::from_u32(env, 1);
    if z == &zero {
        return None;
    }
    if r == 0 {
        return Some(one);
    }
    if r >= total {
        return Some(u256_max(env));
    }

    let coefficient = if r <= total / 2 {
        U256::from_u128(env, r).shl(128).div(z)
    } else {
        // v·z = R²/(4·(R - r))
        let big_r = U256::from_u128(env, total);
        let gap = U256::from_u128(env, total - r).shl(2);
        let w = big_r.mul(&big_r).div(&gap);
        mul_div_u256(env, &w, &q128(env), z)?
    };
    Some(max_u256(coefficient, one))
}

/// Current (rA, rB, rC) for a stored state at ratio xk
pub fn reserves_of(env: &Env, state: &PoolState, xk: &U256) -> Reserves {
    let yk = inverse_ratio(env, xk);
    let r_a = reserve_of(env, &state.a, xk, state.r);
    // rounding in the asymptotic branch may overshoot by a unit
    let r_b = reserve_of(env, &state.b, &yk, state.r).min(state.r - r_a);
    let r_c = state.r - r_a - r_b;
    Reserves::new(r_a, r_b, r_c)
}

/// Re-derive (a, b) so that the curve reproduces `reserves` at ratio xk.
///
/// A side below one coefficient unit of reserve (z units at ratio z) is
/// rounded up to that unit; the difference is absorbed by rC on the next
/// evaluation since R is stored, not derived.
pub fn coefficients_of(env: &Env, reserves: &Reserves, xk: &U256) -> Result<(U256, U256), Error> {
    let total = reserves.total();
    let yk = inverse_ratio(env, xk);
    let a = coefficient_of(env, reserves.r_a, xk, total).ok_or(Error::State1OverflowA)?;
    let b = coefficient_of(env, reserves.r_b, &yk, total).ok_or(Error::State1OverflowB)?;
    Ok((a, b))
}

/// a·b <= R²/4, the condition for rA + rB <= R at every price
pub fn coefficients_bounded(env: &Env, a: &U256, b: &U256, total: u128) -> bool {
    let r = U256::from_u128(env, total);
    let quarter_r2 = r.mul(&r).shr(2);
    match mul_div_u256(env, a, b, &U256::from_u32(env, 1)) {
        Some(product) => product <= quarter_r2,
        None => false,
    }
}
