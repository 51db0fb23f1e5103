use crate::exp_math::{exp2_neg, half_life_factor};
use crate::full_math::{checked_mul_div, q128, scale};
use perp_types::{minimum_reserve, Reserves, Side, MINIMUM_RESERVE_A, MINIMUM_RESERVE_B};
use soroban_sdk::{Env, U256};

/// Result of decaying the reserves over an elapsed interval
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DecayOutcome {
    pub reserves: Reserves,
    /// Value removed from rA and rB by interest, before the fee skim
    pub interest: u128,
    /// Value moved from the dominant leveraged side
    pub premium: u128,
    /// Protocol share of the interest; leaves the pool
    pub fee: u128,
}

/// Interest stage: the part of rA and rB above their reserve floors shrinks
/// by 2^(-elapsed/half_life).
///
/// The removed amount goes to rC except for `interest / fee_rate`, which is
/// returned as the fee and taken out of the total.
pub fn apply_interest(
    env: &Env,
    reserves: &Reserves,
    elapsed: u64,
    half_life: u64,
    fee_rate: u32,
) -> (Reserves, u128, u128) {
    if half_life == 0 || elapsed == 0 {
        return (*reserves, 0, 0);
    }
    let factor = half_life_factor(env, elapsed, half_life);
    let r_a = decay_above(env, reserves.r_a, MINIMUM_RESERVE_A, &factor);
    let r_b = decay_above(env, reserves.r_b, MINIMUM_RESERVE_B, &factor);

    let interest = (reserves.r_a - r_a) + (reserves.r_b - r_b);
    let fee = if fee_rate == 0 {
        0
    } else {
        interest / fee_rate as u128
    };
    let r_c = reserves.r_c + (interest - fee);
    (Reserves::new(r_a, r_b, r_c), interest, fee)
}

// Floor plus the decayed excess above it; reserves at or below the floor are kept
fn decay_above(env: &Env, r: u128, floor: u128, factor: &U256) -> u128 {
    if r <= floor {
        return r;
    }
    let excess = r - floor;
    floor + scale(env, excess, factor).min(excess)
}

/// Premium stage: the dominant leveraged side pays the other two.
///
/// With M = max(rA, rB), m = min(rA, rB) and D = M - m, the payment is
/// p = min(D/2, M·(1 - 2^(-elapsed·D/(R·half_life)))), split between m and
/// rC pro rata. All of p goes to m when m + rC is zero. M never pays below
/// its reserve floor.
pub fn apply_premium(env: &Env, reserves: &Reserves, elapsed: u64, half_life: u64) -> (Reserves, u128) {
    let total = reserves.total();
    if half_life == 0 || elapsed == 0 || total == 0 || reserves.r_a == reserves.r_b {
        return (*reserves, 0);
    }
    let long_dominant = reserves.r_a > reserves.r_b;
    let (big, small) = if long_dominant {
        (reserves.r_a, reserves.r_b)
    } else {
        (reserves.r_b, reserves.r_a)
    };
    let gap = big - small;

    let num = U256::from_u128(env, elapsed as u128).mul(&U256::from_u128(env, gap));
    let den = U256::from_u128(env, total).mul(&U256::from_u128(env, half_life as u128));
    let remaining = exp2_neg(env, &num, &den);
    let decayed = scale(env, big, &q128(env).sub(&remaining));
    let big_side = if long_dominant { Side::Long } else { Side::Short };
    let premium = decayed
        .min(gap / 2)
        .min(big.saturating_sub(minimum_reserve(big_side)));
    if premium == 0 {
        return (*reserves, 0);
    }

    let pool = small + reserves.r_c;
    let to_small = if pool == 0 {
        premium
    } else {
        checked_mul_div(env, premium, small, pool).unwrap_or(premium)
    };
    let to_c = premium - to_small;

    let (big, small) = (big - premium, small + to_small);
    let (r_a, r_b) = if long_dominant { (big, small) } else { (small, big) };
    (Reserves::new(r_a, r_b, reserves.r_c + to_c), premium)
}

/// Interest then premium over `elapsed` seconds
pub fn decay(
    env: &Env,
    reserves: &Reserves,
    elapsed: u64,
    interest_hl: u64,
    premium_hl: u64,
    fee_rate: u32,
) -> DecayOutcome {
    let (after_interest, interest, fee) = apply_interest(env, reserves, elapsed, interest_hl, fee_rate);
    let (after_premium, premium) = apply_premium(env, &after_interest, elapsed, premium_hl);
    DecayOutcome {
        reserves: after_premium,
        interest,
        premium,
        fee,
    }
}
