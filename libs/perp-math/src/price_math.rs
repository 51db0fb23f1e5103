use crate::full_math::{
    clamp_u256, div_q128_saturating, max_u256, min_u256, mul_q128_saturating, q128,
    u256_max, zero,
};
use perp_types::{Side, Q128_SHIFT, X_MAX_WHOLE, X_MIN_Q128};
use soroban_sdk::{Env, U256};

/// Whether a price increase moves value toward the trader.
///
/// Opening Long, closing Short and closing Neutral all gain from a higher
/// price; every other direction gains from a lower one.
pub fn favored_up(side_in: Side, side_out: Side) -> bool {
    side_out == Side::Long || side_in == Side::Short || side_in == Side::Neutral
}

/// Pick the price least favorable to the trader for this direction
pub fn select_price(spot: &U256, twap: &U256, side_in: Side, side_out: Side) -> U256 {
    if favored_up(side_in, side_out) {
        max_u256(spot.clone(), twap.clone())
    } else {
        min_u256(spot.clone(), twap.clone())
    }
}

/// Smallest xk kept by the curve (2^-128)
pub fn xk_min(env: &Env) -> U256 {
    U256::from_u32(env, 1)
}

/// Largest xk kept by the curve (2^127)
pub fn xk_max(env: &Env) -> U256 {
    U256::from_u32(env, 1).shl(255)
}

/// price / mark in Q128, clamped to [1e-20, 1e20]
pub fn price_ratio(env: &Env, price: &U256, mark: &U256) -> U256 {
    let lo = U256::from_u128(env, X_MIN_Q128);
    let hi = U256::from_u128(env, X_MAX_WHOLE).shl(Q128_SHIFT);
    let x = div_q128_saturating(env, price, mark, &hi);
    clamp_u256(x, &lo, &hi)
}

/// (price / mark)^k in Q128.
///
/// Square-and-multiply with every intermediate clamped into
/// [xk_min, xk_max]. Past either bound the curve is already at its asymptote,
/// so saturating keeps the split at the extreme instead of overflowing.
pub fn leverage_ratio(env: &Env, price: &U256, mark: &U256, k: u32) -> U256 {
    let lo = xk_min(env);
    let hi = xk_max(env);
    let x = price_ratio(env, price, mark);

    let mut result = q128(env);
    let mut base = clamp_u256(x, &lo, &hi);
    let mut exponent = k;
    while exponent > 0 {
        if exponent & 1 == 1 {
            result = clamp_u256(mul_q128_saturating(env, &result, &base, &hi), &lo, &hi);
        }
        exponent >>= 1;
        if exponent > 0 {
            base = clamp_u256(mul_q128_saturating(env, &base, &base, &hi), &lo, &hi);
        }
    }
    result
}

/// 1 / xk in Q128, i.e. floor(2^256 / xk), capped at U256::MAX
pub fn inverse_ratio(env: &Env, xk: &U256) -> U256 {
    let max = u256_max(env);
    let one = U256::from_u32(env, 1);
    if xk <= &one {
        return max;
    }
    let quotient = max.div(xk);
    // floor((MAX + 1) / xk) gains one exactly when xk divides MAX + 1
    if max.rem_euclid(xk) == xk.sub(&one) {
        quotient.add(&one)
    } else {
        quotient
    }
}

/// True when xk sits on either clamp
pub fn is_saturated(env: &Env, xk: &U256) -> bool {
    xk == &xk_min(env) || xk == &xk_max(env) || xk == &zero(env)
}
