use perp_types::Q128_SHIFT;
use soroban_sdk::{Env, U256};

/// 1.0 in Q128
pub fn q128(env: &Env) -> U256 {
    U256::from_u32(env, 1).shl(Q128_SHIFT)
}

pub fn zero(env: &Env) -> U256 {
    U256::from_u32(env, 0)
}

/// Largest representable U256
pub fn u256_max(env: &Env) -> U256 {
    U256::from_parts(env, u64::MAX, u64::MAX, u64::MAX, u64::MAX)
}

/// Number of significant bits (0 for zero)
pub fn bit_len(env: &Env, x: &U256) -> u32 {
    let zero = zero(env);
    let mut v = x.clone();
    let mut n = 0u32;
    for step in [128u32, 64, 32, 16, 8, 4, 2, 1] {
        let shifted = v.shr(step);
        if shifted > zero {
            v = shifted;
            n += step;
        }
    }
    if v > zero {
        n + 1
    } else {
        0
    }
}

pub fn min_u256(a: U256, b: U256) -> U256 {
    if a < b {
        a
    } else {
        b
    }
}

pub fn max_u256(a: U256, b: U256) -> U256 {
    if a > b {
        a
    } else {
        b
    }
}

pub fn clamp_u256(x: U256, lo: &U256, hi: &U256) -> U256 {
    if &x < lo {
        lo.clone()
    } else if &x > hi {
        hi.clone()
    } else {
        x
    }
}

/// Multiply and divide with 256-bit intermediate precision (rounds down).
/// None on a zero denominator or a result above u128.
pub fn checked_mul_div(env: &Env, a: u128, b: u128, denominator: u128) -> Option<u128> {
    if denominator == 0 {
        return None;
    }
    let product = U256::from_u128(env, a).mul(&U256::from_u128(env, b));
    product.div(&U256::from_u128(env, denominator)).to_u128()
}

/// floor(x * y / d) for 256-bit operands.
///
/// Exact whenever x * y fits in 256 bits, or when the smaller operand times d
/// does (long division of the larger operand by d). Otherwise the product and
/// the divisor are shifted down by the excess bits, which keeps the relative
/// error near 2^-(bits(d) - excess). Returns None when d is zero or the
/// quotient cannot be represented.
pub fn mul_div_u256(env: &Env, x: &U256, y: &U256, d: &U256) -> Option<U256> {
    let zero = zero(env);
    if d == &zero {
        return None;
    }
    if x == &zero || y == &zero {
        return Some(zero);
    }

    let bx = bit_len(env, x);
    let by = bit_len(env, y);
    if bx + by <= 256 {
        return Some(x.mul(y).div(d));
    }

    let bd = bit_len(env, d);
    let (small, large, bs) = if bx <= by { (x, y, bx) } else { (y, x, by) };
    if bs + bd <= 256 {
        // x·y/d = s·(l/d) + s·(l%d)/d
        let q = large.div(d);
        let rem = large.rem_euclid(d);
        if bs + bit_len(env, &q) > 255 {
            return None;
        }
        return Some(small.mul(&q).add(&small.mul(&rem).div(d)));
    }

    let excess = bx + by - 256;
    if excess >= bd {
        return None;
    }

    let sx = if bx >= by { excess.min(bx - 1) } else { 0 };
    let sy = excess - sx;
    let xs = x.shr(sx);
    let ys = y.shr(sy);
    Some(xs.mul(&ys).div(&d.shr(excess)))
}

/// (x * y) >> 128, saturating at `cap`
pub fn mul_q128_saturating(env: &Env, x: &U256, y: &U256, cap: &U256) -> U256 {
    let zero = zero(env);
    if x == &zero || y == &zero {
        return zero;
    }
    let bx = bit_len(env, x);
    let by = bit_len(env, y);
    if bx + by <= 256 {
        return min_u256(x.mul(y).shr(Q128_SHIFT), cap.clone());
    }

    let excess = bx + by - 256;
    if excess >= Q128_SHIFT {
        return cap.clone();
    }
    let sx = if bx >= by { excess.min(bx - 1) } else { 0 };
    let sy = excess - sx;
    let product = x.shr(sx).mul(&y.shr(sy));
    min_u256(product.shr(Q128_SHIFT - excess), cap.clone())
}

/// (n << 128) / d, saturating at `cap` (also for d == 0)
pub fn div_q128_saturating(env: &Env, n: &U256, d: &U256, cap: &U256) -> U256 {
    let zero = zero(env);
    if d == &zero {
        return cap.clone();
    }
    let bn = bit_len(env, n);
    if bn + Q128_SHIFT <= 256 {
        return min_u256(n.shl(Q128_SHIFT).div(d), cap.clone());
    }

    let excess = bn + Q128_SHIFT - 256;
    let ds = d.shr(excess);
    if ds == zero {
        return cap.clone();
    }
    min_u256(n.shl(Q128_SHIFT - excess).div(&ds), cap.clone())
}

/// amount * factor >> 128 for a Q128 factor in [0, 1].
///
/// Factors above 1.0 are a caller bug; release builds return `amount`
/// unscaled when the result would not fit in u128.
pub fn scale(env: &Env, amount: u128, factor: &U256) -> u128 {
    debug_assert!(factor <= &q128(env), "scale factor above 1.0");
    let scaled = U256::from_u128(env, amount).mul(factor).shr(Q128_SHIFT);
    scaled.to_u128().unwrap_or(amount)
}
