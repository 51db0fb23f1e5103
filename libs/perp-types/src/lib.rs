#![no_std]

mod error;
mod interfaces;
mod maturity;
mod pool;
mod side;

pub use error::*;
pub use interfaces::*;
pub use maturity::*;
pub use pool::*;
pub use side::*;

/// Bit offset of the Q128 fixed-point format (1.0 == 2^128)
pub const Q128_SHIFT: u32 = 128;

/// Smallest supply any position side may be left with after a burn
pub const MINIMUM_SUPPLY: u128 = 1000;

/// Reserve floors: interest and premium never decay Long/Short below them,
/// and every side of an opening split must reach them
pub const MINIMUM_RESERVE_A: u128 = 1000;
pub const MINIMUM_RESERVE_B: u128 = 1000;
pub const MINIMUM_RESERVE_C: u128 = 1000;

/// Highest supported leverage exponent
pub const MAX_K: u32 = 64;

/// Total reserve must stay representable as a token amount (i128)
pub const MAX_RESERVE: u128 = (1u128 << 127) - 1;

/// Smallest price/mark ratio the curve distinguishes, Q128 (2^128 / 1e20)
pub const X_MIN_Q128: u128 = 3402823669209384634;

/// Largest price/mark ratio the curve distinguishes, in whole units (1e20)
pub const X_MAX_WHOLE: u128 = 100_000_000_000_000_000_000;

/// Minimum reserve floor for a side
pub fn minimum_reserve(side: Side) -> u128 {
    match side {
        Side::Long => MINIMUM_RESERVE_A,
        Side::Short => MINIMUM_RESERVE_B,
        Side::Neutral => MINIMUM_RESERVE_C,
        Side::Reserve => 0,
    }
}
