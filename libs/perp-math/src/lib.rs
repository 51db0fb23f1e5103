#![no_std]

#[cfg(test)]
extern crate std;

pub mod curve_math;
pub mod decay_math;
pub mod exp_math;
pub mod full_math;
pub mod maturity_math;
pub mod price_math;
pub mod swap_math;

pub use curve_math::*;
pub use decay_math::*;
pub use exp_math::*;
pub use full_math::*;
pub use maturity_math::*;
pub use price_math::*;
pub use swap_math::*;
