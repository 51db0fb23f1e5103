// ============================================================================
// INVARIANTS
// ============================================================================
//
// Properties every committed swap must hold. `check_swap` runs them before
// anything is written; a violation aborts the call with StateIntegrity.
//
// 1. SPLIT: the curve never assigns more than R to Long + Short.
// 2. BOUNDS: R stays below MAX_RESERVE so token amounts fit in i128.
// 3. CONSERVATION: R_after + fee + paid_out == R_before + paid_in.
// 4. FLOORS: the burned side keeps MINIMUM_SUPPLY tokens.
// 5. HELPER: an external transition must equal the re-derived one.
//
// ============================================================================

use perp_math::reserves_of;
use perp_types::{Error, PoolState, StateTransition, MAX_RESERVE, MINIMUM_SUPPLY};
use soroban_sdk::{Env, U256};

/// Property:
///   rA + rB <= R at the committed xk
pub fn split_within_total(env: &Env, state: &PoolState, xk: &U256) -> bool {
    let reserves = reserves_of(env, state, xk);
    reserves.r_a + reserves.r_b <= state.r
}

/// Property:
///   R <= MAX_RESERVE
pub fn reserve_bounded(state: &PoolState) -> bool {
    state.r <= MAX_RESERVE
}

/// Property:
///   after + fee + paid_out == before + paid_in
///
/// Interest and premium only move value between sides; the fee is the one
/// outflow besides the swap itself.
pub fn value_conserved(before: u128, paid_in: u128, after: u128, fee: u128, paid_out: u128) -> bool {
    match (after.checked_add(fee), before.checked_add(paid_in)) {
        (Some(lhs), Some(rhs)) => lhs.checked_add(paid_out) == Some(rhs),
        _ => false,
    }
}

/// Property:
///   supply - burned >= MINIMUM_SUPPLY
pub fn supply_floor_respected(supply: u128, burned: u128) -> bool {
    supply >= burned && supply - burned >= MINIMUM_SUPPLY
}

/// Property:
///   proposed == derived
pub fn transition_matches(derived: &StateTransition, proposed: &StateTransition) -> bool {
    derived == proposed
}

/// Everything a swap checks right before commit
pub struct SwapCheck<'a> {
    pub before: &'a PoolState,
    pub after: &'a PoolState,
    pub xk: &'a U256,
    pub paid_in: u128,
    pub paid_out: u128,
    pub fee: u128,
    /// (supply, burned) of the side paid in, if it is a position side
    pub burned: Option<(u128, u128)>,
}

pub fn check_swap(env: &Env, check: &SwapCheck) -> Result<(), Error> {
    let holds = split_within_total(env, check.after, check.xk)
        && reserve_bounded(check.after)
        && value_conserved(check.before.r, check.paid_in, check.after.r, check.fee, check.paid_out)
        && check
            .burned
            .map_or(true, |(supply, burned)| supply_floor_respected(supply, burned));
    if holds {
        Ok(())
    } else {
        Err(Error::StateIntegrity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use perp_types::Reserves;

    #[test]
    fn test_value_conserved() {
        assert!(value_conserved(100, 10, 105, 5, 0));
        assert!(value_conserved(100, 0, 80, 5, 15));
        assert!(!value_conserved(100, 0, 81, 5, 15));
        assert!(!value_conserved(u128::MAX, 1, 0, 0, 0));
    }

    #[test]
    fn test_supply_floor() {
        assert!(supply_floor_respected(2000, 1000));
        assert!(!supply_floor_respected(2000, 1001));
        assert!(!supply_floor_respected(10, 20));
    }

    #[test]
    fn test_transition_matches() {
        let a = StateTransition {
            reserves: Reserves::new(1, 2, 3),
            amount_out: 4,
        };
        let mut b = a.clone();
        assert!(transition_matches(&a, &b));
        b.amount_out = 5;
        assert!(!transition_matches(&a, &b));
    }

    #[test]
    fn test_split_within_total() {
        let env = Env::default();
        let one = U256::from_u32(&env, 1).shl(128);
        let state = PoolState {
            r: 3000,
            a: U256::from_u32(&env, 1000),
            b: U256::from_u32(&env, 1000),
            last_update: 0,
        };
        assert!(split_within_total(&env, &state, &one));
        assert!(reserve_bounded(&state));
    }
}
