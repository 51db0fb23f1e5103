use soroban_sdk::{contracttype, Address, U256};

use crate::Side;

/// Pricing parameters - immutable after creation
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolParams {
    /// Reference price at the curve's center (Q128)
    pub mark: U256,
    /// Leverage exponent
    pub k: u32,
    /// Interest half-life in seconds (0 = disabled)
    pub interest_hl: u64,
    /// Premium half-life in seconds (0 = disabled)
    pub premium_hl: u64,
    /// Lock period after opening, in seconds
    pub maturity: u64,
    /// Linear vesting window following the lock, in seconds
    pub maturity_vest: u64,
    /// Vesting floor for a fresh position (Q128, <= 1)
    pub maturity_rate: U256,
    /// Floor multiplier applied when cohorts merge (Q128, <= 1)
    pub discount_rate: U256,
    /// Multiplier on value entering Long/Short (Q128, (0, 1])
    pub open_rate: U256,
    /// Divisor of the interest skimmed to the fee sink (0 = no fee)
    pub fee_rate: u32,
}

/// Pool configuration - immutable after creation
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolConfig {
    /// Factory contract address
    pub factory: Address,
    /// Collateral token
    pub reserve_token: Address,
    /// Position ledger contract (mint/burn/supply of A, B, C)
    pub ledger: Address,
    /// Price feed contract
    pub oracle: Address,
    /// Receives the protocol share of interest
    pub fee_to: Address,
    pub params: PoolParams,
}

/// Persisted pool state - stored in Instance storage
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolState {
    /// Total reserve
    pub r: u128,
    /// Long curve coefficient
    pub a: U256,
    /// Short curve coefficient
    pub b: U256,
    /// Ledger timestamp of the last committed swap
    pub last_update: u64,
}

/// Split of the total reserve between the three claims
#[contracttype]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Reserves {
    pub r_a: u128,
    pub r_b: u128,
    pub r_c: u128,
}

impl Reserves {
    pub fn new(r_a: u128, r_b: u128, r_c: u128) -> Self {
        Self { r_a, r_b, r_c }
    }

    pub fn total(&self) -> u128 {
        self.r_a + self.r_b + self.r_c
    }

    /// Reserve backing a position side (0 for the reserve side)
    pub fn of(&self, side: Side) -> u128 {
        match side {
            Side::Long => self.r_a,
            Side::Short => self.r_b,
            Side::Neutral => self.r_c,
            Side::Reserve => 0,
        }
    }

    pub fn of_mut(&mut self, side: Side) -> Option<&mut u128> {
        match side {
            Side::Long => Some(&mut self.r_a),
            Side::Short => Some(&mut self.r_b),
            Side::Neutral => Some(&mut self.r_c),
            Side::Reserve => None,
        }
    }
}

/// Prices reported by the oracle (Q128, same denomination as `mark`)
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PriceData {
    pub spot: U256,
    pub twap: U256,
}

/// Swap request as submitted to the pool
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SwapParams {
    pub side_in: u32,
    pub side_out: u32,
    /// Reserve tokens or position tokens paid in
    pub amount_in: u128,
    /// Optional external transition strategy, cross-checked by the pool
    pub helper: Option<Address>,
}

/// Outcome of a swap
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SwapResult {
    /// Reserve tokens paid out or position tokens minted
    pub amount_out: u128,
    /// Reserve tokens skimmed to the fee sink
    pub fee: u128,
}

// ============================================================================
// SWAP COMPUTATION TYPES
// These separate the market snapshot from the state transition so the
// transition can be supplied by an external helper and re-derived.
// ============================================================================

/// Market snapshot after price selection, curve evaluation and decay
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MarketState {
    /// Selected price (Q128)
    pub price: U256,
    /// (price / mark)^k, clamped (Q128)
    pub xk: U256,
    /// Decayed reserves the swap applies to
    pub reserves: Reserves,
    /// Supply of the side paid in (0 for the reserve side)
    pub supply_in: u128,
    /// Supply of the side paid out (0 for the reserve side)
    pub supply_out: u128,
    /// Vesting multiplier on the close leg (Q128)
    pub maturity_ratio: U256,
    /// Multiplier on value entering Long/Short (Q128)
    pub open_rate: U256,
}

/// Reserves after applying a swap to a market snapshot
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StateTransition {
    pub reserves: Reserves,
    pub amount_out: u128,
}
