//! Boundaries of the external collaborators the pool drives.

use soroban_sdk::{contractclient, Address, Env};

use crate::{MarketState, PriceData, StateTransition, SwapParams};

/// Spot/TWAP source; the contract address doubles as the oracle descriptor
#[contractclient(name = "PriceFeedClient")]
pub trait PriceFeed {
    fn fetch(env: Env) -> PriceData;
}

/// Token ledger for the Long, Short and Neutral sides.
/// Sides are addressed by their raw codes (SIDE_A, SIDE_B, SIDE_C).
#[contractclient(name = "PositionLedgerClient")]
pub trait PositionLedger {
    fn mint(env: Env, to: Address, side: u32, amount: u128);
    fn burn(env: Env, from: Address, side: u32, amount: u128);
    fn total_supply(env: Env, side: u32) -> u128;
    fn balance(env: Env, owner: Address, side: u32) -> u128;
}

/// Pluggable transition strategy. The pool never trusts its output; it
/// re-derives the transition and rejects any mismatch.
#[contractclient(name = "SwapHelperClient")]
pub trait SwapHelper {
    fn swap_to_state(env: Env, market: MarketState, params: SwapParams) -> StateTransition;
}
