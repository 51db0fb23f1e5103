//! Stand-in collaborators for exercising the pool: a position ledger, a
//! settable price feed and a transition helper with an adjustable bias.

use perp_math::{transition, validate_swap};
use perp_types::{MarketState, PriceData, StateTransition, SwapParams};
use soroban_sdk::{contract, contractimpl, contracttype, panic_with_error, Address, Env, U256};

#[contracttype]
#[derive(Clone)]
enum MockKey {
    Balance(Address, u32),
    Supply(u32),
    Prices,
    Bias,
}

#[contract]
pub struct MockLedger;

#[contractimpl]
impl MockLedger {
    pub fn mint(env: Env, to: Address, side: u32, amount: u128) {
        let key = MockKey::Balance(to, side);
        let balance: u128 = env.storage().persistent().get(&key).unwrap_or(0);
        env.storage().persistent().set(&key, &(balance + amount));
        let supply = Self::total_supply(env.clone(), side);
        env.storage()
            .persistent()
            .set(&MockKey::Supply(side), &(supply + amount));
    }

    pub fn burn(env: Env, from: Address, side: u32, amount: u128) {
        let key = MockKey::Balance(from, side);
        let balance: u128 = env.storage().persistent().get(&key).unwrap_or(0);
        if balance < amount {
            panic!("Insufficient balance");
        }
        env.storage().persistent().set(&key, &(balance - amount));
        let supply = Self::total_supply(env.clone(), side);
        env.storage()
            .persistent()
            .set(&MockKey::Supply(side), &(supply - amount));
    }

    /// Move tokens between holders without touching the pool
    pub fn transfer(env: Env, from: Address, to: Address, side: u32, amount: u128) {
        Self::burn(env.clone(), from, side, amount);
        Self::mint(env, to, side, amount);
    }

    pub fn total_supply(env: Env, side: u32) -> u128 {
        env.storage()
            .persistent()
            .get(&MockKey::Supply(side))
            .unwrap_or(0)
    }

    pub fn balance(env: Env, owner: Address, side: u32) -> u128 {
        env.storage()
            .persistent()
            .get(&MockKey::Balance(owner, side))
            .unwrap_or(0)
    }
}

#[contract]
pub struct MockOracle;

#[contractimpl]
impl MockOracle {
    pub fn set_price(env: Env, spot: U256, twap: U256) {
        env.storage()
            .instance()
            .set(&MockKey::Prices, &PriceData { spot, twap });
    }

    pub fn fetch(env: Env) -> PriceData {
        env.storage()
            .instance()
            .get(&MockKey::Prices)
            .expect("Price not set")
    }
}

/// Proposes the same transition the pool derives, shifted by `bias` units of
/// output so tests can provoke a mismatch.
#[contract]
pub struct MockHelper;

#[contractimpl]
impl MockHelper {
    pub fn set_bias(env: Env, bias: u128) {
        env.storage().instance().set(&MockKey::Bias, &bias);
    }

    pub fn swap_to_state(env: Env, market: MarketState, params: SwapParams) -> StateTransition {
        let (side_in, side_out) = match validate_swap(params.side_in, params.side_out, params.amount_in) {
            Ok(sides) => sides,
            Err(e) => panic_with_error!(&env, e),
        };
        let mut proposed = match transition(&env, &market, side_in, side_out, params.amount_in) {
            Ok(t) => t,
            Err(e) => panic_with_error!(&env, e),
        };
        let bias: u128 = env.storage().instance().get(&MockKey::Bias).unwrap_or(0);
        proposed.amount_out += bias;
        proposed
    }
}
