#![no_std]

use perp_types::{PoolConfig, SwapParams, SwapResult};
use soroban_sdk::{contract, contractimpl, contracttype, Address, Env, IntoVal, Symbol, Vec};

#[contract]
pub struct PerpRouter;

/// Storage keys
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Factory,
}

/// One swap of a multi-pool route
#[contracttype]
#[derive(Clone)]
pub struct SwapLeg {
    pub pool: Address,
    pub side_in: u32,
    pub side_out: u32,
    /// Amount paid in; 0 uses the previous leg's output
    pub amount_in: u128,
}

#[contractimpl]
impl PerpRouter {
    /// Initialize router with factory address
    pub fn initialize(env: Env, factory: Address) {
        if env.storage().instance().has(&DataKey::Factory) {
            panic!("Already initialized");
        }
        env.storage().instance().set(&DataKey::Factory, &factory);
    }

    /// Run `legs` in order for `owner` within one transaction.
    /// Any failing leg aborts the whole route.
    ///
    /// # Returns
    /// Output of the last leg, which must reach `amount_out_min`
    pub fn swap_multi(
        env: Env,
        owner: Address,
        legs: Vec<SwapLeg>,
        amount_out_min: u128,
        deadline: u64,
    ) -> u128 {
        owner.require_auth();
        check_deadline(&env, deadline);

        if legs.is_empty() {
            panic!("Invalid path length");
        }

        let factory = get_factory(&env);
        let mut current_amount = 0u128;

        for leg in legs.iter() {
            check_pool(&env, &factory, &leg.pool);

            let amount_in = if leg.amount_in == 0 {
                current_amount
            } else {
                leg.amount_in
            };
            if amount_in == 0 {
                panic!("Invalid leg amount");
            }

            let result = invoke_swap(
                &env,
                &leg.pool,
                &owner,
                SwapParams {
                    side_in: leg.side_in,
                    side_out: leg.side_out,
                    amount_in,
                    helper: None,
                },
            );
            current_amount = result.amount_out;
        }

        if current_amount < amount_out_min {
            panic!("Insufficient output amount");
        }

        current_amount
    }

    /// Get factory address
    pub fn get_factory(env: Env) -> Address {
        get_factory(&env)
    }
}

fn get_factory(env: &Env) -> Address {
    env.storage()
        .instance()
        .get(&DataKey::Factory)
        .expect("Not initialized")
}

fn check_deadline(env: &Env, deadline: u64) {
    let current_time = env.ledger().timestamp();
    if current_time > deadline {
        panic!("Transaction expired");
    }
}

// Only pools deployed by the router's factory are routed through
fn check_pool(env: &Env, factory: &Address, pool: &Address) {
    let config: PoolConfig = env.invoke_contract(
        pool,
        &Symbol::new(env, "get_config"),
        ().into_val(env),
    );
    if &config.factory != factory {
        panic!("Unknown pool");
    }
}

fn invoke_swap(env: &Env, pool: &Address, owner: &Address, params: SwapParams) -> SwapResult {
    env.invoke_contract(
        pool,
        &Symbol::new(env, "swap"),
        (owner.clone(), params).into_val(env),
    )
}
