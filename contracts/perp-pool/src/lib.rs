#![no_std]

mod invariants;
mod maturity;
mod storage;
mod swap;

#[cfg(any(test, feature = "testutils"))]
pub mod testutils;

use perp_math::{initial_reserves, live_reserves, validate_params};
use perp_types::{
    Error, MaturityRecord, PoolConfig, PoolState, PositionLedgerClient, PriceFeedClient, Reserves,
    Side, SwapParams, SwapResult,
};
use soroban_sdk::{contract, contractimpl, log, token, Address, Env, Symbol, U256};
use storage::{get_config, get_maturity, get_state, is_initialized, set_config, set_state};

#[contract]
pub struct PerpPool;

#[contractimpl]
impl PerpPool {
    /// Initialize the pool with its opening state
    ///
    /// # Arguments
    /// * `config` - Collaborator addresses and pricing parameters
    /// * `payer` - Funds `r` reserve tokens and receives the initial positions
    /// * `r` - Opening total reserve
    /// * `a`, `b` - Opening curve coefficients; must satisfy 4ab <= r²
    ///
    /// # Returns
    /// The opening split; `payer` receives rA, rB and rC position tokens 1:1
    pub fn initialize(
        env: Env,
        config: PoolConfig,
        payer: Address,
        r: u128,
        a: U256,
        b: U256,
    ) -> Result<Reserves, Error> {
        if is_initialized(&env) {
            return Err(Error::AlreadyInitialized);
        }
        validate_params(&env, &config.params)?;

        let prices = PriceFeedClient::new(&env, &config.oracle).fetch();
        let reserves = initial_reserves(&env, &config.params, r, &a, &b, &prices.spot)?;

        payer.require_auth();
        let reserve_token = token::Client::new(&env, &config.reserve_token);
        let amount = i128::try_from(r).map_err(|_| Error::Overflow)?;
        if reserve_token.balance(&payer) < amount {
            return Err(Error::InsufficientPayment);
        }
        reserve_token.transfer(&payer, &env.current_contract_address(), &amount);

        let ledger = PositionLedgerClient::new(&env, &config.ledger);
        for side in [Side::Long, Side::Short, Side::Neutral] {
            ledger.mint(&payer, &side.code(), &reserves.of(side));
        }

        let now = env.ledger().timestamp();
        set_config(&env, &config);
        set_state(
            &env,
            &PoolState {
                r,
                a,
                b,
                last_update: now,
            },
        );

        env.events().publish(
            (Symbol::new(&env, "init"), payer),
            (reserves.r_a, reserves.r_b, reserves.r_c),
        );
        log!(&env, "pool initialized", r, config.params.k);

        Ok(reserves)
    }

    /// Execute a swap between two sides
    ///
    /// # Arguments
    /// * `owner` - Pays `amount_in` and receives the output
    /// * `params` - Side codes, input amount and optional transition helper
    pub fn swap(env: Env, owner: Address, params: SwapParams) -> Result<SwapResult, Error> {
        owner.require_auth();
        swap::execute_swap(&env, &owner, &params, true)
    }

    /// Result `swap` would return right now, without committing anything
    pub fn quote(env: Env, owner: Address, params: SwapParams) -> Result<SwapResult, Error> {
        swap::execute_swap(&env, &owner, &params, false)
    }

    // === View Functions ===

    /// Current split at the spot price, decayed to the current ledger time
    pub fn reserves(env: Env) -> Result<Reserves, Error> {
        let config = get_config(&env)?;
        let state = get_state(&env)?;
        let prices = PriceFeedClient::new(&env, &config.oracle).fetch();
        let now = env.ledger().timestamp();
        Ok(live_reserves(&env, &config.params, &state, &prices.spot, now).reserves)
    }

    /// Get current pool state
    pub fn get_state(env: Env) -> Result<PoolState, Error> {
        get_state(&env)
    }

    /// Get pool configuration
    pub fn get_config(env: Env) -> Result<PoolConfig, Error> {
        get_config(&env)
    }

    /// Vesting record of `owner` on a position side
    pub fn maturity_of(env: Env, owner: Address, side: u32) -> Option<MaturityRecord> {
        get_maturity(&env, &owner, side)
    }
}
