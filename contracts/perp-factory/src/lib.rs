#![no_std]

use perp_types::{PoolConfig, Reserves};
use soroban_sdk::{
    contract, contractimpl, contracttype, xdr::ToXdr, Address, BytesN, Env, IntoVal, Symbol, Vec,
    U256,
};

#[contract]
pub struct PerpFactory;

/// Storage keys for Factory contract
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    /// Admin address
    Admin,
    /// Pool WASM hash for deployment
    PoolWasmHash,
    /// Pool id (sha256 of the config) -> pool address
    Pool(BytesN<32>),
    /// Total number of pools created
    PoolCount,
    /// Pool address at index
    PoolAt(u32),
}

// TTL constants
const INSTANCE_TTL_THRESHOLD: u32 = 17280;
const INSTANCE_TTL_EXTEND: u32 = 518400;
const PERSISTENT_TTL_THRESHOLD: u32 = 17280;
const PERSISTENT_TTL_EXTEND: u32 = 518400;

/// Most pools a paginated read returns; keeps well under the per-tx read limit
const MAX_PAGE: u32 = 50;

#[contractimpl]
impl PerpFactory {
    /// Initialize factory with admin and pool WASM hash
    pub fn initialize(env: Env, admin: Address, pool_wasm_hash: BytesN<32>) {
        if env.storage().instance().has(&DataKey::Admin) {
            panic!("Already initialized");
        }

        admin.require_auth();

        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage()
            .instance()
            .set(&DataKey::PoolWasmHash, &pool_wasm_hash);
        env.storage().instance().set(&DataKey::PoolCount, &0u32);

        extend_instance_ttl(&env);
    }

    /// Identifier of the pool this factory would deploy for `config`.
    /// The `factory` field is overwritten with this contract's address first,
    /// so callers may pass any placeholder there.
    pub fn pool_id(env: Env, config: PoolConfig) -> BytesN<32> {
        let config = bind_to_factory(&env, config);
        config_hash(&env, &config)
    }

    /// Deploy and initialize a pool
    ///
    /// # Arguments
    /// * `config` - Pool configuration; `factory` is set to this contract
    /// * `payer` - Funds the opening reserve and receives the initial positions
    /// * `r`, `a`, `b` - Opening reserve and curve coefficients
    ///
    /// # Returns
    /// The pool contract address
    pub fn create_pool(
        env: Env,
        config: PoolConfig,
        payer: Address,
        r: u128,
        a: U256,
        b: U256,
    ) -> Address {
        let config = bind_to_factory(&env, config);
        let id = config_hash(&env, &config);

        let pool_key = DataKey::Pool(id.clone());
        if env.storage().persistent().has(&pool_key) {
            panic!("Pool already exists");
        }

        let pool_wasm_hash: BytesN<32> = env
            .storage()
            .instance()
            .get(&DataKey::PoolWasmHash)
            .expect("Not initialized");

        let pool_count: u32 = env
            .storage()
            .instance()
            .get(&DataKey::PoolCount)
            .unwrap_or(0);

        // The id is unique per config, so it doubles as the deployment salt
        let pool_address = env
            .deployer()
            .with_current_contract(id.clone())
            .deploy_v2(pool_wasm_hash, ());

        let reserves = init_pool(&env, &pool_address, &config, &payer, r, &a, &b);

        env.storage().persistent().set(&pool_key, &pool_address);
        extend_persistent_ttl(&env, &pool_key);

        let pool_at_key = DataKey::PoolAt(pool_count);
        env.storage()
            .persistent()
            .set(&pool_at_key, &pool_address);
        extend_persistent_ttl(&env, &pool_at_key);

        env.storage()
            .instance()
            .set(&DataKey::PoolCount, &(pool_count + 1));

        env.events().publish(
            (Symbol::new(&env, "pool_created"),),
            (id, pool_address.clone(), reserves.r_a, reserves.r_b, reserves.r_c),
        );

        extend_instance_ttl(&env);
        pool_address
    }

    /// Get pool address for a pool id
    pub fn get_pool(env: Env, id: BytesN<32>) -> Option<Address> {
        env.storage().persistent().get(&DataKey::Pool(id))
    }

    /// Get total number of pools created
    pub fn get_pool_count(env: Env) -> u32 {
        extend_instance_ttl(&env);
        env.storage()
            .instance()
            .get(&DataKey::PoolCount)
            .unwrap_or(0)
    }

    /// Get pool address at specific index
    pub fn get_pool_at(env: Env, index: u32) -> Option<Address> {
        env.storage().persistent().get(&DataKey::PoolAt(index))
    }

    /// Get pools with pagination
    /// Returns up to `limit` pools starting from `start_index`, capped at 50
    pub fn get_pools_paginated(env: Env, start_index: u32, limit: u32) -> Vec<Address> {
        let pool_count: u32 = env
            .storage()
            .instance()
            .get(&DataKey::PoolCount)
            .unwrap_or(0);

        let end_index = start_index
            .saturating_add(limit.min(MAX_PAGE))
            .min(pool_count);

        let mut pools: Vec<Address> = Vec::new(&env);
        for i in start_index..end_index {
            if let Some(pool) = env.storage().persistent().get(&DataKey::PoolAt(i)) {
                pools.push_back(pool);
            }
        }
        pools
    }

    /// Get admin address
    pub fn get_admin(env: Env) -> Address {
        extend_instance_ttl(&env);
        env.storage()
            .instance()
            .get(&DataKey::Admin)
            .expect("Not initialized")
    }

    /// Get pool WASM hash
    pub fn get_pool_wasm_hash(env: Env) -> BytesN<32> {
        extend_instance_ttl(&env);
        env.storage()
            .instance()
            .get(&DataKey::PoolWasmHash)
            .expect("Not initialized")
    }
}

fn bind_to_factory(env: &Env, mut config: PoolConfig) -> PoolConfig {
    config.factory = env.current_contract_address();
    config
}

fn config_hash(env: &Env, config: &PoolConfig) -> BytesN<32> {
    let encoded = config.clone().to_xdr(env);
    env.crypto().sha256(&encoded).to_bytes()
}

fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
}

fn extend_persistent_ttl(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
}

// Pool initialization via invoke; a pool error aborts the whole deployment
fn init_pool(
    env: &Env,
    pool_address: &Address,
    config: &PoolConfig,
    payer: &Address,
    r: u128,
    a: &U256,
    b: &U256,
) -> Reserves {
    env.invoke_contract::<Reserves>(
        pool_address,
        &Symbol::new(env, "initialize"),
        (config.clone(), payer.clone(), r, a.clone(), b.clone()).into_val(env),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use perp_types::PoolParams;
    use soroban_sdk::testutils::Address as _;

    fn setup(env: &Env) -> (Address, PerpFactoryClient<'_>) {
        env.mock_all_auths();
        let admin = Address::generate(env);
        let contract_id = env.register(PerpFactory, ());
        let client = PerpFactoryClient::new(env, &contract_id);
        client.initialize(&admin, &BytesN::from_array(env, &[1u8; 32]));
        (admin, client)
    }

    fn config(env: &Env, k: u32) -> PoolConfig {
        let one = U256::from_u32(env, 1).shl(128);
        PoolConfig {
            factory: Address::generate(env),
            reserve_token: Address::generate(env),
            ledger: Address::generate(env),
            oracle: Address::generate(env),
            fee_to: Address::generate(env),
            params: PoolParams {
                mark: U256::from_u32(env, 1500).shl(128),
                k,
                interest_hl: 0,
                premium_hl: 0,
                maturity: 0,
                maturity_vest: 0,
                maturity_rate: one.clone(),
                discount_rate: one.clone(),
                open_rate: one,
                fee_rate: 0,
            },
        }
    }

    // === Initialization Tests ===

    #[test]
    fn test_initialize_factory() {
        let env = Env::default();
        let (admin, client) = setup(&env);

        assert_eq!(client.get_admin(), admin);
        assert_eq!(
            client.get_pool_wasm_hash(),
            BytesN::from_array(&env, &[1u8; 32])
        );
        assert_eq!(client.get_pool_count(), 0);
    }

    #[test]
    #[should_panic(expected = "Already initialized")]
    fn test_initialize_twice_fails() {
        let env = Env::default();
        let (admin, client) = setup(&env);
        client.initialize(&admin, &BytesN::from_array(&env, &[2u8; 32]));
    }

    // === Pool Id Tests ===

    #[test]
    fn test_pool_id_is_deterministic() {
        let env = Env::default();
        let (_, client) = setup(&env);

        let cfg = config(&env, 2);
        assert_eq!(client.pool_id(&cfg), client.pool_id(&cfg));
    }

    #[test]
    fn test_pool_id_ignores_factory_field() {
        let env = Env::default();
        let (_, client) = setup(&env);

        let cfg = config(&env, 2);
        let mut other = cfg.clone();
        other.factory = Address::generate(&env);
        assert_eq!(client.pool_id(&cfg), client.pool_id(&other));
    }

    #[test]
    fn test_pool_id_depends_on_params() {
        let env = Env::default();
        let (_, client) = setup(&env);

        let cfg = config(&env, 2);
        let mut levered = cfg.clone();
        levered.params.k = 3;
        assert_ne!(client.pool_id(&cfg), client.pool_id(&levered));

        let mut other_feed = cfg.clone();
        other_feed.oracle = Address::generate(&env);
        assert_ne!(client.pool_id(&cfg), client.pool_id(&other_feed));
    }

    #[test]
    fn test_pool_id_differs_per_factory() {
        let env = Env::default();
        let (_, first) = setup(&env);
        let (_, second) = setup(&env);

        let cfg = config(&env, 2);
        assert_ne!(first.pool_id(&cfg), second.pool_id(&cfg));
    }

    // === Get Pool Tests ===

    #[test]
    fn test_get_pool_not_exists() {
        let env = Env::default();
        let (_, client) = setup(&env);

        let id = client.pool_id(&config(&env, 2));
        assert!(client.get_pool(&id).is_none());
    }

    #[test]
    fn test_pool_count_and_pagination() {
        let env = Env::default();
        let (_, client) = setup(&env);

        assert_eq!(client.get_pool_count(), 0);
        assert!(client.get_pool_at(&0).is_none());
        assert_eq!(client.get_pools_paginated(&0, &10).len(), 0);
        assert_eq!(client.get_pools_paginated(&u32::MAX, &u32::MAX).len(), 0);
    }

    #[test]
    #[should_panic(expected = "Not initialized")]
    fn test_get_admin_uninitialized() {
        let env = Env::default();
        let contract_id = env.register(PerpFactory, ());
        PerpFactoryClient::new(&env, &contract_id).get_admin();
    }
}
