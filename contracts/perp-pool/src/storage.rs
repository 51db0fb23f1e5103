use perp_types::{Error, MaturityRecord, PoolConfig, PoolState};
use soroban_sdk::{contracttype, Address, Env};

// ============================================================================
// Storage layout:
// - Config and State live in Instance storage; every call touches both.
// - One MaturityRecord per (owner, side) in Persistent storage, removed once
//   the owner's balance on that side is fully closed.
// A swap reads at most two records and writes at most two, well within the
// per-transaction entry limits.
// ============================================================================

/// Storage keys for the pool contract
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    /// Pool configuration (Instance storage)
    Config,
    /// Current pool state (Instance storage)
    State,
    /// (owner, side code) -> MaturityRecord (Persistent storage)
    Maturity(Address, u32),
}

// TTL constants
const INSTANCE_TTL_THRESHOLD: u32 = 17280; // ~1 day
const INSTANCE_TTL_EXTEND: u32 = 518400; // ~30 days
const PERSISTENT_TTL_THRESHOLD: u32 = 17280;
const PERSISTENT_TTL_EXTEND: u32 = 518400;

pub fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
}

fn extend_persistent_ttl(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

// === Config ===

pub fn get_config(env: &Env) -> Result<PoolConfig, Error> {
    let config = env
        .storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(Error::NotInitialized)?;
    extend_instance_ttl(env);
    Ok(config)
}

pub fn set_config(env: &Env, config: &PoolConfig) {
    env.storage().instance().set(&DataKey::Config, config);
    extend_instance_ttl(env);
}

// === State ===

pub fn get_state(env: &Env) -> Result<PoolState, Error> {
    let state = env
        .storage()
        .instance()
        .get(&DataKey::State)
        .ok_or(Error::NotInitialized)?;
    extend_instance_ttl(env);
    Ok(state)
}

pub fn set_state(env: &Env, state: &PoolState) {
    env.storage().instance().set(&DataKey::State, state);
    extend_instance_ttl(env);
}

// === Maturity ===

pub fn get_maturity(env: &Env, owner: &Address, side: u32) -> Option<MaturityRecord> {
    let key = DataKey::Maturity(owner.clone(), side);
    env.storage().persistent().get(&key)
}

pub fn set_maturity(env: &Env, owner: &Address, side: u32, record: &MaturityRecord) {
    let key = DataKey::Maturity(owner.clone(), side);
    env.storage().persistent().set(&key, record);
    extend_persistent_ttl(env, &key);
}

pub fn remove_maturity(env: &Env, owner: &Address, side: u32) {
    let key = DataKey::Maturity(owner.clone(), side);
    env.storage().persistent().remove(&key);
}
