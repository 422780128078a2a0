//! Versioned vault configuration.
//!
//! The record lives in instance storage. Entry points load it once per call
//! and hand `&VaultConfig` to the component functions that need it.

use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::errors::ContractError;

const CONFIG: Symbol = symbol_short!("CONFIG");
const ASSETS: Symbol = symbol_short!("ASSETS");

pub const SECS_PER_DAY: u64 = 86_400;
pub const SECS_PER_YEAR: u64 = 365 * SECS_PER_DAY;

/// Upper bound accepted for `max_beneficiaries`.
pub const MAX_BENEFICIARIES_LIMIT: u32 = 20;
/// Upper bound accepted for `max_age`.
pub const MAX_AGE_LIMIT: u32 = 150;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VaultConfig {
    /// Smallest deposit (native + stable) accepted in one call.
    pub min_deposit: i128,
    pub rate_limit_window: u64,
    /// Cumulative deposit value allowed per owner inside one window.
    pub rate_limit_max: i128,
    /// Time after vault creation before withdrawals open.
    pub min_lock_period: u64,
    /// Owner activity younger than this blocks death confirmations.
    pub liveness_threshold: u64,
    pub dispute_window: u64,
    pub required_confirmations: u32,
    pub max_beneficiaries: u32,
    pub min_owner_age: u32,
    pub max_age: u32,
    /// Length of one allowance period for escrowed shares.
    pub allowance_period: u64,
    /// Age at which a recipient may draw allowances without a guardian.
    pub min_allowance_age: u32,
    /// Bumped on every `update_config`.
    pub version: u32,
}

impl VaultConfig {
    pub fn default_config() -> Self {
        VaultConfig {
            min_deposit: 100,
            rate_limit_window: SECS_PER_DAY,
            rate_limit_max: 1_000_000_000_000_000,
            min_lock_period: 30 * SECS_PER_DAY,
            liveness_threshold: 90 * SECS_PER_DAY,
            dispute_window: 30 * SECS_PER_DAY,
            required_confirmations: 3,
            max_beneficiaries: 10,
            min_owner_age: 18,
            max_age: 120,
            allowance_period: 30 * SECS_PER_DAY,
            min_allowance_age: 18,
            version: 1,
        }
    }

    pub fn validate(&self) -> Result<(), ContractError> {
        let ok = self.min_deposit > 0
            && self.rate_limit_window > 0
            && self.rate_limit_max >= self.min_deposit
            && self.dispute_window > 0
            && self.required_confirmations > 0
            && (1..=MAX_BENEFICIARIES_LIMIT).contains(&self.max_beneficiaries)
            && self.min_owner_age > 0
            && self.min_owner_age <= self.max_age
            && self.max_age <= MAX_AGE_LIMIT
            && self.min_allowance_age <= self.max_age
            && self.allowance_period > 0;
        if ok {
            Ok(())
        } else {
            Err(ContractError::InvalidConfig)
        }
    }
}

/// Token contracts backing each fungible asset class. Fixed at initialisation.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AssetRegistry {
    pub native: Address,
    pub stable: Address,
    /// The OBOL yield engine, which is also the yield token.
    pub yield_token: Address,
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&CONFIG)
}

pub fn load(env: &Env) -> Result<VaultConfig, ContractError> {
    env.storage()
        .instance()
        .get(&CONFIG)
        .ok_or(ContractError::NotInitialized)
}

pub fn store(env: &Env, config: &VaultConfig) {
    env.storage().instance().set(&CONFIG, config);
}

pub fn load_assets(env: &Env) -> Result<AssetRegistry, ContractError> {
    env.storage()
        .instance()
        .get(&ASSETS)
        .ok_or(ContractError::NotInitialized)
}

pub fn store_assets(env: &Env, assets: &AssetRegistry) {
    env.storage().instance().set(&ASSETS, assets);
}
