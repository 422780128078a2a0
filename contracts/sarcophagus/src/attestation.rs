//! Oracle-attested identity facts.

use soroban_sdk::{contracttype, symbol_short, Address, BytesN, Env, Symbol};

use crate::config::{VaultConfig, SECS_PER_YEAR};
use crate::errors::ContractError;

const AGE: Symbol = symbol_short!("AGE");

const TTL_THRESHOLD: u32 = 5_184_000;
const TTL_EXTEND_TO: u32 = 10_368_000;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AgeAttestation {
    /// Age in whole years at `verified_at`.
    pub age: u32,
    pub verified_at: u64,
    /// Reference to the off-chain proof (e.g. a document hash).
    pub proof_ref: BytesN<32>,
    pub oracle: Address,
}

impl AgeAttestation {
    /// Attested age carried forward to `now`.
    pub fn current_age(&self, now: u64) -> u32 {
        let elapsed_years = now.saturating_sub(self.verified_at) / SECS_PER_YEAR;
        self.age
            .saturating_add(u32::try_from(elapsed_years).unwrap_or(u32::MAX))
    }
}

fn age_key(user: &Address) -> (Symbol, Address) {
    (AGE, user.clone())
}

/// Record (or overwrite) `user`'s age as attested by `oracle` at `now`.
pub fn record_age(
    env: &Env,
    cfg: &VaultConfig,
    oracle: &Address,
    user: &Address,
    age: u32,
    proof_ref: BytesN<32>,
    now: u64,
) -> Result<AgeAttestation, ContractError> {
    if age == 0 || age > cfg.max_age {
        return Err(ContractError::InvalidAge);
    }
    let attestation = AgeAttestation {
        age,
        verified_at: now,
        proof_ref,
        oracle: oracle.clone(),
    };
    let key = age_key(user);
    env.storage().persistent().set(&key, &attestation);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
    Ok(attestation)
}

pub fn load_age(env: &Env, user: &Address) -> Option<AgeAttestation> {
    env.storage().persistent().get(&age_key(user))
}

/// `user`'s attested age at `now`, or `AgeNotVerified`.
pub fn require_age(env: &Env, user: &Address, now: u64) -> Result<u32, ContractError> {
    load_age(env, user)
        .map(|a| a.current_age(now))
        .ok_or(ContractError::AgeNotVerified)
}
