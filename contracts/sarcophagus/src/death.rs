//! Death confirmation consensus with an owner dispute window.
//!
//! ## States
//! ```text
//!   None ──confirm──▶ Partial (1..k-1) ──confirm (k-th)──▶ Challengeable
//!     ▲                  │                                   │      │
//!     │            owner activity                 challenge  │      │ dispute window
//!     └──────────────────┴───────────────────────────────────┘      ▼ elapses
//!                                                                  Final
//! ```
//! * Each oracle identity counts at most once per owner.
//! * A confirmation is refused while the owner was active within the
//!   liveness threshold.
//! * The owner may challenge once, strictly before
//!   `challenge_start + dispute_window`. A challenge deletes the record.
//! * Status is derived from the stored record and `now`; nothing has to run
//!   when the window elapses.

use soroban_sdk::{contracttype, log, symbol_short, Address, Env, Symbol, Vec};

use crate::config::VaultConfig;
use crate::errors::ContractError;
use crate::vault::VaultRecord;

const DEATH: Symbol = symbol_short!("DEATH");
const CHAL_USED: Symbol = symbol_short!("CHAL_USED");

const TTL_THRESHOLD: u32 = 5_184_000;
const TTL_EXTEND_TO: u32 = 10_368_000;

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DeathStatus {
    None,
    Partial,
    Challengeable,
    Final,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DeathRecord {
    /// Distinct oracles that confirmed, in arrival order.
    pub confirmations: Vec<Address>,
    /// Candidate fixed by the first confirmation.
    pub death_timestamp: u64,
    pub age_at_death: u32,
    /// Instant the threshold was reached; unset while partial.
    pub challenge_start: Option<u64>,
}

impl DeathRecord {
    pub fn status(&self, cfg: &VaultConfig, now: u64) -> DeathStatus {
        match self.window_end(cfg) {
            None => DeathStatus::Partial,
            Some(end) if now < end => DeathStatus::Challengeable,
            Some(_) => DeathStatus::Final,
        }
    }

    pub fn window_end(&self, cfg: &VaultConfig) -> Option<u64> {
        self.challenge_start
            .map(|start| start.saturating_add(cfg.dispute_window))
    }
}

fn death_key(owner: &Address) -> (Symbol, Address) {
    (DEATH, owner.clone())
}

fn chal_key(owner: &Address) -> (Symbol, Address) {
    (CHAL_USED, owner.clone())
}

pub fn load(env: &Env, owner: &Address) -> Option<DeathRecord> {
    env.storage().persistent().get(&death_key(owner))
}

fn store(env: &Env, owner: &Address, record: &DeathRecord) {
    let key = death_key(owner);
    env.storage().persistent().set(&key, record);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn status(env: &Env, cfg: &VaultConfig, owner: &Address, now: u64) -> DeathStatus {
    load(env, owner).map_or(DeathStatus::None, |r| r.status(cfg, now))
}

pub fn challenge_used(env: &Env, owner: &Address) -> bool {
    env.storage().persistent().has(&chal_key(owner))
}

/// Add `oracle`'s confirmation. Marks the vault deceased when the threshold
/// is reached; the caller persists `vault`.
pub fn confirm(
    env: &Env,
    cfg: &VaultConfig,
    vault: &mut VaultRecord,
    oracle: &Address,
    death_timestamp: u64,
    age_at_death: u32,
    now: u64,
) -> Result<DeathStatus, ContractError> {
    if age_at_death == 0 || age_at_death > cfg.max_age {
        return Err(ContractError::InvalidAge);
    }

    let owner = vault.owner.clone();
    let mut record = match load(env, &owner) {
        Some(r) => {
            if r.challenge_start.is_some() {
                return Err(ContractError::DeathAlreadyVerified);
            }
            if r.confirmations.iter().any(|a| a == *oracle) {
                return Err(ContractError::AlreadyConfirmed);
            }
            r
        }
        None => DeathRecord {
            confirmations: Vec::new(env),
            death_timestamp,
            age_at_death,
            challenge_start: None,
        },
    };

    if now < vault.last_activity.saturating_add(cfg.liveness_threshold) {
        return Err(ContractError::StillActive);
    }

    record.confirmations.push_back(oracle.clone());
    let count = record.confirmations.len();
    log!(env, "death confirmation", owner, count);

    if count >= cfg.required_confirmations {
        record.challenge_start = Some(now);
        vault.deceased = true;
        vault.death_timestamp = record.death_timestamp;
        vault.age_at_death = record.age_at_death;
        log!(env, "death threshold reached", owner, now);
    }

    store(env, &owner, &record);
    Ok(record.status(cfg, now))
}

/// Owner's one-time revocation of a pending confirmation. The caller
/// persists `vault`.
pub fn challenge(
    env: &Env,
    cfg: &VaultConfig,
    vault: &mut VaultRecord,
    now: u64,
) -> Result<(), ContractError> {
    let owner = vault.owner.clone();
    let record = load(env, &owner).ok_or(ContractError::NotChallengeable)?;
    match record.status(cfg, now) {
        DeathStatus::Challengeable => {}
        DeathStatus::Final => return Err(ContractError::ChallengePeriodEnded),
        DeathStatus::None | DeathStatus::Partial => return Err(ContractError::NotChallengeable),
    }
    if challenge_used(env, &owner) {
        return Err(ContractError::ChallengeAlreadyUsed);
    }

    env.storage().persistent().remove(&death_key(&owner));
    let used = chal_key(&owner);
    env.storage().persistent().set(&used, &now);
    env.storage()
        .persistent()
        .extend_ttl(&used, TTL_THRESHOLD, TTL_EXTEND_TO);

    vault.deceased = false;
    vault.death_timestamp = 0;
    vault.age_at_death = 0;
    vault.last_activity = now;
    log!(env, "death challenged", owner, now);
    Ok(())
}

/// Drop a partial record after owner activity. Returns whether one existed.
pub fn discard_partial(env: &Env, owner: &Address) -> bool {
    match load(env, owner) {
        Some(r) if r.challenge_start.is_none() => {
            env.storage().persistent().remove(&death_key(owner));
            true
        }
        _ => false,
    }
}

/// Gate for every distribution-affecting call. Returns the instant death
/// became final.
pub fn require_final(
    env: &Env,
    cfg: &VaultConfig,
    owner: &Address,
    now: u64,
) -> Result<u64, ContractError> {
    let record = load(env, owner).ok_or(ContractError::DeathNotVerified)?;
    match record.status(cfg, now) {
        DeathStatus::Final => record.window_end(cfg).ok_or(ContractError::DeathNotVerified),
        DeathStatus::Challengeable => Err(ContractError::InChallengePeriod),
        DeathStatus::None | DeathStatus::Partial => Err(ContractError::DeathNotVerified),
    }
}
