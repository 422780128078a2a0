//! # OBOL Yield Engine
//!
//! Tracks a stake per vault owner that mirrors the value the owner has locked
//! in the inheritance vault, accrues rewards on it continuously and mints the
//! OBOL reward token against a hard supply cap.
//!
//! Only the registered vault contract may move stakes or claim on an owner's
//! behalf. Holders move minted OBOL through the small token surface below.
//!
//! ## Reward sources
//! | Source        | When                        | Amount                                  |
//! |---------------|-----------------------------|-----------------------------------------|
//! | Initial bonus | every deposit notification  | `deposit × initial_bonus_bps / 10 000`  |
//! | Accrual       | claimed through the vault   | see [`accrual`]                         |
//!
//! A bonus that would cross the supply cap is skipped (and an event says so);
//! a claim that would cross it fails with `RewardSupplyExhausted`.
#![no_std]

pub mod accrual;
pub mod events;
pub mod stake;

use accrual::{initial_bonus, YieldConfig};
use stake::StakeRecord;

use soroban_sdk::{
    contract, contracterror, contractimpl, symbol_short, Address, Env, Symbol,
};

// ── Storage keys ──────────────────────────────────────────────────────────────

const ADMIN: Symbol = symbol_short!("ADMIN");
const VAULT: Symbol = symbol_short!("VAULT");
const CONFIG: Symbol = symbol_short!("CONFIG");
const SUPPLY: Symbol = symbol_short!("SUPPLY");
const BALANCE: Symbol = symbol_short!("BAL");

const TTL_THRESHOLD: u32 = 5_184_000;
const TTL_EXTEND_TO: u32 = 10_368_000;

// ── Contract errors ───────────────────────────────────────────────────────────

/// | Range | Meaning          |
/// |-------|------------------|
/// | 1–9   | lifecycle / auth |
/// | 20–29 | not found        |
/// | 30–39 | validation       |
/// | 60–69 | resource         |
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ObolError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    StakeNotFound = 20,
    InvalidAmount = 30,
    InvalidConfig = 31,
    RewardSupplyExhausted = 62,
    NoRewardsToClaim = 63,
    InsufficientBalance = 64,
}

// ── Storage helpers ───────────────────────────────────────────────────────────

fn balance_key(addr: &Address) -> (Symbol, Address) {
    (BALANCE, addr.clone())
}

fn read_balance(env: &Env, addr: &Address) -> i128 {
    env.storage()
        .persistent()
        .get(&balance_key(addr))
        .unwrap_or(0)
}

fn write_balance(env: &Env, addr: &Address, amount: i128) {
    let key = balance_key(addr);
    env.storage().persistent().set(&key, &amount);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

fn read_supply(env: &Env) -> i128 {
    env.storage().instance().get(&SUPPLY).unwrap_or(0)
}

fn load_config(env: &Env) -> Result<YieldConfig, ObolError> {
    env.storage()
        .instance()
        .get(&CONFIG)
        .ok_or(ObolError::NotInitialized)
}

/// Mint `amount` to `to`. The caller has already checked the cap.
fn mint(env: &Env, to: &Address, amount: i128) {
    let balance = read_balance(env, to);
    write_balance(env, to, balance.saturating_add(amount));
    let supply = read_supply(env);
    env.storage()
        .instance()
        .set(&SUPPLY, &supply.saturating_add(amount));
}

// ── Contract ──────────────────────────────────────────────────────────────────

#[contract]
pub struct ObolContract;

#[contractimpl]
impl ObolContract {
    // ── Initialisation ────────────────────────────────────────────────────────

    /// Bind the engine to the vault contract that reports stakes.
    pub fn initialize(
        env: Env,
        admin: Address,
        vault: Address,
        config: YieldConfig,
    ) -> Result<(), ObolError> {
        if env.storage().instance().has(&ADMIN) {
            return Err(ObolError::AlreadyInitialized);
        }
        admin.require_auth();
        if !config.is_valid() {
            return Err(ObolError::InvalidConfig);
        }

        env.storage().instance().set(&ADMIN, &admin);
        env.storage().instance().set(&VAULT, &vault);
        env.storage().instance().set(&CONFIG, &config);
        env.storage().instance().set(&SUPPLY, &0i128);
        Ok(())
    }

    fn require_admin(env: &Env, caller: &Address) -> Result<(), ObolError> {
        let admin: Address = env
            .storage()
            .instance()
            .get(&ADMIN)
            .ok_or(ObolError::NotInitialized)?;
        if *caller != admin {
            return Err(ObolError::Unauthorized);
        }
        Ok(())
    }

    fn require_vault(env: &Env) -> Result<(), ObolError> {
        let vault: Address = env
            .storage()
            .instance()
            .get(&VAULT)
            .ok_or(ObolError::NotInitialized)?;
        vault.require_auth();
        Ok(())
    }

    /// Replace the yield parameters. Takes effect for every second not yet
    /// checkpointed.
    pub fn update_config(env: Env, admin: Address, config: YieldConfig) -> Result<(), ObolError> {
        admin.require_auth();
        Self::require_admin(&env, &admin)?;
        if !config.is_valid() || config.supply_cap < read_supply(&env) {
            return Err(ObolError::InvalidConfig);
        }
        env.storage().instance().set(&CONFIG, &config);
        Ok(())
    }

    pub fn get_config(env: Env) -> Result<YieldConfig, ObolError> {
        load_config(&env)
    }

    pub fn get_vault(env: Env) -> Result<Address, ObolError> {
        env.storage()
            .instance()
            .get(&VAULT)
            .ok_or(ObolError::NotInitialized)
    }

    // ── Vault notifications ───────────────────────────────────────────────────

    /// Record a deposit of `amount` that brought the owner's staked value to
    /// `new_locked`. Returns the bonus minted (0 when skipped at the cap).
    pub fn notify_deposit(
        env: Env,
        owner: Address,
        amount: i128,
        new_locked: i128,
    ) -> Result<i128, ObolError> {
        Self::require_vault(&env)?;
        if amount <= 0 || new_locked < amount {
            return Err(ObolError::InvalidAmount);
        }
        let cfg = load_config(&env)?;
        let now = env.ledger().timestamp();

        let mut record = stake::load(&env, &owner).unwrap_or_else(|| StakeRecord::open(now));
        record.sync_locked(new_locked, now, &cfg);

        let bonus = initial_bonus(amount, &cfg);
        let remaining = cfg.supply_cap.saturating_sub(read_supply(&env));
        let minted = if bonus > 0 && bonus <= remaining {
            record.total_earned = record.total_earned.saturating_add(bonus);
            mint(&env, &owner, bonus);
            events::publish_bonus_minted(&env, owner.clone(), amount, bonus);
            bonus
        } else {
            if bonus > 0 {
                events::publish_bonus_skipped(&env, owner.clone(), bonus, remaining);
            }
            0
        };

        stake::store(&env, &owner, &record);
        events::publish_stake_synced(&env, owner, record.locked_value, record.long_term_holder);
        Ok(minted)
    }

    /// Resynchronise the owner's stake after a withdrawal or distribution.
    pub fn notify_locked(env: Env, owner: Address, new_locked: i128) -> Result<(), ObolError> {
        Self::require_vault(&env)?;
        if new_locked < 0 {
            return Err(ObolError::InvalidAmount);
        }
        let cfg = load_config(&env)?;
        let now = env.ledger().timestamp();

        let mut record = stake::load(&env, &owner).ok_or(ObolError::StakeNotFound)?;
        record.sync_locked(new_locked, now, &cfg);
        stake::store(&env, &owner, &record);
        events::publish_stake_synced(&env, owner, record.locked_value, record.long_term_holder);
        Ok(())
    }

    /// Claim everything pending on `owner`'s stake, minting it to `to`.
    ///
    /// The vault passes the owner as `to` for a living owner's claim, and
    /// itself when folding an estate's rewards into the distributable pool.
    pub fn claim_rewards_for(env: Env, owner: Address, to: Address) -> Result<i128, ObolError> {
        Self::require_vault(&env)?;
        let cfg = load_config(&env)?;
        let now = env.ledger().timestamp();

        let mut record = stake::load(&env, &owner).ok_or(ObolError::NoRewardsToClaim)?;
        record.checkpoint(now, &cfg);
        let amount = record.unclaimed;
        if amount <= 0 {
            return Err(ObolError::NoRewardsToClaim);
        }
        if amount > cfg.supply_cap.saturating_sub(read_supply(&env)) {
            return Err(ObolError::RewardSupplyExhausted);
        }

        record.unclaimed = 0;
        record.last_claim_time = now;
        record.last_accrual_time = now;
        record.total_earned = record.total_earned.saturating_add(amount);
        stake::store(&env, &owner, &record);

        mint(&env, &to, amount);
        events::publish_rewards_claimed(&env, owner, to, amount, record.total_earned);
        Ok(amount)
    }

    // ── Queries ───────────────────────────────────────────────────────────────

    pub fn pending_rewards(env: Env, owner: Address) -> Result<i128, ObolError> {
        let cfg = load_config(&env)?;
        Ok(stake::load(&env, &owner)
            .map(|r| r.pending(env.ledger().timestamp(), &cfg))
            .unwrap_or(0))
    }

    pub fn get_stake(env: Env, owner: Address) -> Option<StakeRecord> {
        stake::load(&env, &owner)
    }

    // ── Token surface ─────────────────────────────────────────────────────────

    pub fn balance(env: Env, id: Address) -> i128 {
        read_balance(&env, &id)
    }

    pub fn transfer(env: Env, from: Address, to: Address, amount: i128) -> Result<(), ObolError> {
        from.require_auth();
        if amount < 0 {
            return Err(ObolError::InvalidAmount);
        }
        let from_balance = read_balance(&env, &from);
        if from_balance < amount {
            return Err(ObolError::InsufficientBalance);
        }
        write_balance(&env, &from, from_balance - amount);
        let to_balance = read_balance(&env, &to);
        write_balance(&env, &to, to_balance.saturating_add(amount));
        events::publish_transfer(&env, from, to, amount);
        Ok(())
    }

    pub fn total_supply(env: Env) -> i128 {
        read_supply(&env)
    }

    pub fn remaining_supply(env: Env) -> Result<i128, ObolError> {
        let cfg = load_config(&env)?;
        Ok(cfg.supply_cap.saturating_sub(read_supply(&env)))
    }

    pub fn decimals(_env: Env) -> u32 {
        7
    }
}
