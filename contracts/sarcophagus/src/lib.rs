//! # Sarcophagus Inheritance Vault
//!
//! An owner locks fungible value (and optionally non-fungible items) and
//! names beneficiaries. Once a quorum of independent oracles confirms the
//! owner's death and the dispute window has passed without a challenge,
//! each beneficiary pulls their share.
//!
//! ## Roles
//! | Role        | May call                                                    |
//! |-------------|-------------------------------------------------------------|
//! | Admin       | configuration, roles, pause, collection allow-list          |
//! | Oracle      | age / death / milestone / condition attestations            |
//! | Owner       | vault creation, deposits, withdrawals, assets, challenge    |
//! | Beneficiary | inheritance, allowance and milestone claims (or guardian)   |
//!
//! ## Lifecycle
//! ```text
//! verify_age ─▶ create_vault ─▶ deposit / lock_asset / ping ...
//!                                   │
//!                confirm_death × k ─┤─▶ challenge_death (once, inside window)
//!                                   ▼
//!                           dispute window elapses
//!                                   ▼
//!            claim_inheritance ─▶ claim_monthly_allowance / claim_milestone
//! ```
//! The staked value (native + stable) is mirrored into the OBOL yield engine
//! on every change. The first claim after death is final folds the owner's
//! pending OBOL into the estate and freezes the stake.
#![no_std]
#![allow(clippy::too_many_arguments)]

pub mod assets;
pub mod attestation;
pub mod config;
pub mod death;
pub mod distribution;
pub mod errors;
pub mod events;
pub mod locker;
pub mod vault;
pub mod vesting;
pub mod yield_client;

#[cfg(any(test, feature = "testutils"))]
pub mod testutils;

pub use assets::{AssetAmounts, AssetClass};
pub use attestation::AgeAttestation;
pub use config::{AssetRegistry, VaultConfig};
pub use death::{DeathRecord, DeathStatus};
pub use errors::ContractError;
pub use locker::{AssetKey, LockedAsset};
pub use vault::{BeneficiaryEntry, BeneficiaryInput, VaultRecord};
pub use vesting::{Escrow, Milestone, Vesting, VestingSchedule};

use common::{pausable, rate_limit, roles, whitelist, ReentrancyGuard, Role};
use soroban_sdk::{contract, contractimpl, symbol_short, Address, BytesN, Env, Vec};

use yield_client::ObolClient;

#[contract]
pub struct SarcophagusContract;

#[contractimpl]
impl SarcophagusContract {
    // ── Initialisation ────────────────────────────────────────────────────────

    /// Set the first admin, the token registry and the configuration.
    pub fn initialize(
        env: Env,
        admin: Address,
        assets: AssetRegistry,
        config: VaultConfig,
    ) -> Result<(), ContractError> {
        if config::is_initialized(&env) {
            return Err(ContractError::AlreadyInitialized);
        }
        admin.require_auth();
        config.validate()?;

        let mut cfg = config;
        cfg.version = 1;
        config::store(&env, &cfg);
        config::store_assets(&env, &assets);
        roles::grant_role(&env, Role::Admin, &admin);
        events::admin_action(&env, &admin, symbol_short!("INIT"));
        Ok(())
    }

    // ── Internal guards ───────────────────────────────────────────────────────

    fn require_admin(env: &Env, caller: &Address) -> Result<(), ContractError> {
        caller.require_auth();
        if !config::is_initialized(env) {
            return Err(ContractError::NotInitialized);
        }
        roles::require_role(env, Role::Admin, caller)?;
        Ok(())
    }

    fn require_oracle(env: &Env, caller: &Address) -> Result<(), ContractError> {
        caller.require_auth();
        pausable::require_not_paused(env)?;
        roles::require_role(env, Role::Oracle, caller)?;
        Ok(())
    }

    /// Authenticates `owner`, checks the pause switch and takes the estate lock.
    fn enter_owner(env: &Env, owner: &Address) -> Result<ReentrancyGuard, ContractError> {
        owner.require_auth();
        pausable::require_not_paused(env)?;
        Ok(ReentrancyGuard::enter(env, owner)?)
    }

    /// Record owner activity. A partial death record does not survive it.
    fn touch(env: &Env, record: &mut VaultRecord, now: u64) -> bool {
        record.last_activity = now;
        death::discard_partial(env, &record.owner)
    }

    // ── Administration ────────────────────────────────────────────────────────

    /// Replace the configuration. Returns the new version.
    pub fn update_config(env: Env, admin: Address, config: VaultConfig) -> Result<u32, ContractError> {
        Self::require_admin(&env, &admin)?;
        config.validate()?;
        let current = config::load(&env)?;
        let mut next = config;
        next.version = current.version.saturating_add(1);
        config::store(&env, &next);
        events::admin_action(&env, &admin, symbol_short!("CFG_UPD"));
        Ok(next.version)
    }

    pub fn grant_role(
        env: Env,
        admin: Address,
        role: Role,
        account: Address,
    ) -> Result<(), ContractError> {
        Self::require_admin(&env, &admin)?;
        roles::grant_role(&env, role, &account);
        events::admin_action(&env, &admin, symbol_short!("ROLE_ADD"));
        Ok(())
    }

    /// Revoke `role` from `account`. An admin cannot drop their own admin role.
    pub fn revoke_role(
        env: Env,
        admin: Address,
        role: Role,
        account: Address,
    ) -> Result<(), ContractError> {
        Self::require_admin(&env, &admin)?;
        if role == Role::Admin && account == admin {
            return Err(ContractError::InvalidAddress);
        }
        roles::revoke_role(&env, role, &account);
        events::admin_action(&env, &admin, symbol_short!("ROLE_DEL"));
        Ok(())
    }

    pub fn has_role(env: Env, role: Role, account: Address) -> bool {
        roles::has_role(&env, role, &account)
    }

    pub fn pause(env: Env, admin: Address) -> Result<(), ContractError> {
        Self::require_admin(&env, &admin)?;
        pausable::set_paused(&env, &admin, true);
        Ok(())
    }

    pub fn unpause(env: Env, admin: Address) -> Result<(), ContractError> {
        Self::require_admin(&env, &admin)?;
        pausable::set_paused(&env, &admin, false);
        Ok(())
    }

    pub fn is_paused(env: Env) -> bool {
        pausable::is_paused(&env)
    }

    /// Allow `collection` with a per-item declared-value ceiling.
    pub fn whitelist_asset_collection(
        env: Env,
        admin: Address,
        collection: Address,
        max_value: i128,
    ) -> Result<(), ContractError> {
        Self::require_admin(&env, &admin)?;
        if max_value <= 0 {
            return Err(ContractError::InvalidAmount);
        }
        whitelist::whitelist_collection(&env, &collection, max_value);
        events::admin_action(&env, &admin, symbol_short!("WL_ADD"));
        Ok(())
    }

    /// Stop accepting new items from `collection`. Items already locked stay.
    pub fn remove_asset_collection(
        env: Env,
        admin: Address,
        collection: Address,
    ) -> Result<(), ContractError> {
        Self::require_admin(&env, &admin)?;
        whitelist::remove_collection(&env, &collection);
        events::admin_action(&env, &admin, symbol_short!("WL_DEL"));
        Ok(())
    }

    pub fn update_global_max_asset_value(
        env: Env,
        admin: Address,
        value: i128,
    ) -> Result<(), ContractError> {
        Self::require_admin(&env, &admin)?;
        if value < 0 {
            return Err(ContractError::InvalidAmount);
        }
        whitelist::set_global_cap(&env, value);
        events::admin_action(&env, &admin, symbol_short!("WL_GMAX"));
        Ok(())
    }

    // ── Oracle attestations ───────────────────────────────────────────────────

    pub fn verify_age(
        env: Env,
        oracle: Address,
        user: Address,
        age: u32,
        proof_ref: BytesN<32>,
    ) -> Result<(), ContractError> {
        Self::require_oracle(&env, &oracle)?;
        let cfg = config::load(&env)?;
        let now = env.ledger().timestamp();
        attestation::record_age(&env, &cfg, &oracle, &user, age, proof_ref, now)?;
        events::age_verified(&env, &user, &oracle, age);
        Ok(())
    }

    /// Add one oracle's confirmation of `owner`'s death.
    pub fn confirm_death(
        env: Env,
        oracle: Address,
        owner: Address,
        death_timestamp: u64,
        age_at_death: u32,
    ) -> Result<DeathStatus, ContractError> {
        Self::require_oracle(&env, &oracle)?;
        let cfg = config::load(&env)?;
        let now = env.ledger().timestamp();
        let mut record = vault::load(&env, &owner)?;

        let status = death::confirm(
            &env,
            &cfg,
            &mut record,
            &oracle,
            death_timestamp,
            age_at_death,
            now,
        )?;
        vault::store(&env, &record);
        events::death_confirmed(&env, &owner, &oracle, status);
        Ok(status)
    }

    pub fn achieve_milestone(
        env: Env,
        oracle: Address,
        owner: Address,
        index: u32,
        milestone_index: u32,
        proof_ref: BytesN<32>,
    ) -> Result<(), ContractError> {
        Self::require_oracle(&env, &oracle)?;
        distribution::achieve_milestone(&env, &owner, index, milestone_index)?;
        events::milestone_achieved(&env, &owner, index, milestone_index, proof_ref);
        Ok(())
    }

    pub fn attest_condition(
        env: Env,
        oracle: Address,
        owner: Address,
        index: u32,
        proof_ref: BytesN<32>,
    ) -> Result<(), ContractError> {
        Self::require_oracle(&env, &oracle)?;
        distribution::attest_condition(&env, &owner, index)?;
        events::condition_attested(&env, &owner, index, proof_ref);
        Ok(())
    }

    // ── Owner operations ──────────────────────────────────────────────────────

    pub fn create_vault(
        env: Env,
        owner: Address,
        beneficiaries: Vec<BeneficiaryInput>,
    ) -> Result<(), ContractError> {
        let _guard = Self::enter_owner(&env, &owner)?;
        let cfg = config::load(&env)?;
        let now = env.ledger().timestamp();

        if vault::exists(&env, &owner) {
            return Err(ContractError::SarcophagusAlreadyExists);
        }
        let age = attestation::require_age(&env, &owner, now)?;
        if age < cfg.min_owner_age {
            return Err(ContractError::InvalidAge);
        }
        let entries = vault::build_beneficiaries(&env, &cfg, &owner, beneficiaries)?;

        vault::store_beneficiaries(&env, &owner, &entries);
        vault::store(&env, &VaultRecord::open(&owner, now));
        events::vault_created(&env, &owner, entries.len());
        Ok(())
    }

    /// Lock `native` and `stable` into the vault. Returns the new totals.
    pub fn deposit(
        env: Env,
        owner: Address,
        native: i128,
        stable: i128,
    ) -> Result<AssetAmounts, ContractError> {
        let _guard = Self::enter_owner(&env, &owner)?;
        let cfg = config::load(&env)?;
        let registry = config::load_assets(&env)?;
        let now = env.ledger().timestamp();

        let mut record = vault::load(&env, &owner)?;
        record.require_alive()?;
        if native < 0 || stable < 0 {
            return Err(ContractError::InvalidAmount);
        }
        let total = native.checked_add(stable).ok_or(ContractError::InvalidAmount)?;
        if total < cfg.min_deposit {
            return Err(ContractError::BelowMinimumDeposit);
        }
        rate_limit::consume(
            &env,
            &owner,
            total,
            cfg.rate_limit_window,
            cfg.rate_limit_max,
            now,
        )?;

        let here = env.current_contract_address();
        assets::transfer(&env, &registry, AssetClass::Native, &owner, &here, native)?;
        assets::transfer(&env, &registry, AssetClass::Stable, &owner, &here, stable)?;

        let added = AssetAmounts {
            native,
            stable,
            yield_tokens: 0,
        };
        record.locked = record.locked.plus(&added);
        Self::touch(&env, &mut record, now);
        vault::store(&env, &record);

        let bonus = yield_client::settle(ObolClient::new(&env, &registry.yield_token).try_notify_deposit(
            &owner,
            &total,
            &record.locked.staked(),
        ))?;
        events::deposit(&env, &owner, added, record.locked.clone(), bonus);
        Ok(record.locked)
    }

    /// Take value back out before death. Opens after `min_lock_period`.
    pub fn withdraw(
        env: Env,
        owner: Address,
        native: i128,
        stable: i128,
    ) -> Result<AssetAmounts, ContractError> {
        let _guard = Self::enter_owner(&env, &owner)?;
        let cfg = config::load(&env)?;
        let registry = config::load_assets(&env)?;
        let now = env.ledger().timestamp();

        let mut record = vault::load(&env, &owner)?;
        record.require_alive()?;
        if now < record.created_at.saturating_add(cfg.min_lock_period) {
            return Err(ContractError::LockPeriodActive);
        }
        if native < 0 || stable < 0 || native.saturating_add(stable) == 0 {
            return Err(ContractError::InvalidAmount);
        }
        if native > record.locked.native || stable > record.locked.stable {
            return Err(ContractError::InsufficientBalance);
        }

        let taken = AssetAmounts {
            native,
            stable,
            yield_tokens: 0,
        };
        record.locked = record.locked.minus(&taken);
        Self::touch(&env, &mut record, now);
        vault::store(&env, &record);

        yield_client::settle(
            ObolClient::new(&env, &registry.yield_token)
                .try_notify_locked(&owner, &record.locked.staked()),
        )?;
        assets::pay_out(&env, &registry, &owner, &taken)?;
        events::withdraw(&env, &owner, taken, record.locked.clone());
        Ok(record.locked)
    }

    /// Move OBOL the owner holds into the vault's distributable pool.
    pub fn lock_yield_tokens(env: Env, owner: Address, amount: i128) -> Result<i128, ContractError> {
        let _guard = Self::enter_owner(&env, &owner)?;
        let registry = config::load_assets(&env)?;
        let now = env.ledger().timestamp();

        let mut record = vault::load(&env, &owner)?;
        record.require_alive()?;
        if amount <= 0 {
            return Err(ContractError::InvalidAmount);
        }
        let here = env.current_contract_address();
        assets::transfer(&env, &registry, AssetClass::Yield, &owner, &here, amount)?;

        record.locked.yield_tokens = record.locked.yield_tokens.saturating_add(amount);
        Self::touch(&env, &mut record, now);
        vault::store(&env, &record);
        events::yield_locked(&env, &owner, amount);
        Ok(record.locked.yield_tokens)
    }

    /// Claim the owner's accrued OBOL to their own account.
    pub fn claim_pending_rewards(env: Env, owner: Address) -> Result<i128, ContractError> {
        let _guard = Self::enter_owner(&env, &owner)?;
        let registry = config::load_assets(&env)?;
        let now = env.ledger().timestamp();

        let mut record = vault::load(&env, &owner)?;
        record.require_alive()?;
        let amount = yield_client::settle(
            ObolClient::new(&env, &registry.yield_token).try_claim_rewards_for(&owner, &owner),
        )?;
        record.rewards_claimed = record.rewards_claimed.saturating_add(amount);
        Self::touch(&env, &mut record, now);
        vault::store(&env, &record);
        events::rewards_claimed(&env, &owner, amount);
        Ok(amount)
    }

    /// Proof of life.
    pub fn ping(env: Env, owner: Address) -> Result<(), ContractError> {
        let _guard = Self::enter_owner(&env, &owner)?;
        let now = env.ledger().timestamp();
        let mut record = vault::load(&env, &owner)?;
        record.require_alive()?;
        let discarded = Self::touch(&env, &mut record, now);
        vault::store(&env, &record);
        events::activity(&env, &owner, discarded);
        Ok(())
    }

    /// Revoke a death confirmation while the dispute window is open.
    pub fn challenge_death(env: Env, owner: Address) -> Result<(), ContractError> {
        let _guard = Self::enter_owner(&env, &owner)?;
        let cfg = config::load(&env)?;
        let now = env.ledger().timestamp();
        let mut record = vault::load(&env, &owner)?;

        death::challenge(&env, &cfg, &mut record, now)?;
        vault::store(&env, &record);
        events::death_challenged(&env, &owner);
        Ok(())
    }

    pub fn lock_asset(
        env: Env,
        owner: Address,
        collection: Address,
        token_id: u64,
        beneficiary: Address,
        declared_value: i128,
    ) -> Result<(), ContractError> {
        let _guard = Self::enter_owner(&env, &owner)?;
        let now = env.ledger().timestamp();
        let mut record = vault::load(&env, &owner)?;
        record.require_alive()?;

        locker::lock(
            &env,
            &owner,
            &collection,
            token_id,
            &beneficiary,
            declared_value,
            now,
        )?;
        Self::touch(&env, &mut record, now);
        vault::store(&env, &record);
        events::asset_locked(&env, &owner, &collection, token_id, &beneficiary, declared_value);
        Ok(())
    }

    pub fn unlock_asset(
        env: Env,
        owner: Address,
        collection: Address,
        token_id: u64,
    ) -> Result<(), ContractError> {
        let _guard = Self::enter_owner(&env, &owner)?;
        let now = env.ledger().timestamp();
        let mut record = vault::load(&env, &owner)?;
        record.require_alive()?;

        let asset = locker::unlock(&env, &owner, &collection, token_id)?;
        Self::touch(&env, &mut record, now);
        vault::store(&env, &record);
        events::asset_unlocked(
            &env,
            &owner,
            &collection,
            token_id,
            &asset.beneficiary,
            asset.declared_value,
        );
        Ok(())
    }

    pub fn reassign_beneficiary(
        env: Env,
        owner: Address,
        collection: Address,
        token_id: u64,
        new_beneficiary: Address,
    ) -> Result<(), ContractError> {
        let _guard = Self::enter_owner(&env, &owner)?;
        let now = env.ledger().timestamp();
        let mut record = vault::load(&env, &owner)?;
        record.require_alive()?;

        let asset = locker::reassign(&env, &owner, &collection, token_id, &new_beneficiary)?;
        Self::touch(&env, &mut record, now);
        vault::store(&env, &record);
        events::asset_reassigned(
            &env,
            &owner,
            &collection,
            token_id,
            &new_beneficiary,
            asset.declared_value,
        );
        Ok(())
    }

    // ── Beneficiary claims ────────────────────────────────────────────────────

    /// Claim entry `index` of `owner`'s estate. `caller` is the recipient or
    /// their guardian; funds always go to the recipient.
    pub fn claim_inheritance(
        env: Env,
        caller: Address,
        owner: Address,
        index: u32,
    ) -> Result<AssetAmounts, ContractError> {
        caller.require_auth();
        pausable::require_not_paused(&env)?;
        let _guard = ReentrancyGuard::enter(&env, &owner)?;
        let cfg = config::load(&env)?;
        let registry = config::load_assets(&env)?;
        let now = env.ledger().timestamp();

        let outcome =
            distribution::claim_inheritance(&env, &cfg, &registry, &caller, &owner, index, now)?;
        Ok(outcome.amounts)
    }

    pub fn claim_monthly_allowance(
        env: Env,
        caller: Address,
        owner: Address,
        index: u32,
    ) -> Result<AssetAmounts, ContractError> {
        caller.require_auth();
        pausable::require_not_paused(&env)?;
        let _guard = ReentrancyGuard::enter(&env, &owner)?;
        let cfg = config::load(&env)?;
        let registry = config::load_assets(&env)?;
        let now = env.ledger().timestamp();

        distribution::claim_monthly_allowance(&env, &cfg, &registry, &caller, &owner, index, now)
    }

    pub fn claim_milestone(
        env: Env,
        caller: Address,
        owner: Address,
        index: u32,
        milestone_index: u32,
    ) -> Result<AssetAmounts, ContractError> {
        caller.require_auth();
        pausable::require_not_paused(&env)?;
        let _guard = ReentrancyGuard::enter(&env, &owner)?;
        let registry = config::load_assets(&env)?;

        distribution::claim_milestone(&env, &registry, &caller, &owner, index, milestone_index)
    }

    // ── Queries ───────────────────────────────────────────────────────────────

    pub fn get_vault(env: Env, owner: Address) -> Result<VaultRecord, ContractError> {
        vault::load(&env, &owner)
    }

    pub fn get_beneficiaries(
        env: Env,
        owner: Address,
    ) -> Result<Vec<BeneficiaryEntry>, ContractError> {
        vault::load_beneficiaries(&env, &owner)
    }

    pub fn get_death_status(env: Env, owner: Address) -> Result<DeathStatus, ContractError> {
        let cfg = config::load(&env)?;
        Ok(death::status(&env, &cfg, &owner, env.ledger().timestamp()))
    }

    pub fn get_death_record(env: Env, owner: Address) -> Option<DeathRecord> {
        death::load(&env, &owner)
    }

    pub fn get_age_attestation(env: Env, user: Address) -> Option<AgeAttestation> {
        attestation::load_age(&env, &user)
    }

    pub fn get_escrow(env: Env, owner: Address, index: u32) -> Option<Escrow> {
        vesting::load_escrow(&env, &owner, index)
    }

    pub fn get_locked_asset(env: Env, collection: Address, token_id: u64) -> Option<LockedAsset> {
        locker::load(&env, &collection, token_id)
    }

    pub fn get_locked_assets(env: Env, owner: Address) -> Vec<AssetKey> {
        locker::index(&env, &owner)
    }

    /// Declared value of the owner's items that are still locked.
    pub fn get_vault_asset_value(env: Env, owner: Address) -> i128 {
        locker::total_value(&env, &owner)
    }

    pub fn get_collection_cap(env: Env, collection: Address) -> Option<i128> {
        whitelist::collection_cap(&env, &collection)
    }

    pub fn get_global_max_asset_value(env: Env) -> i128 {
        whitelist::global_cap(&env)
    }

    pub fn get_config(env: Env) -> Result<VaultConfig, ContractError> {
        config::load(&env)
    }

    pub fn get_assets(env: Env) -> Result<AssetRegistry, ContractError> {
        config::load_assets(&env)
    }

    pub fn pending_rewards(env: Env, owner: Address) -> Result<i128, ContractError> {
        let registry = config::load_assets(&env)?;
        yield_client::settle(ObolClient::new(&env, &registry.yield_token).try_pending_rewards(&owner))
    }
}

#[cfg(test)]
mod test_death;
#[cfg(test)]
mod test_locker;
