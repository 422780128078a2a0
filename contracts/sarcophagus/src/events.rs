//! Events emitted by the vault contract.
//!
//! Every event is published under `(TOPIC, owner)` so indexers can follow a
//! single estate.

use soroban_sdk::{contracttype, symbol_short, Address, BytesN, Env, IntoVal, Symbol, Val};

use crate::assets::AssetAmounts;
use crate::death::DeathStatus;

fn emit<T: IntoVal<Env, Val>>(env: &Env, topic: Symbol, owner: &Address, data: T) {
    #[allow(deprecated)]
    env.events().publish((topic, owner.clone()), data);
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VaultCreatedEvent {
    pub beneficiaries: u32,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositEvent {
    pub amounts: AssetAmounts,
    pub locked: AssetAmounts,
    pub bonus: i128,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawEvent {
    pub amounts: AssetAmounts,
    pub locked: AssetAmounts,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DeathConfirmedEvent {
    pub oracle: Address,
    pub status: DeathStatus,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InheritanceClaimedEvent {
    pub index: u32,
    pub recipient: Address,
    pub amounts: AssetAmounts,
    pub escrowed: bool,
    pub assets_released: u32,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EscrowReleaseEvent {
    pub index: u32,
    pub recipient: Address,
    pub amounts: AssetAmounts,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MilestoneEvent {
    pub index: u32,
    pub milestone: u32,
    pub proof_ref: BytesN<32>,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AssetEvent {
    pub collection: Address,
    pub token_id: u64,
    pub beneficiary: Address,
    pub declared_value: i128,
    pub timestamp: u64,
}

pub fn vault_created(env: &Env, owner: &Address, beneficiaries: u32) {
    emit(
        env,
        symbol_short!("VLT_NEW"),
        owner,
        VaultCreatedEvent {
            beneficiaries,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn deposit(env: &Env, owner: &Address, amounts: AssetAmounts, locked: AssetAmounts, bonus: i128) {
    emit(
        env,
        symbol_short!("DEPOSIT"),
        owner,
        DepositEvent {
            amounts,
            locked,
            bonus,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn withdraw(env: &Env, owner: &Address, amounts: AssetAmounts, locked: AssetAmounts) {
    emit(
        env,
        symbol_short!("WITHDRAW"),
        owner,
        WithdrawEvent {
            amounts,
            locked,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn yield_locked(env: &Env, owner: &Address, amount: i128) {
    emit(env, symbol_short!("YLD_LOCK"), owner, amount);
}

pub fn rewards_claimed(env: &Env, owner: &Address, amount: i128) {
    emit(env, symbol_short!("RWD_CLM"), owner, amount);
}

pub fn activity(env: &Env, owner: &Address, discarded_partial: bool) {
    emit(env, symbol_short!("PING"), owner, discarded_partial);
}

pub fn age_verified(env: &Env, user: &Address, oracle: &Address, age: u32) {
    emit(env, symbol_short!("AGE_OK"), user, (oracle.clone(), age));
}

pub fn death_confirmed(env: &Env, owner: &Address, oracle: &Address, status: DeathStatus) {
    emit(
        env,
        symbol_short!("DTH_CONF"),
        owner,
        DeathConfirmedEvent {
            oracle: oracle.clone(),
            status,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn death_challenged(env: &Env, owner: &Address) {
    emit(
        env,
        symbol_short!("DTH_CHAL"),
        owner,
        env.ledger().timestamp(),
    );
}

pub fn estate_settled(env: &Env, owner: &Address, harvested: i128) {
    emit(env, symbol_short!("SETTLED"), owner, harvested);
}

/// OBOL the estate had earned but could not mint because the supply cap was reached.
pub fn rewards_forfeited(env: &Env, owner: &Address, pending: i128) {
    emit(env, symbol_short!("RWD_SKIP"), owner, pending);
}

pub fn inheritance_claimed(
    env: &Env,
    owner: &Address,
    index: u32,
    recipient: &Address,
    amounts: AssetAmounts,
    escrowed: bool,
    assets_released: u32,
) {
    emit(
        env,
        symbol_short!("CLAIM"),
        owner,
        InheritanceClaimedEvent {
            index,
            recipient: recipient.clone(),
            amounts,
            escrowed,
            assets_released,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn allowance_released(env: &Env, owner: &Address, index: u32, recipient: &Address, amounts: AssetAmounts) {
    emit(
        env,
        symbol_short!("ALLOWNCE"),
        owner,
        EscrowReleaseEvent {
            index,
            recipient: recipient.clone(),
            amounts,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn milestone_released(env: &Env, owner: &Address, index: u32, recipient: &Address, amounts: AssetAmounts) {
    emit(
        env,
        symbol_short!("MS_CLAIM"),
        owner,
        EscrowReleaseEvent {
            index,
            recipient: recipient.clone(),
            amounts,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn milestone_achieved(
    env: &Env,
    owner: &Address,
    index: u32,
    milestone: u32,
    proof_ref: BytesN<32>,
) {
    emit(
        env,
        symbol_short!("MS_DONE"),
        owner,
        MilestoneEvent {
            index,
            milestone,
            proof_ref,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn condition_attested(env: &Env, owner: &Address, index: u32, proof_ref: BytesN<32>) {
    emit(env, symbol_short!("COND_OK"), owner, (index, proof_ref));
}

fn asset_event(
    env: &Env,
    topic: Symbol,
    owner: &Address,
    collection: &Address,
    token_id: u64,
    beneficiary: &Address,
    declared_value: i128,
) {
    emit(
        env,
        topic,
        owner,
        AssetEvent {
            collection: collection.clone(),
            token_id,
            beneficiary: beneficiary.clone(),
            declared_value,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn asset_locked(
    env: &Env,
    owner: &Address,
    collection: &Address,
    token_id: u64,
    beneficiary: &Address,
    declared_value: i128,
) {
    asset_event(env, symbol_short!("ASSET_LK"), owner, collection, token_id, beneficiary, declared_value);
}

pub fn asset_unlocked(
    env: &Env,
    owner: &Address,
    collection: &Address,
    token_id: u64,
    beneficiary: &Address,
    declared_value: i128,
) {
    asset_event(env, symbol_short!("ASSET_UL"), owner, collection, token_id, beneficiary, declared_value);
}

pub fn asset_reassigned(
    env: &Env,
    owner: &Address,
    collection: &Address,
    token_id: u64,
    beneficiary: &Address,
    declared_value: i128,
) {
    asset_event(env, symbol_short!("ASSET_RA"), owner, collection, token_id, beneficiary, declared_value);
}

/// Admin-side changes, keyed by the acting admin.
pub fn admin_action(env: &Env, admin: &Address, action: Symbol) {
    emit(env, symbol_short!("ADMIN"), admin, action);
}
