//! Events emitted by the OBOL yield engine.

use soroban_sdk::{symbol_short, Address, Env, IntoVal, Val};

fn emit<T: IntoVal<Env, Val>>(env: &Env, topic: &str, data: T) {
    #[allow(deprecated)]
    env.events()
        .publish((symbol_short!("OBOL"), soroban_sdk::Symbol::new(env, topic)), data);
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BonusMintedEvent {
    pub owner: Address,
    pub deposit: i128,
    pub bonus: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BonusSkippedEvent {
    pub owner: Address,
    pub bonus: i128,
    pub remaining_supply: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardsClaimedEvent {
    pub owner: Address,
    pub to: Address,
    pub amount: i128,
    pub total_earned: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakeSyncedEvent {
    pub owner: Address,
    pub locked_value: i128,
    pub long_term_holder: bool,
    pub timestamp: u64,
}

pub fn publish_bonus_minted(env: &Env, owner: Address, deposit: i128, bonus: i128) {
    emit(
        env,
        "BonusMint",
        BonusMintedEvent {
            owner,
            deposit,
            bonus,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_bonus_skipped(env: &Env, owner: Address, bonus: i128, remaining_supply: i128) {
    emit(
        env,
        "BonusSkip",
        BonusSkippedEvent {
            owner,
            bonus,
            remaining_supply,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_rewards_claimed(
    env: &Env,
    owner: Address,
    to: Address,
    amount: i128,
    total_earned: i128,
) {
    emit(
        env,
        "RwdClaim",
        RewardsClaimedEvent {
            owner,
            to,
            amount,
            total_earned,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_stake_synced(env: &Env, owner: Address, locked_value: i128, long_term_holder: bool) {
    emit(
        env,
        "StakeSync",
        StakeSyncedEvent {
            owner,
            locked_value,
            long_term_holder,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_transfer(env: &Env, from: Address, to: Address, amount: i128) {
    #[allow(deprecated)]
    env.events()
        .publish((symbol_short!("transfer"), from, to), amount);
}
