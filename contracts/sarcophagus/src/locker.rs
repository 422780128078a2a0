//! Non-fungible assets bound to a beneficiary.
//!
//! An item is keyed by `(collection, token_id)` and held by the vault while
//! locked. The owner keeps an index of item keys so the estate can find the
//! items assigned to a given recipient. Aggregate value is always recomputed
//! from live entries.

use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol, Vec};

use common::whitelist;

use crate::errors::ContractError;
use crate::vault;

const ASSET: Symbol = symbol_short!("ASSET");
const ASSET_IDX: Symbol = symbol_short!("ASSET_IDX");

const TTL_THRESHOLD: u32 = 5_184_000;
const TTL_EXTEND_TO: u32 = 10_368_000;

#[soroban_sdk::contractclient(name = "CollectionClient")]
#[allow(dead_code)]
pub trait CollectionInterface {
    fn owner_of(env: Env, token_id: u64) -> Option<Address>;
    fn transfer(env: Env, from: Address, to: Address, token_id: u64);
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AssetKey {
    pub collection: Address,
    pub token_id: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LockedAsset {
    pub owner: Address,
    pub beneficiary: Address,
    pub declared_value: i128,
    pub locked: bool,
    pub locked_at: u64,
}

fn asset_key(collection: &Address, token_id: u64) -> (Symbol, Address, u64) {
    (ASSET, collection.clone(), token_id)
}

fn index_key(owner: &Address) -> (Symbol, Address) {
    (ASSET_IDX, owner.clone())
}

pub fn load(env: &Env, collection: &Address, token_id: u64) -> Option<LockedAsset> {
    env.storage().persistent().get(&asset_key(collection, token_id))
}

fn store(env: &Env, collection: &Address, token_id: u64, asset: &LockedAsset) {
    let key = asset_key(collection, token_id);
    env.storage().persistent().set(&key, asset);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn index(env: &Env, owner: &Address) -> Vec<AssetKey> {
    env.storage()
        .persistent()
        .get(&index_key(owner))
        .unwrap_or(Vec::new(env))
}

fn store_index(env: &Env, owner: &Address, idx: &Vec<AssetKey>) {
    let key = index_key(owner);
    env.storage().persistent().set(&key, idx);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Item locked by `owner`, or `AssetNotFound`.
fn owned_locked(
    env: &Env,
    owner: &Address,
    collection: &Address,
    token_id: u64,
) -> Result<LockedAsset, ContractError> {
    match load(env, collection, token_id) {
        Some(a) if a.locked && a.owner == *owner => Ok(a),
        Some(a) if a.locked => Err(ContractError::Unauthorized),
        _ => Err(ContractError::AssetNotFound),
    }
}

/// Validate and record a new lock, then pull the item into the vault.
pub fn lock(
    env: &Env,
    owner: &Address,
    collection: &Address,
    token_id: u64,
    beneficiary: &Address,
    declared_value: i128,
    now: u64,
) -> Result<(), ContractError> {
    let cap = whitelist::effective_cap(env, collection)
        .ok_or(ContractError::CollectionNotWhitelisted)?;
    if !vault::is_registered_recipient(env, owner, beneficiary) {
        return Err(ContractError::InvalidBeneficiary);
    }
    if load(env, collection, token_id).map_or(false, |a| a.locked) {
        return Err(ContractError::AssetAlreadyLocked);
    }
    if declared_value <= 0 {
        return Err(ContractError::InvalidAmount);
    }
    if declared_value > cap {
        return Err(ContractError::AssetValueTooHigh);
    }

    let nft = CollectionClient::new(env, collection);
    if nft.owner_of(&token_id) != Some(owner.clone()) {
        return Err(ContractError::AssetNotFound);
    }

    store(
        env,
        collection,
        token_id,
        &LockedAsset {
            owner: owner.clone(),
            beneficiary: beneficiary.clone(),
            declared_value,
            locked: true,
            locked_at: now,
        },
    );
    let mut idx = index(env, owner);
    let k = AssetKey {
        collection: collection.clone(),
        token_id,
    };
    if !idx.iter().any(|e| e == k) {
        idx.push_back(k);
        store_index(env, owner, &idx);
    }

    nft.transfer(owner, &env.current_contract_address(), &token_id);
    Ok(())
}

/// Return an item to its owner and forget it.
pub fn unlock(
    env: &Env,
    owner: &Address,
    collection: &Address,
    token_id: u64,
) -> Result<LockedAsset, ContractError> {
    let asset = owned_locked(env, owner, collection, token_id)?;

    env.storage()
        .persistent()
        .remove(&asset_key(collection, token_id));
    let idx = index(env, owner);
    let mut kept: Vec<AssetKey> = Vec::new(env);
    for k in idx.iter() {
        if !(k.collection == *collection && k.token_id == token_id) {
            kept.push_back(k);
        }
    }
    store_index(env, owner, &kept);

    CollectionClient::new(env, collection).transfer(
        &env.current_contract_address(),
        owner,
        &token_id,
    );
    Ok(asset)
}

pub fn reassign(
    env: &Env,
    owner: &Address,
    collection: &Address,
    token_id: u64,
    new_beneficiary: &Address,
) -> Result<LockedAsset, ContractError> {
    let mut asset = owned_locked(env, owner, collection, token_id)?;
    if !vault::is_registered_recipient(env, owner, new_beneficiary) {
        return Err(ContractError::InvalidBeneficiary);
    }
    asset.beneficiary = new_beneficiary.clone();
    store(env, collection, token_id, &asset);
    Ok(asset)
}

/// Hand every item `owner` bound to `recipient` over to them. Entries stay
/// on record with `locked = false` and leave the owner's index. Returns the
/// number of items released.
pub fn release_to(env: &Env, owner: &Address, recipient: &Address) -> u32 {
    let here = env.current_contract_address();
    let mut released = 0u32;
    let mut kept: Vec<AssetKey> = Vec::new(env);
    for k in index(env, owner).iter() {
        match load(env, &k.collection, k.token_id) {
            Some(mut asset) if asset.locked && asset.owner == *owner => {
                if asset.beneficiary == *recipient {
                    asset.locked = false;
                    store(env, &k.collection, k.token_id, &asset);
                    CollectionClient::new(env, &k.collection).transfer(
                        &here,
                        recipient,
                        &k.token_id,
                    );
                    released += 1;
                } else {
                    kept.push_back(k);
                }
            }
            // Released earlier or re-locked by someone else.
            _ => {}
        }
    }
    store_index(env, owner, &kept);
    released
}

/// Sum of declared values of `owner`'s items still locked.
pub fn total_value(env: &Env, owner: &Address) -> i128 {
    index(env, owner)
        .iter()
        .filter_map(|k| load(env, &k.collection, k.token_id))
        .filter(|a| a.locked && a.owner == *owner)
        .fold(0i128, |acc, a| acc.saturating_add(a.declared_value))
}
