//! Collection allow-list with value ceilings.
//!
//! A collection is allowed when it carries a per-collection maximum declared
//! value. A separate global ceiling applies on top of every per-collection
//! cap; the effective cap is the smaller of the two.

use soroban_sdk::{symbol_short, Address, Env, Symbol};

const WL_COLL: Symbol = symbol_short!("WL_COLL");
const WL_GLOBAL: Symbol = symbol_short!("WL_GMAX");
const WL_TTL_THRESHOLD: u32 = 5_184_000; // 5,184,000 ledgers ~= 300 days (@ ~5s/ledger)
const WL_TTL_EXTEND_TO: u32 = 10_368_000; // 10,368,000 ledgers ~= 600 days (@ ~5s/ledger)

fn extend_whitelist_ttl(env: &Env, key: &(Symbol, Address)) {
    env.storage()
        .persistent()
        .extend_ttl(key, WL_TTL_THRESHOLD, WL_TTL_EXTEND_TO);
}

/// Allow `collection` with the given per-item value ceiling.
pub fn whitelist_collection(env: &Env, collection: &Address, max_value: i128) {
    let key = (WL_COLL, collection.clone());
    env.storage().persistent().set(&key, &max_value);
    extend_whitelist_ttl(env, &key);
}

/// Remove `collection` from the allow-list. Already locked items are unaffected.
pub fn remove_collection(env: &Env, collection: &Address) {
    env.storage()
        .persistent()
        .remove(&(WL_COLL, collection.clone()));
}

/// Per-collection ceiling, or `None` when the collection is not allowed.
pub fn collection_cap(env: &Env, collection: &Address) -> Option<i128> {
    let key = (WL_COLL, collection.clone());
    let cap: Option<i128> = env.storage().persistent().get(&key);
    if cap.is_some() {
        extend_whitelist_ttl(env, &key);
    }
    cap
}

pub fn is_collection_whitelisted(env: &Env, collection: &Address) -> bool {
    collection_cap(env, collection).is_some()
}

pub fn set_global_cap(env: &Env, max_value: i128) {
    env.storage().instance().set(&WL_GLOBAL, &max_value);
}

/// Global ceiling; `0` when never configured, which admits nothing.
pub fn global_cap(env: &Env) -> i128 {
    env.storage().instance().get(&WL_GLOBAL).unwrap_or(0)
}

/// Effective ceiling for one item of `collection`.
pub fn effective_cap(env: &Env, collection: &Address) -> Option<i128> {
    collection_cap(env, collection).map(|cap| cap.min(global_cap(env)))
}
