//! Rolling-window cumulative value limiter.
//!
//! Each scope (usually an account) keeps a short log of recent
//! consumptions. A consumption at `now` counts while
//! `now - window_secs < at`, so the sum over any `window_secs` span never
//! exceeds `max_per_window`. A consumption that would cross the ceiling is
//! rejected whole and leaves the log untouched.
//!
//! The log holds at most [`MAX_RATE_ENTRIES`]; past that the two oldest
//! entries merge under the later timestamp, which can only keep value in the
//! window longer.

use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol, Vec};

use crate::CommonError;

const RL_LOG: Symbol = symbol_short!("RL_LOG");
const RL_TTL_THRESHOLD: u32 = 17_280; // ~1 day (@ ~5s/ledger)
const RL_TTL_EXTEND_TO: u32 = 120_960; // ~7 days

pub const MAX_RATE_ENTRIES: u32 = 32;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RateEntry {
    pub at: u64,
    pub amount: i128,
}

fn log_key(scope: &Address) -> (Symbol, Address) {
    (RL_LOG, scope.clone())
}

fn in_window(entry: &RateEntry, window_secs: u64, now: u64) -> bool {
    entry.at.saturating_add(window_secs) > now
}

/// Entries of `scope` still inside the window ending at `now`.
pub fn recent_entries(env: &Env, scope: &Address, window_secs: u64, now: u64) -> Vec<RateEntry> {
    let stored: Vec<RateEntry> = env
        .storage()
        .persistent()
        .get(&log_key(scope))
        .unwrap_or(Vec::new(env));
    let mut live = Vec::new(env);
    for e in stored.iter() {
        if in_window(&e, window_secs, now) {
            live.push_back(e);
        }
    }
    live
}

/// Value `scope` has consumed in the window ending at `now`.
pub fn consumed(env: &Env, scope: &Address, window_secs: u64, now: u64) -> i128 {
    recent_entries(env, scope, window_secs, now)
        .iter()
        .fold(0i128, |acc, e| acc.saturating_add(e.amount))
}

/// Record `amount` against `scope`. Returns the windowed total afterwards.
pub fn consume(
    env: &Env,
    scope: &Address,
    amount: i128,
    window_secs: u64,
    max_per_window: i128,
    now: u64,
) -> Result<i128, CommonError> {
    if amount < 0 {
        return Err(CommonError::InvalidInput);
    }
    let mut entries = recent_entries(env, scope, window_secs, now);
    let total = entries
        .iter()
        .try_fold(amount, |acc, e| acc.checked_add(e.amount))
        .ok_or(CommonError::RateLimitExceeded)?;
    if total > max_per_window {
        return Err(CommonError::RateLimitExceeded);
    }

    entries.push_back(RateEntry { at: now, amount });
    while entries.len() > MAX_RATE_ENTRIES {
        let (Some(first), Some(second)) = (entries.pop_front(), entries.pop_front()) else {
            break;
        };
        entries.push_front(RateEntry {
            at: second.at,
            amount: first.amount.saturating_add(second.amount),
        });
    }

    let key = log_key(scope);
    env.storage().persistent().set(&key, &entries);
    env.storage()
        .persistent()
        .extend_ttl(&key, RL_TTL_THRESHOLD, RL_TTL_EXTEND_TO);
    Ok(total)
}
