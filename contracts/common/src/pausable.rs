#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env, Symbol};

use crate::CommonError;

const PAUSED: Symbol = symbol_short!("PAUSED");

/// Returns `true` when the contract is paused.
pub fn is_paused(env: &Env) -> bool {
    env.storage().instance().get(&PAUSED).unwrap_or(false)
}

/// Guard: returns `CommonError::Paused` when the contract is paused.
///
/// Place this at the top of every state-mutating entry point reachable by
/// owners, oracles or beneficiaries. Admin recovery paths and views skip it.
pub fn require_not_paused(env: &Env) -> Result<(), CommonError> {
    if is_paused(env) {
        return Err(CommonError::Paused);
    }
    Ok(())
}

/// Flip the pause switch and publish `("PAUSED" | "UNPAUSED", caller)`.
///
/// Callers enforce the admin role before invoking this; the module does not
/// perform auth checks so it can be shared by contracts with different admin
/// models.
pub fn set_paused(env: &Env, caller: &Address, paused: bool) {
    env.storage().instance().set(&PAUSED, &paused);
    let topic = if paused {
        symbol_short!("PAUSED")
    } else {
        symbol_short!("UNPAUSED")
    };
    env.events().publish((topic, caller.clone()), paused);
}
