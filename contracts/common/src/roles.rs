//! Role registry.
//!
//! Roles are stored as individual persistent flags keyed by
//! `("ROLE", role, account)` so that granting or revoking one account never
//! rewrites a shared list.

use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::CommonError;

const ROLE: Symbol = symbol_short!("ROLE");
const ROLE_TTL_THRESHOLD: u32 = 5_184_000; // ~300 days (@ ~5s/ledger)
const ROLE_TTL_EXTEND_TO: u32 = 10_368_000; // ~600 days (@ ~5s/ledger)

/// Elevated capabilities recognised by the suite.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq, Copy)]
#[repr(u32)]
pub enum Role {
    /// Configuration, allow-list, pause and role management.
    Admin = 0,
    /// Attests off-chain facts: age, death, milestone and condition fulfilment.
    Oracle = 1,
}

fn role_key(role: Role, account: &Address) -> (Symbol, Role, Address) {
    (ROLE, role, account.clone())
}

pub fn grant_role(env: &Env, role: Role, account: &Address) {
    let key = role_key(role, account);
    env.storage().persistent().set(&key, &true);
    env.storage()
        .persistent()
        .extend_ttl(&key, ROLE_TTL_THRESHOLD, ROLE_TTL_EXTEND_TO);
}

pub fn revoke_role(env: &Env, role: Role, account: &Address) {
    env.storage().persistent().remove(&role_key(role, account));
}

pub fn has_role(env: &Env, role: Role, account: &Address) -> bool {
    let key = role_key(role, account);
    let held = env.storage().persistent().get(&key).unwrap_or(false);
    if held {
        env.storage()
            .persistent()
            .extend_ttl(&key, ROLE_TTL_THRESHOLD, ROLE_TTL_EXTEND_TO);
    }
    held
}

/// Guard: `AccessDenied` unless `account` currently holds `role`.
///
/// Does not call `require_auth`; entry points authenticate the caller first.
pub fn require_role(env: &Env, role: Role, account: &Address) -> Result<(), CommonError> {
    if !has_role(env, role, account) {
        return Err(CommonError::AccessDenied);
    }
    Ok(())
}
