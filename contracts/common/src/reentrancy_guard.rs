//! Per-identity call-in-progress lock.
//!
//! A guard is acquired at the top of a mutating entry point and released when
//! it goes out of scope. The lock is keyed by the identity whose records the
//! call mutates (e.g. the vault owner), so sibling entry points touching the
//! same records share one lock while unrelated identities never contend.
//!
//! ```ignore
//! let _guard = ReentrancyGuard::enter(&env, &owner)?;
//! // ... flip flags, then transfer ...
//! ```

use soroban_sdk::{symbol_short, Address, Env, Symbol};

use crate::CommonError;

const REENTRY: Symbol = symbol_short!("REENTRY");

pub struct ReentrancyGuard {
    env: Env,
    key: (Symbol, Address),
}

impl ReentrancyGuard {
    /// Acquire the lock for `scope`, failing with `ReentrantCall` when another
    /// frame of the same transaction already holds it.
    pub fn enter(env: &Env, scope: &Address) -> Result<Self, CommonError> {
        let key = (REENTRY, scope.clone());
        if env.storage().temporary().has(&key) {
            return Err(CommonError::ReentrantCall);
        }
        env.storage().temporary().set(&key, &true);
        Ok(Self {
            env: env.clone(),
            key,
        })
    }

    pub fn is_locked(env: &Env, scope: &Address) -> bool {
        env.storage().temporary().has(&(REENTRY, scope.clone()))
    }
}

impl Drop for ReentrancyGuard {
    fn drop(&mut self) {
        self.env.storage().temporary().remove(&self.key);
    }
}
