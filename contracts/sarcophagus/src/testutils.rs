//! Test doubles for the contracts a vault talks to.

use soroban_sdk::{contract, contractimpl, symbol_short, Address, Env, Symbol};

const OWNER: Symbol = symbol_short!("OWNER");

/// Minimal non-fungible collection: one owner per `token_id`.
#[contract]
pub struct MockCollection;

#[contractimpl]
impl MockCollection {
    pub fn mint(env: Env, to: Address, token_id: u64) {
        env.storage().persistent().set(&(OWNER, token_id), &to);
    }

    pub fn owner_of(env: Env, token_id: u64) -> Option<Address> {
        env.storage().persistent().get(&(OWNER, token_id))
    }

    pub fn transfer(env: Env, from: Address, to: Address, token_id: u64) {
        from.require_auth();
        let current: Option<Address> = env.storage().persistent().get(&(OWNER, token_id));
        assert_eq!(current, Some(from), "not the token owner");
        env.storage().persistent().set(&(OWNER, token_id), &to);
    }
}
