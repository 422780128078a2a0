//! Cross-contract interface to the OBOL yield engine.

use soroban_sdk::{contracterror, Address, Env, InvokeError};

use crate::errors::ContractError;

/// Error codes of the yield engine, mirrored so that cross-contract failures
/// decode into something the vault can map.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum YieldError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    StakeNotFound = 20,
    InvalidAmount = 30,
    InvalidConfig = 31,
    RewardSupplyExhausted = 62,
    NoRewardsToClaim = 63,
    InsufficientBalance = 64,
}

#[soroban_sdk::contractclient(name = "ObolClient")]
#[allow(dead_code)]
pub trait ObolInterface {
    fn notify_deposit(
        env: Env,
        owner: Address,
        amount: i128,
        new_locked: i128,
    ) -> Result<i128, YieldError>;
    fn notify_locked(env: Env, owner: Address, new_locked: i128) -> Result<(), YieldError>;
    fn claim_rewards_for(env: Env, owner: Address, to: Address) -> Result<i128, YieldError>;
    fn pending_rewards(env: Env, owner: Address) -> Result<i128, YieldError>;
    fn transfer(env: Env, from: Address, to: Address, amount: i128) -> Result<(), YieldError>;
    fn balance(env: Env, id: Address) -> i128;
}

/// Collapse a `try_*` call on [`ObolClient`] into the vault's error space.
pub(crate) fn settle<T, C>(
    res: Result<Result<T, C>, Result<YieldError, InvokeError>>,
) -> Result<T, ContractError> {
    match res {
        Ok(Ok(v)) => Ok(v),
        Err(Ok(e)) => Err(e.into()),
        Ok(Err(_)) | Err(Err(_)) => Err(ContractError::YieldEngineFailure),
    }
}
