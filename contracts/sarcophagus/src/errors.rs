use common::CommonError;
use soroban_sdk::contracterror;

use crate::yield_client::YieldError;

/// Errors returned by the vault contract.
///
/// | Range | Meaning                 |
/// |-------|-------------------------|
/// | 1–9   | lifecycle               |
/// | 10–19 | authorisation           |
/// | 20–29 | not found / existence   |
/// | 30–39 | validation              |
/// | 40–59 | wrong lifecycle state   |
/// | 60–69 | resource limits         |
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Paused = 3,

    Unauthorized = 10,
    InvalidBeneficiary = 12,

    SarcophagusNotExists = 20,
    SarcophagusAlreadyExists = 21,
    AgeNotVerified = 22,
    AssetNotFound = 23,
    EscrowNotFound = 24,

    InvalidAmount = 30,
    InvalidPercentages = 31,
    InvalidBeneficiaryCount = 32,
    InvalidAddress = 33,
    InvalidAge = 34,
    InvalidConfig = 35,
    DuplicateBeneficiary = 36,
    InvalidMilestone = 37,
    CollectionNotWhitelisted = 38,
    AssetValueTooHigh = 39,

    AlreadyClaimed = 40,
    AlreadyConfirmed = 41,
    DeathAlreadyVerified = 42,
    DeathNotVerified = 43,
    InChallengePeriod = 44,
    ChallengePeriodEnded = 45,
    ChallengeAlreadyUsed = 46,
    NotChallengeable = 47,
    StillActive = 48,
    MilestoneNotAchieved = 49,
    MilestoneAlreadyClaimed = 50,
    ConditionNotMet = 51,
    VestingLocked = 52,
    AllowanceNotDue = 53,
    AgeRequirementNotMet = 54,
    AssetAlreadyLocked = 55,
    LockPeriodActive = 56,
    Reentrancy = 57,
    NothingToRelease = 58,

    RateLimitExceeded = 60,
    BelowMinimumDeposit = 61,
    RewardSupplyExhausted = 62,
    NoRewardsToClaim = 63,
    InsufficientBalance = 64,
    YieldEngineFailure = 65,
}

impl From<CommonError> for ContractError {
    fn from(e: CommonError) -> Self {
        match e {
            CommonError::NotInitialized => ContractError::NotInitialized,
            CommonError::AlreadyInitialized => ContractError::AlreadyInitialized,
            CommonError::AccessDenied => ContractError::Unauthorized,
            CommonError::InvalidInput => ContractError::InvalidAmount,
            CommonError::Paused => ContractError::Paused,
            CommonError::ReentrantCall => ContractError::Reentrancy,
            CommonError::RateLimitExceeded => ContractError::RateLimitExceeded,
        }
    }
}

impl From<YieldError> for ContractError {
    fn from(e: YieldError) -> Self {
        match e {
            YieldError::RewardSupplyExhausted => ContractError::RewardSupplyExhausted,
            YieldError::NoRewardsToClaim => ContractError::NoRewardsToClaim,
            YieldError::InsufficientBalance => ContractError::InsufficientBalance,
            YieldError::InvalidAmount => ContractError::InvalidAmount,
            _ => ContractError::YieldEngineFailure,
        }
    }
}
