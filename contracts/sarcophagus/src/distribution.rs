//! Beneficiary claims against a finalised estate.
//!
//! Claims are pulled one entry at a time. Every path persists its flags and
//! counters before the first transfer leaves the vault.

use soroban_sdk::{Address, Env};

use crate::assets::{self, AssetAmounts};
use crate::attestation;
use crate::config::{AssetRegistry, VaultConfig};
use crate::death;
use crate::errors::ContractError;
use crate::events;
use crate::locker;
use crate::vault::{self, VaultRecord};
use crate::vesting::{self, Escrow, Vesting};
use crate::yield_client::{self, ObolClient};

/// Outcome of [`claim_inheritance`].
pub struct ClaimOutcome {
    pub amounts: AssetAmounts,
    pub escrowed: bool,
}

/// Fold the owner's pending OBOL into the estate and freeze the stake.
///
/// Runs once, on the first claim after death is final, so every entry's share
/// is computed from the same totals.
fn settle_estate(
    env: &Env,
    registry: &AssetRegistry,
    record: &mut VaultRecord,
) -> Result<(), ContractError> {
    let obol = ObolClient::new(env, &registry.yield_token);
    let here = env.current_contract_address();

    let harvested = match obol.try_claim_rewards_for(&record.owner, &here) {
        Ok(Ok(amount)) => amount,
        Err(Ok(e)) if e == yield_client::YieldError::NoRewardsToClaim => 0,
        Err(Ok(e)) if e == yield_client::YieldError::RewardSupplyExhausted => {
            let pending = yield_client::settle(obol.try_pending_rewards(&record.owner))?;
            record.rewards_forfeited = record.rewards_forfeited.saturating_add(pending);
            events::rewards_forfeited(env, &record.owner, pending);
            0
        }
        other => yield_client::settle(other)?,
    };
    record.locked.yield_tokens = record.locked.yield_tokens.saturating_add(harvested);
    record.rewards_claimed = record.rewards_claimed.saturating_add(harvested);

    if record.locked.staked() > 0 {
        yield_client::settle(obol.try_notify_locked(&record.owner, &0))?;
    }
    record.settled = true;
    events::estate_settled(env, &record.owner, harvested);
    Ok(())
}

/// Claim entry `index` of `owner`'s estate on behalf of `caller`.
pub fn claim_inheritance(
    env: &Env,
    cfg: &VaultConfig,
    registry: &AssetRegistry,
    caller: &Address,
    owner: &Address,
    index: u32,
    now: u64,
) -> Result<ClaimOutcome, ContractError> {
    let final_at = death::require_final(env, cfg, owner, now)?;
    let mut record = vault::load(env, owner)?;
    let (mut entries, mut entry) = vault::load_entry(env, owner, index)?;

    if !entry.may_act(caller) {
        return Err(ContractError::InvalidBeneficiary);
    }
    if entry.claimed {
        return Err(ContractError::AlreadyClaimed);
    }
    if entry.conditional && !entry.condition_met {
        return Err(ContractError::ConditionNotMet);
    }
    if now < final_at.saturating_add(entry.vesting_duration) {
        return Err(ContractError::VestingLocked);
    }

    if !record.settled {
        settle_estate(env, registry, &mut record)?;
    }

    let share = record.locked.share_bps(entry.percentage_bps);
    let escrowed = match &entry.vesting {
        Vesting::Schedule(schedule) => {
            let age = attestation::load_age(env, &entry.recipient).map(|a| a.current_age(now));
            schedule.requires_escrow(age)
        }
        Vesting::None => false,
    };

    entry.claimed = true;
    entries.set(index, entry.clone());
    vault::store_beneficiaries(env, owner, &entries);
    record.distributed = record.distributed.plus(&share);
    vault::store(env, &record);
    if escrowed {
        vesting::store_escrow(env, owner, index, &Escrow::open(share.clone(), now));
    }

    if !escrowed {
        assets::pay_out(env, registry, &entry.recipient, &share)?;
    }
    let released = locker::release_to(env, owner, &entry.recipient);

    events::inheritance_claimed(
        env,
        owner,
        index,
        &entry.recipient,
        share.clone(),
        escrowed,
        released,
    );
    Ok(ClaimOutcome {
        amounts: share,
        escrowed,
    })
}

/// Draw the allowance currently due from an escrowed share.
pub fn claim_monthly_allowance(
    env: &Env,
    cfg: &VaultConfig,
    registry: &AssetRegistry,
    caller: &Address,
    owner: &Address,
    index: u32,
    now: u64,
) -> Result<AssetAmounts, ContractError> {
    let (_, entry) = vault::load_entry(env, owner, index)?;
    if !entry.may_act(caller) {
        return Err(ContractError::InvalidBeneficiary);
    }
    let schedule = entry.vesting.schedule().ok_or(ContractError::EscrowNotFound)?;
    let mut escrow = vesting::load_escrow(env, owner, index).ok_or(ContractError::EscrowNotFound)?;

    let recipient_age = attestation::load_age(env, &entry.recipient).map(|a| a.current_age(now));
    let by_guardian = entry.guardian.as_ref() == Some(caller);
    if !by_guardian {
        match recipient_age {
            None => return Err(ContractError::AgeNotVerified),
            Some(age) if age < cfg.min_allowance_age => {
                return Err(ContractError::AgeRequirementNotMet)
            }
            Some(_) => {}
        }
    }

    let out = escrow.release_allowance(&schedule, cfg, recipient_age, now)?;
    vesting::store_escrow(env, owner, index, &escrow);

    assets::pay_out(env, registry, &entry.recipient, &out)?;
    events::allowance_released(env, owner, index, &entry.recipient, out.clone());
    Ok(out)
}

/// Release the funds attached to an achieved milestone.
pub fn claim_milestone(
    env: &Env,
    registry: &AssetRegistry,
    caller: &Address,
    owner: &Address,
    index: u32,
    milestone_index: u32,
) -> Result<AssetAmounts, ContractError> {
    let (mut entries, mut entry) = vault::load_entry(env, owner, index)?;
    if !entry.may_act(caller) {
        return Err(ContractError::InvalidBeneficiary);
    }
    let mut schedule = entry.vesting.schedule().ok_or(ContractError::InvalidMilestone)?;
    let mut milestone = schedule
        .milestones
        .get(milestone_index)
        .ok_or(ContractError::InvalidMilestone)?;
    if !milestone.achieved {
        return Err(ContractError::MilestoneNotAchieved);
    }
    if milestone.claimed {
        return Err(ContractError::MilestoneAlreadyClaimed);
    }
    let mut escrow = vesting::load_escrow(env, owner, index).ok_or(ContractError::EscrowNotFound)?;
    let out = escrow.release(milestone.amount)?;

    milestone.claimed = true;
    schedule.milestones.set(milestone_index, milestone);
    entry.vesting = Vesting::Schedule(schedule);
    entries.set(index, entry.clone());
    vault::store_beneficiaries(env, owner, &entries);
    vesting::store_escrow(env, owner, index, &escrow);

    assets::pay_out(env, registry, &entry.recipient, &out)?;
    events::milestone_released(env, owner, index, &entry.recipient, out.clone());
    Ok(out)
}

/// Oracle marks milestone `milestone_index` of entry `index` as achieved.
pub fn achieve_milestone(
    env: &Env,
    owner: &Address,
    index: u32,
    milestone_index: u32,
) -> Result<(), ContractError> {
    let (mut entries, mut entry) = vault::load_entry(env, owner, index)?;
    let mut schedule = entry.vesting.schedule().ok_or(ContractError::InvalidMilestone)?;
    let mut milestone = schedule
        .milestones
        .get(milestone_index)
        .ok_or(ContractError::InvalidMilestone)?;
    if milestone.achieved {
        return Err(ContractError::AlreadyConfirmed);
    }
    milestone.achieved = true;
    schedule.milestones.set(milestone_index, milestone);
    entry.vesting = Vesting::Schedule(schedule);
    entries.set(index, entry);
    vault::store_beneficiaries(env, owner, &entries);
    Ok(())
}

/// Oracle attests that entry `index`'s release condition is met.
pub fn attest_condition(env: &Env, owner: &Address, index: u32) -> Result<(), ContractError> {
    let (mut entries, mut entry) = vault::load_entry(env, owner, index)?;
    if !entry.conditional {
        return Err(ContractError::InvalidBeneficiary);
    }
    if entry.condition_met {
        return Err(ContractError::AlreadyConfirmed);
    }
    entry.condition_met = true;
    entries.set(index, entry);
    vault::store_beneficiaries(env, owner, &entries);
    Ok(())
}
