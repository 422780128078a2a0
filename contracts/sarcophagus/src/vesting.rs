//! Vesting schedules and escrowed shares.
//!
//! A beneficiary entry may carry a [`VestingSchedule`]. When its share is
//! claimed while the age gate is still closed, or when the schedule has
//! milestones, the share is parked in an [`Escrow`] owned by the vault and
//! drawn down through monthly allowances and milestone releases.

use soroban_sdk::{contracttype, symbol_short, Address, Env, String, Symbol, Vec};

use crate::assets::AssetAmounts;
use crate::config::VaultConfig;
use crate::errors::ContractError;

const ESCROW: Symbol = symbol_short!("ESCROW");

const TTL_THRESHOLD: u32 = 5_184_000;
const TTL_EXTEND_TO: u32 = 10_368_000;

pub const MAX_MILESTONES: u32 = 12;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Milestone {
    pub description: String,
    /// Value released when the milestone is claimed, spread across classes.
    pub amount: i128,
    pub achieved: bool,
    pub claimed: bool,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VestingSchedule {
    /// Recipient age at which the whole escrow unlocks.
    pub full_access_age: u32,
    /// Value releasable per allowance period before full access.
    pub monthly_allowance: i128,
    pub milestones: Vec<Milestone>,
}

/// How an entry's share vests. Stored on beneficiary records.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Vesting {
    None,
    Schedule(VestingSchedule),
}

impl Vesting {
    pub fn schedule(&self) -> Option<VestingSchedule> {
        match self {
            Vesting::None => None,
            Vesting::Schedule(s) => Some(s.clone()),
        }
    }
}

impl From<VestingSchedule> for Vesting {
    fn from(schedule: VestingSchedule) -> Self {
        Vesting::Schedule(schedule)
    }
}

impl VestingSchedule {
    pub fn validate(&self, cfg: &VaultConfig) -> Result<(), ContractError> {
        if self.full_access_age == 0 || self.full_access_age > cfg.max_age {
            return Err(ContractError::InvalidAge);
        }
        if self.monthly_allowance < 0 || self.milestones.len() > MAX_MILESTONES {
            return Err(ContractError::InvalidMilestone);
        }
        for m in self.milestones.iter() {
            if m.amount <= 0 || m.achieved || m.claimed {
                return Err(ContractError::InvalidMilestone);
            }
        }
        Ok(())
    }

    /// Whether a claimed share must be escrowed rather than paid out.
    ///
    /// `recipient_age` is `None` when the recipient has no attestation, which
    /// keeps the age gate closed.
    pub fn requires_escrow(&self, recipient_age: Option<u32>) -> bool {
        !self.milestones.is_empty() || recipient_age.map_or(true, |a| a < self.full_access_age)
    }
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Escrow {
    pub total: AssetAmounts,
    pub released: AssetAmounts,
    pub opened_at: u64,
    pub last_allowance_at: u64,
}

impl Escrow {
    pub fn open(total: AssetAmounts, now: u64) -> Self {
        Escrow {
            total,
            released: AssetAmounts::zero(),
            opened_at: now,
            last_allowance_at: now,
        }
    }

    pub fn remaining(&self) -> AssetAmounts {
        self.total.minus(&self.released)
    }

    /// Release up to `value` from what remains and return the per-class
    /// amounts to pay out.
    pub fn release(&mut self, value: i128) -> Result<AssetAmounts, ContractError> {
        let remaining = self.remaining();
        if remaining.is_zero() {
            return Err(ContractError::NothingToRelease);
        }
        let out = remaining.pro_rata(value);
        if out.is_zero() {
            return Err(ContractError::NothingToRelease);
        }
        self.released = self.released.plus(&out);
        Ok(out)
    }

    /// Release whatever an allowance claim at `now` entitles the recipient to.
    ///
    /// Reaching `full_access_age` unlocks everything left. Before that, one
    /// `monthly_allowance` accrues per whole `allowance_period` since the last
    /// allowance, capped at what remains.
    pub fn release_allowance(
        &mut self,
        schedule: &VestingSchedule,
        cfg: &VaultConfig,
        recipient_age: Option<u32>,
        now: u64,
    ) -> Result<AssetAmounts, ContractError> {
        if self.remaining().is_zero() {
            return Err(ContractError::NothingToRelease);
        }
        if recipient_age.map_or(false, |a| a >= schedule.full_access_age) {
            let all = self.remaining().total();
            self.last_allowance_at = now;
            return self.release(all);
        }
        if schedule.monthly_allowance == 0 {
            return Err(ContractError::AllowanceNotDue);
        }
        let periods = now.saturating_sub(self.last_allowance_at) / cfg.allowance_period;
        if periods == 0 {
            return Err(ContractError::AllowanceNotDue);
        }
        self.last_allowance_at = self
            .last_allowance_at
            .saturating_add(periods.saturating_mul(cfg.allowance_period));
        self.release(schedule.monthly_allowance.saturating_mul(periods as i128))
    }
}

fn escrow_key(owner: &Address, index: u32) -> (Symbol, Address, u32) {
    (ESCROW, owner.clone(), index)
}

pub fn load_escrow(env: &Env, owner: &Address, index: u32) -> Option<Escrow> {
    env.storage().persistent().get(&escrow_key(owner, index))
}

pub fn store_escrow(env: &Env, owner: &Address, index: u32, escrow: &Escrow) {
    let key = escrow_key(owner, index);
    env.storage().persistent().set(&key, escrow);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}
