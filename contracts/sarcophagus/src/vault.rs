//! Vault records and beneficiary lists.

use soroban_sdk::{contracttype, symbol_short, Address, Env, String, Symbol, Vec};

use crate::assets::{AssetAmounts, BPS_DENOMINATOR};
use crate::config::VaultConfig;
use crate::errors::ContractError;
use crate::vesting::Vesting;

const VAULT: Symbol = symbol_short!("VAULT");
const BENEF: Symbol = symbol_short!("BENEF");

const TTL_THRESHOLD: u32 = 5_184_000;
const TTL_EXTEND_TO: u32 = 10_368_000;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VaultRecord {
    pub owner: Address,
    pub locked: AssetAmounts,
    pub created_at: u64,
    pub last_activity: u64,
    pub deceased: bool,
    pub death_timestamp: u64,
    pub age_at_death: u32,
    /// Sum of shares already claimed (paid out or moved into escrow).
    pub distributed: AssetAmounts,
    /// OBOL rewards claimed by the owner or folded into the estate.
    pub rewards_claimed: i128,
    /// Pending OBOL dropped at settlement because the supply cap was reached.
    pub rewards_forfeited: i128,
    /// Set once the estate's pending rewards were harvested and the stake
    /// frozen, which happens on the first claim after death is final.
    pub settled: bool,
}

/// A beneficiary as supplied at vault creation.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BeneficiaryInput {
    pub recipient: Address,
    pub percentage_bps: u32,
    /// Extra delay after death is final before the share can be claimed.
    pub vesting_duration: u64,
    /// Release condition that an oracle must attest, if any.
    pub condition: Option<String>,
    pub guardian: Option<Address>,
    pub vesting: Vesting,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BeneficiaryEntry {
    pub recipient: Address,
    pub percentage_bps: u32,
    pub vesting_duration: u64,
    pub conditional: bool,
    pub condition: String,
    pub condition_met: bool,
    pub guardian: Option<Address>,
    pub vesting: Vesting,
    pub claimed: bool,
}

impl BeneficiaryEntry {
    fn from_input(env: &Env, input: BeneficiaryInput) -> Self {
        let (conditional, condition) = match input.condition {
            Some(text) => (true, text),
            None => (false, String::from_str(env, "")),
        };
        BeneficiaryEntry {
            recipient: input.recipient,
            percentage_bps: input.percentage_bps,
            vesting_duration: input.vesting_duration,
            conditional,
            condition,
            condition_met: false,
            guardian: input.guardian,
            vesting: input.vesting,
            claimed: false,
        }
    }

    /// The recipient or, when one is set, the guardian.
    pub fn may_act(&self, caller: &Address) -> bool {
        *caller == self.recipient || self.guardian.as_ref() == Some(caller)
    }
}

impl VaultRecord {
    pub fn open(owner: &Address, now: u64) -> Self {
        VaultRecord {
            owner: owner.clone(),
            locked: AssetAmounts::zero(),
            created_at: now,
            last_activity: now,
            deceased: false,
            death_timestamp: 0,
            age_at_death: 0,
            distributed: AssetAmounts::zero(),
            rewards_claimed: 0,
            rewards_forfeited: 0,
            settled: false,
        }
    }

    pub fn require_alive(&self) -> Result<(), ContractError> {
        if self.deceased {
            return Err(ContractError::DeathAlreadyVerified);
        }
        Ok(())
    }
}

/// Check a proposed beneficiary list and turn it into stored entries.
pub fn build_beneficiaries(
    env: &Env,
    cfg: &VaultConfig,
    owner: &Address,
    inputs: Vec<BeneficiaryInput>,
) -> Result<Vec<BeneficiaryEntry>, ContractError> {
    let count = inputs.len();
    if count == 0 || count > cfg.max_beneficiaries {
        return Err(ContractError::InvalidBeneficiaryCount);
    }

    let here = env.current_contract_address();
    let mut total_bps: u32 = 0;
    let mut entries: Vec<BeneficiaryEntry> = Vec::new(env);
    for input in inputs.iter() {
        if input.percentage_bps == 0 {
            return Err(ContractError::InvalidPercentages);
        }
        total_bps = total_bps
            .checked_add(input.percentage_bps)
            .ok_or(ContractError::InvalidPercentages)?;

        if input.recipient == *owner || input.recipient == here {
            return Err(ContractError::InvalidAddress);
        }
        if let Some(guardian) = &input.guardian {
            if *guardian == input.recipient || *guardian == here {
                return Err(ContractError::InvalidAddress);
            }
        }
        if entries.iter().any(|e| e.recipient == input.recipient) {
            return Err(ContractError::DuplicateBeneficiary);
        }
        if let Vesting::Schedule(schedule) = &input.vesting {
            schedule.validate(cfg)?;
        }
        entries.push_back(BeneficiaryEntry::from_input(env, input));
    }

    if total_bps as i128 != BPS_DENOMINATOR {
        return Err(ContractError::InvalidPercentages);
    }
    Ok(entries)
}

// ── Storage ───────────────────────────────────────────────────────────────────

fn vault_key(owner: &Address) -> (Symbol, Address) {
    (VAULT, owner.clone())
}

fn benef_key(owner: &Address) -> (Symbol, Address) {
    (BENEF, owner.clone())
}

fn extend(env: &Env, key: &(Symbol, Address)) {
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn exists(env: &Env, owner: &Address) -> bool {
    env.storage().persistent().has(&vault_key(owner))
}

pub fn load(env: &Env, owner: &Address) -> Result<VaultRecord, ContractError> {
    env.storage()
        .persistent()
        .get(&vault_key(owner))
        .ok_or(ContractError::SarcophagusNotExists)
}

pub fn store(env: &Env, record: &VaultRecord) {
    let key = vault_key(&record.owner);
    env.storage().persistent().set(&key, record);
    extend(env, &key);
}

pub fn load_beneficiaries(env: &Env, owner: &Address) -> Result<Vec<BeneficiaryEntry>, ContractError> {
    env.storage()
        .persistent()
        .get(&benef_key(owner))
        .ok_or(ContractError::SarcophagusNotExists)
}

pub fn store_beneficiaries(env: &Env, owner: &Address, entries: &Vec<BeneficiaryEntry>) {
    let key = benef_key(owner);
    env.storage().persistent().set(&key, entries);
    extend(env, &key);
}

pub fn load_entry(
    env: &Env,
    owner: &Address,
    index: u32,
) -> Result<(Vec<BeneficiaryEntry>, BeneficiaryEntry), ContractError> {
    let entries = load_beneficiaries(env, owner)?;
    let entry = entries.get(index).ok_or(ContractError::InvalidBeneficiary)?;
    Ok((entries, entry))
}

pub fn is_registered_recipient(env: &Env, owner: &Address, who: &Address) -> bool {
    load_beneficiaries(env, owner)
        .map(|list| list.iter().any(|e| e.recipient == *who))
        .unwrap_or(false)
}
