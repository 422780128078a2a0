//! Per-owner stake records.

use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::accrual::{accrue, YieldConfig};

const STAKE: Symbol = symbol_short!("STAKE");

// TTL: ~60 days at 5s/ledger
const TTL_THRESHOLD: u32 = 1_036_800;
const TTL_EXTEND_TO: u32 = 2_073_600;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakeRecord {
    /// Mirror of the vault's staked value (native + stable).
    pub locked_value: i128,
    pub stake_start: u64,
    pub last_claim_time: u64,
    /// Accrual is integrated up to this instant; later time is pending.
    pub last_accrual_time: u64,
    /// Accrued at earlier locked values and not yet claimed.
    pub unclaimed: i128,
    /// Deposit bonuses plus claimed rewards; never decreases.
    pub total_earned: i128,
    pub long_term_holder: bool,
}

impl StakeRecord {
    pub fn open(now: u64) -> Self {
        StakeRecord {
            locked_value: 0,
            stake_start: now,
            last_claim_time: now,
            last_accrual_time: now,
            unclaimed: 0,
            total_earned: 0,
            long_term_holder: false,
        }
    }

    /// Pending rewards at `now`, without mutating the record.
    pub fn pending(&self, now: u64, cfg: &YieldConfig) -> i128 {
        self.unclaimed.saturating_add(accrue(
            self.locked_value,
            self.last_accrual_time,
            now,
            self.stake_start,
            cfg,
        ))
    }

    /// Fold accrual up to `now` into `unclaimed` so that the locked value can
    /// change without re-pricing past time.
    pub fn checkpoint(&mut self, now: u64, cfg: &YieldConfig) {
        if now > self.last_accrual_time {
            self.unclaimed = self.pending(now, cfg);
            self.last_accrual_time = now;
        }
        self.long_term_holder = self.locked_value > 0
            && now >= self.stake_start.saturating_add(cfg.long_term_threshold);
    }

    /// Resynchronise with the vault's locked value at `now`.
    ///
    /// A stake that had drained to zero restarts its holding clock.
    pub fn sync_locked(&mut self, new_locked: i128, now: u64, cfg: &YieldConfig) {
        self.checkpoint(now, cfg);
        if self.locked_value == 0 && new_locked > 0 {
            self.stake_start = now;
        }
        self.locked_value = new_locked;
        self.long_term_holder = self.locked_value > 0
            && now >= self.stake_start.saturating_add(cfg.long_term_threshold);
    }
}

fn stake_key(owner: &Address) -> (Symbol, Address) {
    (STAKE, owner.clone())
}

pub(crate) fn load(env: &Env, owner: &Address) -> Option<StakeRecord> {
    env.storage().persistent().get(&stake_key(owner))
}

pub(crate) fn store(env: &Env, owner: &Address, record: &StakeRecord) {
    let key = stake_key(owner);
    env.storage().persistent().set(&key, record);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}
