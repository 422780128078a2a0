//! Continuous reward accrual with a long-term bonus tier.
//!
//! ## Formula
//! ```text
//! boundary   = stake_start + long_term_threshold
//! base_secs  = |[from, to) ∩ [.., boundary)|
//! bonus_secs = |[from, to) ∩ [boundary, ..)|
//! reward     = locked × (base_ppm × base_secs + bonus_ppm × bonus_secs)
//!              / (1 000 000 × 86 400)
//! ```
//! Rates are expressed in parts-per-million of the locked value per day, and
//! time is integrated per second so that accrual is monotone in `to`.
//! A span that straddles the boundary is split; time already elapsed before
//! the boundary is never re-priced at the bonus rate.

use soroban_sdk::contracttype;

/// Seconds in one day.
pub const SECS_PER_DAY: u64 = 86_400;
/// Denominator of `*_rate_ppm`.
pub const RATE_SCALE: i128 = 1_000_000;
/// Denominator of `initial_bonus_bps`.
pub const BPS_SCALE: i128 = 10_000;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct YieldConfig {
    /// Bonus minted on every deposit event, in basis points of the deposit.
    pub initial_bonus_bps: u32,
    /// Daily accrual rate before the long-term threshold (ppm / day).
    pub base_rate_ppm: u32,
    /// Daily accrual rate after the long-term threshold (ppm / day).
    pub bonus_rate_ppm: u32,
    /// Holding time after which the bonus rate applies, in seconds.
    pub long_term_threshold: u64,
    /// Hard ceiling on OBOL ever minted.
    pub supply_cap: i128,
}

impl YieldConfig {
    /// 5 % deposit bonus, 0.01 %/day base, 0.015 %/day after one year,
    /// 100 M OBOL (7 decimals) cap.
    pub fn default_config() -> Self {
        YieldConfig {
            initial_bonus_bps: 500,
            base_rate_ppm: 100,
            bonus_rate_ppm: 150,
            long_term_threshold: 365 * SECS_PER_DAY,
            supply_cap: 100_000_000 * 10_000_000,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.initial_bonus_bps as i128 <= BPS_SCALE
            && self.bonus_rate_ppm >= self.base_rate_ppm
            && self.supply_cap > 0
    }
}

/// Split `[from, to)` into (seconds before, seconds at-or-after) `boundary`.
pub fn split_at_boundary(from: u64, to: u64, boundary: u64) -> (u64, u64) {
    if to <= from {
        return (0, 0);
    }
    let base = if from < boundary {
        to.min(boundary) - from
    } else {
        0
    };
    let bonus = to - from.max(boundary).min(to);
    (base, bonus)
}

/// Reward accrued by `locked` over `[from, to)` for a stake that began at
/// `stake_start`.
pub fn accrue(locked: i128, from: u64, to: u64, stake_start: u64, cfg: &YieldConfig) -> i128 {
    if locked <= 0 {
        return 0;
    }
    let boundary = stake_start.saturating_add(cfg.long_term_threshold);
    let (base_secs, bonus_secs) = split_at_boundary(from, to, boundary);

    let weighted = (cfg.base_rate_ppm as i128)
        .saturating_mul(base_secs as i128)
        .saturating_add((cfg.bonus_rate_ppm as i128).saturating_mul(bonus_secs as i128));

    locked.saturating_mul(weighted) / (RATE_SCALE * SECS_PER_DAY as i128)
}

/// Initial bonus for a deposit of `amount`.
pub fn initial_bonus(amount: i128, cfg: &YieldConfig) -> i128 {
    if amount <= 0 {
        return 0;
    }
    amount.saturating_mul(cfg.initial_bonus_bps as i128) / BPS_SCALE
}
