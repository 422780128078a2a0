//! Fungible asset classes held by a vault.
//!
//! The vault supports a closed set of classes. Each class names the contract
//! that moves it, and every transfer goes through one explicit `match`.

use soroban_sdk::{contracttype, token, Address, Env};

use crate::config::AssetRegistry;
use crate::errors::ContractError;
use crate::yield_client::{self, ObolClient};

/// Basis-point denominator for shares.
pub const BPS_DENOMINATOR: i128 = 10_000;

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AssetClass {
    /// The network's native asset (via its Stellar asset contract).
    Native,
    /// A fungible stable token.
    Stable,
    /// OBOL reward tokens.
    Yield,
}

pub const ALL_CLASSES: [AssetClass; 3] = [AssetClass::Native, AssetClass::Stable, AssetClass::Yield];

/// One amount per asset class.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AssetAmounts {
    pub native: i128,
    pub stable: i128,
    pub yield_tokens: i128,
}

impl AssetAmounts {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn get(&self, class: AssetClass) -> i128 {
        match class {
            AssetClass::Native => self.native,
            AssetClass::Stable => self.stable,
            AssetClass::Yield => self.yield_tokens,
        }
    }

    pub fn set(&mut self, class: AssetClass, amount: i128) {
        match class {
            AssetClass::Native => self.native = amount,
            AssetClass::Stable => self.stable = amount,
            AssetClass::Yield => self.yield_tokens = amount,
        }
    }

    /// Value that the yield engine stakes on. OBOL itself is not staked.
    pub fn staked(&self) -> i128 {
        self.native.saturating_add(self.stable)
    }

    /// Unit-agnostic sum across classes.
    pub fn total(&self) -> i128 {
        self.native
            .saturating_add(self.stable)
            .saturating_add(self.yield_tokens)
    }

    pub fn is_zero(&self) -> bool {
        self.native == 0 && self.stable == 0 && self.yield_tokens == 0
    }

    pub fn plus(&self, other: &AssetAmounts) -> AssetAmounts {
        AssetAmounts {
            native: self.native.saturating_add(other.native),
            stable: self.stable.saturating_add(other.stable),
            yield_tokens: self.yield_tokens.saturating_add(other.yield_tokens),
        }
    }

    pub fn minus(&self, other: &AssetAmounts) -> AssetAmounts {
        AssetAmounts {
            native: self.native.saturating_sub(other.native),
            stable: self.stable.saturating_sub(other.stable),
            yield_tokens: self.yield_tokens.saturating_sub(other.yield_tokens),
        }
    }

    /// `self × bps / 10 000` per class, rounding down. Dust stays behind.
    pub fn share_bps(&self, bps: u32) -> AssetAmounts {
        let bps = bps as i128;
        AssetAmounts {
            native: self.native.saturating_mul(bps) / BPS_DENOMINATOR,
            stable: self.stable.saturating_mul(bps) / BPS_DENOMINATOR,
            yield_tokens: self.yield_tokens.saturating_mul(bps) / BPS_DENOMINATOR,
        }
    }

    /// Portion of `self` worth `value`, spread pro-rata across classes.
    ///
    /// When `value` covers everything, all of `self` is returned; otherwise
    /// each class gets `amount × value / total`, rounded down.
    pub fn pro_rata(&self, value: i128) -> AssetAmounts {
        let total = self.total();
        if value <= 0 || total <= 0 {
            return AssetAmounts::zero();
        }
        if value >= total {
            return self.clone();
        }
        AssetAmounts {
            native: self.native.saturating_mul(value) / total,
            stable: self.stable.saturating_mul(value) / total,
            yield_tokens: self.yield_tokens.saturating_mul(value) / total,
        }
    }
}

/// Move `amount` of `class` from `from` to `to`.
pub fn transfer(
    env: &Env,
    registry: &AssetRegistry,
    class: AssetClass,
    from: &Address,
    to: &Address,
    amount: i128,
) -> Result<(), ContractError> {
    if amount == 0 {
        return Ok(());
    }
    match class {
        AssetClass::Native => {
            token::Client::new(env, &registry.native).transfer(from, to, &amount);
            Ok(())
        }
        AssetClass::Stable => {
            token::Client::new(env, &registry.stable).transfer(from, to, &amount);
            Ok(())
        }
        AssetClass::Yield => yield_client::settle(
            ObolClient::new(env, &registry.yield_token).try_transfer(from, to, &amount),
        ),
    }
}

/// Pay every non-zero class in `amounts` out of the vault to `to`.
pub fn pay_out(
    env: &Env,
    registry: &AssetRegistry,
    to: &Address,
    amounts: &AssetAmounts,
) -> Result<(), ContractError> {
    let here = env.current_contract_address();
    for class in ALL_CLASSES {
        transfer(env, registry, class, &here, to, amounts.get(class))?;
    }
    Ok(())
}
