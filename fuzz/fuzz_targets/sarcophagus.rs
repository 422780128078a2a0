#![no_main]

use arbitrary::Arbitrary;
use common::Role;
use libfuzzer_sys::fuzz_target;
use obol::{accrual::YieldConfig, ObolContract, ObolContractClient};
use sarcophagus::{
    AssetRegistry, BeneficiaryInput, SarcophagusContract, SarcophagusContractClient, VaultConfig,
    Vesting,
};
use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token::{self, StellarAssetClient},
    Address, BytesN, Env, Vec as SorobanVec,
};

const DAY: u64 = 86_400;

/// Actions over every owner, oracle and beneficiary entry point.
///
/// Amounts are bounded so deposits pass the minimum and mostly fit the rate
/// limit; indices are reduced modulo the pools below.
#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Deposit { owner: u8, native: u32, stable: u32 },
    Withdraw { owner: u8, native: u32 },
    LockYield { owner: u8, amount: u32 },
    ClaimRewards { owner: u8 },
    Ping { owner: u8 },
    ConfirmDeath { oracle: u8, owner: u8, age: u8 },
    Challenge { owner: u8 },
    Claim { owner: u8, entry: u8 },
    Pause,
    Unpause,
    AdvanceDays { days: u8 },
}

fuzz_target!(|actions: Vec<FuzzAction>| {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(1_700_000_000);

    let admin = Address::generate(&env);
    let native = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let stable = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();

    let vault_id = env.register(SarcophagusContract, ());
    let obol_id = env.register(ObolContract, ());
    let obol = ObolContractClient::new(&env, &obol_id);
    let client = SarcophagusContractClient::new(&env, &vault_id);

    obol.initialize(&admin, &vault_id, &YieldConfig::default_config());
    let mut cfg = VaultConfig::default_config();
    cfg.min_deposit = 1;
    let registry = AssetRegistry {
        native: native.clone(),
        stable: stable.clone(),
        yield_token: obol_id,
    };
    if client.try_initialize(&admin, &registry, &cfg).is_err() {
        return;
    }

    let oracles: Vec<Address> = (0..4).map(|_| Address::generate(&env)).collect();
    for oracle in &oracles {
        client.grant_role(&admin, &Role::Oracle, oracle);
    }
    let proof = BytesN::from_array(&env, &[3u8; 32]);

    // Three estates with 1, 2 and 3 heirs.
    let mut owners = Vec::new();
    let mut heirs: Vec<Vec<Address>> = Vec::new();
    for n in 1..=3u32 {
        let owner = Address::generate(&env);
        client.verify_age(&oracles[0], &owner, &40, &proof);
        let mut inputs = SorobanVec::new(&env);
        let mut mine = Vec::new();
        for i in 0..n {
            let heir = Address::generate(&env);
            let bps = if i + 1 == n { 10_000 - (n - 1) * (10_000 / n) } else { 10_000 / n };
            inputs.push_back(BeneficiaryInput {
                recipient: heir.clone(),
                percentage_bps: bps,
                vesting_duration: 0,
                condition: None,
                guardian: None,
                vesting: Vesting::None,
            });
            mine.push(heir);
        }
        client.create_vault(&owner, &inputs);
        owners.push(owner);
        heirs.push(mine);
    }

    let balance = |token: &Address| token::Client::new(&env, token).balance(&vault_id);

    for action in actions.into_iter() {
        match action {
            FuzzAction::Deposit { owner, native: n, stable: s } => {
                let owner = &owners[owner as usize % owners.len()];
                if n > 0 {
                    StellarAssetClient::new(&env, &native).mint(owner, &(n as i128));
                }
                if s > 0 {
                    StellarAssetClient::new(&env, &stable).mint(owner, &(s as i128));
                }
                let _ = client.try_deposit(owner, &(n as i128), &(s as i128));
            }
            FuzzAction::Withdraw { owner, native: n } => {
                let owner = &owners[owner as usize % owners.len()];
                let _ = client.try_withdraw(owner, &(n as i128), &0);
            }
            FuzzAction::LockYield { owner, amount } => {
                let owner = &owners[owner as usize % owners.len()];
                let _ = client.try_lock_yield_tokens(owner, &(amount as i128));
            }
            FuzzAction::ClaimRewards { owner } => {
                let owner = &owners[owner as usize % owners.len()];
                let _ = client.try_claim_pending_rewards(owner);
            }
            FuzzAction::Ping { owner } => {
                let owner = &owners[owner as usize % owners.len()];
                let _ = client.try_ping(owner);
            }
            FuzzAction::ConfirmDeath { oracle, owner, age } => {
                let owner = &owners[owner as usize % owners.len()];
                let oracle = &oracles[oracle as usize % oracles.len()];
                let died = env.ledger().timestamp();
                let _ = client.try_confirm_death(oracle, owner, &died, &(age as u32));
            }
            FuzzAction::Challenge { owner } => {
                let owner = &owners[owner as usize % owners.len()];
                let _ = client.try_challenge_death(owner);
            }
            FuzzAction::Claim { owner, entry } => {
                let i = owner as usize % owners.len();
                let entry = entry as usize % heirs[i].len();
                let _ = client.try_claim_inheritance(&heirs[i][entry], &owners[i], &(entry as u32));
            }
            FuzzAction::Pause => {
                let _ = client.try_pause(&admin);
            }
            FuzzAction::Unpause => {
                let _ = client.try_unpause(&admin);
            }
            FuzzAction::AdvanceDays { days } => {
                let ts = env.ledger().timestamp().saturating_add(days as u64 * DAY);
                env.ledger().set_timestamp(ts);
            }
        }

        // ── Post-action invariant checks ──
        let mut owed_native = 0i128;
        let mut owed_stable = 0i128;
        for owner in &owners {
            let vault = client.get_vault(owner);
            assert!(
                vault.distributed.native <= vault.locked.native
                    && vault.distributed.stable <= vault.locked.stable,
                "INVARIANT VIOLATION: distributed exceeds locked"
            );
            owed_native += vault.locked.native - vault.distributed.native;
            owed_stable += vault.locked.stable - vault.distributed.stable;

            let entries = client.get_beneficiaries(owner);
            let sum: u32 = entries.iter().map(|e| e.percentage_bps).sum();
            assert_eq!(sum, 10_000, "INVARIANT VIOLATION: split no longer complete");
            if entries.iter().any(|e| e.claimed) {
                assert!(vault.deceased, "INVARIANT VIOLATION: claim against a live owner");
            }
        }
        assert!(
            balance(&native) >= owed_native,
            "INVARIANT VIOLATION: vault short of native"
        );
        assert!(
            balance(&stable) >= owed_stable,
            "INVARIANT VIOLATION: vault short of stable"
        );
        assert!(
            obol.total_supply() <= obol.get_config().supply_cap,
            "INVARIANT VIOLATION: OBOL supply above cap"
        );
    }
});
