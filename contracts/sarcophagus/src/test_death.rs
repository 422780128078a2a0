extern crate std;

use soroban_sdk::{testutils::Address as _, Address};

use crate::test::{Setup, DAY};
use crate::{ContractError, DeathStatus};

#[test]
fn confirmations_accumulate_to_challengeable() {
    let s = Setup::new();
    let (owner, _) = s.funded_vault(&[10_000], 100, 0);
    s.advance(s.cfg.liveness_threshold);
    let died = s.now() - DAY;

    assert_eq!(
        s.client.confirm_death(&s.oracle(0), &owner, &died, &70),
        DeathStatus::Partial
    );
    assert_eq!(
        s.client.confirm_death(&s.oracle(1), &owner, &died, &70),
        DeathStatus::Partial
    );
    assert!(!s.client.get_vault(&owner).deceased);

    assert_eq!(
        s.client.confirm_death(&s.oracle(2), &owner, &died, &70),
        DeathStatus::Challengeable
    );
    let vault = s.client.get_vault(&owner);
    assert!(vault.deceased);
    assert_eq!(vault.death_timestamp, died);
    assert_eq!(vault.age_at_death, 70);

    let record = s.client.get_death_record(&owner).unwrap();
    assert_eq!(record.confirmations.len(), 3);
    assert_eq!(record.challenge_start, Some(s.now()));
}

#[test]
fn same_oracle_counts_once() {
    let s = Setup::new();
    let (owner, _) = s.funded_vault(&[10_000], 100, 0);
    s.advance(s.cfg.liveness_threshold);

    s.client.confirm_death(&s.oracle(0), &owner, &s.now(), &70);
    let res = s
        .client
        .try_confirm_death(&s.oracle(0), &owner, &s.now(), &70);
    assert_eq!(res.unwrap_err().unwrap(), ContractError::AlreadyConfirmed);
    assert_eq!(s.client.get_death_status(&owner), DeathStatus::Partial);
}

#[test]
fn first_confirmation_fixes_the_candidate() {
    let s = Setup::new();
    let (owner, _) = s.funded_vault(&[10_000], 100, 0);
    s.advance(s.cfg.liveness_threshold);
    let first = s.now() - 2 * DAY;

    s.client.confirm_death(&s.oracle(0), &owner, &first, &70);
    s.client.confirm_death(&s.oracle(1), &owner, &s.now(), &71);
    s.client.confirm_death(&s.oracle(2), &owner, &s.now(), &72);

    let vault = s.client.get_vault(&owner);
    assert_eq!(vault.death_timestamp, first);
    assert_eq!(vault.age_at_death, 70);
}

#[test]
fn confirmation_refused_while_owner_active() {
    let s = Setup::new();
    let (owner, _) = s.funded_vault(&[10_000], 100, 0);
    s.advance(s.cfg.liveness_threshold - 1);
    let res = s
        .client
        .try_confirm_death(&s.oracle(0), &owner, &s.now(), &70);
    assert_eq!(res.unwrap_err().unwrap(), ContractError::StillActive);
}

#[test]
fn confirmation_needs_oracle_role_and_valid_age() {
    let s = Setup::new();
    let (owner, _) = s.funded_vault(&[10_000], 100, 0);
    s.advance(s.cfg.liveness_threshold);

    let stranger = Address::generate(&s.env);
    let res = s.client.try_confirm_death(&stranger, &owner, &s.now(), &70);
    assert_eq!(res.unwrap_err().unwrap(), ContractError::Unauthorized);

    let res = s
        .client
        .try_confirm_death(&s.oracle(0), &owner, &s.now(), &0);
    assert_eq!(res.unwrap_err().unwrap(), ContractError::InvalidAge);

    let res = s
        .client
        .try_confirm_death(&s.oracle(0), &Address::generate(&s.env), &s.now(), &70);
    assert_eq!(
        res.unwrap_err().unwrap(),
        ContractError::SarcophagusNotExists
    );
}

#[test]
fn owner_activity_discards_partial_record() {
    let s = Setup::new();
    let (owner, _) = s.funded_vault(&[10_000], 100, 0);
    s.advance(s.cfg.liveness_threshold);

    s.client.confirm_death(&s.oracle(0), &owner, &s.now(), &70);
    s.client.confirm_death(&s.oracle(1), &owner, &s.now(), &70);
    s.client.ping(&owner);

    assert_eq!(s.client.get_death_status(&owner), DeathStatus::None);
    assert!(s.client.get_death_record(&owner).is_none());

    // Liveness restarts from the ping.
    let res = s
        .client
        .try_confirm_death(&s.oracle(2), &owner, &s.now(), &70);
    assert_eq!(res.unwrap_err().unwrap(), ContractError::StillActive);
}

#[test]
fn no_confirmations_after_threshold() {
    let s = Setup::new();
    let (owner, _) = s.funded_vault(&[10_000], 100, 0);
    s.confirm_death(&owner);

    let late = Address::generate(&s.env);
    s.client
        .grant_role(&s.admin, &common::Role::Oracle, &late);
    let res = s.client.try_confirm_death(&late, &owner, &s.now(), &70);
    assert_eq!(
        res.unwrap_err().unwrap(),
        ContractError::DeathAlreadyVerified
    );
}

#[test]
fn challenge_on_day_29_reverts_the_confirmation() {
    let s = Setup::new();
    let (owner, recipients) = s.funded_vault(&[10_000], 100, 0);
    s.confirm_death(&owner);

    s.advance(29 * DAY);
    assert_eq!(s.client.get_death_status(&owner), DeathStatus::Challengeable);
    s.client.challenge_death(&owner);

    let vault = s.client.get_vault(&owner);
    assert!(!vault.deceased);
    assert_eq!(vault.last_activity, s.now());
    assert_eq!(s.client.get_death_status(&owner), DeathStatus::None);

    s.advance(2 * DAY);
    let res = s
        .client
        .try_claim_inheritance(&recipients.get(0).unwrap(), &owner, &0);
    assert_eq!(res.unwrap_err().unwrap(), ContractError::DeathNotVerified);

    // The owner is alive again and can use the vault.
    s.fund(&owner, 10, 0);
    s.client.deposit(&owner, &10, &0);
}

#[test]
fn challenge_is_one_time() {
    let s = Setup::new();
    let (owner, _) = s.funded_vault(&[10_000], 100, 0);
    s.confirm_death(&owner);
    s.client.challenge_death(&owner);

    s.confirm_death(&owner);
    let res = s.client.try_challenge_death(&owner);
    assert_eq!(res.unwrap_err().unwrap(), ContractError::ChallengeAlreadyUsed);
}

#[test]
fn challenge_window_boundaries() {
    let s = Setup::new();
    let (owner, _) = s.funded_vault(&[10_000], 100, 0);

    let res = s.client.try_challenge_death(&owner);
    assert_eq!(res.unwrap_err().unwrap(), ContractError::NotChallengeable);

    s.advance(s.cfg.liveness_threshold);
    s.client.confirm_death(&s.oracle(0), &owner, &s.now(), &70);
    let res = s.client.try_challenge_death(&owner);
    assert_eq!(res.unwrap_err().unwrap(), ContractError::NotChallengeable);

    s.client.confirm_death(&s.oracle(1), &owner, &s.now(), &70);
    s.client.confirm_death(&s.oracle(2), &owner, &s.now(), &70);
    s.advance(s.cfg.dispute_window);
    assert_eq!(s.client.get_death_status(&owner), DeathStatus::Final);
    let res = s.client.try_challenge_death(&owner);
    assert_eq!(res.unwrap_err().unwrap(), ContractError::ChallengePeriodEnded);
}

#[test]
fn claims_wait_for_the_dispute_window() {
    let s = Setup::new();
    let (owner, recipients) = s.funded_vault(&[10_000], 100, 0);
    let heir = recipients.get(0).unwrap();

    s.confirm_death(&owner);
    s.advance(s.cfg.dispute_window - 1);
    let res = s.client.try_claim_inheritance(&heir, &owner, &0);
    assert_eq!(res.unwrap_err().unwrap(), ContractError::InChallengePeriod);

    s.advance(1);
    assert_eq!(s.client.get_death_status(&owner), DeathStatus::Final);
    s.client.claim_inheritance(&heir, &owner, &0);
}

#[test]
fn deceased_owner_cannot_ping() {
    let s = Setup::new();
    let (owner, _) = s.funded_vault(&[10_000], 100, 0);
    s.confirm_death(&owner);
    let res = s.client.try_ping(&owner);
    assert_eq!(
        res.unwrap_err().unwrap(),
        ContractError::DeathAlreadyVerified
    );
}

#[test]
fn pause_blocks_challenge() {
    let s = Setup::new();
    let (owner, _) = s.funded_vault(&[10_000], 100, 0);
    s.confirm_death(&owner);
    s.client.pause(&s.admin);
    let res = s.client.try_challenge_death(&owner);
    assert_eq!(res.unwrap_err().unwrap(), ContractError::Paused);
}
