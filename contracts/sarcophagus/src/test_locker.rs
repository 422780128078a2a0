extern crate std;

use soroban_sdk::{testutils::Address as _, Address, Vec};

use crate::test::{plain, Setup};
use crate::{AssetKey, ContractError};

const TOKEN: u64 = 7;

/// Vault with two heirs, a whitelisted collection and one minted item.
fn setup() -> (Setup, Address, Vec<Address>) {
    let s = Setup::new().without_accrual();
    let (owner, heirs) = s.funded_vault(&[5_000, 5_000], 100, 0);
    s.client
        .whitelist_asset_collection(&s.admin, &s.collection.address, &1_000);
    s.client.update_global_max_asset_value(&s.admin, &5_000);
    s.collection.mint(&owner, &TOKEN);
    (s, owner, heirs)
}

#[test]
fn lock_moves_item_into_vault() {
    let (s, owner, heirs) = setup();
    let heir = heirs.get(0).unwrap();
    s.client
        .lock_asset(&owner, &s.collection.address, &TOKEN, &heir, &800);

    assert_eq!(
        s.collection.owner_of(&TOKEN),
        Some(s.client.address.clone())
    );
    let asset = s
        .client
        .get_locked_asset(&s.collection.address, &TOKEN)
        .unwrap();
    assert!(asset.locked);
    assert_eq!(asset.beneficiary, heir);
    assert_eq!(s.client.get_vault_asset_value(&owner), 800);
    assert_eq!(
        s.client.get_locked_assets(&owner).get(0).unwrap(),
        AssetKey {
            collection: s.collection.address.clone(),
            token_id: TOKEN,
        }
    );

    let res = s
        .client
        .try_lock_asset(&owner, &s.collection.address, &TOKEN, &heir, &800);
    assert_eq!(res.unwrap_err().unwrap(), ContractError::AssetAlreadyLocked);
}

#[test]
fn lock_checks_whitelist_and_caps() {
    let (s, owner, heirs) = setup();
    let heir = heirs.get(0).unwrap();
    let stray = Address::generate(&s.env);

    let res = s.client.try_lock_asset(&owner, &stray, &TOKEN, &heir, &10);
    assert_eq!(
        res.unwrap_err().unwrap(),
        ContractError::CollectionNotWhitelisted
    );

    let res = s
        .client
        .try_lock_asset(&owner, &s.collection.address, &TOKEN, &heir, &0);
    assert_eq!(res.unwrap_err().unwrap(), ContractError::InvalidAmount);

    let res = s
        .client
        .try_lock_asset(&owner, &s.collection.address, &TOKEN, &heir, &1_001);
    assert_eq!(res.unwrap_err().unwrap(), ContractError::AssetValueTooHigh);

    // The global ceiling applies on top of the collection's.
    s.client.update_global_max_asset_value(&s.admin, &500);
    let res = s
        .client
        .try_lock_asset(&owner, &s.collection.address, &TOKEN, &heir, &600);
    assert_eq!(res.unwrap_err().unwrap(), ContractError::AssetValueTooHigh);
    s.client
        .lock_asset(&owner, &s.collection.address, &TOKEN, &heir, &500);
}

#[test]
fn lock_requires_registered_beneficiary_and_ownership() {
    let (s, owner, heirs) = setup();
    let outsider = Address::generate(&s.env);

    let res = s
        .client
        .try_lock_asset(&owner, &s.collection.address, &TOKEN, &outsider, &10);
    assert_eq!(res.unwrap_err().unwrap(), ContractError::InvalidBeneficiary);

    let res = s.client.try_lock_asset(
        &owner,
        &s.collection.address,
        &(TOKEN + 1),
        &heirs.get(0).unwrap(),
        &10,
    );
    assert_eq!(res.unwrap_err().unwrap(), ContractError::AssetNotFound);
}

#[test]
fn unlock_returns_item_and_drops_value() {
    let (s, owner, heirs) = setup();
    s.client.lock_asset(
        &owner,
        &s.collection.address,
        &TOKEN,
        &heirs.get(0).unwrap(),
        &800,
    );

    let other = Address::generate(&s.env);
    let res = s
        .client
        .try_unlock_asset(&other, &s.collection.address, &TOKEN);
    assert_eq!(
        res.unwrap_err().unwrap(),
        ContractError::SarcophagusNotExists
    );

    s.client
        .unlock_asset(&owner, &s.collection.address, &TOKEN);
    assert_eq!(s.collection.owner_of(&TOKEN), Some(owner.clone()));
    assert_eq!(s.client.get_vault_asset_value(&owner), 0);
    assert!(s
        .client
        .get_locked_asset(&s.collection.address, &TOKEN)
        .is_none());
    assert!(s.client.get_locked_assets(&owner).is_empty());

    let res = s
        .client
        .try_unlock_asset(&owner, &s.collection.address, &TOKEN);
    assert_eq!(res.unwrap_err().unwrap(), ContractError::AssetNotFound);
}

#[test]
fn delisting_keeps_locked_items() {
    let (s, owner, heirs) = setup();
    let heir = heirs.get(0).unwrap();
    s.client
        .lock_asset(&owner, &s.collection.address, &TOKEN, &heir, &800);
    s.client
        .remove_asset_collection(&s.admin, &s.collection.address);
    assert_eq!(s.client.get_collection_cap(&s.collection.address), None);

    assert_eq!(s.client.get_vault_asset_value(&owner), 800);
    s.collection.mint(&owner, &(TOKEN + 1));
    let res = s
        .client
        .try_lock_asset(&owner, &s.collection.address, &(TOKEN + 1), &heir, &10);
    assert_eq!(
        res.unwrap_err().unwrap(),
        ContractError::CollectionNotWhitelisted
    );
}

#[test]
fn reassign_only_to_registered_recipient() {
    let (s, owner, heirs) = setup();
    let a = heirs.get(0).unwrap();
    let b = heirs.get(1).unwrap();
    s.client
        .lock_asset(&owner, &s.collection.address, &TOKEN, &a, &800);

    let res = s.client.try_reassign_beneficiary(
        &owner,
        &s.collection.address,
        &TOKEN,
        &Address::generate(&s.env),
    );
    assert_eq!(res.unwrap_err().unwrap(), ContractError::InvalidBeneficiary);

    s.client
        .reassign_beneficiary(&owner, &s.collection.address, &TOKEN, &b);
    let asset = s
        .client
        .get_locked_asset(&s.collection.address, &TOKEN)
        .unwrap();
    assert_eq!(asset.beneficiary, b);
}

#[test]
fn claim_releases_items_to_their_beneficiary() {
    let (s, owner, heirs) = setup();
    let a = heirs.get(0).unwrap();
    let b = heirs.get(1).unwrap();
    s.collection.mint(&owner, &(TOKEN + 1));
    s.client
        .lock_asset(&owner, &s.collection.address, &TOKEN, &a, &800);
    s.client
        .lock_asset(&owner, &s.collection.address, &(TOKEN + 1), &b, &300);
    assert_eq!(s.client.get_vault_asset_value(&owner), 1_100);

    s.finalize_death(&owner);
    s.client.claim_inheritance(&a, &owner, &0);

    assert_eq!(s.collection.owner_of(&TOKEN), Some(a.clone()));
    assert_eq!(
        s.collection.owner_of(&(TOKEN + 1)),
        Some(s.client.address.clone())
    );
    let released = s
        .client
        .get_locked_asset(&s.collection.address, &TOKEN)
        .unwrap();
    assert!(!released.locked);
    assert_eq!(s.client.get_vault_asset_value(&owner), 300);

    s.client.claim_inheritance(&b, &owner, &1);
    assert_eq!(s.collection.owner_of(&(TOKEN + 1)), Some(b));
    assert_eq!(s.client.get_vault_asset_value(&owner), 0);
}

#[test]
fn relocked_item_stays_out_of_the_old_estate() {
    let (s, owner, heirs) = setup();
    let a = heirs.get(0).unwrap();
    let b = heirs.get(1).unwrap();
    s.collection.mint(&owner, &(TOKEN + 1));
    s.client
        .lock_asset(&owner, &s.collection.address, &TOKEN, &a, &800);
    s.client
        .lock_asset(&owner, &s.collection.address, &(TOKEN + 1), &b, &300);

    s.finalize_death(&owner);
    s.client.claim_inheritance(&a, &owner, &0);
    assert_eq!(s.client.get_locked_assets(&owner).len(), 1);

    // The heir locks the inherited item in a vault of their own.
    s.verify(&a, 40);
    s.client
        .create_vault(&a, &soroban_sdk::vec![&s.env, plain(&b, 10_000)]);
    s.client
        .lock_asset(&a, &s.collection.address, &TOKEN, &b, &800);
    assert_eq!(s.client.get_vault_asset_value(&owner), 300);
    assert_eq!(s.client.get_vault_asset_value(&a), 800);

    s.client.claim_inheritance(&b, &owner, &1);
    assert_eq!(s.collection.owner_of(&(TOKEN + 1)), Some(b.clone()));
    assert_eq!(
        s.collection.owner_of(&TOKEN),
        Some(s.client.address.clone())
    );
    let relocked = s
        .client
        .get_locked_asset(&s.collection.address, &TOKEN)
        .unwrap();
    assert!(relocked.locked);
    assert_eq!(relocked.owner, a);
    assert_eq!(s.client.get_vault_asset_value(&a), 800);
    assert!(s.client.get_locked_assets(&owner).is_empty());
}

#[test]
fn locker_closed_after_death_confirmed() {
    let (s, owner, heirs) = setup();
    s.confirm_death(&owner);
    let res = s.client.try_lock_asset(
        &owner,
        &s.collection.address,
        &TOKEN,
        &heirs.get(0).unwrap(),
        &10,
    );
    assert_eq!(
        res.unwrap_err().unwrap(),
        ContractError::DeathAlreadyVerified
    );
}

#[test]
fn whitelist_is_admin_only() {
    let (s, _, _) = setup();
    let stranger = Address::generate(&s.env);
    let res = s
        .client
        .try_whitelist_asset_collection(&stranger, &s.collection.address, &10);
    assert_eq!(res.unwrap_err().unwrap(), ContractError::Unauthorized);
    let res = s
        .client
        .try_whitelist_asset_collection(&s.admin, &s.collection.address, &0);
    assert_eq!(res.unwrap_err().unwrap(), ContractError::InvalidAmount);
}
