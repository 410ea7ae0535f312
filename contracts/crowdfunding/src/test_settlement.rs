extern crate std;

use soroban_sdk::testutils::Address as _;
use soroban_sdk::Address;

use crate::invariants;
use crate::test::{Setup, DURATION};
use crate::{Error, Status};

/// Post milestone `index` and approve it with `voter`'s majority.
fn approve(s: &Setup, index: u32, voter: &Address) {
    s.client.post_milestone(&s.owner, &s.details("deliverable"), &index);
    assert_eq!(s.client.vote(voter, &index, &true), Status::Funded);
}

/// Post milestone `index` and reject it with `voter`'s majority.
fn reject(s: &Setup, index: u32, voter: &Address) {
    s.client.post_milestone(&s.owner, &s.details("deliverable"), &index);
    assert_eq!(s.client.vote(voter, &index, &false), Status::Canceled);
}

// ── claim_milestone_funds ────────────────────────────────────────────

#[test]
fn test_claim_pays_equal_share() {
    let (s, a, _) = Setup::funded();
    approve(&s, 1, &a);

    assert_eq!(s.client.claim_milestone_funds(&s.owner, &1), 550);

    assert_eq!(s.token.balance(&s.owner), 550);
    assert_eq!(s.client.get_balance(), 550);
    assert_eq!(s.client.get_total_claimed(), 550);
    assert!(s.client.is_milestone_claimed(&1));
    assert_eq!(s.client.get_status(), Status::Funded);
    assert_eq!(s.campaign().milestones_claimed, 1);
    s.check_invariants();
}

#[test]
fn test_claiming_every_milestone_completes() {
    let s = Setup::new();
    s.client.create_campaign(&s.owner, &1_000, &DURATION, &3);
    let backer = s.donor(1_000);
    s.client.donate(&backer, &1_000);

    for index in 1..=3 {
        approve(&s, index, &backer);
        assert_eq!(s.client.claim_milestone_funds(&s.owner, &index), 333);
        s.check_invariants();
    }

    assert_eq!(s.client.get_status(), Status::Completed);
    assert_eq!(s.client.get_total_claimed(), 999);
    // Integer-division remainder stays in custody.
    assert_eq!(s.client.get_balance(), 1);
    assert_eq!(
        s.client.try_claim_milestone_funds(&s.owner, &1),
        Err(Ok(Error::InvalidStatus))
    );
    assert_eq!(s.client.try_claim_refund(&backer), Err(Ok(Error::FrozenFunds)));
}

#[test]
fn test_claim_requires_owner() {
    let (s, a, _) = Setup::funded();
    approve(&s, 1, &a);
    assert_eq!(
        s.client.try_claim_milestone_funds(&a, &1),
        Err(Ok(Error::NotOwner))
    );
    assert!(!s.client.is_milestone_claimed(&1));
    assert_eq!(s.client.get_balance(), 1_100);
}

#[test]
fn test_claim_preconditions() {
    let (s, a, _) = Setup::funded();
    assert_eq!(
        s.client.try_claim_milestone_funds(&s.owner, &0),
        Err(Ok(Error::OutOfBounds))
    );
    assert_eq!(
        s.client.try_claim_milestone_funds(&s.owner, &3),
        Err(Ok(Error::OutOfBounds))
    );
    assert_eq!(
        s.client.try_claim_milestone_funds(&s.owner, &1),
        Err(Ok(Error::MilestoneNotFound))
    );

    s.client.post_milestone(&s.owner, &s.details("Prototype"), &1);
    // Still under vote.
    assert_eq!(
        s.client.try_claim_milestone_funds(&s.owner, &1),
        Err(Ok(Error::InvalidStatus))
    );

    s.client.vote(&a, &1, &true);
    s.client.claim_milestone_funds(&s.owner, &1);
    assert_eq!(
        s.client.try_claim_milestone_funds(&s.owner, &1),
        Err(Ok(Error::AlreadyClaimed))
    );
    assert_eq!(s.client.get_total_claimed(), 550);
}

#[test]
fn test_zero_payout_still_marks_claimed() {
    let s = Setup::new();
    s.client.create_campaign(&s.owner, &1, &DURATION, &3);
    let backer = s.donor(1);
    s.client.donate(&backer, &1);

    approve(&s, 1, &backer);
    assert_eq!(s.client.claim_milestone_funds(&s.owner, &1), 0);
    assert!(s.client.is_milestone_claimed(&1));
    assert_eq!(s.token.balance(&s.owner), 0);
    s.check_invariants();
}

// ── claim_refund ─────────────────────────────────────────────────────

#[test]
fn test_refund_after_cancel_is_pro_rata() {
    let (s, a, b) = Setup::funded();
    approve(&s, 1, &a);
    assert_eq!(s.client.claim_milestone_funds(&s.owner, &1), 550);
    reject(&s, 2, &a);

    // 550 of 1 100 left: everyone gets half back.
    assert_eq!(s.client.claim_refund(&a), 300);
    assert_eq!(s.client.claim_refund(&b), 250);

    assert_eq!(s.token.balance(&a), 300);
    assert_eq!(s.token.balance(&b), 250);
    assert_eq!(s.client.get_balance(), 0);
    assert_eq!(s.client.get_total_refunded(), 550);
    assert_eq!(s.client.get_donation_amount(&a), 0);
    // Historical basis is untouched by refunds.
    assert_eq!(s.client.get_total_raised(), 1_100);
    assert_eq!(s.client.get_total_claimed(), 550);
    s.check_invariants();
}

#[test]
fn test_refund_order_does_not_matter() {
    let (s, a, b) = Setup::funded();
    approve(&s, 1, &a);
    s.client.claim_milestone_funds(&s.owner, &1);
    reject(&s, 2, &a);

    assert_eq!(s.client.claim_refund(&b), 250);
    assert_eq!(s.client.claim_refund(&a), 300);
    s.check_invariants();
}

#[test]
fn test_refund_after_expiry_is_full() {
    let s = Setup::active();
    let a = s.donor(300);
    let b = s.donor(200);
    s.client.donate(&a, &300);
    s.client.donate(&b, &200);
    s.advance(DURATION);
    assert_eq!(s.client.check_deadline(), Status::Expired);

    assert_eq!(s.client.claim_refund(&a), 300);
    assert_eq!(s.client.claim_refund(&b), 200);
    assert_eq!(s.token.balance(&a), 300);
    assert_eq!(s.client.get_balance(), 0);
    s.check_invariants();
}

#[test]
fn test_refund_twice_fails() {
    let s = Setup::active();
    let a = s.donor(300);
    s.client.donate(&a, &300);
    s.advance(DURATION);
    s.client.check_deadline();

    s.client.claim_refund(&a);
    assert_eq!(s.client.try_claim_refund(&a), Err(Ok(Error::NoRefund)));
    assert_eq!(s.token.balance(&a), 300);
}

#[test]
fn test_refund_without_donation() {
    let (s, a, _) = Setup::funded();
    reject(&s, 1, &a);
    let stranger = Address::generate(&s.env);
    assert_eq!(
        s.client.try_claim_refund(&stranger),
        Err(Ok(Error::NoRefund))
    );
}

#[test]
fn test_refund_frozen_outside_terminal_failure() {
    let s = Setup::new();
    let a = s.donor(0);
    assert_eq!(s.client.try_claim_refund(&a), Err(Ok(Error::FrozenFunds)));

    let s = Setup::active();
    let a = s.donor(100);
    s.client.donate(&a, &100);
    assert_eq!(s.client.try_claim_refund(&a), Err(Ok(Error::FrozenFunds)));

    let (s, a, _) = Setup::funded();
    assert_eq!(s.client.try_claim_refund(&a), Err(Ok(Error::FrozenFunds)));
    s.client.post_milestone(&s.owner, &s.details("Prototype"), &1);
    assert_eq!(s.client.try_claim_refund(&a), Err(Ok(Error::FrozenFunds)));
    assert_eq!(s.client.get_donation_amount(&a), 600);
}

#[test]
fn test_truncated_refund_settles_at_zero() {
    let s = Setup::new();
    s.client.create_campaign(&s.owner, &3, &DURATION, &2);
    let a = s.donor(1);
    let b = s.donor(1);
    let c = s.donor(1);
    for who in [&a, &b, &c] {
        s.client.donate(who, &1);
    }

    s.client.post_milestone(&s.owner, &s.details("one"), &1);
    s.client.vote(&a, &1, &true);
    assert_eq!(s.client.vote(&b, &1, &true), Status::Funded);
    assert_eq!(s.client.claim_milestone_funds(&s.owner, &1), 1);

    s.client.post_milestone(&s.owner, &s.details("two"), &2);
    s.client.vote(&a, &2, &false);
    assert_eq!(s.client.vote(&b, &2, &false), Status::Canceled);

    // 1 * (3 - 1) / 3 truncates to zero but still settles the entry.
    assert_eq!(s.client.claim_refund(&a), 0);
    assert_eq!(s.client.get_donation_amount(&a), 0);
    assert_eq!(s.client.try_claim_refund(&a), Err(Ok(Error::NoRefund)));
    assert_eq!(s.client.get_balance(), 2);
    s.check_invariants();
}

#[test]
fn test_forced_cancel_refunds_everything() {
    let (s, a, b) = Setup::funded();
    let before = s.campaign();
    s.client.set_status(&Status::Canceled);

    assert_eq!(s.client.claim_refund(&a), 600);
    assert_eq!(s.client.claim_refund(&b), 500);
    invariants::assert_immutable_fields(&before, &s.campaign());
    s.check_invariants();
}

// ── end to end ───────────────────────────────────────────────────────

#[test]
fn test_two_donor_campaign_end_to_end() {
    let s = Setup::new();
    s.client.create_campaign(&s.owner, &1_000, &100, &2);
    let a = s.donor(600);
    let b = s.donor(500);

    assert_eq!(s.client.donate(&a, &600), 600);
    assert_eq!(s.client.get_status(), Status::Active);
    s.client.donate(&b, &500);
    assert_eq!(s.client.get_status(), Status::Funded);
    assert_eq!(s.client.get_total_raised(), 1_100);

    // 600 of 1 100 is a majority on its own.
    s.client.post_milestone(&s.owner, &s.details("prototype"), &1);
    assert_eq!(s.client.vote(&a, &1, &true), Status::Funded);
    assert_eq!(s.client.claim_milestone_funds(&s.owner, &1), 550);
    assert_eq!(s.client.get_status(), Status::Funded);

    // 500 of 1 100 is not.
    s.client.post_milestone(&s.owner, &s.details("release"), &2);
    assert_eq!(s.client.vote(&b, &2, &false), Status::Vote);
    assert_eq!(s.client.vote(&a, &2, &false), Status::Canceled);

    assert_eq!(s.client.claim_refund(&a), 300);
    assert_eq!(s.client.claim_refund(&b), 250);
    assert_eq!(s.client.try_claim_refund(&a), Err(Ok(Error::NoRefund)));
    assert_eq!(s.token.balance(&s.owner), 550);
    assert_eq!(s.client.get_balance(), 0);
    s.check_invariants();
}
