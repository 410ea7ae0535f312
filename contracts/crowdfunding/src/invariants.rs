#![allow(dead_code)]

extern crate std;

use crate::campaign;
use crate::types::{Campaign, Status};

/// Money in custody is exactly what was raised minus what has been paid out.
pub fn assert_custody_reconciled(balance: i128, campaign: &Campaign) {
    let expected = campaign.total_raised - campaign.total_claimed - campaign.total_refunded;
    assert_eq!(
        balance, expected,
        "custody out of balance: holds {} but raised {} - claimed {} - refunded {} = {}",
        balance, campaign.total_raised, campaign.total_claimed, campaign.total_refunded, expected
    );
}

/// Payouts never exceed what was raised.
pub fn assert_claimed_within_raised(campaign: &Campaign) {
    assert!(
        campaign.total_claimed <= campaign.total_raised,
        "claimed {} exceeds raised {}",
        campaign.total_claimed,
        campaign.total_raised
    );
}

/// Refunds never exceed what was left after payouts.
pub fn assert_refunds_bounded(campaign: &Campaign) {
    assert!(
        campaign.total_refunded <= campaign.total_raised - campaign.total_claimed,
        "refunded {} exceeds unclaimed {}",
        campaign.total_refunded,
        campaign.total_raised - campaign.total_claimed
    );
}

/// Claim counter stays in range and `Completed` means every milestone paid.
pub fn assert_claims_consistent(campaign: &Campaign) {
    assert!(
        campaign.milestones_claimed <= campaign.milestone_count,
        "{} milestones claimed out of {}",
        campaign.milestones_claimed,
        campaign.milestone_count
    );
    if campaign.status == Status::Completed {
        assert_eq!(campaign.milestones_claimed, campaign.milestone_count);
    }
}

/// An observed status change must be an edge of the lifecycle.
pub fn assert_valid_status_transition(from: Status, to: Status) {
    if from == to {
        return;
    }
    assert!(
        campaign::is_valid_transition(from, to),
        "invalid status transition from {:?} to {:?}",
        from,
        to
    );
}

/// Fields fixed by `create_campaign` never change afterwards.
pub fn assert_immutable_fields(original: &Campaign, current: &Campaign) {
    assert_eq!(original.owner, current.owner, "owner changed");
    assert_eq!(original.token, current.token, "token changed");
    assert_eq!(original.goal, current.goal, "goal changed");
    assert_eq!(
        original.deadline_height, current.deadline_height,
        "deadline changed"
    );
    assert_eq!(
        original.milestone_count, current.milestone_count,
        "milestone count changed"
    );
}

/// `total_raised` never decreases.
pub fn assert_raised_monotonic(before: &Campaign, after: &Campaign) {
    assert!(
        after.total_raised >= before.total_raised,
        "total_raised decreased from {} to {}",
        before.total_raised,
        after.total_raised
    );
}

/// Run all stateless campaign invariants.
pub fn assert_all_campaign_invariants(balance: i128, campaign: &Campaign) {
    assert_custody_reconciled(balance, campaign);
    assert_claimed_within_raised(campaign);
    assert_refunds_bounded(campaign);
    assert_claims_consistent(campaign);
}
