extern crate std;

use soroban_sdk::{symbol_short, testutils::Events, vec, IntoVal, TryIntoVal, Val, Vec};

use crate::events::{
    CampaignCreated, DonationReceived, MilestoneClaimed, MilestonePosted, RefundClaimed,
    StatusChanged, VoteCast,
};
use crate::test::{Setup, DURATION, GOAL, MILESTONES, START, VOTE_WINDOW};
use crate::Status;

/// Payload of the most recent event this contract published under `topics`.
fn last_event(s: &Setup, topics: Vec<Val>) -> Val {
    let mut found = None;
    for (contract, event_topics, data) in s.env.events().all().iter() {
        if contract == s.client.address && event_topics == topics {
            found = Some(data);
        }
    }
    found.expect("event not published")
}

fn last_status_change(s: &Setup) -> StatusChanged {
    let topics = vec![&s.env, symbol_short!("status").into_val(&s.env)];
    last_event(s, topics).try_into_val(&s.env).unwrap()
}

#[test]
fn test_campaign_created_event() {
    let s = Setup::new();
    s.client
        .create_campaign(&s.owner, &GOAL, &DURATION, &MILESTONES);

    let topics = vec![&s.env, symbol_short!("created").into_val(&s.env)];
    let event: CampaignCreated = last_event(&s, topics).try_into_val(&s.env).unwrap();
    assert_eq!(
        event,
        CampaignCreated {
            owner: s.owner.clone(),
            goal: GOAL,
            deadline_height: START + DURATION,
            milestone_count: MILESTONES,
        }
    );
    assert_eq!(
        last_status_change(&s),
        StatusChanged {
            from: Status::Pending,
            to: Status::Active,
        }
    );
}

#[test]
fn test_donation_events() {
    let s = Setup::active();
    let donor = s.donor(GOAL);
    s.client.donate(&donor, &GOAL);

    let topics = vec![&s.env, symbol_short!("donated").into_val(&s.env)];
    let event: DonationReceived = last_event(&s, topics).try_into_val(&s.env).unwrap();
    assert_eq!(
        event,
        DonationReceived {
            donor: donor.clone(),
            amount: GOAL,
            total_raised: GOAL,
        }
    );
    assert_eq!(
        last_status_change(&s),
        StatusChanged {
            from: Status::Active,
            to: Status::Funded,
        }
    );
}

#[test]
fn test_expiry_event() {
    let s = Setup::active();
    s.advance(DURATION);
    s.client.check_deadline();
    assert_eq!(
        last_status_change(&s),
        StatusChanged {
            from: Status::Active,
            to: Status::Expired,
        }
    );
}

#[test]
fn test_milestone_events() {
    let (s, a, _) = Setup::funded();
    let details = s.details("Prototype");
    s.client.post_milestone(&s.owner, &details, &1);

    let topics = vec![
        &s.env,
        symbol_short!("posted").into_val(&s.env),
        1u32.into_val(&s.env),
    ];
    let posted: MilestonePosted = last_event(&s, topics).try_into_val(&s.env).unwrap();
    assert_eq!(
        posted,
        MilestonePosted {
            index: 1,
            details,
            vote_end_height: START + VOTE_WINDOW,
        }
    );

    s.client.vote(&a, &1, &true);
    let topics = vec![
        &s.env,
        symbol_short!("voted").into_val(&s.env),
        1u32.into_val(&s.env),
    ];
    let voted: VoteCast = last_event(&s, topics).try_into_val(&s.env).unwrap();
    assert_eq!(
        voted,
        VoteCast {
            index: 1,
            voter: a.clone(),
            confidence: true,
            weight: 600,
        }
    );
    assert_eq!(
        last_status_change(&s),
        StatusChanged {
            from: Status::Vote,
            to: Status::Funded,
        }
    );

    s.client.claim_milestone_funds(&s.owner, &1);
    let topics = vec![
        &s.env,
        symbol_short!("claimed").into_val(&s.env),
        1u32.into_val(&s.env),
    ];
    let claimed: MilestoneClaimed = last_event(&s, topics).try_into_val(&s.env).unwrap();
    assert_eq!(
        claimed,
        MilestoneClaimed {
            index: 1,
            owner: s.owner.clone(),
            amount: 550,
        }
    );
}

#[test]
fn test_refund_event() {
    let (s, a, _) = Setup::funded();
    s.client.post_milestone(&s.owner, &s.details("Prototype"), &1);
    s.client.vote(&a, &1, &false);
    assert_eq!(
        last_status_change(&s),
        StatusChanged {
            from: Status::Vote,
            to: Status::Canceled,
        }
    );

    s.client.claim_refund(&a);
    let topics = vec![&s.env, symbol_short!("refunded").into_val(&s.env)];
    let event: RefundClaimed = last_event(&s, topics).try_into_val(&s.env).unwrap();
    assert_eq!(
        event,
        RefundClaimed {
            donor: a.clone(),
            amount: 600,
        }
    );
}
