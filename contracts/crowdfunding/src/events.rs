//! Contract events.
//!
//! Every state change publishes exactly one event. Topics are a short symbol,
//! followed by the milestone index for milestone-scoped events. Payloads are
//! typed structs so off-chain consumers can decode them field by field.

use soroban_sdk::{contracttype, symbol_short, Address, Env, String};

use crate::types::Status;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignCreated {
    pub owner: Address,
    pub goal: i128,
    pub deadline_height: u32,
    pub milestone_count: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DonationReceived {
    pub donor: Address,
    pub amount: i128,
    pub total_raised: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StatusChanged {
    pub from: Status,
    pub to: Status,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MilestonePosted {
    pub index: u32,
    pub details: String,
    pub vote_end_height: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VoteCast {
    pub index: u32,
    pub voter: Address,
    pub confidence: bool,
    pub weight: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MilestoneClaimed {
    pub index: u32,
    pub owner: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RefundClaimed {
    pub donor: Address,
    pub amount: i128,
}

pub fn emit_campaign_created(env: &Env, event: CampaignCreated) {
    env.events().publish((symbol_short!("created"),), event);
}

pub fn emit_donation_received(env: &Env, donor: Address, amount: i128, total_raised: i128) {
    env.events().publish(
        (symbol_short!("donated"),),
        DonationReceived {
            donor,
            amount,
            total_raised,
        },
    );
}

pub fn emit_status_changed(env: &Env, from: Status, to: Status) {
    env.events()
        .publish((symbol_short!("status"),), StatusChanged { from, to });
}

pub fn emit_milestone_posted(env: &Env, index: u32, details: String, vote_end_height: u32) {
    env.events().publish(
        (symbol_short!("posted"), index),
        MilestonePosted {
            index,
            details,
            vote_end_height,
        },
    );
}

pub fn emit_vote_cast(env: &Env, index: u32, voter: Address, confidence: bool, weight: i128) {
    env.events().publish(
        (symbol_short!("voted"), index),
        VoteCast {
            index,
            voter,
            confidence,
            weight,
        },
    );
}

pub fn emit_milestone_claimed(env: &Env, index: u32, owner: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("claimed"), index),
        MilestoneClaimed {
            index,
            owner,
            amount,
        },
    );
}

pub fn emit_refund_claimed(env: &Env, donor: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("refunded"),),
        RefundClaimed { donor, amount },
    );
}
