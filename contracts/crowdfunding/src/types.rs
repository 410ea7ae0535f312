//! # Types
//!
//! Shared data structures used across all modules of the crowdfunding contract.
//!
//! ## Config / State split
//!
//! The campaign singleton is stored as two separate ledger entries:
//!
//! - [`CampaignConfig`]: written once by `create_campaign`; never mutated.
//! - [`CampaignState`]: written on every donation, vote, claim and refund.
//!
//! The public API exposes the reconstructed [`Campaign`] struct.
//!
//! ## Status as a Finite-State Machine
//!
//! ```text
//! Pending ──► Active ──► Funded ◄──► Vote ──► Canceled
//!               │          │
//!               ▼          ▼
//!            Expired    Completed
//! ```
//!
//! `Expired` and `Canceled` only accept refund claims. `Completed` accepts
//! nothing.

use soroban_sdk::{contracttype, Address, String};

/// Lifecycle status of the campaign. Discriminants are part of the public
/// interface and never change.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum Status {
    /// Deployed, no campaign parameters yet.
    Pending = 0,
    /// Accepting donations until the goal or the deadline is reached.
    Active = 1,
    /// Goal reached; milestones can be posted and claimed.
    Funded = 2,
    /// Deadline passed before the goal was reached.
    Expired = 3,
    /// Donors are voting on the most recently posted milestone.
    Vote = 4,
    /// Donors withdrew confidence; remaining funds are refundable.
    Canceled = 5,
    /// Every milestone has been claimed.
    Completed = 6,
}

impl Status {
    /// Refunds are only possible once the campaign has failed.
    pub fn is_refundable(&self) -> bool {
        matches!(self, Status::Expired | Status::Canceled)
    }
}

/// Immutable campaign parameters, written once by `create_campaign`.
/// Reads as all zeroes while the campaign is `Pending`.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CampaignConfig {
    pub goal: i128,
    pub deadline_height: u32,
    pub milestone_count: u32,
}

/// Mutable campaign state.
///
/// `total_raised` and `total_claimed` are monotonic counters: once the
/// campaign leaves `Active` they form the fixed basis of every refund.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignState {
    pub status: Status,
    pub vote_end_height: u32,
    /// Index of the milestone currently (or last) put to a vote; 0 if none.
    pub active_milestone: u32,
    pub milestones_claimed: u32,
    pub total_raised: i128,
    pub total_claimed: i128,
    pub total_refunded: i128,
}

impl CampaignState {
    pub fn pending() -> Self {
        CampaignState {
            status: Status::Pending,
            vote_end_height: 0,
            active_milestone: 0,
            milestones_claimed: 0,
            total_raised: 0,
            total_claimed: 0,
            total_refunded: 0,
        }
    }
}

/// Full view of the campaign returned by `get_campaign`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Campaign {
    /// Principal allowed to create the campaign, post and claim milestones.
    pub owner: Address,
    /// Settlement asset held in custody.
    pub token: Address,
    /// Target funding amount; 0 while `Pending`.
    pub goal: i128,
    /// Ledger sequence at which an `Active` campaign may be expired.
    pub deadline_height: u32,
    /// Ledger sequence at which an open vote may be closed.
    pub vote_end_height: u32,
    pub milestone_count: u32,
    pub active_milestone: u32,
    pub milestones_claimed: u32,
    pub total_raised: i128,
    pub total_claimed: i128,
    pub total_refunded: i128,
    pub status: Status,
}

/// A posted milestone.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Milestone {
    pub details: String,
    pub claimed: bool,
}

/// Donation-weighted tally for one milestone. The voter set is stored as
/// individual `Voted(index, address)` markers.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct VoteTally {
    pub yes_weight: i128,
    pub no_weight: i128,
}
