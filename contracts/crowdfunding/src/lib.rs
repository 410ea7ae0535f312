//! # Crowdfunding Contract
//!
//! A single milestone-gated crowdfunding campaign. Donors pledge the native
//! settlement asset toward a goal; once funded, the owner releases the money
//! one milestone at a time, each release gated behind a donation-weighted
//! vote. Failed campaigns refund donors pro rata.
//!
//! | Phase        | Entry Point(s)                                         |
//! |--------------|--------------------------------------------------------|
//! | Bootstrap    | [`Crowdfunding::init`]                                 |
//! | Setup        | [`Crowdfunding::create_campaign`]                      |
//! | Funding      | [`Crowdfunding::donate`], `check_deadline`             |
//! | Milestones   | `post_milestone`, `vote`, `check_vote_deadline`        |
//! | Settlement   | `claim_milestone_funds`, `claim_refund`                |
//! | Queries      | `get_status`, `get_campaign`, `get_donation_amount`, … |
//!
//! ## Architecture
//!
//! Storage access lives in [`storage`], token movement in [`custody`], and
//! the arithmetic of each concern in [`donations`], [`milestones`] and
//! [`voting`]. Status changes go through [`campaign::transition`]. This file
//! holds the entry points: each one runs every check before its first write.

#![no_std]

use soroban_sdk::{contract, contracterror, contractimpl, log, Address, Env, String};

mod campaign;
mod custody;
mod donations;
pub mod events;
mod milestones;
mod storage;
mod types;
mod voting;

#[cfg(any(test, feature = "testutils"))]
mod test_support;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_events;
#[cfg(test)]
mod test_settlement;

pub use milestones::MAX_DETAILS_LEN;
pub use storage::DAY_IN_LEDGERS;
pub use types::{Campaign, Milestone, Status, VoteTally};

use types::CampaignConfig;

/// Vote window deployers use when they have no reason to pick another.
pub const DEFAULT_VOTE_WINDOW: u32 = DAY_IN_LEDGERS;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    NotOwner = 400,
    AlreadyCreated = 401,
    ZeroTargetGoal = 402,
    ZeroDuration = 403,
    ZeroMilestones = 404,
    ZeroDonation = 405,
    NotActive = 406,
    NotEnoughFunds = 407,
    Overflow = 408,
    FrozenFunds = 409,
    NoRefund = 410,
    AlreadyPosted = 411,
    OutOfBounds = 412,
    MilestoneNotFound = 413,
    EmptyDetails = 414,
    InvalidStatus = 415,
    NoDonation = 416,
    AlreadyVoted = 417,
    DetailsTooLong = 418,
    AlreadyClaimed = 419,
    AlreadyInitialized = 420,
    NotInitialized = 421,
}

#[contract]
pub struct Crowdfunding;

#[contractimpl]
impl Crowdfunding {
    // ─────────────────────────────────────────────────────────
    // Bootstrap
    // ─────────────────────────────────────────────────────────

    /// Record the owner, the settlement asset and the vote window.
    ///
    /// Must be called exactly once right after deployment. The campaign stays
    /// `Pending` until the owner calls [`Crowdfunding::create_campaign`].
    pub fn init(env: Env, owner: Address, token: Address, vote_window: u32) -> Result<(), Error> {
        if storage::is_initialized(&env) {
            return Err(Error::AlreadyInitialized);
        }
        if vote_window == 0 {
            return Err(Error::ZeroDuration);
        }
        owner.require_auth();
        storage::save_settings(&env, &owner, &token, vote_window);
        Ok(())
    }

    /// Start the campaign: `Pending -> Active`.
    ///
    /// Returns the ledger sequence at which the funding deadline falls.
    pub fn create_campaign(
        env: Env,
        caller: Address,
        goal: i128,
        duration: u32,
        milestone_count: u32,
    ) -> Result<u32, Error> {
        caller.require_auth();
        Self::require_owner(&env, &caller)?;

        let mut state = storage::load_state(&env);
        campaign::require_status(&state, Status::Pending, Error::AlreadyCreated)?;

        if goal <= 0 {
            return Err(Error::ZeroTargetGoal);
        }
        if duration == 0 {
            return Err(Error::ZeroDuration);
        }
        if milestone_count == 0 {
            return Err(Error::ZeroMilestones);
        }
        let deadline_height = env
            .ledger()
            .sequence()
            .checked_add(duration)
            .ok_or(Error::Overflow)?;

        let config = CampaignConfig {
            goal,
            deadline_height,
            milestone_count,
        };
        storage::save_config(&env, &config);
        events::emit_campaign_created(
            &env,
            events::CampaignCreated {
                owner: caller,
                goal,
                deadline_height,
                milestone_count,
            },
        );
        campaign::transition(&env, &mut state, Status::Active)?;
        storage::save_state(&env, &state);

        Ok(deadline_height)
    }

    /// Pledge `amount` of the settlement asset. The donation that reaches the
    /// goal moves the campaign to `Funded`.
    pub fn donate(env: Env, donor: Address, amount: i128) -> Result<i128, Error> {
        donor.require_auth();

        let config = storage::load_config(&env);
        let mut state = storage::load_state(&env);
        campaign::require_status(&state, Status::Active, Error::NotActive)?;
        if amount <= 0 {
            return Err(Error::ZeroDonation);
        }
        let (donor_total, total_raised) = donations::accept(
            storage::get_donation(&env, &donor),
            state.total_raised,
            amount,
        )?;

        custody::collect(&env, &donor, amount)?;

        storage::set_donation(&env, &donor, donor_total);
        state.total_raised = total_raised;
        events::emit_donation_received(&env, donor, amount, total_raised);
        if total_raised >= config.goal {
            campaign::transition(&env, &mut state, Status::Funded)?;
        }
        storage::save_state(&env, &state);

        Ok(amount)
    }

    /// Expire an `Active` campaign whose deadline has been reached.
    /// Any other status is returned unchanged.
    pub fn check_deadline(env: Env) -> Result<Status, Error> {
        let mut state = storage::load_state(&env);
        if state.status != Status::Active {
            return Ok(state.status);
        }
        let config = storage::load_config(&env);
        let now = env.ledger().sequence();
        if now >= config.deadline_height {
            log!(&env, "funding deadline reached", now, config.deadline_height);
            campaign::transition(&env, &mut state, Status::Expired)?;
            storage::save_state(&env, &state);
        }
        Ok(state.status)
    }

    /// Close an expired vote. An inconclusive vote returns the campaign to
    /// `Funded`. Any status other than `Vote` is returned unchanged.
    pub fn check_vote_deadline(env: Env) -> Result<Status, Error> {
        let mut state = storage::load_state(&env);
        if state.status != Status::Vote {
            return Ok(state.status);
        }
        let now = env.ledger().sequence();
        if now >= state.vote_end_height {
            log!(&env, "vote window closed", state.active_milestone, now);
            campaign::transition(&env, &mut state, Status::Funded)?;
            storage::save_state(&env, &state);
        }
        Ok(state.status)
    }

    // ─────────────────────────────────────────────────────────
    // Milestones
    // ─────────────────────────────────────────────────────────

    /// Publish milestone `index` and open a vote on it: `Funded -> Vote`.
    ///
    /// Returns the ledger sequence at which the vote may be closed.
    pub fn post_milestone(
        env: Env,
        caller: Address,
        details: String,
        index: u32,
    ) -> Result<u32, Error> {
        caller.require_auth();
        Self::require_owner(&env, &caller)?;

        let mut state = storage::load_state(&env);
        campaign::require_status(&state, Status::Funded, Error::InvalidStatus)?;
        let config = storage::load_config(&env);
        milestones::check_index(&config, index)?;
        milestones::check_details(&details)?;
        if storage::load_milestone(&env, index).is_some() {
            return Err(Error::AlreadyPosted);
        }
        let vote_end_height = env
            .ledger()
            .sequence()
            .checked_add(storage::get_vote_window(&env))
            .ok_or(Error::Overflow)?;

        storage::save_milestone(
            &env,
            index,
            &Milestone {
                details: details.clone(),
                claimed: false,
            },
        );
        storage::save_tally(&env, index, &VoteTally::default());
        state.vote_end_height = vote_end_height;
        state.active_milestone = index;
        events::emit_milestone_posted(&env, index, details, vote_end_height);
        campaign::transition(&env, &mut state, Status::Vote)?;
        storage::save_state(&env, &state);

        Ok(vote_end_height)
    }

    /// Vote on the milestone under review, weighted by the caller's
    /// cumulative donation. Returns the status after the vote is counted.
    pub fn vote(env: Env, voter: Address, index: u32, confidence: bool) -> Result<Status, Error> {
        voter.require_auth();

        let mut state = storage::load_state(&env);
        campaign::require_status(&state, Status::Vote, Error::InvalidStatus)?;
        let config = storage::load_config(&env);
        milestones::check_index(&config, index)?;
        milestones::require_posted(&env, index)?;
        // Only the open milestone is votable; decided tallies stay frozen.
        if index != state.active_milestone {
            return Err(Error::InvalidStatus);
        }
        let weight = storage::get_donation(&env, &voter);
        if weight <= 0 {
            return Err(Error::NoDonation);
        }
        if storage::has_voted(&env, index, &voter) {
            return Err(Error::AlreadyVoted);
        }
        let tally = storage::load_tally(&env, index).unwrap_or_default();
        let tally = voting::cast(&tally, weight, confidence)?;

        storage::save_tally(&env, index, &tally);
        storage::mark_voted(&env, index, &voter);
        events::emit_vote_cast(&env, index, voter, confidence, weight);
        if let Some(outcome) = voting::decide(&tally, state.total_raised) {
            campaign::transition(&env, &mut state, outcome)?;
            storage::save_state(&env, &state);
        }

        Ok(state.status)
    }

    /// Release the payout of an approved milestone to the owner. The last
    /// claim completes the campaign. Returns the amount paid.
    pub fn claim_milestone_funds(env: Env, caller: Address, index: u32) -> Result<i128, Error> {
        caller.require_auth();
        Self::require_owner(&env, &caller)?;

        let mut state = storage::load_state(&env);
        campaign::require_status(&state, Status::Funded, Error::InvalidStatus)?;
        let config = storage::load_config(&env);
        milestones::check_index(&config, index)?;
        let mut milestone = milestones::require_posted(&env, index)?;
        if milestone.claimed {
            return Err(Error::AlreadyClaimed);
        }
        let amount = milestones::payout(state.total_raised, config.milestone_count);
        let total_claimed = state
            .total_claimed
            .checked_add(amount)
            .ok_or(Error::Overflow)?;
        let milestones_claimed = state
            .milestones_claimed
            .checked_add(1)
            .ok_or(Error::Overflow)?;

        custody::release(&env, &caller, amount)?;

        milestone.claimed = true;
        storage::save_milestone(&env, index, &milestone);
        state.total_claimed = total_claimed;
        state.milestones_claimed = milestones_claimed;
        events::emit_milestone_claimed(&env, index, caller, amount);
        if milestones_claimed >= config.milestone_count {
            campaign::transition(&env, &mut state, Status::Completed)?;
        }
        storage::save_state(&env, &state);

        Ok(amount)
    }

    // ─────────────────────────────────────────────────────────
    // Refunds
    // ─────────────────────────────────────────────────────────

    /// Refund the caller's share of the unclaimed funds of an expired or
    /// canceled campaign. Returns the amount paid.
    pub fn claim_refund(env: Env, donor: Address) -> Result<i128, Error> {
        donor.require_auth();

        let mut state = storage::load_state(&env);
        if !state.status.is_refundable() {
            return Err(Error::FrozenFunds);
        }
        let amount = donations::refund_amount(
            storage::get_donation(&env, &donor),
            state.total_raised,
            state.total_claimed,
        )?;
        let total_refunded = state
            .total_refunded
            .checked_add(amount)
            .ok_or(Error::Overflow)?;

        custody::release(&env, &donor, amount)?;

        storage::clear_donation(&env, &donor);
        state.total_refunded = total_refunded;
        storage::save_state(&env, &state);
        events::emit_refund_claimed(&env, donor, amount);

        Ok(amount)
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    pub fn get_status(env: Env) -> Status {
        storage::load_state(&env).status
    }

    pub fn get_funding_goal(env: Env) -> i128 {
        storage::load_config(&env).goal
    }

    pub fn get_deadline_block_height(env: Env) -> u32 {
        storage::load_config(&env).deadline_height
    }

    pub fn get_vote_end_block_height(env: Env) -> u32 {
        storage::load_state(&env).vote_end_height
    }

    pub fn get_num_of_milestones(env: Env) -> u32 {
        storage::load_config(&env).milestone_count
    }

    /// Cumulative donation of `donor`; 0 once refunded.
    pub fn get_donation_amount(env: Env, donor: Address) -> i128 {
        storage::get_donation(&env, &donor)
    }

    /// Details of milestone `index`, or `None` if it has not been posted.
    pub fn get_milestone(env: Env, index: u32) -> Option<String> {
        storage::load_milestone(&env, index).map(|m| m.details)
    }

    pub fn is_milestone_claimed(env: Env, index: u32) -> bool {
        storage::load_milestone(&env, index)
            .map(|m| m.claimed)
            .unwrap_or(false)
    }

    /// Custody balance of the settlement asset; 0 before `init`.
    pub fn get_balance(env: Env) -> i128 {
        custody::balance(&env).unwrap_or(0)
    }

    pub fn get_campaign(env: Env) -> Result<Campaign, Error> {
        storage::load_campaign(&env)
    }

    pub fn get_total_raised(env: Env) -> i128 {
        storage::load_state(&env).total_raised
    }

    pub fn get_total_claimed(env: Env) -> i128 {
        storage::load_state(&env).total_claimed
    }

    pub fn get_total_refunded(env: Env) -> i128 {
        storage::load_state(&env).total_refunded
    }

    pub fn get_active_milestone(env: Env) -> u32 {
        storage::load_state(&env).active_milestone
    }

    pub fn get_owner(env: Env) -> Option<Address> {
        storage::get_owner(&env).ok()
    }

    pub fn get_token(env: Env) -> Option<Address> {
        storage::get_token(&env).ok()
    }

    pub fn get_vote_window(env: Env) -> u32 {
        storage::get_vote_window(&env)
    }

    pub fn get_vote_tally(env: Env, index: u32) -> Option<VoteTally> {
        storage::load_tally(&env, index)
    }

    pub fn has_voted(env: Env, index: u32, voter: Address) -> bool {
        storage::has_voted(&env, index, &voter)
    }
}

impl Crowdfunding {
    fn require_owner(env: &Env, caller: &Address) -> Result<(), Error> {
        if storage::get_owner(env)? != *caller {
            return Err(Error::NotOwner);
        }
        Ok(())
    }
}
