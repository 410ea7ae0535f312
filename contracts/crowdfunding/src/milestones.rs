//! Milestone registry: bounds, posting validation and payout arithmetic.

use soroban_sdk::{Env, String};

use crate::storage;
use crate::types::{CampaignConfig, Milestone};
use crate::Error;

/// Longest accepted milestone description, in bytes.
pub const MAX_DETAILS_LEN: u32 = 100;

/// Milestones are indexed `1..=milestone_count`.
pub fn check_index(config: &CampaignConfig, index: u32) -> Result<(), Error> {
    if index == 0 || index > config.milestone_count {
        return Err(Error::OutOfBounds);
    }
    Ok(())
}

pub fn check_details(details: &String) -> Result<(), Error> {
    if details.len() == 0 {
        return Err(Error::EmptyDetails);
    }
    if details.len() > MAX_DETAILS_LEN {
        return Err(Error::DetailsTooLong);
    }
    Ok(())
}

/// Load a posted milestone; an in-range index that was never posted is
/// `MilestoneNotFound`.
pub fn require_posted(env: &Env, index: u32) -> Result<Milestone, Error> {
    storage::load_milestone(env, index).ok_or(Error::MilestoneNotFound)
}

/// Equal share of the amount raised per milestone (integer division).
pub fn payout(total_raised: i128, milestone_count: u32) -> i128 {
    if milestone_count == 0 {
        return 0;
    }
    total_raised / milestone_count as i128
}
