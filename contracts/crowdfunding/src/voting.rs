//! Donation-weighted milestone voting.
//!
//! A milestone is decided by a strict majority of `total_raised`: the vote
//! that pushes either side above half resolves it on the spot.

use crate::types::{Status, VoteTally};
use crate::Error;

/// Add `weight` to the chosen side of the tally.
pub fn cast(tally: &VoteTally, weight: i128, confidence: bool) -> Result<VoteTally, Error> {
    let mut next = tally.clone();
    if confidence {
        next.yes_weight = next.yes_weight.checked_add(weight).ok_or(Error::Overflow)?;
    } else {
        next.no_weight = next.no_weight.checked_add(weight).ok_or(Error::Overflow)?;
    }
    Ok(next)
}

/// Outcome of a tally, if any side holds a strict majority.
///
/// Confidence is checked first: `Funded` releases the milestone for claiming,
/// `Canceled` opens refunds. `None` keeps the vote open.
pub fn decide(tally: &VoteTally, total_raised: i128) -> Option<Status> {
    let half = total_raised / 2;
    if tally.yes_weight > half {
        Some(Status::Funded)
    } else if tally.no_weight > half {
        Some(Status::Canceled)
    } else {
        None
    }
}
