//! Donation ledger arithmetic.
//!
//! A donor's cumulative donation is both their voting weight and their refund
//! basis. Milestone claims never touch it; only `donate` (add) and
//! `claim_refund` (settle to zero) do.

use crate::Error;

/// New `(donor_total, total_raised)` after accepting `amount`.
pub fn accept(donor_total: i128, total_raised: i128, amount: i128) -> Result<(i128, i128), Error> {
    let donor_total = donor_total.checked_add(amount).ok_or(Error::Overflow)?;
    let total_raised = total_raised.checked_add(amount).ok_or(Error::Overflow)?;
    Ok((donor_total, total_raised))
}

/// Refund owed to a donor: `floor(donation * (raised - claimed) / raised)`.
///
/// `raised` and `claimed` are the historical counters, not the live custody
/// balance, so every donor gets the same fraction regardless of claim order.
pub fn refund_amount(donation: i128, total_raised: i128, total_claimed: i128) -> Result<i128, Error> {
    if donation <= 0 {
        return Err(Error::NoRefund);
    }
    if total_raised <= 0 {
        return Ok(0);
    }
    let remaining = total_raised
        .checked_sub(total_claimed)
        .ok_or(Error::Overflow)?;
    let scaled = donation.checked_mul(remaining).ok_or(Error::Overflow)?;
    Ok(scaled / total_raised)
}
