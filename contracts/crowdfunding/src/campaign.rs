//! Campaign state machine.
//!
//! Every status change goes through [`transition`], which rejects edges that
//! are not part of the lifecycle and publishes a `status` event.

use soroban_sdk::Env;

use crate::events;
use crate::types::{CampaignState, Status};
use crate::Error;

/// Edges of the campaign lifecycle.
pub fn is_valid_transition(from: Status, to: Status) -> bool {
    matches!(
        (from, to),
        (Status::Pending, Status::Active)
            | (Status::Active, Status::Funded)
            | (Status::Active, Status::Expired)
            | (Status::Funded, Status::Vote)
            | (Status::Funded, Status::Completed)
            | (Status::Vote, Status::Funded)
            | (Status::Vote, Status::Canceled)
    )
}

/// Move `state` to `to`, emitting the change.
pub fn transition(env: &Env, state: &mut CampaignState, to: Status) -> Result<(), Error> {
    let from = state.status;
    if !is_valid_transition(from, to) {
        return Err(Error::InvalidStatus);
    }
    state.status = to;
    events::emit_status_changed(env, from, to);
    Ok(())
}

/// Fail with `err` unless the campaign is in `expected`.
pub fn require_status(state: &CampaignState, expected: Status, err: Error) -> Result<(), Error> {
    if state.status != expected {
        return Err(err);
    }
    Ok(())
}
