//! Test-only overrides.
//!
//! Compiled under `cfg(test)` or the `testutils` feature, never into a
//! production build. They let tests jump the campaign into any state without
//! replaying a full funding run, and skip authorization entirely.

use soroban_sdk::{contractimpl, Env};

use crate::*;

#[contractimpl]
impl Crowdfunding {
    /// Overwrite the status register. No event is emitted.
    pub fn set_status(env: Env, status: Status) {
        let mut state = storage::load_state(&env);
        state.status = status;
        storage::save_state(&env, &state);
    }

    /// Overwrite the funding deadline.
    pub fn set_deadline_height(env: Env, height: u32) {
        let mut config = storage::load_config(&env);
        config.deadline_height = height;
        storage::save_config(&env, &config);
    }

    /// Overwrite the end of the current vote window.
    pub fn set_vote_end_height(env: Env, height: u32) {
        let mut state = storage::load_state(&env);
        state.vote_end_height = height;
        storage::save_state(&env, &state);
    }
}
