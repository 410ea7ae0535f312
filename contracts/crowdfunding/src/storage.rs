//! # Storage
//!
//! Typed helpers over the two Soroban storage tiers used by the campaign.
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key          | Type             | Description                          |
//! |--------------|------------------|--------------------------------------|
//! | `Owner`      | `Address`        | Campaign owner                       |
//! | `Token`      | `Address`        | Settlement asset (native SAC)        |
//! | `VoteWindow` | `u32`            | Ledgers a milestone vote stays open  |
//! | `Config`     | `CampaignConfig` | Immutable campaign parameters        |
//! | `State`      | `CampaignState`  | Status register and money counters   |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                    | Type        | Description                        |
//! |------------------------|-------------|------------------------------------|
//! | `Donation(addr)`       | `i128`      | Cumulative donation of a principal |
//! | `Milestone(idx)`       | `Milestone` | Posted details and claimed flag    |
//! | `Tally(idx)`           | `VoteTally` | Yes/no weight for a milestone      |
//! | `Voted(idx, addr)`     | `bool`      | Voter-set membership marker        |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days remaining.

use soroban_sdk::{contracttype, Address, Env};

use crate::types::{Campaign, CampaignConfig, CampaignState, Milestone, VoteTally};
use crate::Error;

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
pub const DAY_IN_LEDGERS: u32 = 17_280;

const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    Owner,
    Token,
    VoteWindow,
    Config,
    State,
    Donation(Address),
    Milestone(u32),
    Tally(u32),
    Voted(u32, Address),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Owner)
}

/// Write the bootstrap settings and the initial `Pending` state.
pub fn save_settings(env: &Env, owner: &Address, token: &Address, vote_window: u32) {
    let instance = env.storage().instance();
    instance.set(&DataKey::Owner, owner);
    instance.set(&DataKey::Token, token);
    instance.set(&DataKey::VoteWindow, &vote_window);
    instance.set(&DataKey::State, &CampaignState::pending());
    bump_instance(env);
}

pub fn get_owner(env: &Env) -> Result<Address, Error> {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Owner)
        .ok_or(Error::NotInitialized)
}

pub fn get_token(env: &Env) -> Result<Address, Error> {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Token)
        .ok_or(Error::NotInitialized)
}

pub fn get_vote_window(env: &Env) -> u32 {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::VoteWindow)
        .unwrap_or(0)
}

/// Campaign parameters; all zeroes while the campaign is still `Pending`.
pub fn load_config(env: &Env) -> CampaignConfig {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .unwrap_or_default()
}

pub fn save_config(env: &Env, config: &CampaignConfig) {
    env.storage().instance().set(&DataKey::Config, config);
    bump_instance(env);
}

/// Mutable state; a contract that was never initialised reads as `Pending`.
pub fn load_state(env: &Env) -> CampaignState {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::State)
        .unwrap_or_else(CampaignState::pending)
}

pub fn save_state(env: &Env, state: &CampaignState) {
    env.storage().instance().set(&DataKey::State, state);
    bump_instance(env);
}

/// Reconstruct the public [`Campaign`] snapshot from settings, config and state.
pub fn load_campaign(env: &Env) -> Result<Campaign, Error> {
    let owner = get_owner(env)?;
    let token = get_token(env)?;
    let state = load_state(env);
    let config = load_config(env);
    Ok(Campaign {
        owner,
        token,
        goal: config.goal,
        deadline_height: config.deadline_height,
        vote_end_height: state.vote_end_height,
        milestone_count: config.milestone_count,
        active_milestone: state.active_milestone,
        milestones_claimed: state.milestones_claimed,
        total_raised: state.total_raised,
        total_claimed: state.total_claimed,
        total_refunded: state.total_refunded,
        status: state.status,
    })
}

// ── Persistent Storage Helpers ───────────────────────────────────────

fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

fn read_persistent<V>(env: &Env, key: &DataKey) -> Option<V>
where
    V: soroban_sdk::TryFromVal<Env, soroban_sdk::Val>,
{
    let value = env.storage().persistent().get(key);
    if value.is_some() {
        bump_persistent(env, key);
    }
    value
}

pub fn get_donation(env: &Env, donor: &Address) -> i128 {
    read_persistent(env, &DataKey::Donation(donor.clone())).unwrap_or(0)
}

pub fn set_donation(env: &Env, donor: &Address, amount: i128) {
    let key = DataKey::Donation(donor.clone());
    env.storage().persistent().set(&key, &amount);
    bump_persistent(env, &key);
}

/// Settle a donor's entry to zero. The key is dropped rather than kept at 0.
pub fn clear_donation(env: &Env, donor: &Address) {
    env.storage()
        .persistent()
        .remove(&DataKey::Donation(donor.clone()));
}

pub fn load_milestone(env: &Env, index: u32) -> Option<Milestone> {
    read_persistent(env, &DataKey::Milestone(index))
}

pub fn save_milestone(env: &Env, index: u32, milestone: &Milestone) {
    let key = DataKey::Milestone(index);
    env.storage().persistent().set(&key, milestone);
    bump_persistent(env, &key);
}

pub fn load_tally(env: &Env, index: u32) -> Option<VoteTally> {
    read_persistent(env, &DataKey::Tally(index))
}

pub fn save_tally(env: &Env, index: u32, tally: &VoteTally) {
    let key = DataKey::Tally(index);
    env.storage().persistent().set(&key, tally);
    bump_persistent(env, &key);
}

pub fn has_voted(env: &Env, index: u32, voter: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Voted(index, voter.clone()))
}

pub fn mark_voted(env: &Env, index: u32, voter: &Address) {
    let key = DataKey::Voted(index, voter.clone());
    env.storage().persistent().set(&key, &true);
    bump_persistent(env, &key);
}
