//! Canonical event types emitted by the crowdfunding contract.
//!
//! These mirror the payload structs published by
//! `contracts/crowdfunding/src/events.rs`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// All recognised event kinds from the crowdfunding contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// The owner opened the campaign (`created` topic).
    CampaignCreated,
    /// A donor pledged funds (`donated` topic).
    DonationReceived,
    /// The campaign moved between lifecycle states (`status` topic).
    StatusChanged,
    /// The owner posted a milestone for review (`posted` topic).
    MilestonePosted,
    /// A donor voted on the milestone under review (`voted` topic).
    VoteCast,
    /// The owner was paid a milestone share (`claimed` topic).
    MilestoneClaimed,
    /// A donor was refunded (`refunded` topic).
    RefundClaimed,
    /// An event from this contract that we don't recognise yet.
    Unknown,
}

impl EventKind {
    const ALL: [EventKind; 8] = [
        Self::CampaignCreated,
        Self::DonationReceived,
        Self::StatusChanged,
        Self::MilestonePosted,
        Self::VoteCast,
        Self::MilestoneClaimed,
        Self::RefundClaimed,
        Self::Unknown,
    ];

    /// Parse the leading topic symbol string produced by Soroban into an [`EventKind`].
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            "created" => Self::CampaignCreated,
            "donated" => Self::DonationReceived,
            "status" => Self::StatusChanged,
            "posted" => Self::MilestonePosted,
            "voted" => Self::VoteCast,
            "claimed" => Self::MilestoneClaimed,
            "refunded" => Self::RefundClaimed,
            _ => Self::Unknown,
        }
    }

    /// Return a short identifier string suitable for storage in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CampaignCreated => "campaign_created",
            Self::DonationReceived => "donation_received",
            Self::StatusChanged => "status_changed",
            Self::MilestonePosted => "milestone_posted",
            Self::VoteCast => "vote_cast",
            Self::MilestoneClaimed => "milestone_claimed",
            Self::RefundClaimed => "refund_claimed",
            Self::Unknown => "unknown",
        }
    }

    /// Inverse of [`EventKind::as_str`]; unrecognised strings map to `Unknown`.
    pub fn from_stored(s: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .unwrap_or(Self::Unknown)
    }
}

/// Name of a contract `Status` discriminant.
pub fn status_name(code: u64) -> &'static str {
    match code {
        0 => "pending",
        1 => "active",
        2 => "funded",
        3 => "expired",
        4 => "vote",
        5 => "canceled",
        6 => "completed",
        _ => "unknown",
    }
}

/// A fully decoded campaign event, ready to be stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignEvent {
    /// RPC event id; unique per contract event on the network.
    pub event_id: String,
    pub event_type: String,
    pub milestone: Option<i64>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub detail: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
}

/// A raw event record as stored in / read from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRecord {
    pub id: i64,
    pub event_id: String,
    pub event_type: String,
    pub milestone: Option<i64>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub detail: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
    pub created_at: i64,
}

impl EventRecord {
    pub fn kind(&self) -> EventKind {
        EventKind::from_stored(&self.event_type)
    }

    fn amount_value(&self) -> i128 {
        self.amount
            .as_deref()
            .and_then(|a| a.parse().ok())
            .unwrap_or(0)
    }
}

/// Campaign totals folded from the indexed event history.
///
/// Amounts are strings so that `i128` values survive JSON clients.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignSummary {
    pub status: Option<String>,
    pub goal: Option<String>,
    pub total_raised: String,
    pub total_claimed: String,
    pub total_refunded: String,
    /// `raised - claimed - refunded`; what the contract should still hold.
    pub custody_balance: String,
    pub donors: usize,
    pub votes_cast: usize,
    pub milestones_posted: usize,
    pub milestones_claimed: usize,
    pub last_ledger: i64,
}

impl CampaignSummary {
    /// Fold `records` in ledger order.
    pub fn from_records(records: &[EventRecord]) -> Self {
        let mut summary = CampaignSummary::default();
        let (mut raised, mut claimed, mut refunded) = (0i128, 0i128, 0i128);
        let mut donors = HashSet::new();

        for record in records {
            match record.kind() {
                EventKind::CampaignCreated => summary.goal = record.amount.clone(),
                EventKind::DonationReceived => {
                    raised += record.amount_value();
                    if let Some(actor) = &record.actor {
                        donors.insert(actor.clone());
                    }
                }
                EventKind::StatusChanged => summary.status = record.detail.clone(),
                EventKind::MilestonePosted => summary.milestones_posted += 1,
                EventKind::VoteCast => summary.votes_cast += 1,
                EventKind::MilestoneClaimed => {
                    claimed += record.amount_value();
                    summary.milestones_claimed += 1;
                }
                EventKind::RefundClaimed => refunded += record.amount_value(),
                EventKind::Unknown => {}
            }
            summary.last_ledger = summary.last_ledger.max(record.ledger);
        }

        summary.total_raised = raised.to_string();
        summary.total_claimed = claimed.to_string();
        summary.total_refunded = refunded.to_string();
        summary.custody_balance = (raised - claimed - refunded).to_string();
        summary.donors = donors.len();
        summary
    }
}
