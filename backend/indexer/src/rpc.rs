//! Soroban RPC client: polls `getEvents` and decodes crowdfunding events.
//!
//! ## Resilience
//!
//! * Exponential back-off is applied when the RPC returns an error or rate-limit
//!   response, up to [`MAX_BACKOFF_SECS`] seconds.
//! * Transient network errors (connection reset, timeout) are retried silently.
//!
//! ## XDR encoding
//!
//! Requests ask for `xdrFormat: "json"`, so topics and payloads arrive in
//! `topicJson` / `valueJson` as JSON-rendered `ScVal`s (`{"symbol":"donated"}`,
//! `{"map":[{"key":…,"val":…}]}`). Nodes that ignore the flag send base64 XDR
//! in `topic` / `value`: topics are still decoded from it, payloads are not.

use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::errors::{IndexerError, Result};
use crate::events::{status_name, CampaignEvent, EventKind};

const MAX_BACKOFF_SECS: u64 = 60;
const INITIAL_BACKOFF_SECS: u64 = 2;

// ─────────────────────────────────────────────────────────
// JSON-RPC response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    pub result: Option<EventsResult>,
    pub error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct EventsResult {
    pub events: Vec<RawEvent>,
    pub cursor: Option<String>,
    #[serde(rename = "latestLedger")]
    pub latest_ledger: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RawEvent {
    /// Topic list as base64 XDR, or legacy JSON-decoded strings
    #[serde(default)]
    pub topic: Vec<String>,
    /// Topic list rendered as JSON `ScVal`s
    #[serde(rename = "topicJson", default)]
    pub topic_json: Vec<Value>,
    /// Event payload: base64 XDR string or a legacy JSON object
    #[serde(default)]
    pub value: Value,
    /// Event payload rendered as a JSON `ScVal`
    #[serde(rename = "valueJson", default)]
    pub value_json: Value,
    #[serde(rename = "contractId")]
    pub contract_id: Option<String>,
    #[serde(rename = "txHash")]
    pub tx_hash: Option<String>,
    pub id: Option<String>,
    pub ledger: Option<u64>,
    #[serde(rename = "ledgerClosedAt")]
    pub ledger_closed_at: Option<String>,
    #[serde(rename = "inSuccessfulContractCall")]
    pub in_successful_contract_call: Option<bool>,
    #[serde(rename = "pagingToken")]
    pub paging_token: Option<String>,
}

// ─────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────

/// Fetch a page of events from the RPC.
///
/// * `start_ledger`: the ledger sequence to scan from (inclusive).
/// * `cursor`      : optional opaque pagination cursor from a previous response.
/// * `limit`       : maximum number of events to return.
///
/// Returns `(events, next_cursor, latest_ledger)`.
pub async fn fetch_events(
    client: &Client,
    rpc_url: &str,
    contract_id: &str,
    start_ledger: u32,
    cursor: Option<&str>,
    limit: u32,
) -> Result<(Vec<RawEvent>, Option<String>, Option<u64>)> {
    let mut backoff = INITIAL_BACKOFF_SECS;
    let params = build_params(contract_id, start_ledger, cursor, limit);

    loop {
        let response = client
            .post(rpc_url)
            .json(&json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "getEvents",
                "params": params,
            }))
            .send()
            .await;

        let resp = match response {
            Ok(resp) => resp,
            Err(e) => {
                warn!("RPC request failed (will retry in {backoff}s): {e}");
                backoff = back_off(backoff).await;
                continue;
            }
        };

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!("Rate-limited by RPC (will retry in {backoff}s)");
            backoff = back_off(backoff).await;
            continue;
        }

        let body: RpcResponse = resp.json().await?;

        if let Some(err) = body.error {
            if is_hard_error(err.code) {
                return Err(IndexerError::Rpc {
                    code: err.code,
                    message: err.message,
                });
            }
            warn!(
                "RPC soft error (will retry in {backoff}s): {} {}",
                err.code, err.message
            );
            backoff = back_off(backoff).await;
            continue;
        }

        let result = body.result.ok_or_else(|| {
            IndexerError::EventParse("Empty result from getEvents".to_string())
        })?;

        debug!(
            "Fetched {} events (latest_ledger={:?})",
            result.events.len(),
            result.latest_ledger
        );

        return Ok((result.events, result.cursor, result.latest_ledger));
    }
}

/// Sleep for `current` seconds and return the next, doubled delay.
async fn back_off(current: u64) -> u64 {
    tokio::time::sleep(Duration::from_secs(current)).await;
    (current * 2).min(MAX_BACKOFF_SECS)
}

/// Invalid request / unknown method: retrying cannot help.
fn is_hard_error(code: i64) -> bool {
    code == -32600 || code == -32601
}

fn build_params(contract_id: &str, start_ledger: u32, cursor: Option<&str>, limit: u32) -> Value {
    let mut params = json!({
        "filters": [
            {
                "type": "contract",
                "contractIds": [contract_id]
            }
        ],
        "pagination": {
            "limit": limit
        },
        "xdrFormat": "json"
    });

    if let Some(cur) = cursor {
        params["pagination"]["cursor"] = json!(cur);
    } else {
        params["startLedger"] = json!(start_ledger);
    }

    params
}

// ─────────────────────────────────────────────────────────
// Event decoding
// ─────────────────────────────────────────────────────────

/// Decode a page of raw RPC events into [`CampaignEvent`] structs.
///
/// Events from failed contract calls are dropped: their effects were rolled
/// back, so they must not count toward any total.
pub fn decode_events(raw: &[RawEvent], contract_id: &str) -> Vec<CampaignEvent> {
    raw.iter()
        .enumerate()
        .filter_map(|(position, e)| decode_single(e, contract_id, position))
        .collect()
}

fn decode_single(raw: &RawEvent, contract_id: &str, position: usize) -> Option<CampaignEvent> {
    if raw.in_successful_contract_call == Some(false) {
        debug!("Skipping event {:?} from a failed call", raw.id);
        return None;
    }

    let topics = topics(raw);
    let kind = EventKind::from_topic(&extract_symbol(topics.first()?));

    let ledger = raw.ledger.unwrap_or(0) as i64;
    let timestamp = raw
        .ledger_closed_at
        .as_deref()
        .and_then(parse_iso_to_unix)
        .unwrap_or(0);

    let milestone = topics.get(1).and_then(|t| extract_index(t.as_str()));
    let event_id = raw
        .id
        .clone()
        .or_else(|| raw.paging_token.clone())
        .unwrap_or_else(|| {
            format!(
                "{ledger}-{}-{position}",
                raw.tx_hash.as_deref().unwrap_or("notx")
            )
        });

    let Payload {
        actor,
        amount,
        detail,
    } = decode_data(payload(raw), kind);

    Some(CampaignEvent {
        event_id,
        event_type: kind.as_str().to_string(),
        milestone,
        actor,
        amount,
        detail,
        ledger,
        timestamp,
        contract_id: raw
            .contract_id
            .clone()
            .unwrap_or_else(|| contract_id.to_string()),
        tx_hash: raw.tx_hash.clone(),
    })
}

/// Topic entries as strings, preferring the JSON rendering.
fn topics(raw: &RawEvent) -> Vec<String> {
    if raw.topic_json.is_empty() {
        raw.topic.clone()
    } else {
        raw.topic_json.iter().map(Value::to_string).collect()
    }
}

/// The payload to read fields from, preferring the JSON rendering.
fn payload(raw: &RawEvent) -> &Value {
    if !raw.value_json.is_null() {
        return &raw.value_json;
    }
    if raw.value.is_string() {
        warn!(
            "Event {:?} carries an XDR payload; the RPC node ignored xdrFormat=json",
            raw.id
        );
    }
    &raw.value
}

#[derive(Debug, Default, PartialEq)]
struct Payload {
    actor: Option<String>,
    amount: Option<String>,
    detail: Option<String>,
}

/// Pull the indexed columns out of an event payload. Field names match the
/// contract's event structs.
fn decode_data(value: &Value, kind: EventKind) -> Payload {
    match kind {
        EventKind::CampaignCreated => Payload {
            actor: field(value, "owner"),
            amount: field(value, "goal"),
            detail: match (
                field(value, "deadline_height"),
                field(value, "milestone_count"),
            ) {
                (Some(deadline), Some(count)) => {
                    Some(format!("deadline_height={deadline}, milestones={count}"))
                }
                _ => None,
            },
        },
        EventKind::DonationReceived => Payload {
            actor: field(value, "donor"),
            amount: field(value, "amount"),
            detail: None,
        },
        EventKind::StatusChanged => Payload {
            detail: field(value, "to")
                .and_then(|code| code.parse::<u64>().ok())
                .map(|code| status_name(code).to_string()),
            ..Payload::default()
        },
        EventKind::MilestonePosted => Payload {
            detail: field(value, "details"),
            ..Payload::default()
        },
        EventKind::VoteCast => Payload {
            actor: field(value, "voter"),
            amount: field(value, "weight"),
            detail: field(value, "confidence").map(|c| {
                if c == "true" {
                    "yes".to_string()
                } else {
                    "no".to_string()
                }
            }),
        },
        EventKind::MilestoneClaimed => Payload {
            actor: field(value, "owner"),
            amount: field(value, "amount"),
            detail: None,
        },
        EventKind::RefundClaimed => Payload {
            actor: field(value, "donor"),
            amount: field(value, "amount"),
            detail: None,
        },
        EventKind::Unknown => Payload::default(),
    }
}

/// Read `key` from a payload as a string.
///
/// Struct payloads are `ScVal` maps keyed by symbol; a plain JSON object is
/// accepted too.
fn field(value: &Value, key: &str) -> Option<String> {
    if let Some(entries) = value.get("map").and_then(Value::as_array) {
        return entries
            .iter()
            .find(|e| e.pointer("/key/symbol").and_then(Value::as_str) == Some(key))
            .and_then(|e| e.get("val"))
            .and_then(scalar);
    }
    scalar(value.get(key)?)
}

/// Render a scalar as a string. Typed wrappers (`{"i128":"600"}`,
/// `{"type":"i128","value":…}`) are unwrapped and `{hi, lo}` 128-bit parts
/// are joined.
fn scalar(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Object(map) => {
            if let Some(inner) = map.get("value") {
                return scalar(inner);
            }
            if let (Some(hi), Some(lo)) = (map.get("hi"), map.get("lo")) {
                let hi: i64 = integer(hi)?;
                let lo: u64 = integer(lo)?;
                return Some((((hi as i128) << 64) | lo as i128).to_string());
            }
            match map.len() {
                1 => map.values().next().and_then(scalar),
                _ => None,
            }
        }
        _ => None,
    }
}

/// 64-bit XDR integers may be rendered as JSON numbers or decimal strings.
fn integer<T: std::str::FromStr + TryFrom<i128>>(v: &Value) -> Option<T> {
    match v {
        Value::Number(n) => n
            .as_i64()
            .map(i128::from)
            .or_else(|| n.as_u64().map(i128::from))
            .and_then(|n| T::try_from(n).ok()),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// A topic as the contract published it.
#[derive(Debug, PartialEq)]
enum TopicValue {
    Symbol(String),
    U32(u32),
}

const SCV_U32: u32 = 3;
const SCV_SYMBOL: u32 = 15;

/// Decode a base64 XDR `ScVal` holding a symbol or a `u32`.
fn decode_xdr_topic(raw: &str) -> Option<TopicValue> {
    let bytes = STANDARD.decode(raw.trim()).ok()?;
    match read_u32(&bytes, 0)? {
        SCV_U32 => read_u32(&bytes, 4).map(TopicValue::U32),
        SCV_SYMBOL => {
            let len = read_u32(&bytes, 4)? as usize;
            let symbol = bytes.get(8..8 + len)?;
            std::str::from_utf8(symbol)
                .ok()
                .map(|s| TopicValue::Symbol(s.to_string()))
        }
        _ => None,
    }
}

fn read_u32(bytes: &[u8], at: usize) -> Option<u32> {
    let chunk: [u8; 4] = bytes.get(at..at + 4)?.try_into().ok()?;
    Some(u32::from_be_bytes(chunk))
}

/// Extract a Soroban Symbol from a topic entry.
fn extract_symbol(raw: &str) -> String {
    if let Ok(v) = serde_json::from_str::<Value>(raw) {
        if let Some(s) = v
            .get("symbol")
            .or_else(|| v.get("value"))
            .and_then(|x| x.as_str())
        {
            return s.to_string();
        }
    }
    if let Some(TopicValue::Symbol(s)) = decode_xdr_topic(raw) {
        return s;
    }
    raw.to_string()
}

/// Extract the milestone index from the second topic entry.
fn extract_index(raw: &str) -> Option<i64> {
    if let Ok(v) = serde_json::from_str::<Value>(raw) {
        let inner = v.get("u32").or_else(|| v.get("value")).unwrap_or(&v);
        if let Some(n) = inner.as_i64() {
            return Some(n);
        }
        if let Some(n) = inner.as_str().and_then(|s| s.parse().ok()) {
            return Some(n);
        }
    }
    if let Some(TopicValue::U32(n)) = decode_xdr_topic(raw) {
        return Some(n as i64);
    }
    raw.parse().ok()
}

/// Parse an ISO-8601 timestamp string into a Unix epoch (seconds).
fn parse_iso_to_unix(s: &str) -> Option<i64> {
    chrono::DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.timestamp())
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
