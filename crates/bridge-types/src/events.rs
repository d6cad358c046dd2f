//! Bridge event definitions following the NEP-297 standard.
//!
//! Relayers and provers index these logs: the threshold bridge reports which
//! commitments executed, and the Aegis contracts publish the event hashes a
//! release proof must match.
//!
//! Reference: https://nomicon.io/Standards/EventsFormat

use near_sdk::{
    AccountId, log,
    serde::Serialize,
    serde_json::json,
    json_types::{Base64VecU8, U128},
};

/// Event standard identifier for the threshold-signature bridge.
const THRESHOLD_EVENT_STANDARD: &str = "threshold-bridge";

/// Event standard identifier for the Aegis deposit and release contracts.
const AEGIS_EVENT_STANDARD: &str = "aegis-bridge";

/// Current version of the event standards.
const EVENT_STANDARD_VERSION: &str = "1.0.0";

/// All events emitted by the threshold-signature bridge.
///
/// Digests are rendered as lowercase hex strings.
#[derive(Clone, Serialize)]
#[serde(crate = "near_sdk::serde")]
#[serde(tag = "event", content = "data")]
#[serde(rename_all = "snake_case")]
pub enum ThresholdEvent<'a> {
    /// Emitted once the authorized call has completed successfully.
    Authorized {
        /// Account that received the call and its attached value.
        target: &'a AccountId,
        /// Value released from escrow, in yoctoNEAR.
        value: &'a U128,
        /// Argument bytes forwarded with the call.
        payload: &'a Base64VecU8,
        /// Signed commitment hash now recorded as executed.
        signed_hash: String,
    },

    /// Emitted when the authorized call failed and the execution record was
    /// rolled back.
    ExecutionReverted {
        target: &'a AccountId,
        value: &'a U128,
        signed_hash: String,
        /// Name of the failure, e.g. `CallFailed`.
        reason: String,
    },

    /// Emitted when value is added to the escrow.
    Funded {
        sender: &'a AccountId,
        amount: &'a U128,
    },
}

impl ThresholdEvent<'_> {
    pub fn emit(&self) {
        emit_event(THRESHOLD_EVENT_STANDARD, &self);
    }
}

// ============================================================================
// Aegis Events
// ============================================================================

/// All events emitted by the Aegis source and destination contracts.
#[derive(Clone, Serialize)]
#[serde(crate = "near_sdk::serde")]
#[serde(tag = "event", content = "data")]
#[serde(rename_all = "snake_case")]
pub enum AegisEvent<'a> {
    /// Emitted when value is locked on the source side.
    ///
    /// The event hash is the only public link between this deposit and a
    /// later release proof.
    Deposited {
        depositor: &'a AccountId,
        value: &'a U128,
        destination_chain_id: u64,
        /// Hex-encoded `H(depositor, value, destination_chain_id, secret)`.
        event_hash: String,
    },

    /// Emitted once a proof-authorized transfer has completed.
    Released {
        recipient: &'a AccountId,
        amount: &'a U128,
    },

    /// Emitted when the release transfer failed and the nullifier was freed.
    ReleaseReverted {
        recipient: &'a AccountId,
        amount: &'a U128,
        nullifier_hash: String,
        /// Name of the failure, e.g. `TransferFailed`.
        reason: String,
    },

    /// Emitted when release liquidity is added on the destination side.
    Funded {
        sender: &'a AccountId,
        amount: &'a U128,
    },
}

impl AegisEvent<'_> {
    pub fn emit(&self) {
        emit_event(AEGIS_EVENT_STANDARD, &self);
    }
}

/// Logs `EVENT_JSON:{standard, version, event, data: [..]}`.
///
/// `event` is the serde variant tag; the variant's fields become the single
/// element of `data`.
fn emit_event<T: ?Sized + Serialize>(standard: &str, event: &T) {
    let mut tagged = json!(event);
    let envelope = json!({
        "standard": standard,
        "version": EVENT_STANDARD_VERSION,
        "event": tagged["event"].take(),
        "data": [tagged["data"].take()],
    });
    log!("EVENT_JSON:{}", envelope);
}
