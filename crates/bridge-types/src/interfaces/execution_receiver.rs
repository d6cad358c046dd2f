//! Call convention for targets of threshold-authorized calls.
//!
//! When an authorized call carries an empty payload the bridge performs a
//! plain value transfer and the target need not implement anything. With a
//! payload, the bridge calls [`EXECUTE_METHOD`] on the target with the
//! released value attached and forwards the payload bytes verbatim as the
//! call arguments, so a JSON target expects the payload to be the JSON
//! encoding of its arguments. A target that panics rejects the call and the
//! bridge rolls back its execution record.

/// Method invoked on the target when an authorized call has a non-empty payload.
pub const EXECUTE_METHOD: &str = "on_bridge_execute";
