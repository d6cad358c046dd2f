//! Interface definitions for the Aegis bridge.
//!
//! This module contains the trait definitions for capabilities the bridge
//! contracts consume from, or offer to, other contracts.

pub mod execution_receiver;
pub mod proof_verifier;

pub use execution_receiver::*;
pub use proof_verifier::*;
