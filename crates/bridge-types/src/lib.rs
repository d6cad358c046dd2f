//! Shared types and interfaces for the Aegis bridge.
//!
//! Both authorization models guarding the bridge escrow, the threshold-signature
//! baseline and the zero-knowledge Aegis pipeline, build on the definitions in
//! this crate so that every contract hashes, reports errors and emits events
//! the same way.
//!
//! # Modules
//!
//! - [`circuit`] - Constraint system a valid Aegis proof attests to
//! - [`errors`] - Named failure outcomes shared by every contract
//! - [`escrow`] - Spendable-balance checks before releasing value
//! - [`events`] - NEP-297 compliant event definitions for indexing
//! - [`hashing`] - Commitment, signed-message, event and nullifier digests
//! - [`interfaces`] - Trait definitions for cross-contract capabilities
//! - [`types`] - Core type aliases and definitions

pub mod circuit;
pub mod errors;
pub mod escrow;
pub mod events;
pub mod hashing;
pub mod interfaces;
pub mod types;

pub use errors::BridgeError;
pub use types::{Bytes32, EthAddress};
