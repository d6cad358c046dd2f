//! Verification oracle interface consumed by the Aegis destination contract.
//!
//! The destination contract binds exactly one verifier account at
//! construction and delegates all proof validity checking to it. Any proof
//! system can sit behind this interface; the contract never inspects the
//! proof bytes itself.

use near_sdk::json_types::Base64VecU8;

use crate::circuit::PUBLIC_INPUT_COUNT;
use crate::types::Bytes32;

/// Interface for contracts that check release proofs.
pub trait ProofVerifier {
    /// Checks a proof against its public inputs.
    ///
    /// # Arguments
    ///
    /// * `proof` - Opaque proof bytes produced off-chain by the prover
    /// * `public_inputs` - `[event_hash, nullifier_hash]`, in that slot order
    ///
    /// # Returns
    ///
    /// `true` only if the proof attests to a witness satisfying every
    /// constraint of [`crate::circuit`] against `public_inputs`.
    fn verify(&self, proof: Base64VecU8, public_inputs: [Bytes32; PUBLIC_INPUT_COUNT]) -> bool;
}
