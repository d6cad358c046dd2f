//! Witness Verifier
//!
//! A reference verification oracle for Aegis release proofs. The "proof" it
//! accepts is the Borsh-encoded [`DepositWitness`] itself, checked directly
//! against every constraint of the release circuit. It reveals the witness
//! and is therefore only suitable for testing and for exercising the
//! destination contract end to end; a production deployment binds a succinct
//! verifier exposing the same [`ProofVerifier`] interface instead.

use bridge_types::circuit::{self, DepositWitness, PublicInputs, PUBLIC_INPUT_COUNT};
use bridge_types::interfaces::ProofVerifier;
use bridge_types::Bytes32;
use near_sdk::json_types::Base64VecU8;
use near_sdk::{log, near, PanicOnDefault};

#[near(contract_state)]
#[derive(PanicOnDefault)]
pub struct WitnessVerifier {}

#[near]
impl WitnessVerifier {
    #[init]
    pub fn new() -> Self {
        Self {}
    }

    /// Encodes a witness as a proof this verifier accepts.
    ///
    /// Off-chain prover helper: the returned bytes are passed verbatim as the
    /// `proof` argument of `release`.
    pub fn encode_proof(&self, witness: DepositWitness) -> Base64VecU8 {
        Base64VecU8(witness.to_proof_bytes())
    }

    /// Public inputs an honest prover derives from `witness`.
    pub fn public_inputs_for(&self, witness: DepositWitness) -> [Bytes32; PUBLIC_INPUT_COUNT] {
        PublicInputs::derive(&witness).to_slots()
    }
}

#[near]
impl ProofVerifier for WitnessVerifier {
    /// Returns `true` only if `proof` decodes to a witness satisfying the
    /// release circuit against `public_inputs`.
    fn verify(&self, proof: Base64VecU8, public_inputs: [Bytes32; PUBLIC_INPUT_COUNT]) -> bool {
        let Some(witness) = DepositWitness::from_proof_bytes(&proof.0) else {
            log!("Rejected proof: not a witness encoding");
            return false;
        };

        let failed = circuit::unsatisfied(&witness, &PublicInputs::from(public_inputs));
        if !failed.is_empty() {
            log!("Rejected proof: unsatisfied constraints {:?}", failed);
            return false;
        }
        true
    }
}
