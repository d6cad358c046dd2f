//! Constraint system behind an Aegis release proof.
//!
//! A proof attests that the prover knows a [`DepositWitness`] satisfying every
//! [`Constraint`] against the [`PublicInputs`] without revealing the witness.
//! The verification oracle checks a succinct argument of exactly this
//! statement; the digests used here are the same [`crate::hashing`]
//! functions the source contract uses to compute the deposit event hash, so
//! the two sides can never disagree on what a valid deposit looks like.

use near_sdk::json_types::U128;
use near_sdk::{borsh, near, AccountId};

use crate::hashing;
use crate::types::Bytes32;

/// Index of the event hash in the public input vector.
pub const EVENT_HASH_SLOT: usize = 0;

/// Index of the nullifier hash in the public input vector.
pub const NULLIFIER_HASH_SLOT: usize = 1;

/// Number of public inputs a release proof carries.
pub const PUBLIC_INPUT_COUNT: usize = 2;

/// Private witness known only to the depositor.
#[near(serializers = [json, borsh])]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DepositWitness {
    pub depositor: AccountId,
    pub amount: U128,
    pub destination_chain_id: u64,
    pub secret: Bytes32,
}

impl DepositWitness {
    /// Canonical Borsh encoding, as consumed by the reference witness verifier.
    pub fn to_proof_bytes(&self) -> Vec<u8> {
        borsh::to_vec(self).unwrap_or_else(|_| near_sdk::env::panic_str("Witness serialization failed"))
    }

    pub fn from_proof_bytes(bytes: &[u8]) -> Option<Self> {
        borsh::from_slice(bytes).ok()
    }
}

/// Public signals of a release proof, in slot order.
#[near(serializers = [json, borsh])]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PublicInputs {
    pub event_hash: Bytes32,
    pub nullifier_hash: Bytes32,
}

impl PublicInputs {
    /// The public inputs an honest prover derives from `witness`.
    pub fn derive(witness: &DepositWitness) -> Self {
        Self {
            event_hash: hashing::event_hash(
                &witness.depositor,
                witness.amount.0,
                witness.destination_chain_id,
                &witness.secret,
            ),
            nullifier_hash: hashing::nullifier_hash(&witness.secret),
        }
    }

    pub fn to_slots(&self) -> [Bytes32; PUBLIC_INPUT_COUNT] {
        let mut slots = [[0u8; 32]; PUBLIC_INPUT_COUNT];
        slots[EVENT_HASH_SLOT] = self.event_hash;
        slots[NULLIFIER_HASH_SLOT] = self.nullifier_hash;
        slots
    }
}

impl From<[Bytes32; PUBLIC_INPUT_COUNT]> for PublicInputs {
    fn from(slots: [Bytes32; PUBLIC_INPUT_COUNT]) -> Self {
        Self {
            event_hash: slots[EVENT_HASH_SLOT],
            nullifier_hash: slots[NULLIFIER_HASH_SLOT],
        }
    }
}

/// A single equality the witness must satisfy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Constraint {
    /// `event_hash == H(depositor, amount, destination_chain_id, secret)`
    EventHashBinding,
    /// `nullifier_hash == H(secret)`
    NullifierBinding,
}

/// Every constraint of the release circuit.
pub const CONSTRAINTS: [Constraint; 2] = [Constraint::EventHashBinding, Constraint::NullifierBinding];

impl Constraint {
    pub fn holds(&self, witness: &DepositWitness, inputs: &PublicInputs) -> bool {
        match self {
            Constraint::EventHashBinding => {
                inputs.event_hash
                    == hashing::event_hash(
                        &witness.depositor,
                        witness.amount.0,
                        witness.destination_chain_id,
                        &witness.secret,
                    )
            }
            Constraint::NullifierBinding => {
                inputs.nullifier_hash == hashing::nullifier_hash(&witness.secret)
            }
        }
    }
}

/// Constraints `witness` fails against `inputs`; empty when the statement holds.
pub fn unsatisfied(witness: &DepositWitness, inputs: &PublicInputs) -> Vec<Constraint> {
    CONSTRAINTS
        .iter()
        .copied()
        .filter(|constraint| !constraint.holds(witness, inputs))
        .collect()
}

pub fn is_satisfied(witness: &DepositWitness, inputs: &PublicInputs) -> bool {
    CONSTRAINTS
        .iter()
        .all(|constraint| constraint.holds(witness, inputs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use near_sdk::test_utils::VMContextBuilder;
    use near_sdk::testing_env;

    fn witness() -> DepositWitness {
        DepositWitness {
            depositor: "alice.near".parse().unwrap(),
            amount: U128(1_000),
            destination_chain_id: 7,
            secret: [5u8; 32],
        }
    }

    #[test]
    fn test_derived_inputs_satisfy_circuit() {
        testing_env!(VMContextBuilder::new().build());
        let witness = witness();
        let inputs = PublicInputs::derive(&witness);

        assert!(is_satisfied(&witness, &inputs));
        assert!(unsatisfied(&witness, &inputs).is_empty());
    }

    #[test]
    fn test_wrong_secret_breaks_both_constraints() {
        testing_env!(VMContextBuilder::new().build());
        let inputs = PublicInputs::derive(&witness());
        let mut forged = witness();
        forged.secret = [6u8; 32];

        assert!(!is_satisfied(&forged, &inputs));
        assert_eq!(
            unsatisfied(&forged, &inputs),
            vec![Constraint::EventHashBinding, Constraint::NullifierBinding]
        );
    }

    #[test]
    fn test_wrong_amount_breaks_event_binding_only() {
        testing_env!(VMContextBuilder::new().build());
        let inputs = PublicInputs::derive(&witness());
        let mut forged = witness();
        forged.amount = U128(999);

        assert_eq!(unsatisfied(&forged, &inputs), vec![Constraint::EventHashBinding]);
    }

    #[test]
    fn test_swapped_slots_are_rejected() {
        testing_env!(VMContextBuilder::new().build());
        let witness = witness();
        let mut slots = PublicInputs::derive(&witness).to_slots();
        slots.swap(EVENT_HASH_SLOT, NULLIFIER_HASH_SLOT);

        assert!(!is_satisfied(&witness, &PublicInputs::from(slots)));
    }

    #[test]
    fn test_proof_bytes_decode() {
        testing_env!(VMContextBuilder::new().build());
        let witness = witness();
        let bytes = witness.to_proof_bytes();

        assert_eq!(DepositWitness::from_proof_bytes(&bytes), Some(witness));
        assert_eq!(DepositWitness::from_proof_bytes(&bytes[1..]), None);
    }
}
