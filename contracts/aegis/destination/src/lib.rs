//! Aegis destination-side escrow.
//!
//! Releases value against a zero-knowledge proof that the caller knows a
//! deposit matching a public event hash. Proof validity is delegated to a
//! verification oracle bound at construction; this contract only enforces
//! that each proof's nullifier is consumed at most once.
//!
//! # Release flow
//!
//! 1. `release` rejects an already-consumed nullifier and asks the oracle to
//!    verify the proof
//! 2. `on_proof_verified` re-checks the nullifier (another release may have
//!    landed in between), records it and transfers the amount
//! 3. `on_release_complete` emits `released`, or frees the nullifier again if
//!    the transfer failed and ends the transaction with `TransferFailed`
//!
//! The released `amount` is supplied by the caller and is not among the
//! proof's public inputs, so the proof does not bind it to the deposited
//! amount.

use bridge_types::circuit::{NULLIFIER_HASH_SLOT, PUBLIC_INPUT_COUNT};
use bridge_types::events::AegisEvent;
use bridge_types::{escrow, BridgeError, Bytes32};
use near_sdk::json_types::{Base64VecU8, U128};
use near_sdk::store::LookupSet;
use near_sdk::{
    env, ext_contract, log, near, require, AccountId, Gas, NearToken, PanicOnDefault, Promise,
    PromiseError, PromiseOrValue, PromiseResult,
};

const GAS_FOR_VERIFY: Gas = Gas::from_tgas(20);
const GAS_FOR_VERIFY_CALLBACK: Gas = Gas::from_tgas(40);
const GAS_FOR_RELEASE_CALLBACK: Gas = Gas::from_tgas(20);
const GAS_FOR_FAILURE_REPORT: Gas = Gas::from_tgas(5);

#[ext_contract(ext_verifier)]
#[allow(dead_code)]
trait ExtProofVerifier {
    fn verify(&self, proof: Base64VecU8, public_inputs: [Bytes32; PUBLIC_INPUT_COUNT]) -> bool;
}

#[ext_contract(ext_self)]
#[allow(dead_code)]
trait ExtAegisDestinationCallbacks {
    fn on_proof_verified(&mut self, nullifier_hash: Bytes32, recipient: AccountId, amount: U128);
    fn on_release_complete(
        &mut self,
        nullifier_hash: Bytes32,
        recipient: AccountId,
        amount: U128,
    ) -> PromiseOrValue<bool>;
    fn fail_release(&self, error: BridgeError);
}

#[near(contract_state)]
#[derive(PanicOnDefault)]
pub struct AegisDestination {
    /// Verification oracle. Fixed at construction.
    verifier: AccountId,

    /// Nullifier hashes of proofs that have been honoured.
    nullifiers: LookupSet<Bytes32>,

    /// Total value released, in yoctoNEAR.
    total_released: u128,
}

#[near]
impl AegisDestination {
    /// Initialize the escrow with its verification oracle.
    ///
    /// # Arguments
    ///
    /// * `verifier` - Contract implementing `verify(proof, public_inputs) -> bool`
    #[init]
    #[handle_result]
    pub fn new(verifier: Option<AccountId>) -> Result<Self, BridgeError> {
        let verifier = verifier.ok_or(BridgeError::InvalidVerifierAddress)?;
        log!("Aegis destination bound to verifier {}", verifier);

        Ok(Self {
            verifier,
            nullifiers: LookupSet::new(b"n"),
            total_released: 0,
        })
    }

    /// Releases `amount` to `recipient` if `proof` verifies against
    /// `public_inputs = [event_hash, nullifier_hash]`.
    #[handle_result]
    pub fn release(
        &mut self,
        proof: Base64VecU8,
        public_inputs: [Bytes32; PUBLIC_INPUT_COUNT],
        recipient: AccountId,
        amount: U128,
    ) -> Result<Promise, BridgeError> {
        let nullifier_hash = public_inputs[NULLIFIER_HASH_SLOT];
        if self.nullifiers.contains(&nullifier_hash) {
            return Err(BridgeError::ProofAlreadyUsed);
        }

        Ok(ext_verifier::ext(self.verifier.clone())
            .with_static_gas(GAS_FOR_VERIFY)
            .verify(proof, public_inputs)
            .then(
                ext_self::ext(env::current_account_id())
                    .with_static_gas(GAS_FOR_VERIFY_CALLBACK)
                    .on_proof_verified(nullifier_hash, recipient, amount),
            ))
    }

    /// Callback after the oracle has checked the proof.
    ///
    /// A failed oracle call counts as a rejected proof.
    #[private]
    #[handle_result]
    pub fn on_proof_verified(
        &mut self,
        nullifier_hash: Bytes32,
        recipient: AccountId,
        amount: U128,
        #[callback_result] verified: Result<bool, PromiseError>,
    ) -> Result<Promise, BridgeError> {
        if self.nullifiers.contains(&nullifier_hash) {
            return Err(BridgeError::ProofAlreadyUsed);
        }
        if !matches!(verified, Ok(true)) {
            return Err(BridgeError::InvalidProof);
        }
        if !escrow::can_release(amount.0) {
            return Err(BridgeError::TransferFailed);
        }

        self.nullifiers.insert(nullifier_hash);

        Ok(Promise::new(recipient.clone())
            .transfer(NearToken::from_yoctonear(amount.0))
            .then(
                ext_self::ext(env::current_account_id())
                    .with_static_gas(GAS_FOR_RELEASE_CALLBACK)
                    .on_release_complete(nullifier_hash, recipient, amount),
            ))
    }

    /// Callback after the release transfer completes.
    ///
    /// A failed transfer frees the nullifier here and the transaction then
    /// ends in a `TransferFailed` receipt via [`Self::fail_release`].
    #[allow(deprecated)]
    #[private]
    pub fn on_release_complete(
        &mut self,
        nullifier_hash: Bytes32,
        recipient: AccountId,
        amount: U128,
    ) -> PromiseOrValue<bool> {
        require!(
            env::promise_results_count() == 1,
            "Expected one promise result"
        );

        match env::promise_result(0) {
            PromiseResult::Successful(_) => {
                self.total_released = self.total_released.saturating_add(amount.0);
                AegisEvent::Released {
                    recipient: &recipient,
                    amount: &amount,
                }
                .emit();
                PromiseOrValue::Value(true)
            }
            _ => {
                self.nullifiers.remove(&nullifier_hash);
                log!(
                    "{}: release to {} failed; nullifier freed",
                    BridgeError::TransferFailed,
                    recipient
                );
                AegisEvent::ReleaseReverted {
                    recipient: &recipient,
                    amount: &amount,
                    nullifier_hash: hex::encode(nullifier_hash),
                    reason: BridgeError::TransferFailed.to_string(),
                }
                .emit();
                PromiseOrValue::Promise(
                    ext_self::ext(env::current_account_id())
                        .with_static_gas(GAS_FOR_FAILURE_REPORT)
                        .fail_release(BridgeError::TransferFailed),
                )
            }
        }
    }

    /// Always fails with `error`; chained after a rolled-back release.
    #[private]
    #[handle_result]
    pub fn fail_release(&self, error: BridgeError) -> Result<(), BridgeError> {
        Err(error)
    }

    /// Adds the attached deposit to the release liquidity.
    #[payable]
    pub fn fund(&mut self) {
        let amount = env::attached_deposit().as_yoctonear();
        require!(amount > 0, "Attached deposit must be positive");

        AegisEvent::Funded {
            sender: &env::predecessor_account_id(),
            amount: &U128(amount),
        }
        .emit();
    }

    // ========== View Methods ==========

    pub fn get_verifier(&self) -> &AccountId {
        &self.verifier
    }

    pub fn is_nullifier_used(&self, nullifier_hash: Bytes32) -> bool {
        self.nullifiers.contains(&nullifier_hash)
    }

    pub fn get_total_released(&self) -> U128 {
        U128(self.total_released)
    }
}
