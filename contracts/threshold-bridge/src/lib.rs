//! Threshold-signature bridge escrow.
//!
//! The baseline authorization model: value held by this contract is released
//! to a target once at least [`THRESHOLD`] of the [`VALIDATOR_COUNT`] fixed
//! validators have signed the call's commitment hash. Signatures must be
//! ordered by recovered signer address, strictly ascending, which rejects
//! duplicated validators in the same linear pass that checks membership.
//! Each signed commitment executes at most once.

use bridge_types::events::ThresholdEvent;
use bridge_types::interfaces::EXECUTE_METHOD;
use bridge_types::{escrow, hashing, BridgeError, Bytes32, EthAddress};
use near_sdk::json_types::{Base64VecU8, U128};
use near_sdk::store::LookupSet;
use near_sdk::{
    env, ext_contract, log, near, require, AccountId, Gas, NearToken, PanicOnDefault, Promise,
    PromiseOrValue, PromiseResult,
};

mod recovery;
#[cfg(test)]
mod test_signers;

pub use recovery::{recover_signer, SIGNATURE_LENGTH};

/// Number of validators in the fixed set.
pub const VALIDATOR_COUNT: usize = 5;

/// Minimum number of distinct validator signatures per authorization.
pub const THRESHOLD: usize = 3;

const GAS_FOR_EXECUTE_CALL: Gas = Gas::from_tgas(30);
const GAS_FOR_CALLBACK: Gas = Gas::from_tgas(20);
const GAS_FOR_FAILURE_REPORT: Gas = Gas::from_tgas(5);

#[ext_contract(ext_self)]
#[allow(dead_code)]
trait ExtThresholdBridgeCallbacks {
    fn on_execute_complete(
        &mut self,
        target: AccountId,
        value: U128,
        payload: Base64VecU8,
        signed_hash: Bytes32,
    ) -> PromiseOrValue<bool>;
    fn fail_release(&self, error: BridgeError);
}

#[near(contract_state)]
#[derive(PanicOnDefault)]
pub struct ThresholdBridge {
    /// Validator addresses in construction order. Immutable.
    validators: Vec<EthAddress>,

    /// Membership index over `validators`.
    validator_lookup: LookupSet<EthAddress>,

    /// Signed commitment hashes that have been authorized.
    executed: LookupSet<Bytes32>,
}

#[near]
impl ThresholdBridge {
    /// Initialize the bridge with its validator set.
    ///
    /// # Arguments
    ///
    /// * `validators` - Exactly [`VALIDATOR_COUNT`] distinct, non-zero addresses
    #[init]
    #[handle_result]
    pub fn new(validators: Vec<EthAddress>) -> Result<Self, BridgeError> {
        if validators.len() != VALIDATOR_COUNT {
            return Err(BridgeError::InvalidValidatorCount);
        }
        if validators.iter().any(EthAddress::is_zero) {
            return Err(BridgeError::ZeroValidator);
        }
        let mut sorted = validators.clone();
        sorted.sort();
        if sorted.windows(2).any(|pair| pair[0] == pair[1]) {
            return Err(BridgeError::DuplicateValidator);
        }

        let mut validator_lookup = LookupSet::new(b"v");
        for validator in &validators {
            validator_lookup.insert(*validator);
        }

        log!(
            "Threshold bridge initialized: {} validators, threshold {}",
            VALIDATOR_COUNT,
            THRESHOLD
        );

        Ok(Self {
            validators,
            validator_lookup,
            executed: LookupSet::new(b"e"),
        })
    }

    // ========================================================================
    // Authorization
    // ========================================================================

    /// Releases `value` to `target` on the strength of validator signatures.
    ///
    /// `signatures` must be 65-byte signatures over
    /// `signed_message_hash(commitment_hash(target, value, payload))`, ordered
    /// by signer address ascending. With an empty `payload` the value is
    /// transferred; otherwise `on_bridge_execute` is called on `target` with
    /// `payload` as its arguments.
    ///
    /// The commitment is recorded as executed before the release is
    /// scheduled. If the release fails, `on_execute_complete` removes the
    /// record again.
    #[handle_result]
    pub fn authorize(
        &mut self,
        target: AccountId,
        value: U128,
        payload: Base64VecU8,
        signatures: Vec<Base64VecU8>,
    ) -> Result<Promise, BridgeError> {
        let commitment =
            hashing::commitment_hash(&env::current_account_id(), &target, value.0, &payload.0);
        let signed_hash = hashing::signed_message_hash(&commitment);

        if signatures.len() < THRESHOLD {
            return Err(BridgeError::InsufficientSignatures);
        }
        if self.executed.contains(&signed_hash) {
            return Err(BridgeError::AlreadyExecuted);
        }
        self.verify_signers(&signed_hash, &signatures)?;
        if !escrow::can_release(value.0) {
            return Err(BridgeError::CallFailed);
        }

        self.executed.insert(signed_hash);

        Ok(self.release(target, value, payload, signed_hash))
    }

    /// Callback after the released call completes.
    ///
    /// Emits `authorized` on success. On failure the execution record is
    /// removed so the commitment is as if never authorized, and the
    /// transaction ends in a `CallFailed` receipt via [`Self::fail_release`].
    #[allow(deprecated)]
    #[private]
    pub fn on_execute_complete(
        &mut self,
        target: AccountId,
        value: U128,
        payload: Base64VecU8,
        signed_hash: Bytes32,
    ) -> PromiseOrValue<bool> {
        require!(
            env::promise_results_count() == 1,
            "Expected one promise result"
        );

        match env::promise_result(0) {
            PromiseResult::Successful(_) => {
                ThresholdEvent::Authorized {
                    target: &target,
                    value: &value,
                    payload: &payload,
                    signed_hash: hex::encode(signed_hash),
                }
                .emit();
                PromiseOrValue::Value(true)
            }
            _ => {
                self.executed.remove(&signed_hash);
                log!(
                    "{}: release to {} failed; execution record rolled back",
                    BridgeError::CallFailed,
                    target
                );
                ThresholdEvent::ExecutionReverted {
                    target: &target,
                    value: &value,
                    signed_hash: hex::encode(signed_hash),
                    reason: BridgeError::CallFailed.to_string(),
                }
                .emit();
                PromiseOrValue::Promise(
                    ext_self::ext(env::current_account_id())
                        .with_static_gas(GAS_FOR_FAILURE_REPORT)
                        .fail_release(BridgeError::CallFailed),
                )
            }
        }
    }

    /// Final receipt of a rolled-back release. Always fails with `error`, so
    /// the transaction outcome names the failure while the rollback, made in
    /// the previous receipt, persists.
    #[private]
    #[handle_result]
    pub fn fail_release(&self, error: BridgeError) -> Result<(), BridgeError> {
        Err(error)
    }

    /// Adds the attached deposit to the escrow.
    #[payable]
    pub fn fund(&mut self) {
        let amount = env::attached_deposit().as_yoctonear();
        require!(amount > 0, "Attached deposit must be positive");

        ThresholdEvent::Funded {
            sender: &env::predecessor_account_id(),
            amount: &U128(amount),
        }
        .emit();
    }

    // ========================================================================
    // View Methods
    // ========================================================================

    /// Commitment hash of a call, bound to this deployment.
    pub fn commitment_hash(&self, target: AccountId, value: U128, payload: Base64VecU8) -> Bytes32 {
        hashing::commitment_hash(&env::current_account_id(), &target, value.0, &payload.0)
    }

    /// The digest validators sign for a given commitment hash.
    pub fn signed_message_hash(&self, hash: Bytes32) -> Bytes32 {
        hashing::signed_message_hash(&hash)
    }

    /// Address recovered from `signature` over `hash`.
    #[handle_result]
    pub fn recover_signer(
        &self,
        hash: Bytes32,
        signature: Base64VecU8,
    ) -> Result<EthAddress, BridgeError> {
        recovery::recover_signer(&hash, &signature.0)
    }

    pub fn is_validator(&self, address: EthAddress) -> bool {
        self.validator_lookup.contains(&address)
    }

    pub fn get_validators(&self) -> Vec<EthAddress> {
        self.validators.clone()
    }

    pub fn get_threshold(&self) -> u32 {
        THRESHOLD as u32
    }

    pub fn is_executed(&self, signed_hash: Bytes32) -> bool {
        self.executed.contains(&signed_hash)
    }

    // ========================================================================
    // Internal Helpers
    // ========================================================================

    /// Single pass over the signatures: every signer must be a validator and
    /// strictly greater than the one before it.
    fn verify_signers(
        &self,
        signed_hash: &Bytes32,
        signatures: &[Base64VecU8],
    ) -> Result<(), BridgeError> {
        let mut last_signer = EthAddress::ZERO;
        for signature in signatures {
            let signer = recovery::recover_signer(signed_hash, &signature.0)?;
            if !self.validator_lookup.contains(&signer) {
                return Err(BridgeError::InvalidSigner);
            }
            if signer <= last_signer {
                return Err(BridgeError::SignersNotAscending);
            }
            last_signer = signer;
        }
        Ok(())
    }

    fn release(
        &self,
        target: AccountId,
        value: U128,
        payload: Base64VecU8,
        signed_hash: Bytes32,
    ) -> Promise {
        let amount = NearToken::from_yoctonear(value.0);
        let call = if payload.0.is_empty() {
            Promise::new(target.clone()).transfer(amount)
        } else {
            Promise::new(target.clone()).function_call(
                EXECUTE_METHOD.to_string(),
                payload.0.clone(),
                amount,
                GAS_FOR_EXECUTE_CALL,
            )
        };

        call.then(
            ext_self::ext(env::current_account_id())
                .with_static_gas(GAS_FOR_CALLBACK)
                .on_execute_complete(target, value, payload, signed_hash),
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
