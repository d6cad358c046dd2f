//! Named failure outcomes for the bridge contracts.
//!
//! Each variant identifies exactly one violated precondition. Contract methods
//! return `Result<_, BridgeError>` under `#[handle_result]`; an `Err` aborts
//! the receipt with the variant name as the panic message, so no registry
//! mutation or effect from that receipt survives.
//!
//! The JSON form is the variant name, which lets a contract pass an outcome
//! to its own failure-reporting method.

use near_sdk::{near, FunctionError};
use thiserror::Error;

#[near(serializers = [json])]
#[derive(Error, FunctionError, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeError {
    /// Fewer signatures than the threshold were supplied.
    #[error("InsufficientSignatures")]
    InsufficientSignatures,

    /// The signed commitment hash has already been authorized.
    #[error("AlreadyExecuted")]
    AlreadyExecuted,

    /// A recovered signer is not a member of the validator set.
    #[error("InvalidSigner")]
    InvalidSigner,

    /// Recovered signers are not in strictly ascending order.
    #[error("SignersNotAscending")]
    SignersNotAscending,

    /// A signature is not exactly 65 bytes.
    #[error("InvalidSignatureLength")]
    InvalidSignatureLength,

    /// The authorized call to the target did not succeed.
    #[error("CallFailed")]
    CallFailed,

    /// A deposit was made without attached value.
    #[error("ZeroDeposit")]
    ZeroDeposit,

    /// No verification oracle was supplied at construction.
    #[error("InvalidVerifierAddress")]
    InvalidVerifierAddress,

    /// The nullifier carried by the proof has already been consumed.
    #[error("ProofAlreadyUsed")]
    ProofAlreadyUsed,

    /// The verification oracle rejected the proof.
    #[error("InvalidProof")]
    InvalidProof,

    /// The value transfer to the recipient did not succeed.
    #[error("TransferFailed")]
    TransferFailed,

    /// The validator set does not have exactly the required number of members.
    #[error("InvalidValidatorCount")]
    InvalidValidatorCount,

    /// The validator set contains the zero address.
    #[error("ZeroValidator")]
    ZeroValidator,

    /// The validator set contains the same address twice.
    #[error("DuplicateValidator")]
    DuplicateValidator,
}
