//! secp256k1 signer recovery for validator signatures.
//!
//! Recovery never decides whether a signature is acceptable. A malformed or
//! forged signature either fails host recovery, which yields
//! [`EthAddress::ZERO`], or recovers some unrelated key; both are rejected by
//! the validator membership check that follows.

use bridge_types::{hashing, BridgeError, Bytes32, EthAddress};
use near_sdk::env;

/// Serialized signature length: `r (32) || s (32) || v (1)`.
pub const SIGNATURE_LENGTH: usize = 65;

/// Offset Ethereum tooling adds to the recovery id.
const ETHEREUM_V_OFFSET: u8 = 27;

/// Highest recovery id the host accepts.
const MAX_RECOVERY_ID: u8 = 3;

/// Recovers the address that produced `signature` over `signed_hash`.
///
/// Only low-s signatures are accepted by the host, so a signature cannot be
/// replayed in its malleated form.
pub fn recover_signer(signed_hash: &Bytes32, signature: &[u8]) -> Result<EthAddress, BridgeError> {
    if signature.len() != SIGNATURE_LENGTH {
        return Err(BridgeError::InvalidSignatureLength);
    }

    let (rs, v) = signature.split_at(SIGNATURE_LENGTH - 1);
    let recovery_id = match v[0] {
        v if v >= ETHEREUM_V_OFFSET => v - ETHEREUM_V_OFFSET,
        v => v,
    };
    if recovery_id > MAX_RECOVERY_ID {
        return Ok(EthAddress::ZERO);
    }

    Ok(env::ecrecover(signed_hash, rs, recovery_id, true)
        .map(|public_key| hashing::eth_address(&public_key))
        .unwrap_or(EthAddress::ZERO))
}
