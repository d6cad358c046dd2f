//! Deterministic secp256k1 validator keys for unit tests.

use bridge_types::{hashing, Bytes32, EthAddress};
use k256::ecdsa::SigningKey;
use k256::elliptic_curve::sec1::ToEncodedPoint;

pub fn signing_key(seed: u8) -> SigningKey {
    SigningKey::from_slice(&[seed; 32]).unwrap()
}

pub fn address_of(key: &SigningKey) -> EthAddress {
    let point = key.verifying_key().as_affine().to_encoded_point(false);
    let public_key: [u8; 64] = point.as_bytes()[1..].try_into().unwrap();
    hashing::eth_address(&public_key)
}

/// 65-byte `r || s || v` signature with an Ethereum-style `v` of 27 or 28.
pub fn sign(key: &SigningKey, signed_hash: &Bytes32) -> Vec<u8> {
    let (signature, recovery_id) = key.sign_prehash_recoverable(signed_hash).unwrap();
    let mut bytes = signature.to_bytes().to_vec();
    bytes.push(recovery_id.to_byte() + 27);
    bytes
}

/// Validator keys for seeds 1..=5, sorted by address ascending.
pub fn sorted_validator_keys() -> Vec<SigningKey> {
    let mut keys: Vec<SigningKey> = (1..=5).map(signing_key).collect();
    keys.sort_by_key(address_of);
    keys
}
