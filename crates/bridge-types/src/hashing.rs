//! Deterministic digests shared by both authorization models.
//!
//! Every variable-length field is written with a little-endian `u32` length
//! prefix (the Borsh layout), so the encoding is injective and sensitive to
//! argument order. All digests are keccak256 computed by the host.

use near_sdk::{env, AccountId};

use crate::types::{Bytes32, EthAddress, ETH_ADDRESS_LENGTH};

/// Prefix of the standard Ethereum personal-message wrapper for a 32-byte digest.
pub const ETH_SIGNED_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

/// Digest binding a call to the deployment that will execute it.
///
/// `contract_id` is the identity of the authorizing contract, so a commitment
/// signed for one deployment can never be replayed against another.
pub fn commitment_hash(
    contract_id: &AccountId,
    target: &AccountId,
    value: u128,
    payload: &[u8],
) -> Bytes32 {
    let mut data = Vec::new();
    push_prefixed(&mut data, contract_id.as_str().as_bytes());
    push_prefixed(&mut data, target.as_str().as_bytes());
    data.extend_from_slice(&value.to_le_bytes());
    push_prefixed(&mut data, payload);

    env::keccak256_array(&data)
}

/// Wraps a commitment hash in the `"\x19Ethereum Signed Message:\n32"` envelope
/// that standard signing tools apply before signing.
pub fn signed_message_hash(hash: &Bytes32) -> Bytes32 {
    let mut data = Vec::with_capacity(ETH_SIGNED_MESSAGE_PREFIX.len() + hash.len());
    data.extend_from_slice(ETH_SIGNED_MESSAGE_PREFIX);
    data.extend_from_slice(hash);

    env::keccak256_array(&data)
}

/// Public commitment to a deposit, emitted on the source side.
pub fn event_hash(
    depositor: &AccountId,
    amount: u128,
    destination_chain_id: u64,
    secret: &Bytes32,
) -> Bytes32 {
    let mut data = Vec::new();
    push_prefixed(&mut data, depositor.as_str().as_bytes());
    data.extend_from_slice(&amount.to_le_bytes());
    data.extend_from_slice(&destination_chain_id.to_le_bytes());
    data.extend_from_slice(secret);

    env::keccak256_array(&data)
}

/// One-time public value derived from a deposit secret.
pub fn nullifier_hash(secret: &Bytes32) -> Bytes32 {
    env::keccak256_array(secret)
}

/// Ethereum address of an uncompressed secp256k1 public key (64 bytes, no
/// `0x04` tag): the last 20 bytes of its keccak256 digest.
pub fn eth_address(public_key: &[u8; 64]) -> EthAddress {
    let digest = env::keccak256_array(public_key);
    let mut address = [0u8; ETH_ADDRESS_LENGTH];
    address.copy_from_slice(&digest[32 - ETH_ADDRESS_LENGTH..]);
    EthAddress(address)
}

fn push_prefixed(data: &mut Vec<u8>, bytes: &[u8]) {
    data.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
    data.extend_from_slice(bytes);
}

#[cfg(test)]
mod tests {
    use super::*;
    use near_sdk::test_utils::VMContextBuilder;
    use near_sdk::testing_env;

    fn account(id: &str) -> AccountId {
        id.parse().unwrap()
    }

    fn setup() {
        testing_env!(VMContextBuilder::new().build());
    }

    #[test]
    fn test_commitment_hash_is_deterministic() {
        setup();
        let bridge = account("bridge.near");
        let target = account("alice.near");

        let a = commitment_hash(&bridge, &target, 100, b"payload");
        let b = commitment_hash(&bridge, &target, 100, b"payload");
        assert_eq!(a, b);
    }

    #[test]
    fn test_commitment_hash_changes_with_each_field() {
        setup();
        let bridge = account("bridge.near");
        let target = account("alice.near");
        let base = commitment_hash(&bridge, &target, 100, b"payload");

        assert_ne!(base, commitment_hash(&account("other.near"), &target, 100, b"payload"));
        assert_ne!(base, commitment_hash(&bridge, &account("bob.near"), 100, b"payload"));
        assert_ne!(base, commitment_hash(&bridge, &target, 101, b"payload"));
        assert_ne!(base, commitment_hash(&bridge, &target, 100, b"payloae"));
        assert_ne!(base, commitment_hash(&bridge, &target, 100, b""));
    }

    #[test]
    fn test_commitment_hash_is_order_sensitive() {
        setup();
        let a = account("a.near");
        let b = account("b.near");
        assert_ne!(commitment_hash(&a, &b, 1, &[]), commitment_hash(&b, &a, 1, &[]));
    }

    #[test]
    fn test_length_prefix_prevents_boundary_shift() {
        setup();
        // Moving bytes between the target and the payload must change the digest.
        let bridge = account("bridge.near");
        let a = commitment_hash(&bridge, &account("ab.near"), 0, b"c");
        let b = commitment_hash(&bridge, &account("ab.nea"), 0, b"rc");
        assert_ne!(a, b);
    }

    #[test]
    fn test_signed_message_hash_matches_envelope() {
        setup();
        let hash = [7u8; 32];
        let mut expected_input = b"\x19Ethereum Signed Message:\n32".to_vec();
        expected_input.extend_from_slice(&hash);

        assert_eq!(signed_message_hash(&hash), env::keccak256_array(&expected_input));
        assert_ne!(signed_message_hash(&hash), hash);
    }

    #[test]
    fn test_event_and_nullifier_hashes_are_independent() {
        setup();
        let depositor = account("alice.near");
        let secret = [42u8; 32];

        let event = event_hash(&depositor, 10, 1, &secret);
        let nullifier = nullifier_hash(&secret);
        assert_ne!(event, nullifier);
        assert_ne!(event, event_hash(&depositor, 11, 1, &secret));
        assert_ne!(event, event_hash(&depositor, 10, 2, &secret));
        assert_ne!(nullifier, nullifier_hash(&[43u8; 32]));
    }

    #[test]
    fn test_eth_address_takes_low_twenty_bytes() {
        setup();
        let public_key = [9u8; 64];
        let digest = env::keccak256_array(&public_key);
        assert_eq!(eth_address(&public_key).0[..], digest[12..]);
    }
}
