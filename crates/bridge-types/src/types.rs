//! Core type definitions for the Aegis bridge.

use std::fmt;
use std::str::FromStr;

use near_sdk::near;

/// A 32-byte fixed-size array used for digests.
///
/// This type is used throughout the bridge for:
/// - Commitment hashes and their signed-message wrappers
/// - Deposit event hashes
/// - Nullifier hashes
/// - Deposit secrets
///
/// Equivalent to `bytes32` in Solidity.
pub type Bytes32 = [u8; 32];

/// Length in bytes of an Ethereum-style signer address.
pub const ETH_ADDRESS_LENGTH: usize = 20;

/// A 20-byte signer identity recovered from a secp256k1 signature.
///
/// Ordering is lexicographic over the raw bytes, which matches the numeric
/// ordering of `address` values in Solidity. Validator signatures must be
/// supplied in strictly ascending order of this value.
///
/// JSON form is a `0x`-prefixed lowercase hex string; input may omit the
/// prefix.
#[near(serializers = [json, borsh])]
#[serde(try_from = "String", into = "String")]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EthAddress(pub [u8; ETH_ADDRESS_LENGTH]);

impl EthAddress {
    /// The all-zero address. Lower than every real identity, never a validator.
    pub const ZERO: EthAddress = EthAddress([0u8; ETH_ADDRESS_LENGTH]);

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl fmt::Display for EthAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Parses a hex address with or without the `0x` prefix.
impl FromStr for EthAddress {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let mut bytes = [0u8; ETH_ADDRESS_LENGTH];
        hex::decode_to_slice(digits, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for EthAddress {
    type Error = hex::FromHexError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EthAddress> for String {
    fn from(address: EthAddress) -> Self {
        address.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_address_sorts_below_everything() {
        let mut low = [0u8; ETH_ADDRESS_LENGTH];
        low[ETH_ADDRESS_LENGTH - 1] = 1;
        assert!(EthAddress::ZERO < EthAddress(low));
        assert!(EthAddress::ZERO.is_zero());
        assert!(!EthAddress(low).is_zero());
    }

    #[test]
    fn test_ordering_is_big_endian() {
        let a: EthAddress = "0x0100000000000000000000000000000000000000".parse().unwrap();
        let b: EthAddress = "00ffffffffffffffffffffffffffffffffffffff".parse().unwrap();
        assert!(b < a);
    }

    #[test]
    fn test_display_parse_roundtrip() {
        let text = "0x5b38da6a701c568545dcfcb03fcb875f56beddc4";
        let address: EthAddress = text.parse().unwrap();
        assert_eq!(address.to_string(), text);
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        assert!("0x1234".parse::<EthAddress>().is_err());
    }

    #[test]
    fn test_json_is_hex_string() {
        let text = "0x5b38da6a701c568545dcfcb03fcb875f56beddc4";
        let address: EthAddress = text.parse().unwrap();

        let json = near_sdk::serde_json::to_string(&address).unwrap();
        assert_eq!(json, format!("\"{text}\""));

        let unprefixed: EthAddress =
            near_sdk::serde_json::from_str("\"5b38da6a701c568545dcfcb03fcb875f56beddc4\"").unwrap();
        assert_eq!(unprefixed, address);
        assert!(near_sdk::serde_json::from_str::<EthAddress>("\"0x12\"").is_err());
    }
}
