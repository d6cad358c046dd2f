//! Aegis source-side escrow.
//!
//! Locks native value and publishes a commitment to the deposit. The
//! commitment (event hash) binds the depositor, the amount, the destination
//! chain and a depositor-chosen secret; a later release proof on the
//! destination side shows knowledge of a deposit matching it.
//!
//! The secret is an ordinary call argument and therefore visible in this
//! chain's transaction history. Unlinkability between a deposit and its
//! release only holds against observers who do not correlate the two before
//! the release lands.

use bridge_types::events::AegisEvent;
use bridge_types::{hashing, BridgeError, Bytes32};
use near_sdk::json_types::{U128, U64};
use near_sdk::{env, near, AccountId, PanicOnDefault};

#[near(contract_state)]
#[derive(PanicOnDefault)]
pub struct AegisSource {
    /// Total value locked by deposits, in yoctoNEAR.
    total_locked: u128,

    /// Number of deposits accepted.
    deposit_count: u64,
}

#[near]
impl AegisSource {
    #[init]
    pub fn new() -> Self {
        Self {
            total_locked: 0,
            deposit_count: 0,
        }
    }

    /// Locks the attached deposit and emits its event hash.
    ///
    /// Deposits are not replay-sensitive: depositing twice with the same
    /// arguments creates two independent events.
    ///
    /// # Arguments
    ///
    /// * `destination_chain_id` - Chain the value is bridged to
    /// * `secret` - Random value known only to the depositor; its hash becomes
    ///   the release nullifier
    ///
    /// # Returns
    ///
    /// The event hash `H(depositor, value, destination_chain_id, secret)`.
    #[payable]
    #[handle_result]
    pub fn deposit(
        &mut self,
        destination_chain_id: u64,
        secret: Bytes32,
    ) -> Result<Bytes32, BridgeError> {
        let value = env::attached_deposit().as_yoctonear();
        if value == 0 {
            return Err(BridgeError::ZeroDeposit);
        }

        let depositor = env::predecessor_account_id();
        let event_hash = hashing::event_hash(&depositor, value, destination_chain_id, &secret);

        self.total_locked = self.total_locked.saturating_add(value);
        self.deposit_count += 1;

        AegisEvent::Deposited {
            depositor: &depositor,
            value: &U128(value),
            destination_chain_id,
            event_hash: hex::encode(event_hash),
        }
        .emit();

        Ok(event_hash)
    }

    // ========== View Methods ==========

    /// Event hash a deposit with these parameters would emit.
    pub fn compute_event_hash(
        &self,
        depositor: AccountId,
        amount: U128,
        destination_chain_id: u64,
        secret: Bytes32,
    ) -> Bytes32 {
        hashing::event_hash(&depositor, amount.0, destination_chain_id, &secret)
    }

    /// Nullifier hash a release of a deposit with this secret will consume.
    pub fn compute_nullifier_hash(&self, secret: Bytes32) -> Bytes32 {
        hashing::nullifier_hash(&secret)
    }

    pub fn get_total_locked(&self) -> U128 {
        U128(self.total_locked)
    }

    pub fn get_deposit_count(&self) -> U64 {
        U64(self.deposit_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use near_sdk::test_utils::{accounts, get_logs, VMContextBuilder};
    use near_sdk::{testing_env, NearToken};

    fn deposit_context(depositor: AccountId, yocto: u128) {
        let mut builder = VMContextBuilder::new();
        builder
            .predecessor_account_id(depositor)
            .current_account_id("source.near".parse().unwrap())
            .attached_deposit(NearToken::from_yoctonear(yocto));
        testing_env!(builder.build());
    }

    fn setup() -> AegisSource {
        deposit_context(accounts(0), 0);
        AegisSource::new()
    }

    #[test]
    fn test_new() {
        let contract = setup();
        assert_eq!(contract.get_total_locked().0, 0);
        assert_eq!(contract.get_deposit_count().0, 0);
    }

    #[test]
    fn test_zero_deposit_rejected() {
        let mut contract = setup();
        deposit_context(accounts(1), 0);

        assert_eq!(
            contract.deposit(1, [1u8; 32]).err(),
            Some(BridgeError::ZeroDeposit)
        );
        assert_eq!(contract.get_deposit_count().0, 0);
        assert!(get_logs().iter().all(|log| !log.contains("EVENT_JSON")));
    }

    #[test]
    fn test_deposit_emits_event_hash() {
        let mut contract = setup();
        let secret = [7u8; 32];
        deposit_context(accounts(1), 500);

        let event_hash = contract.deposit(42, secret).unwrap();

        assert_eq!(
            event_hash,
            hashing::event_hash(&accounts(1), 500, 42, &secret)
        );
        assert_eq!(
            event_hash,
            contract.compute_event_hash(accounts(1), U128(500), 42, secret)
        );

        let events: Vec<String> = get_logs()
            .into_iter()
            .filter(|log| log.starts_with("EVENT_JSON:"))
            .collect();
        assert_eq!(events.len(), 1);
        assert!(events[0].contains("\"event\":\"deposited\""));
        assert!(events[0].contains(&hex::encode(event_hash)));
        assert!(events[0].contains("\"value\":\"500\""));
        assert!(events[0].contains("\"destination_chain_id\":42"));
        assert_eq!(contract.get_total_locked().0, 500);
    }

    #[test]
    fn test_double_deposit_is_legal() {
        let mut contract = setup();
        let secret = [7u8; 32];

        deposit_context(accounts(1), 100);
        let first = contract.deposit(1, secret).unwrap();
        deposit_context(accounts(1), 100);
        let second = contract.deposit(1, secret).unwrap();

        assert_eq!(first, second);
        assert_eq!(contract.get_deposit_count().0, 2);
        assert_eq!(contract.get_total_locked().0, 200);
    }

    #[test]
    fn test_event_hash_binds_depositor() {
        let mut contract = setup();
        let secret = [9u8; 32];

        deposit_context(accounts(1), 100);
        let from_bob = contract.deposit(1, secret).unwrap();
        deposit_context(accounts(2), 100);
        let from_charlie = contract.deposit(1, secret).unwrap();

        assert_ne!(from_bob, from_charlie);
    }

    #[test]
    fn test_nullifier_view_matches_hashing() {
        let contract = setup();
        let secret = [3u8; 32];
        assert_eq!(
            contract.compute_nullifier_hash(secret),
            hashing::nullifier_hash(&secret)
        );
    }
}
