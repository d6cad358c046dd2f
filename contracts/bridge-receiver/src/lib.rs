//! Example target for threshold-authorized calls.
//!
//! The bridge calls `on_bridge_execute` with the released value attached and
//! the authorized payload as JSON arguments. This contract records what it
//! received; a real target would act on the memo instead.

use near_sdk::json_types::U128;
use near_sdk::{env, log, near, require, AccountId, PanicOnDefault};

#[near(contract_state)]
#[derive(PanicOnDefault)]
pub struct BridgeReceiver {
    /// The only account allowed to deliver bridge calls.
    bridge: AccountId,
    last_memo: Option<String>,
    total_received: u128,
}

#[near]
impl BridgeReceiver {
    #[init]
    pub fn new(bridge: AccountId) -> Self {
        Self {
            bridge,
            last_memo: None,
            total_received: 0,
        }
    }

    /// Entry point for authorized calls carrying a payload.
    #[payable]
    pub fn on_bridge_execute(&mut self, memo: String) {
        require!(
            env::predecessor_account_id() == self.bridge,
            "Only the bridge can deliver calls"
        );
        let value = env::attached_deposit().as_yoctonear();
        self.total_received = self.total_received.saturating_add(value);
        log!("Received {} yoctoNEAR with memo {:?}", value, memo);
        self.last_memo = Some(memo);
    }

    pub fn get_last_memo(&self) -> Option<String> {
        self.last_memo.clone()
    }

    pub fn get_total_received(&self) -> U128 {
        U128(self.total_received)
    }
}
