//! Escrow liquidity checks shared by the releasing contracts.

use near_sdk::{env, NearToken};

/// Balance the current contract can move without touching the amount staked
/// for its own storage.
pub fn spendable_balance() -> NearToken {
    let staked = env::storage_byte_cost().saturating_mul(u128::from(env::storage_usage()));
    env::account_balance().saturating_sub(staked)
}

/// Whether the escrow can pay out `amount` yoctoNEAR right now.
pub fn can_release(amount: u128) -> bool {
    spendable_balance().as_yoctonear() >= amount
}
