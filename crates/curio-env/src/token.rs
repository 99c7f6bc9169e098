//! Settlement-token collaborator interface.

use curio_types::{Address, Result};
use rust_decimal::Decimal;

/// The fungible settlement token the exchange prices orders in.
///
/// Mirrors the ERC-20 surface the engine actually consumes. A failed
/// transfer must return an error rather than silently succeeding; the
/// engine treats any error as a hard failure of the call in progress.
pub trait SettlementToken {
    fn balance_of(&self, owner: Address) -> Decimal;

    fn allowance(&self, owner: Address, spender: Address) -> Decimal;

    /// Move `amount` from `from` to `to` on behalf of `spender`.
    ///
    /// When `spender != from`, the implementation must check (and consume)
    /// the allowance `from → spender`.
    fn transfer_from(
        &self,
        spender: Address,
        from: Address,
        to: Address,
        amount: Decimal,
    ) -> Result<()>;
}
