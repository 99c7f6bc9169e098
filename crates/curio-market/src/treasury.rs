//! Treasury: owner-gated custody of accumulated inflows.
//!
//! Accumulates listing/execution tips (native currency), settlement-token
//! remainders and donations, and donated NFTs. Balances are created
//! implicitly on first credit and drained (never destroyed) by owner
//! withdrawal. The owner is explicit state here, not an ambient global.

use std::collections::BTreeSet;

use curio_types::{Address, CurioError, Result, TokenId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// What an owner withdrawal targets. `None` amounts drain the full balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WithdrawAsset {
    Native { amount: Option<Decimal> },
    Settlement { amount: Option<Decimal> },
    Nft { token: Address, token_id: TokenId },
}

/// Accumulated exchange-owned balances and NFT custody.
#[derive(Debug)]
pub struct Treasury {
    owner: Address,
    native: Decimal,
    settlement: Decimal,
    custody: BTreeSet<(Address, TokenId)>,
}

impl Treasury {
    #[must_use]
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            native: Decimal::ZERO,
            settlement: Decimal::ZERO,
            custody: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn owner(&self) -> Address {
        self.owner
    }

    #[must_use]
    pub fn native_balance(&self) -> Decimal {
        self.native
    }

    #[must_use]
    pub fn settlement_balance(&self) -> Decimal {
        self.settlement
    }

    #[must_use]
    pub fn holds_nft(&self, token: Address, token_id: TokenId) -> bool {
        self.custody.contains(&(token, token_id))
    }

    /// NFTs currently held in custody, ordered by (collection, id).
    #[must_use]
    pub fn custody(&self) -> Vec<(Address, TokenId)> {
        self.custody.iter().copied().collect()
    }

    pub fn require_owner(&self, caller: Address) -> Result<()> {
        if caller == self.owner {
            Ok(())
        } else {
            Err(CurioError::NotOwner)
        }
    }

    // -- Credits (implicit creation on first credit) ------------------------

    pub fn credit_native(&mut self, amount: Decimal) {
        self.native += amount;
    }

    pub fn credit_settlement(&mut self, amount: Decimal) {
        self.settlement += amount;
    }

    pub fn credit_nft(&mut self, token: Address, token_id: TokenId) {
        self.custody.insert((token, token_id));
    }

    // -- Owner-gated debits -------------------------------------------------

    /// Debit native balance. `None` (or an explicit zero) drains everything.
    /// Returns the amount debited.
    pub fn take_native(&mut self, caller: Address, amount: Option<Decimal>) -> Result<Decimal> {
        self.require_owner(caller)?;
        let requested = effective_amount(amount, self.native);
        if requested > self.native {
            return Err(CurioError::InsufficientTreasury {
                requested,
                held: self.native,
            });
        }
        self.native -= requested;
        tracing::info!(amount = %requested, "Native treasury withdrawal");
        Ok(requested)
    }

    /// Debit settlement-token balance; the caller performs the actual token
    /// transfer afterwards. Returns the amount debited.
    pub fn take_settlement(&mut self, caller: Address, amount: Option<Decimal>) -> Result<Decimal> {
        self.require_owner(caller)?;
        let requested = effective_amount(amount, self.settlement);
        if requested > self.settlement {
            return Err(CurioError::InsufficientTreasury {
                requested,
                held: self.settlement,
            });
        }
        self.settlement -= requested;
        tracing::info!(amount = %requested, "Settlement treasury withdrawal");
        Ok(requested)
    }

    /// Release a custodied NFT; the caller performs the transfer afterwards.
    pub fn take_nft(&mut self, caller: Address, token: Address, token_id: TokenId) -> Result<()> {
        self.require_owner(caller)?;
        if !self.custody.remove(&(token, token_id)) {
            return Err(CurioError::NftNotInCustody { token, token_id });
        }
        tracing::info!(%token, %token_id, "NFT released from custody");
        Ok(())
    }

    /// Single-step ownership transfer. The zero address is rejected: there
    /// is no renounce operation.
    pub fn transfer_ownership(&mut self, caller: Address, new_owner: Address) -> Result<Address> {
        self.require_owner(caller)?;
        if new_owner.is_zero() {
            return Err(CurioError::ZeroAddressOwner);
        }
        let previous = self.owner;
        self.owner = new_owner;
        Ok(previous)
    }
}

/// `None` and zero both mean "everything currently held".
fn effective_amount(amount: Option<Decimal>, held: Decimal) -> Decimal {
    match amount {
        Some(a) if !a.is_zero() => a,
        _ => held,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> Address {
        Address::dummy(1)
    }

    #[test]
    fn credits_accumulate() {
        let mut treasury = Treasury::new(owner());
        treasury.credit_native(Decimal::ONE);
        treasury.credit_native(Decimal::TWO);
        treasury.credit_settlement(Decimal::TEN);
        treasury.credit_nft(Address::dummy(2), TokenId(3));

        assert_eq!(treasury.native_balance(), Decimal::new(3, 0));
        assert_eq!(treasury.settlement_balance(), Decimal::TEN);
        assert!(treasury.holds_nft(Address::dummy(2), TokenId(3)));
    }

    #[test]
    fn non_owner_cannot_withdraw() {
        let mut treasury = Treasury::new(owner());
        treasury.credit_native(Decimal::TEN);

        let err = treasury.take_native(Address::dummy(9), None).unwrap_err();
        assert!(matches!(err, CurioError::NotOwner));
        assert_eq!(treasury.native_balance(), Decimal::TEN);
    }

    #[test]
    fn zero_amount_drains_everything() {
        let mut treasury = Treasury::new(owner());
        treasury.credit_native(Decimal::TEN);

        let taken = treasury
            .take_native(owner(), Some(Decimal::ZERO))
            .unwrap();
        assert_eq!(taken, Decimal::TEN);
        assert_eq!(treasury.native_balance(), Decimal::ZERO);
    }

    #[test]
    fn partial_withdrawal_leaves_remainder() {
        let mut treasury = Treasury::new(owner());
        treasury.credit_settlement(Decimal::TEN);

        let taken = treasury
            .take_settlement(owner(), Some(Decimal::new(4, 0)))
            .unwrap();
        assert_eq!(taken, Decimal::new(4, 0));
        assert_eq!(treasury.settlement_balance(), Decimal::new(6, 0));
    }

    #[test]
    fn overdraw_fails() {
        let mut treasury = Treasury::new(owner());
        treasury.credit_settlement(Decimal::ONE);
        let err = treasury
            .take_settlement(owner(), Some(Decimal::TEN))
            .unwrap_err();
        assert!(matches!(err, CurioError::InsufficientTreasury { .. }));
    }

    #[test]
    fn nft_custody_release() {
        let mut treasury = Treasury::new(owner());
        let token = Address::dummy(2);
        treasury.credit_nft(token, TokenId(3));

        treasury.take_nft(owner(), token, TokenId(3)).unwrap();
        assert!(!treasury.holds_nft(token, TokenId(3)));

        let err = treasury.take_nft(owner(), token, TokenId(3)).unwrap_err();
        assert!(matches!(err, CurioError::NftNotInCustody { .. }));
    }

    #[test]
    fn ownership_transfer_single_step() {
        let mut treasury = Treasury::new(owner());
        let new_owner = Address::dummy(5);

        let err = treasury
            .transfer_ownership(Address::dummy(9), new_owner)
            .unwrap_err();
        assert!(matches!(err, CurioError::NotOwner));

        let previous = treasury.transfer_ownership(owner(), new_owner).unwrap();
        assert_eq!(previous, owner());
        assert_eq!(treasury.owner(), new_owner);

        // The old owner immediately loses authority.
        let err = treasury.take_native(owner(), None).unwrap_err();
        assert!(matches!(err, CurioError::NotOwner));
    }

    #[test]
    fn zero_address_owner_rejected() {
        let mut treasury = Treasury::new(owner());
        let err = treasury
            .transfer_ownership(owner(), Address::ZERO)
            .unwrap_err();
        assert!(matches!(err, CurioError::ZeroAddressOwner));
        assert_eq!(treasury.owner(), owner());
    }
}
