//! In-memory mock collaborators for tests.
//!
//! The mocks enforce the same preconditions as the real contracts —
//! balances, allowances, ownership, operator approval — through interior
//! mutability, so the traits can stay `&self` like real contract calls.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet};

use curio_types::{Address, CurioError, Result, RoyaltyShare, TokenId, constants};
use rust_decimal::Decimal;

use crate::{ExchangeEnv, NftCollection, RoyaltyEngine, SettlementToken};

// ---------------------------------------------------------------------------
// MockToken
// ---------------------------------------------------------------------------

/// ERC-20-like settlement token with real balance/allowance bookkeeping.
#[derive(Debug, Default)]
pub struct MockToken {
    balances: RefCell<HashMap<Address, Decimal>>,
    allowances: RefCell<HashMap<(Address, Address), Decimal>>,
}

impl MockToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mint(&self, to: Address, amount: Decimal) {
        *self.balances.borrow_mut().entry(to).or_default() += amount;
    }

    /// Set (not increase) the allowance `owner → spender`.
    pub fn approve(&self, owner: Address, spender: Address, amount: Decimal) {
        self.allowances.borrow_mut().insert((owner, spender), amount);
    }
}

impl SettlementToken for MockToken {
    fn balance_of(&self, owner: Address) -> Decimal {
        self.balances.borrow().get(&owner).copied().unwrap_or_default()
    }

    fn allowance(&self, owner: Address, spender: Address) -> Decimal {
        self.allowances
            .borrow()
            .get(&(owner, spender))
            .copied()
            .unwrap_or_default()
    }

    fn transfer_from(
        &self,
        spender: Address,
        from: Address,
        to: Address,
        amount: Decimal,
    ) -> Result<()> {
        if spender != from && self.allowance(from, spender) < amount {
            return Err(CurioError::TransferFailed {
                reason: format!("allowance {from} -> {spender} below {amount}"),
            });
        }
        {
            let mut balances = self.balances.borrow_mut();
            let held = balances.get(&from).copied().unwrap_or_default();
            if held < amount {
                return Err(CurioError::TransferFailed {
                    reason: format!("balance of {from} is {held}, need {amount}"),
                });
            }
            balances.insert(from, held - amount);
            *balances.entry(to).or_default() += amount;
        }
        if spender != from {
            let mut allowances = self.allowances.borrow_mut();
            if let Some(remaining) = allowances.get_mut(&(from, spender)) {
                *remaining -= amount;
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MockCollection
// ---------------------------------------------------------------------------

/// ERC-721-like collection with ownership and operator approvals.
#[derive(Debug, Default)]
pub struct MockCollection {
    owners: RefCell<BTreeMap<TokenId, Address>>,
    operators: RefCell<HashSet<(Address, Address)>>,
}

impl MockCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mint(&self, to: Address, token_id: TokenId) {
        self.owners.borrow_mut().insert(token_id, to);
    }

    pub fn set_approval_for_all(&self, owner: Address, operator: Address, approved: bool) {
        let mut operators = self.operators.borrow_mut();
        if approved {
            operators.insert((owner, operator));
        } else {
            operators.remove(&(owner, operator));
        }
    }

    /// All identifiers currently owned by `owner`, in ascending order.
    #[must_use]
    pub fn owned_by(&self, owner: Address) -> Vec<TokenId> {
        self.owners
            .borrow()
            .iter()
            .filter(|(_, o)| **o == owner)
            .map(|(id, _)| *id)
            .collect()
    }
}

impl NftCollection for MockCollection {
    fn owner_of(&self, token_id: TokenId) -> Option<Address> {
        self.owners.borrow().get(&token_id).copied()
    }

    fn is_approved_for_all(&self, owner: Address, operator: Address) -> bool {
        self.operators.borrow().contains(&(owner, operator))
    }

    fn transfer_from(
        &self,
        operator: Address,
        from: Address,
        to: Address,
        token_id: TokenId,
    ) -> Result<()> {
        let mut owners = self.owners.borrow_mut();
        match owners.get(&token_id) {
            Some(owner) if *owner == from => {}
            Some(_) => {
                return Err(CurioError::TransferFailed {
                    reason: format!("{from} does not own {token_id}"),
                });
            }
            None => {
                return Err(CurioError::TransferFailed {
                    reason: format!("{token_id} does not exist"),
                });
            }
        }
        if operator != from && !self.operators.borrow().contains(&(from, operator)) {
            return Err(CurioError::TransferFailed {
                reason: format!("{operator} not approved by {from}"),
            });
        }
        owners.insert(token_id, to);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FixedRateRoyalty
// ---------------------------------------------------------------------------

/// Royalty registry paying fixed basis-point rates to fixed recipients.
#[derive(Debug, Default)]
pub struct FixedRateRoyalty {
    recipients: Vec<(Address, u16)>,
}

impl FixedRateRoyalty {
    #[must_use]
    pub fn new(recipients: Vec<(Address, u16)>) -> Self {
        Self { recipients }
    }

    /// A registry that reports no royalties for anything.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }
}

impl RoyaltyEngine for FixedRateRoyalty {
    fn royalties_for(
        &self,
        _token: Address,
        _token_id: TokenId,
        value: Decimal,
    ) -> Vec<RoyaltyShare> {
        self.recipients
            .iter()
            .map(|(recipient, bps)| RoyaltyShare {
                recipient: *recipient,
                amount: value * Decimal::from(*bps)
                    / Decimal::from(constants::ROYALTY_DENOMINATOR_BPS),
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// MockEnv
// ---------------------------------------------------------------------------

/// A complete mock environment: one settlement token, any number of
/// collections, one royalty registry.
#[derive(Debug, Default)]
pub struct MockEnv {
    pub token: MockToken,
    pub royalty: FixedRateRoyalty,
    collections: HashMap<Address, MockCollection>,
}

impl MockEnv {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_royalty(royalty: FixedRateRoyalty) -> Self {
        Self {
            royalty,
            ..Self::default()
        }
    }

    /// Register an empty collection at `token`.
    pub fn add_collection(&mut self, token: Address) -> &MockCollection {
        self.collections.entry(token).or_default()
    }

    #[must_use]
    pub fn collection_at(&self, token: Address) -> Option<&MockCollection> {
        self.collections.get(&token)
    }
}

impl ExchangeEnv for MockEnv {
    fn settlement_token(&self) -> &dyn SettlementToken {
        &self.token
    }

    fn collection(&self, token: Address) -> Option<&dyn NftCollection> {
        self.collections
            .get(&token)
            .map(|c| c as &dyn NftCollection)
    }

    fn royalty_engine(&self) -> &dyn RoyaltyEngine {
        &self.royalty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_transfer_moves_balance() {
        let token = MockToken::new();
        let a = Address::dummy(1);
        let b = Address::dummy(2);
        token.mint(a, Decimal::new(100, 0));

        token.transfer_from(a, a, b, Decimal::new(40, 0)).unwrap();
        assert_eq!(token.balance_of(a), Decimal::new(60, 0));
        assert_eq!(token.balance_of(b), Decimal::new(40, 0));
    }

    #[test]
    fn token_transfer_requires_allowance() {
        let token = MockToken::new();
        let owner = Address::dummy(1);
        let spender = Address::dummy(2);
        let to = Address::dummy(3);
        token.mint(owner, Decimal::new(100, 0));

        let err = token
            .transfer_from(spender, owner, to, Decimal::ONE)
            .unwrap_err();
        assert!(matches!(err, CurioError::TransferFailed { .. }));

        token.approve(owner, spender, Decimal::TEN);
        token.transfer_from(spender, owner, to, Decimal::ONE).unwrap();
        assert_eq!(token.allowance(owner, spender), Decimal::new(9, 0));
    }

    #[test]
    fn token_transfer_requires_balance() {
        let token = MockToken::new();
        let a = Address::dummy(1);
        let err = token
            .transfer_from(a, a, Address::dummy(2), Decimal::ONE)
            .unwrap_err();
        assert!(matches!(err, CurioError::TransferFailed { .. }));
    }

    #[test]
    fn collection_transfer_requires_ownership_and_operator() {
        let nft = MockCollection::new();
        let owner = Address::dummy(1);
        let operator = Address::dummy(2);
        let to = Address::dummy(3);
        nft.mint(owner, TokenId(7));

        // Not approved yet
        let err = nft
            .transfer_from(operator, owner, to, TokenId(7))
            .unwrap_err();
        assert!(matches!(err, CurioError::TransferFailed { .. }));

        nft.set_approval_for_all(owner, operator, true);
        nft.transfer_from(operator, owner, to, TokenId(7)).unwrap();
        assert_eq!(nft.owner_of(TokenId(7)), Some(to));

        // Wrong `from` fails even for an approved operator
        nft.mint(owner, TokenId(8));
        let err = nft
            .transfer_from(operator, to, owner, TokenId(8))
            .unwrap_err();
        assert!(matches!(err, CurioError::TransferFailed { .. }));
    }

    #[test]
    fn owned_by_lists_identifiers() {
        let nft = MockCollection::new();
        let owner = Address::dummy(1);
        nft.mint(owner, TokenId(2));
        nft.mint(owner, TokenId(0));
        nft.mint(Address::dummy(9), TokenId(1));
        assert_eq!(nft.owned_by(owner), vec![TokenId(0), TokenId(2)]);
    }

    #[test]
    fn fixed_rate_royalty_scales_with_value() {
        let r1 = Address::dummy(8);
        let r2 = Address::dummy(9);
        let engine = FixedRateRoyalty::new(vec![(r1, 500), (r2, 250)]);
        let shares = engine.royalties_for(Address::dummy(2), TokenId(0), Decimal::new(1000, 0));
        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].amount, Decimal::new(50, 0));
        assert_eq!(shares[1].amount, Decimal::new(25, 0));
    }

    #[test]
    fn env_resolves_collections() {
        let mut env = MockEnv::new();
        let token = Address::dummy(2);
        env.add_collection(token);
        assert!(env.collection(token).is_some());
        assert!(env.collection(Address::dummy(3)).is_none());
    }
}
