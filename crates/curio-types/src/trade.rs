//! Trade records appended to the ledger by the settlement engine.
//!
//! A [`Trade`] is the immutable audit record of one successful fill. ANY
//! fills produce one record per matched identifier; ALL fills produce a
//! single record covering the whole eligible set.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Address, Direction, OrderKey, TokenId};

/// One royalty payout leg within a trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoyaltyShare {
    pub recipient: Address,
    pub amount: Decimal,
}

/// Immutable record of an executed fill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    /// Content key of the filled order.
    pub order_key: OrderKey,
    /// Collection the fill was scoped to.
    pub token: Address,
    /// Storage index of the order within its collection book.
    pub order_index: usize,
    /// Identifiers moved by this fill.
    pub token_ids: Vec<TokenId>,
    /// The maker's direction; the taker took the opposite side.
    pub direction: Direction,
    pub maker: Address,
    pub taker: Address,
    /// Settlement amount before royalty deduction.
    pub gross_amount: Decimal,
    /// What the settlement-token receiver kept after royalties.
    pub counterparty_amount: Decimal,
    /// Royalty payouts deducted from the gross amount.
    pub royalties: Vec<RoyaltyShare>,
    /// Scaling dust withheld from royalties, accrued to treasury.
    pub treasury_remainder: Decimal,
    pub executed_at: DateTime<Utc>,
}

impl Trade {
    /// Sum of all royalty payouts in this trade.
    #[must_use]
    pub fn royalty_total(&self) -> Decimal {
        self.royalties.iter().map(|r| r.amount).sum()
    }

    /// Value conservation: gross splits exactly into counterparty share,
    /// royalties, and treasury remainder.
    #[must_use]
    pub fn conserves_value(&self) -> bool {
        self.counterparty_amount + self.royalty_total() + self.treasury_remainder
            == self.gross_amount
    }
}

impl std::fmt::Display for Trade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Trade[{}] {} {} ids={} gross={}",
            self.order_key,
            self.direction,
            self.token.short(),
            self.token_ids.len(),
            self.gross_amount,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_trade() -> Trade {
        Trade {
            order_key: OrderKey([7u8; 32]),
            token: Address::dummy(2),
            order_index: 0,
            token_ids: vec![TokenId(3)],
            direction: Direction::Buy,
            maker: Address::dummy(1),
            taker: Address::dummy(4),
            gross_amount: Decimal::new(100, 0),
            counterparty_amount: Decimal::new(98, 0),
            royalties: vec![RoyaltyShare {
                recipient: Address::dummy(9),
                amount: Decimal::new(2, 0),
            }],
            treasury_remainder: Decimal::ZERO,
            executed_at: Utc::now(),
        }
    }

    #[test]
    fn royalty_total_sums_shares() {
        let trade = make_trade();
        assert_eq!(trade.royalty_total(), Decimal::new(2, 0));
    }

    #[test]
    fn value_conservation_holds() {
        let trade = make_trade();
        assert!(trade.conserves_value());
    }

    #[test]
    fn value_conservation_detects_leak() {
        let mut trade = make_trade();
        trade.counterparty_amount = Decimal::new(97, 0);
        assert!(!trade.conserves_value());
    }

    #[test]
    fn trade_serde_roundtrip() {
        let trade = make_trade();
        let json = serde_json::to_string(&trade).unwrap();
        let back: Trade = serde_json::from_str(&json).unwrap();
        assert_eq!(trade.order_key, back.order_key);
        assert_eq!(trade.gross_amount, back.gross_amount);
        assert_eq!(trade.royalties, back.royalties);
    }
}
