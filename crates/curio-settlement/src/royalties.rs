//! Royalty-aware payment splitting.
//!
//! A fill's gross amount splits three ways: royalty recipients (up to the
//! applied basis-point budget), the settlement-token counterparty (the
//! rest), and the treasury (scaling dust and shares routed to the zero
//! address). Conservation holds by construction:
//! `gross == counterparty + Σ royalties + treasury_remainder`.

use curio_types::{RoyaltyShare, constants};
use rust_decimal::{Decimal, RoundingStrategy};

/// Outcome of splitting one fill's gross settlement amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentSplit {
    /// What the settlement-token receiver keeps.
    pub counterparty: Decimal,
    /// Royalty payouts, zero-amount shares removed.
    pub royalties: Vec<RoyaltyShare>,
    /// Unrouted remainder accrued to treasury.
    pub treasury_remainder: Decimal,
}

/// Split `gross` between the counterparty, royalty recipients, and the
/// treasury.
///
/// The applied factor is `min(order_bps, cap_bps)`; raw registry shares are
/// paid in full when they fit the budget `gross × applied / 10_000`, and
/// scaled down proportionally when they exceed it. Shares addressed to the
/// zero address are unroutable and accrue to treasury instead.
#[must_use]
pub fn split_payment(
    gross: Decimal,
    order_bps: u16,
    cap_bps: u16,
    raw_shares: &[RoyaltyShare],
) -> PaymentSplit {
    let applied = u32::from(order_bps.min(cap_bps));
    let budget = gross * Decimal::from(applied)
        / Decimal::from(constants::ROYALTY_DENOMINATOR_BPS);

    let total_raw: Decimal = raw_shares.iter().map(|s| s.amount).sum();
    if budget <= Decimal::ZERO || total_raw <= Decimal::ZERO {
        return PaymentSplit {
            counterparty: gross,
            royalties: Vec::new(),
            treasury_remainder: Decimal::ZERO,
        };
    }

    // Withheld from the counterparty: the raw total, capped at the budget.
    let withheld = total_raw.min(budget);
    let scale = withheld / total_raw;

    let mut royalties = Vec::with_capacity(raw_shares.len());
    let mut routed = Decimal::ZERO;
    for share in raw_shares {
        let amount = (share.amount * scale)
            .round_dp_with_strategy(constants::AMOUNT_SCALE, RoundingStrategy::ToZero);
        if amount.is_zero() {
            continue;
        }
        if share.recipient.is_zero() {
            // Unroutable; falls through to the treasury remainder.
            continue;
        }
        routed += amount;
        royalties.push(RoyaltyShare {
            recipient: share.recipient,
            amount,
        });
    }

    PaymentSplit {
        counterparty: gross - withheld,
        royalties,
        treasury_remainder: withheld - routed,
    }
}

impl PaymentSplit {
    #[must_use]
    pub fn royalty_total(&self) -> Decimal {
        self.royalties.iter().map(|r| r.amount).sum()
    }

    /// Total gross this split accounts for.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.counterparty + self.royalty_total() + self.treasury_remainder
    }
}
