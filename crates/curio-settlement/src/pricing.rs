//! Fill eligibility and pricing rules.
//!
//! The four order shapes (BUY×SELL × ANY×ALL) form a closed tag; each
//! combination's amount and eligibility rule is a pure function of the tag,
//! not a dispatch hierarchy.
//!
//! - ANY: any non-empty eligible subset may fill, one trade per identifier,
//!   `price` is per identifier.
//! - ALL: the requested set must equal the full eligible set exactly, one
//!   trade covering it, `price` is the all-or-nothing total.

use curio_types::{CurioError, Direction, Fulfillment, Order, Result, TokenId};
use rust_decimal::Decimal;

/// Validate the requested identifier set against the order's mode and
/// remaining fill capacity. `remaining` is the capacity still unclaimed —
/// for batch planning this may be lower than the order's own counter says,
/// when earlier legs of the same batch already claimed fills.
pub fn validate_fill(order: &Order, requested: &[TokenId], remaining: u64) -> Result<()> {
    if requested.is_empty() {
        return Err(CurioError::InvalidOrder {
            reason: "empty fill set".into(),
        });
    }
    let mut canonical = requested.to_vec();
    canonical.sort_unstable();
    canonical.dedup();
    if canonical.len() != requested.len() {
        return Err(CurioError::InvalidOrder {
            reason: "duplicate identifiers in fill set".into(),
        });
    }

    match order.fulfillment {
        Fulfillment::All => {
            if canonical != order.token_ids {
                return Err(CurioError::PartialFillNotAllowed);
            }
        }
        Fulfillment::Any => {
            for id in &canonical {
                if !order.is_eligible(*id) {
                    return Err(CurioError::InvalidOrder {
                        reason: format!("identifier {id} not eligible"),
                    });
                }
            }
            if canonical.len() as u64 > remaining {
                return Err(CurioError::InvalidOrder {
                    reason: format!(
                        "{} identifiers requested, {remaining} fills remaining",
                        canonical.len()
                    ),
                });
            }
        }
    }
    Ok(())
}

/// Gross settlement amount for matching `matched` identifiers.
#[must_use]
pub fn fill_amount(order: &Order, matched: usize) -> Decimal {
    match order.fulfillment {
        Fulfillment::Any => order.price * Decimal::from(matched as u64),
        Fulfillment::All => order.price,
    }
}

/// How many fills (trade-counter increments) matching `matched`
/// identifiers consumes.
#[must_use]
pub fn fill_count(order: &Order, matched: usize) -> u64 {
    match order.fulfillment {
        Fulfillment::Any => matched as u64,
        Fulfillment::All => 1,
    }
}

/// Settlement-token payer and receiver for a fill of this order.
/// BUY: the maker acquires NFTs and pays; SELL: the taker pays the maker.
#[must_use]
pub fn payer_receiver(order: &Order, taker: curio_types::Address) -> (curio_types::Address, curio_types::Address) {
    match order.direction {
        Direction::Buy => (order.maker, taker),
        Direction::Sell => (taker, order.maker),
    }
}
