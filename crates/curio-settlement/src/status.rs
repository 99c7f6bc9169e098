//! Status oracle: derive an order's current executability.
//!
//! Pure and side-effect free. Evaluated fresh on every read and before
//! every settlement attempt — never cached, because the inputs (maker
//! balance, allowance, ownership, operator approval) live in external
//! collaborators and change independently of the exchange.
//!
//! Check priority is fixed; the first failing check wins:
//! terminal state → expiry → maxxed → balance → allowance → ownership →
//! operator approval.

use chrono::{DateTime, Utc};
use curio_env::ExchangeEnv;
use curio_types::{Address, Direction, Order, OrderState, OrderStatus, UnexecutableReason};

/// Derive the current status of `order` from stored terminal flags and
/// live collaborator reads. `exchange` is the exchange's own address, the
/// spender/operator the maker must have authorised.
#[must_use]
pub fn order_status(
    order: &Order,
    exchange: Address,
    now: DateTime<Utc>,
    env: &dyn ExchangeEnv,
) -> OrderStatus {
    match order.state {
        OrderState::Cancelled => return OrderStatus::Cancelled,
        OrderState::Executed => return OrderStatus::Executed,
        OrderState::Open => {}
    }
    if order.is_expired(now) {
        return OrderStatus::NotExecutable(UnexecutableReason::Expired);
    }
    if order.remaining_fills() == 0 {
        // Lingering read before the engine marks the order Executed.
        return OrderStatus::NotExecutable(UnexecutableReason::Maxxed);
    }

    match order.direction {
        Direction::Buy => {
            let token = env.settlement_token();
            if token.balance_of(order.maker) < order.price {
                return OrderStatus::NotExecutable(UnexecutableReason::InsufficientBalance);
            }
            if token.allowance(order.maker, exchange) < order.price {
                return OrderStatus::NotExecutable(UnexecutableReason::InsufficientAllowance);
            }
        }
        Direction::Sell => {
            let Some(collection) = env.collection(order.token) else {
                return OrderStatus::NotExecutable(UnexecutableReason::TokenNotOwned);
            };
            // Wildcard SELL ownership cannot be enumerated here; the
            // planner verifies the concrete requested identifiers instead.
            for id in &order.token_ids {
                if collection.owner_of(*id) != Some(order.maker) {
                    return OrderStatus::NotExecutable(UnexecutableReason::TokenNotOwned);
                }
            }
            if !collection.is_approved_for_all(order.maker, exchange) {
                return OrderStatus::NotExecutable(UnexecutableReason::OperatorNotApproved);
            }
        }
    }

    OrderStatus::Active
}
