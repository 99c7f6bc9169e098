//! Order Store: per-collection arenas of orders.
//!
//! Orders are stored by dense index inside a growable per-collection array
//! and are never physically removed — cancellation and execution only flip
//! the stored terminal state. External references use the content-hash
//! `OrderKey`; the (collection, index) pair is the storage address.

use std::collections::HashMap;

use curio_types::{Address, CurioError, Fulfillment, Order, OrderKey, OrderState, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Per-collection trading statistics, maintained by the settlement engine
/// and read by the external reporting helper.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CollectionStats {
    /// Fills executed against orders of this collection.
    pub executed_fills: u64,
    /// Cumulative identifiers moved.
    pub ids_traded: u64,
    /// Cumulative settlement-token volume (gross).
    pub settlement_volume: Decimal,
}

/// All orders ever listed against one collection, plus its statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionBook {
    pub token: Address,
    pub orders: Vec<Order>,
    pub stats: CollectionStats,
}

impl CollectionBook {
    fn new(token: Address) -> Self {
        Self {
            token,
            orders: Vec::new(),
            stats: CollectionStats::default(),
        }
    }
}

/// The append-only collection of all orders, grouped per collection.
#[derive(Debug, Default)]
pub struct OrderStore {
    /// Collections in first-listing order, for enumeration.
    tokens: Vec<Address>,
    books: HashMap<Address, CollectionBook>,
}

impl OrderStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a canonicalised order after structural validation.
    ///
    /// Returns the storage index within the collection book and the
    /// content-hash key.
    ///
    /// # Errors
    /// `InvalidOrder` for a zero collection address, non-positive price,
    /// zero `trade_max`, an ALL order with an empty (wildcard) set, or an
    /// ALL order whose `trade_max` is not exactly 1.
    pub fn add_order(&mut self, order: Order) -> Result<(usize, OrderKey)> {
        if order.token.is_zero() {
            return Err(CurioError::InvalidOrder {
                reason: "collection address is zero".into(),
            });
        }
        if order.price <= Decimal::ZERO {
            return Err(CurioError::InvalidOrder {
                reason: format!("price {} is not positive", order.price),
            });
        }
        if order.trade_max == 0 {
            return Err(CurioError::InvalidOrder {
                reason: "trade_max is zero".into(),
            });
        }
        if order.fulfillment == Fulfillment::All {
            if order.is_wildcard() {
                return Err(CurioError::InvalidOrder {
                    reason: "ALL order with empty identifier set".into(),
                });
            }
            if order.trade_max != 1 {
                return Err(CurioError::InvalidOrder {
                    reason: format!("ALL order with trade_max {}", order.trade_max),
                });
            }
        }

        let book = self.books.entry(order.token).or_insert_with(|| {
            self.tokens.push(order.token);
            CollectionBook::new(order.token)
        });
        let key = order.key;
        book.orders.push(order);
        Ok((book.orders.len() - 1, key))
    }

    /// Cancel the order at (token, index). Maker-only; terminal states
    /// cannot be cancelled again.
    pub fn cancel_order(&mut self, token: Address, index: usize, caller: Address) -> Result<OrderKey> {
        let order = self.order_mut(token, index)?;
        if order.maker != caller {
            return Err(CurioError::NotMaker);
        }
        if order.is_terminal() {
            return Err(CurioError::AlreadyTerminal);
        }
        order.state = OrderState::Cancelled;
        Ok(order.key)
    }

    /// Resolve an order by its storage address.
    pub fn order(&self, token: Address, index: usize) -> Result<&Order> {
        self.books
            .get(&token)
            .and_then(|b| b.orders.get(index))
            .ok_or(CurioError::UnknownOrder { token, index })
    }

    /// Mutable resolution, for the settlement engine's commit phase.
    pub fn order_mut(&mut self, token: Address, index: usize) -> Result<&mut Order> {
        self.books
            .get_mut(&token)
            .and_then(|b| b.orders.get_mut(index))
            .ok_or(CurioError::UnknownOrder { token, index })
    }

    /// Record a committed fill in the per-collection statistics.
    pub fn record_fill(&mut self, token: Address, ids_moved: u64, gross: Decimal) {
        if let Some(book) = self.books.get_mut(&token) {
            book.stats.executed_fills += 1;
            book.stats.ids_traded += ids_moved;
            book.stats.settlement_volume += gross;
        }
    }

    // -- Reporting surface --------------------------------------------------

    /// Collections in first-listing order.
    #[must_use]
    pub fn tokens(&self) -> &[Address] {
        &self.tokens
    }

    #[must_use]
    pub fn orders_length(&self, token: Address) -> usize {
        self.books.get(&token).map_or(0, |b| b.orders.len())
    }

    /// Batched indexed lookup for the reporting helper; out-of-range
    /// indices come back as `None` rather than failing the whole read.
    #[must_use]
    pub fn get_orders(&self, token: Address, indices: &[usize]) -> Vec<Option<Order>> {
        let orders = self.books.get(&token).map(|b| b.orders.as_slice());
        indices
            .iter()
            .map(|&i| orders.and_then(|o| o.get(i)).cloned())
            .collect()
    }

    #[must_use]
    pub fn stats(&self, token: Address) -> CollectionStats {
        self.books.get(&token).map_or_else(CollectionStats::default, |b| b.stats)
    }
}
