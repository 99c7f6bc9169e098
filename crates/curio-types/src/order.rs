//! Order model for the Curio exchange.
//!
//! An [`Order`] is a maker's standing conditional offer against one NFT
//! collection. Only the trade counter and the stored [`OrderState`] ever
//! change after listing; everything else is immutable and covered by the
//! order's content-hash [`OrderKey`].
//!
//! The full [`OrderStatus`] (including the `NotExecutable` reasons) is
//! **derived** from live collaborator reads by the status oracle — it is
//! never cached on the order itself.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{Address, OrderKey, TokenId};

/// Which way the maker is trading: BUY acquires NFTs for settlement token,
/// SELL supplies NFTs for settlement token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Direction {
    Buy,
    Sell,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// How an order may be satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Fulfillment {
    /// Each fill may take any eligible subset, up to `trade_max` fills total.
    Any,
    /// A single all-or-nothing fill covering the entire eligible set.
    All,
}

impl std::fmt::Display for Fulfillment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Any => write!(f, "ANY"),
            Self::All => write!(f, "ALL"),
        }
    }
}

/// Stored lifecycle state. `Cancelled` and `Executed` are terminal; every
/// richer verdict is derived fresh by the status oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum OrderState {
    Open,
    Cancelled,
    Executed,
}

impl std::fmt::Display for OrderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Cancelled => write!(f, "CANCELLED"),
            Self::Executed => write!(f, "EXECUTED"),
        }
    }
}

/// Why an open order cannot currently execute. Ordered by check priority:
/// the first failing check determines the reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum UnexecutableReason {
    /// Past its expiry timestamp.
    Expired,
    /// Trade counter has reached `trade_max` (pre-terminal read).
    Maxxed,
    /// BUY maker no longer holds enough settlement token.
    InsufficientBalance,
    /// BUY maker revoked or never granted a sufficient allowance.
    InsufficientAllowance,
    /// SELL maker no longer owns a listed identifier.
    TokenNotOwned,
    /// SELL maker revoked the exchange's operator approval.
    OperatorNotApproved,
}

impl std::fmt::Display for UnexecutableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Expired => write!(f, "EXPIRED"),
            Self::Maxxed => write!(f, "MAXXED"),
            Self::InsufficientBalance => write!(f, "INSUFFICIENT_BALANCE"),
            Self::InsufficientAllowance => write!(f, "INSUFFICIENT_ALLOWANCE"),
            Self::TokenNotOwned => write!(f, "TOKEN_NOT_OWNED"),
            Self::OperatorNotApproved => write!(f, "OPERATOR_NOT_APPROVED"),
        }
    }
}

/// Derived order status, computed by the status oracle on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Active,
    Cancelled,
    Executed,
    NotExecutable(UnexecutableReason),
}

impl OrderStatus {
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "ACTIVE"),
            Self::Cancelled => write!(f, "CANCELLED"),
            Self::Executed => write!(f, "EXECUTED"),
            Self::NotExecutable(reason) => write!(f, "NOT_EXECUTABLE({reason})"),
        }
    }
}

/// A maker's standing conditional order against one NFT collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// The account that listed the order; sole cancel authority.
    pub maker: Address,
    /// Optional counterparty restriction; `None` means any taker.
    pub taker: Option<Address>,
    /// The NFT collection this order is scoped to.
    pub token: Address,
    /// Eligible identifiers, sorted and deduplicated. Empty = wildcard.
    pub token_ids: Vec<TokenId>,
    pub direction: Direction,
    pub fulfillment: Fulfillment,
    /// Settlement amount: per matched identifier for ANY, total for ALL.
    pub price: Decimal,
    /// Absolute expiry; `None` means the order never expires.
    pub expiry: Option<DateTime<Utc>>,
    /// Cumulative fills so far. Invariant: `trade_count <= trade_max`.
    pub trade_count: u64,
    /// Maximum fills allowed; exactly 1 for ALL orders.
    pub trade_max: u64,
    /// Basis-point cap on royalty the maker absorbs for this order.
    pub royalty_factor_bps: u16,
    /// Integrator recorded for off-chain rebate processing.
    pub integrator: Option<Address>,
    /// Content hash of the immutable fields above.
    pub key: OrderKey,
    pub state: OrderState,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Build an order, normalising the identifier set (sort + dedup) and
    /// computing the content-hash key. Structural validation lives in the
    /// order store; this constructor only canonicalises.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        maker: Address,
        taker: Option<Address>,
        token: Address,
        mut token_ids: Vec<TokenId>,
        direction: Direction,
        fulfillment: Fulfillment,
        price: Decimal,
        expiry: Option<DateTime<Utc>>,
        trade_max: u64,
        royalty_factor_bps: u16,
        integrator: Option<Address>,
        created_at: DateTime<Utc>,
    ) -> Self {
        token_ids.sort_unstable();
        token_ids.dedup();
        let key = compute_order_key(
            maker,
            taker,
            token,
            &token_ids,
            direction,
            fulfillment,
            price,
            expiry,
            trade_max,
            royalty_factor_bps,
        );
        Self {
            maker,
            taker,
            token,
            token_ids,
            direction,
            fulfillment,
            price,
            expiry,
            trade_count: 0,
            trade_max,
            royalty_factor_bps,
            integrator,
            key,
            state: OrderState::Open,
            created_at,
        }
    }

    /// An empty identifier set matches any identifier in the collection.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.token_ids.is_empty()
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.state != OrderState::Open
    }

    /// Fills still available before the order is exhausted.
    #[must_use]
    pub fn remaining_fills(&self) -> u64 {
        self.trade_max.saturating_sub(self.trade_count)
    }

    /// Whether `id` may be matched against this order.
    #[must_use]
    pub fn is_eligible(&self, id: TokenId) -> bool {
        self.is_wildcard() || self.token_ids.binary_search(&id).is_ok()
    }

    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry.is_some_and(|e| now > e)
    }

    /// Whether `candidate` is allowed to fill this order.
    #[must_use]
    pub fn permits_taker(&self, candidate: Address) -> bool {
        self.taker.is_none_or(|t| t == candidate)
    }
}

/// Domain-tagged SHA-256 over an order's immutable fields.
#[must_use]
#[allow(clippy::too_many_arguments)]
pub fn compute_order_key(
    maker: Address,
    taker: Option<Address>,
    token: Address,
    token_ids: &[TokenId],
    direction: Direction,
    fulfillment: Fulfillment,
    price: Decimal,
    expiry: Option<DateTime<Utc>>,
    trade_max: u64,
    royalty_factor_bps: u16,
) -> OrderKey {
    let mut hasher = Sha256::new();
    hasher.update(b"curio:order_key:v1:");
    hasher.update(maker.as_bytes());
    hasher.update(taker.unwrap_or(Address::ZERO).as_bytes());
    hasher.update(token.as_bytes());
    hasher.update((token_ids.len() as u64).to_le_bytes());
    for id in token_ids {
        hasher.update(id.0.to_le_bytes());
    }
    hasher.update([direction as u8, fulfillment as u8]);
    hasher.update(price.serialize());
    hasher.update(expiry.map_or(0, |e| e.timestamp_millis()).to_le_bytes());
    hasher.update(trade_max.to_le_bytes());
    hasher.update(royalty_factor_bps.to_le_bytes());
    let hash = hasher.finalize();
    OrderKey(hash.into())
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Order {
    /// A BUY/ANY order over `{3, 4, 5}` with wide-open defaults.
    #[must_use]
    pub fn dummy_buy_any(maker: Address, token: Address, price: Decimal) -> Self {
        Self::new(
            maker,
            None,
            token,
            vec![TokenId(3), TokenId(4), TokenId(5)],
            Direction::Buy,
            Fulfillment::Any,
            price,
            None,
            5,
            100,
            None,
            Utc::now(),
        )
    }

    /// A SELL/ALL order over `{0, 1, 2}`.
    #[must_use]
    pub fn dummy_sell_all(maker: Address, token: Address, price: Decimal) -> Self {
        Self::new(
            maker,
            None,
            token,
            vec![TokenId(0), TokenId(1), TokenId(2)],
            Direction::Sell,
            Fulfillment::All,
            price,
            None,
            1,
            100,
            None,
            Utc::now(),
        )
    }
}
