//! Exchange event log.
//!
//! Every state transition appends an [`ExchangeEvent`] to an in-order log,
//! standing in for the contract event stream that external indexers consume.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Address, OrderKey, TokenId};

/// One entry in the append-only event log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ExchangeEvent {
    OrderAdded {
        token: Address,
        index: usize,
        key: OrderKey,
        maker: Address,
        tip: Decimal,
        integrator: Option<Address>,
    },
    OrderCancelled {
        token: Address,
        index: usize,
        key: OrderKey,
    },
    TradeExecuted {
        ledger_index: usize,
        key: OrderKey,
        taker: Address,
        gross_amount: Decimal,
        integrator: Option<Address>,
    },
    /// Native currency attached to a call or sent unsolicited.
    TipReceived { from: Address, amount: Decimal },
    /// Unsolicited settlement-token transfer accepted into treasury.
    TokenDonation { from: Address, amount: Decimal },
    /// Unsolicited NFT transfer accepted into treasury custody.
    NftDonation {
        from: Address,
        token: Address,
        token_id: TokenId,
    },
    NativeWithdrawn { to: Address, amount: Decimal },
    SettlementWithdrawn { to: Address, amount: Decimal },
    NftWithdrawn {
        to: Address,
        token: Address,
        token_id: TokenId,
    },
    OwnershipTransferred { from: Address, to: Address },
}

/// An event with its position and timestamp in the log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggedEvent {
    pub sequence: u64,
    pub at: DateTime<Utc>,
    pub event: ExchangeEvent,
}
