//! # curio-market
//!
//! Persistent state of the Curio exchange: the append-only **Order Store**
//! (orders grouped per NFT collection, with volume statistics for
//! reporting), the **Trade Ledger** (append-only fill records), and the
//! **Treasury** (owner-gated native/settlement/NFT custody).
//!
//! Nothing in this crate talks to external collaborators; derived order
//! status and settlement live in `curio-settlement`.

pub mod ledger;
pub mod store;
pub mod treasury;

pub use ledger::TradeLedger;
pub use store::{CollectionBook, CollectionStats, OrderStore};
pub use treasury::{Treasury, WithdrawAsset};
