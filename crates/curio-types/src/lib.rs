//! # curio-types
//!
//! Shared types, errors, and configuration for the **Curio** NFT exchange
//! engine.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`Address`], [`TokenId`], [`OrderKey`]
//! - **Order model**: [`Order`], [`Direction`], [`Fulfillment`], [`OrderState`], [`OrderStatus`]
//! - **Trade model**: [`Trade`], [`RoyaltyShare`]
//! - **Event model**: [`ExchangeEvent`]
//! - **Call context**: [`CallContext`]
//! - **Configuration**: [`ExchangeConfig`]
//! - **Errors**: [`CurioError`] with `CU_ERR_` prefix codes
//! - **Constants**: system-wide limits and defaults

pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod event;
pub mod ids;
pub mod order;
pub mod trade;

// Re-export all primary types at crate root for ergonomic imports:
//   use curio_types::{Order, Direction, Trade, CallContext, ...};

pub use config::*;
pub use context::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use order::*;
pub use trade::*;

// Constants are accessed via `curio_types::constants::FOO`
// (not re-exported to avoid name collisions).
