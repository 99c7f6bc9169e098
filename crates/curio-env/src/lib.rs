//! # curio-env
//!
//! The external-collaborator boundary of the Curio exchange: trait
//! definitions for the fungible settlement token, NFT collections, and the
//! royalty lookup service, plus an [`ExchangeEnv`] aggregation the engine
//! threads through every call.
//!
//! The caller identity is an explicit `spender`/`operator` parameter on the
//! transfer methods, so implementations can enforce real allowance and
//! operator-approval semantics. The engine always passes its own exchange
//! address there.
//!
//! The `test-helpers` feature provides in-memory mocks that behave like the
//! real contracts: transfers fail without funds, allowance, ownership, or
//! operator approval, which keeps status-oracle verdicts and transfer
//! outcomes consistent in tests.

pub mod collection;
pub mod royalty;
pub mod token;

#[cfg(any(test, feature = "test-helpers"))]
pub mod mock;

pub use collection::NftCollection;
pub use royalty::RoyaltyEngine;
pub use token::SettlementToken;

#[cfg(any(test, feature = "test-helpers"))]
pub use mock::{FixedRateRoyalty, MockCollection, MockEnv, MockToken};

use curio_types::Address;

/// Everything external the engine reads from or writes to during a call.
pub trait ExchangeEnv {
    /// The fungible settlement token (WETH-like).
    fn settlement_token(&self) -> &dyn SettlementToken;

    /// The NFT collection at `token`, if one is registered there.
    fn collection(&self, token: Address) -> Option<&dyn NftCollection>;

    /// The royalty lookup collaborator.
    fn royalty_engine(&self) -> &dyn RoyaltyEngine;
}
