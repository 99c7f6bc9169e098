//! Error types for the Curio exchange engine.
//!
//! All errors use the `CU_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Order / listing errors
//! - 2xx: Batch execution errors
//! - 3xx: Treasury / ownership errors
//! - 4xx: Collaborator errors
//!
//! Externally-induced unexecutability (a maker losing balance, allowance,
//! ownership or operator approval after listing) is deliberately **not** an
//! error: it is an [`crate::OrderStatus`] verdict, and affected batch legs
//! are skipped rather than failed.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{Address, TokenId};

/// Central error enum for all Curio operations.
#[derive(Debug, Error)]
pub enum CurioError {
    // =================================================================
    // Order / Listing Errors (1xx)
    // =================================================================
    /// The order failed structural validation at listing time.
    #[error("CU_ERR_100: Invalid order: {reason}")]
    InvalidOrder { reason: String },

    /// No order exists at the given (collection, index) slot.
    #[error("CU_ERR_101: Unknown order: collection {token}, index {index}")]
    UnknownOrder { token: Address, index: usize },

    /// The order is already Cancelled or Executed.
    #[error("CU_ERR_102: Order is already in a terminal state")]
    AlreadyTerminal,

    /// Only the maker may cancel an order.
    #[error("CU_ERR_103: Caller is not the order maker")]
    NotMaker,

    /// The attached listing tip is below the configured minimum.
    #[error("CU_ERR_104: Listing tip too low: required {required}, attached {attached}")]
    TipTooLow { required: Decimal, attached: Decimal },

    // =================================================================
    // Batch Execution Errors (2xx)
    // =================================================================
    /// The parallel batch arrays have differing lengths.
    #[error("CU_ERR_200: Batch array length mismatch: {tokens} collections, {indices} indices, {id_sets} identifier sets")]
    LengthMismatch {
        tokens: usize,
        indices: usize,
        id_sets: usize,
    },

    /// An ALL-mode order was asked to fill a subset or superset of its set.
    #[error("CU_ERR_201: Partial fill not allowed for ALL-mode order")]
    PartialFillNotAllowed,

    /// The order is restricted to a different taker.
    #[error("CU_ERR_202: Caller is not the permitted taker for this order")]
    TakerNotPermitted,

    /// A maker may not fill their own order.
    #[error("CU_ERR_203: Maker cannot fill their own order")]
    SelfFill,

    /// The batch settles worse for the taker than the declared bound.
    #[error("CU_ERR_204: Price tolerance exceeded: declared {declared}, net to taker {net}")]
    PriceToleranceExceeded { declared: Decimal, net: Decimal },

    /// The taker lacks the settlement-token funding for the batch.
    #[error("CU_ERR_205: Insufficient taker funds: need {needed}, have {available}")]
    InsufficientFunds { needed: Decimal, available: Decimal },

    /// Too many legs in a single batch.
    #[error("CU_ERR_206: Batch too large: {legs} legs, maximum {max}")]
    BatchTooLarge { legs: usize, max: usize },

    // =================================================================
    // Treasury / Ownership Errors (3xx)
    // =================================================================
    /// Owner-gated operation called by a non-owner.
    #[error("CU_ERR_300: Caller is not the owner")]
    NotOwner,

    /// Withdrawal exceeds the held balance.
    #[error("CU_ERR_301: Insufficient treasury balance: requested {requested}, held {held}")]
    InsufficientTreasury { requested: Decimal, held: Decimal },

    /// Ownership may not be transferred to the zero address.
    #[error("CU_ERR_302: Cannot transfer ownership to the zero address")]
    ZeroAddressOwner,

    /// The requested NFT is not held in treasury custody.
    #[error("CU_ERR_303: NFT not in custody: collection {token}, id {token_id}")]
    NftNotInCustody { token: Address, token_id: TokenId },

    // =================================================================
    // Collaborator Errors (4xx)
    // =================================================================
    /// An external transfer call reported failure.
    #[error("CU_ERR_400: Transfer failed: {reason}")]
    TransferFailed { reason: String },

    /// No collaborator is registered for the collection address.
    #[error("CU_ERR_401: Unknown collection: {0}")]
    UnknownCollection(Address),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, CurioError>;
