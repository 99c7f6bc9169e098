//! Royalty-lookup collaborator interface.

use curio_types::{Address, RoyaltyShare, TokenId};
use rust_decimal::Decimal;

/// External royalty registry, queried per matched identifier.
///
/// Returns the raw royalty payouts for transferring `token_id` of `token`
/// at `value`. The engine caps and scales these against the order's royalty
/// factor; the registry itself is trusted only for recipients and rates.
pub trait RoyaltyEngine {
    fn royalties_for(&self, token: Address, token_id: TokenId, value: Decimal)
    -> Vec<RoyaltyShare>;
}
