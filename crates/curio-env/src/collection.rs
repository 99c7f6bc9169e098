//! NFT-collection collaborator interface.

use curio_types::{Address, Result, TokenId};

/// The ERC-721 surface the engine consumes from a collection contract.
pub trait NftCollection {
    /// Current owner of `token_id`, or `None` if it does not exist.
    fn owner_of(&self, token_id: TokenId) -> Option<Address>;

    /// Whether `operator` may move any of `owner`'s tokens.
    fn is_approved_for_all(&self, owner: Address, operator: Address) -> bool;

    /// Move `token_id` from `from` to `to` on behalf of `operator`.
    ///
    /// The implementation must require that `from` owns the token and that
    /// `operator` is `from` or an approved operator.
    fn transfer_from(
        &self,
        operator: Address,
        from: Address,
        to: Address,
        token_id: TokenId,
    ) -> Result<()>;
}
