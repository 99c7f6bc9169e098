//! End-to-end integration tests across the whole exchange.
//!
//! These tests exercise the full lifecycle against mock collaborators:
//! listing -> status oracle -> batch planning -> settlement commit ->
//! treasury, verifying partial fills, skip-not-revert batches, royalty
//! conservation, all-or-nothing enforcement, slippage bounds, donations
//! and owner withdrawals.

#![allow(clippy::too_many_arguments)]

use chrono::Utc;
use curio_env::{FixedRateRoyalty, MockEnv};
use curio_market::WithdrawAsset;
use curio_settlement::{BatchRequest, Exchange, ExecutionReceipt};
use curio_types::{
    Address, CallContext, CurioError, Direction, ExchangeConfig, Fulfillment, OrderState,
    OrderStatus, Result, TokenId, UnexecutableReason,
};
use rust_decimal::Decimal;

const EXCHANGE: Address = Address([0xEE; 20]);
const OWNER: Address = Address([0x0F; 20]);

/// Helper: a full market — the exchange plus its mock collaborators.
struct Market {
    exchange: Exchange,
    env: MockEnv,
}

impl Market {
    fn new() -> Self {
        Self::with_royalty(FixedRateRoyalty::none())
    }

    fn with_royalty(royalty: FixedRateRoyalty) -> Self {
        Self {
            exchange: Exchange::new(EXCHANGE, OWNER, ExchangeConfig::default()),
            env: MockEnv::with_royalty(royalty),
        }
    }

    fn min_tip() -> Decimal {
        ExchangeConfig::default().min_listing_tip
    }

    /// Fund `who` with settlement token and approve the exchange for it.
    fn fund(&mut self, who: Address, amount: Decimal) {
        self.env.token.mint(who, amount);
        self.env.token.approve(who, EXCHANGE, amount);
    }

    /// Mint NFTs to `who` and approve the exchange as operator.
    fn mint_nfts(&mut self, token: Address, who: Address, ids: &[u64]) {
        let collection = self.env.add_collection(token);
        for id in ids {
            collection.mint(who, TokenId(*id));
        }
        collection.set_approval_for_all(who, EXCHANGE, true);
    }

    fn list(
        &mut self,
        maker: Address,
        token: Address,
        ids: &[u64],
        direction: Direction,
        fulfillment: Fulfillment,
        price: Decimal,
        trade_max: u64,
        royalty_bps: u16,
    ) -> usize {
        let ctx = CallContext::from_caller(maker).with_value(Self::min_tip());
        let (index, _) = self
            .exchange
            .add_order(
                &ctx,
                None,
                token,
                ids.iter().map(|id| TokenId(*id)).collect(),
                direction,
                fulfillment,
                price,
                None,
                trade_max,
                royalty_bps,
                None,
            )
            .expect("listing should succeed");
        index
    }

    fn execute(
        &mut self,
        taker: Address,
        legs: &[(Address, usize, &[u64])],
        total_price: Decimal,
    ) -> Result<ExecutionReceipt> {
        let request = BatchRequest {
            tokens: legs.iter().map(|(t, _, _)| *t).collect(),
            order_indices: legs.iter().map(|(_, i, _)| *i).collect(),
            token_id_sets: legs
                .iter()
                .map(|(_, _, ids)| ids.iter().map(|id| TokenId(*id)).collect())
                .collect(),
            total_price,
            royalty_cap_bps: 10_000,
            integrator: None,
        };
        let ctx = CallContext::from_caller(taker);
        self.exchange.execute_orders(&ctx, &self.env, &request)
    }

    fn balance(&self, who: Address) -> Decimal {
        use curio_env::SettlementToken;
        self.env.token.balance_of(who)
    }

    fn nft_owner(&self, token: Address, id: u64) -> Option<Address> {
        use curio_env::NftCollection;
        self.env.collection_at(token)?.owner_of(TokenId(id))
    }
}

// =============================================================================
// Test: BUY/ANY partial fill moves value both ways and counts per identifier
// =============================================================================
#[test]
fn e2e_buy_any_partial_fill() {
    let mut market = Market::new();
    let maker = Address::dummy(1);
    let taker = Address::dummy(4);
    let token = Address::dummy(2);

    market.fund(maker, Decimal::new(100, 0));
    market.mint_nfts(token, taker, &[3, 4, 5]);
    market.list(
        maker,
        token,
        &[3, 4, 5],
        Direction::Buy,
        Fulfillment::Any,
        Decimal::new(11, 0),
        5,
        0,
    );

    let receipt = market
        .execute(taker, &[(token, 0, &[3, 5])], Decimal::ZERO)
        .expect("fill should succeed");

    assert_eq!(receipt.executed_legs, 1);
    assert!(receipt.skipped.is_empty());
    assert_eq!(receipt.net_to_taker, Decimal::new(22, 0));
    // One trade record per matched identifier.
    assert_eq!(receipt.trade_indices, vec![0, 1]);
    assert_eq!(market.exchange.trades_length(), 2);

    let order = market.exchange.order(token, 0).unwrap();
    assert_eq!(order.trade_count, 2, "each identifier consumes one fill");
    assert_eq!(order.state, OrderState::Open, "capacity remains");

    // Maker paid 22 and received both NFTs.
    assert_eq!(market.balance(maker), Decimal::new(78, 0));
    assert_eq!(market.balance(taker), Decimal::new(22, 0));
    assert_eq!(market.nft_owner(token, 3), Some(maker));
    assert_eq!(market.nft_owner(token, 5), Some(maker));
    assert_eq!(market.nft_owner(token, 4), Some(taker));

    let stats = market.exchange.stats(token);
    assert_eq!(stats.executed_fills, 1);
    assert_eq!(stats.ids_traded, 2);
    assert_eq!(stats.settlement_volume, Decimal::new(22, 0));
}

// =============================================================================
// Test: SELL/ALL executes once, then is skipped on a repeat attempt
// =============================================================================
#[test]
fn e2e_sell_all_is_single_shot() {
    let mut market = Market::new();
    let maker = Address::dummy(1);
    let taker = Address::dummy(4);
    let token = Address::dummy(2);

    market.mint_nfts(token, maker, &[0, 1, 2]);
    market.fund(taker, Decimal::new(50, 0));
    market.list(
        maker,
        token,
        &[0, 1, 2],
        Direction::Sell,
        Fulfillment::All,
        Decimal::TEN,
        1,
        0,
    );

    let receipt = market
        .execute(taker, &[(token, 0, &[0, 1, 2])], Decimal::new(-10, 0))
        .expect("fill should succeed");
    assert_eq!(receipt.executed_legs, 1);
    assert_eq!(receipt.net_to_taker, Decimal::new(-10, 0));
    assert_eq!(market.exchange.trades_length(), 1, "ALL makes one record");

    let order = market.exchange.order(token, 0).unwrap();
    assert_eq!(order.state, OrderState::Executed);
    assert_eq!(market.balance(maker), Decimal::TEN);
    assert_eq!(market.balance(taker), Decimal::new(40, 0));
    for id in [0, 1, 2] {
        assert_eq!(market.nft_owner(token, id), Some(taker));
    }

    // A second attempt is a no-op skip, not a failure.
    let taker_before = market.balance(taker);
    let receipt = market
        .execute(taker, &[(token, 0, &[0, 1, 2])], Decimal::new(-10, 0))
        .expect("repeat attempt should not revert");
    assert_eq!(receipt.executed_legs, 0);
    assert_eq!(receipt.skipped.len(), 1);
    assert_eq!(receipt.skipped[0].status, OrderStatus::Executed);
    assert_eq!(market.balance(taker), taker_before, "no value moved");
    assert_eq!(market.exchange.trades_length(), 1);
}

// =============================================================================
// Test: a batch with one invalidated leg skips it and commits the rest
// =============================================================================
#[test]
fn e2e_skip_not_revert() {
    let mut market = Market::new();
    let funded = Address::dummy(1);
    let broke = Address::dummy(3);
    let taker = Address::dummy(4);
    let token = Address::dummy(2);

    market.fund(funded, Decimal::new(100, 0));
    // `broke` lists but never funds.
    market.mint_nfts(token, taker, &[3, 4]);
    market.list(
        funded,
        token,
        &[3],
        Direction::Buy,
        Fulfillment::Any,
        Decimal::TEN,
        1,
        0,
    );
    market.list(
        broke,
        token,
        &[4],
        Direction::Buy,
        Fulfillment::Any,
        Decimal::TEN,
        1,
        0,
    );

    let receipt = market
        .execute(taker, &[(token, 0, &[3]), (token, 1, &[4])], Decimal::ZERO)
        .expect("batch should succeed with a skip");

    assert_eq!(receipt.executed_legs, 1);
    assert_eq!(receipt.skipped.len(), 1);
    assert_eq!(
        receipt.skipped[0].status,
        OrderStatus::NotExecutable(UnexecutableReason::InsufficientBalance)
    );
    assert_eq!(market.balance(taker), Decimal::TEN, "only the good leg paid");
    assert_eq!(market.nft_owner(token, 3), Some(funded));
    assert_eq!(market.nft_owner(token, 4), Some(taker), "skipped leg untouched");
}

// =============================================================================
// Test: cancelled and expired orders are skipped with the right status
// =============================================================================
#[test]
fn e2e_cancelled_and_expired_legs_skip() {
    let mut market = Market::new();
    let maker = Address::dummy(1);
    let taker = Address::dummy(4);
    let token = Address::dummy(2);

    market.fund(maker, Decimal::new(100, 0));
    market.mint_nfts(token, taker, &[3, 4]);
    market.list(
        maker,
        token,
        &[3],
        Direction::Buy,
        Fulfillment::Any,
        Decimal::TEN,
        1,
        0,
    );
    // Second listing expires immediately.
    let ctx = CallContext::from_caller(maker).with_value(Market::min_tip());
    market
        .exchange
        .add_order(
            &ctx,
            None,
            token,
            vec![TokenId(4)],
            Direction::Buy,
            Fulfillment::Any,
            Decimal::TEN,
            Some(Utc::now() - chrono::Duration::hours(1)),
            1,
            0,
            None,
        )
        .unwrap();

    market
        .exchange
        .cancel_order(&CallContext::from_caller(maker), token, 0)
        .unwrap();

    let receipt = market
        .execute(taker, &[(token, 0, &[3]), (token, 1, &[4])], Decimal::ZERO)
        .expect("both legs skip");
    assert_eq!(receipt.executed_legs, 0);
    assert_eq!(receipt.skipped.len(), 2);
    assert_eq!(receipt.skipped[0].status, OrderStatus::Cancelled);
    assert_eq!(
        receipt.skipped[1].status,
        OrderStatus::NotExecutable(UnexecutableReason::Expired)
    );
    assert_eq!(market.exchange.trades_length(), 0);
}

// =============================================================================
// Test: royalty splitting conserves value across all recipients
// =============================================================================
#[test]
fn e2e_royalty_conservation() {
    let creator = Address::dummy(8);
    let charity = Address::dummy(9);
    // 5% + 2.5% of gross per identifier.
    let mut market = Market::with_royalty(FixedRateRoyalty::new(vec![
        (creator, 500),
        (charity, 250),
    ]));
    let maker = Address::dummy(1);
    let taker = Address::dummy(4);
    let token = Address::dummy(2);

    market.fund(maker, Decimal::new(1000, 0));
    market.mint_nfts(token, taker, &[3, 5]);
    // Maker absorbs up to 10% royalty, so raw shares fit the budget.
    market.list(
        maker,
        token,
        &[3, 5],
        Direction::Buy,
        Fulfillment::Any,
        Decimal::new(100, 0),
        2,
        1000,
    );

    let receipt = market
        .execute(taker, &[(token, 0, &[3, 5])], Decimal::ZERO)
        .expect("fill should succeed");

    // Per trade: gross 100, royalties 7.5, counterparty 92.5.
    assert_eq!(receipt.net_to_taker, Decimal::new(185, 0));
    assert_eq!(market.balance(maker), Decimal::new(800, 0));
    assert_eq!(market.balance(taker), Decimal::new(185, 0));
    assert_eq!(market.balance(creator), Decimal::TEN);
    assert_eq!(market.balance(charity), Decimal::new(5, 0));

    for index in receipt.trade_indices {
        let trade = market.exchange.get_trade(index).expect("trade exists");
        assert!(trade.conserves_value(), "gross must split exactly");
        assert_eq!(trade.gross_amount, Decimal::new(100, 0));
        assert_eq!(trade.royalty_total(), Decimal::new(75, 1));
    }
}

// =============================================================================
// Test: ALL orders reject any subset of the eligible set
// =============================================================================
#[test]
fn e2e_all_requires_exact_set() {
    let mut market = Market::new();
    let maker = Address::dummy(1);
    let taker = Address::dummy(4);
    let token = Address::dummy(2);

    market.mint_nfts(token, maker, &[0, 1, 2]);
    market.fund(taker, Decimal::new(50, 0));
    market.list(
        maker,
        token,
        &[0, 1, 2],
        Direction::Sell,
        Fulfillment::All,
        Decimal::TEN,
        1,
        0,
    );

    let err = market
        .execute(taker, &[(token, 0, &[0, 1])], Decimal::new(-10, 0))
        .unwrap_err();
    assert!(matches!(err, CurioError::PartialFillNotAllowed));

    // Hard failure means zero effect.
    assert_eq!(market.exchange.trades_length(), 0);
    assert_eq!(market.balance(taker), Decimal::new(50, 0));
    assert_eq!(market.exchange.order(token, 0).unwrap().trade_count, 0);
}

// =============================================================================
// Test: the batch-level price bound protects the taker
// =============================================================================
#[test]
fn e2e_slippage_bound() {
    let mut market = Market::new();
    let maker = Address::dummy(1);
    let taker = Address::dummy(4);
    let token = Address::dummy(2);

    market.fund(maker, Decimal::new(100, 0));
    market.mint_nfts(token, taker, &[3]);
    market.list(
        maker,
        token,
        &[3],
        Direction::Buy,
        Fulfillment::Any,
        Decimal::TEN,
        1,
        0,
    );

    // Taker demands at least 11 in proceeds; the fill nets 10.
    let err = market
        .execute(taker, &[(token, 0, &[3])], Decimal::new(11, 0))
        .unwrap_err();
    assert!(matches!(err, CurioError::PriceToleranceExceeded { .. }));
    assert_eq!(market.exchange.trades_length(), 0);
    assert_eq!(market.nft_owner(token, 3), Some(taker));

    // At exactly the net it goes through.
    market
        .execute(taker, &[(token, 0, &[3])], Decimal::TEN)
        .expect("bound met");
}

// =============================================================================
// Test: wildcard SELL fills any identifier the maker still owns
// =============================================================================
#[test]
fn e2e_wildcard_sell() {
    let mut market = Market::new();
    let maker = Address::dummy(1);
    let taker = Address::dummy(4);
    let token = Address::dummy(2);

    market.mint_nfts(token, maker, &[7, 8, 9]);
    market.fund(taker, Decimal::new(50, 0));
    // Empty identifier set: every identifier in the collection is eligible.
    market.list(
        maker,
        token,
        &[],
        Direction::Sell,
        Fulfillment::Any,
        Decimal::new(5, 0),
        5,
        0,
    );
    assert!(market.exchange.order(token, 0).unwrap().is_wildcard());

    let receipt = market
        .execute(taker, &[(token, 0, &[7, 9])], Decimal::new(-10, 0))
        .expect("wildcard fill should succeed");
    assert_eq!(receipt.executed_legs, 1);
    assert_eq!(receipt.net_to_taker, Decimal::new(-10, 0));
    assert_eq!(market.balance(maker), Decimal::TEN);
    assert_eq!(market.balance(taker), Decimal::new(40, 0));
    assert_eq!(market.nft_owner(token, 7), Some(taker));
    assert_eq!(market.nft_owner(token, 9), Some(taker));
    assert_eq!(market.nft_owner(token, 8), Some(maker));
    assert_eq!(market.exchange.order(token, 0).unwrap().trade_count, 2);

    // The maker loses the last identifier: the leg skips, not fails. The
    // loss is invisible to the status oracle (nothing listed to check), so
    // the requested identifiers are what the planner verifies.
    market
        .env
        .add_collection(token)
        .mint(Address::dummy(6), TokenId(8));
    let receipt = market
        .execute(taker, &[(token, 0, &[8])], Decimal::new(-5, 0))
        .expect("lost identifier skips");
    assert_eq!(receipt.executed_legs, 0);
    assert_eq!(receipt.skipped.len(), 1);
    assert_eq!(
        receipt.skipped[0].status,
        OrderStatus::NotExecutable(UnexecutableReason::TokenNotOwned)
    );
    assert_eq!(market.balance(taker), Decimal::new(40, 0), "no value moved");
    assert_eq!(market.exchange.order(token, 0).unwrap().trade_count, 2);
}

// =============================================================================
// Test: unroutable royalty shares accrue to the treasury
// =============================================================================
#[test]
fn e2e_unroutable_royalty_remainder() {
    // A registry share addressed to the zero address cannot be paid out; the
    // withheld amount lands in exchange custody for the owner.
    let mut market = Market::with_royalty(FixedRateRoyalty::new(vec![(Address::ZERO, 500)]));
    let maker = Address::dummy(1);
    let taker = Address::dummy(4);
    let token = Address::dummy(2);

    market.fund(maker, Decimal::new(100, 0));
    market.mint_nfts(token, taker, &[3]);
    market.list(
        maker,
        token,
        &[3],
        Direction::Buy,
        Fulfillment::Any,
        Decimal::new(100, 0),
        1,
        1000,
    );

    let receipt = market
        .execute(taker, &[(token, 0, &[3])], Decimal::ZERO)
        .expect("fill should succeed");

    // Gross 100: 5 withheld and unroutable.
    assert_eq!(receipt.net_to_taker, Decimal::new(95, 0));
    assert_eq!(market.balance(taker), Decimal::new(95, 0));
    assert_eq!(market.balance(EXCHANGE), Decimal::new(5, 0));
    assert_eq!(
        market.exchange.treasury().settlement_balance(),
        Decimal::new(5, 0)
    );

    let trade = market.exchange.get_trade(receipt.trade_indices[0]).unwrap();
    assert!(trade.conserves_value());
    assert_eq!(trade.treasury_remainder, Decimal::new(5, 0));
    assert!(trade.royalties.is_empty());
}

// =============================================================================
// Test: tips, donations and owner-gated withdrawals
// =============================================================================
#[test]
fn e2e_treasury_lifecycle() {
    let mut market = Market::new();
    let maker = Address::dummy(1);
    let donor = Address::dummy(7);
    let token = Address::dummy(2);

    // Two listings accumulate two minimum tips.
    market.fund(maker, Decimal::new(100, 0));
    market.list(
        maker,
        token,
        &[3],
        Direction::Buy,
        Fulfillment::Any,
        Decimal::TEN,
        1,
        0,
    );
    market.list(
        maker,
        token,
        &[4],
        Direction::Buy,
        Fulfillment::Any,
        Decimal::TEN,
        1,
        0,
    );
    let expected_native = Market::min_tip() * Decimal::TWO;
    assert_eq!(market.exchange.treasury().native_balance(), expected_native);

    // Donations: settlement token and an NFT land in treasury custody.
    market.env.token.mint(EXCHANGE, Decimal::new(25, 0));
    market
        .exchange
        .on_token_received(&CallContext::from_caller(donor), Decimal::new(25, 0));
    market.mint_nfts(token, EXCHANGE, &[42]);
    market
        .exchange
        .on_nft_received(&CallContext::from_caller(donor), token, TokenId(42));
    assert!(market.exchange.treasury().holds_nft(token, TokenId(42)));

    // Non-owner withdrawals are rejected with no effect.
    let outsider = CallContext::from_caller(Address::dummy(9));
    let err = market
        .exchange
        .withdraw(&outsider, &market.env, WithdrawAsset::Native { amount: None })
        .unwrap_err();
    assert!(matches!(err, CurioError::NotOwner));
    assert_eq!(market.exchange.treasury().native_balance(), expected_native);

    // Owner drains everything.
    let owner_ctx = CallContext::from_caller(OWNER);
    market
        .exchange
        .withdraw(&owner_ctx, &market.env, WithdrawAsset::Native { amount: None })
        .unwrap();
    market
        .exchange
        .withdraw(
            &owner_ctx,
            &market.env,
            WithdrawAsset::Settlement { amount: None },
        )
        .unwrap();
    market
        .exchange
        .withdraw(
            &owner_ctx,
            &market.env,
            WithdrawAsset::Nft {
                token,
                token_id: TokenId(42),
            },
        )
        .unwrap();

    assert_eq!(market.exchange.treasury().native_balance(), Decimal::ZERO);
    assert_eq!(market.exchange.treasury().settlement_balance(), Decimal::ZERO);
    assert_eq!(market.balance(OWNER), Decimal::new(25, 0));
    assert_eq!(market.nft_owner(token, 42), Some(OWNER));
    assert!(!market.exchange.treasury().holds_nft(token, TokenId(42)));
}

// =============================================================================
// Test: derived status is visible through the reporting surface
// =============================================================================
#[test]
fn e2e_status_reporting() {
    let mut market = Market::new();
    let maker = Address::dummy(1);
    let token = Address::dummy(2);

    market.fund(maker, Decimal::new(100, 0));
    market.list(
        maker,
        token,
        &[3],
        Direction::Buy,
        Fulfillment::Any,
        Decimal::TEN,
        1,
        0,
    );
    assert_eq!(
        market
            .exchange
            .order_status(&market.env, token, 0, Utc::now())
            .unwrap(),
        OrderStatus::Active
    );

    // Maker revokes the allowance: status degrades without any exchange call.
    market.env.token.approve(maker, EXCHANGE, Decimal::ZERO);
    assert_eq!(
        market
            .exchange
            .order_status(&market.env, token, 0, Utc::now())
            .unwrap(),
        OrderStatus::NotExecutable(UnexecutableReason::InsufficientAllowance)
    );
}
