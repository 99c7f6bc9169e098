//! The exchange facade: listing, cancellation, batch execution, treasury
//! operations and the reporting surface, over explicit collaborator traits.
//!
//! Commit ordering inside `execute_orders` is strict: for each fill, every
//! internal write (trade counter, terminal flip, ledger append, statistics,
//! events) happens before the first collaborator transfer of that fill.

use chrono::{DateTime, Utc};
use curio_env::ExchangeEnv;
use curio_market::{CollectionStats, OrderStore, TradeLedger, Treasury, WithdrawAsset};
use curio_types::{
    Address, CallContext, CurioError, Direction, ExchangeConfig, ExchangeEvent, Fulfillment,
    LoggedEvent, Order, OrderKey, OrderStatus, Result, TokenId, Trade,
};
use rust_decimal::Decimal;

use crate::plan::{BatchRequest, SkippedLeg, plan_execution};
use crate::{pricing, status};

/// Summary of one `execute_orders` call.
#[derive(Debug, Clone)]
pub struct ExecutionReceipt {
    /// Legs that committed.
    pub executed_legs: usize,
    /// Legs skipped because their derived status was not Active.
    pub skipped: Vec<SkippedLeg>,
    /// Signed net settlement flow to the taker.
    pub net_to_taker: Decimal,
    /// Ledger indices of the trades this call appended.
    pub trade_indices: Vec<usize>,
}

/// The whole exchange: order store, trade ledger, treasury and event log
/// behind one address.
#[derive(Debug)]
pub struct Exchange {
    address: Address,
    config: ExchangeConfig,
    store: OrderStore,
    ledger: TradeLedger,
    treasury: Treasury,
    events: Vec<LoggedEvent>,
}

impl Exchange {
    #[must_use]
    pub fn new(address: Address, owner: Address, config: ExchangeConfig) -> Self {
        Self {
            address,
            config,
            store: OrderStore::new(),
            ledger: TradeLedger::new(),
            treasury: Treasury::new(owner),
            events: Vec::new(),
        }
    }

    // -- Listing ------------------------------------------------------------

    /// List a new order. The attached native value is the listing tip and
    /// must meet the configured minimum; it accrues to the treasury.
    #[allow(clippy::too_many_arguments)]
    pub fn add_order(
        &mut self,
        ctx: &CallContext,
        taker: Option<Address>,
        token: Address,
        token_ids: Vec<TokenId>,
        direction: Direction,
        fulfillment: Fulfillment,
        price: Decimal,
        expiry: Option<DateTime<Utc>>,
        trade_max: u64,
        royalty_factor_bps: u16,
        integrator: Option<Address>,
    ) -> Result<(usize, OrderKey)> {
        if ctx.value < self.config.min_listing_tip {
            return Err(CurioError::TipTooLow {
                required: self.config.min_listing_tip,
                attached: ctx.value,
            });
        }
        if token_ids.len() > self.config.max_token_ids {
            return Err(CurioError::InvalidOrder {
                reason: format!(
                    "{} identifiers listed, limit {}",
                    token_ids.len(),
                    self.config.max_token_ids
                ),
            });
        }

        let order = Order::new(
            ctx.caller,
            taker,
            token,
            token_ids,
            direction,
            fulfillment,
            price,
            expiry,
            trade_max,
            royalty_factor_bps,
            integrator,
            ctx.now,
        );
        let (index, key) = self.store.add_order(order)?;
        self.treasury.credit_native(ctx.value);

        tracing::info!(
            maker = %ctx.caller,
            %token,
            index,
            %key,
            %direction,
            %fulfillment,
            %price,
            "Order listed"
        );
        self.log(
            ctx.now,
            ExchangeEvent::OrderAdded {
                token,
                index,
                key,
                maker: ctx.caller,
                tip: ctx.value,
                integrator,
            },
        );
        self.log(
            ctx.now,
            ExchangeEvent::TipReceived {
                from: ctx.caller,
                amount: ctx.value,
            },
        );
        Ok((index, key))
    }

    /// Cancel an open order. Maker-only.
    pub fn cancel_order(
        &mut self,
        ctx: &CallContext,
        token: Address,
        index: usize,
    ) -> Result<OrderKey> {
        let key = self.store.cancel_order(token, index, ctx.caller)?;
        tracing::info!(maker = %ctx.caller, %token, index, %key, "Order cancelled");
        self.log(ctx.now, ExchangeEvent::OrderCancelled { token, index, key });
        Ok(key)
    }

    // -- Execution ----------------------------------------------------------

    /// Fill a batch of orders. Two-phase: a pure plan (zero effect on any
    /// error), then a commit that cannot fail against collaborators the
    /// plan already verified.
    pub fn execute_orders(
        &mut self,
        ctx: &CallContext,
        env: &dyn ExchangeEnv,
        request: &BatchRequest,
    ) -> Result<ExecutionReceipt> {
        let plan = plan_execution(&self.store, self.address, &self.config, ctx, env, request)?;

        for skip in &plan.skipped {
            tracing::warn!(
                token = %skip.token,
                index = %skip.order_index,
                status = %skip.status,
                "Leg skipped"
            );
        }

        let token_contract = env.settlement_token();
        let mut trade_indices = Vec::new();

        for fill in &plan.fills {
            // Internal state first.
            let order = self.store.order_mut(fill.token, fill.order_index)?;
            order.trade_count += fill.fills;
            if fill.completes {
                order.state = curio_types::OrderState::Executed;
            }
            let (payer, receiver) = pricing::payer_receiver(order, ctx.caller);
            self.store
                .record_fill(fill.token, fill.ids_moved(), fill.gross_total());

            for trade in &fill.trades {
                let index = self.ledger.append(Trade {
                    order_key: fill.order_key,
                    token: fill.token,
                    order_index: fill.order_index,
                    token_ids: trade.token_ids.clone(),
                    direction: fill.direction,
                    maker: fill.maker,
                    taker: ctx.caller,
                    gross_amount: trade.gross,
                    counterparty_amount: trade.split.counterparty,
                    royalties: trade.split.royalties.clone(),
                    treasury_remainder: trade.split.treasury_remainder,
                    executed_at: ctx.now,
                });
                trade_indices.push(index);
                if trade.split.treasury_remainder > Decimal::ZERO {
                    self.treasury.credit_settlement(trade.split.treasury_remainder);
                }
                self.log(
                    ctx.now,
                    ExchangeEvent::TradeExecuted {
                        ledger_index: index,
                        key: fill.order_key,
                        taker: ctx.caller,
                        gross_amount: trade.gross,
                        integrator: request.integrator,
                    },
                );
            }

            // Collaborator transfers, after all internal writes for the fill.
            for trade in &fill.trades {
                if trade.split.counterparty > Decimal::ZERO {
                    token_contract.transfer_from(
                        self.address,
                        payer,
                        receiver,
                        trade.split.counterparty,
                    )?;
                }
                for royalty in &trade.split.royalties {
                    token_contract.transfer_from(
                        self.address,
                        payer,
                        royalty.recipient,
                        royalty.amount,
                    )?;
                }
                if trade.split.treasury_remainder > Decimal::ZERO {
                    token_contract.transfer_from(
                        self.address,
                        payer,
                        self.address,
                        trade.split.treasury_remainder,
                    )?;
                }
            }

            let collection = env
                .collection(fill.token)
                .ok_or(CurioError::UnknownCollection(fill.token))?;
            let (nft_from, nft_to) = match fill.direction {
                Direction::Buy => (ctx.caller, fill.maker),
                Direction::Sell => (fill.maker, ctx.caller),
            };
            for id in fill.all_token_ids() {
                collection.transfer_from(self.address, nft_from, nft_to, id)?;
            }

            tracing::debug!(
                token = %fill.token,
                index = %fill.order_index,
                fills = fill.fills,
                gross = %fill.gross_total(),
                completes = fill.completes,
                "Fill committed"
            );
        }

        // Any attached native value is an execution tip.
        if ctx.value > Decimal::ZERO {
            self.treasury.credit_native(ctx.value);
            self.log(
                ctx.now,
                ExchangeEvent::TipReceived {
                    from: ctx.caller,
                    amount: ctx.value,
                },
            );
        }

        tracing::info!(
            taker = %ctx.caller,
            executed = plan.fills.len(),
            skipped = plan.skipped.len(),
            net_to_taker = %plan.net_to_taker,
            "Batch executed"
        );
        Ok(ExecutionReceipt {
            executed_legs: plan.fills.len(),
            skipped: plan.skipped,
            net_to_taker: plan.net_to_taker,
            trade_indices,
        })
    }

    // -- Treasury -----------------------------------------------------------

    /// Owner withdrawal of accumulated treasury holdings.
    pub fn withdraw(
        &mut self,
        ctx: &CallContext,
        env: &dyn ExchangeEnv,
        asset: WithdrawAsset,
    ) -> Result<()> {
        match asset {
            WithdrawAsset::Native { amount } => {
                let taken = self.treasury.take_native(ctx.caller, amount)?;
                self.log(
                    ctx.now,
                    ExchangeEvent::NativeWithdrawn {
                        to: ctx.caller,
                        amount: taken,
                    },
                );
            }
            WithdrawAsset::Settlement { amount } => {
                let taken = self.treasury.take_settlement(ctx.caller, amount)?;
                env.settlement_token()
                    .transfer_from(self.address, self.address, ctx.caller, taken)?;
                self.log(
                    ctx.now,
                    ExchangeEvent::SettlementWithdrawn {
                        to: ctx.caller,
                        amount: taken,
                    },
                );
            }
            WithdrawAsset::Nft { token, token_id } => {
                let collection = env
                    .collection(token)
                    .ok_or(CurioError::UnknownCollection(token))?;
                self.treasury.take_nft(ctx.caller, token, token_id)?;
                collection.transfer_from(self.address, self.address, ctx.caller, token_id)?;
                self.log(
                    ctx.now,
                    ExchangeEvent::NftWithdrawn {
                        to: ctx.caller,
                        token,
                        token_id,
                    },
                );
            }
        }
        Ok(())
    }

    /// Single-step ownership transfer; the zero address is rejected.
    pub fn transfer_ownership(&mut self, ctx: &CallContext, new_owner: Address) -> Result<()> {
        let previous = self.treasury.transfer_ownership(ctx.caller, new_owner)?;
        tracing::info!(from = %previous, to = %new_owner, "Ownership transferred");
        self.log(
            ctx.now,
            ExchangeEvent::OwnershipTransferred {
                from: previous,
                to: new_owner,
            },
        );
        Ok(())
    }

    // -- Donations ----------------------------------------------------------

    /// Accept unsolicited native currency into the treasury.
    pub fn donate_native(&mut self, ctx: &CallContext) {
        self.treasury.credit_native(ctx.value);
        self.log(
            ctx.now,
            ExchangeEvent::TipReceived {
                from: ctx.caller,
                amount: ctx.value,
            },
        );
    }

    /// Record a settlement-token transfer that landed on the exchange
    /// outside any fill (a donation).
    pub fn on_token_received(&mut self, ctx: &CallContext, amount: Decimal) {
        self.treasury.credit_settlement(amount);
        self.log(
            ctx.now,
            ExchangeEvent::TokenDonation {
                from: ctx.caller,
                amount,
            },
        );
    }

    /// Accept an NFT transferred directly to the exchange into custody.
    pub fn on_nft_received(&mut self, ctx: &CallContext, token: Address, token_id: TokenId) {
        self.treasury.credit_nft(token, token_id);
        self.log(
            ctx.now,
            ExchangeEvent::NftDonation {
                from: ctx.caller,
                token,
                token_id,
            },
        );
    }

    // -- Reporting ----------------------------------------------------------

    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    #[must_use]
    pub fn owner(&self) -> Address {
        self.treasury.owner()
    }

    #[must_use]
    pub fn treasury(&self) -> &Treasury {
        &self.treasury
    }

    #[must_use]
    pub fn tokens(&self) -> &[Address] {
        self.store.tokens()
    }

    #[must_use]
    pub fn orders_length(&self, token: Address) -> usize {
        self.store.orders_length(token)
    }

    pub fn order(&self, token: Address, index: usize) -> Result<&Order> {
        self.store.order(token, index)
    }

    /// Derive the live status of a stored order.
    pub fn order_status(
        &self,
        env: &dyn ExchangeEnv,
        token: Address,
        index: usize,
        now: DateTime<Utc>,
    ) -> Result<OrderStatus> {
        let order = self.store.order(token, index)?;
        Ok(status::order_status(order, self.address, now, env))
    }

    #[must_use]
    pub fn get_orders(&self, token: Address, indices: &[usize]) -> Vec<Option<Order>> {
        self.store.get_orders(token, indices)
    }

    #[must_use]
    pub fn stats(&self, token: Address) -> CollectionStats {
        self.store.stats(token)
    }

    #[must_use]
    pub fn trades_length(&self) -> usize {
        self.ledger.trades_length()
    }

    #[must_use]
    pub fn get_trade(&self, index: usize) -> Option<&Trade> {
        self.ledger.get(index)
    }

    #[must_use]
    pub fn get_trades(&self, indices: &[usize]) -> Vec<Option<Trade>> {
        self.ledger.get_trades(indices)
    }

    #[must_use]
    pub fn events(&self) -> &[LoggedEvent] {
        &self.events
    }

    fn log(&mut self, at: DateTime<Utc>, event: ExchangeEvent) {
        let sequence = self.events.len() as u64;
        self.events.push(LoggedEvent {
            sequence,
            at,
            event,
        });
    }
}
