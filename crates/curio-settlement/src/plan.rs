//! Pure batch execution planner.
//!
//! `plan_execution` takes a batch request and produces an [`ExecutionPlan`]
//! without touching any state. Authorization and structural failures
//! hard-fail the whole batch here; legs invalidated by external state
//! (the status oracle's verdict) are soft-skipped and reported.
//!
//! The planner tracks *virtual* fill counts and identifier claims so the
//! same order — or the same NFT — appearing in several legs of one batch is
//! planned against the state the earlier legs will have committed.

use std::collections::{HashMap, HashSet};

use curio_env::ExchangeEnv;
use curio_market::OrderStore;
use curio_types::{
    Address, CallContext, CurioError, Direction, ExchangeConfig, OrderKey, OrderStatus, Result,
    RoyaltyShare, TokenId, UnexecutableReason,
};
use rust_decimal::Decimal;

use crate::pricing;
use crate::royalties::{PaymentSplit, split_payment};
use crate::status::order_status;

/// A taker's request to fill a batch of orders.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    /// Collection address per leg (parallel arrays, one entry per leg).
    pub tokens: Vec<Address>,
    /// Order storage index per leg.
    pub order_indices: Vec<usize>,
    /// Identifiers the taker fills against each leg.
    pub token_id_sets: Vec<Vec<TokenId>>,
    /// Taker slippage bound on the net settlement flow to the taker:
    /// positive = minimum proceeds, negative = maximum payment (negated).
    pub total_price: Decimal,
    /// Batch-level basis-point cap on royalties.
    pub royalty_cap_bps: u16,
    /// Integrator recorded on execution events.
    pub integrator: Option<Address>,
}

/// One trade record to be appended: a single identifier for ANY fills, the
/// whole eligible set for ALL fills.
#[derive(Debug, Clone)]
pub struct PlannedTrade {
    pub token_ids: Vec<TokenId>,
    pub gross: Decimal,
    pub split: PaymentSplit,
}

/// One leg of the batch that will execute.
#[derive(Debug, Clone)]
pub struct PlannedFill {
    pub token: Address,
    pub order_index: usize,
    pub order_key: OrderKey,
    pub direction: Direction,
    pub maker: Address,
    /// Trade-counter increments this leg consumes.
    pub fills: u64,
    /// Whether this leg exhausts the order (`trade_count == trade_max`).
    pub completes: bool,
    pub trades: Vec<PlannedTrade>,
}

impl PlannedFill {
    #[must_use]
    pub fn gross_total(&self) -> Decimal {
        self.trades.iter().map(|t| t.gross).sum()
    }

    #[must_use]
    pub fn ids_moved(&self) -> u64 {
        self.trades.iter().map(|t| t.token_ids.len() as u64).sum()
    }

    /// All identifiers this leg moves.
    #[must_use]
    pub fn all_token_ids(&self) -> Vec<TokenId> {
        self.trades.iter().flat_map(|t| t.token_ids.iter().copied()).collect()
    }
}

/// A leg soft-skipped because the order was not Active when re-evaluated.
#[derive(Debug, Clone)]
pub struct SkippedLeg {
    pub leg: usize,
    pub token: Address,
    pub order_index: usize,
    pub status: OrderStatus,
}

/// The full plan for one `execute_orders` call.
#[derive(Debug, Clone)]
pub struct ExecutionPlan {
    pub fills: Vec<PlannedFill>,
    pub skipped: Vec<SkippedLeg>,
    /// Signed net settlement flow to the taker across all planned fills.
    pub net_to_taker: Decimal,
}

/// Plan a batch execution. Pure: reads the store and collaborators, writes
/// nothing. An `Err` here implies the call must have zero effect.
#[allow(clippy::too_many_lines)]
pub fn plan_execution(
    store: &OrderStore,
    exchange: Address,
    config: &ExchangeConfig,
    ctx: &CallContext,
    env: &dyn ExchangeEnv,
    request: &BatchRequest,
) -> Result<ExecutionPlan> {
    let legs = request.tokens.len();
    if legs != request.order_indices.len() || legs != request.token_id_sets.len() {
        return Err(CurioError::LengthMismatch {
            tokens: legs,
            indices: request.order_indices.len(),
            id_sets: request.token_id_sets.len(),
        });
    }
    if legs > config.max_batch_legs {
        return Err(CurioError::BatchTooLarge {
            legs,
            max: config.max_batch_legs,
        });
    }

    let token_contract = env.settlement_token();

    // Virtual bookkeeping: what earlier legs of this batch will commit.
    let mut claimed_fills: HashMap<(Address, usize), u64> = HashMap::new();
    let mut claimed_ids: HashSet<(Address, TokenId)> = HashSet::new();
    let mut maker_spend: HashMap<Address, Decimal> = HashMap::new();

    let mut fills = Vec::new();
    let mut skipped = Vec::new();
    let mut net_to_taker = Decimal::ZERO;
    let mut taker_pays = Decimal::ZERO;

    for leg in 0..legs {
        let token = request.tokens[leg];
        let order_index = request.order_indices[leg];
        let requested = &request.token_id_sets[leg];

        let order = store.order(token, order_index)?;

        // Authorization failures hard-revert the whole batch.
        if !order.permits_taker(ctx.caller) {
            return Err(CurioError::TakerNotPermitted);
        }
        if order.maker == ctx.caller {
            return Err(CurioError::SelfFill);
        }

        let virtual_fills = claimed_fills
            .get(&(token, order_index))
            .copied()
            .unwrap_or(0);

        // Externally-invalidated legs are skipped, not failed.
        let status = order_status(order, exchange, ctx.now, env);
        let remaining = order.remaining_fills().saturating_sub(virtual_fills);
        let effective = if status.is_active() && remaining == 0 {
            // Exhausted by an earlier leg of this same batch.
            OrderStatus::NotExecutable(UnexecutableReason::Maxxed)
        } else {
            status
        };
        if !effective.is_active() {
            skipped.push(SkippedLeg {
                leg,
                token,
                order_index,
                status: effective,
            });
            continue;
        }

        pricing::validate_fill(order, requested, remaining)?;
        let mut canonical = requested.clone();
        canonical.sort_unstable();
        canonical.dedup();

        // The same NFT cannot move twice in one batch.
        for id in &canonical {
            if !claimed_ids.insert((token, *id)) {
                return Err(CurioError::InvalidOrder {
                    reason: format!("identifier {id} appears in two legs"),
                });
            }
        }

        let collection = env
            .collection(token)
            .ok_or(CurioError::UnknownCollection(token))?;
        let gross = pricing::fill_amount(order, canonical.len());

        match order.direction {
            Direction::Buy => {
                // The oracle checked one fill unit; check this leg's full
                // spend on top of what earlier legs already claim.
                let spent = maker_spend.get(&order.maker).copied().unwrap_or_default();
                let maker_reason = if token_contract.balance_of(order.maker) < spent + gross {
                    Some(UnexecutableReason::InsufficientBalance)
                } else if token_contract.allowance(order.maker, exchange) < spent + gross {
                    Some(UnexecutableReason::InsufficientAllowance)
                } else {
                    None
                };
                if let Some(reason) = maker_reason {
                    for id in &canonical {
                        claimed_ids.remove(&(token, *id));
                    }
                    skipped.push(SkippedLeg {
                        leg,
                        token,
                        order_index,
                        status: OrderStatus::NotExecutable(reason),
                    });
                    continue;
                }

                // Taker supplies the NFTs: structural failures, not skips.
                for id in &canonical {
                    if collection.owner_of(*id) != Some(ctx.caller) {
                        return Err(CurioError::InvalidOrder {
                            reason: format!("taker does not own {id}"),
                        });
                    }
                }
                if !collection.is_approved_for_all(ctx.caller, exchange) {
                    return Err(CurioError::InvalidOrder {
                        reason: "taker has not approved the exchange as operator".into(),
                    });
                }
                *maker_spend.entry(order.maker).or_default() += gross;
            }
            Direction::Sell => {
                // Wildcard SELL ownership was deferred by the oracle; the
                // concrete requested identifiers are checked here. A maker
                // who lost one is an external invalidation → skip.
                let lost = canonical
                    .iter()
                    .any(|id| collection.owner_of(*id) != Some(order.maker));
                if lost {
                    for id in &canonical {
                        claimed_ids.remove(&(token, *id));
                    }
                    skipped.push(SkippedLeg {
                        leg,
                        token,
                        order_index,
                        status: OrderStatus::NotExecutable(UnexecutableReason::TokenNotOwned),
                    });
                    continue;
                }
                taker_pays += gross;
            }
        }

        let trades = plan_trades(env, order, token, &canonical, gross, request.royalty_cap_bps);
        match order.direction {
            Direction::Buy => {
                net_to_taker += trades.iter().map(|t| t.split.counterparty).sum::<Decimal>();
            }
            Direction::Sell => net_to_taker -= gross,
        }

        let leg_fills = pricing::fill_count(order, canonical.len());
        *claimed_fills.entry((token, order_index)).or_default() += leg_fills;
        fills.push(PlannedFill {
            token,
            order_index,
            order_key: order.key,
            direction: order.direction,
            maker: order.maker,
            fills: leg_fills,
            completes: order.trade_count + virtual_fills + leg_fills == order.trade_max,
            trades,
        });
    }

    // Taker-side funding for the SELL legs, checked up front so the commit
    // phase cannot fail halfway through.
    if taker_pays > Decimal::ZERO {
        let available = token_contract.balance_of(ctx.caller);
        if available < taker_pays {
            return Err(CurioError::InsufficientFunds {
                needed: taker_pays,
                available,
            });
        }
        let approved = token_contract.allowance(ctx.caller, exchange);
        if approved < taker_pays {
            return Err(CurioError::InsufficientFunds {
                needed: taker_pays,
                available: approved,
            });
        }
    }

    // Slippage bound on the whole batch.
    if net_to_taker < request.total_price {
        return Err(CurioError::PriceToleranceExceeded {
            declared: request.total_price,
            net: net_to_taker,
        });
    }

    Ok(ExecutionPlan {
        fills,
        skipped,
        net_to_taker,
    })
}

/// Build the trade records for one leg. ANY: one per identifier at the
/// per-identifier price. ALL: a single record over the whole set, with the
/// royalty registry queried per identifier on an equal slice of the gross.
fn plan_trades(
    env: &dyn ExchangeEnv,
    order: &curio_types::Order,
    token: Address,
    canonical: &[TokenId],
    gross: Decimal,
    cap_bps: u16,
) -> Vec<PlannedTrade> {
    let engine = env.royalty_engine();
    match order.fulfillment {
        curio_types::Fulfillment::Any => canonical
            .iter()
            .map(|id| {
                let raw = engine.royalties_for(token, *id, order.price);
                PlannedTrade {
                    token_ids: vec![*id],
                    gross: order.price,
                    split: split_payment(order.price, order.royalty_factor_bps, cap_bps, &raw),
                }
            })
            .collect(),
        curio_types::Fulfillment::All => {
            let slice = gross / Decimal::from(canonical.len() as u64);
            let mut merged: Vec<RoyaltyShare> = Vec::new();
            for id in canonical {
                for share in engine.royalties_for(token, *id, slice) {
                    match merged.iter_mut().find(|m| m.recipient == share.recipient) {
                        Some(m) => m.amount += share.amount,
                        None => merged.push(share),
                    }
                }
            }
            vec![PlannedTrade {
                token_ids: canonical.to_vec(),
                gross,
                split: split_payment(gross, order.royalty_factor_bps, cap_bps, &merged),
            }]
        }
    }
}
