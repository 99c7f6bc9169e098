//! # curio-settlement
//!
//! The settlement plane of the Curio exchange: the pure **status oracle**,
//! the closed fill rules keyed on (direction, fulfillment), royalty-aware
//! **payment splitting**, the pure **batch planner**, and the [`Exchange`]
//! facade that commits plans against the order store, ledger and treasury.
//!
//! ## Execution discipline
//!
//! `execute_orders` is two-phase:
//!
//! 1. **Plan** — pure, no state mutation. Authorization and structural
//!    failures hard-fail here with zero effect; legs whose derived status
//!    is not Active are soft-skipped.
//! 2. **Commit** — per fill, all internal state (trade counter, terminal
//!    transition, ledger append, statistics, events) is written **before**
//!    any collaborator transfer for that fill, so a reentrant transfer hook
//!    can never observe a stale trade counter.

pub mod exchange;
pub mod plan;
pub mod pricing;
pub mod royalties;
pub mod status;

pub use exchange::{Exchange, ExecutionReceipt};
pub use plan::{BatchRequest, ExecutionPlan, PlannedFill, SkippedLeg, plan_execution};
pub use royalties::{PaymentSplit, split_payment};
pub use status::order_status;
