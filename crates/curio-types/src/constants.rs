//! System-wide constants for the Curio exchange engine.

/// Basis-point denominator for royalty factors (10_000 = 100%).
pub const ROYALTY_DENOMINATOR_BPS: u16 = 10_000;

/// Maximum legs in a single `execute_orders` batch.
pub const DEFAULT_MAX_BATCH_LEGS: usize = 32;

/// Maximum identifiers in one order's eligible set.
pub const DEFAULT_MAX_TOKEN_IDS: usize = 256;

/// Decimal places kept when scaling royalty payouts (matches an 18-decimal
/// settlement token).
pub const AMOUNT_SCALE: u32 = 18;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "Curio";
