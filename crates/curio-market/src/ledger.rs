//! Trade Ledger: append-only record of executed fills.
//!
//! Written only by the settlement engine on a successful (non-skipped)
//! fill; read by external reporting collaborators through the indexed
//! accessors.

use curio_types::Trade;

/// Append-only trade history.
#[derive(Debug, Default)]
pub struct TradeLedger {
    trades: Vec<Trade>,
}

impl TradeLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a trade, returning its ledger index.
    pub fn append(&mut self, trade: Trade) -> usize {
        self.trades.push(trade);
        self.trades.len() - 1
    }

    #[must_use]
    pub fn trades_length(&self) -> usize {
        self.trades.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Trade> {
        self.trades.get(index)
    }

    /// Batched indexed lookup; out-of-range indices yield `None`.
    #[must_use]
    pub fn get_trades(&self, indices: &[usize]) -> Vec<Option<Trade>> {
        indices.iter().map(|&i| self.trades.get(i).cloned()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Trade> {
        self.trades.iter()
    }
}
