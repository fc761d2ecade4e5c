//! Position ledger — holdings and purchase lots.
//!
//! Holdings never go negative: every sell is capped by the caller at the
//! current position. Lots are append-only and are never consumed by sells;
//! they exist solely to compute a volume-weighted average cost basis (no
//! FIFO accounting, no realized P&L).

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Symbol;

/// A single recorded purchase contributing to average cost basis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lot {
    pub quantity: u32,
    pub price: f64,
    pub time: NaiveDateTime,
}

/// Holdings plus purchase history, keyed by symbol.
///
/// `BTreeMap` keeps iteration order deterministic for reproducible runs.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    positions: BTreeMap<Symbol, i64>,
    lots: BTreeMap<Symbol, Vec<Lot>>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signed quantity currently held (zero when never traded).
    pub fn quantity(&self, symbol: &str) -> i64 {
        self.positions.get(symbol).copied().unwrap_or(0)
    }

    pub fn record_buy(&mut self, symbol: &str, quantity: u32, price: f64, time: NaiveDateTime) {
        *self.positions.entry(symbol.to_string()).or_insert(0) += i64::from(quantity);
        self.lots.entry(symbol.to_string()).or_default().push(Lot {
            quantity,
            price,
            time,
        });
    }

    /// Debit a sell. The caller must have capped `quantity` at the current
    /// position; lots are left untouched.
    pub fn record_sell(&mut self, symbol: &str, quantity: u32) {
        let position = self.positions.entry(symbol.to_string()).or_insert(0);
        debug_assert!(*position >= i64::from(quantity), "sell exceeds holdings");
        *position -= i64::from(quantity);
    }

    /// A sell may only be considered when something is held *and* a purchase
    /// lot exists to price the exit against.
    pub fn can_sell(&self, symbol: &str) -> bool {
        self.quantity(symbol) > 0 && self.lots.contains_key(symbol)
    }

    /// Volume-weighted average purchase price across all recorded lots.
    pub fn average_cost(&self, symbol: &str) -> Option<f64> {
        let lots = self.lots.get(symbol)?;
        let total_quantity: u64 = lots.iter().map(|lot| u64::from(lot.quantity)).sum();
        if total_quantity == 0 {
            return None;
        }
        let total_cost: f64 = lots
            .iter()
            .map(|lot| f64::from(lot.quantity) * lot.price)
            .sum();
        Some(total_cost / total_quantity as f64)
    }

    /// Symbols with a positive position, in symbol order.
    pub fn held(&self) -> impl Iterator<Item = (&str, i64)> {
        self.positions
            .iter()
            .filter(|(_, quantity)| **quantity > 0)
            .map(|(symbol, quantity)| (symbol.as_str(), *quantity))
    }

    pub fn held_count(&self) -> usize {
        self.held().count()
    }
}
