//! TradeRecord — a single emitted fill, immutable once created.

use crate::fees::FeeBreakdown;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Buy => "Buy",
            Side::Sell => "Sell",
        }
    }
}

/// Market of execution. Drives currency and the timezone suffix on the
/// formatted fill time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Market {
    Us,
    Au,
}

impl Market {
    pub fn code(self) -> &'static str {
        match self {
            Market::Us => "US",
            Market::Au => "AU",
        }
    }

    pub fn currency(self) -> &'static str {
        match self {
            Market::Us => "USD",
            Market::Au => "AUD",
        }
    }

    pub fn time_suffix(self) -> &'static str {
        match self {
            Market::Us => "ET",
            Market::Au => "AEST",
        }
    }
}

/// One emitted fill. Created once per simulated trade event, never mutated,
/// serialized at the end of the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRecord {
    pub side: Side,
    pub symbol: String,
    pub name: String,
    pub quantity: u32,
    pub price: f64,
    /// Notional: quantity × price.
    pub amount: f64,
    pub market: Market,
    pub fill_time: NaiveDateTime,
    /// Roughly one in ten fills carries the extended-hours session marker.
    pub extended_session: bool,
    pub is_option: bool,
    pub fees: FeeBreakdown,
}

impl TradeRecord {
    /// Fill time as the export renders it, e.g. `"Mar 07, 2023 10:15:42 ET"`.
    pub fn fill_time_display(&self) -> String {
        format!(
            "{} {}",
            self.fill_time.format("%b %d, %Y %H:%M:%S"),
            self.market.time_suffix()
        )
    }
}
