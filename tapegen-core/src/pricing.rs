//! Price synthesis — deterministic stock marks, option quotes, and the
//! win-rate-biased exit pricing used for sells.
//!
//! Stock marks are a pure function of `(symbol, date)` given a seed: the same
//! inputs always produce the same price before fill-time jitter. Options get
//! intrinsic value plus a square-root time-value term — bid/ask noise, not a
//! real pricing model.

use crate::domain::OptionType;
use crate::fees::round2;
use crate::rng::SeedHierarchy;
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::Rng;

/// Fraction of sells priced as winners.
pub const TARGET_WIN_RATE: f64 = 0.6;

/// Option quotes are clamped to this band before bid/ask noise...
const QUOTE_FLOOR: f64 = 0.05;
const QUOTE_CAP: f64 = 8.0;
/// ...and to this cap after it.
const NOISY_QUOTE_CAP: f64 = 10.0;

const MEGA_CAP_US: [&str; 4] = ["AAPL", "MSFT", "GOOGL", "AMZN"];
const HIGH_BETA_US: [&str; 4] = ["TSLA", "NVDA", "META", "NFLX"];
const MID_CAP_US: [&str; 4] = ["AMD", "INTC", "PLTR", "SOFI"];
const ASX_MAJORS: [&str; 4] = ["CBA", "BHP", "CSL", "WBC"];

/// Deterministic stock mark model over a fixed generation window.
#[derive(Debug, Clone)]
pub struct PriceModel {
    seeds: SeedHierarchy,
    start: NaiveDate,
    end: NaiveDate,
}

impl PriceModel {
    pub fn new(seeds: SeedHierarchy, start: NaiveDate, end: NaiveDate) -> Self {
        Self { seeds, start, end }
    }

    /// Per-symbol base price, constant across the run.
    ///
    /// Bands: mega-cap US $150–350, high-beta US $100–250, mid-cap US
    /// $20–100, ASX majors $50–150, everything else $10–50.
    fn base_price(&self, symbol: &str) -> f64 {
        let spread = self.seeds.symbol_seed(symbol) % 10_000;
        let (floor, band) = if MEGA_CAP_US.contains(&symbol) {
            (150, 200)
        } else if HIGH_BETA_US.contains(&symbol) {
            (100, 150)
        } else if MID_CAP_US.contains(&symbol) {
            (20, 80)
        } else if ASX_MAJORS.contains(&symbol) {
            (50, 100)
        } else {
            (10, 40)
        };
        (floor + spread % band) as f64
    }

    /// Stock mark for a symbol on a date, rounded to cents.
    ///
    /// base × linear growth ramp (+30% across the window) × per-(symbol, date)
    /// daily factor in [0.95, 1.05). Pure in `(symbol, date)`.
    pub fn stock_price(&self, symbol: &str, date: NaiveDate) -> f64 {
        let elapsed = (date - self.start).num_days().max(0) as f64;
        let window = (self.end - self.start).num_days().max(1) as f64;
        let growth = 1.0 + (elapsed / window) * 0.3;

        let daily_unit = SeedHierarchy::unit(self.seeds.daily_seed(symbol, date));
        let daily = 0.95 + daily_unit * 0.1;

        round2(self.base_price(symbol) * growth * daily)
    }
}

/// Clean option quote: intrinsic value plus a time-value term shrinking with
/// the square root of time to expiry, clamped to a realistic band.
pub fn option_quote(
    spot: f64,
    strike: f64,
    option_type: OptionType,
    trade_date: NaiveDate,
    expiry: NaiveDate,
) -> f64 {
    let years_to_expiry = (expiry - trade_date).num_days().max(0) as f64 / 365.0;
    let intrinsic = match option_type {
        OptionType::Call => (spot - strike).max(0.0),
        OptionType::Put => (strike - spot).max(0.0),
    };
    let time_value = spot * 0.02 * years_to_expiry.sqrt();
    (intrinsic + time_value).clamp(QUOTE_FLOOR, QUOTE_CAP)
}

/// Perturb a clean quote by a wide multiplicative bid/ask noise factor and
/// reclamp.
pub fn option_fill_price(quote: f64, rng: &mut StdRng) -> f64 {
    (quote * rng.gen_range(0.3..1.5)).clamp(QUOTE_FLOOR, NOISY_QUOTE_CAP)
}

/// Winning exit: 10–50% above average cost.
pub fn win_exit_price(average_cost: f64, rng: &mut StdRng) -> f64 {
    average_cost * rng.gen_range(1.10..1.50)
}

/// Losing exit: 5–15% below average cost.
pub fn loss_exit_price(average_cost: f64, rng: &mut StdRng) -> f64 {
    average_cost * rng.gen_range(0.85..0.95)
}

/// Sell price biased toward [`TARGET_WIN_RATE`] profitable exits, priced off
/// the cost basis rather than the market model.
pub fn exit_price(average_cost: f64, rng: &mut StdRng) -> f64 {
    if rng.gen_bool(TARGET_WIN_RATE) {
        win_exit_price(average_cost, rng)
    } else {
        loss_exit_price(average_cost, rng)
    }
}
