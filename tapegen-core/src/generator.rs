//! The trade tape generator — month-stepped emission against a position ledger.
//!
//! Walks forward one month at a time, emits 10–20 trades per month, updates
//! holdings as it goes, and leaves the accumulated records ready for export.
//! All state lives in the `Generator` value; two generators with the same
//! config produce identical tapes.

use crate::domain::{
    monthly_expiries, option_display_name, option_symbol, option_underlyings, strike_ladder,
    Ledger, Market, OptionType, Side, TradeRecord, ASX_STOCKS, US_STOCKS,
};
use crate::fees::{au_fees, round2, us_option_fees, us_stock_fees};
use crate::pricing::{exit_price, option_fill_price, option_quote, PriceModel};
use crate::rng::SeedHierarchy;
use chrono::{Datelike, Duration, Local, Months, NaiveDate, NaiveDateTime, NaiveTime};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

/// Probability of selling a stock when holdings and history allow it.
const STOCK_SELL_PROBABILITY: f64 = 0.3;

/// Probability that the US leg of a trade is an option rather than a stock.
const OPTION_SHARE: f64 = 0.15;

/// Probability of the US market over the AU market.
const US_SHARE: f64 = 0.7;

const US_LOT_MENU: [u32; 7] = [50, 100, 150, 200, 250, 300, 500];
const AU_LOT_MENU: [u32; 5] = [100, 200, 300, 500, 1000];
const OPTION_LOT_MENU: [u32; 6] = [1, 2, 3, 4, 5, 10];

/// Sell probability for a held option, escalating as expiry approaches so
/// most positions unwind before they would expire worthless.
pub fn option_sell_probability(days_to_expiry: i64) -> f64 {
    match days_to_expiry {
        d if d < 3 => 0.98,
        d if d < 7 => 0.95,
        d if d < 14 => 0.90,
        d if d < 30 => 0.80,
        _ => 0.70,
    }
}

/// Everything needed to reproduce a run: seed plus the generation window.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub seed: u64,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl GeneratorConfig {
    /// A window of `years` × 365 days ending now.
    pub fn ending_now(seed: u64, years: u32) -> Self {
        let end = Local::now().naive_local();
        let start = end - Duration::days(i64::from(years) * 365);
        Self { seed, start, end }
    }
}

/// The generator: config, price model, ledger, and the accumulated tape.
pub struct Generator {
    config: GeneratorConfig,
    prices: PriceModel,
    ledger: Ledger,
    trades: Vec<TradeRecord>,
    rng: StdRng,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        let seeds = SeedHierarchy::new(config.seed);
        let rng = seeds.event_rng();
        let prices = PriceModel::new(seeds, config.start.date(), config.end.date());
        Self {
            config,
            prices,
            ledger: Ledger::new(),
            trades: Vec::new(),
            rng,
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Records in generation order (oldest month first). Export handles the
    /// reverse-chronological sort.
    pub fn trades(&self) -> &[TradeRecord] {
        &self.trades
    }

    pub fn into_trades(self) -> Vec<TradeRecord> {
        self.trades
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Walk the window month by month and emit every trade.
    pub fn run(&mut self) {
        let mut month = self.config.start;
        while month < self.config.end {
            self.emit_month(month);
            month = month
                .checked_add_months(Months::new(1))
                .expect("month within chrono range");
        }
    }

    fn emit_month(&mut self, month_start: NaiveDateTime) {
        let count = self.rng.gen_range(10..=20);
        for _ in 0..count {
            // Weekend timestamps drop the trade rather than rescheduling it.
            let Some(fill_time) = self.draw_fill_time(month_start) else {
                continue;
            };

            if self.rng.gen_bool(US_SHARE) {
                if self.rng.gen_bool(OPTION_SHARE) {
                    self.emit_us_option(fill_time);
                } else {
                    self.emit_stock(fill_time, Market::Us);
                }
            } else {
                self.emit_stock(fill_time, Market::Au);
            }
        }
    }

    /// Random trading-hours timestamp within the month; `None` on weekends.
    fn draw_fill_time(&mut self, month_start: NaiveDateTime) -> Option<NaiveDateTime> {
        let day_span = days_in_month(month_start.date()).min(31);
        let day_offset = self.rng.gen_range(0..day_span);
        let hour = self.rng.gen_range(9..=16);
        let minute = self.rng.gen_range(0..60);
        let second = self.rng.gen_range(0..60);

        let date = month_start.date() + Duration::days(i64::from(day_offset));
        let time = NaiveTime::from_hms_opt(hour, minute, second)?;
        let fill_time = date.and_time(time);
        (fill_time.weekday().num_days_from_monday() < 5).then_some(fill_time)
    }

    fn emit_stock(&mut self, fill_time: NaiveDateTime, market: Market) {
        let (universe, sell_cap, lot_menu): (&[&str], i64, &[u32]) = match market {
            Market::Us => (&US_STOCKS, 500, &US_LOT_MENU),
            Market::Au => (&ASX_STOCKS, 1000, &AU_LOT_MENU),
        };
        let symbol = *universe.choose(&mut self.rng).expect("non-empty universe");

        let basis = self
            .ledger
            .can_sell(symbol)
            .then(|| self.ledger.average_cost(symbol))
            .flatten();

        let (side, quantity, price) = match basis {
            Some(average_cost) if self.rng.gen_bool(STOCK_SELL_PROBABILITY) => {
                let held = self.ledger.quantity(symbol);
                let quantity = self.rng.gen_range(1..=held.min(sell_cap)) as u32;
                // Exit prices come from the win-rate bias, not the market
                // model, and carry no fill jitter.
                (Side::Sell, quantity, exit_price(average_cost, &mut self.rng))
            }
            _ => {
                let quantity = *lot_menu.choose(&mut self.rng).expect("non-empty lot menu");
                let mark = self.prices.stock_price(symbol, fill_time.date());
                let fill = mark * self.rng.gen_range(0.99..1.01);
                (Side::Buy, quantity, fill)
            }
        };

        self.record(
            side,
            symbol.to_string(),
            symbol.to_string(),
            quantity,
            round2(price),
            fill_time,
            market,
            false,
        );
    }

    fn emit_us_option(&mut self, fill_time: NaiveDateTime) {
        let underlying = *option_underlyings()
            .choose(&mut self.rng)
            .expect("non-empty underlyings");
        let spot = self.prices.stock_price(underlying, fill_time.date());

        let expiries = monthly_expiries(fill_time.date());
        // Buys stick to the nearest three expiries.
        let near = &expiries[..expiries.len().min(3)];
        let Some(&expiry) = near.choose(&mut self.rng) else {
            return;
        };
        let option_type = if self.rng.gen_bool(0.5) {
            OptionType::Call
        } else {
            OptionType::Put
        };
        let strikes = strike_ladder(spot);
        let Some(&strike) = strikes.choose(&mut self.rng) else {
            return;
        };

        let symbol = option_symbol(underlying, expiry, option_type, strike);
        let name = option_display_name(underlying, expiry, option_type, strike);

        let quote = option_quote(spot, strike, option_type, fill_time.date(), expiry);
        let market_price = option_fill_price(quote, &mut self.rng);

        let basis = self
            .ledger
            .can_sell(&symbol)
            .then(|| self.ledger.average_cost(&symbol))
            .flatten();
        let days_to_expiry = (expiry - fill_time.date()).num_days();
        let sell_probability = option_sell_probability(days_to_expiry);

        let (side, quantity, price) = match basis {
            Some(average_cost) if self.rng.gen_bool(sell_probability) => {
                let held = self.ledger.quantity(&symbol);
                let quantity = self.rng.gen_range(1..=held.min(20)) as u32;
                (Side::Sell, quantity, exit_price(average_cost, &mut self.rng))
            }
            _ => {
                let quantity = *OPTION_LOT_MENU
                    .choose(&mut self.rng)
                    .expect("non-empty lot menu");
                (Side::Buy, quantity, market_price)
            }
        };

        self.record(
            side,
            symbol,
            name,
            quantity,
            round2(price),
            fill_time,
            Market::Us,
            true,
        );
    }

    #[allow(clippy::too_many_arguments)]
    fn record(
        &mut self,
        side: Side,
        symbol: String,
        name: String,
        quantity: u32,
        price: f64,
        fill_time: NaiveDateTime,
        market: Market,
        is_option: bool,
    ) {
        let amount = f64::from(quantity) * price;
        let fees = match market {
            Market::Us if is_option => us_option_fees(quantity),
            Market::Us => us_stock_fees(&mut self.rng),
            Market::Au => au_fees(amount),
        };
        let extended_session = self.rng.gen_bool(0.1);

        match side {
            Side::Buy => self.ledger.record_buy(&symbol, quantity, price, fill_time),
            Side::Sell => self.ledger.record_sell(&symbol, quantity),
        }

        self.trades.push(TradeRecord {
            side,
            symbol,
            name,
            quantity,
            price,
            amount,
            market,
            fill_time,
            extended_session,
            is_option,
            fees,
        });
    }
}

fn days_in_month(date: NaiveDate) -> u32 {
    let first = date.with_day(1).expect("day 1 always valid");
    let next = first
        .checked_add_months(Months::new(1))
        .expect("month within chrono range");
    (next - first).num_days() as u32
}
