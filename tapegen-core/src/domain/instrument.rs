//! Instrument universes and option identity.
//!
//! Stock symbols come from two fixed universes (US tickers, ASX tickers).
//! Option symbols are synthesized from underlying + expiry + type + strike and
//! are treated as ordinary symbols by the ledger — there is no separate option
//! entity.

use chrono::{Datelike, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// US tickers eligible for stock trades.
pub const US_STOCKS: [&str; 32] = [
    "AAPL", "MSFT", "GOOGL", "AMZN", "TSLA", "NVDA", "META", "NFLX", //
    "AMD", "INTC", "BABA", "PLTR", "SOFI", "COIN", "ROKU", "SQ", //
    "PYPL", "UBER", "LYFT", "SNOW", "CRM", "ORCL", "ADBE", "NOW", //
    "SHOP", "SPOT", "ZM", "DOCU", "CRWD", "OKTA", "DDOG", "MDB",
];

/// ASX tickers eligible for stock trades.
pub const ASX_STOCKS: [&str; 30] = [
    "CBA", "BHP", "CSL", "WBC", "ANZ", "NAB", "WES", "MQG", "RIO", "TLS", //
    "COL", "TCL", "WOW", "FMG", "SYD", "REA", "QBE", "IAG", "AMP", "ORG", //
    "S32", "WPL", "ALL", "GMG", "JHX", "CPU", "XRO", "APT", "ZIP", "LYC",
];

/// Options are only written on the most liquid US names.
pub fn option_underlyings() -> &'static [&'static str] {
    &US_STOCKS[..20]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    pub fn code(self) -> char {
        match self {
            OptionType::Call => 'C',
            OptionType::Put => 'P',
        }
    }
}

/// Compact option symbol: `UNDERLYING` + `YYMMDD` + `C`/`P` + strike×1000.
///
/// `option_symbol("AAPL", 2024-01-19, Call, 150.0)` → `"AAPL240119C150000"`.
pub fn option_symbol(
    underlying: &str,
    expiry: NaiveDate,
    option_type: OptionType,
    strike: f64,
) -> String {
    format!(
        "{underlying}{}{}{}",
        expiry.format("%y%m%d"),
        option_type.code(),
        (strike * 1000.0) as i64
    )
}

/// Human-readable option name used in the export's Name column.
pub fn option_display_name(
    underlying: &str,
    expiry: NaiveDate,
    option_type: OptionType,
    strike: f64,
) -> String {
    format!(
        "{underlying} {} {strike:.2}{}",
        expiry.format("%y%m%d"),
        option_type.code()
    )
}

/// Monthly option expiries: the third Friday of each of the next twelve
/// months, strictly after `base`, nearest six kept.
pub fn monthly_expiries(base: NaiveDate) -> Vec<NaiveDate> {
    let Some(anchor) = base.with_day(1) else {
        return Vec::new();
    };
    (1..=12u32)
        .filter_map(|offset| {
            let month = anchor.checked_add_months(Months::new(offset))?;
            NaiveDate::from_weekday_of_month_opt(month.year(), month.month(), Weekday::Fri, 3)
        })
        .filter(|expiry| *expiry > base)
        .take(6)
        .collect()
}

/// Strikes on the $5 grid around spot: nearest $5 multiple ± {0, 5, 10, 15, 20},
/// positive strikes only.
pub fn strike_ladder(spot: f64) -> Vec<f64> {
    let base = (spot / 5.0).round() * 5.0;
    [-20.0, -15.0, -10.0, -5.0, 0.0, 5.0, 10.0, 15.0, 20.0]
        .iter()
        .map(|offset| base + offset)
        .filter(|strike| *strike > 0.0)
        .collect()
}
