//! Domain types for the trade tape.

pub mod instrument;
pub mod ledger;
pub mod trade;

pub use instrument::{
    monthly_expiries, option_display_name, option_symbol, option_underlyings, strike_ladder,
    OptionType, ASX_STOCKS, US_STOCKS,
};
pub use ledger::{Ledger, Lot};
pub use trade::{Market, Side, TradeRecord};

/// Symbol type alias
pub type Symbol = String;
