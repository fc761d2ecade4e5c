//! Fee schedules — US per-contract and ASX percentage/flat.
//!
//! Every monetary component is rounded to cents before summation; the total
//! is the rounded sum of the rounded components.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Per-trade fee breakdown.
///
/// The clearing fee only occurs on the ASX schedule and has no column of its
/// own in the export; it is folded into `total`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    pub commission: f64,
    pub platform: f64,
    pub options_regulatory: f64,
    pub occ: f64,
    pub settlement: f64,
    pub trading_activity: f64,
    pub clearing: f64,
    pub total: f64,
}

/// Round to 2 decimal places (cents).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// US option fees, per contract: $0.10 commission, $0.40 platform, $0.015
/// regulatory, $0.02 OCC, plus a flat $0.01 trading activity fee.
pub fn us_option_fees(quantity: u32) -> FeeBreakdown {
    let quantity = f64::from(quantity);
    let commission = round2(0.10 * quantity);
    let platform = round2(0.40 * quantity);
    let options_regulatory = round2(0.015 * quantity);
    let occ = round2(0.02 * quantity);
    let trading_activity = 0.01;

    FeeBreakdown {
        commission,
        platform,
        options_regulatory,
        occ,
        settlement: 0.0,
        trading_activity,
        clearing: 0.0,
        total: round2(commission + platform + options_regulatory + occ + trading_activity),
    }
}

/// US stock fees: zero-commission brokerage, with a $0.39 settlement fee on
/// roughly half of fills.
pub fn us_stock_fees(rng: &mut StdRng) -> FeeBreakdown {
    let settlement = *[0.0, 0.39].choose(rng).expect("non-empty choices");
    FeeBreakdown {
        settlement,
        total: settlement,
        ..FeeBreakdown::default()
    }
}

/// ASX fees: commission is the greater of a $9.50 minimum and 10 bp of
/// notional, plus a flat $1.82 settlement fee and a 2 bp clearing fee.
pub fn au_fees(notional: f64) -> FeeBreakdown {
    let commission = round2(9.50_f64.max(notional * 0.001));
    let settlement = 1.82;
    let clearing = round2(notional * 0.0002);

    FeeBreakdown {
        commission,
        settlement,
        clearing,
        total: round2(commission + settlement + clearing),
        ..FeeBreakdown::default()
    }
}
