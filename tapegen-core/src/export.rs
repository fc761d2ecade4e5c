//! Broker-export CSV serialization.
//!
//! The schema mirrors the column layout of the brokerage's own trade export,
//! quirks included: duplicated market/currency columns, the fee total living
//! under the "Consolidated Audit Trail" header, and two trailing blank-named
//! columns. Every field is quoted and every numeric is rendered as text —
//! fees become the empty string when zero.

use crate::domain::TradeRecord;
use chrono::NaiveDateTime;
use csv::QuoteStyle;
use std::cmp::Reverse;
use std::path::Path;
use thiserror::Error;

/// Export header, in column order.
pub const COLUMNS: [&str; 37] = [
    "Side",
    "Symbol",
    "Name",
    "Order Price",
    "Order Qty",
    "Order Amount",
    "Status",
    "Filled@Avg Price",
    "Order Time",
    "Order Type",
    "Time-in-Force",
    "Allow Pre-Market",
    "Session",
    "Trigger price",
    "Position Opening",
    "Markets",
    "Currency",
    "Order Source",
    "Fill Qty",
    "Fill Price",
    "Fill Amount",
    "Fill Time",
    "Markets.1",
    "Currency.1",
    "Counterparty",
    "Remarks",
    "Commission",
    "Platform Fees",
    "Options Regulatory Fees",
    "OCC Fees",
    "Platform Fee",
    "Settlement Fee",
    "Trading Activity Fee",
    "Trading Activity Fees",
    "Consolidated Audit Trail",
    "",
    "",
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("write trade tape: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialize trade tape: {0}")]
    Csv(#[from] csv::Error),
}

/// Write the tape to `path`, newest fill first, all fields quoted.
pub fn write_tape(path: &Path, trades: &[TradeRecord]) -> Result<(), ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_path(path)?;
    writer.write_record(COLUMNS)?;

    let mut rows: Vec<&TradeRecord> = trades.iter().collect();
    rows.sort_by_key(|trade| Reverse(parse_display_time(&trade.fill_time_display())));

    for trade in rows {
        writer.write_record(render_row(trade))?;
    }
    writer.flush()?;
    Ok(())
}

/// Parse a display timestamp back for sorting, stripping the timezone suffix.
/// Unparsable strings sort as the minimum date (oldest end of the tape).
pub fn parse_display_time(display: &str) -> NaiveDateTime {
    let cleaned = display
        .trim_end_matches(" ET")
        .trim_end_matches(" AEST")
        .trim_end_matches(" AEDT");
    NaiveDateTime::parse_from_str(cleaned, "%b %d, %Y %H:%M:%S").unwrap_or(NaiveDateTime::MIN)
}

/// Render one record as its 37 export cells.
pub fn render_row(trade: &TradeRecord) -> Vec<String> {
    let time = trade.fill_time_display();
    let quantity = trade.quantity.to_string();
    let price = format!("{:.2}", trade.price);
    let amount = thousands(trade.amount);
    let session = if trade.extended_session {
        "RTH + Pre/Post-Mkt"
    } else {
        ""
    };

    vec![
        trade.side.as_str().to_string(),
        trade.symbol.clone(),
        trade.name.clone(),
        price.clone(),                                    // Order Price
        quantity.clone(),                                 // Order Qty
        amount.clone(),                                   // Order Amount
        "Filled".to_string(),                             // Status
        format!("{}@{}", trade.quantity, price),          // Filled@Avg Price
        time.clone(),                                     // Order Time
        "Limit".to_string(),                              // Order Type
        "Day".to_string(),                                // Time-in-Force
        String::new(),                                    // Allow Pre-Market
        session.to_string(),                              // Session
        String::new(),                                    // Trigger price
        String::new(),                                    // Position Opening
        trade.market.code().to_string(),                  // Markets
        trade.market.currency().to_string(),              // Currency
        String::new(),                                    // Order Source
        quantity,                                         // Fill Qty
        price,                                            // Fill Price
        amount,                                           // Fill Amount
        time,                                             // Fill Time
        trade.market.code().to_string(),                  // Markets.1
        trade.market.currency().to_string(),              // Currency.1
        String::new(),                                    // Counterparty
        String::new(),                                    // Remarks
        fee_cell(trade.fees.commission),
        fee_cell(trade.fees.platform),
        fee_cell(trade.fees.options_regulatory),
        fee_cell(trade.fees.occ),
        String::new(),                                    // Platform Fee
        fee_cell(trade.fees.settlement),
        fee_cell(trade.fees.trading_activity),
        String::new(),                                    // Trading Activity Fees
        format!("{:.2}", trade.fees.total),               // Consolidated Audit Trail
        String::new(),
        String::new(),
    ]
}

fn fee_cell(value: f64) -> String {
    if value > 0.0 {
        format!("{value:.2}")
    } else {
        String::new()
    }
}

/// Fixed-point rendering with thousands separators, e.g. `18,250.00`.
pub fn thousands(value: f64) -> String {
    let raw = format!("{value:.2}");
    let (int_part, frac_part) = raw.split_once('.').expect("fixed-point format");
    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(raw.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }
    format!("{grouped}.{frac_part}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Market, Side};
    use crate::fees::au_fees;
    use chrono::NaiveDate;

    fn sample_trade() -> TradeRecord {
        TradeRecord {
            side: Side::Buy,
            symbol: "CBA".into(),
            name: "CBA".into(),
            quantity: 200,
            price: 91.25,
            amount: 18250.0,
            market: Market::Au,
            fill_time: NaiveDate::from_ymd_opt(2023, 3, 7)
                .unwrap()
                .and_hms_opt(10, 15, 42)
                .unwrap(),
            extended_session: false,
            is_option: false,
            fees: au_fees(18250.0),
        }
    }

    #[test]
    fn header_matches_row_width() {
        let row = render_row(&sample_trade());
        assert_eq!(row.len(), COLUMNS.len());
    }

    #[test]
    fn row_renders_expected_cells() {
        let trade = sample_trade();
        let row = render_row(&trade);

        assert_eq!(row[0], "Buy");
        assert_eq!(row[3], "91.25");
        assert_eq!(row[5], "18,250.00");
        assert_eq!(row[6], "Filled");
        assert_eq!(row[7], "200@91.25");
        assert_eq!(row[15], "AU");
        assert_eq!(row[16], "AUD");
        assert_eq!(row[21], "Mar 07, 2023 10:15:42 AEST");
        // ASX commission hits the bp rate: 18,250 × 0.001 = 18.25.
        assert_eq!(row[26], "18.25");
        // Zero fees render empty.
        assert_eq!(row[27], "");
        assert_eq!(row[31], "1.82");
        // Last two cells are the blank-named parity columns.
        assert_eq!(row[35], "");
        assert_eq!(row[36], "");
    }

    #[test]
    fn zero_fee_total_still_rendered() {
        let mut trade = sample_trade();
        trade.fees = Default::default();
        let row = render_row(&trade);
        assert_eq!(row[34], "0.00");
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(thousands(0.0), "0.00");
        assert_eq!(thousands(999.999), "1,000.00");
        assert_eq!(thousands(18250.0), "18,250.00");
        assert_eq!(thousands(1_234_567.891), "1,234,567.89");
    }

    #[test]
    fn display_time_roundtrips_through_parse() {
        let trade = sample_trade();
        assert_eq!(parse_display_time(&trade.fill_time_display()), trade.fill_time);
    }

    #[test]
    fn unparsable_time_sorts_oldest() {
        assert_eq!(parse_display_time("not a timestamp"), NaiveDateTime::MIN);
    }
}
