//! End-to-end generation tests: reproducibility, ledger invariants, exit
//! pricing bands, and the exported file shape.

use chrono::{NaiveDate, NaiveDateTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use tapegen_core::domain::{Side, TradeRecord};
use tapegen_core::export::{parse_display_time, write_tape, COLUMNS};
use tapegen_core::generator::{option_sell_probability, Generator, GeneratorConfig};
use tapegen_core::pricing::{loss_exit_price, win_exit_price};

fn datetime(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn one_year_config(seed: u64) -> GeneratorConfig {
    GeneratorConfig {
        seed,
        start: datetime(2021, 1, 4),
        end: datetime(2021, 12, 31),
    }
}

fn five_year_config(seed: u64) -> GeneratorConfig {
    GeneratorConfig {
        seed,
        start: datetime(2019, 7, 1),
        end: datetime(2024, 7, 1),
    }
}

fn run(config: GeneratorConfig) -> Generator {
    let mut generator = Generator::new(config);
    generator.run();
    generator
}

fn row_fingerprint(trade: &TradeRecord) -> (String, String, u32, String, String, String) {
    (
        trade.side.as_str().to_string(),
        trade.symbol.clone(),
        trade.quantity,
        format!("{:.2}", trade.price),
        trade.fill_time_display(),
        format!("{:.2}", trade.fees.total),
    )
}

/// Replay the tape in generation order, tracking positions and asserting the
/// no-short-selling invariants along the way. Returns the final snapshot.
fn replay_positions(trades: &[TradeRecord]) -> BTreeMap<String, i64> {
    let mut positions: BTreeMap<String, i64> = BTreeMap::new();
    for trade in trades {
        let position = positions.entry(trade.symbol.clone()).or_insert(0);
        match trade.side {
            Side::Buy => *position += i64::from(trade.quantity),
            Side::Sell => {
                assert!(
                    i64::from(trade.quantity) <= *position,
                    "sell of {} x{} exceeds holdings {}",
                    trade.symbol,
                    trade.quantity,
                    position
                );
                *position -= i64::from(trade.quantity);
            }
        }
        assert!(*position >= 0, "short position in {}", trade.symbol);
    }
    positions
}

#[test]
fn fixed_seed_reproduces_the_tape() {
    let a = run(five_year_config(42));
    let b = run(five_year_config(42));

    assert_eq!(a.trades().len(), b.trades().len());
    for (left, right) in a.trades().iter().zip(b.trades()) {
        assert_eq!(row_fingerprint(left), row_fingerprint(right));
    }
    assert_eq!(a.ledger().held_count(), b.ledger().held_count());
}

#[test]
fn different_seeds_produce_different_tapes() {
    let a = run(one_year_config(1));
    let b = run(one_year_config(2));

    let rows_a: Vec<_> = a.trades().iter().map(row_fingerprint).collect();
    let rows_b: Vec<_> = b.trades().iter().map(row_fingerprint).collect();
    assert_ne!(rows_a, rows_b);
}

#[test]
fn no_short_selling_over_five_years() {
    let generator = run(five_year_config(7));
    assert!(!generator.trades().is_empty());
    replay_positions(generator.trades());
}

#[test]
fn ledger_snapshot_matches_replayed_tape() {
    let generator = run(one_year_config(11));
    let replayed = replay_positions(generator.trades());

    for (symbol, quantity) in &replayed {
        assert_eq!(generator.ledger().quantity(symbol), *quantity);
    }
    let held = replayed.values().filter(|q| **q > 0).count();
    assert_eq!(generator.ledger().held_count(), held);
}

#[test]
fn monthly_volume_is_bounded() {
    // 12 months at up to 20 draws each; weekend drops only reduce the count.
    let generator = run(one_year_config(3));
    let count = generator.trades().len();
    assert!(count <= 12 * 20, "got {count}");
    assert!(count >= 12 * 5, "got {count}"); // ~5/7 of 10 minimum survive weekends
}

#[test]
fn sells_never_use_market_jitter_bands() {
    // Forced branches per the win-rate bias: $100 basis must exit in
    // [110, 150] on a win and [85, 95] on a loss.
    let mut rng = StdRng::seed_from_u64(21);
    for _ in 0..2000 {
        let win = win_exit_price(100.0, &mut rng);
        assert!((110.0..150.0).contains(&win), "win exit at {win}");
        let loss = loss_exit_price(100.0, &mut rng);
        assert!((85.0..95.0).contains(&loss), "loss exit at {loss}");
    }
}

#[test]
fn near_expiry_options_sell_at_098() {
    assert_eq!(option_sell_probability(2), 0.98);

    // Statistical check of the decision itself: a held lot two days from
    // expiry should be unwound ~98% of the time. 20k trials put four
    // standard deviations at ±0.004.
    let mut rng = StdRng::seed_from_u64(17);
    let trials = 20_000;
    let sells = (0..trials)
        .filter(|_| rng.gen_bool(option_sell_probability(2)))
        .count();
    let rate = sells as f64 / trials as f64;
    assert!((0.975..=0.985).contains(&rate), "observed sell rate {rate}");
}

#[test]
fn tape_file_is_sorted_newest_first() {
    let generator = run(one_year_config(5));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test-trades.csv");
    write_tape(&path, generator.trades()).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(headers.len(), COLUMNS.len());
    assert_eq!(&headers[0], "Side");
    assert_eq!(&headers[34], "Consolidated Audit Trail");

    let fill_time_col = 21;
    let mut rows = 0;
    let mut previous: Option<NaiveDateTime> = None;
    for record in reader.records() {
        let record = record.unwrap();
        assert_eq!(record.len(), COLUMNS.len());
        let parsed = parse_display_time(&record[fill_time_col]);
        if let Some(prev) = previous {
            assert!(parsed <= prev, "tape not descending at row {rows}");
        }
        previous = Some(parsed);
        rows += 1;
    }
    assert_eq!(rows, generator.trades().len());
}

#[test]
fn option_symbols_trade_like_any_other() {
    // Option rows carry synthesized symbols; their position accounting goes
    // through the same ledger as stocks.
    let generator = run(five_year_config(13));
    let option_sells = generator
        .trades()
        .iter()
        .filter(|t| t.is_option && t.side == Side::Sell)
        .count();
    let option_buys = generator
        .trades()
        .iter()
        .filter(|t| t.is_option && t.side == Side::Buy)
        .count();
    // Over five years some options must have been bought; sells can only
    // exist against prior buys (already enforced by replay elsewhere).
    assert!(option_buys > 0);
    assert!(option_sells <= option_buys);
}
