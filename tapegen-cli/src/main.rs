//! TapeGen CLI — generate a synthetic broker trade tape for portfolio-tracker
//! testing.
//!
//! One run walks the configured window month by month, writes the tape as a
//! broker-format CSV, and prints a summary of what it produced.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tapegen_core::domain::{Ledger, Market, Side, TradeRecord};
use tapegen_core::export::write_tape;
use tapegen_core::generator::{Generator, GeneratorConfig};

#[derive(Parser)]
#[command(
    name = "tapegen",
    about = "TapeGen — synthetic broker trade tape generator"
)]
struct Cli {
    /// Master seed. The same seed over the same window reproduces the tape.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Years of history to generate, ending today.
    #[arg(long, default_value_t = 5)]
    years: u32,

    /// Output CSV path.
    #[arg(long, default_value = "test-trades.csv")]
    out: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = GeneratorConfig::ending_now(cli.seed, cli.years);
    println!(
        "Generating trades from {} to {} (seed {})...",
        config.start.date(),
        config.end.date(),
        config.seed
    );

    let mut generator = Generator::new(config);
    generator.run();

    write_tape(&cli.out, generator.trades())
        .with_context(|| format!("write {}", cli.out.display()))?;
    println!(
        "Saved {} trades to {}",
        generator.trades().len(),
        cli.out.display()
    );

    print_summary(generator.trades(), generator.ledger());
    Ok(())
}

fn print_summary(trades: &[TradeRecord], ledger: &Ledger) {
    let total = trades.len();
    let pct = |count: usize| {
        if total == 0 {
            0.0
        } else {
            count as f64 / total as f64 * 100.0
        }
    };

    let us = trades.iter().filter(|t| t.market == Market::Us).count();
    let au = trades.iter().filter(|t| t.market == Market::Au).count();
    let options = trades.iter().filter(|t| t.is_option).count();
    let stocks = total - options;
    let buys = trades.iter().filter(|t| t.side == Side::Buy).count();
    let sells = total - buys;

    println!();
    println!("=== Trade Tape Summary ===");
    println!("Total trades:   {total}");
    println!("US trades:      {us} ({:.1}%)", pct(us));
    println!("AU trades:      {au} ({:.1}%)", pct(au));
    println!("Stock trades:   {stocks} ({:.1}%)", pct(stocks));
    println!("Option trades:  {options} ({:.1}%)", pct(options));
    println!("Buy trades:     {buys} ({:.1}%)", pct(buys));
    println!("Sell trades:    {sells} ({:.1}%)", pct(sells));
    println!();
    println!("Positions held: {}", ledger.held_count());

    let sample: Vec<_> = ledger.held().take(10).collect();
    if !sample.is_empty() {
        println!("Sample holdings:");
        for (symbol, quantity) in sample {
            println!("  {symbol}: {quantity}");
        }
    }
}
