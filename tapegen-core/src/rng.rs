//! Deterministic RNG hierarchy.
//!
//! A master seed generates deterministic sub-seeds for each symbol and each
//! `(symbol, date)` pair. Sub-seeds are derived via BLAKE3 hashing rather than
//! any platform hash, so a given seed reproduces the same tape on every
//! platform and toolchain.

use chrono::{Datelike, NaiveDate};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Deterministic RNG hierarchy.
///
/// The master seed drives two independent streams:
/// - the **event stream** (`event_rng`), a single sequential `StdRng` for
///   in-order simulation draws, and
/// - the **price stream**, per-symbol and per-(symbol, date) sub-seeds that
///   are independent of the order in which they are requested.
#[derive(Debug, Clone)]
pub struct SeedHierarchy {
    master_seed: u64,
}

impl SeedHierarchy {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Derive a deterministic sub-seed for a symbol, independent of call order.
    pub fn symbol_seed(&self, symbol: &str) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.master_seed.to_le_bytes());
        hasher.update(symbol.as_bytes());
        Self::finish(hasher)
    }

    /// Derive a deterministic sub-seed for a `(symbol, date)` pair.
    ///
    /// `daily_seed("AAPL", d)` yields the same value no matter how many other
    /// symbols or dates were seeded before it.
    pub fn daily_seed(&self, symbol: &str, date: NaiveDate) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.master_seed.to_le_bytes());
        hasher.update(symbol.as_bytes());
        hasher.update(&date.num_days_from_ce().to_le_bytes());
        Self::finish(hasher)
    }

    /// Sequential RNG for the in-order simulation draws.
    pub fn event_rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.master_seed)
    }

    /// Map a sub-seed onto the unit interval `[0, 1)`.
    pub fn unit(seed: u64) -> f64 {
        (seed >> 11) as f64 / (1u64 << 53) as f64
    }

    fn finish(hasher: blake3::Hasher) -> u64 {
        let hash = hasher.finalize();
        u64::from_le_bytes(hash.as_bytes()[..8].try_into().expect("hash is 32 bytes"))
    }
}
