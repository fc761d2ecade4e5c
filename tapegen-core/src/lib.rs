//! TapeGen Core — synthetic broker trade tape generation.
//!
//! This crate contains everything behind the `tapegen` binary:
//! - Domain types (instrument universes, trade records, the position ledger)
//! - Deterministic RNG hierarchy (BLAKE3 sub-seeds off one master seed)
//! - Price synthesis (stock marks, option quotes, win-rate-biased exits)
//! - Market fee schedules (US per-contract, ASX percentage/flat)
//! - The month-stepped generator loop
//! - Broker-format CSV export

pub mod domain;
pub mod export;
pub mod fees;
pub mod generator;
pub mod pricing;
pub mod rng;
