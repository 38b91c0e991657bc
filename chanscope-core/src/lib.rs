//! Chanscope Core — the analytical heart of the multi-market monitor.
//!
//! This crate contains everything between raw bars and emitted signals:
//! - Domain types (bars, markets, timeframes, signals, ids)
//! - Indicator kernels (EMA, SMA, MA panel, MACD, RSI, Bollinger, ATR)
//! - The five-stage Chanlun pipeline (containment reduction, fractals, bis,
//!   zhongshus, third-buys)
//! - Technical signal detectors with timeframe-weighted strength scoring
//! - The serializable analysis snapshot with a BLAKE3 fingerprint
//!
//! Deduplication, storage, and orchestration live in `chanscope-monitor`.

pub mod chanlun;
pub mod detectors;
pub mod domain;
pub mod indicators;
pub mod snapshot;
