//! Domain types: bars, markets, timeframes, signals, ids.

pub mod bar;
pub mod ids;
pub mod market;
pub mod signal;

pub use bar::{validate_bars, Bar, BarError};
pub use ids::{BiId, SignalId, SignalIdGen, SnapshotHash, ThirdBuyId, ZhongshuId};
pub use market::{Market, Timeframe};
pub use signal::{clamp_strength, KeyLevels, Signal, SignalKind};
