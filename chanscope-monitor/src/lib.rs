//! # Chanscope Monitor
//!
//! Service layer over `chanscope-core`:
//!
//! - `MonitorConfig`: per-market parameters, dedup window, store and toast
//!   sizing, loadable from TOML
//! - `SignalDeduper`: cooldown per (symbol, timeframe, kind)
//! - `SignalStore`: bounded newest-first buffer with RAII subscriptions
//! - `ToastRack`: transient high-strength fan-out with timed expiry
//! - `Monitor`: the analysis orchestrator (single run, replay clock,
//!   cancellable run, parallel batch scan)

pub mod config;
pub mod dedup;
pub mod monitor;
pub mod store;
pub mod toast;

pub use config::{ConfigLoadError, MonitorConfig};
pub use dedup::SignalDeduper;
pub use monitor::{CancelToken, Monitor, RunError, RunOutcome, ScanJob};
pub use store::{SignalStore, SubscriberCallback, Subscription};
pub use toast::{ToastRack, TOAST_MIN_STRENGTH};
