//! Signal deduper — a cooldown per (symbol, timeframe, kind).
//!
//! The cache lives for the process; its key space is bounded by the symbol
//! universe times timeframes times signal kinds, so there is no eviction.

use std::collections::HashMap;
use std::sync::Mutex;

use chanscope_core::domain::{SignalKind, Timeframe};

type DedupKey = (String, Timeframe, SignalKind);

#[derive(Debug)]
pub struct SignalDeduper {
    window_ms: i64,
    last_emit: Mutex<HashMap<DedupKey, i64>>,
}

impl SignalDeduper {
    pub fn new(window_ms: i64) -> Self {
        Self {
            window_ms,
            last_emit: Mutex::new(HashMap::new()),
        }
    }

    pub fn window_ms(&self) -> i64 {
        self.window_ms
    }

    /// Non-mutating check: would an emission at `now_ms` pass the window?
    pub fn should_emit(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        kind: SignalKind,
        now_ms: i64,
    ) -> bool {
        let map = self.last_emit.lock().expect("deduper mutex poisoned");
        match map.get(&(symbol.to_string(), timeframe, kind)) {
            Some(&last) => now_ms - last >= self.window_ms,
            None => true,
        }
    }

    /// Atomic check-and-record: true means the caller owns this emission and
    /// the entry has been stamped with `now_ms`.
    pub fn try_emit(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        kind: SignalKind,
        now_ms: i64,
    ) -> bool {
        let mut map = self.last_emit.lock().expect("deduper mutex poisoned");
        let key = (symbol.to_string(), timeframe, kind);
        match map.get(&key) {
            Some(&last) if now_ms - last < self.window_ms => {
                tracing::trace!(symbol, %timeframe, %kind, "signal suppressed by dedup window");
                false
            }
            _ => {
                map.insert(key, now_ms);
                true
            }
        }
    }

    #[cfg(test)]
    fn entries(&self) -> usize {
        self.last_emit.lock().unwrap().len()
    }
}
