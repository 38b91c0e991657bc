//! Toast rack — transient fan-out for high-strength signals.
//!
//! Signals at or above the strength threshold enter a small newest-first set.
//! Each entry expires `lifetime` after insertion; a reaper thread owned by
//! the rack removes expired entries, and an explicit dismiss removes one
//! immediately. Dropping the rack shuts the reaper down.

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use chanscope_core::domain::{Signal, SignalId};

/// Minimum strength for toast fan-out.
pub const TOAST_MIN_STRENGTH: f64 = 50.0;

struct ToastEntry {
    signal: Signal,
    deadline: Instant,
}

struct RackInner {
    entries: VecDeque<ToastEntry>,
    shutdown: bool,
}

struct Shared {
    inner: Mutex<RackInner>,
    wake: Condvar,
}

pub struct ToastRack {
    capacity: usize,
    lifetime: Duration,
    shared: Arc<Shared>,
    reaper: Option<JoinHandle<()>>,
}

impl ToastRack {
    pub fn new(capacity: usize, lifetime: Duration) -> Self {
        let shared = Arc::new(Shared {
            inner: Mutex::new(RackInner {
                entries: VecDeque::new(),
                shutdown: false,
            }),
            wake: Condvar::new(),
        });

        let reaper_shared = Arc::clone(&shared);
        let reaper = std::thread::Builder::new()
            .name("toast-reaper".into())
            .spawn(move || reaper_loop(&reaper_shared))
            .expect("failed to spawn toast reaper");

        Self {
            capacity,
            lifetime,
            shared,
            reaper: Some(reaper),
        }
    }

    /// Insert newest-first; overflow drops the oldest toast.
    pub fn push(&self, signal: Signal) {
        let mut inner = self.shared.inner.lock().expect("toast mutex poisoned");
        inner.entries.push_front(ToastEntry {
            signal,
            deadline: Instant::now() + self.lifetime,
        });
        while inner.entries.len() > self.capacity {
            inner.entries.pop_back();
        }
        drop(inner);
        // Wake the reaper: the new entry may now carry the earliest deadline.
        self.shared.wake.notify_all();
    }

    /// Remove a toast immediately and cancel its pending expiry.
    pub fn dismiss(&self, id: SignalId) -> bool {
        let mut inner = self.shared.inner.lock().expect("toast mutex poisoned");
        let before = inner.entries.len();
        inner.entries.retain(|e| e.signal.id != id);
        let removed = inner.entries.len() != before;
        drop(inner);
        if removed {
            tracing::debug!(id = id.0, "toast dismissed");
            self.shared.wake.notify_all();
        }
        removed
    }

    /// Newest-first copy of the live toasts.
    pub fn active(&self) -> Vec<Signal> {
        let inner = self.shared.inner.lock().expect("toast mutex poisoned");
        inner.entries.iter().map(|e| e.signal.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.shared
            .inner
            .lock()
            .expect("toast mutex poisoned")
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for ToastRack {
    fn drop(&mut self) {
        {
            let mut inner = self.shared.inner.lock().expect("toast mutex poisoned");
            inner.shutdown = true;
        }
        self.shared.wake.notify_all();
        if let Some(handle) = self.reaper.take() {
            let _ = handle.join();
        }
    }
}

fn reaper_loop(shared: &Shared) {
    let mut inner = shared.inner.lock().expect("toast mutex poisoned");
    loop {
        if inner.shutdown {
            return;
        }

        let now = Instant::now();
        let before = inner.entries.len();
        inner.entries.retain(|e| e.deadline > now);
        if inner.entries.len() != before {
            tracing::debug!(expired = before - inner.entries.len(), "toasts expired");
        }

        let next_deadline = inner.entries.iter().map(|e| e.deadline).min();
        inner = match next_deadline {
            Some(deadline) => {
                let timeout = deadline.saturating_duration_since(now);
                shared
                    .wake
                    .wait_timeout(inner, timeout)
                    .expect("toast mutex poisoned")
                    .0
            }
            None => shared.wake.wait(inner).expect("toast mutex poisoned"),
        };
    }
}
