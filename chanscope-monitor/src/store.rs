//! Signal store — bounded newest-first buffer with subscriptions.
//!
//! `add_batch` is atomic: insert at the head in caller order, truncate to
//! capacity, then notify every subscriber once with the full newest-first
//! snapshot. Callbacks run after the store lock is released, so a subscriber
//! may re-enter the store. Subscriptions are RAII handles; dropping one
//! unsubscribes. High-strength signals additionally fan out to the toast
//! rack.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, Weak};

use chanscope_core::domain::{Signal, SignalId};

use crate::toast::{ToastRack, TOAST_MIN_STRENGTH};

pub type SubscriberCallback = Arc<dyn Fn(&[Signal]) + Send + Sync + 'static>;

struct StoreInner {
    signals: VecDeque<Signal>,
    subscribers: Vec<(u64, SubscriberCallback)>,
    next_subscriber: u64,
}

pub struct SignalStore {
    capacity: usize,
    inner: Arc<Mutex<StoreInner>>,
    toasts: ToastRack,
}

impl SignalStore {
    pub fn new(capacity: usize, toasts: ToastRack) -> Self {
        Self {
            capacity,
            inner: Arc::new(Mutex::new(StoreInner {
                signals: VecDeque::new(),
                subscribers: Vec::new(),
                next_subscriber: 0,
            })),
            toasts,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn toasts(&self) -> &ToastRack {
        &self.toasts
    }

    /// Insert a batch at the head (caller order preserved), truncate, notify.
    pub fn add_batch(&self, signals: Vec<Signal>) {
        if signals.is_empty() {
            return;
        }
        let toastable: Vec<Signal> = signals
            .iter()
            .filter(|s| s.strength >= TOAST_MIN_STRENGTH)
            .cloned()
            .collect();

        let (snapshot, callbacks) = {
            let mut inner = self.inner.lock().expect("store mutex poisoned");
            for signal in signals.into_iter().rev() {
                inner.signals.push_front(signal);
            }
            while inner.signals.len() > self.capacity {
                inner.signals.pop_back();
            }
            (
                inner.signals.iter().cloned().collect::<Vec<_>>(),
                inner
                    .subscribers
                    .iter()
                    .map(|(_, cb)| Arc::clone(cb))
                    .collect::<Vec<_>>(),
            )
        };

        for signal in toastable {
            self.toasts.push(signal);
        }

        tracing::debug!(total = snapshot.len(), "signal batch stored");
        for callback in callbacks {
            callback(&snapshot);
        }
    }

    /// Empty the buffer, then notify with the empty snapshot.
    pub fn clear(&self) {
        let callbacks = {
            let mut inner = self.inner.lock().expect("store mutex poisoned");
            inner.signals.clear();
            inner
                .subscribers
                .iter()
                .map(|(_, cb)| Arc::clone(cb))
                .collect::<Vec<_>>()
        };
        for callback in callbacks {
            callback(&[]);
        }
    }

    /// Newest-first copy of the buffer.
    pub fn snapshot(&self) -> Vec<Signal> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        inner.signals.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("store mutex poisoned").signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flip the acknowledged flag in place. Returns false for unknown ids.
    pub fn acknowledge(&self, id: SignalId) -> bool {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        match inner.signals.iter_mut().find(|s| s.id == id) {
            Some(signal) => {
                signal.acknowledged = true;
                true
            }
            None => false,
        }
    }

    /// Register a callback; it fires in FIFO subscribe order on every batch
    /// and clear. The returned handle unsubscribes on drop.
    pub fn subscribe(&self, callback: SubscriberCallback) -> Subscription {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        let id = inner.next_subscriber;
        inner.next_subscriber += 1;
        inner.subscribers.push((id, callback));
        Subscription {
            inner: Arc::downgrade(&self.inner),
            id,
        }
    }
}

/// RAII subscription handle.
pub struct Subscription {
    inner: Weak<Mutex<StoreInner>>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            let mut inner = inner.lock().expect("store mutex poisoned");
            inner.subscribers.retain(|(sub_id, _)| *sub_id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chanscope_core::domain::{Market, SignalKind, Timeframe};
    use std::time::Duration;

    fn signal(id: u64, strength: f64) -> Signal {
        Signal {
            id: SignalId(id),
            symbol: "BTCUSDT".into(),
            market: Market::Crypto,
            timeframe: Timeframe::H1,
            kind: SignalKind::KeyLevelBreakout,
            strength,
            price: 100.0,
            time: id as i64,
            description: "test".into(),
            key_levels: None,
            acknowledged: false,
        }
    }

    fn store(capacity: usize) -> Arc<SignalStore> {
        Arc::new(SignalStore::new(
            capacity,
            ToastRack::new(5, Duration::from_secs(60)),
        ))
    }

    #[test]
    fn batch_is_inserted_newest_first() {
        let store = store(10);
        store.add_batch(vec![signal(1, 10.0), signal(2, 10.0)]);
        store.add_batch(vec![signal(3, 10.0)]);
        let ids: Vec<u64> = store.snapshot().iter().map(|s| s.id.0).collect();
        // Later batch first; within a batch, caller order.
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn overflow_drops_oldest() {
        let store = store(3);
        store.add_batch((0..5).map(|i| signal(i, 10.0)).collect());
        let ids: Vec<u64> = store.snapshot().iter().map(|s| s.id.0).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn subscribers_get_one_snapshot_per_batch() {
        let store = store(10);
        let seen: Arc<Mutex<Vec<usize>>> = Arc::new(Mutex::new(Vec::new()));
        let seen_cb = Arc::clone(&seen);
        let _sub = store.subscribe(Arc::new(move |snapshot: &[Signal]| {
            seen_cb.lock().unwrap().push(snapshot.len());
        }));

        store.add_batch(vec![signal(1, 10.0), signal(2, 10.0)]);
        store.add_batch(vec![signal(3, 10.0)]);
        assert_eq!(*seen.lock().unwrap(), vec![2, 3]);
    }

    #[test]
    fn callbacks_fire_in_subscribe_order() {
        let store = store(10);
        let order: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));

        let order_a = Arc::clone(&order);
        let _sub_a = store.subscribe(Arc::new(move |_: &[Signal]| {
            order_a.lock().unwrap().push("a");
        }));
        let order_b = Arc::clone(&order);
        let _sub_b = store.subscribe(Arc::new(move |_: &[Signal]| {
            order_b.lock().unwrap().push("b");
        }));

        store.add_batch(vec![signal(1, 10.0)]);
        assert_eq!(*order.lock().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn dropped_subscription_stops_callbacks() {
        let store = store(10);
        let seen: Arc<Mutex<usize>> = Arc::new(Mutex::new(0));
        let seen_cb = Arc::clone(&seen);
        let sub = store.subscribe(Arc::new(move |_: &[Signal]| {
            *seen_cb.lock().unwrap() += 1;
        }));

        store.add_batch(vec![signal(1, 10.0)]);
        drop(sub);
        store.add_batch(vec![signal(2, 10.0)]);
        assert_eq!(*seen.lock().unwrap(), 1);
    }

    #[test]
    fn clear_empties_and_notifies() {
        let store = store(10);
        store.add_batch(vec![signal(1, 10.0)]);

        let seen: Arc<Mutex<Vec<usize>>> = Arc::new(Mutex::new(Vec::new()));
        let seen_cb = Arc::clone(&seen);
        let _sub = store.subscribe(Arc::new(move |snapshot: &[Signal]| {
            seen_cb.lock().unwrap().push(snapshot.len());
        }));

        store.clear();
        assert!(store.is_empty());
        assert_eq!(*seen.lock().unwrap(), vec![0]);
    }

    #[test]
    fn empty_batch_is_a_no_op() {
        let store = store(10);
        let seen: Arc<Mutex<usize>> = Arc::new(Mutex::new(0));
        let seen_cb = Arc::clone(&seen);
        let _sub = store.subscribe(Arc::new(move |_: &[Signal]| {
            *seen_cb.lock().unwrap() += 1;
        }));
        store.add_batch(Vec::new());
        assert_eq!(*seen.lock().unwrap(), 0);
    }

    #[test]
    fn subscriber_may_reenter_the_store() {
        let store = store(10);
        let store_cb = Arc::clone(&store);
        let observed: Arc<Mutex<usize>> = Arc::new(Mutex::new(0));
        let observed_cb = Arc::clone(&observed);
        let _sub = store.subscribe(Arc::new(move |_: &[Signal]| {
            // Reading back through the store must not deadlock.
            *observed_cb.lock().unwrap() = store_cb.len();
        }));
        store.add_batch(vec![signal(1, 10.0)]);
        assert_eq!(*observed.lock().unwrap(), 1);
    }

    #[test]
    fn acknowledge_flips_flag() {
        let store = store(10);
        store.add_batch(vec![signal(1, 10.0)]);
        assert!(store.acknowledge(SignalId(1)));
        assert!(store.snapshot()[0].acknowledged);
        assert!(!store.acknowledge(SignalId(99)));
    }

    #[test]
    fn strong_signals_fan_out_to_toasts() {
        let store = store(10);
        store.add_batch(vec![signal(1, 49.9), signal(2, 50.0), signal(3, 85.0)]);
        let toast_ids: Vec<u64> = store.toasts().active().iter().map(|s| s.id.0).collect();
        assert_eq!(toast_ids, vec![3, 2]);
    }
}
