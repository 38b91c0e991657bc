//! Orchestrator integration tests: dedup across runs, failure isolation,
//! toast routing, batch scan, cancellation.

use std::sync::{Arc, Mutex};

use chanscope_core::domain::{Bar, Market, Signal, SignalKind, Timeframe};
use chanscope_monitor::{CancelToken, Monitor, MonitorConfig, RunError, ScanJob};

const T0: i64 = 1_700_000_000_000;

/// 24 flat bars then a wide breakout bar: fires the Bollinger breakout,
/// large-body candle, and key-level breakout detectors in one run.
fn breakout_bars() -> Vec<Bar> {
    let mut bars: Vec<Bar> = (0..24)
        .map(|i| Bar {
            time: 1_700_000_000 + i * 3600,
            open: 100.0,
            high: 101.0,
            low: 99.0,
            close: 100.0,
            volume: Some(1_000.0),
        })
        .collect();
    bars.push(Bar {
        time: 1_700_000_000 + 24 * 3600,
        open: 100.0,
        high: 106.0,
        low: 99.0,
        close: 105.0,
        volume: Some(5_000.0),
    });
    bars
}

fn monitor() -> Monitor {
    Monitor::new(MonitorConfig::default()).unwrap()
}

fn kinds(signals: &[Signal]) -> Vec<SignalKind> {
    signals.iter().map(|s| s.kind).collect()
}

#[test]
fn breakout_run_emits_three_signals() {
    let monitor = monitor();
    let outcome = monitor
        .run_at(&breakout_bars(), "BTCUSDT", Market::Crypto, Timeframe::H1, T0)
        .unwrap();

    assert_eq!(
        kinds(&outcome.signals),
        vec![
            SignalKind::BollingerBreakoutUp,
            SignalKind::LargeBodyCandle,
            SignalKind::KeyLevelBreakout,
        ]
    );
    // 40 + 15 * 1.5 / 20 + 10 * 1.5 / 45 + 15 * 1.5
    let strengths: Vec<f64> = outcome.signals.iter().map(|s| s.strength).collect();
    assert_eq!(strengths, vec![62.5, 35.0, 67.5]);
    for signal in &outcome.signals {
        assert_eq!(signal.time, T0);
        assert_eq!(signal.symbol, "BTCUSDT");
        assert_eq!(signal.price, 105.0);
    }
    assert_eq!(monitor.store().len(), 3);
}

#[test]
fn rerun_within_window_is_absorbed_by_the_deduper() {
    let monitor = monitor();
    let bars = breakout_bars();

    let first = monitor
        .run_at(&bars, "BTCUSDT", Market::Crypto, Timeframe::H1, T0)
        .unwrap();
    assert_eq!(first.signals.len(), 3);

    // Same detections one minute later: all suppressed.
    let second = monitor
        .run_at(&bars, "BTCUSDT", Market::Crypto, Timeframe::H1, T0 + 60_000)
        .unwrap();
    assert!(second.signals.is_empty());
    assert_eq!(monitor.store().len(), 3);

    // Past the window they emit again.
    let third = monitor
        .run_at(&bars, "BTCUSDT", Market::Crypto, Timeframe::H1, T0 + 300_000)
        .unwrap();
    assert_eq!(third.signals.len(), 3);
    assert_eq!(monitor.store().len(), 6);
}

#[test]
fn structural_output_is_identical_across_reruns() {
    let monitor = monitor();
    let bars = breakout_bars();
    let a = monitor
        .run_at(&bars, "BTCUSDT", Market::Crypto, Timeframe::H1, T0)
        .unwrap();
    let b = monitor
        .run_at(&bars, "BTCUSDT", Market::Crypto, Timeframe::H1, T0 + 60_000)
        .unwrap();
    assert_eq!(a.snapshot.fingerprint(), b.snapshot.fingerprint());
}

#[test]
fn different_symbols_do_not_share_windows() {
    let monitor = monitor();
    let bars = breakout_bars();
    monitor
        .run_at(&bars, "BTCUSDT", Market::Crypto, Timeframe::H1, T0)
        .unwrap();
    let other = monitor
        .run_at(&bars, "ETHUSDT", Market::Crypto, Timeframe::H1, T0)
        .unwrap();
    assert_eq!(other.signals.len(), 3);
}

#[test]
fn malformed_bars_leave_store_and_deduper_untouched() {
    let monitor = monitor();
    let mut bars = breakout_bars();
    bars[10].high = 90.0; // below low

    let err = monitor
        .run_at(&bars, "BTCUSDT", Market::Crypto, Timeframe::H1, T0)
        .unwrap_err();
    assert!(matches!(err, RunError::MalformedBar(_)));
    assert!(monitor.store().is_empty());

    // The deduper saw nothing: a valid run still emits.
    let outcome = monitor
        .run_at(&breakout_bars(), "BTCUSDT", Market::Crypto, Timeframe::H1, T0)
        .unwrap();
    assert_eq!(outcome.signals.len(), 3);
}

#[test]
fn invalid_config_is_rejected_at_construction() {
    let mut config = MonitorConfig::default();
    config.store_capacity = 0;
    assert!(Monitor::new(config).is_err());
}

#[test]
fn cancelled_run_posts_nothing() {
    let monitor = monitor();
    let token = CancelToken::new();
    token.cancel();

    let err = monitor
        .run_cancellable(
            &breakout_bars(),
            "BTCUSDT",
            Market::Crypto,
            Timeframe::H1,
            &token,
        )
        .unwrap_err();
    assert!(matches!(err, RunError::Cancelled));
    assert!(monitor.store().is_empty());
}

#[test]
fn strong_signals_reach_the_toast_rack() {
    let monitor = monitor();
    monitor
        .run_at(&breakout_bars(), "BTCUSDT", Market::Crypto, Timeframe::H1, T0)
        .unwrap();

    // Only the two signals at strength >= 50 fan out, newest first.
    let toasts = monitor.store().toasts().active();
    assert_eq!(
        toasts.iter().map(|s| s.kind).collect::<Vec<_>>(),
        vec![SignalKind::KeyLevelBreakout, SignalKind::BollingerBreakoutUp]
    );
}

#[test]
fn subscribers_observe_the_run() {
    let monitor = monitor();
    let seen: Arc<Mutex<Vec<usize>>> = Arc::new(Mutex::new(Vec::new()));
    let seen_cb = Arc::clone(&seen);
    let _sub = monitor.store().subscribe(Arc::new(move |snapshot: &[Signal]| {
        seen_cb.lock().unwrap().push(snapshot.len());
    }));

    monitor
        .run_at(&breakout_bars(), "BTCUSDT", Market::Crypto, Timeframe::H1, T0)
        .unwrap();
    assert_eq!(*seen.lock().unwrap(), vec![3]);
}

#[test]
fn scan_evaluates_jobs_in_parallel_against_one_store() {
    let monitor = monitor();
    let jobs: Vec<ScanJob> = ["BTCUSDT", "ETHUSDT", "SOLUSDT"]
        .iter()
        .map(|symbol| ScanJob {
            bars: breakout_bars(),
            symbol: symbol.to_string(),
            market: Market::Crypto,
            timeframe: Timeframe::H1,
        })
        .collect();

    let results = monitor.scan(&jobs);
    assert_eq!(results.len(), 3);
    for result in &results {
        assert_eq!(result.as_ref().unwrap().signals.len(), 3);
    }
    assert_eq!(monitor.store().len(), 9);

    // Signal ids are unique across concurrent runs.
    let mut ids: Vec<u64> = monitor.store().snapshot().iter().map(|s| s.id.0).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 9);
}

#[test]
fn stored_signals_serialize_to_a_stable_json_shape() {
    let monitor = monitor();
    monitor
        .run_at(&breakout_bars(), "BTCUSDT", Market::Crypto, Timeframe::H1, T0)
        .unwrap();

    let json = serde_json::to_string(&monitor.store().snapshot()).unwrap();
    assert!(json.contains("\"kind\":\"key_level_breakout\""));
    assert!(json.contains("\"timeframe\":\"1H\""));
    assert!(json.contains("\"market\":\"crypto\""));
    assert!(json.contains(&format!("\"time\":{T0}")));
}

#[test]
fn short_history_yields_an_empty_run() {
    let monitor = monitor();
    let bars: Vec<Bar> = breakout_bars().into_iter().take(4).collect();
    let outcome = monitor
        .run_at(&bars, "BTCUSDT", Market::Crypto, Timeframe::H1, T0)
        .unwrap();
    assert!(outcome.signals.is_empty());
    assert!(outcome.snapshot.bis.is_empty());
    assert!(monitor.store().is_empty());
}
