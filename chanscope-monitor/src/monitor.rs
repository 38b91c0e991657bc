//! Analysis orchestrator.
//!
//! One run: validate bars → compute indicators → Chanlun pipeline → signal
//! detectors (deduper-gated) → third-buy conversion (deduper-gated) → post
//! the batch to the store. The monitor keeps no per-run state; only the
//! deduper and the store persist across runs, and a failed or cancelled run
//! touches neither.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rayon::prelude::*;
use thiserror::Error;

use chanscope_core::chanlun::{self, ConfigError};
use chanscope_core::detectors::{standard_detectors, third_buy_detection, Detection};
use chanscope_core::domain::{validate_bars, Bar, BarError, Market, Signal, SignalIdGen, Timeframe};
use chanscope_core::indicators::IndicatorBundle;
use chanscope_core::snapshot::AnalysisSnapshot;

use crate::config::MonitorConfig;
use crate::dedup::SignalDeduper;
use crate::store::SignalStore;
use crate::toast::ToastRack;

/// Cooperative cancellation flag, checked between pipeline stages.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Everything one successful run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub snapshot: AnalysisSnapshot,
    pub signals: Vec<Signal>,
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    MalformedBar(#[from] BarError),

    #[error("run cancelled")]
    Cancelled,
}

/// One evaluation job for the batch scan.
#[derive(Debug, Clone)]
pub struct ScanJob {
    pub bars: Vec<Bar>,
    pub symbol: String,
    pub market: Market,
    pub timeframe: Timeframe,
}

pub struct Monitor {
    config: MonitorConfig,
    deduper: SignalDeduper,
    store: Arc<SignalStore>,
    ids: SignalIdGen,
}

impl Monitor {
    pub fn new(config: MonitorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let toasts = ToastRack::new(
            config.toast_capacity,
            Duration::from_millis(config.toast_lifetime_ms),
        );
        let store = Arc::new(SignalStore::new(config.store_capacity, toasts));
        let deduper = SignalDeduper::new(config.dedup_window_ms);
        Ok(Self {
            config,
            deduper,
            store,
            ids: SignalIdGen::new(),
        })
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<SignalStore> {
        &self.store
    }

    pub fn deduper(&self) -> &SignalDeduper {
        &self.deduper
    }

    /// Evaluate one (bars, symbol, market, timeframe) input at the current
    /// wall clock.
    pub fn run(
        &self,
        bars: &[Bar],
        symbol: &str,
        market: Market,
        timeframe: Timeframe,
    ) -> Result<RunOutcome, RunError> {
        self.run_inner(bars, symbol, market, timeframe, now_ms(), None)
    }

    /// Same as [`run`](Self::run) with an explicit wall clock, for replay.
    pub fn run_at(
        &self,
        bars: &[Bar],
        symbol: &str,
        market: Market,
        timeframe: Timeframe,
        now_ms: i64,
    ) -> Result<RunOutcome, RunError> {
        self.run_inner(bars, symbol, market, timeframe, now_ms, None)
    }

    /// Cancellable variant; the token is checked between stages and an
    /// aborted run posts nothing.
    pub fn run_cancellable(
        &self,
        bars: &[Bar],
        symbol: &str,
        market: Market,
        timeframe: Timeframe,
        cancel: &CancelToken,
    ) -> Result<RunOutcome, RunError> {
        self.run_inner(bars, symbol, market, timeframe, now_ms(), Some(cancel))
    }

    /// Evaluate many jobs in parallel. Results share this monitor's deduper
    /// and store; each job is independently validated.
    pub fn scan(&self, jobs: &[ScanJob]) -> Vec<Result<RunOutcome, RunError>> {
        jobs.par_iter()
            .map(|job| self.run(&job.bars, &job.symbol, job.market, job.timeframe))
            .collect()
    }

    fn run_inner(
        &self,
        bars: &[Bar],
        symbol: &str,
        market: Market,
        timeframe: Timeframe,
        now_ms: i64,
        cancel: Option<&CancelToken>,
    ) -> Result<RunOutcome, RunError> {
        let span = tracing::debug_span!("analysis_run", symbol, %market, %timeframe);
        let _guard = span.enter();

        validate_bars(bars)?;
        check_cancel(cancel)?;

        let indicators = IndicatorBundle::compute(bars);
        check_cancel(cancel)?;

        let params = self.config.params_for(market);
        let chanlun_result =
            chanlun::analyze(bars, &indicators.atr, symbol, market, timeframe, &params);
        check_cancel(cancel)?;

        let mut signals = Vec::new();
        for detector in standard_detectors() {
            if let Some(detection) = detector.detect(bars, &indicators, timeframe) {
                self.gate_and_collect(&mut signals, detection, symbol, market, timeframe, now_ms);
            }
        }
        for third_buy in &chanlun_result.third_buys {
            let detection = third_buy_detection(third_buy, &chanlun_result.zhongshus);
            self.gate_and_collect(&mut signals, detection, symbol, market, timeframe, now_ms);
        }

        tracing::info!(
            symbol,
            %timeframe,
            emitted = signals.len(),
            third_buys = chanlun_result.third_buys.len(),
            "analysis complete"
        );

        let snapshot = AnalysisSnapshot::from_result(symbol, market, timeframe, chanlun_result);
        self.store.add_batch(signals.clone());

        Ok(RunOutcome { snapshot, signals })
    }

    fn gate_and_collect(
        &self,
        signals: &mut Vec<Signal>,
        detection: Detection,
        symbol: &str,
        market: Market,
        timeframe: Timeframe,
        now_ms: i64,
    ) {
        if !self
            .deduper
            .try_emit(symbol, timeframe, detection.kind, now_ms)
        {
            return;
        }
        signals.push(Signal {
            id: self.ids.next_id(),
            symbol: symbol.to_string(),
            market,
            timeframe,
            kind: detection.kind,
            strength: detection.strength,
            price: detection.price,
            time: now_ms,
            description: detection.description,
            key_levels: detection.key_levels,
            acknowledged: false,
        });
    }
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

fn check_cancel(cancel: Option<&CancelToken>) -> Result<(), RunError> {
    match cancel {
        Some(token) if token.is_cancelled() => Err(RunError::Cancelled),
        _ => Ok(()),
    }
}
