//! Third-buy detection — breakout, pullback, confirmation above a zhongshu.
//!
//! For each zhongshu: the first up bi after its membership that clears the
//! zhongshu high by an ATR-scaled margin is the breakout. A following down bi
//! whose end holds above (high - tolerance) is the pullback; dipping back
//! inside discards the setup entirely. A further up bi confirms per the
//! configured rule. A confirmed setup keeps its candidate sibling in the
//! result set, under a distinct id.

use serde::{Deserialize, Serialize};

use super::bi::{avg_atr, Bi, BiDirection};
use super::params::{ChanlunParams, ConfirmRule};
use super::zhongshu::Zhongshu;
use crate::domain::{Market, ThirdBuyId, Timeframe, ZhongshuId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThirdBuyStatus {
    Candidate,
    Confirmed,
}

/// A third-buy setup anchored to a zhongshu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThirdBuySignal {
    pub id: ThirdBuyId,
    pub zhongshu_id: ZhongshuId,
    pub status: ThirdBuyStatus,
    pub breakout_time: i64,
    pub breakout_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pullback_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pullback_low: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirm_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirm_price: Option<f64>,
    pub symbol: String,
    pub timeframe: Timeframe,
    pub market: Market,
}

/// Detect third-buy setups for every zhongshu.
pub fn detect(
    zhongshus: &[Zhongshu],
    bis: &[Bi],
    atr: &[f64],
    params: &ChanlunParams,
    symbol: &str,
    market: Market,
    timeframe: Timeframe,
) -> Vec<ThirdBuySignal> {
    let mut out: Vec<ThirdBuySignal> = Vec::new();

    let base = |zhongshu_id: ZhongshuId, b_out: &Bi| ThirdBuySignal {
        id: ThirdBuyId(0),
        zhongshu_id,
        status: ThirdBuyStatus::Candidate,
        breakout_time: b_out.end.time,
        breakout_price: b_out.end.price,
        pullback_time: None,
        pullback_low: None,
        confirm_time: None,
        confirm_price: None,
        symbol: symbol.to_string(),
        timeframe,
        market,
    };

    for z in zhongshus {
        let last_member = match z.bi_ids.last() {
            Some(&id) => id,
            None => continue,
        };

        // Breakout: first up bi after membership clearing the high by margin.
        let b_out_pos = bis.iter().position(|b| {
            b.id > last_member
                && b.direction == BiDirection::Up
                && b.end.price > z.high
                && b.end.price - z.high
                    >= params.breakout_atr * avg_atr(atr, b.start.index, b.end.index)
        });
        let b_out_pos = match b_out_pos {
            Some(pos) => pos,
            None => continue,
        };
        let b_out = &bis[b_out_pos];

        // No bi after the breakout yet: candidate on breakout alone.
        let b_back = match bis.get(b_out_pos + 1) {
            Some(b) => b,
            None => {
                let mut sig = base(z.id, b_out);
                sig.id = ThirdBuyId(out.len() as u64);
                out.push(sig);
                continue;
            }
        };
        if b_back.direction != BiDirection::Down {
            let mut sig = base(z.id, b_out);
            sig.id = ThirdBuyId(out.len() as u64);
            out.push(sig);
            continue;
        }

        // Pullback must hold above the zhongshu high, less tolerance.
        let pullback_low = b_back.end.price;
        let tolerance =
            params.pullback_tolerance_atr * avg_atr(atr, b_back.start.index, b_back.end.index);
        if pullback_low < z.high - tolerance {
            continue;
        }

        let mut candidate = base(z.id, b_out);
        candidate.pullback_time = Some(b_back.end.time);
        candidate.pullback_low = Some(pullback_low);

        let confirmed = bis
            .get(b_out_pos + 2)
            .filter(|b| b.direction == BiDirection::Up)
            .filter(|b_conf| match params.confirm_rule {
                ConfirmRule::NewHigh => b_conf.end.price > b_out.end.price,
                ConfirmRule::BreakPullbackHigh => b_conf.end.price > b_back.start.price,
            });

        candidate.id = ThirdBuyId(out.len() as u64);
        out.push(candidate.clone());

        if let Some(b_conf) = confirmed {
            let mut sig = candidate;
            sig.id = ThirdBuyId(out.len() as u64);
            sig.status = ThirdBuyStatus::Confirmed;
            sig.confirm_time = Some(b_conf.end.time);
            sig.confirm_price = Some(b_conf.end.price);
            out.push(sig);
        }
    }

    out
}
