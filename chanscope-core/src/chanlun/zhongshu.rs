//! Zhongshu detection — the central overlap of three consecutive bis.
//!
//! For each contiguous bi triple the candidate range is
//! [max of lows, min of highs]; a degenerate range is skipped. A triple whose
//! bis all come after the active zhongshu's membership and whose third bi
//! still intersects the active range extends it (membership and end time
//! only, never the range). Any other valid triple opens a new zhongshu and
//! deactivates the previous one.

use serde::{Deserialize, Serialize};

use super::bi::Bi;
use crate::domain::{BiId, ZhongshuId};

/// Central overlap region. `high`/`low` are fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zhongshu {
    pub id: ZhongshuId,
    pub high: f64,
    pub low: f64,
    pub start_time: i64,
    pub end_time: i64,
    pub bi_ids: Vec<BiId>,
    pub active: bool,
}

/// Detect zhongshus over the bi list.
pub fn detect(bis: &[Bi]) -> Vec<Zhongshu> {
    let mut out: Vec<Zhongshu> = Vec::new();
    if bis.len() < 3 {
        return out;
    }

    let mut active: Option<usize> = None;

    for triple in bis.windows(3) {
        let (a, b, c) = (&triple[0], &triple[1], &triple[2]);
        let z_high = a.range_high().min(b.range_high()).min(c.range_high());
        let z_low = a.range_low().max(b.range_low()).max(c.range_low());
        if z_high <= z_low {
            continue;
        }

        if let Some(idx) = active {
            let last_member = *out[idx].bi_ids.last().expect("zhongshu has members");
            if last_member < a.id && c.intersects(out[idx].low, out[idx].high) {
                out[idx].end_time = c.end.time;
                out[idx].bi_ids.push(c.id);
                continue;
            }
        }

        if let Some(idx) = active {
            out[idx].active = false;
        }
        out.push(Zhongshu {
            id: ZhongshuId(out.len() as u64),
            high: z_high,
            low: z_low,
            start_time: a.start.time,
            end_time: c.end.time,
            bi_ids: vec![a.id, b.id, c.id],
            active: true,
        });
        active = Some(out.len() - 1);
    }

    out
}
