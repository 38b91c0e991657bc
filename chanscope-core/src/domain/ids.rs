//! Identifier types.
//!
//! - `BiId`, `ZhongshuId`, `ThirdBuyId`: dense, 0-based, per-run sequential ids
//!   assigned in emission order by the pipeline stages.
//! - `SignalId`: process-unique sequential id handed out by `SignalIdGen`,
//!   which is safe to share across concurrent analysis runs.
//! - `SnapshotHash`: BLAKE3 content hash with hex serde, used for the
//!   determinism fingerprint of structural output.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

macro_rules! seq_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

seq_id!(BiId);
seq_id!(ZhongshuId);
seq_id!(ThirdBuyId);
seq_id!(SignalId);

/// Monotonic signal-id source shared by concurrent runs.
#[derive(Debug, Default)]
pub struct SignalIdGen {
    next: AtomicU64,
}

impl SignalIdGen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> SignalId {
        SignalId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

/// 32-byte BLAKE3 hash wrapper with hex display and serde as hex string.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SnapshotHash(pub [u8; 32]);

impl SnapshotHash {
    pub fn from_bytes(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    pub fn as_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Debug for SnapshotHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SnapshotHash({})", &self.as_hex()[..16])
    }
}

impl fmt::Display for SnapshotHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_hex())
    }
}

impl Serialize for SnapshotHash {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.as_hex())
    }
}

impl<'de> Deserialize<'de> for SnapshotHash {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(d)?;
        if hex.len() != 64 {
            return Err(serde::de::Error::custom("expected 64 hex chars"));
        }
        let bytes: Vec<u8> = (0..hex.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&hex[i..i + 2], 16))
            .collect::<Result<_, _>>()
            .map_err(serde::de::Error::custom)?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("expected 32 bytes"))?;
        Ok(Self(arr))
    }
}
