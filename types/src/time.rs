//! The 6-byte milli-timestamp carried by commit records.
//!
//! Commit records truncate the Unix milli-epoch to 48 bits on the wire.
//! That is enough until roughly the year 10889; the decoder widens back to
//! a signed 64-bit value.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// A 48-bit big-endian Unix timestamp in milliseconds.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MilliTime([u8; 6]);

impl MilliTime {
    pub const ZERO: Self = Self([0u8; 6]);

    pub fn new(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    /// Truncates to the low 48 bits.
    pub fn from_millis(millis: u64) -> Self {
        let be = millis.to_be_bytes();
        let mut out = [0u8; 6];
        out.copy_from_slice(&be[2..]);
        Self(out)
    }

    /// Left-pads the 6 bytes with two zero bytes and reads the result as a
    /// big-endian unsigned integer. The value always fits in `i64`.
    pub fn as_millis(&self) -> i64 {
        let mut be = [0u8; 8];
        be[2..].copy_from_slice(&self.0);
        u64::from_be_bytes(be) as i64
    }

    pub fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }
}

impl fmt::Debug for MilliTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MilliTime({}ms)", self.as_millis())
    }
}

impl fmt::Display for MilliTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.as_millis())
    }
}

/// Wall-clock source for the commit codecs.
///
/// The election core never reads the clock; only commit construction does.
/// Injecting the source keeps record building deterministic under test.
pub trait Clock {
    fn now(&self) -> MilliTime;
}

/// System wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> MilliTime {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before Unix epoch")
            .as_millis() as u64;
        MilliTime::from_millis(millis)
    }
}
