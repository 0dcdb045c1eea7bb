//! Timestamp-based identifiers for nodes and stored trees.
//!
//! Ids are built from a compact UTC timestamp (`YYYYMMDDhhmmssSSS`) so they
//! sort by creation time. Node ids add a six digit suffix mixed from the
//! sub-millisecond clock and a per-generator counter; callers re-draw on the
//! rare collision with an existing id.

use super::node::NodeId;
use chrono::{DateTime, Utc};

/// Compact timestamp used in generated ids and tree keys.
#[must_use]
pub fn flat_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y%m%d%H%M%S%3f").to_string()
}

/// Generates node ids of the form `<flat timestamp>_<6 digits>`.
#[derive(Debug, Default, Clone)]
pub struct IdGenerator {
    counter: u64,
}

impl IdGenerator {
    /// Creates a generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { counter: 0 }
    }

    /// Returns a fresh id for which `taken` is false.
    pub fn next_id(&mut self, taken: impl Fn(&NodeId) -> bool) -> NodeId {
        loop {
            let now = Utc::now();
            self.counter = self.counter.wrapping_add(1);
            let mixed = u64::from(now.timestamp_subsec_nanos())
                .wrapping_mul(2_654_435_761)
                .wrapping_add(self.counter.wrapping_mul(7_919));
            let candidate = NodeId::new(format!("{}_{:06}", flat_timestamp(now), mixed % 1_000_000));
            if !taken(&candidate) {
                return candidate;
            }
            tracing::trace!(candidate = %candidate, "generated id already taken, retrying");
        }
    }
}
