// Entity ID Generator - Snowflake-like IDs with embedded node information
// 64-bit ID format: [timestamp:41][node_id:10][sequence:12], sign bit left clear

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::core::strong_types::EntityId;

const NODE_BITS: u64 = 10;
const SEQUENCE_BITS: u64 = 12;
const MAX_NODE_ID: u16 = (1 << NODE_BITS) - 1;
const SEQUENCE_MASK: u64 = (1 << SEQUENCE_BITS) - 1;
const TIMESTAMP_MASK: u64 = (1 << 41) - 1;

/// Time-ordered ID generator.
///
/// Timestamp and sequence share one atomic word so concurrent callers never
/// observe the same (timestamp, sequence) pair.
#[derive(Debug)]
pub struct IdGenerator {
    node_id: u16,
    // [timestamp_millis << 12 | sequence] of the last issued ID
    state: AtomicU64,
}

impl IdGenerator {
    /// Create new ID generator for the given node. Node IDs wrap at 1024.
    pub fn new(node_id: u16) -> Self {
        Self {
            node_id: node_id & MAX_NODE_ID,
            state: AtomicU64::new(0),
        }
    }

    fn now_millis() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default()
            & TIMESTAMP_MASK
    }

    /// Generate next unique ID
    pub fn next_id(&self) -> EntityId {
        let mut current = self.state.load(Ordering::Acquire);
        loop {
            let last_ts = current >> SEQUENCE_BITS;
            let last_seq = current & SEQUENCE_MASK;
            let now = Self::now_millis();

            let (ts, seq) = if now > last_ts {
                (now, 0)
            } else if last_seq < SEQUENCE_MASK {
                // Same millisecond (or clock went backwards) - bump sequence
                (last_ts, last_seq + 1)
            } else {
                // Sequence exhausted - borrow the next millisecond
                (last_ts + 1, 0)
            };

            let next = (ts << SEQUENCE_BITS) | seq;
            match self
                .state
                .compare_exchange_weak(current, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => {
                    let id = (ts << (NODE_BITS + SEQUENCE_BITS))
                        | ((self.node_id as u64) << SEQUENCE_BITS)
                        | seq;
                    return EntityId::new(id as i64);
                }
                Err(observed) => current = observed,
            }
        }
    }

    /// Extract node ID from an entity ID
    pub fn extract_node_id(id: EntityId) -> u16 {
        ((id.value() as u64 >> SEQUENCE_BITS) & MAX_NODE_ID as u64) as u16
    }

    /// Extract timestamp (millis since epoch) from an entity ID
    pub fn extract_timestamp(id: EntityId) -> u64 {
        id.value() as u64 >> (NODE_BITS + SEQUENCE_BITS)
    }

    pub fn node_id(&self) -> u16 {
        self.node_id
    }
}
