//! Order-number generation for orders created without a client-supplied
//! number.
//!
//! Format: `PO-<UTC %Y%m%d%H%M%S>-<4 hex chars>`. The timestamp keeps the
//! value human-sortable; the suffix comes from a randomly seeded wrapping
//! counter, so creations within the same second stay distinct in-process and
//! restarts land on an unrelated suffix range. A residual collision is still
//! caught by the unique index on `order_number` and surfaced as a conflict.

use chrono::Utc;
use rand::Rng;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;

fn counter() -> &'static AtomicU32 {
    static COUNTER: OnceLock<AtomicU32> = OnceLock::new();
    COUNTER.get_or_init(|| AtomicU32::new(rand::thread_rng().gen()))
}

pub fn generate() -> String {
    let stamp = Utc::now().format("%Y%m%d%H%M%S");
    let suffix = counter().fetch_add(1, Ordering::Relaxed) & 0xffff;
    format!("PO-{stamp}-{suffix:04x}")
}
