use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Once;

use ring_buffer::RingBuffer;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::instrumented::Tracked;

static TRACING: Once = Once::new();

/// Installs a test-writer subscriber once per process. Set `RUST_LOG=trace`
/// to see growth events.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Runs `op` and reports whether it panicked.
pub fn panics<F: FnOnce()>(op: F) -> bool {
    catch_unwind(AssertUnwindSafe(op)).is_err()
}

pub fn values(buffer: &RingBuffer<Tracked>) -> Vec<i32> {
    buffer.iter().map(Tracked::value).collect()
}

pub fn tracked(values: impl IntoIterator<Item = i32>) -> RingBuffer<Tracked> {
    values.into_iter().map(Tracked::new).collect()
}

/// A buffer holding `values`, with room for `spare` more elements before it
/// grows. With three or more values the contents wrap around the end of the
/// block.
pub fn wrapped_tracked(values: &[i32], spare: usize) -> RingBuffer<Tracked> {
    let mut buffer = RingBuffer::with_capacity(values.len() + spare);
    let shift = values.len() + spare - values.len() / 2;
    for _ in 0..shift {
        buffer.push_back(Tracked::new(-1));
    }
    for _ in 0..shift {
        buffer.pop_front();
    }
    for &value in values {
        buffer.push_back(Tracked::new(value));
    }
    buffer
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub seq: u64,
    pub label: String,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct SampleHistory {
    pub source: String,
    pub samples: RingBuffer<Sample>,
}
