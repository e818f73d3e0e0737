//! Bounded pool of reusable string buffers.
//!
//! CSS builders and the HTML renderer allocate many short-lived strings per
//! update. Buffers are returned with [`free_string_builder`] and handed out
//! again by [`alloc_string_builder`]. Buffers above the pool capacity, or ones
//! that grew too large, are dropped.

use once_cell::sync::Lazy;
use parking_lot::Mutex;

/// Maximum number of idle buffers kept.
pub const POOL_CAPACITY: usize = 32;

/// Buffers whose capacity exceeds this are not retained.
const MAX_RETAINED_BYTES: usize = 64 * 1024;

const INITIAL_CAPACITY: usize = 256;

static POOL: Lazy<Mutex<Vec<String>>> = Lazy::new(|| Mutex::new(Vec::with_capacity(POOL_CAPACITY)));

/// Take an empty buffer from the pool, or allocate a new one.
pub fn alloc_string_builder() -> String {
    POOL.lock()
        .pop()
        .unwrap_or_else(|| String::with_capacity(INITIAL_CAPACITY))
}

/// Return a buffer to the pool.
pub fn free_string_builder(mut buffer: String) {
    if buffer.capacity() > MAX_RETAINED_BYTES {
        return;
    }
    buffer.clear();
    let mut pool = POOL.lock();
    if pool.len() < POOL_CAPACITY {
        pool.push(buffer);
    }
}

/// Copy the buffer's contents out and return the buffer to the pool.
pub(crate) fn finish_string_builder(buffer: String) -> String {
    let result = buffer.as_str().to_owned();
    free_string_builder(buffer);
    result
}

/// Number of idle buffers (test helper).
#[cfg(test)]
fn idle_count() -> usize {
    POOL.lock().len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocated_buffer_is_empty() {
        let mut buffer = alloc_string_builder();
        buffer.push_str("hello");
        free_string_builder(buffer);
        let buffer = alloc_string_builder();
        assert!(buffer.is_empty());
        free_string_builder(buffer);
    }

    #[test]
    fn pool_is_bounded() {
        for _ in 0..POOL_CAPACITY * 2 {
            free_string_builder(String::with_capacity(8));
        }
        assert!(idle_count() <= POOL_CAPACITY);
    }

    #[test]
    fn oversized_buffers_are_dropped() {
        let before = idle_count();
        free_string_builder(String::with_capacity(MAX_RETAINED_BYTES * 2));
        assert!(idle_count() <= before.max(POOL_CAPACITY));
    }

    #[test]
    fn finish_returns_contents() {
        let mut buffer = alloc_string_builder();
        buffer.push_str("width: 10px;");
        assert_eq!(finish_string_builder(buffer), "width: 10px;");
    }
}
