//! # Single-Flight Memo Slots
//!
//! A slot is written at most once. Readers of a filled slot never lock.
//! Writers serialize on the slot's own guard and re-check after acquiring
//! it, so a value is computed at most once even under contention:
//!
//! ```text
//! get() -> hit? return
//! lock guard
//! get() -> hit? return          (another thread finished while we waited)
//! compute, set, unlock
//! ```
//!
//! Each slot owns its guard, so work on different keys never contends.

use parking_lot::Mutex;
use std::sync::OnceLock;

use crate::error::EngineResult;

/// A set-once value with a per-slot single-flight guard.
#[derive(Debug)]
pub(crate) struct MemoSlot<T> {
    value: OnceLock<T>,
    guard: Mutex<()>,
}

impl<T> Default for MemoSlot<T> {
    fn default() -> Self {
        Self {
            value: OnceLock::new(),
            guard: Mutex::new(()),
        }
    }
}

impl<T> MemoSlot<T> {
    /// Returns the stored value, computing it first if needed.
    ///
    /// Errors are returned to the caller and leave the slot empty.
    pub(crate) fn get_or_try_init(&self, init: impl FnOnce() -> EngineResult<T>) -> EngineResult<&T> {
        if let Some(value) = self.value.get() {
            return Ok(value);
        }

        let _guard = self.guard.lock();
        if let Some(value) = self.value.get() {
            return Ok(value);
        }

        let value = init()?;
        Ok(self.value.get_or_init(|| value))
    }

    /// Returns the stored value without computing anything.
    pub(crate) fn get(&self) -> Option<&T> {
        self.value.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_computes_once() {
        let slot = MemoSlot::default();
        let calls = AtomicUsize::new(0);
        for _ in 0..3 {
            let value = slot
                .get_or_try_init(|| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(42)
                })
                .unwrap();
            assert_eq!(*value, 42);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_error_leaves_slot_empty() {
        let slot: MemoSlot<u32> = MemoSlot::default();
        let result = slot.get_or_try_init(|| Err(EngineError::malformed("boom")));
        assert!(result.is_err());
        assert!(slot.get().is_none());
        assert_eq!(*slot.get_or_try_init(|| Ok(7)).unwrap(), 7);
    }

    #[test]
    fn test_concurrent_single_flight() {
        let slot = Arc::new(MemoSlot::default());
        let calls = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let slot = Arc::clone(&slot);
                let calls = Arc::clone(&calls);
                thread::spawn(move || {
                    *slot
                        .get_or_try_init(|| {
                            calls.fetch_add(1, Ordering::SeqCst);
                            thread::sleep(std::time::Duration::from_millis(20));
                            Ok(9_u64)
                        })
                        .unwrap()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 9);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
