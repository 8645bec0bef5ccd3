/* Instrumented element type for lifecycle and panic-safety checks.

Every `Tracked` construction and drop is recorded in a per-thread ledger, so
tests running in parallel do not see each other's counts. A clone can be
armed to panic on its k-th invocation to simulate a failing copy.
*/

use std::cell::RefCell;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Ledger {
    pub constructed: usize,
    pub dropped: usize,
    pub clones: usize,
    panic_on_clone: Option<usize>,
}

impl Ledger {
    pub fn live(&self) -> usize {
        self.constructed - self.dropped
    }
}

thread_local! {
    static LEDGER: RefCell<Ledger> = RefCell::new(Ledger::default());
}

pub mod ledger {
    use super::{Ledger, LEDGER};

    pub fn reset() {
        LEDGER.with(|ledger| *ledger.borrow_mut() = Ledger::default());
    }

    pub fn snapshot() -> Ledger {
        LEDGER.with(|ledger| *ledger.borrow())
    }

    /// The `k`-th clone from now (1-based) panics instead of constructing.
    pub fn panic_on_clone(k: usize) {
        assert!(k > 0, "clone countdown starts at 1");
        LEDGER.with(|ledger| {
            let mut ledger = ledger.borrow_mut();
            ledger.panic_on_clone = Some(ledger.clones + k);
        });
    }

    pub fn disarm() {
        LEDGER.with(|ledger| ledger.borrow_mut().panic_on_clone = None);
    }

    pub(crate) fn record_construction() {
        LEDGER.with(|ledger| ledger.borrow_mut().constructed += 1);
    }

    pub(crate) fn record_drop() {
        LEDGER.with(|ledger| ledger.borrow_mut().dropped += 1);
    }

    /// Counts a clone attempt; returns false when it must panic.
    pub(crate) fn record_clone() -> bool {
        LEDGER.with(|ledger| {
            let mut ledger = ledger.borrow_mut();
            ledger.clones += 1;
            if ledger.panic_on_clone == Some(ledger.clones) {
                ledger.panic_on_clone = None;
                return false;
            }
            ledger.constructed += 1;
            true
        })
    }
}

#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Tracked {
    value: i32,
}

impl Tracked {
    pub fn new(value: i32) -> Self {
        ledger::record_construction();
        Self { value }
    }

    pub fn value(&self) -> i32 {
        self.value
    }
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        if !ledger::record_clone() {
            panic!("injected clone failure for value {}", self.value);
        }
        Self { value: self.value }
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        ledger::record_drop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    #[test]
    fn test_counts_construction_and_drop() {
        ledger::reset();
        let a = Tracked::new(1);
        let b = a.clone();
        assert_eq!(ledger::snapshot().live(), 2);
        drop(a);
        drop(b);
        let ledger = ledger::snapshot();
        assert_eq!(ledger.constructed, 2);
        assert_eq!(ledger.dropped, 2);
        assert_eq!(ledger.clones, 1);
    }

    #[test]
    fn test_armed_clone_panics_once() {
        ledger::reset();
        let a = Tracked::new(7);
        ledger::panic_on_clone(2);
        let first = a.clone();
        let failed = catch_unwind(AssertUnwindSafe(|| a.clone()));
        assert!(failed.is_err());
        let third = a.clone();
        assert_eq!(third.value(), 7);
        drop((a, first, third));
        assert_eq!(ledger::snapshot().live(), 0);
    }
}
