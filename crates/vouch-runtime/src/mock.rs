//! Mock registration list
//!
//! Mocking libraries register a [`MockHandle`] whenever a test installs a
//! test double. After every executed test the suite executor restores and
//! forgets every registered handle, whether the test passed or not.
//!
//! The list is thread-local: suites run one at a time on the calling thread.
//! Running suites concurrently would need one list per suite.

use std::cell::RefCell;
use std::rc::Rc;

/// A test double that can put the original behaviour back
pub trait MockHandle {
    /// Undo the mock
    fn restore(&mut self);

    /// Short description for diagnostics
    fn describe(&self) -> String {
        "mock".to_string()
    }
}

thread_local! {
    static ACTIVE_MOCKS: RefCell<Vec<Box<dyn MockHandle>>> = RefCell::new(Vec::new());
}

/// Register a mock so it is restored after the current test
pub fn register(handle: impl MockHandle + 'static) {
    ACTIVE_MOCKS.with(|mocks| mocks.borrow_mut().push(Box::new(handle)));
}

/// Number of mocks awaiting restoration
pub fn active_count() -> usize {
    ACTIVE_MOCKS.with(|mocks| mocks.borrow().len())
}

/// Restore every registered mock, newest first, and clear the list
///
/// Returns how many handles were restored.
pub fn restore_all() -> usize {
    // Take the list out first so a restore() that registers again cannot
    // re-borrow it.
    let mut drained = ACTIVE_MOCKS.with(|mocks| std::mem::take(&mut *mocks.borrow_mut()));
    let count = drained.len();

    while let Some(mut handle) = drained.pop() {
        tracing::trace!(mock = %handle.describe(), "restoring mock");
        handle.restore();
    }

    count
}

/// Restores all mocks when dropped, so the drain also happens when a hook
/// error or panic unwinds out of the per-test cycle
pub(crate) struct RestoreOnDrop;

impl Drop for RestoreOnDrop {
    fn drop(&mut self) {
        restore_all();
    }
}

/// Replace the value in a shared slot for the duration of one test
///
/// The original value is put back by [`restore_all`].
pub fn replace<T: 'static>(slot: &Rc<RefCell<T>>, value: T) {
    let original = slot.replace(value);
    register(SlotMock {
        slot: Rc::clone(slot),
        original: Some(original),
    });
}

/// Handle created by [`replace`]
pub struct SlotMock<T> {
    slot: Rc<RefCell<T>>,
    original: Option<T>,
}

impl<T> MockHandle for SlotMock<T> {
    fn restore(&mut self) {
        if let Some(original) = self.original.take() {
            *self.slot.borrow_mut() = original;
        }
    }

    fn describe(&self) -> String {
        format!("slot of {}", std::any::type_name::<T>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recorder {
        id: u32,
        log: Rc<RefCell<Vec<u32>>>,
    }

    impl MockHandle for Recorder {
        fn restore(&mut self) {
            self.log.borrow_mut().push(self.id);
        }
    }

    #[test]
    fn test_restore_all_drains_newest_first() {
        let log = Rc::new(RefCell::new(Vec::new()));
        for id in 1..=3 {
            register(Recorder {
                id,
                log: Rc::clone(&log),
            });
        }
        assert_eq!(active_count(), 3);

        assert_eq!(restore_all(), 3);
        assert_eq!(active_count(), 0);
        assert_eq!(*log.borrow(), vec![3, 2, 1]);
    }

    #[test]
    fn test_replace_restores_original() {
        let slot = Rc::new(RefCell::new("real"));
        replace(&slot, "fake");
        replace(&slot, "faker");
        assert_eq!(*slot.borrow(), "faker");

        restore_all();
        assert_eq!(*slot.borrow(), "real");
    }

    #[test]
    fn test_restore_on_drop() {
        let slot = Rc::new(RefCell::new(1));
        {
            let _guard = RestoreOnDrop;
            replace(&slot, 2);
        }
        assert_eq!(*slot.borrow(), 1);
        assert_eq!(active_count(), 0);
    }
}
