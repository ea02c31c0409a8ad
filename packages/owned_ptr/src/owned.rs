use std::fmt::{self, Debug};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use tracing::{debug, trace, warn};

use crate::{ERR_POISONED_LOCK, Error, HandlePtr, Result};

/// State shared by an owner and all of its handles.
pub(crate) struct Slot<T> {
    value: RwLock<Option<T>>,
    handles: AtomicUsize,
}

impl<T> Slot<T> {
    pub(crate) fn is_live(&self) -> bool {
        self.value.read().expect(ERR_POISONED_LOCK).is_some()
    }

    pub(crate) fn handle_count(&self) -> usize {
        self.handles.load(Ordering::Acquire)
    }

    pub(crate) fn add_handle(&self) -> usize {
        self.handles.fetch_add(1, Ordering::AcqRel).wrapping_add(1)
    }

    pub(crate) fn remove_handle(&self) -> usize {
        self.handles.fetch_sub(1, Ordering::AcqRel).wrapping_sub(1)
    }

    pub(crate) fn with<F, R>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&T) -> R,
    {
        self.value.read().expect(ERR_POISONED_LOCK).as_ref().map(f)
    }

    pub(crate) fn with_mut<F, R>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        self.value.write().expect(ERR_POISONED_LOCK).as_mut().map(f)
    }

    fn take(&self) -> Option<T> {
        self.value.write().expect(ERR_POISONED_LOCK).take()
    }
}

/// The single owner of a value that can hand out counted [`HandlePtr`]s to it.
///
/// # Thread safety
///
/// The owner and its handles are `Send` and `Sync` if `T` is. Handle counting is atomic and
/// access to the value is serialized by a reader-writer lock.
pub struct OwnedPtr<T> {
    slot: Arc<Slot<T>>,
}

impl<T> OwnedPtr<T> {
    /// Takes ownership of `value`. The new owner is valid and has no handles.
    #[must_use]
    pub fn new(value: T) -> Self {
        trace!("owned value created");

        Self {
            slot: Arc::new(Slot {
                value: RwLock::new(Some(value)),
                handles: AtomicUsize::new(0),
            }),
        }
    }

    /// Whether the owner still holds its value.
    #[must_use]
    pub fn is_good(&self) -> bool {
        self.slot.is_live()
    }

    /// Number of live handles to the value.
    #[must_use]
    pub fn handle_count(&self) -> usize {
        self.slot.handle_count()
    }

    /// Drops the value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReleasedInvalidOwned`] if the value was already released and
    /// [`Error::ReferencesStillExist`] if handles to the value are live. The value is kept in
    /// both cases.
    pub fn release(&mut self) -> Result<()> {
        let mut value = self.slot.value.write().expect(ERR_POISONED_LOCK);

        if value.is_none() {
            return Err(Error::ReleasedInvalidOwned);
        }

        // New handles are only created through `&self` or by cloning a live handle, so the
        // count cannot grow from zero while we hold `&mut self`.
        let count = self.slot.handle_count();
        if count > 0 {
            return Err(Error::ReferencesStillExist { count });
        }

        let released = value.take();
        drop(value);
        drop(released);

        debug!("owned value released");

        Ok(())
    }

    /// Creates a new handle to the value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOwned`] if the value was released.
    pub fn handle(&self) -> Result<HandlePtr<T>> {
        if !self.slot.is_live() {
            return Err(Error::InvalidOwned);
        }

        let count = self.slot.add_handle();
        trace!(count, "handle created");

        Ok(HandlePtr::new(Arc::clone(&self.slot)))
    }

    /// Calls `f` with shared access to the value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOwned`] if the value was released.
    pub fn with<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&T) -> R,
    {
        self.slot.with(f).ok_or(Error::InvalidOwned)
    }

    /// Calls `f` with exclusive access to the value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOwned`] if the value was released.
    pub fn with_mut<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        self.slot.with_mut(f).ok_or(Error::InvalidOwned)
    }
}

impl<T> Drop for OwnedPtr<T> {
    fn drop(&mut self) {
        let Some(value) = self.slot.take() else {
            return;
        };

        let count = self.slot.handle_count();
        if count > 0 {
            warn!(
                count,
                "owned value dropped while handles to it still exist; the handles are now invalid"
            );
        } else {
            trace!("owned value dropped");
        }

        drop(value);
    }
}

impl<T> Debug for OwnedPtr<T> {
    #[cfg_attr(test, mutants::skip)] // No API contract to test.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnedPtr")
            .field("is_good", &self.is_good())
            .field("handle_count", &self.handle_count())
            .finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;
    use std::thread;

    use static_assertions::{assert_impl_all, assert_not_impl_any};

    use super::*;

    assert_impl_all!(OwnedPtr<u32>: Send, Sync);
    assert_not_impl_any!(OwnedPtr<Rc<u32>>: Send, Sync);
    assert_not_impl_any!(OwnedPtr<u32>: Clone);
    assert_not_impl_any!(OwnedPtr<Cell<u32>>: Sync);

    #[test]
    fn with_mut_updates_value() {
        let owner = OwnedPtr::new(vec![1]);

        owner.with_mut(|v| v.push(2)).unwrap();

        assert_eq!(owner.with(Vec::len).unwrap(), 2);
    }

    #[test]
    fn handle_after_release_fails() {
        let mut owner = OwnedPtr::new(1);
        owner.release().unwrap();

        assert_eq!(owner.handle().err(), Some(Error::InvalidOwned));
    }

    #[test]
    fn failed_release_keeps_value() {
        let mut owner = OwnedPtr::new(5);
        let handle = owner.handle().unwrap();

        assert_eq!(
            owner.release(),
            Err(Error::ReferencesStillExist { count: 1 })
        );
        assert!(owner.is_good());
        assert_eq!(handle.with(|v| *v).unwrap(), 5);
    }

    #[test]
    fn drop_with_live_handles_invalidates_them() {
        let tracker = Rc::new(());
        let owner = OwnedPtr::new(Rc::clone(&tracker));
        let handle = owner.handle().unwrap();

        drop(owner);

        assert_eq!(Rc::strong_count(&tracker), 1);
        assert!(!handle.is_good());
        assert_eq!(handle.with(|_| ()).err(), Some(Error::InvalidHandle));
    }

    #[test]
    fn handles_counted_across_threads() {
        let owner = OwnedPtr::new(7_u64);

        thread::scope(|s| {
            for _ in 0..4 {
                let handle = owner.handle().unwrap();

                s.spawn(move || {
                    let copies: Vec<_> = (0..10).map(|_| handle.clone()).collect();
                    assert!(copies.iter().all(HandlePtr::is_good));
                    assert_eq!(handle.with(|v| *v).unwrap(), 7);
                });
            }
        });

        assert_eq!(owner.handle_count(), 0);
    }

    #[test]
    fn debug_reports_state() {
        let owner = OwnedPtr::new(1);
        let _handle = owner.handle().unwrap();

        let output = format!("{owner:?}");

        assert!(output.contains("is_good: true"));
        assert!(output.contains("handle_count: 1"));
    }
}
