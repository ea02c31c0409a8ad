use std::fmt::{self, Debug};
use std::sync::Arc;

use tracing::trace;

use crate::{Error, Result, Slot};

/// A counted borrow of the value of an [`OwnedPtr`][crate::OwnedPtr].
///
/// While a handle is live the owner cannot release the value. A handle stops being live when
/// it is [released][Self::release] or dropped. It becomes invalid, but stays counted until it
/// is released or dropped, if the owner is dropped first.
pub struct HandlePtr<T> {
    slot: Option<Arc<Slot<T>>>,
}

impl<T> HandlePtr<T> {
    pub(crate) fn new(slot: Arc<Slot<T>>) -> Self {
        Self { slot: Some(slot) }
    }

    /// Whether the handle has not been released and its owner still holds the value.
    #[must_use]
    pub fn is_good(&self) -> bool {
        self.slot.as_ref().is_some_and(|slot| slot.is_live())
    }

    /// Gives up this handle, allowing the owner to release the value once no other handles
    /// remain.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReleasedInvalidHandle`] if the handle was already released or the
    /// owner no longer holds the value.
    pub fn release(&mut self) -> Result<()> {
        if !self.is_good() {
            return Err(Error::ReleasedInvalidHandle);
        }

        if let Some(slot) = self.slot.take() {
            let count = slot.remove_handle();
            trace!(count, "handle released");
        }

        Ok(())
    }

    /// Calls `f` with shared access to the value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHandle`] if the handle was released or the owner no longer
    /// holds the value.
    pub fn with<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&T) -> R,
    {
        self.slot
            .as_ref()
            .and_then(|slot| slot.with(f))
            .ok_or(Error::InvalidHandle)
    }

    /// Calls `f` with exclusive access to the value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHandle`] if the handle was released or the owner no longer
    /// holds the value.
    pub fn with_mut<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        self.slot
            .as_ref()
            .and_then(|slot| slot.with_mut(f))
            .ok_or(Error::InvalidHandle)
    }
}

impl<T> Clone for HandlePtr<T> {
    fn clone(&self) -> Self {
        match &self.slot {
            Some(slot) => {
                let count = slot.add_handle();
                trace!(count, "handle cloned");

                Self::new(Arc::clone(slot))
            }
            None => Self { slot: None },
        }
    }
}

impl<T> Drop for HandlePtr<T> {
    fn drop(&mut self) {
        if let Some(slot) = self.slot.take() {
            let count = slot.remove_handle();
            trace!(count, "handle dropped");
        }
    }
}

impl<T> Debug for HandlePtr<T> {
    #[cfg_attr(test, mutants::skip)] // No API contract to test.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlePtr")
            .field("is_good", &self.is_good())
            .finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use static_assertions::assert_impl_all;

    use super::*;
    use crate::OwnedPtr;

    assert_impl_all!(HandlePtr<u32>: Clone, Send, Sync);

    #[test]
    fn drop_decrements_count() {
        let owner = OwnedPtr::new(1);

        let handle = owner.handle().unwrap();
        let copy = handle.clone();
        assert_eq!(owner.handle_count(), 2);

        drop(handle);
        assert_eq!(owner.handle_count(), 1);

        drop(copy);
        assert_eq!(owner.handle_count(), 0);
    }

    #[test]
    fn released_handle_clones_into_released_handle() {
        let owner = OwnedPtr::new(1);
        let mut handle = owner.handle().unwrap();
        handle.release().unwrap();

        let copy = handle.clone();

        assert!(!copy.is_good());
        assert_eq!(owner.handle_count(), 0);
    }

    #[test]
    fn with_mut_is_visible_to_owner() {
        let owner = OwnedPtr::new(String::from("a"));
        let handle = owner.handle().unwrap();

        handle.with_mut(|s| s.push('b')).unwrap();

        assert_eq!(owner.with(String::clone).unwrap(), "ab");
    }

    #[test]
    fn release_after_owner_dropped_fails() {
        let owner = OwnedPtr::new(1);
        let mut handle = owner.handle().unwrap();
        drop(owner);

        assert_eq!(handle.release(), Err(Error::ReleasedInvalidHandle));
    }
}
