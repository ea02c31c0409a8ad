//! Ownership policies that decide how a [`OneOf`][crate::OneOf] holds its value.
//!
//! A policy is selected through the second type parameter of [`OneOf`][crate::OneOf]
//! and is fixed for the lifetime of that type:
//!
//! | Policy | `Clone` of the variant | Backing storage |
//! |---|---|---|
//! | [`Exclusive`] (default) | not available | `Box<E>` |
//! | [`Shared`] | another handle to the same value | `Arc<RwLock<E>>` |
//! | [`Cloned`] | deep copy of the value (requires `E: Clone`) | `Box<E>` |

use std::fmt::{self, Debug};
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::ERR_POISONED_LOCK;

mod sealed {
    #[allow(unnameable_types, reason = "sealed trait pattern")]
    pub trait Sealed {}
}

/// Selects the storage strategy used by a [`OneOf`][crate::OneOf].
///
/// This trait is sealed. The available policies are [`Exclusive`], [`Shared`] and [`Cloned`].
pub trait Policy: sealed::Sealed {
    /// The storage that holds a value of type `E` under this policy.
    type Storage<E>: Storage<E>;
}

/// Storage of exactly one value under some ownership policy.
///
/// This trait is sealed and only implemented by the storage types of this module.
pub trait Storage<E>: sealed::Sealed + Sized {
    /// Shared access to the stored value.
    type Ref<'a>: Deref<Target = E>
    where
        Self: 'a;

    /// Exclusive access to the stored value.
    type RefMut<'a>: DerefMut<Target = E>
    where
        Self: 'a;

    /// Takes ownership of `value`.
    fn new(value: E) -> Self;

    /// Grants shared access to the stored value.
    fn get(&self) -> Self::Ref<'_>;

    /// Grants exclusive access to the stored value.
    fn get_mut(&mut self) -> Self::RefMut<'_>;

    /// Replaces the stored value, releasing the previous one per the policy.
    fn replace(&mut self, value: E);

    /// Gives the stored value back to the caller if this storage is its sole owner.
    ///
    /// # Errors
    ///
    /// Returns the storage unchanged if other owners of the value still exist.
    fn into_inner(self) -> Result<E, Self>;
}

/// Single-owner policy. A variant using it cannot be cloned. This is the default policy.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[non_exhaustive]
pub struct Exclusive;

/// Reference-counted policy. Clones of a variant are handles to the same value and
/// mutations through one handle are visible through all of them.
///
/// The reference count is atomic, so handles may be cloned and dropped on different threads.
/// Access to the value is serialized by a reader-writer lock: dispatching with `&mut` handlers
/// takes the write lock, dispatching with `&` handlers and extraction take the read lock.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[non_exhaustive]
pub struct Shared;

/// Deep-copy policy. Cloning a variant duplicates the held value through the `Clone`
/// implementation of the candidate that is currently held.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[non_exhaustive]
pub struct Cloned;

impl sealed::Sealed for Exclusive {}
impl sealed::Sealed for Shared {}
impl sealed::Sealed for Cloned {}

impl Policy for Exclusive {
    type Storage<E> = ExclusiveStorage<E>;
}

impl Policy for Shared {
    type Storage<E> = SharedStorage<E>;
}

impl Policy for Cloned {
    type Storage<E> = ClonedStorage<E>;
}

/// Storage used by the [`Exclusive`] policy.
#[derive(Debug)]
pub struct ExclusiveStorage<E> {
    value: Box<E>,
}

impl<E> sealed::Sealed for ExclusiveStorage<E> {}

impl<E> Storage<E> for ExclusiveStorage<E> {
    type Ref<'a>
        = &'a E
    where
        Self: 'a;

    type RefMut<'a>
        = &'a mut E
    where
        Self: 'a;

    fn new(value: E) -> Self {
        Self {
            value: Box::new(value),
        }
    }

    fn get(&self) -> Self::Ref<'_> {
        &self.value
    }

    fn get_mut(&mut self) -> Self::RefMut<'_> {
        &mut self.value
    }

    fn replace(&mut self, value: E) {
        // The allocation is reused, the previous value is dropped in place.
        *self.value = value;
    }

    fn into_inner(self) -> Result<E, Self> {
        Ok(*self.value)
    }
}

/// Storage used by the [`Cloned`] policy.
#[derive(Debug)]
pub struct ClonedStorage<E> {
    value: Box<E>,
}

impl<E> sealed::Sealed for ClonedStorage<E> {}

impl<E> Storage<E> for ClonedStorage<E> {
    type Ref<'a>
        = &'a E
    where
        Self: 'a;

    type RefMut<'a>
        = &'a mut E
    where
        Self: 'a;

    fn new(value: E) -> Self {
        Self {
            value: Box::new(value),
        }
    }

    fn get(&self) -> Self::Ref<'_> {
        &self.value
    }

    fn get_mut(&mut self) -> Self::RefMut<'_> {
        &mut self.value
    }

    fn replace(&mut self, value: E) {
        *self.value = value;
    }

    fn into_inner(self) -> Result<E, Self> {
        Ok(*self.value)
    }
}

impl<E: Clone> Clone for ClonedStorage<E> {
    fn clone(&self) -> Self {
        Self {
            value: Box::new(E::clone(&self.value)),
        }
    }
}

/// Storage used by the [`Shared`] policy.
pub struct SharedStorage<E> {
    value: Arc<RwLock<E>>,
}

impl<E> SharedStorage<E> {
    pub(crate) fn handle_count(&self) -> usize {
        Arc::strong_count(&self.value)
    }

    pub(crate) fn shares_value_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl<E> sealed::Sealed for SharedStorage<E> {}

impl<E> Storage<E> for SharedStorage<E> {
    type Ref<'a>
        = RwLockReadGuard<'a, E>
    where
        Self: 'a;

    type RefMut<'a>
        = RwLockWriteGuard<'a, E>
    where
        Self: 'a;

    fn new(value: E) -> Self {
        Self {
            value: Arc::new(RwLock::new(value)),
        }
    }

    fn get(&self) -> Self::Ref<'_> {
        self.value.read().expect(ERR_POISONED_LOCK)
    }

    fn get_mut(&mut self) -> Self::RefMut<'_> {
        self.value.write().expect(ERR_POISONED_LOCK)
    }

    fn replace(&mut self, value: E) {
        // Only this handle moves on to the new value. Other handles keep the old one alive.
        self.value = Arc::new(RwLock::new(value));
    }

    fn into_inner(self) -> Result<E, Self> {
        match Arc::try_unwrap(self.value) {
            Ok(lock) => Ok(lock.into_inner().expect(ERR_POISONED_LOCK)),
            Err(value) => Err(Self { value }),
        }
    }
}

impl<E> Clone for SharedStorage<E> {
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
        }
    }
}

impl<E: Debug> Debug for SharedStorage<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedStorage")
            .field("handle_count", &self.handle_count())
            .field("value", &*self.get())
            .finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use static_assertions::{assert_impl_all, assert_not_impl_any};

    use super::*;

    assert_not_impl_any!(ExclusiveStorage<u32>: Clone);
    assert_impl_all!(ClonedStorage<u32>: Clone, Send, Sync);
    assert_not_impl_any!(ClonedStorage<Cell<u32>>: Sync);
    assert_impl_all!(SharedStorage<u32>: Clone, Send, Sync);
    assert_not_impl_any!(SharedStorage<Rc<u32>>: Send, Sync);

    #[test]
    fn exclusive_replace_drops_previous_value() {
        let tracker = Rc::new(());

        let mut storage = ExclusiveStorage::new(Some(Rc::clone(&tracker)));
        assert_eq!(Rc::strong_count(&tracker), 2);

        storage.replace(None);
        assert_eq!(Rc::strong_count(&tracker), 1);
        assert!(storage.get().is_none());
    }

    #[test]
    fn cloned_storage_is_independent() {
        let original = ClonedStorage::new(vec![1, 2, 3]);
        let mut copy = original.clone();

        copy.get_mut().push(4);

        assert_eq!(*original.get(), vec![1, 2, 3]);
        assert_eq!(*copy.get(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn shared_storage_aliases_value() {
        let original = SharedStorage::new(String::from("hello"));
        let mut alias = original.clone();

        alias.get_mut().push_str(" world");

        assert_eq!(*original.get(), "hello world");
        assert_eq!(original.handle_count(), 2);
        assert!(original.shares_value_with(&alias));
    }

    #[test]
    fn shared_replace_detaches_only_this_handle() {
        let original = SharedStorage::new(1_u32);
        let mut alias = original.clone();

        alias.replace(2);

        assert_eq!(*original.get(), 1);
        assert_eq!(*alias.get(), 2);
        assert_eq!(original.handle_count(), 1);
        assert!(!original.shares_value_with(&alias));
    }

    #[test]
    fn shared_into_inner_requires_sole_handle() {
        let original = SharedStorage::new(5_u32);
        let alias = original.clone();

        let original = original
            .into_inner()
            .expect_err("alias still holds the value");

        drop(alias);

        assert_eq!(original.into_inner().ok(), Some(5));
    }
}
