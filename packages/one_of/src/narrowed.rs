use std::any::type_name;
use std::fmt::{self, Debug};
use std::ops::{Deref, DerefMut};

/// Shared access to the value of a [`OneOf`][crate::OneOf], viewed as `T`.
///
/// Returned by [`OneOf::extract()`][crate::OneOf::extract]. With the
/// [`Shared`][crate::Shared] policy the value stays read-locked until this is dropped.
pub struct Narrowed<G, T>
where
    G: Deref,
    T: ?Sized,
{
    guard: G,
    project: fn(&G::Target) -> &T,
}

impl<G, T> Narrowed<G, T>
where
    G: Deref,
    T: ?Sized,
{
    pub(crate) fn new(guard: G, project: fn(&G::Target) -> &T) -> Self {
        Self { guard, project }
    }
}

impl<G, T> Deref for Narrowed<G, T>
where
    G: Deref,
    T: ?Sized,
{
    type Target = T;

    fn deref(&self) -> &Self::Target {
        (self.project)(&self.guard)
    }
}

impl<G, T> Debug for Narrowed<G, T>
where
    G: Deref,
    T: ?Sized,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Narrowed")
            .field("target", &type_name::<T>())
            .finish_non_exhaustive()
    }
}

/// Exclusive access to the value of a [`OneOf`][crate::OneOf], viewed as `T`.
///
/// Returned by [`OneOf::extract_mut()`][crate::OneOf::extract_mut]. With the
/// [`Shared`][crate::Shared] policy the value stays write-locked until this is dropped.
pub struct NarrowedMut<G, T>
where
    G: DerefMut,
    T: ?Sized,
{
    guard: G,
    project_ref: fn(&G::Target) -> &T,
    project_mut: fn(&mut G::Target) -> &mut T,
}

impl<G, T> NarrowedMut<G, T>
where
    G: DerefMut,
    T: ?Sized,
{
    pub(crate) fn new(
        guard: G,
        project_ref: fn(&G::Target) -> &T,
        project_mut: fn(&mut G::Target) -> &mut T,
    ) -> Self {
        Self {
            guard,
            project_ref,
            project_mut,
        }
    }
}

impl<G, T> Deref for NarrowedMut<G, T>
where
    G: DerefMut,
    T: ?Sized,
{
    type Target = T;

    fn deref(&self) -> &Self::Target {
        (self.project_ref)(&self.guard)
    }
}

impl<G, T> DerefMut for NarrowedMut<G, T>
where
    G: DerefMut,
    T: ?Sized,
{
    fn deref_mut(&mut self) -> &mut Self::Target {
        (self.project_mut)(&mut self.guard)
    }
}

impl<G, T> Debug for NarrowedMut<G, T>
where
    G: DerefMut,
    T: ?Sized,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NarrowedMut")
            .field("target", &type_name::<T>())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::fmt::Display;

    use super::*;

    fn as_display(value: &u32) -> &(dyn Display + 'static) {
        value
    }

    fn as_display_mut(value: &mut u32) -> &mut (dyn Display + 'static) {
        value
    }

    fn as_self_mut(value: &mut u32) -> &mut u32 {
        value
    }

    fn as_self(value: &u32) -> &u32 {
        value
    }

    #[test]
    fn narrowed_projects_through_guard() {
        let value = 12_u32;
        let narrowed = Narrowed::new(&value, as_display);

        assert_eq!(narrowed.to_string(), "12");
    }

    #[test]
    fn narrowed_mut_writes_through_guard() {
        let mut value = 12_u32;

        {
            let mut narrowed = NarrowedMut::new(&mut value, as_self, as_self_mut);
            *narrowed += 1;
        }

        assert_eq!(value, 13);
    }

    #[test]
    fn debug_names_target_type() {
        let mut value = 1_u32;
        let narrowed = NarrowedMut::new(&mut value, as_display, as_display_mut);

        assert!(format!("{narrowed:?}").contains("Display"));
    }
}
