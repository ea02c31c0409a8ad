use std::any::type_name;
use std::fmt::{self, Debug};

use crate::dispatch::{Insert, Project, Target};
use crate::{
    Exclusive, Member, Narrowed, NarrowedMut, Policy, Shared, Storage, Variants, When, WhenRef,
};

/// Shared access to the enum held by a `OneOf<E, P>`.
pub(crate) type ValueRef<'a, E, P> = <<P as Policy>::Storage<E> as Storage<E>>::Ref<'a>;

/// Exclusive access to the enum held by a `OneOf<E, P>`.
pub(crate) type ValueMut<'a, E, P> = <<P as Policy>::Storage<E> as Storage<E>>::RefMut<'a>;

/// Holds exactly one value of exactly one of the candidate types declared by `E`.
///
/// The candidate types are declared by an enum annotated with
/// [`#[one_of::variants]`][crate::variants]. The policy `P` decides how the value is owned
/// and what cloning a `OneOf` means, see [`Exclusive`], [`Shared`] and [`Cloned`][crate::Cloned].
///
/// There is no way to ask a `OneOf` which type it holds. The held value is reached through
/// [`when()`][Self::when], [`when_ref()`][Self::when_ref] or [`extract()`][Self::extract],
/// all of which are checked for completeness when the program is built.
///
/// # Example
///
/// ```
/// use one_of::{OneOf, when};
///
/// #[derive(Debug)]
/// struct Circle(f64);
/// #[derive(Debug)]
/// struct Square(f64);
///
/// #[one_of::variants]
/// enum Shape {
///     Circle(Circle),
///     Square(Square),
/// }
///
/// let mut shape = OneOf::<Shape>::new(Square(2.0));
///
/// let area = when!(shape, {
///     Circle => |c| std::f64::consts::PI * c.0 * c.0,
///     Square => |s| s.0 * s.0,
/// });
///
/// assert_eq!(area, 4.0);
/// ```
pub struct OneOf<E: Variants, P: Policy = Exclusive> {
    storage: P::Storage<E>,
}

impl<E: Variants, P: Policy> OneOf<E, P> {
    /// Creates a variant that holds `value`.
    ///
    /// `V` must be exactly one of the candidate types of `E`.
    #[must_use]
    pub fn new<V: Member<E>>(value: V) -> Self {
        Self::from_variants(value.wrap())
    }

    /// Creates a variant that holds whichever candidate `value` holds.
    #[must_use]
    pub fn from_variants(value: E) -> Self {
        Self {
            storage: P::Storage::<E>::new(value),
        }
    }

    /// Replaces the held value with `value`, which may be of a different candidate type.
    ///
    /// The previous value is released according to the policy. With the [`Shared`] policy,
    /// only this handle moves on to the new value. Other handles keep the previous one.
    pub fn set<V: Member<E>>(&mut self, value: V) {
        self.storage.replace(value.wrap());
    }

    /// Gives back the enum that holds the value.
    ///
    /// # Errors
    ///
    /// With the [`Shared`] policy, returns `self` unchanged if other handles to the same
    /// value still exist. The other policies never fail.
    pub fn into_variants(self) -> Result<E, Self> {
        self.storage
            .into_inner()
            .map_err(|storage| Self { storage })
    }

    /// Starts a dispatch in which each handler receives exclusive access to the held value.
    ///
    /// Supply handlers with [`When::on()`] and finish with [`When::run()`]. The
    /// [`when!`][crate::when] macro is a shorthand for the same thing.
    ///
    /// With the [`Shared`] policy, the value is locked for writing while the handler runs.
    pub fn when<R>(&mut self) -> When<'_, E, P, R, E::Handlers> {
        When::new(self, E::Handlers::default())
    }

    /// Starts a dispatch in which each handler receives shared access to the held value.
    ///
    /// Supply handlers with [`WhenRef::on()`] and finish with [`WhenRef::run()`]. The
    /// [`when_ref!`][crate::when_ref] macro is a shorthand for the same thing.
    pub fn when_ref<R>(&self) -> WhenRef<'_, E, P, R, E::Handlers> {
        WhenRef::new(self, E::Handlers::default())
    }

    /// Views the held value as `T`, which must be a candidate or declared ancestor that
    /// applies to every candidate of `E`.
    ///
    /// For each candidate the nearest generation that contains `T` is used, exactly like a
    /// dispatch with a single handler for `T`.
    ///
    /// ```
    /// use one_of::OneOf;
    ///
    /// trait Named {
    ///     fn name(&self) -> &str;
    /// }
    ///
    /// struct Cat;
    /// struct Dog;
    ///
    /// impl Named for Cat {
    ///     fn name(&self) -> &str {
    ///         "cat"
    ///     }
    /// }
    ///
    /// impl Named for Dog {
    ///     fn name(&self) -> &str {
    ///         "dog"
    ///     }
    /// }
    ///
    /// #[one_of::variants]
    /// enum Pet {
    ///     #[extends(dyn Named)]
    ///     Cat(Cat),
    ///     #[extends(dyn Named)]
    ///     Dog(Dog),
    /// }
    ///
    /// let pet = OneOf::<Pet>::new(Dog);
    /// assert_eq!(pet.extract::<dyn Named>().name(), "dog");
    /// ```
    #[must_use]
    pub fn extract<T>(&self) -> Narrowed<ValueRef<'_, E, P>, T>
    where
        T: ?Sized,
        E::Handlers: Insert<T, Target>,
        <E::Handlers as Insert<T, Target>>::Output: Project<E, T>,
    {
        Narrowed::new(
            self.storage.get(),
            <<E::Handlers as Insert<T, Target>>::Output as Project<E, T>>::project_ref,
        )
    }

    /// Like [`extract()`][Self::extract] but grants exclusive access.
    #[must_use]
    pub fn extract_mut<T>(&mut self) -> NarrowedMut<ValueMut<'_, E, P>, T>
    where
        T: ?Sized,
        E::Handlers: Insert<T, Target>,
        <E::Handlers as Insert<T, Target>>::Output: Project<E, T>,
    {
        NarrowedMut::new(
            self.storage.get_mut(),
            <<E::Handlers as Insert<T, Target>>::Output as Project<E, T>>::project_ref,
            <<E::Handlers as Insert<T, Target>>::Output as Project<E, T>>::project_mut,
        )
    }

    pub(crate) fn value(&self) -> ValueRef<'_, E, P> {
        self.storage.get()
    }

    pub(crate) fn value_mut(&mut self) -> ValueMut<'_, E, P> {
        self.storage.get_mut()
    }
}

impl<E: Variants> OneOf<E, Shared> {
    /// Number of handles, including this one, that share the held value.
    #[must_use]
    pub fn handle_count(&self) -> usize {
        self.storage.handle_count()
    }

    /// Whether `self` and `other` are handles to the same value.
    #[must_use]
    pub fn shares_value_with(&self, other: &Self) -> bool {
        self.storage.shares_value_with(&other.storage)
    }
}

impl<E: Variants, P: Policy> Clone for OneOf<E, P>
where
    P::Storage<E>: Clone,
{
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
        }
    }
}

impl<E: Variants + Debug, P: Policy> Debug for OneOf<E, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OneOf")
            .field("policy", &type_name::<P>())
            .field("value", &*self.storage.get())
            .finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use static_assertions::{assert_impl_all, assert_not_impl_any};

    use super::*;
    use crate::Cloned;

    #[derive(Clone, Debug, PartialEq)]
    struct Text(String);

    #[derive(Clone, Debug, PartialEq)]
    struct Number(i64);

    #[crate::variants]
    #[derive(Clone, Debug)]
    enum Token {
        Text(Text),
        Number(Number),
    }

    assert_not_impl_any!(OneOf<Token>: Clone);
    assert_impl_all!(OneOf<Token, Shared>: Clone, Send, Sync);
    assert_impl_all!(OneOf<Token, Cloned>: Clone, Send, Sync);
    assert_impl_all!(OneOf<Token>: Send, Sync);

    #[test]
    fn new_then_into_variants_gives_back_value() {
        let token = OneOf::<Token>::new(Number(5));

        assert!(matches!(token.into_variants(), Ok(Token::Number(Number(5)))));
    }

    #[test]
    fn set_switches_candidate() {
        let mut token = OneOf::<Token>::new(Number(5));
        token.set(Text("five".to_owned()));

        let text = token
            .when_ref()
            .on::<Text, _>(|t| t.0.clone())
            .on::<Number, _>(|n| n.0.to_string())
            .run();

        assert_eq!(text, "five");
    }

    #[test]
    fn shared_into_variants_needs_last_handle() {
        let token = OneOf::<Token, Shared>::new(Number(1));
        let alias = token.clone();

        let token = token.into_variants().expect_err("alias is still alive");
        assert_eq!(token.handle_count(), 2);

        drop(alias);
        assert!(token.into_variants().is_ok());
    }

    #[test]
    fn debug_shows_policy_and_value() {
        let token = OneOf::<Token, Cloned>::new(Number(3));

        let output = format!("{token:?}");

        assert!(output.contains("Cloned"));
        assert!(output.contains("Number(3)"));
    }
}
