//! The handler-selection procedure that backs [`OneOf::when()`][crate::OneOf::when],
//! [`OneOf::when_ref()`][crate::OneOf::when_ref] and [`OneOf::extract()`][crate::OneOf::extract].
//!
//! The selection happens entirely during trait resolution, once per combination of variant
//! type and handler-set type. Nothing in this module searches for a handler at runtime.
//!
//! # How a handler is selected
//!
//! The `#[one_of::variants]` attribute gives every type that may receive a handler (every
//! candidate and every declared ancestor) a *slot* in a generated handler-set type. A slot is
//! either [`Unhandled`] or holds a [`Handler`]. Supplying a handler through
//! [`When::on()`][crate::When::on] moves one slot from [`Unhandled`] to [`Handler`] via
//! [`Insert`].
//!
//! For each candidate `C` the attribute also generates a [`Chain`] of *generations*:
//!
//! 1. `C` itself,
//! 2. the types of the first `#[extends(...)]` attribute on `C`,
//! 3. the types of the second `#[extends(...)]` attribute, and so on, terminated by [`End`].
//!
//! Every type in a generation is a [`Link`] that pairs its slot with the coercion from `&C`.
//! Generations with several types combine their links with [`Both`].
//!
//! Resolving a chain walks it front to back. Each generation collapses into either [`Miss`]
//! (no slot in it holds a handler) or [`Hit`] (exactly one does):
//!
//! * [`Miss`] moves on to the next generation.
//! * [`Hit`] invokes that handler with the value coerced to the handler's argument type.
//! * Two handlers in the same generation cannot be [merged][Merge], so the program is rejected
//!   as ambiguous.
//! * Reaching [`End`] means no handler applies to `C`, so the program is rejected as not
//!   exhaustive.

use std::any::type_name;
use std::fmt::{self, Debug};

/// Slot content for a type that no handler has been supplied for.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[non_exhaustive]
pub struct Unhandled;

/// Slot content for a type that a handler has been supplied for.
pub struct Handler<F>(pub(crate) F);

impl<F> Debug for Handler<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handler").field(&type_name::<F>()).finish()
    }
}

/// Slot content for the type requested from [`OneOf::extract()`][crate::OneOf::extract].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[non_exhaustive]
pub struct Target;

/// Fills the slot of type `A` in a handler set.
///
/// Implemented by the `#[one_of::variants]` attribute for every candidate and every declared
/// ancestor, and only while that slot is still [`Unhandled`].
#[diagnostic::on_unimplemented(
    message = "cannot supply a handler for `{A}` here",
    label = "`{A}` is not a candidate or declared ancestor, or it already has a handler",
    note = "a handler's argument type must be one of the candidates of the variant or a type \
            listed in an `#[extends(...)]` attribute, and each type may be handled only once"
)]
pub trait Insert<A: ?Sized, S> {
    /// The handler set after the slot has been filled.
    type Output;

    /// Places `slot` into the slot of type `A`.
    fn insert(self, slot: S) -> Self::Output;
}

/// The slot of one type in one generation, paired with the coercion from the candidate `C`
/// to that type `A`.
pub struct Link<C: ?Sized, A: ?Sized, S> {
    slot: S,
    by_ref: fn(&C) -> &A,
    by_mut: fn(&mut C) -> &mut A,
}

impl<C: ?Sized, A: ?Sized, S> Link<C, A, S> {
    /// Pairs a slot with the coercions from `C` to `A`.
    #[must_use]
    pub fn new(slot: S, by_ref: fn(&C) -> &A, by_mut: fn(&mut C) -> &mut A) -> Self {
        Self {
            slot,
            by_ref,
            by_mut,
        }
    }
}

impl<C: ?Sized, A: ?Sized, S> Debug for Link<C, A, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Link")
            .field("candidate", &type_name::<C>())
            .field("target", &type_name::<A>())
            .field("slot", &type_name::<S>())
            .finish()
    }
}

/// Two links (or nested [`Both`]) that belong to the same generation.
#[derive(Debug)]
pub struct Both<L, R> {
    left: L,
    right: R,
}

impl<L, R> Both<L, R> {
    /// Groups two members of one generation.
    #[must_use]
    pub fn new(left: L, right: R) -> Self {
        Self { left, right }
    }
}

/// A generation followed by the rest of the chain.
#[derive(Debug)]
pub struct Chain<G, Rest> {
    generation: G,
    rest: Rest,
}

impl<G, Rest> Chain<G, Rest> {
    /// Prepends `generation` to `rest`.
    #[must_use]
    pub fn new(generation: G, rest: Rest) -> Self {
        Self { generation, rest }
    }
}

/// The end of a chain. No generation is left to try.
#[derive(Clone, Copy, Debug, Default)]
#[allow(
    clippy::exhaustive_structs,
    reason = "constructed as a value by code that #[one_of::variants] generates in other crates"
)]
pub struct End;

/// Outcome of a generation in which no slot holds a handler.
#[derive(Clone, Copy, Debug, Default)]
#[non_exhaustive]
pub struct Miss;

/// Outcome of a generation in which exactly one slot holds a handler.
#[derive(Debug)]
pub struct Hit<L>(L);

/// Collapses a generation into [`Miss`] or [`Hit`].
pub trait Generation {
    /// Either [`Miss`] or [`Hit`].
    type Outcome;

    /// Collapses the generation.
    fn outcome(self) -> Self::Outcome;
}

impl<C: ?Sized, A: ?Sized> Generation for Link<C, A, Unhandled> {
    type Outcome = Miss;

    fn outcome(self) -> Self::Outcome {
        Miss
    }
}

impl<C: ?Sized, A: ?Sized, F> Generation for Link<C, A, Handler<F>> {
    type Outcome = Hit<Self>;

    fn outcome(self) -> Self::Outcome {
        Hit(self)
    }
}

impl<C: ?Sized, A: ?Sized> Generation for Link<C, A, Target> {
    type Outcome = Hit<Self>;

    fn outcome(self) -> Self::Outcome {
        Hit(self)
    }
}

impl<L, R> Generation for Both<L, R>
where
    L: Generation,
    R: Generation,
    L::Outcome: Merge<R::Outcome>,
{
    type Outcome = <L::Outcome as Merge<R::Outcome>>::Output;

    fn outcome(self) -> Self::Outcome {
        self.left.outcome().merge(self.right.outcome())
    }
}

/// Combines the outcomes of two members of the same generation.
///
/// Not implemented for two hits: two handlers that apply equally well are ambiguous.
#[diagnostic::on_unimplemented(
    message = "ambiguous handlers: `{Self}` and `{Other}` apply equally well",
    label = "both handlers are for ancestors in the same generation",
    note = "supply a handler for the candidate itself or for a nearer ancestor to break the tie"
)]
pub trait Merge<Other> {
    /// The combined outcome.
    type Output;

    /// Combines the two outcomes.
    fn merge(self, other: Other) -> Self::Output;
}

impl Merge<Miss> for Miss {
    type Output = Miss;

    fn merge(self, _other: Miss) -> Self::Output {
        Miss
    }
}

impl<L> Merge<Hit<L>> for Miss {
    type Output = Hit<L>;

    fn merge(self, other: Hit<L>) -> Self::Output {
        other
    }
}

impl<L> Merge<Miss> for Hit<L> {
    type Output = Self;

    fn merge(self, _other: Miss) -> Self::Output {
        self
    }
}

/// Invokes the best handler of a chain with exclusive access to a candidate `C`.
#[diagnostic::on_unimplemented(
    message = "no handler applies to `{C}`",
    label = "this handler set is not exhaustive",
    note = "supply a handler for `{C}` or for one of the types in its `#[extends(...)]` attributes"
)]
pub trait ResolveMut<C: ?Sized, R> {
    /// Invokes the selected handler.
    fn resolve_mut(self, value: &mut C) -> R;
}

/// Invokes the best handler of a chain with shared access to a candidate `C`.
#[diagnostic::on_unimplemented(
    message = "no handler applies to `{C}`",
    label = "this handler set is not exhaustive",
    note = "supply a handler for `{C}` or for one of the types in its `#[extends(...)]` attributes"
)]
pub trait ResolveRef<C: ?Sized, R> {
    /// Invokes the selected handler.
    fn resolve_ref(self, value: &C) -> R;
}

/// Finds the coercion from a candidate `C` to the extraction target `T`.
#[diagnostic::on_unimplemented(
    message = "`{T}` cannot be extracted from every candidate: it does not apply to `{C}`",
    label = "extraction requires a type that applies to all candidates",
    note = "`extract()` only accepts a type listed as an ancestor of (or equal to) every candidate"
)]
pub trait Locate<C: ?Sized, T: ?Sized> {
    /// Coerces a shared reference.
    fn locate_ref(self, value: &C) -> &T;

    /// Coerces an exclusive reference.
    fn locate_mut(self, value: &mut C) -> &mut T;
}

/// Given a generation outcome, invokes the handler it hit or continues with `Rest`.
pub trait StepMut<C: ?Sized, Rest, R> {
    /// Stops at the handler or continues with `rest`.
    fn step_mut(self, rest: Rest, value: &mut C) -> R;
}

/// Shared-access counterpart of [`StepMut`].
pub trait StepRef<C: ?Sized, Rest, R> {
    /// Stops at the handler or continues with `rest`.
    fn step_ref(self, rest: Rest, value: &C) -> R;
}

/// Extraction counterpart of [`StepMut`].
pub trait StepLocate<C: ?Sized, Rest, T: ?Sized> {
    /// Coerces a shared reference or continues with `rest`.
    fn step_locate_ref(self, rest: Rest, value: &C) -> &T;

    /// Coerces an exclusive reference or continues with `rest`.
    fn step_locate_mut(self, rest: Rest, value: &mut C) -> &mut T;
}

impl<C: ?Sized, R, G, Rest> ResolveMut<C, R> for Chain<G, Rest>
where
    G: Generation,
    G::Outcome: StepMut<C, Rest, R>,
{
    fn resolve_mut(self, value: &mut C) -> R {
        self.generation.outcome().step_mut(self.rest, value)
    }
}

impl<C: ?Sized, R, G, Rest> ResolveRef<C, R> for Chain<G, Rest>
where
    G: Generation,
    G::Outcome: StepRef<C, Rest, R>,
{
    fn resolve_ref(self, value: &C) -> R {
        self.generation.outcome().step_ref(self.rest, value)
    }
}

impl<C: ?Sized, T: ?Sized, G, Rest> Locate<C, T> for Chain<G, Rest>
where
    G: Generation,
    G::Outcome: StepLocate<C, Rest, T>,
{
    fn locate_ref(self, value: &C) -> &T {
        self.generation.outcome().step_locate_ref(self.rest, value)
    }

    fn locate_mut(self, value: &mut C) -> &mut T {
        self.generation.outcome().step_locate_mut(self.rest, value)
    }
}

impl<C: ?Sized, Rest, R> StepMut<C, Rest, R> for Miss
where
    Rest: ResolveMut<C, R>,
{
    fn step_mut(self, rest: Rest, value: &mut C) -> R {
        rest.resolve_mut(value)
    }
}

impl<C: ?Sized, Rest, R> StepRef<C, Rest, R> for Miss
where
    Rest: ResolveRef<C, R>,
{
    fn step_ref(self, rest: Rest, value: &C) -> R {
        rest.resolve_ref(value)
    }
}

impl<C: ?Sized, Rest, T: ?Sized> StepLocate<C, Rest, T> for Miss
where
    Rest: Locate<C, T>,
{
    fn step_locate_ref(self, rest: Rest, value: &C) -> &T {
        rest.locate_ref(value)
    }

    fn step_locate_mut(self, rest: Rest, value: &mut C) -> &mut T {
        rest.locate_mut(value)
    }
}

impl<C: ?Sized, A: ?Sized, F, Rest, R> StepMut<C, Rest, R> for Hit<Link<C, A, Handler<F>>>
where
    F: FnOnce(&mut A) -> R,
{
    fn step_mut(self, _rest: Rest, value: &mut C) -> R {
        let Link { slot, by_mut, .. } = self.0;
        (slot.0)(by_mut(value))
    }
}

impl<C: ?Sized, A: ?Sized, F, Rest, R> StepRef<C, Rest, R> for Hit<Link<C, A, Handler<F>>>
where
    F: FnOnce(&A) -> R,
{
    fn step_ref(self, _rest: Rest, value: &C) -> R {
        let Link { slot, by_ref, .. } = self.0;
        (slot.0)(by_ref(value))
    }
}

impl<C: ?Sized, T: ?Sized, Rest> StepLocate<C, Rest, T> for Hit<Link<C, T, Target>> {
    fn step_locate_ref(self, _rest: Rest, value: &C) -> &T {
        (self.0.by_ref)(value)
    }

    fn step_locate_mut(self, _rest: Rest, value: &mut C) -> &mut T {
        (self.0.by_mut)(value)
    }
}

/// Dispatches a variant value to the handler selected for its held candidate, with
/// exclusive access.
///
/// Implemented by the `#[one_of::variants]` attribute for the generated handler-set type,
/// for every combination of slots in which each candidate resolves to exactly one handler.
pub trait DispatchMut<E, R> {
    /// Invokes the handler selected for the candidate held by `value`.
    fn dispatch_mut(self, value: &mut E) -> R;
}

/// Dispatches a variant value to the handler selected for its held candidate, with
/// shared access.
///
/// Implemented by the `#[one_of::variants]` attribute, like [`DispatchMut`].
pub trait DispatchRef<E, R> {
    /// Invokes the handler selected for the candidate held by `value`.
    fn dispatch_ref(self, value: &E) -> R;
}

/// Narrows a variant value to a type `T` that applies to every candidate.
///
/// Implemented by the `#[one_of::variants]` attribute for handler sets whose only filled slot
/// is the [`Target`].
pub trait Project<E, T: ?Sized> {
    /// Narrows a shared reference.
    fn project_ref(value: &E) -> &T;

    /// Narrows an exclusive reference.
    fn project_mut(value: &mut E) -> &mut T;
}
