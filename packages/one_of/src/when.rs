use std::any::type_name;
use std::fmt::{self, Debug};
use std::marker::PhantomData;

use crate::dispatch::{DispatchMut, DispatchRef, Handler, Insert};
use crate::{OneOf, Policy, Variants};

/// Collects the handlers of a dispatch that grants exclusive access to the held value.
///
/// Created by [`OneOf::when()`]. Each [`on()`][Self::on] call supplies the handler for one
/// type and [`run()`][Self::run] invokes the handler that best matches the held candidate.
///
/// The best handler for a candidate is the one for the candidate itself or, if there is none,
/// the one for a type in the nearest `#[extends(...)]` generation of that candidate. The
/// program does not build if some candidate has no applicable handler or if the nearest
/// generation with a handler has more than one.
///
/// `H` is the type-level record of which types already have a handler.
#[must_use = "handlers are only invoked by calling `run()`"]
pub struct When<'a, E, P, R, H>
where
    E: Variants,
    P: Policy,
{
    target: &'a mut OneOf<E, P>,
    handlers: H,
    _result: PhantomData<fn() -> R>,
}

impl<'a, E, P, R, H> When<'a, E, P, R, H>
where
    E: Variants,
    P: Policy,
{
    pub(crate) fn new(target: &'a mut OneOf<E, P>, handlers: H) -> Self {
        Self {
            target,
            handlers,
            _result: PhantomData,
        }
    }

    /// Supplies the handler for values of type `A`.
    ///
    /// `A` must be one of the candidate types of `E` or a type listed in one of their
    /// `#[extends(...)]` attributes, and may receive only one handler per dispatch.
    pub fn on<A, F>(self, handler: F) -> When<'a, E, P, R, H::Output>
    where
        A: ?Sized,
        F: FnOnce(&mut A) -> R,
        H: Insert<A, Handler<F>>,
    {
        When {
            target: self.target,
            handlers: self.handlers.insert(Handler(handler)),
            _result: PhantomData,
        }
    }

    /// Invokes the handler selected for the held candidate and returns its result.
    pub fn run(self) -> R
    where
        H: DispatchMut<E, R>,
    {
        let mut value = self.target.value_mut();
        self.handlers.dispatch_mut(&mut *value)
    }
}

impl<E, P, R, H> Debug for When<'_, E, P, R, H>
where
    E: Variants,
    P: Policy,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("When")
            .field("variants", &type_name::<E>())
            .field("handlers", &type_name::<H>())
            .finish_non_exhaustive()
    }
}

/// Collects the handlers of a dispatch that grants shared access to the held value.
///
/// Created by [`OneOf::when_ref()`]. Selects handlers the same way as [`When`].
#[must_use = "handlers are only invoked by calling `run()`"]
pub struct WhenRef<'a, E, P, R, H>
where
    E: Variants,
    P: Policy,
{
    target: &'a OneOf<E, P>,
    handlers: H,
    _result: PhantomData<fn() -> R>,
}

impl<'a, E, P, R, H> WhenRef<'a, E, P, R, H>
where
    E: Variants,
    P: Policy,
{
    pub(crate) fn new(target: &'a OneOf<E, P>, handlers: H) -> Self {
        Self {
            target,
            handlers,
            _result: PhantomData,
        }
    }

    /// Supplies the handler for values of type `A`.
    ///
    /// The same rules as for [`When::on()`] apply.
    pub fn on<A, F>(self, handler: F) -> WhenRef<'a, E, P, R, H::Output>
    where
        A: ?Sized,
        F: FnOnce(&A) -> R,
        H: Insert<A, Handler<F>>,
    {
        WhenRef {
            target: self.target,
            handlers: self.handlers.insert(Handler(handler)),
            _result: PhantomData,
        }
    }

    /// Invokes the handler selected for the held candidate and returns its result.
    pub fn run(self) -> R
    where
        H: DispatchRef<E, R>,
    {
        let value = self.target.value();
        self.handlers.dispatch_ref(&*value)
    }
}

impl<E, P, R, H> Debug for WhenRef<'_, E, P, R, H>
where
    E: Variants,
    P: Policy,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WhenRef")
            .field("variants", &type_name::<E>())
            .field("handlers", &type_name::<H>())
            .finish_non_exhaustive()
    }
}
