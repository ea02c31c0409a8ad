/// A closed set of candidate types, declared by an enum annotated with
/// [`#[one_of::variants]`][crate::variants].
///
/// Each tuple variant of the enum holds one candidate. The attribute implements this trait
/// and [`Member`] for every candidate. Implementing it by hand is not supported.
pub trait Variants: Sized {
    /// The empty handler set: one [`Unhandled`][crate::dispatch::Unhandled] slot for every
    /// candidate and every declared ancestor.
    #[doc(hidden)]
    type Handlers: Default;
}

/// Marks `Self` as one of the candidate types of the variant set `E`.
///
/// Only exact candidate types are members. A type that merely coerces to a candidate, or
/// that a candidate extends, is not.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a candidate type of `{E}`",
    label = "only the types held by the variants of `{E}` can be stored",
    note = "wrap the value in one of the candidate types or add a variant for `{Self}`"
)]
pub trait Member<E: Variants> {
    /// Wraps the value in the enum variant that holds `Self`.
    #[doc(hidden)]
    fn wrap(self) -> E;
}
