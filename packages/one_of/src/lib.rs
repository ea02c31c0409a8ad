#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! A variant container that holds exactly one value of exactly one type drawn from a closed,
//! compile-time list of candidate types, together with type-directed dispatch that selects
//! the best handler for the held type.
//!
//! The candidate types are declared as an enum with one single-field tuple variant per
//! candidate, annotated with [`#[one_of::variants]`][variants]. The container is
//! [`OneOf<E, P>`][OneOf], where `E` is that enum and `P` the ownership policy.
//!
//! ```
//! use one_of::{OneOf, when};
//!
//! struct Celsius(f64);
//! struct Fahrenheit(f64);
//!
//! #[one_of::variants]
//! enum Temperature {
//!     Celsius(Celsius),
//!     Fahrenheit(Fahrenheit),
//! }
//!
//! let mut reading = OneOf::<Temperature>::new(Fahrenheit(212.0));
//!
//! let celsius = when!(reading, {
//!     Celsius => |c| c.0,
//!     Fahrenheit => |f| (f.0 - 32.0) * 5.0 / 9.0,
//! });
//!
//! assert_eq!(celsius, 100.0);
//! ```
//!
//! # Handler selection
//!
//! Every candidate may declare *ancestors*: types that a reference to the candidate coerces
//! to, typically trait objects. Each `#[extends(...)]` attribute on a variant declares one
//! generation of ancestors, nearest first. A handler may be supplied for any candidate or
//! declared ancestor.
//!
//! For the candidate that is held at runtime, the handler that runs is:
//!
//! 1. the handler for the candidate itself, if one was supplied;
//! 1. otherwise the handler for a type in the nearest generation that has one.
//!
//! The selection is made while the program is built, separately for each candidate:
//!
//! * If no handler applies to some candidate, the dispatch is not exhaustive and the program
//!   does not build.
//! * If the nearest generation with a handler has more than one, the dispatch is ambiguous
//!   and the program does not build.
//! * Handlers for types that are neither candidates nor declared ancestors, and two handlers
//!   for the same type, are rejected as well.
//!
//! A handler for a trait object observes the behavior of the concrete held type.
//!
//! ```
//! use one_of::{OneOf, when_ref};
//!
//! trait Shape {
//!     fn sides(&self) -> u32;
//! }
//!
//! trait Polygon: Shape {}
//!
//! struct Circle;
//! struct Triangle;
//! struct Square;
//!
//! impl Shape for Circle {
//!     fn sides(&self) -> u32 {
//!         0
//!     }
//! }
//!
//! impl Shape for Triangle {
//!     fn sides(&self) -> u32 {
//!         3
//!     }
//! }
//!
//! impl Shape for Square {
//!     fn sides(&self) -> u32 {
//!         4
//!     }
//! }
//!
//! impl Polygon for Triangle {}
//! impl Polygon for Square {}
//!
//! #[one_of::variants]
//! enum AnyShape {
//!     #[extends(dyn Shape)]
//!     Circle(Circle),
//!     #[extends(dyn Polygon)]
//!     #[extends(dyn Shape)]
//!     Triangle(Triangle),
//!     #[extends(dyn Polygon)]
//!     #[extends(dyn Shape)]
//!     Square(Square),
//! }
//!
//! let describe = |shape: &OneOf<AnyShape>| {
//!     when_ref!(shape, {
//!         Square => |_| "square".to_owned(),
//!         dyn Polygon => |p| format!("polygon with {} sides", p.sides()),
//!         dyn Shape => |s| format!("shape with {} sides", s.sides()),
//!     })
//! };
//!
//! assert_eq!(describe(&OneOf::new(Circle)), "shape with 0 sides");
//! assert_eq!(describe(&OneOf::new(Triangle)), "polygon with 3 sides");
//! assert_eq!(describe(&OneOf::new(Square)), "square");
//! ```
//!
//! # Ownership policies
//!
//! | Policy | `clone()` | Storage |
//! |---|---|---|
//! | [`Exclusive`] (default) | does not build | `Box<E>` |
//! | [`Shared`] | another handle to the same value | `Arc<RwLock<E>>` |
//! | [`Cloned`] | deep copy (requires `E: Clone`) | `Box<E>` |
//!
//! ```
//! use one_of::{OneOf, Shared, when};
//!
//! struct Count(u32);
//!
//! #[one_of::variants]
//! enum Metric {
//!     Count(Count),
//! }
//!
//! let mut first = OneOf::<Metric, Shared>::new(Count(1));
//! let second = first.clone();
//!
//! when!(first, { Count => |c| c.0 += 1 });
//!
//! assert_eq!(second.extract::<Count>().0, 2);
//! ```
//!
//! # Rejected at build time
//!
//! The examples below do not build. The exact diagnostics are checked by the `ui_tests` package.
//!
//! A dispatch must cover every candidate:
//!
//! ```compile_fail
//! # use one_of::{OneOf, when};
//! # struct Red;
//! # struct Green;
//! #[one_of::variants]
//! enum Color {
//!     Red(Red),
//!     Green(Green),
//! }
//!
//! let mut color = OneOf::<Color>::new(Red);
//! when!(color, { Red => |_| 1 });
//! ```
//!
//! Two handlers from the same generation are ambiguous:
//!
//! ```compile_fail
//! # use one_of::{OneOf, when};
//! # trait Swims {}
//! # trait Walks {}
//! # struct Frog;
//! # impl Swims for Frog {}
//! # impl Walks for Frog {}
//! #[one_of::variants]
//! enum Animal {
//!     #[extends(dyn Swims, dyn Walks)]
//!     Frog(Frog),
//! }
//!
//! let mut animal = OneOf::<Animal>::new(Frog);
//! when!(animal, {
//!     dyn Swims => |_| 1,
//!     dyn Walks => |_| 2,
//! });
//! ```
//!
//! A type may receive only one handler:
//!
//! ```compile_fail
//! # use one_of::{OneOf, when};
//! # struct Red;
//! #[one_of::variants]
//! enum Color {
//!     Red(Red),
//! }
//!
//! let mut color = OneOf::<Color>::new(Red);
//! when!(color, {
//!     Red => |_| 1,
//!     Red => |_| 2,
//! });
//! ```
//!
//! Handlers are only accepted for candidates and their declared ancestors:
//!
//! ```compile_fail
//! # use one_of::{OneOf, when};
//! # struct Red;
//! #[one_of::variants]
//! enum Color {
//!     Red(Red),
//! }
//!
//! let mut color = OneOf::<Color>::new(Red);
//! when!(color, {
//!     Red => |_| 1,
//!     String => |_| 2,
//! });
//! ```
//!
//! All handlers return the same type:
//!
//! ```compile_fail
//! # use one_of::{OneOf, when};
//! # struct Red;
//! # struct Green;
//! #[one_of::variants]
//! enum Color {
//!     Red(Red),
//!     Green(Green),
//! }
//!
//! let mut color = OneOf::<Color>::new(Red);
//! when!(color, {
//!     Red => |_| 1_u32,
//!     Green => |_| "green",
//! });
//! ```
//!
//! Only candidate types can be stored:
//!
//! ```compile_fail
//! # use one_of::OneOf;
//! # struct Red;
//! #[one_of::variants]
//! enum Color {
//!     Red(Red),
//! }
//!
//! let color = OneOf::<Color>::new(String::from("red"));
//! ```
//!
//! The exclusive policy cannot be cloned:
//!
//! ```compile_fail
//! # use one_of::OneOf;
//! # #[derive(Clone)]
//! # struct Red;
//! #[one_of::variants]
//! #[derive(Clone)]
//! enum Color {
//!     Red(Red),
//! }
//!
//! let color = OneOf::<Color>::new(Red);
//! let copy = color.clone();
//! ```
//!
//! Extraction requires a type that applies to every candidate:
//!
//! ```compile_fail
//! # use one_of::OneOf;
//! # trait Warm {}
//! # struct Red;
//! # struct Blue;
//! # impl Warm for Red {}
//! #[one_of::variants]
//! enum Color {
//!     #[extends(dyn Warm)]
//!     Red(Red),
//!     Blue(Blue),
//! }
//!
//! let color = OneOf::<Color>::new(Red);
//! let warm = color.extract::<dyn Warm>();
//! ```
//!
//! # Declaring variants
//!
//! The attribute rejects generic enums, variants that are not single-field tuple variants,
//! candidate types that appear more than once and ancestors that appear more than once for
//! the same candidate.

#[doc(hidden)]
pub mod __private;

pub mod dispatch;

mod constants;
mod container;
mod macros;
mod narrowed;
mod storage;
mod variants;
mod when;

pub(crate) use constants::*;
pub use container::*;
pub use narrowed::*;
pub use storage::*;
pub use variants::*;
pub use when::*;

/// Declares an enum as the closed list of candidate types of a [`OneOf`].
///
/// # Usage
///
/// Apply the attribute to an enum whose variants each hold exactly one unnamed field. The
/// field types are the candidate types and must be distinct.
///
/// Ancestors of a candidate are declared with `#[extends(...)]` attributes on its variant.
/// Each attribute is one generation, listed nearest first. Types in the same attribute are
/// equally near and a dispatch that supplies handlers for two of them is ambiguous. A
/// reference to the candidate must coerce to every ancestor, which holds for trait objects
/// of traits the candidate implements and for `Deref` targets.
///
/// # Example
///
/// ```
/// use std::fmt::Display;
///
/// use one_of::{OneOf, when_ref};
///
/// #[one_of::variants]
/// enum Value {
///     #[extends(dyn Display)]
///     Integer(i64),
///     #[extends(str)]
///     #[extends(dyn Display)]
///     Text(String),
/// }
///
/// let value = OneOf::<Value>::new(String::from("abc"));
///
/// let length = when_ref!(value, {
///     str => |s| s.len(),
///     dyn Display => |d| d.to_string().len(),
/// });
///
/// assert_eq!(length, 3);
/// ```
///
/// # Effects
///
/// 1. Implements [`Variants`] for the enum.
/// 1. Implements [`Member<Enum>`][Member] for every candidate type.
/// 1. Generates a hidden handler-set type that [`OneOf::when()`], [`OneOf::when_ref()`] and
///    [`OneOf::extract()`] use to select handlers.
///
/// The enum itself is emitted unchanged apart from the removal of the `#[extends]`
/// attributes, so it can carry derives and be used on its own.
pub use one_of_macros::__macro_one_of_variants as variants;

// This is so procedural macros can produce code which refers to
// ::one_of::* which will work also in the current crate.
#[doc(hidden)]
extern crate self as one_of;
