#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! An owning pointer whose value cannot be released while counted handles to it exist.
//!
//! [`OwnedPtr<T>`] is the single owner of a value. [`HandlePtr<T>`] is a counted borrow of that
//! value, obtained from [`OwnedPtr::handle()`]. While any handle is live, the owner refuses to
//! [`release()`][OwnedPtr::release] the value. Every misuse is reported as an [`Error`]
//! instead of being undefined behavior:
//!
//! * releasing an owner twice;
//! * releasing an owner while handles exist;
//! * releasing a handle twice;
//! * accessing the value through a released owner or handle.
//!
//! ```
//! use owned_ptr::{Error, OwnedPtr};
//!
//! let mut owner = OwnedPtr::new(3);
//! let mut handle = owner.handle().unwrap();
//!
//! assert_eq!(handle.with(|value| *value).unwrap(), 3);
//! assert!(matches!(
//!     owner.release(),
//!     Err(Error::ReferencesStillExist { count: 1 })
//! ));
//!
//! handle.release().unwrap();
//! owner.release().unwrap();
//!
//! assert!(matches!(owner.with(|value| *value), Err(Error::InvalidOwned)));
//! ```
//!
//! The value is accessed through closures ([`OwnedPtr::with()`], [`HandlePtr::with_mut()`]
//! and so on) because access may fail and because owner and handles may live on different
//! threads. Access is serialized by a reader-writer lock.
//!
//! Dropping the owner drops the value even if handles still exist. Those handles become
//! invalid and a warning is logged through `tracing`.

mod constants;
mod error;
mod handle;
mod owned;

pub(crate) use constants::*;
pub use error::*;
pub use handle::*;
pub use owned::*;
