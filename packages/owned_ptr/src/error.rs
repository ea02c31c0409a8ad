use thiserror::Error;

/// Misuse of an [`OwnedPtr`][crate::OwnedPtr] or [`HandlePtr`][crate::HandlePtr].
///
/// Every operation that fails leaves the owner and its handles unchanged.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// The owner was asked to release its value while handles to it were still live.
    #[error("cannot release an owned value while {count} handle(s) to it still exist")]
    ReferencesStillExist {
        /// Number of live handles at the time of the attempt.
        count: usize,
    },

    /// The owner was asked to release a value it no longer holds.
    #[error("cannot release an owned value that was already released")]
    ReleasedInvalidOwned,

    /// A handle was released although it was not valid.
    #[error("cannot release a handle that was already released or whose owner is gone")]
    ReleasedInvalidHandle,

    /// The value was accessed through an owner that no longer holds it.
    #[error("cannot access the value of an owner that was released")]
    InvalidOwned,

    /// The value was accessed through a handle that was released or whose owner is gone.
    #[error("cannot access the value through a handle that was released or whose owner is gone")]
    InvalidHandle,
}

/// A specialized `Result` type for owned pointer operations, returning the crate's
/// [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;
