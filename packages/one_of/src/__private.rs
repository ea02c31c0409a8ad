//! Logically private items that must be technically public because the code generated by
//! `#[one_of::variants]` refers to them.

pub use crate::dispatch::{
    Both, Chain, DispatchMut, DispatchRef, End, Insert, Link, Locate, Project, ResolveMut,
    ResolveRef, Unhandled,
};
pub use crate::{Member, Variants};
