//! Tree patterns and the subscript-assignment rewrite.
//!
//! - `TreePattern`: a small declarative language for locating subtrees of
//!   a `CastArena` and binding named parts of them
//! - `SubscriptRewriter`: the two fixed rewrites that turn `x[i] = v` and
//!   `x[i] op= v` into `slice` calls before translation

mod pattern;
mod rewrite;

pub use pattern::{Binding, PatternError, Segments, TreePattern};
pub use rewrite::{SubscriptRewriter, SLICE_ASSIGN, SLICE_ASSIGN_OP};
