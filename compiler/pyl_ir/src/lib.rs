//! pyl IR - identifiers, type names and generic syntax trees.
//!
//! This crate holds the leaf data structures shared by the rest of the
//! front end:
//! - `Name`: interned identifiers (`StringInterner`, `SharedInterner`)
//! - `TypeName`: hierarchical class names using `/` for nesting
//! - `path`: file-system path normalization for module entries
//! - `CastArena`: the generic, kind-tagged AST handed over by the parser
//! - `Entity`: parsed declarations (functions, classes, fields, scripts)
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: Strings → Name(u32), class names → `TypeName`
//! - **Flatten Everything**: tree children are `NodeId` indices into an arena
//! - **Compare by Index**: equality on names and nodes is O(1)

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

pub mod cast;
mod entity;
mod interner;
mod name;
pub mod path;
mod span;
mod type_name;

pub use cast::{CastArena, CastKind, CastNode, Constant, NodeId};
pub use entity::{CastAnnotation, Entity, EntityKind};
pub use interner::{InternError, SharedInterner, StringInterner};
pub use name::Name;
pub use span::Span;
pub use type_name::{TypeName, NESTING_SEPARATOR};

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{Name, NodeId, Span, TypeName};
    static_assert_size!(Name, 4);
    static_assert_size!(TypeName, 4);
    static_assert_size!(NodeId, 4);
    static_assert_size!(Span, 8);
}
