//! Bootstrap types.
//!
//! Every registry starts out holding these types. They are created once at
//! construction and never removed; user classes and code bodies hang off
//! them through their super names.
//!
//! ```text
//! Root
//! ├── object
//! │   ├── list, set, dict, tuple, string
//! │   └── UnknownObject
//! ├── Exception
//! └── CodeBody
//!     ├── lambda, filter, comprehension
//!     ├── trampoline, superfun
//!     └── EmptyScript
//! ```

/// A type pre-registered in every registry.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BuiltinType {
    /// Top of the hierarchy; the only type without a super type.
    Root,
    /// Base of all ordinary objects.
    Object,
    /// Base of raised values.
    Exception,
    /// Plain function bodies, and the base of every code-body kind.
    CodeBody,
    /// `lambda` expressions.
    Lambda,
    /// Filter clauses of comprehensions.
    Filter,
    /// List, set, dict comprehensions and generator expressions.
    Comprehension,
    /// Synthesized forwarding bodies for bound-method calls.
    Trampoline,
    /// Wrapper bodies for `super()` calls.
    SuperFun,
    List,
    Set,
    Dict,
    Tuple,
    String,
    /// Objects whose class cannot be determined statically.
    UnknownObject,
    /// Super type of the per-file placeholder script classes.
    EmptyScript,
}

impl BuiltinType {
    /// All bootstrap types, supertypes before subtypes.
    pub const ALL: [BuiltinType; 16] = [
        BuiltinType::Root,
        BuiltinType::Object,
        BuiltinType::Exception,
        BuiltinType::CodeBody,
        BuiltinType::Lambda,
        BuiltinType::Filter,
        BuiltinType::Comprehension,
        BuiltinType::Trampoline,
        BuiltinType::SuperFun,
        BuiltinType::List,
        BuiltinType::Set,
        BuiltinType::Dict,
        BuiltinType::Tuple,
        BuiltinType::String,
        BuiltinType::UnknownObject,
        BuiltinType::EmptyScript,
    ];

    /// Registered type name.
    pub const fn name(self) -> &'static str {
        match self {
            BuiltinType::Root => "Root",
            BuiltinType::Object => "object",
            BuiltinType::Exception => "Exception",
            BuiltinType::CodeBody => "CodeBody",
            BuiltinType::Lambda => "lambda",
            BuiltinType::Filter => "filter",
            BuiltinType::Comprehension => "comprehension",
            BuiltinType::Trampoline => "trampoline",
            BuiltinType::SuperFun => "superfun",
            BuiltinType::List => "list",
            BuiltinType::Set => "set",
            BuiltinType::Dict => "dict",
            BuiltinType::Tuple => "tuple",
            BuiltinType::String => "string",
            BuiltinType::UnknownObject => "UnknownObject",
            BuiltinType::EmptyScript => "EmptyScript",
        }
    }

    /// Direct super type; `None` only for `Root`.
    pub const fn super_type(self) -> Option<BuiltinType> {
        match self {
            BuiltinType::Root => None,
            BuiltinType::Object | BuiltinType::Exception | BuiltinType::CodeBody => {
                Some(BuiltinType::Root)
            }
            BuiltinType::Lambda
            | BuiltinType::Filter
            | BuiltinType::Comprehension
            | BuiltinType::Trampoline
            | BuiltinType::SuperFun
            | BuiltinType::EmptyScript => Some(BuiltinType::CodeBody),
            BuiltinType::List
            | BuiltinType::Set
            | BuiltinType::Dict
            | BuiltinType::Tuple
            | BuiltinType::String
            | BuiltinType::UnknownObject => Some(BuiltinType::Object),
        }
    }

    /// Whether this type is a kind of executable body.
    pub const fn is_code_body_kind(self) -> bool {
        matches!(
            self,
            BuiltinType::CodeBody
                | BuiltinType::Lambda
                | BuiltinType::Filter
                | BuiltinType::Comprehension
                | BuiltinType::Trampoline
                | BuiltinType::SuperFun
        )
    }

    /// Position in [`ALL`](Self::ALL).
    #[inline]
    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

#[cfg(test)]
mod tests;
