//! pyl types - the class hierarchy registry.
//!
//! - `TypeRegistry`: classes and code bodies by `TypeName`, seeded with the
//!   bootstrap types in `BuiltinType`
//! - class definition with inner-type linking, static fields and method
//!   references
//! - the two-step code-body builder (`declare_*_type`, then `attach_code`)
//! - method annotation extraction
//!
//! Every precondition failure is an `InvariantError`; nothing here panics
//! or exits on bad input.

pub mod annotation;
mod builtins;
mod code_body;
mod error;
mod record;
mod registry;

pub use annotation::{AnnotationShape, DYNAMIC_ANNOTATION, DYNAMIC_ANNOTATION_ARGUMENT};
pub use builtins::BuiltinType;
pub use error::InvariantError;
pub use record::{
    AnnotationRecord, CfgHandle, ClassOrigin, ClassRecord, CodeBodyRecord, CompiledUnit,
    FieldFlags, FieldRecord, LexicalInfo, MethodDescriptor, MethodReference, TypeEntry,
};
pub use registry::{link_if_outer_defined, InnerLinkPolicy, Superclasses, TypeRegistry};
