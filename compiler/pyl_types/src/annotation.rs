//! Method annotations.
//!
//! The parser records decorators and similar markers as generic
//! annotations with an untyped payload. One shape is understood: the
//! dynamic-annotation marker, whose `dynamicAnnotation` argument is a
//! subtree whose first child is a string constant naming the annotation
//! type. Everything else is dropped.

use pyl_ir::{CastAnnotation, CastArena, Constant, Entity, Name, StringInterner, TypeName};
use rustc_hash::FxHashSet;

use crate::AnnotationRecord;

/// Annotation type of the dynamic-annotation marker.
pub const DYNAMIC_ANNOTATION: &str = "DynamicAnnotation";

/// Argument of the marker that carries the annotation subtree.
pub const DYNAMIC_ANNOTATION_ARGUMENT: &str = "dynamicAnnotation";

/// How an entity annotation was understood.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum AnnotationShape {
    /// The marker with a string type name.
    Recognized(Name),
    /// Any other annotation type, or the marker with a malformed payload.
    Unrecognized,
}

/// Classify one annotation whose payload lives in `arena`.
pub fn classify(
    annotation: &CastAnnotation,
    arena: &CastArena,
    interner: &StringInterner,
) -> AnnotationShape {
    if annotation.ty != interner.intern(DYNAMIC_ANNOTATION) {
        return AnnotationShape::Unrecognized;
    }
    annotation
        .argument(interner.intern(DYNAMIC_ANNOTATION_ARGUMENT))
        .and_then(|payload| arena.child(payload, 0))
        .and_then(|first| arena.value(first))
        .and_then(Constant::as_str)
        .map_or(AnnotationShape::Unrecognized, AnnotationShape::Recognized)
}

/// Type-level annotations of a function entity.
pub fn extract_annotations(
    entity: &Entity,
    interner: &StringInterner,
) -> FxHashSet<AnnotationRecord> {
    entity
        .annotations
        .iter()
        .filter_map(|annotation| match classify(annotation, &entity.arena, interner) {
            AnnotationShape::Recognized(ty) => Some(AnnotationRecord {
                ty: TypeName::from_name(ty),
            }),
            AnnotationShape::Unrecognized => None,
        })
        .collect()
}
