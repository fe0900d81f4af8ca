//! Parsed declarations.
//!
//! An `Entity` is what the parser produces for each declaration it finds:
//! a script (one per source file), a function or method, a class, or a
//! field. Entities nest: a script holds its classes and functions, a class
//! holds its methods and fields.

use rustc_hash::FxHashMap;

use crate::{CastArena, Name, NodeId, Span};

/// What an entity declares.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum EntityKind {
    /// Top-level code of one source file.
    Script,
    /// Function, method, lambda or comprehension body.
    Function,
    /// Class declaration.
    Type,
    /// Class-level field (`x = 1` in a class body).
    Field,
}

/// Annotation attached to an entity, as the parser saw it.
///
/// The payload is untyped: each argument is a subtree in the owning
/// entity's arena, keyed by argument name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CastAnnotation {
    /// Annotation type, e.g. the dynamic-annotation marker.
    pub ty: Name,
    /// Named argument subtrees.
    pub arguments: FxHashMap<Name, NodeId>,
}

impl CastAnnotation {
    /// Annotation with no arguments.
    pub fn new(ty: Name) -> Self {
        CastAnnotation {
            ty,
            arguments: FxHashMap::default(),
        }
    }

    /// Add a named argument.
    #[must_use]
    pub fn with_argument(mut self, name: Name, node: NodeId) -> Self {
        self.arguments.insert(name, node);
        self
    }

    /// Look up an argument subtree.
    pub fn argument(&self, name: Name) -> Option<NodeId> {
        self.arguments.get(&name).copied()
    }
}

/// A parsed declaration and, for code-bearing entities, its tree.
#[derive(Clone, Debug)]
pub struct Entity {
    pub kind: EntityKind,
    pub name: Name,
    pub span: Span,
    /// Declared supertypes. Code bodies declare exactly one: their
    /// code-body kind (`CodeBody`, `lambda`, `comprehension`, ...).
    pub supertypes: Vec<Name>,
    /// Parameter names in declaration order.
    pub argument_names: Vec<Name>,
    /// Entities declared in this entity's scope.
    pub scoped: Vec<Entity>,
    pub annotations: Vec<CastAnnotation>,
    /// Tree storage for the body and annotation payloads.
    pub arena: CastArena,
    /// Root of the body, if the entity has one.
    pub ast: Option<NodeId>,
}

impl Entity {
    /// Create an entity with no supertypes, arguments, children or body.
    pub fn new(kind: EntityKind, name: Name) -> Self {
        Entity {
            kind,
            name,
            span: Span::DUMMY,
            supertypes: Vec::new(),
            argument_names: Vec::new(),
            scoped: Vec::new(),
            annotations: Vec::new(),
            arena: CastArena::new(),
            ast: None,
        }
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    #[must_use]
    pub fn with_supertype(mut self, supertype: Name) -> Self {
        self.supertypes.push(supertype);
        self
    }

    #[must_use]
    pub fn with_arguments(mut self, names: impl IntoIterator<Item = Name>) -> Self {
        self.argument_names.extend(names);
        self
    }

    #[must_use]
    pub fn with_scoped(mut self, child: Entity) -> Self {
        self.scoped.push(child);
        self
    }

    #[must_use]
    pub fn with_annotation(mut self, annotation: CastAnnotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Install a body tree built in `arena`.
    ///
    /// Annotation payloads must be allocated in the same arena, so call
    /// this before attaching annotations that refer to its nodes.
    #[must_use]
    pub fn with_body(mut self, arena: CastArena, root: NodeId) -> Self {
        self.arena = arena;
        self.ast = Some(root);
        self
    }

    /// Number of declared parameters.
    #[inline]
    pub fn argument_count(&self) -> usize {
        self.argument_names.len()
    }

    /// The first declared supertype, if any.
    #[inline]
    pub fn first_supertype(&self) -> Option<Name> {
        self.supertypes.first().copied()
    }
}
