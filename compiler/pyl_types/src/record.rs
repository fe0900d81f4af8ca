//! Registry entries: classes, code bodies and the records they own.

use std::fmt;

use bitflags::bitflags;
use pyl_ir::{Name, Span, TypeName};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

/// Where a class came from.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ClassOrigin {
    /// Created with the registry.
    Builtin,
    /// Placeholder standing in for one module entry.
    Script,
    /// Declared in translated source.
    Declared,
}

/// A registered class.
///
/// Fields, method references and inner types are unordered sets. Records
/// are only mutated through the registry so that defining operations keep
/// their linking side effects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassRecord {
    pub name: TypeName,
    /// `None` only for `Root`.
    pub super_name: Option<TypeName>,
    pub span: Span,
    pub origin: ClassOrigin,
    pub(crate) static_fields: FxHashMap<Name, FieldRecord>,
    pub(crate) method_refs: FxHashSet<MethodReference>,
    pub(crate) inner_types: FxHashSet<TypeName>,
}

impl ClassRecord {
    pub(crate) fn new(
        name: TypeName,
        super_name: Option<TypeName>,
        span: Span,
        origin: ClassOrigin,
    ) -> Self {
        ClassRecord {
            name,
            super_name,
            span,
            origin,
            static_fields: FxHashMap::default(),
            method_refs: FxHashSet::default(),
            inner_types: FxHashSet::default(),
        }
    }

    /// Static field by name.
    pub fn static_field(&self, name: Name) -> Option<&FieldRecord> {
        self.static_fields.get(&name)
    }

    /// All static fields, in no particular order.
    pub fn static_fields(&self) -> impl Iterator<Item = &FieldRecord> {
        self.static_fields.values()
    }

    /// Methods declared on this class.
    pub fn method_refs(&self) -> &FxHashSet<MethodReference> {
        &self.method_refs
    }

    /// Classes linked as nested in this one.
    pub fn inner_types(&self) -> &FxHashSet<TypeName> {
        &self.inner_types
    }
}

bitflags! {
    /// Modifiers of a field.
    ///
    /// Synthesized class fields are always `STATIC | PUBLIC`; nothing in
    /// the front end ever sets `FINAL`.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct FieldFlags: u8 {
        const STATIC = 1 << 0;
        const PUBLIC = 1 << 1;
        const PRIVATE = 1 << 2;
        const FINAL = 1 << 3;
        const VOLATILE = 1 << 4;
    }
}

/// A class-level field.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct FieldRecord {
    pub name: Name,
    pub declaring_class: TypeName,
    /// Declared type; fields are untyped, so this is always `Root`.
    pub ty: TypeName,
    pub flags: FieldFlags,
}

impl FieldRecord {
    #[inline]
    pub fn is_static(&self) -> bool {
        self.flags.contains(FieldFlags::STATIC)
    }

    #[inline]
    pub fn is_public(&self) -> bool {
        self.flags.contains(FieldFlags::PUBLIC)
    }

    #[inline]
    pub fn is_final(&self) -> bool {
        self.flags.contains(FieldFlags::FINAL)
    }
}

/// Call descriptor of a method reference.
///
/// There is exactly one: no declared parameters, returns `Root`. Receiver
/// and arguments are handled dynamically, so every method shares it.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum MethodDescriptor {
    #[default]
    Function,
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MethodDescriptor::Function => f.write_str("()Root"),
        }
    }
}

/// Identity of a method on a class.
///
/// Two references are equal iff all three components are equal.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct MethodReference {
    /// Type name of the function body implementing the method.
    pub code_body: TypeName,
    /// Simple method name as declared in the class body.
    pub method: Name,
    pub descriptor: MethodDescriptor,
}

impl MethodReference {
    pub fn new(code_body: TypeName, method: Name) -> Self {
        MethodReference {
            code_body,
            method,
            descriptor: MethodDescriptor::Function,
        }
    }
}

/// Type-level annotation on a method, e.g. from a decorator.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct AnnotationRecord {
    pub ty: TypeName,
}

/// Handle to the control-flow graph built for a code body.
///
/// The graph itself lives in the IR builder; the registry only stores the
/// handle.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct CfgHandle(pub u32);

/// Names a body exposes to, or reads from, enclosing scopes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LexicalInfo {
    /// `(variable, defining scope)` pairs read or written lexically.
    pub exposed_names: Vec<(Name, TypeName)>,
    /// Enclosing scopes, innermost first.
    pub parents: Vec<TypeName>,
}

/// Translated body of a function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompiledUnit {
    pub cfg: CfgHandle,
    pub has_catch_block: bool,
    /// Caught exception types keyed by basic-block number.
    pub caught_types: FxHashMap<u32, SmallVec<[TypeName; 2]>>,
    pub has_monitor_op: bool,
    pub lexical: LexicalInfo,
}

impl CompiledUnit {
    /// A unit with no handlers, no monitors and no lexical accesses.
    pub fn new(cfg: CfgHandle) -> Self {
        CompiledUnit {
            cfg,
            has_catch_block: false,
            caught_types: FxHashMap::default(),
            has_monitor_op: false,
            lexical: LexicalInfo::default(),
        }
    }
}

/// A registered function, method, lambda or comprehension body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeBodyRecord {
    pub name: TypeName,
    /// The code-body kind this body is an instance of.
    pub supertype: TypeName,
    /// Owning class for methods.
    pub container: Option<TypeName>,
    pub span: Span,
    pub argument_names: Vec<Name>,
    pub annotations: FxHashSet<AnnotationRecord>,
    /// Set once by `attach_code`; `None` while only declared.
    pub body: Option<CompiledUnit>,
    pub default_argument_count: usize,
}

impl CodeBodyRecord {
    /// Whether the body has been attached.
    #[inline]
    pub fn is_defined(&self) -> bool {
        self.body.is_some()
    }

    /// Whether this body is a method of some class.
    #[inline]
    pub fn is_method(&self) -> bool {
        self.container.is_some()
    }

    #[inline]
    pub fn argument_count(&self) -> usize {
        self.argument_names.len()
    }
}

/// Anything the registry can hold under a type name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeEntry {
    Class(ClassRecord),
    CodeBody(CodeBodyRecord),
}

impl TypeEntry {
    pub fn name(&self) -> TypeName {
        match self {
            TypeEntry::Class(class) => class.name,
            TypeEntry::CodeBody(body) => body.name,
        }
    }

    /// Super class name; a code body's super is its code-body kind.
    pub fn super_name(&self) -> Option<TypeName> {
        match self {
            TypeEntry::Class(class) => class.super_name,
            TypeEntry::CodeBody(body) => Some(body.supertype),
        }
    }

    pub fn span(&self) -> Span {
        match self {
            TypeEntry::Class(class) => class.span,
            TypeEntry::CodeBody(body) => body.span,
        }
    }

    pub fn as_class(&self) -> Option<&ClassRecord> {
        match self {
            TypeEntry::Class(class) => Some(class),
            TypeEntry::CodeBody(_) => None,
        }
    }

    pub fn as_code_body(&self) -> Option<&CodeBodyRecord> {
        match self {
            TypeEntry::CodeBody(body) => Some(body),
            TypeEntry::Class(_) => None,
        }
    }
}
