//! The class hierarchy registry.
//!
//! `TypeRegistry` owns every class and code body the front end knows about,
//! keyed by `TypeName`. It starts out holding the bootstrap types and grows
//! as the translator defines classes, fields, methods and bodies.
//!
//! # Design
//!
//! - `FxHashMap` for O(1) lookup, plus an insertion-order list so iteration
//!   is deterministic
//! - Redefinition replaces the entry in place and keeps its original
//!   position in iteration order
//! - Inner-type linking happens when a class is defined and is delegated to
//!   an `InnerLinkPolicy`; see [`link_if_outer_defined`]

use std::collections::hash_map::Entry;
use std::fmt;

use pyl_ir::{Entity, Name, SharedInterner, Span, StringInterner, TypeName};
use rustc_hash::FxHashMap;

use crate::{
    BuiltinType, ClassOrigin, ClassRecord, CodeBodyRecord, FieldFlags, FieldRecord,
    InvariantError, MethodReference, TypeEntry,
};

/// Decides which existing class, if any, a newly defined class is nested in.
///
/// Called once per `define_class`, after the new record is inserted.
pub type InnerLinkPolicy = fn(&mut TypeRegistry, TypeName);

/// Registry of classes and code bodies.
#[derive(Clone)]
pub struct TypeRegistry {
    interner: SharedInterner,
    types: FxHashMap<TypeName, TypeEntry>,
    /// Names in first-insertion order.
    order: Vec<TypeName>,
    /// Interned names of the bootstrap types, indexed by `BuiltinType`.
    builtins: [TypeName; BuiltinType::ALL.len()],
    inner_link: InnerLinkPolicy,
}

impl TypeRegistry {
    /// A registry holding only the bootstrap types.
    pub fn new(interner: SharedInterner) -> Self {
        Self::with_inner_link_policy(interner, link_if_outer_defined)
    }

    /// Like [`new`](Self::new), with a custom inner-type linking policy.
    pub fn with_inner_link_policy(interner: SharedInterner, inner_link: InnerLinkPolicy) -> Self {
        let builtins = BuiltinType::ALL.map(|builtin| TypeName::intern(&interner, builtin.name()));
        let mut registry = TypeRegistry {
            interner,
            types: FxHashMap::default(),
            order: Vec::with_capacity(BuiltinType::ALL.len()),
            builtins,
            inner_link,
        };
        for builtin in BuiltinType::ALL {
            let super_name = builtin.super_type().map(|ty| registry.builtin(ty));
            registry.register_builtin(registry.builtin(builtin), super_name);
        }
        registry
    }

    /// The interner all names in this registry come from.
    #[inline]
    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    /// A handle to the interner, for sharing with other components.
    #[inline]
    pub fn shared_interner(&self) -> SharedInterner {
        self.interner.clone()
    }

    /// Name of a bootstrap type.
    #[inline]
    pub fn builtin(&self, builtin: BuiltinType) -> TypeName {
        self.builtins[builtin.index()]
    }

    // Defining

    /// Register a class that needs no inner-type linking.
    pub fn register_builtin(
        &mut self,
        name: TypeName,
        super_name: Option<TypeName>,
    ) -> &ClassRecord {
        let record = ClassRecord::new(name, super_name, Span::DUMMY, ClassOrigin::Builtin);
        self.insert_class(record)
    }

    /// Register the placeholder class for one module entry.
    ///
    /// Its super is `EmptyScript`. Placeholders are not linked into any
    /// outer class.
    pub fn register_script_placeholder(&mut self, name: TypeName) -> &ClassRecord {
        let super_name = Some(self.builtin(BuiltinType::EmptyScript));
        let record = ClassRecord::new(name, super_name, Span::DUMMY, ClassOrigin::Script);
        self.insert_class(record)
    }

    /// Define a class from source and link it to its outer class.
    ///
    /// Linking runs only now: a nested class defined before its outer one
    /// stays unlinked.
    #[tracing::instrument(level = "trace", skip_all, fields(class = name.as_str(&self.interner)))]
    pub fn define_class(&mut self, name: TypeName, super_name: TypeName, span: Span) -> &ClassRecord {
        let record = ClassRecord::new(name, Some(super_name), span, ClassOrigin::Declared);
        self.insert_class(record);
        (self.inner_link)(self, name);
        self.expect_class(name)
    }

    /// Add a public static untyped field to a registered class.
    ///
    /// A field with the same name already on the class is kept.
    pub fn define_field(
        &mut self,
        class: TypeName,
        field: &Entity,
    ) -> Result<&FieldRecord, InvariantError> {
        let record = FieldRecord {
            name: field.name,
            declaring_class: class,
            ty: self.builtin(BuiltinType::Root),
            flags: FieldFlags::STATIC | FieldFlags::PUBLIC,
        };
        let owner = self.class_mut(class)?;
        Ok(&*owner.static_fields.entry(field.name).or_insert(record))
    }

    /// Record that `container` has a method `method` implemented by `code_body`.
    pub fn define_method_reference(
        &mut self,
        code_body: TypeName,
        method: Name,
        container: TypeName,
    ) -> Result<MethodReference, InvariantError> {
        let reference = MethodReference::new(code_body, method);
        self.class_mut(container)?.method_refs.insert(reference);
        Ok(reference)
    }

    // Queries

    pub fn lookup(&self, name: TypeName) -> Option<&TypeEntry> {
        self.types.get(&name)
    }

    pub fn class(&self, name: TypeName) -> Option<&ClassRecord> {
        self.lookup(name).and_then(TypeEntry::as_class)
    }

    pub fn code_body(&self, name: TypeName) -> Option<&CodeBodyRecord> {
        self.lookup(name).and_then(TypeEntry::as_code_body)
    }

    #[inline]
    pub fn contains(&self, name: TypeName) -> bool {
        self.types.contains_key(&name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// All entries in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeEntry> {
        self.order.iter().filter_map(|name| self.types.get(name))
    }

    /// All registered names in first-insertion order.
    pub fn names(&self) -> impl Iterator<Item = TypeName> + '_ {
        self.order.iter().copied()
    }

    /// Registered ancestors of `name`, nearest first.
    ///
    /// Stops at the first super name that is not registered.
    pub fn superclasses(&self, name: TypeName) -> Superclasses<'_> {
        Superclasses {
            registry: self,
            next: self.lookup(name).and_then(TypeEntry::super_name),
            remaining: self.len(),
        }
    }

    /// Whether `name` is `ancestor` or inherits from it.
    pub fn is_subtype_of(&self, name: TypeName, ancestor: TypeName) -> bool {
        name == ancestor || self.superclasses(name).any(|entry| entry.name() == ancestor)
    }

    // Internals

    /// Insert or replace an entry, keeping first-insertion order.
    pub(crate) fn insert_entry(&mut self, entry: TypeEntry) -> &mut TypeEntry {
        let name = entry.name();
        match self.types.entry(name) {
            Entry::Occupied(mut slot) => {
                tracing::trace!(name = name.as_str(&self.interner), "redefined");
                slot.insert(entry);
                slot.into_mut()
            }
            Entry::Vacant(slot) => {
                self.order.push(name);
                slot.insert(entry)
            }
        }
    }

    fn insert_class(&mut self, record: ClassRecord) -> &ClassRecord {
        match self.insert_entry(TypeEntry::Class(record)) {
            TypeEntry::Class(class) => class,
            TypeEntry::CodeBody(_) => unreachable!("class entry was just inserted"),
        }
    }

    fn expect_class(&self, name: TypeName) -> &ClassRecord {
        match self.types.get(&name) {
            Some(TypeEntry::Class(class)) => class,
            _ => unreachable!("class entry was just inserted"),
        }
    }

    /// A registered class, or the invariant it violates.
    pub(crate) fn require_class(&self, name: TypeName) -> Result<&ClassRecord, InvariantError> {
        match self.types.get(&name) {
            Some(TypeEntry::Class(class)) => Ok(class),
            Some(TypeEntry::CodeBody(_)) => Err(InvariantError::NotAClass {
                name: name.display(&self.interner),
            }),
            None => Err(InvariantError::UnknownClass {
                name: name.display(&self.interner),
            }),
        }
    }

    pub(crate) fn class_mut(&mut self, name: TypeName) -> Result<&mut ClassRecord, InvariantError> {
        match self.types.get_mut(&name) {
            Some(TypeEntry::Class(class)) => Ok(class),
            Some(TypeEntry::CodeBody(_)) => Err(InvariantError::NotAClass {
                name: name.display(&self.interner),
            }),
            None => Err(InvariantError::UnknownClass {
                name: name.display(&self.interner),
            }),
        }
    }

    pub(crate) fn code_body_mut(
        &mut self,
        name: TypeName,
    ) -> Result<&mut CodeBodyRecord, InvariantError> {
        match self.types.get_mut(&name) {
            Some(TypeEntry::CodeBody(body)) => Ok(body),
            Some(TypeEntry::Class(_)) => Err(InvariantError::NotACodeBody {
                name: name.display(&self.interner),
            }),
            None => Err(InvariantError::UnknownCodeBody {
                name: name.display(&self.interner),
            }),
        }
    }
}

/// Default inner-type linking: if the name has an outer part (text before
/// the last `/`, non-empty) and a class with that name is registered right
/// now, add the new class to its inner types.
///
/// The result depends on definition order. An outer class defined after
/// its inner one never learns about it.
pub fn link_if_outer_defined(registry: &mut TypeRegistry, inner: TypeName) {
    let Some(outer) = inner.outer(&registry.interner) else {
        return;
    };
    match registry.types.get_mut(&outer) {
        Some(TypeEntry::Class(class)) => {
            class.inner_types.insert(inner);
            tracing::trace!(
                inner = inner.as_str(&registry.interner),
                outer = outer.as_str(&registry.interner),
                "linked inner class"
            );
        }
        Some(TypeEntry::CodeBody(_)) | None => {}
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("len", &self.types.len())
            .finish_non_exhaustive()
    }
}

/// Iterator over a type's registered ancestors.
///
/// Bounded by the registry size, so a cyclic super chain cannot loop.
pub struct Superclasses<'a> {
    registry: &'a TypeRegistry,
    next: Option<TypeName>,
    remaining: usize,
}

impl<'a> Iterator for Superclasses<'a> {
    type Item = &'a TypeEntry;

    fn next(&mut self) -> Option<&'a TypeEntry> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let entry = self.registry.lookup(self.next?)?;
        self.next = entry.super_name();
        Some(entry)
    }
}
