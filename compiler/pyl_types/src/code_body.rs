//! Declaring and defining code bodies.
//!
//! Functions, methods, lambdas and comprehensions are each registered as a
//! code body in two steps. The translator first declares the body, which
//! makes its type name usable by anything translated afterwards. Once the
//! body's IR is built, `attach_code` stores it on the declared record.

use pyl_ir::{Entity, Span, TypeName};
use rustc_hash::FxHashSet;

use crate::annotation::extract_annotations;
use crate::{
    BuiltinType, CodeBodyRecord, CompiledUnit, InvariantError, MethodReference, TypeEntry,
    TypeRegistry,
};

impl TypeRegistry {
    /// Declare a free-standing function body.
    ///
    /// The entity's first supertype names its code-body kind, which must be
    /// one of the built-in code-body types. Annotations are not collected
    /// for functions.
    pub fn declare_function_type(
        &mut self,
        name: TypeName,
        span: Span,
        entity: &Entity,
    ) -> Result<&CodeBodyRecord, InvariantError> {
        let kind = entity
            .first_supertype()
            .ok_or_else(|| InvariantError::MissingSupertype {
                name: name.display(self.interner()),
            })?;
        let supertype = TypeName::from_name(kind);
        if !self.contains(supertype) {
            return Err(InvariantError::UnknownSupertype {
                name: name.display(self.interner()),
                supertype: supertype.display(self.interner()),
            });
        }
        if !self.is_code_body_kind(supertype) {
            return Err(InvariantError::NotACodeBodyKind {
                name: name.display(self.interner()),
                supertype: supertype.display(self.interner()),
            });
        }
        let record = new_code_body(name, supertype, span, entity);
        Ok(self.insert_code_body(record))
    }

    /// Declare a method body and register it on `owner`.
    ///
    /// Methods are always plain `CodeBody` instances. The method reference
    /// is keyed by the function type, the entity's simple name and the one
    /// shared descriptor, whatever the receiver.
    pub fn declare_method_type(
        &mut self,
        name: TypeName,
        span: Span,
        entity: &Entity,
        owner: TypeName,
    ) -> Result<&CodeBodyRecord, InvariantError> {
        self.require_class(owner)?;
        let record = CodeBodyRecord {
            container: Some(owner),
            annotations: extract_annotations(entity, self.interner()),
            ..new_code_body(name, self.builtin(BuiltinType::CodeBody), span, entity)
        };
        self.insert_code_body(record);
        self.class_mut(owner)?
            .method_refs
            .insert(MethodReference::new(name, entity.name));
        tracing::trace!(
            method = name.as_str(self.interner()),
            owner = owner.as_str(self.interner()),
            "declared method"
        );
        self.code_body(name).ok_or_else(|| InvariantError::UnknownCodeBody {
            name: name.display(self.interner()),
        })
    }

    /// Store the translated body of a declared code body.
    ///
    /// Attaching again replaces the earlier unit.
    pub fn attach_code(
        &mut self,
        name: TypeName,
        unit: CompiledUnit,
        default_argument_count: usize,
    ) -> Result<&CodeBodyRecord, InvariantError> {
        let interner = self.shared_interner();
        let record = self.code_body_mut(name)?;
        if record.body.is_some() {
            tracing::debug!(
                code_body = name.as_str(&interner),
                "replacing previously attached body"
            );
        }
        record.body = Some(unit);
        record.default_argument_count = default_argument_count;
        Ok(&*record)
    }

    /// Whether `name` is one of the built-in code-body kinds.
    fn is_code_body_kind(&self, name: TypeName) -> bool {
        BuiltinType::ALL
            .iter()
            .any(|&builtin| builtin.is_code_body_kind() && self.builtin(builtin) == name)
    }

    fn insert_code_body(&mut self, record: CodeBodyRecord) -> &CodeBodyRecord {
        match self.insert_entry(TypeEntry::CodeBody(record)) {
            TypeEntry::CodeBody(body) => body,
            TypeEntry::Class(_) => unreachable!("code body entry was just inserted"),
        }
    }
}

/// A declared, bodiless record with no container or annotations.
fn new_code_body(
    name: TypeName,
    supertype: TypeName,
    span: Span,
    entity: &Entity,
) -> CodeBodyRecord {
    CodeBodyRecord {
        name,
        supertype,
        container: None,
        span,
        argument_names: entity.argument_names.clone(),
        annotations: FxHashSet::default(),
        body: None,
        default_argument_count: 0,
    }
}
