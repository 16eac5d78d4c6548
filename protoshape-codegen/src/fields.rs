//! Logical field model.
//!
//! A message's raw fields are grouped into [`LogicalField`]s, one per
//! generated member: plain fields map one to one, while all alternatives of a
//! oneof collapse into a single member named after the oneof.

use crate::cache::TypeCache;
use crate::error::{CodegenError, ConsistencyError};
use crate::target::{NamedKind, TargetType};
use parking_lot::Mutex;
use protoshape_schema::{FieldDescriptor, MessageDescriptor, OneofDescriptor};
use std::collections::HashMap;
use std::sync::Arc;

/// Getter method generated for a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accessor {
    /// Method name.
    pub name: String,
    /// Return type.
    pub result: TargetType,
}

/// Type information for one alternative of a oneof.
#[derive(Debug, Clone)]
pub struct Alternative<'a> {
    /// Raw field backing this alternative.
    pub field: &'a FieldDescriptor,
    /// Type of the field's value.
    pub ty: TargetType,
    /// Wrapper type for this alternative, if upstream assigned one.
    pub variant: Option<TargetType>,
    /// Getter returning `ty`.
    pub accessor: Accessor,
}

/// How a logical field was formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
    /// A single field outside any oneof.
    Plain,
    /// A proto3 `optional` field, modelled by the schema as a synthetic oneof
    /// with one member.
    Optional,
    /// A true oneof.
    Union,
}

#[derive(Debug)]
struct Resolution<'a> {
    ty: TargetType,
    accessor: Accessor,
    alternatives: Vec<Alternative<'a>>,
}

/// Raw fields behind a logical field.
#[derive(Debug)]
enum Membership<'a> {
    /// A field outside any oneof.
    Plain(&'a FieldDescriptor),
    /// Members of the oneof at `index`, in declaration order.
    Group {
        index: usize,
        oneof: &'a OneofDescriptor,
        fields: Vec<&'a FieldDescriptor>,
    },
}

/// One generated member of a message.
///
/// The type, accessor and alternatives are computed on first access and
/// memoized; concurrent first accesses run the computation once.
#[derive(Debug)]
pub struct LogicalField<'a> {
    cache: &'a TypeCache,
    name: String,
    membership: Membership<'a>,
    resolved: Mutex<Option<Arc<Resolution<'a>>>>,
}

impl<'a> LogicalField<'a> {
    fn new(cache: &'a TypeCache, name: String, membership: Membership<'a>) -> Self {
        Self {
            cache,
            name,
            membership,
            resolved: Mutex::new(None),
        }
    }

    /// Returns the member name: the oneof's name for merged fields, the
    /// field's own name otherwise.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the oneof, including synthetic ones.
    #[must_use]
    pub fn oneof(&self) -> Option<&'a OneofDescriptor> {
        match &self.membership {
            Membership::Plain(_) => None,
            Membership::Group { oneof, .. } => Some(*oneof),
        }
    }

    /// Returns the raw fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[&'a FieldDescriptor] {
        match &self.membership {
            Membership::Plain(field) => std::slice::from_ref(field),
            Membership::Group { fields, .. } => fields,
        }
    }

    /// Returns how this field was formed.
    #[must_use]
    pub fn shape(&self) -> FieldShape {
        match &self.membership {
            Membership::Plain(_) => FieldShape::Plain,
            Membership::Group { oneof, .. } if oneof.synthetic => FieldShape::Optional,
            Membership::Group { .. } => FieldShape::Union,
        }
    }

    /// Returns true for true oneofs.
    #[must_use]
    pub fn is_union(&self) -> bool {
        self.shape() == FieldShape::Union
    }

    /// Returns true for proto3 `optional` fields.
    #[must_use]
    pub fn is_optional(&self) -> bool {
        self.shape() == FieldShape::Optional
    }

    /// Returns the type returned by the getter: the oneof marker type for
    /// unions, the resolved field type otherwise.
    ///
    /// # Errors
    /// Returns a consistency error if a referenced type is not registered.
    pub fn ty(&self) -> Result<TargetType, CodegenError> {
        Ok(self.resolve()?.ty.clone())
    }

    /// Returns the getter (the generic one, for unions).
    ///
    /// # Errors
    /// Returns a consistency error if a referenced type is not registered.
    pub fn accessor(&self) -> Result<Accessor, CodegenError> {
        Ok(self.resolve()?.accessor.clone())
    }

    /// Returns one record per alternative; empty unless [`Self::is_union`].
    ///
    /// # Errors
    /// Returns a consistency error if a referenced type is not registered.
    pub fn alternatives(&self) -> Result<Vec<Alternative<'a>>, CodegenError> {
        Ok(self.resolve()?.alternatives.clone())
    }

    fn resolve(&self) -> Result<Arc<Resolution<'a>>, CodegenError> {
        let mut slot = self.resolved.lock();
        if let Some(resolution) = slot.as_ref() {
            return Ok(Arc::clone(resolution));
        }
        let resolution = Arc::new(self.compute()?);
        *slot = Some(Arc::clone(&resolution));
        Ok(resolution)
    }

    fn compute(&self) -> Result<Resolution<'a>, CodegenError> {
        let config = self.cache.config();

        let (ty, alternatives) = match &self.membership {
            Membership::Group { oneof, fields, .. } if !oneof.synthetic => {
                let marker = TargetType::named(oneof.ident.clone(), NamedKind::Oneof);
                let alternatives = fields
                    .iter()
                    .map(|&field| {
                        let ty = self.cache.field_type(field)?;
                        Ok::<_, CodegenError>(Alternative {
                            field,
                            variant: field
                                .ident
                                .clone()
                                .map(|ident| TargetType::named(ident, NamedKind::Variant)),
                            accessor: Accessor {
                                name: config.getter_name(&field.name),
                                result: ty.clone(),
                            },
                            ty,
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                (marker, alternatives)
            }
            Membership::Plain(field) => (self.cache.field_type(field)?, Vec::new()),
            // Synthetic groups hold the single optional field.
            Membership::Group { fields, .. } => (self.cache.field_type(fields[0])?, Vec::new()),
        };

        Ok(Resolution {
            accessor: Accessor {
                name: config.getter_name(&self.name),
                result: ty.clone(),
            },
            ty,
            alternatives,
        })
    }
}

impl TypeCache {
    /// Groups a message's fields into logical fields, merging oneof
    /// alternatives, in order of first appearance.
    ///
    /// # Errors
    /// Returns a consistency error if the cache is not finalized, a field
    /// points at a missing oneof, two fields sharing a logical name disagree
    /// on their oneof, or two plain fields share a name.
    pub fn message_fields<'a>(
        &'a self,
        message: &'a MessageDescriptor,
    ) -> Result<Vec<LogicalField<'a>>, CodegenError> {
        self.ensure_sealed()?;

        let mut members: Vec<LogicalField<'a>> = Vec::new();
        let mut seen: HashMap<&'a str, usize> = HashMap::new();

        for field in &message.fields {
            let oneof = match field.oneof_index {
                Some(index) => Some((
                    index,
                    message.oneof_of(field).ok_or_else(|| {
                        ConsistencyError::unregistered(
                            "oneof",
                            Some(format!("{}#{}", message.full_name, index).as_str()),
                        )
                    })?,
                )),
                None => None,
            };
            let name = oneof.map_or(field.name.as_str(), |(_, o)| o.name.as_str());

            let Some(idx) = seen.get(name).copied() else {
                let membership = match oneof {
                    Some((index, oneof)) => Membership::Group {
                        index,
                        oneof,
                        fields: vec![field],
                    },
                    None => Membership::Plain(field),
                };
                seen.insert(name, members.len());
                members.push(LogicalField::new(self, name.to_string(), membership));
                continue;
            };

            match (&mut members[idx].membership, oneof) {
                (Membership::Group { index, fields, .. }, Some((other, _))) if *index == other => {
                    fields.push(field);
                }
                (Membership::Plain(_), None) => {
                    return Err(ConsistencyError::DuplicateField {
                        field: field.full_name.clone(),
                        name: name.to_string(),
                    }
                    .into());
                }
                _ => {
                    return Err(ConsistencyError::InconsistentOneof {
                        field: field.full_name.clone(),
                        name: name.to_string(),
                    }
                    .into());
                }
            }
        }

        tracing::trace!(
            "Grouped {} fields of {} into {} members",
            message.fields.len(),
            message.full_name,
            members.len()
        );
        Ok(members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::Primitive;
    use protoshape_schema::{FieldKind, FileDescriptor, Syntax, TargetIdent};

    fn ident(name: &str) -> TargetIdent {
        TargetIdent::new("crate::pb", name)
    }

    fn create_test_file(syntax: Syntax) -> FileDescriptor {
        let mut msg = MessageDescriptor::new("pkg.Shape", ident("Shape"));
        let kind = msg.add_oneof(OneofDescriptor::new("pkg.Shape.kind", "kind", ident("Shape_Kind")));
        let maybe = msg.add_oneof(OneofDescriptor::synthetic(
            "pkg.Shape._label",
            "_label",
            ident("Shape_Label"),
        ));

        msg.add_field(
            FieldDescriptor::new("pkg.Shape.a", "a", 1, FieldKind::Int32)
                .with_oneof(kind)
                .with_ident(ident("Shape_A")),
        );
        msg.add_field(
            FieldDescriptor::new("pkg.Shape.b", "b", 2, FieldKind::Message)
                .with_type_name(".pkg.Shape")
                .with_oneof(kind)
                .with_ident(ident("Shape_B")),
        );
        msg.add_field(FieldDescriptor::new("pkg.Shape.c", "c", 3, FieldKind::String));
        msg.add_field(
            FieldDescriptor::new("pkg.Shape.label", "label", 4, FieldKind::String).with_oneof(maybe),
        );

        let mut file = FileDescriptor::new("shape.proto", "pkg", syntax);
        file.add_message(msg);
        file
    }

    fn loaded(file: &FileDescriptor) -> TypeCache {
        let mut cache = TypeCache::new();
        cache.add_file(file).expect("add file");
        cache.finalize();
        cache
    }

    #[test]
    fn test_oneof_merging() {
        let file = create_test_file(Syntax::Proto3);
        let cache = loaded(&file);
        let fields = cache.message_fields(&file.messages[0]).expect("fields");

        let names: Vec<_> = fields.iter().map(LogicalField::name).collect();
        assert_eq!(names, ["kind", "c", "_label"]);

        let kind = &fields[0];
        assert!(kind.is_union());
        assert_eq!(kind.fields().len(), 2);
        assert_eq!(kind.fields()[0].name, "a");
        assert_eq!(kind.fields()[1].name, "b");
        assert_eq!(kind.oneof().map(|o| o.name.as_str()), Some("kind"));

        let c = &fields[1];
        assert_eq!(c.shape(), FieldShape::Plain);
        assert!(c.oneof().is_none());
        assert_eq!(c.fields().len(), 1);
        assert!(c.alternatives().expect("alternatives").is_empty());
    }

    #[test]
    fn test_union_type_and_alternatives() {
        let file = create_test_file(Syntax::Proto3);
        let cache = loaded(&file);
        let fields = cache.message_fields(&file.messages[0]).expect("fields");
        let kind = &fields[0];

        let marker = TargetType::named(ident("Shape_Kind"), NamedKind::Oneof);
        assert_eq!(kind.ty().expect("type"), marker);
        assert_eq!(
            kind.accessor().expect("accessor"),
            Accessor {
                name: "get_kind".to_string(),
                result: marker,
            }
        );

        let alternatives = kind.alternatives().expect("alternatives");
        assert_eq!(alternatives.len(), 2);

        assert_eq!(alternatives[0].field.name, "a");
        assert_eq!(alternatives[0].ty, TargetType::Primitive(Primitive::I32));
        assert_eq!(alternatives[0].accessor.name, "get_a");
        assert_eq!(alternatives[0].accessor.result, TargetType::Primitive(Primitive::I32));
        assert_eq!(
            alternatives[0].variant,
            Some(TargetType::named(ident("Shape_A"), NamedKind::Variant))
        );

        let shape = TargetType::pointer(TargetType::named(ident("Shape"), NamedKind::Message));
        assert_eq!(alternatives[1].ty, shape);
        assert_eq!(alternatives[1].accessor.name, "get_b");
        assert_eq!(alternatives[1].accessor.result, shape);
    }

    #[test]
    fn test_synthetic_oneof_is_not_union() {
        let file = create_test_file(Syntax::Proto3);
        let cache = loaded(&file);
        let fields = cache.message_fields(&file.messages[0]).expect("fields");
        let label = &fields[2];

        assert!(!label.is_union());
        assert!(label.is_optional());
        assert_eq!(label.shape(), FieldShape::Optional);
        assert!(label.oneof().is_some_and(|o| o.synthetic));
        assert_eq!(label.ty().expect("type"), TargetType::Primitive(Primitive::String));
        assert_eq!(label.accessor().expect("accessor").name, "get__label");
        assert!(label.alternatives().expect("alternatives").is_empty());
    }

    #[test]
    fn test_plain_field_accessor() {
        let file = create_test_file(Syntax::Proto2);
        let cache = loaded(&file);
        let fields = cache.message_fields(&file.messages[0]).expect("fields");
        let c = &fields[1];

        let expected = TargetType::pointer(TargetType::Primitive(Primitive::String));
        assert_eq!(c.ty().expect("type"), expected);
        assert_eq!(
            c.accessor().expect("accessor"),
            Accessor {
                name: "get_c".to_string(),
                result: expected,
            }
        );
    }

    #[test]
    fn test_proto2_union_alternatives_are_pointers() {
        let file = create_test_file(Syntax::Proto2);
        let cache = loaded(&file);
        let fields = cache.message_fields(&file.messages[0]).expect("fields");
        let alternatives = fields[0].alternatives().expect("alternatives");
        assert_eq!(alternatives[0].ty, TargetType::pointer(TargetType::Primitive(Primitive::I32)));
    }

    #[test]
    fn test_accessor_prefix_from_config() {
        let file = create_test_file(Syntax::Proto3);
        let mut cache = TypeCache::with_config(crate::ModelConfig::new().accessor_prefix("Get"));
        cache.add_file(&file).expect("add file");
        cache.finalize();

        let fields = cache.message_fields(&file.messages[0]).expect("fields");
        assert_eq!(fields[1].accessor().expect("accessor").name, "Getc");
        let alternatives = fields[0].alternatives().expect("alternatives");
        assert_eq!(alternatives[1].accessor.name, "Getb");
    }

    #[test]
    fn test_inconsistent_oneof_is_fatal() {
        let mut msg = MessageDescriptor::new("pkg.Bad", ident("Bad"));
        let choice = msg.add_oneof(OneofDescriptor::new("pkg.Bad.choice", "choice", ident("Bad_Choice")));
        msg.add_field(FieldDescriptor::new("pkg.Bad.x", "x", 1, FieldKind::Bool).with_oneof(choice));
        msg.add_field(FieldDescriptor::new("pkg.Bad.choice", "choice", 2, FieldKind::Bool));
        let mut file = FileDescriptor::new("bad.proto", "pkg", Syntax::Proto3);
        file.add_message(msg);
        let cache = loaded(&file);

        let err = cache
            .message_fields(&file.messages[0])
            .expect_err("inconsistent");
        assert!(matches!(
            err,
            CodegenError::Consistency(ConsistencyError::InconsistentOneof { ref field, ref name })
                if field == "pkg.Bad.choice" && name == "choice"
        ));
    }

    #[test]
    fn test_duplicate_plain_name_is_fatal() {
        let mut msg = MessageDescriptor::new("pkg.Twice", ident("Twice"));
        msg.add_field(FieldDescriptor::new("pkg.Twice.x", "x", 1, FieldKind::Bool));
        msg.add_field(FieldDescriptor::new("pkg.Twice.x2", "x", 2, FieldKind::Bool));
        let mut file = FileDescriptor::new("twice.proto", "pkg", Syntax::Proto3);
        file.add_message(msg);
        let cache = loaded(&file);

        assert!(matches!(
            cache.message_fields(&file.messages[0]),
            Err(CodegenError::Consistency(ConsistencyError::DuplicateField { ref field, ref name }))
                if field == "pkg.Twice.x2" && name == "x"
        ));
    }

    #[test]
    fn test_missing_oneof_index() {
        let mut msg = MessageDescriptor::new("pkg.Bad", ident("Bad"));
        msg.add_field(FieldDescriptor::new("pkg.Bad.x", "x", 1, FieldKind::Bool).with_oneof(3));
        let mut file = FileDescriptor::new("bad.proto", "pkg", Syntax::Proto3);
        file.add_message(msg);
        let cache = loaded(&file);

        assert!(cache.message_fields(&file.messages[0]).is_err());
    }

    #[test]
    fn test_unregistered_reference_surfaces_lazily() {
        let mut msg = MessageDescriptor::new("pkg.Lazy", ident("Lazy"));
        msg.add_field(
            FieldDescriptor::new("pkg.Lazy.other", "other", 1, FieldKind::Message)
                .with_type_name(".elsewhere.Other"),
        );
        let mut file = FileDescriptor::new("lazy.proto", "pkg", Syntax::Proto3);
        file.add_message(msg);
        let cache = loaded(&file);

        let fields = cache.message_fields(&file.messages[0]).expect("grouping succeeds");
        let err = fields[0].ty().expect_err("unregistered");
        assert!(err.is_consistency());
        assert!(fields[0].accessor().is_err());
    }

    #[test]
    fn test_message_fields_requires_finalize() {
        let file = create_test_file(Syntax::Proto3);
        let mut cache = TypeCache::new();
        cache.add_file(&file).expect("add file");
        assert!(cache.message_fields(&file.messages[0]).is_err());
    }

    #[test]
    fn test_concurrent_first_access() {
        let file = create_test_file(Syntax::Proto3);
        let cache = loaded(&file);
        let fields = cache.message_fields(&file.messages[0]).expect("fields");
        let kind = &fields[0];

        let results: Vec<Arc<Resolution<'_>>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..16)
                .map(|_| scope.spawn(|| kind.resolve().expect("resolution")))
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().expect("reader thread"))
                .collect()
        });

        let first = &results[0];
        assert!(results.iter().all(|r| Arc::ptr_eq(r, first)));
        assert!(Arc::ptr_eq(first, &kind.resolve().expect("memoized")));

        let expected = TargetType::named(ident("Shape_Kind"), NamedKind::Oneof);
        assert_eq!(first.ty, expected);
        assert_eq!(kind.alternatives().expect("alternatives").len(), 2);
    }
}
