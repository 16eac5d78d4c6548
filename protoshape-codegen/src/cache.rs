//! Type resolution cache.
//!
//! The cache maps fully-qualified protobuf names to the identifiers assigned
//! to them upstream, and computes the target type of any field from them.
//! It has two phases: files are loaded with [`TypeCache::add_file`], then the
//! cache is sealed with [`TypeCache::finalize`] and only read afterwards.

use crate::config::ModelConfig;
use crate::error::{CodegenError, ConsistencyError};
use crate::target::{NamedKind, Primitive, TargetType};
use protoshape_schema::{
    EnumDescriptor, EnumValueDescriptor, FieldDescriptor, FieldKind, FileDescriptor,
    MessageDescriptor, Syntax, TargetIdent,
};
use std::collections::HashMap;
use std::collections::hash_map::Entry;

#[derive(Debug, Clone)]
struct Registered {
    ident: TargetIdent,
    kind: NamedKind,
}

/// Registry of target identifiers keyed by fully-qualified schema name.
///
/// The dialect of every field's owning file is recorded alongside, keyed by
/// the field's fully-qualified name.
#[derive(Debug, Default)]
pub struct TypeCache {
    config: ModelConfig,
    data: HashMap<String, Registered>,
    dialects: HashMap<String, Syntax>,
    sealed: bool,
}

impl TypeCache {
    /// Creates an empty cache with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty cache with the given settings.
    #[must_use]
    pub fn with_config(config: ModelConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Returns the settings used by this cache.
    #[must_use]
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Registers every message, enum and enum value defined in `file`,
    /// including nested ones at any depth.
    ///
    /// All files of a compilation unit should be added before the cache is
    /// finalized. Re-registering a name keeps the first identifier.
    ///
    /// # Errors
    /// Returns `ConsistencyError::CacheSealed` if the cache was finalized.
    pub fn add_file(&mut self, file: &FileDescriptor) -> Result<(), CodegenError> {
        if self.sealed {
            return Err(ConsistencyError::CacheSealed {
                file: file.name.clone(),
            }
            .into());
        }

        let before = self.data.len();
        for enum_desc in &file.enums {
            self.add_enum(enum_desc);
        }
        for message in &file.messages {
            self.add_message(message, file.syntax);
        }

        tracing::debug!(
            "Registered {} names from {} ({:?})",
            self.data.len() - before,
            file.name,
            file.syntax
        );
        Ok(())
    }

    /// Seals the cache, switching it to read-only mode.
    pub fn finalize(&mut self) {
        if !self.sealed {
            tracing::debug!("Type cache finalized with {} names", self.data.len());
            self.sealed = true;
        }
    }

    /// Returns true once the cache has been finalized.
    #[must_use]
    pub const fn is_finalized(&self) -> bool {
        self.sealed
    }

    /// Returns the number of registered names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Resolves a message to its named target type.
    ///
    /// # Errors
    /// Returns a consistency error if the cache is not finalized or the
    /// message was never registered.
    pub fn message_type(&self, message: &MessageDescriptor) -> Result<TargetType, CodegenError> {
        self.lookup(NamedKind::Message, Some(&message.full_name))
    }

    /// Resolves an enum to its named target type.
    ///
    /// # Errors
    /// Returns a consistency error if the cache is not finalized or the
    /// enum was never registered.
    pub fn enum_type(&self, enum_desc: &EnumDescriptor) -> Result<TargetType, CodegenError> {
        self.lookup(NamedKind::Enum, Some(&enum_desc.full_name))
    }

    /// Resolves an enum value to its named target item.
    ///
    /// # Errors
    /// Returns a consistency error if the cache is not finalized or the
    /// value was never registered.
    pub fn enum_value(&self, value: &EnumValueDescriptor) -> Result<TargetType, CodegenError> {
        self.lookup(NamedKind::EnumValue, Some(&value.full_name))
    }

    /// Computes the full target type of a field, including container and
    /// presence wrapping.
    ///
    /// Map fields resolve to a mapping of their key and value types. Other
    /// fields resolve by kind, then repeated fields become slices, then
    /// singular fields of non-proto3 files get a pointer unless already a
    /// pointer or slice.
    ///
    /// # Errors
    /// Returns a consistency error if the cache is not finalized, the field
    /// was not part of an added file, a referenced message or enum is not
    /// registered, or the kind is unknown.
    pub fn field_type(&self, field: &FieldDescriptor) -> Result<TargetType, CodegenError> {
        let syntax = self.dialect(field)?;

        if let Some(entry) = field.map_entry.as_deref() {
            let key = self.element_type(&entry.key)?;
            let value = self.element_type(&entry.value)?;
            return Ok(TargetType::map(key, value));
        }

        let mut ty = self.element_type(field)?;
        if field.is_list() {
            ty = TargetType::slice(ty);
        }
        if !syntax.is_proto3() && !ty.is_pointer() && !ty.is_slice() {
            ty = TargetType::pointer(ty);
        }
        Ok(ty)
    }

    /// Maps a field kind to its target type, without container or presence
    /// wrapping.
    fn element_type(&self, field: &FieldDescriptor) -> Result<TargetType, CodegenError> {
        let ty = match field.kind {
            FieldKind::Bool => Primitive::Bool.into(),
            FieldKind::String => Primitive::String.into(),
            FieldKind::Bytes => TargetType::bytes(),
            FieldKind::Int32 | FieldKind::Sint32 | FieldKind::Sfixed32 => Primitive::I32.into(),
            FieldKind::Int64 | FieldKind::Sint64 | FieldKind::Sfixed64 => Primitive::I64.into(),
            FieldKind::Uint32 | FieldKind::Fixed32 => Primitive::U32.into(),
            FieldKind::Uint64 | FieldKind::Fixed64 => Primitive::U64.into(),
            FieldKind::Float => Primitive::F32.into(),
            FieldKind::Double => Primitive::F64.into(),
            FieldKind::Message | FieldKind::Group => TargetType::pointer(
                self.lookup(NamedKind::Message, field.type_name.as_deref())?,
            ),
            FieldKind::Enum => self.lookup(NamedKind::Enum, field.type_name.as_deref())?,
            FieldKind::Other(_) => {
                return Err(ConsistencyError::UnknownFieldKind {
                    field: field.full_name.clone(),
                    kind: field.kind.to_string(),
                }
                .into());
            }
        };
        Ok(ty)
    }

    fn lookup(&self, kind: NamedKind, full_name: Option<&str>) -> Result<TargetType, CodegenError> {
        self.ensure_sealed()?;

        let found = full_name
            .and_then(|name| self.data.get(name.trim_start_matches('.')))
            .filter(|entry| entry.kind == kind && !entry.ident.is_empty());

        match found {
            Some(entry) => Ok(TargetType::named(entry.ident.clone(), kind)),
            None => Err(ConsistencyError::unregistered(kind_label(kind), full_name).into()),
        }
    }

    /// Returns the dialect of the file that owns `field`.
    fn dialect(&self, field: &FieldDescriptor) -> Result<Syntax, ConsistencyError> {
        self.ensure_sealed()?;
        self.dialects
            .get(field.full_name.trim_start_matches('.'))
            .copied()
            .ok_or_else(|| ConsistencyError::UnregisteredField {
                field: field.full_name.clone(),
            })
    }

    pub(crate) fn ensure_sealed(&self) -> Result<(), ConsistencyError> {
        if self.sealed {
            Ok(())
        } else {
            Err(ConsistencyError::CacheNotSealed)
        }
    }

    fn add_enum(&mut self, enum_desc: &EnumDescriptor) {
        self.register(&enum_desc.full_name, &enum_desc.ident, NamedKind::Enum);
        for value in &enum_desc.values {
            self.register(&value.full_name, &value.ident, NamedKind::EnumValue);
        }
    }

    fn add_message(&mut self, message: &MessageDescriptor, syntax: Syntax) {
        self.register(&message.full_name, &message.ident, NamedKind::Message);
        for field in &message.fields {
            self.dialects
                .entry(field.full_name.trim_start_matches('.').to_string())
                .or_insert(syntax);
        }
        for enum_desc in &message.enums {
            self.add_enum(enum_desc);
        }
        for nested in &message.messages {
            self.add_message(nested, syntax);
        }
    }

    fn register(&mut self, full_name: &str, ident: &TargetIdent, kind: NamedKind) {
        let name = full_name.trim_start_matches('.');
        match self.data.entry(name.to_string()) {
            Entry::Occupied(existing) => {
                let existing = existing.get();
                if existing.ident != *ident || existing.kind != kind {
                    tracing::warn!(
                        "Ignoring redefinition of {} as {} (registered as {})",
                        name,
                        ident,
                        existing.ident
                    );
                }
            }
            Entry::Vacant(slot) => {
                tracing::trace!("Registered {:?} {} -> {}", kind, name, ident);
                slot.insert(Registered {
                    ident: ident.clone(),
                    kind,
                });
            }
        }
    }
}

const fn kind_label(kind: NamedKind) -> &'static str {
    match kind {
        NamedKind::Message => "message",
        NamedKind::Enum => "enum",
        NamedKind::EnumValue => "enum value",
        NamedKind::Oneof => "oneof",
        NamedKind::Variant => "oneof variant",
    }
}
