//! Field definitions for protobuf messages.
//!
//! This module contains the data structures representing message fields,
//! map entries and oneof groups.

use crate::types::TargetIdent;
use std::fmt;

/// Wire-level kind of a field, numbered as in `descriptor.proto`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// `double`.
    Double,
    /// `float`.
    Float,
    /// `int64`.
    Int64,
    /// `uint64`.
    Uint64,
    /// `int32`.
    Int32,
    /// `fixed64`.
    Fixed64,
    /// `fixed32`.
    Fixed32,
    /// `bool`.
    Bool,
    /// `string`.
    String,
    /// proto2 `group`.
    Group,
    /// Message reference.
    Message,
    /// `bytes`.
    Bytes,
    /// `uint32`.
    Uint32,
    /// Enum reference.
    Enum,
    /// `sfixed32`.
    Sfixed32,
    /// `sfixed64`.
    Sfixed64,
    /// `sint32`.
    Sint32,
    /// `sint64`.
    Sint64,
    /// A type number this crate does not know.
    Other(i32),
}

impl FieldKind {
    /// Converts a `FieldDescriptorProto.Type` number.
    #[must_use]
    pub const fn from_i32(value: i32) -> Self {
        match value {
            1 => Self::Double,
            2 => Self::Float,
            3 => Self::Int64,
            4 => Self::Uint64,
            5 => Self::Int32,
            6 => Self::Fixed64,
            7 => Self::Fixed32,
            8 => Self::Bool,
            9 => Self::String,
            10 => Self::Group,
            11 => Self::Message,
            12 => Self::Bytes,
            13 => Self::Uint32,
            14 => Self::Enum,
            15 => Self::Sfixed32,
            16 => Self::Sfixed64,
            17 => Self::Sint32,
            18 => Self::Sint64,
            other => Self::Other(other),
        }
    }

    /// Returns the `FieldDescriptorProto.Type` number.
    #[must_use]
    pub const fn as_i32(&self) -> i32 {
        match self {
            Self::Double => 1,
            Self::Float => 2,
            Self::Int64 => 3,
            Self::Uint64 => 4,
            Self::Int32 => 5,
            Self::Fixed64 => 6,
            Self::Fixed32 => 7,
            Self::Bool => 8,
            Self::String => 9,
            Self::Group => 10,
            Self::Message => 11,
            Self::Bytes => 12,
            Self::Uint32 => 13,
            Self::Enum => 14,
            Self::Sfixed32 => 15,
            Self::Sfixed64 => 16,
            Self::Sint32 => 17,
            Self::Sint64 => 18,
            Self::Other(value) => *value,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Double => "double",
            Self::Float => "float",
            Self::Int64 => "int64",
            Self::Uint64 => "uint64",
            Self::Int32 => "int32",
            Self::Fixed64 => "fixed64",
            Self::Fixed32 => "fixed32",
            Self::Bool => "bool",
            Self::String => "string",
            Self::Group => "group",
            Self::Message => "message",
            Self::Bytes => "bytes",
            Self::Uint32 => "uint32",
            Self::Enum => "enum",
            Self::Sfixed32 => "sfixed32",
            Self::Sfixed64 => "sfixed64",
            Self::Sint32 => "sint32",
            Self::Sint64 => "sint64",
            Self::Other(value) => return write!(f, "type({value})"),
        };
        f.write_str(name)
    }
}

/// Field label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cardinality {
    /// Singular field (`optional` or no label).
    #[default]
    Optional,
    /// proto2 `required`.
    Required,
    /// `repeated`, also used by map fields.
    Repeated,
}

/// Key and value of a map field.
///
/// The schema models these as a synthetic two-field entry message; upstream
/// hands them over already unpacked.
#[derive(Debug, Clone)]
pub struct MapEntry {
    /// Key field (number 1).
    pub key: FieldDescriptor,
    /// Value field (number 2).
    pub value: FieldDescriptor,
}

/// Field definition.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// Fully-qualified name.
    pub full_name: String,
    /// Name assigned upstream for the generated member.
    pub name: String,
    /// Field number.
    pub number: i32,
    /// Field kind.
    pub kind: FieldKind,
    /// Label.
    pub cardinality: Cardinality,
    /// Fully-qualified name of the referenced message or enum.
    pub type_name: Option<String>,
    /// Index into the owning message's oneofs.
    pub oneof_index: Option<usize>,
    /// Unpacked entry, for map fields only.
    pub map_entry: Option<Box<MapEntry>>,
    /// Identifier of the generated oneof variant wrapping this field.
    pub ident: Option<TargetIdent>,
}

impl FieldDescriptor {
    /// Creates a new singular field.
    #[must_use]
    pub fn new(
        full_name: impl Into<String>,
        name: impl Into<String>,
        number: i32,
        kind: FieldKind,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            name: name.into(),
            number,
            kind,
            cardinality: Cardinality::Optional,
            type_name: None,
            oneof_index: None,
            map_entry: None,
            ident: None,
        }
    }

    /// Marks the field as repeated.
    #[must_use]
    pub fn repeated(mut self) -> Self {
        self.cardinality = Cardinality::Repeated;
        self
    }

    /// Sets the referenced message or enum.
    #[must_use]
    pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    /// Places the field in a oneof of its owning message.
    #[must_use]
    pub fn with_oneof(mut self, index: usize) -> Self {
        self.oneof_index = Some(index);
        self
    }

    /// Turns the field into a map field.
    #[must_use]
    pub fn with_map_entry(mut self, key: FieldDescriptor, value: FieldDescriptor) -> Self {
        self.kind = FieldKind::Message;
        self.cardinality = Cardinality::Repeated;
        self.map_entry = Some(Box::new(MapEntry { key, value }));
        self
    }

    /// Sets the variant identifier used when the field is a oneof alternative.
    #[must_use]
    pub fn with_ident(mut self, ident: TargetIdent) -> Self {
        self.ident = Some(ident);
        self
    }

    /// Returns true for map fields.
    #[must_use]
    pub fn is_map(&self) -> bool {
        self.map_entry.is_some()
    }

    /// Returns true for repeated fields that are not maps.
    #[must_use]
    pub fn is_list(&self) -> bool {
        self.cardinality == Cardinality::Repeated && !self.is_map()
    }
}

/// Oneof group definition.
#[derive(Debug, Clone)]
pub struct OneofDescriptor {
    /// Fully-qualified name.
    pub full_name: String,
    /// Name assigned upstream for the merged member.
    pub name: String,
    /// Identifier of the generated oneof type.
    pub ident: TargetIdent,
    /// True when the group only exists to give a proto3 `optional` field
    /// explicit presence.
    pub synthetic: bool,
}

impl OneofDescriptor {
    /// Creates a new oneof.
    #[must_use]
    pub fn new(full_name: impl Into<String>, name: impl Into<String>, ident: TargetIdent) -> Self {
        Self {
            full_name: full_name.into(),
            name: name.into(),
            ident,
            synthetic: false,
        }
    }

    /// Creates the synthetic oneof backing a proto3 `optional` field.
    #[must_use]
    pub fn synthetic(
        full_name: impl Into<String>,
        name: impl Into<String>,
        ident: TargetIdent,
    ) -> Self {
        Self {
            synthetic: true,
            ..Self::new(full_name, name, ident)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_kind_numbers() {
        for value in 1..=18 {
            assert_eq!(FieldKind::from_i32(value).as_i32(), value);
        }
        assert_eq!(FieldKind::from_i32(5), FieldKind::Int32);
        assert_eq!(FieldKind::from_i32(0), FieldKind::Other(0));
        assert_eq!(FieldKind::from_i32(42).as_i32(), 42);
    }

    #[test]
    fn test_field_kind_display() {
        assert_eq!(FieldKind::Sfixed64.to_string(), "sfixed64");
        assert_eq!(FieldKind::Other(99).to_string(), "type(99)");
    }

    #[test]
    fn test_map_field_is_not_list() {
        let key = FieldDescriptor::new("pkg.M.CountsEntry.key", "key", 1, FieldKind::String);
        let value = FieldDescriptor::new("pkg.M.CountsEntry.value", "value", 2, FieldKind::Int32);
        let field = FieldDescriptor::new("pkg.M.counts", "counts", 1, FieldKind::Message)
            .with_map_entry(key, value);

        assert!(field.is_map());
        assert!(!field.is_list());
        assert_eq!(field.cardinality, Cardinality::Repeated);
    }

    #[test]
    fn test_synthetic_oneof() {
        let oneof = OneofDescriptor::synthetic("pkg.M._x", "_x", TargetIdent::new("", "X"));
        assert!(oneof.synthetic);
        assert!(!OneofDescriptor::new("pkg.M.o", "o", TargetIdent::default()).synthetic);
    }
}
