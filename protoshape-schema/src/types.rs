//! Schema type definitions.
//!
//! This module contains the data structures representing protobuf schema
//! elements as handed over by the upstream loader: files, messages, enums and
//! enum values, each carrying the target identifier assigned to it upstream.

use crate::fields::{FieldDescriptor, OneofDescriptor};
use std::fmt;

/// Schema dialect of a `.proto` file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Syntax {
    /// `syntax = "proto2"` (the default when a file declares nothing).
    #[default]
    Proto2,
    /// `syntax = "proto3"`.
    Proto3,
    /// `edition = "..."`.
    Editions,
}

impl Syntax {
    /// Returns true for proto3, the only dialect with implicit-presence scalars.
    #[must_use]
    pub const fn is_proto3(&self) -> bool {
        matches!(self, Self::Proto3)
    }
}

/// Identifier assigned to a schema element in the generated code.
///
/// The pair is opaque to this crate: `path` is the module path (or import
/// path) the item lives in, `name` its local name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TargetIdent {
    /// Module path, empty for the crate root.
    pub path: String,
    /// Local name.
    pub name: String,
}

impl TargetIdent {
    /// Creates a new identifier.
    #[must_use]
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }

    /// Returns true if no name has been assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }
}

impl fmt::Display for TargetIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}::{}", self.path, self.name)
        }
    }
}

/// A single `.proto` file.
#[derive(Debug, Clone)]
pub struct FileDescriptor {
    /// File path relative to the import root.
    pub name: String,
    /// Protobuf package.
    pub package: String,
    /// Schema dialect.
    pub syntax: Syntax,
    /// Top-level enums.
    pub enums: Vec<EnumDescriptor>,
    /// Top-level messages.
    pub messages: Vec<MessageDescriptor>,
}

impl FileDescriptor {
    /// Creates a new empty file.
    #[must_use]
    pub fn new(name: impl Into<String>, package: impl Into<String>, syntax: Syntax) -> Self {
        Self {
            name: name.into(),
            package: package.into(),
            syntax,
            enums: Vec::new(),
            messages: Vec::new(),
        }
    }

    /// Adds a top-level enum.
    pub fn add_enum(&mut self, enum_desc: EnumDescriptor) {
        self.enums.push(enum_desc);
    }

    /// Adds a top-level message.
    pub fn add_message(&mut self, message: MessageDescriptor) {
        self.messages.push(message);
    }
}

/// Message definition.
#[derive(Debug, Clone)]
pub struct MessageDescriptor {
    /// Fully-qualified name, e.g. `pkg.Outer.Inner`.
    pub full_name: String,
    /// Identifier of the generated struct.
    pub ident: TargetIdent,
    /// Fields in declaration order.
    pub fields: Vec<FieldDescriptor>,
    /// Oneofs, indexed by [`FieldDescriptor::oneof_index`].
    pub oneofs: Vec<OneofDescriptor>,
    /// Nested enums.
    pub enums: Vec<EnumDescriptor>,
    /// Nested messages.
    pub messages: Vec<MessageDescriptor>,
}

impl MessageDescriptor {
    /// Creates a new message definition.
    #[must_use]
    pub fn new(full_name: impl Into<String>, ident: TargetIdent) -> Self {
        Self {
            full_name: full_name.into(),
            ident,
            fields: Vec::new(),
            oneofs: Vec::new(),
            enums: Vec::new(),
            messages: Vec::new(),
        }
    }

    /// Adds a field to the message.
    pub fn add_field(&mut self, field: FieldDescriptor) {
        self.fields.push(field);
    }

    /// Adds a oneof and returns its index for use by member fields.
    pub fn add_oneof(&mut self, oneof: OneofDescriptor) -> usize {
        self.oneofs.push(oneof);
        self.oneofs.len() - 1
    }

    /// Adds a nested enum.
    pub fn add_enum(&mut self, enum_desc: EnumDescriptor) {
        self.enums.push(enum_desc);
    }

    /// Adds a nested message.
    pub fn add_message(&mut self, message: MessageDescriptor) {
        self.messages.push(message);
    }

    /// Returns the oneof a field belongs to, if any.
    #[must_use]
    pub fn oneof_of(&self, field: &FieldDescriptor) -> Option<&OneofDescriptor> {
        field.oneof_index.and_then(|idx| self.oneofs.get(idx))
    }
}

/// Enum type definition.
#[derive(Debug, Clone)]
pub struct EnumDescriptor {
    /// Fully-qualified name.
    pub full_name: String,
    /// Identifier of the generated enum.
    pub ident: TargetIdent,
    /// Values in declaration order.
    pub values: Vec<EnumValueDescriptor>,
}

impl EnumDescriptor {
    /// Creates a new enum definition.
    #[must_use]
    pub fn new(full_name: impl Into<String>, ident: TargetIdent) -> Self {
        Self {
            full_name: full_name.into(),
            ident,
            values: Vec::new(),
        }
    }

    /// Adds a value to the enum.
    pub fn add_value(&mut self, value: EnumValueDescriptor) {
        self.values.push(value);
    }
}

/// Single enum value.
#[derive(Debug, Clone)]
pub struct EnumValueDescriptor {
    /// Fully-qualified name. Protobuf scopes values as siblings of their
    /// enum, e.g. `pkg.RED` for `pkg.Color.RED`.
    pub full_name: String,
    /// Numeric value.
    pub number: i32,
    /// Identifier of the generated variant or constant.
    pub ident: TargetIdent,
}

impl EnumValueDescriptor {
    /// Creates a new enum value.
    #[must_use]
    pub fn new(full_name: impl Into<String>, number: i32, ident: TargetIdent) -> Self {
        Self {
            full_name: full_name.into(),
            number,
            ident,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{FieldDescriptor, FieldKind};

    #[test]
    fn test_syntax_presence() {
        assert_eq!(Syntax::default(), Syntax::Proto2);
        assert!(Syntax::Proto3.is_proto3());
        assert!(!Syntax::Editions.is_proto3());
    }

    #[test]
    fn test_target_ident_display() {
        assert_eq!(TargetIdent::new("", "Foo").to_string(), "Foo");
        assert_eq!(TargetIdent::new("crate::pb", "Foo").to_string(), "crate::pb::Foo");
        assert!(TargetIdent::default().is_empty());
    }

    #[test]
    fn test_oneof_of() {
        let mut msg = MessageDescriptor::new("pkg.M", TargetIdent::new("", "M"));
        let choice = msg.add_oneof(OneofDescriptor::new("pkg.M.choice", "choice", TargetIdent::new("", "M_Choice")));
        msg.add_field(FieldDescriptor::new("pkg.M.a", "a", 1, FieldKind::Int32).with_oneof(choice));
        msg.add_field(FieldDescriptor::new("pkg.M.b", "b", 2, FieldKind::Int32));
        msg.add_field(FieldDescriptor::new("pkg.M.c", "c", 3, FieldKind::Int32).with_oneof(7));

        assert_eq!(msg.oneof_of(&msg.fields[0]).map(|o| o.name.as_str()), Some("choice"));
        assert!(msg.oneof_of(&msg.fields[1]).is_none());
        assert!(msg.oneof_of(&msg.fields[2]).is_none());
    }
}
