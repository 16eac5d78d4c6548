//! Target type descriptors.
//!
//! A [`TargetType`] describes the type of a generated member: a primitive, a
//! named item assigned upstream, or a composite built from those.

use protoshape_schema::TargetIdent;
use std::fmt;

/// Built-in scalar types of the target language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// `bool`.
    Bool,
    /// `u8`, only used as the element of byte sequences.
    U8,
    /// `i32`.
    I32,
    /// `i64`.
    I64,
    /// `u32`.
    U32,
    /// `u64`.
    U64,
    /// `f32`.
    F32,
    /// `f64`.
    F64,
    /// `String`.
    String,
}

impl Primitive {
    /// Returns the Rust type name for this primitive.
    #[must_use]
    pub const fn rust_type(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::U8 => "u8",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::String => "String",
        }
    }
}

/// What a named type was registered as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKind {
    /// Generated message struct.
    Message,
    /// Generated enum.
    Enum,
    /// Enum value constant or variant.
    EnumValue,
    /// Type standing for "any one alternative" of a oneof.
    Oneof,
    /// Wrapper holding one specific oneof alternative.
    Variant,
}

/// A type in the generated code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TargetType {
    /// Built-in scalar.
    Primitive(Primitive),
    /// Item assigned upstream.
    Named {
        /// Module path and local name.
        ident: TargetIdent,
        /// What the item is.
        kind: NamedKind,
    },
    /// Nullable reference, rendered as `Option`.
    Pointer(Box<TargetType>),
    /// Dynamically sized sequence.
    Slice(Box<TargetType>),
    /// Fixed-size sequence.
    Array(Box<TargetType>, usize),
    /// Key to value mapping.
    Map(Box<TargetType>, Box<TargetType>),
}

impl TargetType {
    /// Creates a named type.
    #[must_use]
    pub fn named(ident: TargetIdent, kind: NamedKind) -> Self {
        Self::Named { ident, kind }
    }

    /// Wraps `inner` in a pointer.
    #[must_use]
    pub fn pointer(inner: Self) -> Self {
        Self::Pointer(Box::new(inner))
    }

    /// Wraps `inner` in a dynamically sized sequence.
    #[must_use]
    pub fn slice(inner: Self) -> Self {
        Self::Slice(Box::new(inner))
    }

    /// Creates a fixed-size sequence.
    #[must_use]
    pub fn array(inner: Self, len: usize) -> Self {
        Self::Array(Box::new(inner), len)
    }

    /// Creates a mapping.
    #[must_use]
    pub fn map(key: Self, value: Self) -> Self {
        Self::Map(Box::new(key), Box::new(value))
    }

    /// Raw byte sequence.
    #[must_use]
    pub fn bytes() -> Self {
        Self::slice(Self::Primitive(Primitive::U8))
    }

    /// Returns true for pointers.
    #[must_use]
    pub const fn is_pointer(&self) -> bool {
        matches!(self, Self::Pointer(_))
    }

    /// Returns true for dynamically sized sequences (including bytes).
    #[must_use]
    pub const fn is_slice(&self) -> bool {
        matches!(self, Self::Slice(_))
    }

    /// Returns the identifier of a named type.
    #[must_use]
    pub fn ident(&self) -> Option<&TargetIdent> {
        match self {
            Self::Named { ident, .. } => Some(ident),
            _ => None,
        }
    }

    /// Returns the pointee, element or value type of a composite.
    #[must_use]
    pub fn elem(&self) -> Option<&TargetType> {
        match self {
            Self::Pointer(inner) | Self::Slice(inner) | Self::Array(inner, _) => Some(inner),
            Self::Map(_, value) => Some(value),
            Self::Primitive(_) | Self::Named { .. } => None,
        }
    }

    /// Returns true for a pointer to a generated message.
    #[must_use]
    pub fn is_message_pointer(&self) -> bool {
        matches!(
            self,
            Self::Pointer(inner) if matches!(**inner, Self::Named { kind: NamedKind::Message, .. })
        )
    }
}

impl From<Primitive> for TargetType {
    fn from(primitive: Primitive) -> Self {
        Self::Primitive(primitive)
    }
}

/// Writes the type as [`TypeGenerator`](crate::rust::TypeGenerator) renders it
/// under the default [`ModelConfig`](crate::config::ModelConfig), so message
/// pointers are always boxed. Maps are written as an unqualified `HashMap`.
impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(p) => f.write_str(p.rust_type()),
            Self::Named { ident, .. } => write!(f, "{ident}"),
            Self::Pointer(inner) if self.is_message_pointer() => write!(f, "Option<Box<{inner}>>"),
            Self::Pointer(inner) => write!(f, "Option<{inner}>"),
            Self::Slice(inner) => write!(f, "Vec<{inner}>"),
            Self::Array(inner, len) => write!(f, "[{inner}; {len}]"),
            Self::Map(key, value) => write!(f, "HashMap<{key}, {value}>"),
        }
    }
}
