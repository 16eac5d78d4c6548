//! # protoshape Schema
//!
//! Protobuf descriptor model consumed by the protoshape type mapper.
//!
//! This crate provides:
//! - File, message, enum and enum value descriptors
//! - Field descriptors with kinds, labels, map entries and oneof membership
//! - Target identifiers assigned to schema elements upstream
//!
//! Parsing `.proto` sources is not handled here; descriptors are built by the
//! loader that drives code generation.

pub mod fields;
pub mod types;

pub use fields::{Cardinality, FieldDescriptor, FieldKind, MapEntry, OneofDescriptor};
pub use types::{
    EnumDescriptor, EnumValueDescriptor, FileDescriptor, MessageDescriptor, Syntax, TargetIdent,
};
