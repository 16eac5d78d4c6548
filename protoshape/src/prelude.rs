//! Prelude module for convenient imports.
//!
//! ```ignore
//! use protoshape::prelude::*;
//! ```

// Schema types
pub use protoshape_schema::{
    Cardinality, EnumDescriptor, EnumValueDescriptor, FieldDescriptor, FieldKind, FileDescriptor,
    MessageDescriptor, OneofDescriptor, Syntax, TargetIdent,
};

// Codegen types
pub use protoshape_codegen::rust::{AccessorGenerator, TypeGenerator};
pub use protoshape_codegen::{
    Accessor, Alternative, CodegenError, ConsistencyError, FieldShape, LogicalField, ModelConfig,
    NamedKind, Primitive, TargetType, TypeCache, load_files,
};
