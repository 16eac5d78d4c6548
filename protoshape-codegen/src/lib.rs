//! # protoshape Codegen
//!
//! Type resolution and field modelling for protobuf code generation.
//!
//! This crate provides:
//! - A two-phase [`TypeCache`] mapping schema names to generated identifiers
//! - Field type resolution (scalars, repeated, maps, messages, enums)
//! - A logical field model merging oneof alternatives into one member
//! - Rust token rendering for resolved types and getter signatures
//!
//! ```ignore
//! let mut cache = TypeCache::new();
//! for file in &files {
//!     cache.add_file(file)?;
//! }
//! cache.finalize();
//!
//! for field in cache.message_fields(&message)? {
//!     let getter = field.accessor()?;
//! }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod fields;
pub mod rust;
pub mod target;

pub use cache::TypeCache;
pub use config::ModelConfig;
pub use error::{CodegenError, ConsistencyError};
pub use fields::{Accessor, Alternative, FieldShape, LogicalField};
pub use target::{NamedKind, Primitive, TargetType};

/// Loads every file into a new cache and finalizes it.
///
/// # Errors
/// Propagates errors from [`TypeCache::add_file`].
pub fn load_files<'a>(
    config: ModelConfig,
    files: impl IntoIterator<Item = &'a protoshape_schema::FileDescriptor>,
) -> Result<TypeCache, CodegenError> {
    let mut cache = TypeCache::with_config(config);
    for file in files {
        cache.add_file(file)?;
    }
    cache.finalize();
    Ok(cache)
}
