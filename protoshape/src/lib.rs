//! # protoshape
//!
//! Type resolution cache and field model for protobuf code generators.
//!
//! Given descriptors whose generated identifiers were assigned upstream,
//! protoshape computes the Rust type of every field and merges oneof
//! alternatives into single members with unified getters.
//!
//! ## Quick Start
//!
//! ```ignore
//! use protoshape::prelude::*;
//!
//! let cache = load_files(ModelConfig::default(), &files)?;
//! for field in cache.message_fields(&message)? {
//!     println!("{}: {}", field.name(), field.ty()?);
//! }
//! ```
//!
//! ## Crate Organization
//!
//! - [`schema`] - Descriptor model handed over by the schema loader
//! - [`codegen`] - Type cache, field model and Rust rendering

pub mod prelude;

/// Descriptor model.
pub mod schema {
    pub use protoshape_schema::*;
}

/// Type cache and field model.
pub mod codegen {
    pub use protoshape_codegen::*;
}
