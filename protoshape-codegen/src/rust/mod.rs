//! Rust code rendering modules.

pub mod accessors;
pub mod types;

pub use accessors::AccessorGenerator;
pub use types::TypeGenerator;
