//! Getter signature rendering.

use super::types::{TypeGenerator, ident};
use crate::config::ModelConfig;
use crate::error::CodegenError;
use crate::fields::{Accessor, LogicalField};
use proc_macro2::TokenStream;
use quote::quote;

/// Renders getter signatures for logical fields.
pub struct AccessorGenerator<'a> {
    types: TypeGenerator<'a>,
}

impl<'a> AccessorGenerator<'a> {
    /// Creates a new accessor generator.
    #[must_use]
    pub fn new(config: &'a ModelConfig) -> Self {
        Self {
            types: TypeGenerator::new(config),
        }
    }

    /// Renders `fn name(&self) -> Type;`.
    ///
    /// # Errors
    /// Returns `CodegenError::Generation` if a name is not a valid identifier.
    pub fn generate(&self, accessor: &Accessor) -> Result<TokenStream, CodegenError> {
        let name = ident(&accessor.name)?;
        let result = self.types.generate(&accessor.result)?;
        Ok(quote! { fn #name(&self) -> #result; })
    }

    /// Renders the getter of a logical field followed by one getter per
    /// oneof alternative.
    ///
    /// # Errors
    /// Returns a consistency error if a type cannot be resolved, or
    /// `CodegenError::Generation` if a name is not a valid identifier.
    pub fn generate_field(&self, field: &LogicalField<'_>) -> Result<TokenStream, CodegenError> {
        let mut output = self.generate(&field.accessor()?)?;
        for alternative in field.alternatives()? {
            output.extend(self.generate(&alternative.accessor)?);
        }
        Ok(output)
    }
}
