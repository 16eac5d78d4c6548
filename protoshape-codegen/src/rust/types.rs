//! Type rendering.

use crate::config::ModelConfig;
use crate::error::CodegenError;
use crate::target::{NamedKind, TargetType};
use proc_macro2::{Ident, Literal, Span, TokenStream};
use protoshape_schema::TargetIdent;
use quote::quote;

/// Renders target types as Rust type syntax.
pub struct TypeGenerator<'a> {
    config: &'a ModelConfig,
}

impl<'a> TypeGenerator<'a> {
    /// Creates a new type generator.
    #[must_use]
    pub fn new(config: &'a ModelConfig) -> Self {
        Self { config }
    }

    /// Renders a type.
    ///
    /// # Errors
    /// Returns `CodegenError::Generation` if a named type carries a path
    /// segment or name that is not a valid identifier.
    pub fn generate(&self, ty: &TargetType) -> Result<TokenStream, CodegenError> {
        let tokens = match ty {
            TargetType::Primitive(p) => {
                let name = Ident::new(p.rust_type(), Span::call_site());
                quote! { #name }
            }
            TargetType::Named { ident, .. } => path_tokens(ident)?,
            TargetType::Pointer(inner) => {
                let inner_tokens = self.generate(inner)?;
                let boxed = matches!(
                    **inner,
                    TargetType::Named {
                        kind: NamedKind::Message,
                        ..
                    }
                );
                if boxed && self.config.boxes_messages() {
                    quote! { Option<Box<#inner_tokens>> }
                } else {
                    quote! { Option<#inner_tokens> }
                }
            }
            TargetType::Slice(inner) => {
                let inner = self.generate(inner)?;
                quote! { Vec<#inner> }
            }
            TargetType::Array(inner, len) => {
                let inner = self.generate(inner)?;
                let len = Literal::usize_unsuffixed(*len);
                quote! { [#inner; #len] }
            }
            TargetType::Map(key, value) => {
                let key = self.generate(key)?;
                let value = self.generate(value)?;
                quote! { ::std::collections::HashMap<#key, #value> }
            }
        };
        Ok(tokens)
    }
}

/// Renders `path::name`, skipping an empty path.
fn path_tokens(target: &TargetIdent) -> Result<TokenStream, CodegenError> {
    let segments = target
        .path
        .split("::")
        .filter(|segment| !segment.is_empty())
        .map(ident)
        .collect::<Result<Vec<_>, _>>()?;
    let name = ident(&target.name)?;
    Ok(quote! { #(#segments::)* #name })
}

/// Builds an identifier, accepting `r#` raw identifiers.
pub(crate) fn ident(name: &str) -> Result<Ident, CodegenError> {
    let (raw, bare) = match name.strip_prefix("r#") {
        Some(bare) => (true, bare),
        None => (false, name),
    };

    let mut chars = bare.chars();
    let well_formed = match chars.next() {
        Some(first) if first == '_' || first.is_ascii_alphabetic() => {
            chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        }
        _ => false,
    };
    let reserved = bare == "_" || (raw && matches!(bare, "self" | "Self" | "super" | "crate"));
    if !well_formed || reserved {
        return Err(CodegenError::generation(format!("invalid identifier '{name}'")));
    }

    Ok(if raw {
        Ident::new_raw(bare, Span::call_site())
    } else {
        Ident::new(bare, Span::call_site())
    })
}
