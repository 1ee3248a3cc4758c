//! Type binding table
//!
//! `bindings.json` tells the downstream resolver generator which native Rust
//! type backs each GraphQL name, plus the side tables it needs to generate
//! union resolution, empty-type placeholders and the federation `_service`
//! resolver.

use super::builder::Schema;
use crate::error::GeneratorError;
use crate::ir::TypeBinding;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Serialized form of a finished translation
#[derive(Debug, Clone, Serialize)]
pub struct BindingDocument<'a> {
    /// Fully qualified name of the translated service
    pub service: &'a str,
    /// Protobuf package of the service
    pub package: &'a str,
    /// GraphQL name to native locator
    pub models: &'a BTreeMap<String, TypeBinding>,
    /// GraphQL enums to the prost enums their values bridge to
    pub enums: BTreeMap<&'a str, &'a TypeBinding>,
    /// Types and inputs to the protobuf message (or oneof member) they were built from
    pub origins: BTreeMap<&'a str, &'a str>,
    /// Synthesized scalars and their native type expressions
    pub scalars: &'a BTreeMap<String, String>,
    /// Modules the scalar type expressions import
    pub scalar_imports: &'a BTreeSet<String>,
    /// Unions synthesized from oneof groups
    pub oneof_unions: &'a BTreeSet<String>,
    /// UpperCamelCase rpc name to its error sibling type
    pub response_unions: &'a BTreeMap<String, String>,
    /// Types rendered with a placeholder field
    pub empty_types: &'a BTreeSet<String>,
    /// SDL served by `_service`, present for federated schemas
    #[serde(skip_serializing_if = "Option::is_none")]
    pub federation_sdl: Option<&'a str>,
}

impl<'a> BindingDocument<'a> {
    /// Flatten `schema` into a binding document
    pub fn new(
        service: &'a str,
        package: &'a str,
        schema: &'a Schema,
        federation_sdl: Option<&'a str>,
    ) -> Self {
        let registry = &schema.registry;
        let enums = registry
            .enums
            .iter()
            .map(|(name, decl)| (name.as_str(), &decl.native))
            .collect();
        let origins = registry
            .types
            .iter()
            .chain(&registry.inputs)
            .filter_map(|(name, ty)| ty.origin.as_deref().map(|origin| (name.as_str(), origin)))
            .collect();
        Self {
            service,
            package,
            models: &registry.bindings,
            enums,
            origins,
            scalars: &registry.scalars,
            scalar_imports: &registry.scalar_imports,
            oneof_unions: &registry.oneof_unions,
            response_unions: &registry.response_unions,
            empty_types: &registry.empty_types,
            federation_sdl,
        }
    }

    /// Pretty-printed JSON, newline terminated
    pub fn to_json(&self) -> Result<String, GeneratorError> {
        let mut json = serde_json::to_string_pretty(self)
            .map_err(|e| GeneratorError::CodeGenError(format!("serializing bindings: {e}")))?;
        json.push('\n');
        Ok(json)
    }
}
