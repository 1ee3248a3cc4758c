//! Declaration registry
//!
//! Memoized store of every GraphQL declaration produced while walking one
//! service. A qualified name identifies at most one declaration per kind; the
//! first registration wins and later ones are no-ops. All maps are ordered so
//! that emission is deterministic without an extra sort.

use crate::ir::{EnumDecl, Method, SchemaIr, ServiceType, TypeBinding, UnionDecl};
use std::collections::{BTreeMap, BTreeSet};

/// Registered declarations and the side tables derived from them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    /// Object types by qualified name
    pub types: BTreeMap<String, ServiceType>,
    /// Input objects by name
    pub inputs: BTreeMap<String, ServiceType>,
    /// Enums by qualified name
    pub enums: BTreeMap<String, EnumDecl>,
    /// Unions by name
    pub unions: BTreeMap<String, UnionDecl>,
    /// Synthesized scalars, name to native Rust type expression
    pub scalars: BTreeMap<String, String>,
    /// Rust modules the scalar type expressions need in scope
    pub scalar_imports: BTreeSet<String>,
    /// Types and inputs whose message has no fields
    pub empty_types: BTreeSet<String>,
    /// Unions synthesized from oneof groups
    pub oneof_unions: BTreeSet<String>,
    /// UpperCamelCase method name to its error sibling message
    pub response_unions: BTreeMap<String, String>,
    /// GraphQL name to native type locator
    pub bindings: BTreeMap<String, TypeBinding>,
}

impl Registry {
    /// Record the native type a GraphQL name binds to
    ///
    /// Last write wins. Rebinding a name to a different locator is logged.
    pub fn bind(&mut self, name: &str, binding: TypeBinding) {
        if let Some(previous) = self.bindings.get(name) {
            if *previous != binding {
                tracing::warn!(
                    name,
                    previous = %previous.path(),
                    replacement = %binding.path(),
                    "conflicting native bindings for one GraphQL name"
                );
            }
        }
        self.bindings.insert(name.to_string(), binding);
    }

    /// Whether an object type is registered under `name`
    pub fn has_type(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Record a scalar and its native type; re-registration is a no-op
    pub fn add_scalar(&mut self, name: &str, native: impl Into<String>) {
        self.scalars
            .entry(name.to_string())
            .or_insert_with(|| native.into());
    }

    /// Flatten into the ordered IR
    pub fn to_ir(&self, queries: Vec<Method>, mutations: Vec<Method>) -> SchemaIr {
        SchemaIr {
            queries,
            mutations,
            types: self.types.values().cloned().collect(),
            inputs: self.inputs.values().cloned().collect(),
            enums: self.enums.values().cloned().collect(),
            unions: self.unions.values().cloned().collect(),
            scalars: self.scalars.keys().cloned().collect(),
        }
    }
}
