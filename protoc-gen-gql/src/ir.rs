//! Intermediate Representation (IR) of the generated GraphQL schema
//!
//! The IR is the ordered set of GraphQL declarations built from one protobuf
//! service, before it is rendered to SDL. Every list is sorted by name, so
//! rendering the same IR twice produces identical text.

use serde::Serialize;

/// A field of a GraphQL type or input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaField {
    /// Field name (proto field name, unchanged)
    pub name: String,

    /// GraphQL type expression, e.g. `String`, `[Painter]`
    pub type_expr: String,

    /// Leading comments of the proto field
    pub doc: String,
}

/// A GraphQL object type or input object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceType {
    /// Qualified GraphQL name
    pub name: String,

    /// Fields in declaration order (oneof unions last)
    pub fields: Vec<SchemaField>,

    /// Leading comments of the proto message
    pub doc: String,

    /// Fully qualified name of the originating proto message
    pub origin: Option<String>,
}

/// A value of a GraphQL enum
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    /// Proto enum value name
    pub name: String,

    /// Leading comments of the proto value
    pub doc: String,
}

/// A GraphQL enum
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDecl {
    /// Qualified GraphQL name
    pub name: String,

    /// Values in declaration order
    pub values: Vec<EnumValue>,

    /// Leading comments of the proto enum
    pub doc: String,

    /// Native type the enum bridges to
    pub native: TypeBinding,
}

/// A GraphQL union
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionDecl {
    /// Union name
    pub name: String,

    /// Member type names, in declaration order
    pub members: Vec<String>,
}

/// A Query or Mutation field backed by an RPC
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    /// GraphQL field name (lowerCamelCase rpc name)
    pub name: String,

    /// Leading comments of the rpc
    pub doc: String,

    /// Input type of the `req` argument, absent for empty requests
    pub request: Option<String>,

    /// Response type name (possibly a response union)
    pub response: String,

    /// Whether the rpc is exposed under Mutation
    pub mutation: bool,
}

/// Location of the native Rust type a GraphQL type is bound to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeBinding {
    /// Rust module path, e.g. `crate::painters`
    pub module: String,

    /// Type name inside the module, e.g. `Painter` or `Kind::Oil`
    pub name: String,
}

impl TypeBinding {
    /// Create a binding
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            name: name.into(),
        }
    }

    /// Full Rust path, e.g. `crate::painters::Painter`
    pub fn path(&self) -> String {
        format!("{}::{}", self.module, self.name)
    }
}

/// The complete ordered GraphQL schema
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaIr {
    /// Query fields
    pub queries: Vec<Method>,

    /// Mutation fields
    pub mutations: Vec<Method>,

    /// Object types
    pub types: Vec<ServiceType>,

    /// Input objects
    pub inputs: Vec<ServiceType>,

    /// Enums
    pub enums: Vec<EnumDecl>,

    /// Unions
    pub unions: Vec<UnionDecl>,

    /// Custom scalar names
    pub scalars: Vec<String>,
}
