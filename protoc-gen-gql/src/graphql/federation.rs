//! Apollo federation support
//!
//! A federated subgraph exposes its own SDL through `_service { sdl }` and
//! declares its Query as an extension of the gateway's.

use crate::ir::{Method, SchemaField, SchemaIr, ServiceType};

/// Name of the federation query field
pub const SERVICE_FIELD: &str = "_service";

/// Name of the federation object type
pub const SERVICE_TYPE: &str = "_Service";

/// Append the `_service` query and its `_Service` type
///
/// Both are appended after the sorted declarations.
pub fn extend(ir: &mut SchemaIr) {
    ir.queries.push(Method {
        name: SERVICE_FIELD.to_string(),
        doc: String::new(),
        request: None,
        response: SERVICE_TYPE.to_string(),
        mutation: false,
    });
    ir.types.push(ServiceType {
        name: SERVICE_TYPE.to_string(),
        fields: vec![SchemaField {
            name: "sdl".to_string(),
            type_expr: "String".to_string(),
            doc: String::new(),
        }],
        doc: String::new(),
        origin: None,
    });
}

/// Rewrite the first `type Query` header into `extend type Query`
pub fn rewrite_query(sdl: &str) -> String {
    sdl.replacen("type Query", "extend type Query", 1)
}
