//! Field type mapping
//!
//! Maps one protobuf field to a GraphQL type expression, registering the
//! declarations it references on the way.

use super::builder::SchemaBuilder;
use crate::error::GeneratorError;
use crate::ir::SchemaField;
use crate::proto::{leading_comments, non_oneof_fields};
use heck::ToUpperCamelCase;
use prost_reflect::{FieldDescriptor, Kind, MessageDescriptor};

/// Opaque scalar shared by every `bytes` field
pub const BYTES_SCALAR: &str = "ProtoBytes";

/// FHIR resource plumbing with no GraphQL meaning
const IGNORED_FIELDS: &[&str] = &["contained", "extension", "modifier_extension"];

/// Which side of the schema a field is resolved for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Object type field
    Output,
    /// Input object field
    Input,
}

impl SchemaBuilder<'_> {
    /// Resolve the non-oneof fields of `msg`, in declaration order
    pub(super) fn fields(
        &mut self,
        msg: &MessageDescriptor,
        position: Position,
    ) -> Result<Vec<SchemaField>, GeneratorError> {
        let mut fields = Vec::new();
        for field in non_oneof_fields(msg) {
            if IGNORED_FIELDS.contains(&field.name()) {
                continue;
            }
            fields.push(self.schema_field(&field, position)?);
        }
        Ok(fields)
    }

    pub(super) fn schema_field(
        &mut self,
        field: &FieldDescriptor,
        position: Position,
    ) -> Result<SchemaField, GeneratorError> {
        Ok(SchemaField {
            name: field.name().to_string(),
            type_expr: self.field_type(field, position)?,
            doc: leading_comments(&field.parent_file(), field.path()),
        })
    }

    /// GraphQL type expression of `field`
    pub(super) fn field_type(
        &mut self,
        field: &FieldDescriptor,
        position: Position,
    ) -> Result<String, GeneratorError> {
        if field.is_map() {
            return self.set_map(field);
        }
        if field.is_group() {
            return Err(unsupported(field, "group"));
        }

        let element = match field.kind() {
            Kind::Message(msg) => match position {
                Position::Output => self.set_type(&msg)?,
                Position::Input => self.set_input(&msg)?,
            },
            Kind::Enum(desc) => self.ensure_enum(&desc),
            Kind::Bytes => self.set_bytes(),
            Kind::Double | Kind::Float | Kind::Fixed32 | Kind::Fixed64 => "Float".to_string(),
            Kind::Int32
            | Kind::Int64
            | Kind::Uint32
            | Kind::Uint64
            | Kind::Sint32
            | Kind::Sint64 => "Int".to_string(),
            Kind::Bool => "Boolean".to_string(),
            Kind::String => "String".to_string(),
            Kind::Sfixed32 => return Err(unsupported(field, "sfixed32")),
            Kind::Sfixed64 => return Err(unsupported(field, "sfixed64")),
        };

        if field.is_list() {
            Ok(format!("[{element}]"))
        } else {
            Ok(element)
        }
    }

    /// Register the shared bytes scalar
    fn set_bytes(&mut self) -> String {
        self.registry.add_scalar(BYTES_SCALAR, "Vec<u8>");
        let binding = self.paths.synthesized(BYTES_SCALAR);
        self.registry.bind(BYTES_SCALAR, binding);
        BYTES_SCALAR.to_string()
    }

    /// Register a scalar standing for a whole `map<K, V>` field
    ///
    /// Map value messages are referenced by their native type only and are not
    /// declared in the schema.
    fn set_map(&mut self, field: &FieldDescriptor) -> Result<String, GeneratorError> {
        let name = field.name().to_upper_camel_case();
        let Kind::Message(entry) = field.kind() else {
            return Err(unsupported(field, "map"));
        };
        let key = self.native_type(&entry.map_entry_key_field());
        let value = self.native_type(&entry.map_entry_value_field());

        tracing::debug!(name = %name, field = field.full_name(), "registering map scalar");
        self.registry
            .add_scalar(&name, format!("::std::collections::HashMap<{key}, {value}>"));
        let binding = self.paths.synthesized(&name);
        self.registry.bind(&name, binding);
        Ok(name)
    }

    /// Rust type prost generates for a map key or value
    fn native_type(&mut self, field: &FieldDescriptor) -> String {
        let native = match field.kind() {
            Kind::Double => "f64",
            Kind::Float => "f32",
            Kind::Int32 | Kind::Sint32 | Kind::Sfixed32 => "i32",
            Kind::Int64 | Kind::Sint64 | Kind::Sfixed64 => "i64",
            Kind::Uint32 | Kind::Fixed32 => "u32",
            Kind::Uint64 | Kind::Fixed64 => "u64",
            Kind::Bool => "bool",
            Kind::String => "String",
            Kind::Bytes => "Vec<u8>",
            // prost stores enum values as their wire integer
            Kind::Enum(_) => "i32",
            Kind::Message(msg) => {
                let (short, module) = self.paths.imported(&msg);
                self.registry.scalar_imports.insert(module);
                return short;
            }
        };
        native.to_string()
    }
}

fn unsupported(field: &FieldDescriptor, kind: &str) -> GeneratorError {
    GeneratorError::UnsupportedFieldType {
        field: field.full_name().to_string(),
        kind: kind.to_string(),
    }
}
