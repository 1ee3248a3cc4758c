//! Union synthesis
//!
//! GraphQL has no tagged unions of scalars, so each oneof member is wrapped in
//! a single-field object type and the oneof becomes a union of the wrappers.
//! The `respondsWith` rpc annotation produces a second kind of union: the
//! normal response together with an error sibling message.

use super::builder::SchemaBuilder;
use super::fields::Position;
use crate::error::GeneratorError;
use crate::ir::{SchemaField, ServiceType, UnionDecl};
use crate::proto::{leading_comments, real_oneofs};
use heck::ToUpperCamelCase;
use prost_reflect::{FieldDescriptor, MessageDescriptor, MethodDescriptor, OneofDescriptor};

/// Runtime discriminator every synthesized union binds to
pub const UNION_MASK: &str = "UnionMask";

impl SchemaBuilder<'_> {
    /// One union-typed field per oneof group of `msg`
    pub(super) fn union_fields(
        &mut self,
        msg: &MessageDescriptor,
    ) -> Result<Vec<SchemaField>, GeneratorError> {
        let mut fields = Vec::new();
        for oneof in real_oneofs(msg) {
            let union_name = self.names.union_name(&oneof);
            let mut members = Vec::new();
            for field in oneof.fields() {
                members.push(self.set_union_wrapper(&oneof, &field)?);
            }

            tracing::debug!(name = %union_name, oneof = oneof.full_name(), "registering oneof union");
            self.registry.oneof_unions.insert(union_name.clone());
            self.add_union(&union_name, members);

            fields.push(SchemaField {
                name: oneof.name().to_string(),
                type_expr: union_name,
                doc: leading_comments(&msg.parent_file(), oneof.path()),
            });
        }
        Ok(fields)
    }

    /// Register the single-field wrapper type for one oneof member
    fn set_union_wrapper(
        &mut self,
        oneof: &OneofDescriptor,
        field: &FieldDescriptor,
    ) -> Result<String, GeneratorError> {
        let name = self.names.union_wrapper_name(oneof, field);
        if self.registry.has_type(&name) {
            return Ok(name);
        }

        self.registry.types.insert(
            name.clone(),
            ServiceType {
                name: name.clone(),
                fields: Vec::new(),
                doc: String::new(),
                origin: Some(field.full_name().to_string()),
            },
        );
        let binding = self.paths.oneof_case(field);
        self.registry.bind(&name, binding);

        let member = self.schema_field(field, Position::Output)?;
        if let Some(declared) = self.registry.types.get_mut(&name) {
            declared.fields = vec![member];
        }
        Ok(name)
    }

    /// Top-level message `sibling` declared in the same file as `method`
    pub(super) fn find_sibling(
        &self,
        method: &MethodDescriptor,
        sibling: &str,
    ) -> Result<MessageDescriptor, GeneratorError> {
        let file = method.parent_file();
        file.messages()
            .find(|msg| msg.name() == sibling)
            .ok_or_else(|| GeneratorError::MissingSibling {
                method: method.full_name().to_string(),
                sibling: sibling.to_string(),
                file: file.name().to_string(),
            })
    }

    /// Replace the response of `method` with `<Response>Set = <Response> | <sibling>`
    pub(super) fn set_response_combination(
        &mut self,
        method: &MethodDescriptor,
        sibling: &str,
    ) -> Result<String, GeneratorError> {
        let sibling_msg = self.find_sibling(method, sibling)?;
        let sibling_name = self.set_type(&sibling_msg)?;
        let response = self.names.qualify(&method.output()).name;
        let union_name = format!("{response}Set");
        let members = vec![response, sibling_name.clone()];
        if let Some(existing) = self.registry.unions.get(&union_name) {
            if existing.members != members {
                return Err(GeneratorError::ConflictingResponseUnion {
                    method: method.full_name().to_string(),
                    union: union_name,
                    sibling: sibling_name,
                    existing: existing.members.join(" | "),
                });
            }
        }

        tracing::debug!(name = %union_name, method = method.full_name(), "registering response union");
        self.registry
            .response_unions
            .insert(method.name().to_upper_camel_case(), sibling_name.clone());
        self.add_union(&union_name, members);
        Ok(union_name)
    }

    fn add_union(&mut self, name: &str, members: Vec<String>) {
        self.registry
            .unions
            .entry(name.to_string())
            .or_insert_with(|| UnionDecl {
                name: name.to_string(),
                members,
            });
        let binding = self.paths.synthesized(UNION_MASK);
        self.registry.bind(name, binding);
    }
}
