//! Schema builder
//!
//! One [`SchemaBuilder`] owns all state of a single translation. It walks the
//! service's rpc methods and recursively registers every message and enum they
//! reach. Registration inserts a declaration before resolving its fields, so
//! recursive message graphs terminate.

use super::federation;
use super::naming::{NameResolver, NativePaths, Qualified};
use super::registry::Registry;
use crate::config::PluginConfig;
use crate::error::GeneratorError;
use crate::ir::{EnumDecl, EnumValue, Method, SchemaIr, ServiceType};
use crate::options::Annotations;
use crate::proto::{leading_comments, non_oneof_fields};
use heck::ToLowerCamelCase;
use prost_reflect::{EnumDescriptor, MessageDescriptor, MethodDescriptor, ServiceDescriptor};

/// The finished translation
#[derive(Debug, Clone)]
pub struct Schema {
    /// Ordered declarations, ready to render
    pub ir: SchemaIr,
    /// Registry the IR was flattened from, with its side tables
    pub registry: Registry,
    /// Whether federation plumbing was added
    pub federated: bool,
}

/// Translates one protobuf service into a GraphQL schema
pub struct SchemaBuilder<'a> {
    pub(super) names: NameResolver,
    pub(super) paths: NativePaths,
    pub(super) registry: Registry,
    annotations: &'a Annotations,
}

impl<'a> SchemaBuilder<'a> {
    /// Builder for a service declared in `package`
    pub fn new(package: &str, config: &PluginConfig, annotations: &'a Annotations) -> Self {
        Self {
            names: NameResolver::new(package),
            paths: NativePaths::new(&config.native_root, &config.output_module),
            registry: Registry::default(),
            annotations,
        }
    }

    /// Translate `service`
    ///
    /// Pass 1 registers every response message as a Type so that a message
    /// used both ways gets the `Input` suffix on its input side. Pass 2 builds
    /// the Query and Mutation fields.
    pub fn build(mut self, service: &ServiceDescriptor) -> Result<Schema, GeneratorError> {
        let methods: Vec<MethodDescriptor> = service.methods().collect();

        for method in &methods {
            self.set_type(&method.output())?;
            let opts = self.annotations.method(method.full_name());
            if opts.skip {
                continue;
            }
            if let Some(sibling) = opts.responds_with() {
                let sibling = self.find_sibling(method, sibling)?;
                self.set_type(&sibling)?;
            }
        }

        let mut queries = Vec::new();
        let mut mutations = Vec::new();
        for method in &methods {
            let opts = self.annotations.method(method.full_name());
            if opts.skip {
                tracing::debug!(method = method.full_name(), "skipping rpc");
                continue;
            }

            let input = method.input();
            let request = if non_oneof_fields(&input).is_empty() {
                None
            } else {
                Some(self.set_input(&input)?)
            };

            let response = match opts.responds_with() {
                Some(sibling) => self.set_response_combination(method, sibling)?,
                None => self.names.qualify(&method.output()).name,
            };

            let gql_method = Method {
                name: method.name().to_lower_camel_case(),
                doc: leading_comments(&method.parent_file(), method.path()),
                request,
                response,
                mutation: opts.mutation,
            };
            if gql_method.mutation {
                mutations.push(gql_method);
            } else {
                queries.push(gql_method);
            }
        }

        let mut ir = self.registry.to_ir(queries, mutations);
        let federated = self.annotations.schema.federated;
        if federated {
            federation::extend(&mut ir);
        }

        tracing::info!(
            service = service.full_name(),
            queries = ir.queries.len(),
            mutations = ir.mutations.len(),
            types = ir.types.len(),
            inputs = ir.inputs.len(),
            enums = ir.enums.len(),
            unions = ir.unions.len(),
            scalars = ir.scalars.len(),
            federated,
            "built GraphQL schema"
        );

        Ok(Schema {
            ir,
            registry: self.registry,
            federated,
        })
    }

    /// Register `msg` as an object type and return its GraphQL name
    ///
    /// Idempotent. Scalar overrides are returned without registration.
    pub(super) fn set_type(&mut self, msg: &MessageDescriptor) -> Result<String, GeneratorError> {
        let Qualified { name, declare } = self.names.qualify(msg);
        if !declare || self.registry.has_type(&name) {
            return Ok(name);
        }

        tracing::debug!(name = %name, proto = msg.full_name(), "registering type");
        self.registry.types.insert(name.clone(), declaration(&name, msg));
        self.bind_message(&name, msg);

        let mut fields = self.fields(msg, super::fields::Position::Output)?;
        fields.extend(self.union_fields(msg)?);
        if let Some(declared) = self.registry.types.get_mut(&name) {
            declared.fields = fields;
        }
        Ok(name)
    }

    /// Register `msg` as an input object and return its GraphQL name
    ///
    /// Idempotent. Oneof members are not carried into inputs.
    pub(super) fn set_input(&mut self, msg: &MessageDescriptor) -> Result<String, GeneratorError> {
        let Qualified { name, declare } = self.input_name(msg);
        if !declare || self.registry.inputs.contains_key(&name) {
            return Ok(name);
        }

        tracing::debug!(name = %name, proto = msg.full_name(), "registering input");
        self.registry.inputs.insert(name.clone(), declaration(&name, msg));
        self.bind_message(&name, msg);

        let fields = self.fields(msg, super::fields::Position::Input)?;
        if let Some(declared) = self.registry.inputs.get_mut(&name) {
            declared.fields = fields;
        }
        Ok(name)
    }

    /// Input-side name of `msg`, suffixed when a Type already owns the name
    pub(super) fn input_name(&self, msg: &MessageDescriptor) -> Qualified {
        let mut qualified = self.names.qualify(msg);
        if qualified.declare && self.registry.has_type(&qualified.name) {
            qualified.name.push_str("Input");
        }
        qualified
    }

    /// Register `desc` as an enum and return its GraphQL name
    pub(super) fn ensure_enum(&mut self, desc: &EnumDescriptor) -> String {
        let Qualified { name, declare } = self.names.qualify(desc);
        if !declare || self.registry.enums.contains_key(&name) {
            return name;
        }

        tracing::debug!(name = %name, proto = desc.full_name(), "registering enum");
        let file = desc.parent_file();
        let values = desc
            .values()
            .map(|value| EnumValue {
                name: value.name().to_string(),
                doc: leading_comments(&file, value.path()),
            })
            .collect();
        let native = self.paths.entity(desc);
        self.registry.bind(&name, native.clone());
        self.registry.enums.insert(
            name.clone(),
            EnumDecl {
                name: name.clone(),
                values,
                doc: leading_comments(&file, desc.path()),
                native,
            },
        );
        name
    }

    /// Messages without fields get a placeholder instead of a native binding
    fn bind_message(&mut self, name: &str, msg: &MessageDescriptor) {
        if msg.fields().next().is_none() {
            self.registry.empty_types.insert(name.to_string());
        } else {
            let binding = self.paths.entity(msg);
            self.registry.bind(name, binding);
        }
    }
}

/// Declaration shell for `msg`; fields are filled in after registration
fn declaration(name: &str, msg: &MessageDescriptor) -> ServiceType {
    ServiceType {
        name: name.to_string(),
        fields: Vec::new(),
        doc: leading_comments(&msg.parent_file(), msg.path()),
        origin: Some(msg.full_name().to_string()),
    }
}
