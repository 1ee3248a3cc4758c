//! gql.options annotations
//!
//! The `(gql.options.rpc)` and `(gql.options.schema)` extensions declared in
//! `proto/gql/options.proto`. prost drops extension fields when it decodes
//! descriptors, so the annotations are read through prost-reflect from the
//! descriptor pool built out of the request, then decoded once into the typed
//! structs below.

use crate::error::GeneratorError;
use prost::Message;
use prost_reflect::{DescriptorPool, DynamicMessage, ExtensionDescriptor, FileDescriptor, ServiceDescriptor, Value};
use std::collections::HashMap;

/// Extension carrying [`RpcOptions`] on `google.protobuf.MethodOptions`
pub const RPC_EXTENSION_NAME: &str = "gql.options.rpc";

/// Extension carrying [`SchemaOptions`] on `google.protobuf.FileOptions`
pub const SCHEMA_EXTENSION_NAME: &str = "gql.options.schema";

/// `gql.options.RPC`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RpcOptions {
    /// Expose the method under Mutation
    #[prost(bool, tag = "1")]
    pub mutation: bool,
    /// Leave the method out of the schema
    #[prost(bool, tag = "2")]
    pub skip: bool,
    /// Sibling messages to combine the response with; only the first is honored
    #[prost(string, repeated, tag = "3")]
    pub responds_with: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
}

impl RpcOptions {
    /// The sibling message named by `respondsWith`, if any
    pub fn responds_with(&self) -> Option<&str> {
        self.responds_with.first().map(String::as_str)
    }
}

/// `gql.options.Schema`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SchemaOptions {
    /// Emit federation plumbing
    #[prost(bool, tag = "1")]
    pub federated: bool,
}

/// Result of decoding one annotation on one entity
#[derive(Debug, Clone, PartialEq)]
pub enum Annotation<T> {
    /// The extension is present and decoded to `T`
    Decoded(T),
    /// The entity does not carry the extension
    Absent,
    /// The extension is present but does not have the shape of `T`
    Malformed(String),
}

impl<T: Default> Annotation<T> {
    /// Collapse into the annotation value, defaulting when absent
    pub fn into_result(self, extension: &str, entity: &str) -> Result<T, GeneratorError> {
        match self {
            Annotation::Decoded(value) => Ok(value),
            Annotation::Absent => Ok(T::default()),
            Annotation::Malformed(reason) => Err(GeneratorError::MalformedAnnotation {
                extension: extension.to_string(),
                entity: entity.to_string(),
                reason,
            }),
        }
    }
}

/// Decode an extension value into `T`
pub fn decode_value<T: Message + Default>(value: &Value) -> Annotation<T> {
    match value {
        Value::Message(msg) => match T::decode(msg.encode_to_vec().as_slice()) {
            Ok(decoded) => Annotation::Decoded(decoded),
            Err(e) => Annotation::Malformed(e.to_string()),
        },
        other => Annotation::Malformed(format!("expected a message, got {other:?}")),
    }
}

/// Decode extension `ext` out of an options message
pub fn decode_extension<T: Message + Default>(
    opts: &DynamicMessage,
    ext: Option<&ExtensionDescriptor>,
) -> Annotation<T> {
    let Some(ext) = ext else {
        return Annotation::Absent;
    };
    if !opts.has_extension(ext) {
        return Annotation::Absent;
    }
    decode_value(opts.get_extension(ext).as_ref())
}

/// Annotations of one translation, decoded and validated up front
#[derive(Debug, Clone, Default)]
pub struct Annotations {
    /// File-level schema options of the target file
    pub schema: SchemaOptions,
    /// Method options keyed by method full name
    methods: HashMap<String, RpcOptions>,
}

impl Annotations {
    /// Decode the file and method annotations relevant to `service`
    ///
    /// Each entity is inspected exactly once; a malformed payload aborts.
    pub fn collect(
        pool: &DescriptorPool,
        file: &FileDescriptor,
        service: &ServiceDescriptor,
    ) -> Result<Self, GeneratorError> {
        let schema_ext = pool.get_extension_by_name(SCHEMA_EXTENSION_NAME);
        let rpc_ext = pool.get_extension_by_name(RPC_EXTENSION_NAME);

        let schema = decode_extension::<SchemaOptions>(&file.options(), schema_ext.as_ref())
            .into_result(SCHEMA_EXTENSION_NAME, file.name())?;

        let mut methods = HashMap::new();
        for method in service.methods() {
            let opts = decode_extension::<RpcOptions>(&method.options(), rpc_ext.as_ref())
                .into_result(RPC_EXTENSION_NAME, method.full_name())?;
            methods.insert(method.full_name().to_string(), opts);
        }

        Ok(Self { schema, methods })
    }

    /// Options for a method, defaulting when it carries none
    pub fn method(&self, full_name: &str) -> RpcOptions {
        self.methods.get(full_name).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
impl Annotations {
    /// Attach options to a method
    pub fn with_method(mut self, full_name: &str, opts: RpcOptions) -> Self {
        self.methods.insert(full_name.to_string(), opts);
        self
    }
}
