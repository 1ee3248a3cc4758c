//! Error types for schema translation
//!
//! Every failure is a fatal configuration error: translation stops at the
//! first one and no partial output is produced.

/// Error type for schema translation
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// A field uses a protobuf type with no GraphQL counterpart
    #[error("unsupported protobuf type {kind} on field {field}")]
    UnsupportedFieldType {
        /// Fully qualified field name
        field: String,
        /// Protobuf wire kind
        kind: String,
    },

    /// The target file declares no service
    #[error("proto file {0} must have at least one service")]
    NoService(String),

    /// Several services and no `service` parameter to pick one
    #[error("service name must be provided if proto file {0} has multiple services")]
    AmbiguousService(String),

    /// The `service` parameter names a service the file does not declare
    #[error("proto file {file} does not have the given service: {service}")]
    ServiceNotFound {
        /// Target file name
        file: String,
        /// Requested service name
        service: String,
    },

    /// The selected service declares no rpc
    #[error("service {0} must have at least one rpc")]
    EmptyService(String),

    /// `respondsWith` names a message that is not declared in the file
    #[error("{sibling} is not defined in proto file {file} (respondsWith on {method})")]
    MissingSibling {
        /// Method carrying the annotation
        method: String,
        /// Requested sibling message
        sibling: String,
        /// File searched for the sibling
        file: String,
    },

    /// Two rpcs share a response but name different `respondsWith` siblings
    #[error("{method} responds with {sibling}, but {union} already combines {existing}")]
    ConflictingResponseUnion {
        /// Method carrying the annotation
        method: String,
        /// Combined union name
        union: String,
        /// Sibling requested by `method`
        sibling: String,
        /// Members already declared for the union
        existing: String,
    },

    /// An annotation extension is present but does not decode to its declared shape
    #[error("malformed {extension} annotation on {entity}: {reason}")]
    MalformedAnnotation {
        /// Extension full name
        extension: String,
        /// Annotated entity
        entity: String,
        /// Decoder message
        reason: String,
    },

    /// protoc asked for more than one file
    #[error("only one proto file is supported at this moment, got {0}")]
    MultipleTargets(usize),

    /// The target file is not proto3
    #[error("only proto3 is supported: {0}")]
    UnsupportedSyntax(String),

    /// Invalid plugin parameter
    #[error("invalid plugin parameter {key}: {reason}")]
    Config {
        /// Parameter key
        key: String,
        /// Why the value was rejected
        reason: String,
    },

    /// Rust code generation failed
    #[error("code generation error: {0}")]
    CodeGenError(String),

    /// Failed to decode protobuf input
    #[error("decode error: {0}")]
    DecodeError(String),
}
