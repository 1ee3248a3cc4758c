//! Plugin orchestration
//!
//! Decodes the CodeGeneratorRequest, picks the target service, runs the
//! schema builder and assembles the emitted files.

use crate::config::PluginConfig;
use crate::error::GeneratorError;
use crate::graphql::{self, BindingDocument, SchemaBuilder};
use crate::options::Annotations;
use prost::Message;
use prost_reflect::{DescriptorPool, FileDescriptor, ServiceDescriptor};
use prost_types::compiler::CodeGeneratorResponse;
use prost_types::compiler::code_generator_response::File;

/// `CodeGeneratorResponse.Feature.FEATURE_PROTO3_OPTIONAL`
const FEATURE_PROTO3_OPTIONAL: u64 = 1;

/// CodeGeneratorRequest with the proto files kept as raw bytes
///
/// Decoding through prost-types would drop the extension fields inside the
/// descriptor options, so the files are handed to prost-reflect undecoded.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RawCodeGeneratorRequest {
    #[prost(string, repeated, tag = "1")]
    pub file_to_generate: ::prost::alloc::vec::Vec<String>,
    #[prost(string, optional, tag = "2")]
    pub parameter: Option<String>,
    #[prost(bytes, repeated, tag = "15")]
    pub proto_file: ::prost::alloc::vec::Vec<::prost::alloc::vec::Vec<u8>>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
struct RawFileDescriptorSet {
    #[prost(bytes, repeated, tag = "1")]
    pub file: ::prost::alloc::vec::Vec<::prost::alloc::vec::Vec<u8>>,
}

/// Run the plugin over raw request bytes
///
/// Translation failures are reported through `CodeGeneratorResponse.error`
/// with no files, as protoc expects.
pub fn generate_from_bytes(bytes: &[u8]) -> CodeGeneratorResponse {
    let (file, error) = match generate(bytes) {
        Ok(files) => (files, None),
        Err(e) => {
            tracing::error!(error = %e, "schema generation failed");
            (Vec::new(), Some(e.to_string()))
        }
    };
    CodeGeneratorResponse {
        file,
        error,
        supported_features: Some(FEATURE_PROTO3_OPTIONAL),
    }
}

/// Translate the request into the files to emit
pub fn generate(bytes: &[u8]) -> Result<Vec<File>, GeneratorError> {
    let request = RawCodeGeneratorRequest::decode(bytes)
        .map_err(|e| GeneratorError::DecodeError(e.to_string()))?;
    let config = PluginConfig::parse(request.parameter.as_deref())?;
    let pool = build_descriptor_pool(&request)?;

    let target = match request.file_to_generate.as_slice() {
        [target] => target,
        targets => return Err(GeneratorError::MultipleTargets(targets.len())),
    };
    let file = pool.get_file_by_name(target).ok_or_else(|| {
        GeneratorError::DecodeError(format!("file descriptor not found: {target}"))
    })?;
    let syntax = file.file_descriptor_proto().syntax();
    if syntax != "proto3" {
        return Err(GeneratorError::UnsupportedSyntax(format!(
            "{} declares syntax {:?}",
            file.name(),
            if syntax.is_empty() { "proto2" } else { syntax }
        )));
    }

    let service = pick_service(&file, config.service.as_deref())?;
    if service.methods().next().is_none() {
        return Err(GeneratorError::EmptyService(service.full_name().to_string()));
    }
    tracing::debug!(file = file.name(), service = service.full_name(), "translating service");

    let annotations = Annotations::collect(&pool, &file, &service)?;
    let schema = SchemaBuilder::new(file.package_name(), &config, &annotations).build(&service)?;

    let sdl = graphql::render_sdl(&schema.ir);
    let federation_sdl = schema.federated.then(|| graphql::rewrite_query(&sdl));

    let mut files = vec![output_file(&config, "schema.graphql", sdl)];
    if config.codegen {
        let bindings = BindingDocument::new(
            service.full_name(),
            file.package_name(),
            &schema,
            federation_sdl.as_deref(),
        );
        files.push(output_file(&config, "bindings.json", bindings.to_json()?));

        let registry = &schema.registry;
        if let Some(scalars) = graphql::render_scalars(
            &registry.scalars,
            &registry.scalar_imports,
            !registry.unions.is_empty(),
        )? {
            files.push(output_file(&config, "scalars.rs", scalars));
        }
    }

    tracing::info!(
        files = files.len(),
        output_path = %config.output_path,
        "generated GraphQL schema"
    );
    Ok(files)
}

/// Load every file of the request into one pool, options included
fn build_descriptor_pool(request: &RawCodeGeneratorRequest) -> Result<DescriptorPool, GeneratorError> {
    let fds = RawFileDescriptorSet {
        file: request.proto_file.clone(),
    };
    DescriptorPool::decode(fds.encode_to_vec().as_slice())
        .map_err(|e| GeneratorError::DecodeError(e.to_string()))
}

/// Select the service to translate
///
/// A lone service is used whatever `requested` says.
fn pick_service(
    file: &FileDescriptor,
    requested: Option<&str>,
) -> Result<ServiceDescriptor, GeneratorError> {
    let services: Vec<ServiceDescriptor> = file.services().collect();
    match services.as_slice() {
        [] => Err(GeneratorError::NoService(file.name().to_string())),
        [only] => Ok(only.clone()),
        _ => {
            let requested =
                requested.ok_or_else(|| GeneratorError::AmbiguousService(file.name().to_string()))?;
            services
                .into_iter()
                .find(|s| s.name() == requested)
                .ok_or_else(|| GeneratorError::ServiceNotFound {
                    file: file.name().to_string(),
                    service: requested.to_string(),
                })
        }
    }
}

fn output_file(config: &PluginConfig, name: &str, content: String) -> File {
    File {
        name: Some(config.path(name)),
        content: Some(content),
        ..Default::default()
    }
}
