//! Descriptor builders shared by the unit tests

use crate::generator::RawCodeGeneratorRequest;
use crate::options::{RpcOptions, SchemaOptions};
use prost::Message;
use prost_reflect::{DescriptorPool, FileDescriptor, ServiceDescriptor};
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FileDescriptorProto, FileDescriptorSet, MessageOptions, MethodDescriptorProto,
    OneofDescriptorProto, ServiceDescriptorProto,
};

/// Encode `files` as a FileDescriptorSet and load it the way the plugin does
pub fn encode_pool(files: Vec<FileDescriptorProto>) -> DescriptorPool {
    let bytes = FileDescriptorSet { file: files }.encode_to_vec();
    DescriptorPool::decode(bytes.as_slice()).expect("fixture descriptors must be valid")
}

pub fn field(name: &str, number: i32, kind: Type) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(Label::Optional as i32),
        r#type: Some(kind as i32),
        ..Default::default()
    }
}

pub fn repeated(field: FieldDescriptorProto) -> FieldDescriptorProto {
    FieldDescriptorProto {
        label: Some(Label::Repeated as i32),
        ..field
    }
}

/// Field referencing a message by fully qualified name (`.pkg.Msg`)
pub fn message_field(name: &str, number: i32, type_name: &str) -> FieldDescriptorProto {
    FieldDescriptorProto {
        type_name: Some(type_name.to_string()),
        ..field(name, number, Type::Message)
    }
}

/// Field referencing an enum by fully qualified name (`.pkg.Enum`)
pub fn enum_field(name: &str, number: i32, type_name: &str) -> FieldDescriptorProto {
    FieldDescriptorProto {
        type_name: Some(type_name.to_string()),
        ..field(name, number, Type::Enum)
    }
}

/// Field that belongs to the oneof at `index`
pub fn in_oneof(field: FieldDescriptorProto, index: i32) -> FieldDescriptorProto {
    FieldDescriptorProto {
        oneof_index: Some(index),
        ..field
    }
}

pub fn message(name: &str, fields: Vec<FieldDescriptorProto>) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.to_string()),
        field: fields,
        ..Default::default()
    }
}

pub fn with_oneofs(mut msg: DescriptorProto, oneofs: &[&str]) -> DescriptorProto {
    msg.oneof_decl = oneofs
        .iter()
        .map(|name| OneofDescriptorProto {
            name: Some(name.to_string()),
            ..Default::default()
        })
        .collect();
    msg
}

/// Add `map<key, value> name = number` to `msg`, declared in `scope` (`.pkg.Msg`)
pub fn with_map(
    mut msg: DescriptorProto,
    scope: &str,
    name: &str,
    number: i32,
    key: FieldDescriptorProto,
    value: FieldDescriptorProto,
) -> DescriptorProto {
    use heck::ToUpperCamelCase;

    let entry_name = format!("{}Entry", name.to_upper_camel_case());
    msg.nested_type.push(DescriptorProto {
        name: Some(entry_name.clone()),
        field: vec![
            FieldDescriptorProto {
                name: Some("key".to_string()),
                number: Some(1),
                ..key
            },
            FieldDescriptorProto {
                name: Some("value".to_string()),
                number: Some(2),
                ..value
            },
        ],
        options: Some(MessageOptions {
            map_entry: Some(true),
            ..Default::default()
        }),
        ..Default::default()
    });
    msg.field.push(repeated(message_field(
        name,
        number,
        &format!("{scope}.{entry_name}"),
    )));
    msg
}

pub fn enumeration(name: &str, values: &[&str]) -> EnumDescriptorProto {
    EnumDescriptorProto {
        name: Some(name.to_string()),
        value: values
            .iter()
            .enumerate()
            .map(|(i, v)| EnumValueDescriptorProto {
                name: Some(v.to_string()),
                number: Some(i as i32),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}

pub fn method(name: &str, input: &str, output: &str) -> MethodDescriptorProto {
    MethodDescriptorProto {
        name: Some(name.to_string()),
        input_type: Some(input.to_string()),
        output_type: Some(output.to_string()),
        ..Default::default()
    }
}

pub fn service(name: &str, methods: Vec<MethodDescriptorProto>) -> ServiceDescriptorProto {
    ServiceDescriptorProto {
        name: Some(name.to_string()),
        method: methods,
        ..Default::default()
    }
}

pub fn proto_file(name: &str, package: &str) -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some(name.to_string()),
        package: Some(package.to_string()),
        syntax: Some("proto3".to_string()),
        ..Default::default()
    }
}

/// A loaded fixture: pool plus the target file and its first service
pub struct Fixture {
    pub pool: DescriptorPool,
    pub file: FileDescriptor,
    pub service: ServiceDescriptor,
}

impl Fixture {
    /// Load `files`; the last one is the target
    pub fn new(files: Vec<FileDescriptorProto>) -> Self {
        let target = files
            .last()
            .and_then(|f| f.name.clone())
            .expect("at least one named file");
        let pool = encode_pool(files);
        let file = pool.get_file_by_name(&target).expect("target file");
        let service = file.services().next().expect("target service");
        Self {
            pool,
            file,
            service,
        }
    }
}

/// Minimal `google/protobuf/descriptor.proto` declaring the extendable options
pub fn descriptor_file() -> FileDescriptorProto {
    use prost_types::descriptor_proto::ExtensionRange;

    let extendable = |name: &str| DescriptorProto {
        extension_range: vec![ExtensionRange {
            start: Some(1000),
            end: Some(536_870_912),
            ..Default::default()
        }],
        ..message(name, vec![])
    };
    FileDescriptorProto {
        name: Some("google/protobuf/descriptor.proto".to_string()),
        package: Some("google.protobuf".to_string()),
        message_type: vec![extendable("FileOptions"), extendable("MethodOptions")],
        ..Default::default()
    }
}

/// `gql/options.proto` with both extensions
pub fn options_file() -> FileDescriptorProto {
    let mut file = proto_file("gql/options.proto", "gql.options");
    file.dependency = vec!["google/protobuf/descriptor.proto".to_string()];
    file.message_type = vec![
        message(
            "RPC",
            vec![
                field("mutation", 1, Type::Bool),
                field("skip", 2, Type::Bool),
                repeated(field("respondsWith", 3, Type::String)),
            ],
        ),
        message("Schema", vec![field("federated", 1, Type::Bool)]),
    ];
    file.extension = vec![
        FieldDescriptorProto {
            extendee: Some(".google.protobuf.MethodOptions".to_string()),
            type_name: Some(".gql.options.RPC".to_string()),
            ..field("rpc", 1070, Type::Message)
        },
        FieldDescriptorProto {
            extendee: Some(".google.protobuf.FileOptions".to_string()),
            type_name: Some(".gql.options.Schema".to_string()),
            ..field("schema", 1070, Type::Message)
        },
    ];
    file
}

#[derive(Clone, PartialEq, ::prost::Message)]
struct AnnotatedMethodOptions {
    #[prost(message, optional, tag = "1070")]
    rpc: Option<RpcOptions>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
struct AnnotatedFileOptions {
    #[prost(message, optional, tag = "1070")]
    schema: Option<SchemaOptions>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
struct AnnotatedMethod {
    #[prost(string, optional, tag = "1")]
    name: Option<String>,
    #[prost(string, optional, tag = "2")]
    input_type: Option<String>,
    #[prost(string, optional, tag = "3")]
    output_type: Option<String>,
    #[prost(message, optional, tag = "4")]
    options: Option<AnnotatedMethodOptions>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
struct AnnotatedService {
    #[prost(string, optional, tag = "1")]
    name: Option<String>,
    #[prost(message, repeated, tag = "2")]
    method: Vec<AnnotatedMethod>,
}

/// FileDescriptorProto fields carrying extension payloads
#[derive(Clone, PartialEq, ::prost::Message)]
struct AnnotatedFileTail {
    #[prost(message, repeated, tag = "6")]
    service: Vec<AnnotatedService>,
    #[prost(message, optional, tag = "8")]
    options: Option<AnnotatedFileOptions>,
}

/// An rpc together with its `(gql.options.rpc)` payload
pub struct AnnotatedRpc {
    pub method: MethodDescriptorProto,
    pub options: Option<RpcOptions>,
}

pub fn rpc(method: MethodDescriptorProto, options: Option<RpcOptions>) -> AnnotatedRpc {
    AnnotatedRpc { method, options }
}

/// Encode `file` plus services whose methods carry `(gql.options.rpc)` and an
/// optional file-level `(gql.options.schema)`
///
/// `file.service` must be empty; the annotated services are appended as raw
/// fields, which protobuf merges into the same message.
pub fn annotated_file_bytes(
    file: FileDescriptorProto,
    schema: Option<SchemaOptions>,
    services: Vec<(&str, Vec<AnnotatedRpc>)>,
) -> Vec<u8> {
    assert!(file.service.is_empty(), "services are passed separately");
    let tail = AnnotatedFileTail {
        service: services
            .into_iter()
            .map(|(name, rpcs)| AnnotatedService {
                name: Some(name.to_string()),
                method: rpcs
                    .into_iter()
                    .map(|rpc| AnnotatedMethod {
                        name: rpc.method.name,
                        input_type: rpc.method.input_type,
                        output_type: rpc.method.output_type,
                        options: rpc.options.map(|rpc| AnnotatedMethodOptions { rpc: Some(rpc) }),
                    })
                    .collect(),
            })
            .collect(),
        options: schema.map(|schema| AnnotatedFileOptions {
            schema: Some(schema),
        }),
    };
    let mut bytes = file.encode_to_vec();
    bytes.extend(tail.encode_to_vec());
    bytes
}

/// Encode a CodeGeneratorRequest out of already encoded files
pub fn request_bytes(targets: &[&str], parameter: Option<&str>, files: Vec<Vec<u8>>) -> Vec<u8> {
    RawCodeGeneratorRequest {
        file_to_generate: targets.iter().map(|t| t.to_string()).collect(),
        parameter: parameter.map(str::to_string),
        proto_file: files,
    }
    .encode_to_vec()
}
