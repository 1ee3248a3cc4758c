//! Helpers over prost-reflect descriptors
//!
//! The descriptor pool built from the CodeGeneratorRequest is the parsed
//! schema this plugin translates; these helpers answer the few questions the
//! translator asks of it.

use prost_reflect::{
    EnumDescriptor, FieldDescriptor, FileDescriptor, MessageDescriptor, OneofDescriptor,
};

/// A named protobuf declaration (message or enum)
pub trait ProtoEntity {
    /// Protobuf package, e.g. `google.protobuf`
    fn package(&self) -> &str;
    /// Fully qualified name, e.g. `google.protobuf.Timestamp`
    fn full_name(&self) -> &str;
}

impl ProtoEntity for MessageDescriptor {
    fn package(&self) -> &str {
        self.package_name()
    }

    fn full_name(&self) -> &str {
        MessageDescriptor::full_name(self)
    }
}

impl ProtoEntity for EnumDescriptor {
    fn package(&self) -> &str {
        self.package_name()
    }

    fn full_name(&self) -> &str {
        EnumDescriptor::full_name(self)
    }
}

/// Name of an entity relative to its package, split on nesting (`Outer.Inner`)
pub fn nested_path<E: ProtoEntity + ?Sized>(entity: &E) -> Vec<&str> {
    let full_name = entity.full_name();
    let package = entity.package();
    let relative = if package.is_empty() {
        full_name
    } else {
        full_name
            .strip_prefix(package)
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(full_name)
    };
    relative.split('.').collect()
}

/// Whether a field belongs to a real (non-synthetic) oneof
pub fn in_real_oneof(field: &FieldDescriptor) -> bool {
    field
        .containing_oneof()
        .is_some_and(|oneof| !is_synthetic(&oneof))
}

/// Whether a oneof only exists to carry a proto3 `optional` field
pub fn is_synthetic(oneof: &OneofDescriptor) -> bool {
    oneof
        .fields()
        .all(|field| field.field_descriptor_proto().proto3_optional())
}

/// Fields outside real oneofs, in declaration order
///
/// Proto3 `optional` fields live in synthetic oneofs and count as plain fields.
pub fn non_oneof_fields(msg: &MessageDescriptor) -> Vec<FieldDescriptor> {
    msg.fields().filter(|f| !in_real_oneof(f)).collect()
}

/// Real oneof groups, in declaration order
pub fn real_oneofs(msg: &MessageDescriptor) -> Vec<OneofDescriptor> {
    msg.oneofs().filter(|o| !is_synthetic(o)).collect()
}

/// Leading comments attached to the declaration at `path`
pub fn leading_comments(file: &FileDescriptor, path: &[i32]) -> String {
    file.file_descriptor_proto()
        .source_code_info
        .as_ref()
        .and_then(|info| info.location.iter().find(|loc| loc.path == path))
        .and_then(|loc| loc.leading_comments.as_deref())
        .map(|comments| {
            comments
                .trim_end()
                .lines()
                .map(|line| line.strip_prefix(' ').unwrap_or(line).trim_end())
                .collect::<Vec<_>>()
                .join("\n")
                .trim_start_matches('\n')
                .to_string()
        })
        .unwrap_or_default()
}
