//! Name resolution
//!
//! Two questions are answered here, both as pure functions of the entity:
//! - which GraphQL name a protobuf message or enum gets ([`NameResolver`])
//! - where the prost-generated Rust type for it lives ([`NativePaths`])

use crate::ir::TypeBinding;
use crate::proto::{ProtoEntity, nested_path};
use heck::{ToSnakeCase, ToUpperCamelCase};
use once_cell::sync::Lazy;
use prost_reflect::{FieldDescriptor, MessageDescriptor, OneofDescriptor};
use std::collections::{HashMap, HashSet};

/// Foreign types that collapse onto built-in GraphQL scalars
static OVERRIDES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("google.fhir.r4.core.String", "String"),
        ("google.fhir.r4.core.Boolean", "Boolean"),
        ("google.fhir.stu3.proto.String", "String"),
    ])
});

/// Foreign packages whose declarations keep their bare name
static PACKAGES_CONSIDERED_LOCAL: Lazy<HashSet<&'static str>> =
    Lazy::new(|| HashSet::from(["google.fhir.stu3.proto", "google.fhir.r4.core"]));

/// Bare names that never take the local shortcut
static TYPES_CONSIDERED_REMOTE: Lazy<HashSet<&'static str>> =
    Lazy::new(|| HashSet::from(["String", "Boolean"]));

/// A resolved GraphQL name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Qualified {
    /// GraphQL identifier
    pub name: String,
    /// Whether the entity gets its own declaration (false for scalar overrides)
    pub declare: bool,
}

impl Qualified {
    fn declared(name: String) -> Self {
        Self {
            name,
            declare: true,
        }
    }
}

/// Computes collision-free GraphQL names relative to the target package
#[derive(Debug, Clone)]
pub struct NameResolver {
    package: String,
}

impl NameResolver {
    /// Resolver for a service declared in `package`
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
        }
    }

    /// GraphQL name of a message or enum
    ///
    /// Local entities keep their bare name; foreign ones are prefixed with
    /// their package so that `a.Foo` and `b.Foo` never clash.
    pub fn qualify<E: ProtoEntity + ?Sized>(&self, entity: &E) -> Qualified {
        let bare = bare_name(entity);
        let package = entity.package();
        if package == self.package {
            return Qualified::declared(bare);
        }

        if let Some(scalar) = OVERRIDES.get(format!("{package}.{bare}").as_str()) {
            return Qualified {
                name: scalar.to_string(),
                declare: false,
            };
        }

        if !TYPES_CONSIDERED_REMOTE.contains(bare.as_str())
            && PACKAGES_CONSIDERED_LOCAL.contains(package)
        {
            return Qualified::declared(bare);
        }

        Qualified::declared(capitalize(&format!("{}_{}", package.replace('.', "_"), bare)))
    }

    /// Name of the union synthesized for a oneof group
    pub fn union_name(&self, oneof: &OneofDescriptor) -> String {
        let owner = self.qualify(oneof.parent_message()).name;
        format!("{}{}", owner, oneof.name().to_upper_camel_case())
    }

    /// Name of the single-field wrapper type for one oneof member
    pub fn union_wrapper_name(&self, oneof: &OneofDescriptor, field: &FieldDescriptor) -> String {
        format!(
            "{}{}",
            self.union_name(oneof),
            field.name().to_upper_camel_case()
        )
    }
}

/// Host-cased name relative to the package; nesting joined with `_`
pub fn bare_name<E: ProtoEntity + ?Sized>(entity: &E) -> String {
    nested_path(entity)
        .iter()
        .map(|segment| segment.to_upper_camel_case())
        .collect::<Vec<_>>()
        .join("_")
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Locates prost-generated Rust types
///
/// prost maps package `a.b` to module `a::b`, and a message `Outer.Inner` to
/// `outer::Inner`.
#[derive(Debug, Clone)]
pub struct NativePaths {
    root: String,
    output_module: String,
}

impl NativePaths {
    /// Paths under `root`, with synthesized items in `output_module`
    pub fn new(root: impl Into<String>, output_module: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            output_module: output_module.into(),
        }
    }

    /// Binding for a generated scalar or marker in the output module
    pub fn synthesized(&self, name: &str) -> TypeBinding {
        TypeBinding::new(self.output_module.clone(), name)
    }

    /// Binding of the prost type generated for a message or enum
    pub fn entity<E: ProtoEntity + ?Sized>(&self, entity: &E) -> TypeBinding {
        let mut path = nested_path(entity);
        let name = path.pop().unwrap_or_default();
        let mut module = self.package_module(entity.package());
        for parent in path {
            module.push_str("::");
            module.push_str(&module_segment(parent));
        }
        TypeBinding::new(module, name.to_upper_camel_case())
    }

    /// Binding of the prost oneof variant generated for one oneof member
    ///
    /// prost emits `mod <message> { pub enum <Oneof> { <Field>(..) } }`.
    // Two members whose names camel-case to the same variant would collide
    // in prost as well; that case is not detected here.
    pub fn oneof_case(&self, field: &FieldDescriptor) -> TypeBinding {
        let msg = field.parent_message();
        let owner = self.entity(msg);
        let oneof = field
            .containing_oneof()
            .map(|o| o.name().to_upper_camel_case())
            .unwrap_or_default();
        TypeBinding::new(
            format!("{}::{}", owner.module, module_segment(msg.name())),
            format!("{}::{}", oneof, field.name().to_upper_camel_case()),
        )
    }

    /// Short path of a message relative to its module's parent, plus the
    /// module that must be imported for it to resolve
    pub fn imported(&self, msg: &MessageDescriptor) -> (String, String) {
        let binding = self.entity(msg);
        let short_module = binding
            .module
            .rsplit("::")
            .next()
            .unwrap_or(binding.module.as_str())
            .to_string();
        (format!("{}::{}", short_module, binding.name), binding.module)
    }

    fn package_module(&self, package: &str) -> String {
        let mut module = self.root.clone();
        for segment in package.split('.').filter(|s| !s.is_empty()) {
            module.push_str("::");
            module.push_str(&module_segment(segment));
        }
        module
    }
}

/// snake_case module name, escaped when it is a Rust keyword
fn module_segment(name: &str) -> String {
    const RUST_KEYWORDS: &[&str] = &[
        "as", "break", "const", "continue", "crate", "else", "enum", "extern", "false", "fn",
        "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref",
        "return", "static", "struct", "trait", "true", "type", "unsafe", "use", "where", "while",
        "async", "await", "dyn", "abstract", "become", "box", "do", "final", "macro", "override",
        "priv", "typeof", "unsized", "virtual", "yield", "try", "gen",
    ];

    let snake = name.to_snake_case();
    if RUST_KEYWORDS.contains(&snake.as_str()) {
        format!("r#{snake}")
    } else {
        snake
    }
}
