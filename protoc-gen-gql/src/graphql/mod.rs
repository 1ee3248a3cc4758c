//! GraphQL schema generation
//!
//! This module translates one protobuf service into:
//! - a GraphQL schema (SDL) with Query/Mutation fields for its rpcs
//! - a binding table from GraphQL names to prost-generated Rust types
//! - a Rust support module declaring synthesized scalars and the union marker

mod bindings;
mod builder;
mod federation;
mod fields;
mod naming;
mod registry;
mod scalars;
mod sdl;
mod unions;

pub use bindings::BindingDocument;
#[cfg(test)]
pub use builder::Schema;
pub use builder::SchemaBuilder;
pub use federation::rewrite_query;
pub use scalars::render as render_scalars;
pub use sdl::render as render_sdl;
