//! protoc-gen-gql
//!
//! A protoc plugin that translates a protobuf service into a GraphQL schema,
//! plus the bindings a resolver generator needs to map GraphQL types back to
//! prost-generated Rust types.
//!
//! Usage:
//!   protoc --gql_out=. proto/painters.proto
//!   protoc --gql_out=service=Painters,output_path=gen/graphql:. proto/painters.proto
//!
//! Logs go to stderr; set `PROTOC_GEN_GQL_LOG=debug` to trace every
//! registered declaration.

#![deny(warnings)]
#![deny(missing_docs)]

use std::io::{self, Read, Write};

use prost::Message;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod generator;
mod graphql;
mod ir;
mod options;
mod proto;

#[cfg(test)]
mod fixtures;

/// Environment variable holding the log filter
const LOG_ENV: &str = "PROTOC_GEN_GQL_LOG";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries the protoc response, so logs must go to stderr
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    // Read the CodeGeneratorRequest from stdin
    let mut input = Vec::new();
    io::stdin().read_to_end(&mut input)?;

    let response = generator::generate_from_bytes(&input);

    // Write the response to stdout
    let mut output = Vec::new();
    response.encode(&mut output)?;
    io::stdout().write_all(&output)?;

    Ok(())
}
