//! Plugin parameters
//!
//! protoc passes everything between `--gql_out=` and `:` as a single
//! comma separated parameter string, e.g.
//! `--gql_out=service=Painters,output_path=gen/graphql:.`

use crate::error::GeneratorError;

/// Default directory for emitted files
pub const DEFAULT_OUTPUT_PATH: &str = "gengql";

/// Default Rust path under which prost-generated packages live
pub const DEFAULT_NATIVE_ROOT: &str = "crate";

/// Default Rust module that hosts the emitted `scalars.rs`
pub const DEFAULT_OUTPUT_MODULE: &str = "crate::gengql";

/// Parsed plugin parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginConfig {
    /// Service to translate when the file declares several
    pub service: Option<String>,
    /// Directory (relative to the protoc output dir) for emitted files
    pub output_path: String,
    /// Rust path of the prost-generated package tree
    pub native_root: String,
    /// Rust module the emitted scalars live in
    pub output_module: String,
    /// Emit `bindings.json` and `scalars.rs` besides the SDL
    pub codegen: bool,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            service: None,
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            native_root: DEFAULT_NATIVE_ROOT.to_string(),
            output_module: DEFAULT_OUTPUT_MODULE.to_string(),
            codegen: true,
        }
    }
}

impl PluginConfig {
    /// Parse the protoc plugin parameter string
    pub fn parse(param: Option<&str>) -> Result<Self, GeneratorError> {
        let mut config = Self::default();
        let Some(param) = param else {
            return Ok(config);
        };

        for part in param.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = part.split_once('=').unwrap_or((part, ""));
            let value = value.trim();
            match key.trim() {
                "service" if !value.is_empty() => config.service = Some(value.to_string()),
                "output_path" if !value.is_empty() => {
                    config.output_path = value.trim_end_matches('/').to_string()
                }
                "native_root" if !value.is_empty() => config.native_root = value.to_string(),
                "output_module" if !value.is_empty() => config.output_module = value.to_string(),
                "codegen" => config.codegen = parse_bool("codegen", value)?,
                other => {
                    tracing::warn!(parameter = other, "ignoring unknown plugin parameter");
                }
            }
        }

        Ok(config)
    }

    /// Path of an emitted file inside `output_path`
    pub fn path(&self, file_name: &str) -> String {
        if self.output_path.is_empty() || self.output_path == "." {
            file_name.to_string()
        } else {
            format!("{}/{}", self.output_path, file_name)
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, GeneratorError> {
    match value {
        "" | "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(GeneratorError::Config {
            key: key.to_string(),
            reason: format!("expected true or false, got {other:?}"),
        }),
    }
}
