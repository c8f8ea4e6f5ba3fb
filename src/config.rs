use serde::{Deserialize, Serialize};
use std::{fs::read_to_string, path::Path};

use crate::{error::GedcomError, record::LineTerminator};

/// Maximum serialized line length of the canonical GEDCOM 5.5 format.
pub const DEFAULT_LINE_LIMIT: usize = 255;

/// Settings the multi-line codec and programmatic record construction use.
///
/// ```toml
/// line_limit = 255
/// line_terminator = "\r\n"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Serialized line budget enforced when values are encoded. Input is never checked
    /// against it.
    pub line_limit: usize,
    /// Terminator given to records created through the API.
    pub line_terminator: LineTerminator,
}

impl Default for CodecConfig {
    fn default() -> Self {
        CodecConfig {
            line_limit: DEFAULT_LINE_LIMIT,
            line_terminator: LineTerminator::Lf,
        }
    }
}

impl CodecConfig {
    pub fn from_toml_str(content: &str) -> Result<CodecConfig, GedcomError> {
        let config: CodecConfig = toml::from_str(content)?;
        if config.line_limit == 0 {
            return Err(GedcomError::InvalidArgument(
                "line_limit must be greater than zero".to_string(),
            ));
        }
        Ok(config)
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<CodecConfig, GedcomError> {
        tracing::debug!("Reading codec config from {:?}", path.as_ref());
        if !path.as_ref().exists() {
            tracing::debug!("Config file not found, using defaults.");
            return Ok(CodecConfig::default());
        }
        let content = read_to_string(path)?;
        CodecConfig::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String, GedcomError> {
        Ok(toml::to_string(self)?)
    }
}
