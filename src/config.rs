//! Tool configuration
//!
//! Every field has a default, so a config file only needs the keys it changes:
//!
//! ```toml
//! strict_preamble = true
//! backup_suffix_width = 4
//! payload_extension = "wem"
//! ```

use crate::core::parser::ParseOptions;
use crate::error::{BankError, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Options shared by the bank file layer and the command-line tool
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BankConfig {
    /// Reject banks whose first header word is not "BKHD"
    pub strict_preamble: bool,

    /// Digits in the numeric backup suffix (`Init.bnk.000`)
    pub backup_suffix_width: usize,

    /// File extension for extracted and updated payloads
    pub payload_extension: String,
}

impl Default for BankConfig {
    fn default() -> Self {
        BankConfig {
            strict_preamble: false,
            backup_suffix_width: 3,
            payload_extension: "wem".to_string(),
        }
    }
}

impl BankConfig {
    /// Parse a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: BankConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        debug!("Loading config from {:?}", path.as_ref());
        let source = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<()> {
        if self.backup_suffix_width == 0 {
            return Err(BankError::Config(
                "backup_suffix_width must be at least 1".to_string(),
            ));
        }
        if self.payload_extension.is_empty() || self.payload_extension.contains('.') {
            return Err(BankError::Config(format!(
                "payload_extension '{}' must be a bare extension such as \"wem\"",
                self.payload_extension
            )));
        }
        Ok(())
    }

    pub fn with_strict_preamble(mut self, strict: bool) -> Self {
        self.strict_preamble = strict;
        self
    }

    pub fn with_backup_suffix_width(mut self, width: usize) -> Self {
        self.backup_suffix_width = width;
        self
    }

    pub fn with_payload_extension(mut self, extension: impl Into<String>) -> Self {
        self.payload_extension = extension.into();
        self
    }

    /// Decoder options derived from this config
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            strict_preamble: self.strict_preamble,
        }
    }
}
