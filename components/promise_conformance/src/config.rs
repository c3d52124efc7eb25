//! Run configuration.
//!
//! Built-in defaults, optionally replaced by a JSON file; the binary
//! applies its flags on top.

use crate::error::{HarnessError, HarnessResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Which matrices the reference suite registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatrixSelection {
    /// `promise.then(handler)`
    pub then: bool,
    /// `promise.catch(handler)`
    pub catch: bool,
    /// `promise.then(handler, handler)`
    pub then_both: bool,
    /// `Promise.try(handler)`
    #[serde(rename = "try")]
    pub try_call: bool,
    /// `Promise.resolve(value)`
    pub resolve: bool,
}

impl Default for MatrixSelection {
    fn default() -> Self {
        Self {
            then: true,
            catch: true,
            then_both: true,
            try_call: true,
            resolve: true,
        }
    }
}

/// An alternate constructor slot. A disabled slot stays in the matrix
/// and its cases are reported as skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternateConfig {
    pub name: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

/// Report output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub matrices: MatrixSelection,
    pub alternates: Vec<AlternateConfig>,
    /// Drop the "no handler" case from instance-method matrices
    pub no_undefined: bool,
    pub format: OutputFormat,
    /// List every failure after the summary
    pub detailed: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            matrices: MatrixSelection::default(),
            alternates: vec![
                AlternateConfig {
                    name: "native".to_string(),
                    enabled: true,
                },
                AlternateConfig {
                    name: "legacy".to_string(),
                    enabled: false,
                },
            ],
            no_undefined: false,
            format: OutputFormat::Text,
            detailed: true,
        }
    }
}

impl RunConfig {
    /// Loads a config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> HarnessResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| HarnessError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&text).map_err(|source| HarnessError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Disables every alternate slot, keeping the slots themselves.
    pub fn without_alternates(mut self) -> Self {
        for alternate in &mut self.alternates {
            alternate.enabled = false;
        }
        self
    }
}
