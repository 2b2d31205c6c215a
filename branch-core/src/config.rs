//! Generator configuration.
//!
//! Every key in a config file is optional; missing keys keep the
//! compiled defaults, and `[[rules]]` entries are merged onto the default
//! rule table rather than replacing it.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{BranchError, Result};
use crate::frontier::Policy;
use crate::rules::{RuleEntry, RuleTable};

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Scale applied to every rule offset.
    pub step_len: f32,
    pub policy: Policy,
    pub rules: RuleTable,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            step_len: 1.0,
            policy: Policy::default(),
            rules: RuleTable::default(),
        }
    }
}

/// Config as written on disk, before merging onto the defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    step_len: Option<f32>,
    policy: Option<Policy>,
    rules: Vec<RuleEntry>,
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(text)?;
        Self::from_raw(raw)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| BranchError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg = Self::from_toml_str(&text)?;
        debug!(path = %path.display(), rules = cfg.rules.len(), "loaded config");
        Ok(cfg)
    }

    fn from_raw(raw: RawConfig) -> Result<Self> {
        let mut cfg = Self::default();
        if let Some(step_len) = raw.step_len {
            cfg.step_len = step_len;
        }
        if let Some(policy) = raw.policy {
            cfg.policy = policy;
        }
        cfg.rules.merge(raw.rules)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Checks the step length and every rule offset.
    pub fn validate(&self) -> Result<()> {
        if !self.step_len.is_finite() || self.step_len <= 0.0 {
            return Err(BranchError::InvalidStepLen(self.step_len));
        }
        self.rules.validate()
    }
}
