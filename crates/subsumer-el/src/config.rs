//! # Reasoner Configuration
//!
//! Naming of synthetic concepts and TBox selection

use crate::ElError;
use serde::{Deserialize, Serialize};
use subsumer_core::Imports;

/// Reasoner configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReasonerConfig {
    /// Prefix of temp concepts introduced by normalization, numbered from 0
    pub temp_prefix: String,

    /// IRI of the proxy concept standing for the queried subclass
    pub sub_proxy: String,

    /// IRI of the proxy concept standing for the queried superclass
    pub super_proxy: String,

    /// Whether imported axioms are part of the reasoned TBox
    pub imports: Imports,
}

impl Default for ReasonerConfig {
    fn default() -> Self {
        Self {
            temp_prefix: "#TEMP".to_string(),
            sub_proxy: "#FIT0".to_string(),
            super_proxy: "#FIT1".to_string(),
            imports: Imports::Excluded,
        }
    }
}

impl ReasonerConfig {
    /// Parse and validate a JSON configuration; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, ElError> {
        let config: ReasonerConfig =
            serde_json::from_str(json).map_err(|e| ElError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ElError> {
        if self.temp_prefix.is_empty() {
            return Err(ElError::Config("temp_prefix must not be empty".to_string()));
        }
        if self.sub_proxy.is_empty() || self.super_proxy.is_empty() {
            return Err(ElError::Config("proxy concept IRIs must not be empty".to_string()));
        }
        if self.sub_proxy == self.super_proxy {
            return Err(ElError::Config(format!(
                "sub_proxy and super_proxy must differ, both are {}",
                self.sub_proxy
            )));
        }
        Ok(())
    }
}
