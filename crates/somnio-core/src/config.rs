//! Engine configuration for somnio
//!
//! Configuration is stored in `.somnio/config.toml`; every key is optional.

pub mod types;

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::similarity::resolve_threshold;

pub use types::{EngineConfig, SimilarityConfig, DEFAULT_BATCH_SIZE};

impl EngineConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: EngineConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration if the file exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Reject thresholds outside 0.0-1.0 and an empty batch size
    pub fn validate(&self) -> Result<()> {
        let s = &self.similarity;
        for threshold in [
            s.create_threshold,
            s.update_threshold,
            s.recalculate_threshold,
            s.read_threshold,
        ] {
            resolve_threshold(Some(threshold), threshold)?;
        }
        if s.batch_size == 0 {
            crate::bail_invalid!("batch_size (must be at least 1)", s.batch_size);
        }
        Ok(())
    }
}
