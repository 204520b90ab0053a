//! Combat tuning loader.

use std::path::Path;

use combat_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for combat tuning from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load tuning from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse combat config TOML: {}", e))?;

        if config.steal_min_fraction > config.steal_max_fraction {
            anyhow::bail!(
                "steal_min_fraction ({}) exceeds steal_max_fraction ({})",
                config.steal_min_fraction,
                config.steal_max_fraction
            );
        }
        if config.gauge_tick_ms == 0 {
            anyhow::bail!("gauge_tick_ms must be positive");
        }

        Ok(config)
    }
}
