//! Content loaders for reading combat data from files.
//!
//! RON catalogs become templates and lookup tables; the TOML tuning file
//! becomes a [`combat_core::CombatConfig`].

pub mod abilities;
pub mod classes;
pub mod config;
pub mod effect;
pub mod enemies;
pub mod factory;
pub mod statuses;

pub use abilities::{AbilityLoader, AbilitySpec};
pub use classes::ClassLoader;
pub use config::ConfigLoader;
pub use effect::decode_effect;
pub use enemies::EnemyLoader;
pub use factory::{ContentBundle, ContentFactory};
pub use statuses::StatusLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
