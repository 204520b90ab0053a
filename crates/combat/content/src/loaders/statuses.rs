//! Status effect catalog loader.

use std::collections::HashSet;
use std::path::Path;

use combat_core::{StatusFlags, StatusTemplate};
use serde::{Deserialize, Serialize};

use crate::catalog::StatusTable;
use crate::loaders::{LoadResult, read_file};

/// Status catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusCatalogFile {
    pub statuses: Vec<StatusTemplate>,
}

/// Loader for status effect metadata from RON files.
pub struct StatusLoader;

impl StatusLoader {
    pub fn load(path: &Path) -> LoadResult<StatusTable> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parses a catalog. Well-known names pick up their behavioural flags.
    pub fn parse(content: &str) -> LoadResult<StatusTable> {
        let catalog: StatusCatalogFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse status catalog RON: {}", e))?;

        let mut ids = HashSet::new();
        let mut names = HashSet::new();
        let mut templates = Vec::with_capacity(catalog.statuses.len());
        for mut template in catalog.statuses {
            if !ids.insert(template.id) {
                anyhow::bail!("Duplicate status id {}", template.id);
            }
            if !names.insert(template.name.clone()) {
                anyhow::bail!("Duplicate status name {}", template.name);
            }
            template.flags |= StatusFlags::for_effect_name(&template.name);
            templates.push(template);
        }

        Ok(StatusTable::new(templates))
    }
}
