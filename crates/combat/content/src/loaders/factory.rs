//! Content factory for loading every combat catalog from a data directory.

use std::path::{Path, PathBuf};

use combat_core::CombatConfig;

use crate::catalog::{AbilityBook, StatusTable};
use crate::loaders::{
    AbilityLoader, ClassLoader, ConfigLoader, EnemyLoader, LoadResult, StatusLoader,
};
use crate::templates::{ClassTemplate, EnemyTemplate};

/// Everything a runtime needs to serve reference data.
#[derive(Clone, Debug)]
pub struct ContentBundle {
    pub config: CombatConfig,
    pub abilities: AbilityBook,
    pub enemies: Vec<EnemyTemplate>,
    pub statuses: StatusTable,
    pub classes: Vec<ClassTemplate>,
}

/// Content factory that loads all combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── combat.toml
/// ├── abilities.ron
/// ├── enemies.ron
/// ├── statuses.ron
/// └── classes.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load combat tuning from `combat.toml`.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        ConfigLoader::load(&self.data_dir.join("combat.toml"))
    }

    /// Load the ability catalog from `abilities.ron`.
    pub fn load_abilities(&self) -> LoadResult<AbilityBook> {
        AbilityLoader::load(&self.data_dir.join("abilities.ron"))
    }

    /// Load enemy templates from `enemies.ron`.
    pub fn load_enemies(&self) -> LoadResult<Vec<EnemyTemplate>> {
        EnemyLoader::load(&self.data_dir.join("enemies.ron"))
    }

    /// Load status metadata from `statuses.ron`.
    pub fn load_statuses(&self) -> LoadResult<StatusTable> {
        StatusLoader::load(&self.data_dir.join("statuses.ron"))
    }

    /// Load class templates from `classes.ron`.
    pub fn load_classes(&self) -> LoadResult<Vec<ClassTemplate>> {
        ClassLoader::load(&self.data_dir.join("classes.ron"))
    }

    /// Loads every catalog and checks cross references.
    ///
    /// Enemy links, class ability lists and trance ability lists must point
    /// at known abilities, and table-linked statuses must exist in the status
    /// catalog.
    pub fn load_all(&self) -> LoadResult<ContentBundle> {
        let bundle = ContentBundle {
            config: self.load_config()?,
            abilities: self.load_abilities()?,
            enemies: self.load_enemies()?,
            statuses: self.load_statuses()?,
            classes: self.load_classes()?,
        };
        bundle.validate()?;

        tracing::info!(
            target: "combat::content",
            abilities = bundle.abilities.len(),
            enemies = bundle.enemies.len(),
            statuses = bundle.statuses.len(),
            classes = bundle.classes.len(),
            dir = %self.data_dir.display(),
            "combat content loaded"
        );
        Ok(bundle)
    }
}

impl ContentBundle {
    pub fn validate(&self) -> LoadResult<()> {
        use combat_core::StatusCatalog;

        for enemy in &self.enemies {
            for link in &enemy.abilities {
                if self.abilities.get(link.ability).is_none() {
                    anyhow::bail!("Enemy {} links unknown {}", enemy.name, link.ability);
                }
            }
        }
        for class in &self.classes {
            if let Some(id) = class.abilities.iter().find(|id| self.abilities.get(**id).is_none()) {
                anyhow::bail!("Class {} lists unknown {}", class.name, id);
            }
            if let Some(trance) = &class.trance
                && let Some(id) = trance.abilities.iter().find(|id| self.abilities.get(**id).is_none())
            {
                anyhow::bail!("Trance {} lists unknown {}", trance.name, id);
            }
        }
        for ability in self.abilities.iter() {
            for link in &ability.linked_statuses {
                if self.statuses.by_name(&link.name).is_none() {
                    anyhow::bail!("Ability {} links unknown status {}", ability.name, link.name);
                }
            }
        }
        Ok(())
    }
}
