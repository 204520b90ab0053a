//! Ability catalog loader.

use std::path::Path;

use combat_core::ability::OutcomeSpec;
use combat_core::{AbilityDescriptor, AbilityId, Element, StatusLink, TargetClass};
use serde::{Deserialize, Serialize};

use crate::catalog::AbilityBook;
use crate::loaders::{LoadResult, decode_effect, read_file};

/// Stored shape of one ability.
///
/// `effect` is the raw JSON effect bag; it is decoded once here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilitySpec {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub cooldown: u32,
    #[serde(default)]
    pub target: TargetClass,
    #[serde(default)]
    pub element: Option<Element>,
    #[serde(default)]
    pub resource_cost: u32,
    #[serde(default)]
    pub accuracy: Option<i32>,
    #[serde(default)]
    pub sets_hp_to_one: bool,
    #[serde(default)]
    pub effect: String,
    #[serde(default)]
    pub statuses: Vec<StatusLink>,
}

impl AbilitySpec {
    pub fn into_descriptor(self) -> AbilityDescriptor {
        let mut effect = decode_effect(&self.effect);
        // Abilities that only apply catalogued statuses must not strike.
        if effect.primary.is_none() && !self.statuses.is_empty() {
            effect.primary = Some(OutcomeSpec::StatusOnly);
        }

        AbilityDescriptor {
            id: AbilityId(self.id),
            name: self.name,
            icon: self.icon,
            cooldown: self.cooldown,
            target: self.target,
            element: self.element,
            resource_cost: self.resource_cost,
            accuracy: self.accuracy,
            sets_hp_to_one: self.sets_hp_to_one,
            self_heal: None,
            effect,
            linked_statuses: self.statuses,
        }
    }
}

/// Ability catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilityCatalog {
    pub abilities: Vec<AbilitySpec>,
}

/// Loader for the ability catalog from RON files.
pub struct AbilityLoader;

impl AbilityLoader {
    pub fn load(path: &Path) -> LoadResult<AbilityBook> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<AbilityBook> {
        let catalog: AbilityCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse ability catalog RON: {}", e))?;

        let mut book = AbilityBook::new();
        for spec in catalog.abilities {
            if book.get(AbilityId(spec.id)).is_some() {
                anyhow::bail!("Duplicate ability id {} ({})", spec.id, spec.name);
            }
            book.insert(spec.into_descriptor());
        }
        Ok(book)
    }
}
