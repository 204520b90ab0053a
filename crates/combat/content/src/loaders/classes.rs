//! Player class loader.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};
use crate::templates::ClassTemplate;

/// Class catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassCatalog {
    pub classes: Vec<ClassTemplate>,
}

/// Loader for class templates from RON files.
pub struct ClassLoader;

impl ClassLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<ClassTemplate>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<ClassTemplate>> {
        let catalog: ClassCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse class catalog RON: {}", e))?;
        Ok(catalog.classes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{AbilityId, CombatConfig};

    #[test]
    fn missing_base_speed_uses_default() {
        let classes = ClassLoader::parse(
            r#"(classes: [(id: 9, name: "Black Mage", hp: 200, stats: (magic_power: 20), abilities: [2, 3])])"#,
        )
        .unwrap();

        assert_eq!(classes[0].base_speed, CombatConfig::DEFAULT_CLASS_SPEED);
        assert_eq!(classes[0].abilities, vec![AbilityId(2), AbilityId(3)]);
        assert_eq!(classes[0].stats.magic_power, 20);
        assert_eq!(classes[0].trance, None);
    }

    #[test]
    fn trance_is_read_with_its_abilities() {
        let classes = ClassLoader::parse(
            r#"(classes: [(
                id: 1,
                name: "Warrior",
                hp: 300,
                abilities: [7],
                trance: Some((id: 1, name: "Berserker Trance", duration: 3, abilities: [6, 49])),
            )])"#,
        )
        .unwrap();

        let trance = classes[0].trance.as_ref().expect("warrior has a trance");
        assert_eq!(trance.name, "Berserker Trance");
        assert_eq!(trance.duration, 3);
        assert_eq!(trance.abilities, vec![AbilityId(6), AbilityId(49)]);
    }
}
