//! Enemy catalog loader.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};
use crate::templates::EnemyTemplate;

/// Enemy catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyCatalog {
    pub enemies: Vec<EnemyTemplate>,
}

/// Loader for enemy templates from RON files.
pub struct EnemyLoader;

impl EnemyLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<EnemyTemplate>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<EnemyTemplate>> {
        let catalog: EnemyCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse enemy catalog RON: {}", e))?;

        for enemy in &catalog.enemies {
            if enemy.hp == 0 {
                anyhow::bail!("Enemy {} has no hit points", enemy.name);
            }
            let bad_gate = enemy
                .abilities
                .iter()
                .find(|l| l.heal.is_some_and(|h| !(0.0..=1.0).contains(&h.threshold)));
            if let Some(link) = bad_gate {
                anyhow::bail!(
                    "Enemy {} heal threshold for {} is outside 0..=1",
                    enemy.name,
                    link.ability
                );
            }
        }

        Ok(catalog.enemies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{AbilityId, Element, RelationKind, Role};

    #[test]
    fn parses_links_resistances_and_rewards() {
        let enemies = EnemyLoader::parse(
            r#"(enemies: [(
                id: 1,
                name: "Bomb",
                role: miniboss,
                hp: 120,
                stats: (attack_power: 12, defense: 4, speed: 8),
                resistances: { fire: (kind: absorb), ice: (kind: weak, multiplier: Some(2.0)) },
                abilities: [
                    (ability: 2, weight: 3),
                    (ability: 1, heal: Some((threshold: 0.4, amount: 0.25))),
                ],
                rewards: (experience: 40, currency: 15),
                currency: 60,
            )])"#,
        )
        .unwrap();

        let bomb = &enemies[0];
        assert_eq!(bomb.role, Role::Miniboss);
        assert_eq!(bomb.stats.speed, 8);
        assert_eq!(bomb.resistances.relation(Element::Fire).kind, RelationKind::Absorb);
        assert_eq!(bomb.resistances.relation(Element::Ice).multiplier, Some(2.0));
        assert_eq!(bomb.abilities[0].ability, AbilityId(2));
        assert_eq!(bomb.abilities[1].weight, 1);
        assert_eq!(bomb.rewards.experience, 40);
    }

    #[test]
    fn zero_hp_enemy_is_rejected() {
        assert!(EnemyLoader::parse(r#"(enemies: [(id: 1, name: "Ghost", hp: 0)])"#).is_err());
    }
}
