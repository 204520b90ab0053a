//! Enemy and class templates.

use combat_core::{
    AbilityId, Combatant, EnemyId, EnemyMove, HealGate, Pool, ResistanceProfile, Rewards, Role,
    StatBlock,
};

use crate::catalog::AbilityBook;

/// Weighted link from an enemy to one of its abilities.
///
/// Link fields override the shared ability descriptor for this enemy only.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyAbilityLink {
    pub ability: AbilityId,
    #[cfg_attr(feature = "serde", serde(default = "default_weight"))]
    pub weight: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub heal: Option<HealGate>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub accuracy: Option<i32>,
}

#[cfg(feature = "serde")]
fn default_weight() -> u32 {
    1
}

#[cfg(feature = "serde")]
fn default_base_speed() -> i32 {
    combat_core::CombatConfig::DEFAULT_CLASS_SPEED
}

/// Stored shape of one enemy.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyTemplate {
    pub id: EnemyId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub role: Role,
    pub hp: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stats: StatBlock,
    #[cfg_attr(feature = "serde", serde(default))]
    pub resistances: ResistanceProfile,
    #[cfg_attr(feature = "serde", serde(default))]
    pub abilities: Vec<EnemyAbilityLink>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rewards: Rewards,
    /// Currency that steal and mug can take.
    #[cfg_attr(feature = "serde", serde(default))]
    pub currency: u32,
}

impl EnemyTemplate {
    /// A fresh, full-health combatant.
    pub fn spawn(&self) -> Combatant {
        let mut enemy = Combatant::enemy(self.id, &self.name, Pool::full(self.hp), self.stats);
        enemy.role = self.role;
        enemy.resistances = self.resistances.clone();
        enemy.currency = self.currency;
        enemy
    }

    /// Resolves ability links against the book. Unknown ids are skipped.
    pub fn moves(&self, book: &AbilityBook) -> Vec<EnemyMove> {
        self.abilities
            .iter()
            .filter_map(|link| {
                let Some(ability) = book.get(link.ability) else {
                    tracing::warn!(
                        target: "combat::content",
                        enemy = %self.name,
                        ability = %link.ability,
                        "enemy links an unknown ability"
                    );
                    return None;
                };
                Some(
                    EnemyMove::new(ability.clone(), link.weight)
                        .with_association(link.heal, link.accuracy),
                )
            })
            .collect()
    }
}

/// Stored shape of one player class.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassTemplate {
    pub id: u32,
    pub name: String,
    pub hp: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub resource: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stats: StatBlock,
    /// Reference speed for cooldown scaling.
    #[cfg_attr(feature = "serde", serde(default = "default_base_speed"))]
    pub base_speed: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub abilities: Vec<AbilityId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub trance: Option<TranceTemplate>,
}

/// Timed power-up a class can enter. While it lasts the holder may also use
/// the trance's abilities.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TranceTemplate {
    pub id: u32,
    pub name: String,
    /// Turns it lasts, counted at the holder's turn ends.
    pub duration: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub abilities: Vec<AbilityId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{AbilityDescriptor, Element, ElementalRelation, RelationKind};

    fn slime() -> EnemyTemplate {
        EnemyTemplate {
            id: EnemyId(3),
            name: "Slime".into(),
            role: Role::Miniboss,
            hp: 40,
            stats: StatBlock::default(),
            resistances: ResistanceProfile::new()
                .with(Element::Fire, ElementalRelation::new(RelationKind::Weak)),
            abilities: vec![
                EnemyAbilityLink {
                    ability: AbilityId(1),
                    weight: 3,
                    heal: Some(HealGate {
                        threshold: 0.5,
                        amount: 0.2,
                    }),
                    accuracy: Some(80),
                },
                EnemyAbilityLink {
                    ability: AbilityId(99),
                    weight: 1,
                    heal: None,
                    accuracy: None,
                },
            ],
            rewards: Rewards::default(),
            currency: 25,
        }
    }

    #[test]
    fn spawn_starts_at_full_health() {
        let enemy = slime().spawn();
        assert_eq!(enemy.hp, Pool::full(40));
        assert_eq!(enemy.role, Role::Miniboss);
        assert_eq!(enemy.currency, 25);
        assert_eq!(enemy.resistances.relation(Element::Fire).kind, RelationKind::Weak);
    }

    #[test]
    fn moves_apply_link_overrides_and_skip_unknown_abilities() {
        let book = AbilityBook::from_descriptors([AbilityDescriptor::new(AbilityId(1), "Cure")]);
        let moves = slime().moves(&book);

        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].weight, 3);
        assert!(moves[0].ability.is_heal());
        assert_eq!(moves[0].ability.accuracy, Some(80));
    }
}
