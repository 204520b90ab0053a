//! Enemy ability selection.

use crate::ability::{AbilityDescriptor, HealGate};
use crate::rng::Dice;

use super::cooldown::Cooldowns;

/// One ability in an enemy's repertoire.
///
/// `ability` is already merged with the enemy-specific association (heal
/// gating, accuracy override).
#[derive(Clone, Debug, PartialEq)]
pub struct EnemyMove {
    pub ability: AbilityDescriptor,
    pub weight: u32,
}

impl EnemyMove {
    pub fn new(ability: AbilityDescriptor, weight: u32) -> Self {
        Self { ability, weight }
    }

    /// Applies association fields on top of the shared descriptor.
    pub fn with_association(mut self, heal: Option<HealGate>, accuracy: Option<i32>) -> Self {
        if heal.is_some() {
            self.ability.self_heal = heal;
        }
        if accuracy.is_some() {
            self.ability.accuracy = accuracy;
        }
        self
    }
}

/// Why the enemy fell back to a plain attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fallback {
    Silenced,
    NoCandidate,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EnemyChoice<'m> {
    Ability(&'m AbilityDescriptor),
    PlainAttack(Fallback),
}

/// Picks this turn's enemy action.
///
/// A silenced enemy attacks without touching its cooldowns. Otherwise every
/// cooldown ticks down by one, candidates are the off-cooldown moves (healing
/// moves only while the enemy's HP fraction is at or under their threshold),
/// and one is drawn by weight. The chosen ability's cooldown is started.
pub fn choose_enemy_ability<'m>(
    moves: &'m [EnemyMove],
    cooldowns: &mut Cooldowns,
    hp_fraction: f64,
    silenced: bool,
    dice: &mut Dice<'_>,
) -> EnemyChoice<'m> {
    if silenced {
        return EnemyChoice::PlainAttack(Fallback::Silenced);
    }

    cooldowns.decrement();

    let candidates: Vec<&EnemyMove> = moves
        .iter()
        .filter(|m| cooldowns.is_ready(m.ability.id))
        .filter(|m| match m.ability.self_heal {
            Some(gate) => hp_fraction <= gate.threshold,
            None => true,
        })
        .collect();

    if candidates.is_empty() {
        return EnemyChoice::PlainAttack(Fallback::NoCandidate);
    }

    let total = candidates
        .iter()
        .fold(0u32, |total, m| total.saturating_add(m.weight));
    let chosen = if total == 0 {
        candidates[dice.pick(candidates.len())]
    } else {
        let roll = dice.range(1, total);
        let mut upto: u32 = 0;
        candidates
            .iter()
            .copied()
            .find(|m| {
                upto = upto.saturating_add(m.weight);
                roll <= upto
            })
            .unwrap_or(candidates[candidates.len() - 1])
    };

    cooldowns.set(chosen.ability.id, chosen.ability.cooldown);
    EnemyChoice::Ability(&chosen.ability)
}
