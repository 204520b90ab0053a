use crate::combatant::{Combatant, PlayerId};
use crate::stats::{StatBlock, apply_modifiers};
use crate::status::StatusEffects;

use super::cooldown::Cooldowns;
use super::enemy_ai::EnemyMove;
use super::gauge::GaugeBoard;

/// What defeating an enemy pays out.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Rewards {
    pub experience: u32,
    pub currency: u32,
    pub loot: Option<String>,
}

/// Per-session state of one encounter.
///
/// `player_effects` always belongs to `effects_owner`, the player whose turn
/// it is. Turn switches swap the list in and out of persistence.
#[derive(Clone, Debug, PartialEq)]
pub struct BattleRecord {
    /// Distinguishes this battle from earlier ones in the same session.
    pub epoch: u64,
    pub enemy: Combatant,
    pub enemy_moves: Vec<EnemyMove>,
    pub rewards: Rewards,
    pub enemy_effects: StatusEffects,
    pub player_effects: StatusEffects,
    pub effects_owner: PlayerId,
    pub enemy_cooldowns: Cooldowns,
    pub gauges: GaugeBoard,
    /// Caps speed-edge bonus actions at one per enemy cycle.
    pub speed_bonus_used: bool,
    /// The enemy has fallen; rewards are being paid out.
    pub pending_victory: bool,
    pub seed: u64,
    nonce: u64,
}

impl BattleRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        epoch: u64,
        enemy: Combatant,
        enemy_moves: Vec<EnemyMove>,
        rewards: Rewards,
        effects_owner: PlayerId,
        player_effects: StatusEffects,
        gauges: GaugeBoard,
        seed: u64,
    ) -> Self {
        Self {
            epoch,
            enemy,
            enemy_moves,
            rewards,
            enemy_effects: StatusEffects::new(),
            player_effects,
            effects_owner,
            enemy_cooldowns: Cooldowns::new(),
            gauges,
            speed_bonus_used: false,
            pending_victory: false,
            seed,
            nonce: 0,
        }
    }

    /// Sequence number for the next rng-consuming action.
    pub fn next_nonce(&mut self) -> u64 {
        self.nonce = self.nonce.wrapping_add(1);
        self.nonce
    }

    /// Enemy stats with its side's modifiers applied.
    pub fn enemy_stats(&self) -> StatBlock {
        apply_modifiers(&self.enemy.stats, self.enemy_effects.modifiers())
    }

    /// Enemy snapshot with modified stats, as handed to the resolver.
    pub fn enemy_snapshot(&self) -> Combatant {
        let mut snapshot = self.enemy.clone();
        snapshot.stats = self.enemy_stats();
        snapshot
    }

    pub fn player_stats(&self, base: &StatBlock) -> StatBlock {
        apply_modifiers(base, self.player_effects.modifiers())
    }
}
