use combat_core::{AbilityId, Participant, PlayerId, Pool, Rewards, StatusEffect, StatusEffects};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EffectBadge {
    pub name: String,
    pub icon: String,
    pub remaining: u32,
}

impl EffectBadge {
    pub fn from_effect(effect: &StatusEffect) -> Self {
        Self {
            name: effect.name.clone(),
            icon: effect.icon.clone(),
            remaining: effect.remaining,
        }
    }

    pub fn list(effects: &StatusEffects) -> Vec<Self> {
        effects.iter().map(Self::from_effect).collect()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlayerPanel {
    pub id: PlayerId,
    pub name: String,
    pub hp: Pool,
    pub resource: Pool,
    pub effects: Vec<EffectBadge>,
    pub alive: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GaugeReading {
    pub participant: Participant,
    pub name: String,
    /// Fill ratio in `[0, 1]`.
    pub fraction: f64,
    pub ready: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ActionButton {
    pub ability: AbilityId,
    pub name: String,
    pub icon: String,
    /// Turns until usable. Zero means off cooldown.
    pub cooldown: f64,
    /// Off cooldown and, in battle, the acting player's gauge is full.
    pub enabled: bool,
}

/// The acting player's active trance and the abilities it lends.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TranceView {
    pub name: String,
    pub remaining: u32,
    pub max: u32,
    pub actions: Vec<ActionButton>,
}

/// Everything needed to draw an active battle.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BattleView {
    pub enemy_name: String,
    pub enemy_hp: Pool,
    pub enemy_effects: Vec<EffectBadge>,
    pub current: Option<PlayerId>,
    /// Panel for the acting player.
    pub player: Option<PlayerPanel>,
    pub gauges: Vec<GaugeReading>,
    pub log: Vec<String>,
    pub actions: Vec<ActionButton>,
    pub trance: Option<TranceView>,
    /// The acting player's gauge is full. Attack and flee are enabled.
    pub ready: bool,
    /// The acting player fell and an ally may take over.
    pub awaiting_pass: bool,
}

/// Out-of-battle view for the acting player.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FieldView {
    pub player: PlayerPanel,
    pub actions: Vec<ActionButton>,
    pub trance: Option<TranceView>,
    pub log: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum TerminalView {
    Victory {
        enemy: String,
        rewards: Rewards,
        log: Vec<String>,
    },
    /// Nobody in the party is left standing.
    Defeat { log: Vec<String> },
}
