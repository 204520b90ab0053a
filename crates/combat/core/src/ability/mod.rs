//! Ability descriptors and the resolution engine.
//!
//! [`AbilityEngine::resolve`] turns an actor, a target and an
//! [`AbilityDescriptor`] into one [`AbilityResult`]. Resolution never mutates
//! its inputs; the orchestrator applies the result.

mod effect;
mod elemental;
mod formula;
mod resolve;
mod result;

pub use effect::{
    EffectDescriptor, ExecuteBonus, HotAmount, Modifiers, OutcomeSpec, RoleBonus, Siphon,
    StatusSeed,
};
pub use formula::{scale, scaled_damage};
pub use resolve::AbilityEngine;
pub use result::{AbilityResult, Outcome, Recipient, ResultKind, ScanReport};

use std::fmt;

use crate::combatant::Element;
use crate::status::EffectSide;

/// Ability identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AbilityId(pub u32);

impl fmt::Display for AbilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ability#{}", self.0)
    }
}

/// Who an ability may be aimed at.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TargetClass {
    #[strum(serialize = "self")]
    #[cfg_attr(feature = "serde", serde(rename = "self"))]
    SelfOnly,
    #[default]
    Enemy,
    Ally,
    Any,
}

impl TargetClass {
    /// Enemy-targeted abilities need an active battle.
    pub fn requires_battle(&self) -> bool {
        matches!(self, Self::Enemy)
    }

    /// Whether the user is the resolution target.
    pub fn targets_own_side(&self) -> bool {
        matches!(self, Self::SelfOnly | Self::Ally)
    }

    /// Side that emitted statuses land on.
    pub fn effect_side(&self) -> EffectSide {
        if self.targets_own_side() {
            EffectSide::Caster
        } else {
            EffectSide::Opposing
        }
    }
}

/// Conditional self-heal used by enemy abilities.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HealGate {
    /// Heals only at or under this HP fraction.
    pub threshold: f64,
    /// Fraction of max HP restored.
    pub amount: f64,
}

/// Table link from an ability to a catalogued status.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusLink {
    pub name: String,
    pub duration: u32,
}

/// Immutable ability reference data.
#[derive(Clone, Debug, PartialEq)]
pub struct AbilityDescriptor {
    pub id: AbilityId,
    pub name: String,
    pub icon: String,
    pub cooldown: u32,
    pub target: TargetClass,
    pub element: Option<Element>,
    pub resource_cost: u32,
    /// Overrides the actor's accuracy stat.
    pub accuracy: Option<i32>,
    /// Unconditionally sets the target's HP to 1.
    pub sets_hp_to_one: bool,
    pub self_heal: Option<HealGate>,
    pub effect: EffectDescriptor,
    pub linked_statuses: Vec<StatusLink>,
}

impl AbilityDescriptor {
    pub fn new(id: AbilityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            icon: String::new(),
            cooldown: 0,
            target: TargetClass::Enemy,
            element: None,
            resource_cost: 0,
            accuracy: None,
            sets_hp_to_one: false,
            self_heal: None,
            effect: EffectDescriptor::empty(),
            linked_statuses: Vec::new(),
        }
    }

    pub fn with_effect(mut self, effect: EffectDescriptor) -> Self {
        self.effect = effect;
        self
    }

    pub fn with_target(mut self, target: TargetClass) -> Self {
        self.target = target;
        self
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.element = Some(element);
        self
    }

    pub fn with_cooldown(mut self, cooldown: u32) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn with_accuracy(mut self, accuracy: i32) -> Self {
        self.accuracy = Some(accuracy);
        self
    }

    /// Whether the enemy AI treats this as a healing ability.
    pub fn is_heal(&self) -> bool {
        self.self_heal.is_some()
    }
}
