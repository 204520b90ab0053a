//! Decoded effect descriptors.
//!
//! Stored descriptors are open key/value bags. They are decoded once at load
//! time into an [`EffectDescriptor`]: at most one primary [`OutcomeSpec`],
//! post-outcome [`Modifiers`] and an optional stat-modifying status seed.

use crate::combatant::Role;
use crate::stats::{ScalingStat, StatModifiers};

/// One possible primary outcome of an ability.
///
/// Variants are listed in resolution precedence; see [`OutcomeSpec::rank`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OutcomeSpec {
    /// Reveal target HP and resistance profile.
    Scan,
    /// `hits` independent scaling strikes.
    MultiHit {
        hits: u32,
        base_damage: u32,
        stat: ScalingStat,
        factor: f64,
    },
    /// Defense-ignoring fixed damage.
    FlatDamage { amount: u32 },
    /// Ratio-formula damage.
    Scaling {
        base_damage: u32,
        stat: ScalingStat,
        factor: f64,
    },
    FlatHeal { amount: u32 },
    /// Heal a fraction of the recipient's current HP.
    PercentHeal { fraction: f64 },
    /// Jackpot roll keyed off the actor's HP digits.
    Lucky,
    /// Damage a fraction of the target's current HP.
    PercentDamage { fraction: f64 },
    /// Move resource from target to actor.
    ResourceDrain { amount: u32 },
    DamageOverTime {
        name: Option<String>,
        per_tick: u32,
        duration: u32,
    },
    HealOverTime {
        name: Option<String>,
        amount: HotAmount,
        duration: u32,
    },
    /// Take a share of the target's currency.
    Steal,
    /// Physical strike plus a steal.
    Mug { base_damage: u32 },
    /// No direct outcome; only the emitted status matters.
    StatusOnly,
}

impl OutcomeSpec {
    /// Precedence rank, lower wins.
    pub const fn rank(&self) -> u8 {
        match self {
            Self::Scan => 0,
            Self::MultiHit { .. } => 1,
            Self::FlatDamage { .. } => 2,
            Self::Scaling { .. } => 3,
            Self::FlatHeal { .. } => 4,
            Self::PercentHeal { .. } => 5,
            Self::Lucky => 6,
            Self::PercentDamage { .. } => 7,
            Self::ResourceDrain { .. } => 8,
            Self::DamageOverTime { .. } => 9,
            Self::HealOverTime { .. } => 10,
            Self::Steal => 11,
            Self::Mug { .. } => 12,
            Self::StatusOnly => 13,
        }
    }

    /// Whether elemental relations and damage modifiers apply.
    pub const fn is_damaging(&self) -> bool {
        matches!(
            self,
            Self::MultiHit { .. }
                | Self::FlatDamage { .. }
                | Self::Scaling { .. }
                | Self::Lucky
                | Self::PercentDamage { .. }
                | Self::DamageOverTime { .. }
                | Self::Mug { .. }
        )
    }
}

/// Per-tick heal amount for heal-over-time outcomes.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HotAmount {
    Flat(u32),
    /// Fraction of the recipient's max HP.
    PercentMax(f64),
}

/// Conditional bonus when the target is low.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExecuteBonus {
    pub threshold: f64,
    pub multiplier: f64,
}

/// Bonus against specific encounter tiers.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoleBonus {
    pub roles: Vec<Role>,
    pub multiplier: f64,
}

/// Health siphoned from target to actor after damage lands.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Siphon {
    Flat(u32),
    /// Fraction of the final damage dealt.
    Percent(f64),
}

/// Post-outcome modifiers, applied execute → role → element → siphon.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Modifiers {
    pub execute: Option<ExecuteBonus>,
    pub role_bonus: Option<RoleBonus>,
    pub siphon: Option<Siphon>,
}

/// A stat-modifying status the ability grants on resolution.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusSeed {
    pub name: Option<String>,
    pub duration: u32,
    pub modifiers: StatModifiers,
}

/// Decoded effect descriptor.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EffectDescriptor {
    pub primary: Option<OutcomeSpec>,
    pub modifiers: Modifiers,
    pub status: Option<StatusSeed>,
}

impl EffectDescriptor {
    /// An empty descriptor. Resolves to the physical fallback.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with(primary: OutcomeSpec) -> Self {
        Self {
            primary: Some(primary),
            ..Self::default()
        }
    }

    /// Builds a descriptor from every outcome a stored bag named, keeping the
    /// one with the highest precedence.
    pub fn from_candidates(candidates: Vec<OutcomeSpec>) -> Self {
        let primary = candidates.into_iter().min_by_key(OutcomeSpec::rank);
        Self {
            primary,
            ..Self::default()
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_status(mut self, status: StatusSeed) -> Self {
        self.status = Some(status);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highest_precedence_candidate_wins() {
        let descriptor = EffectDescriptor::from_candidates(vec![
            OutcomeSpec::Steal,
            OutcomeSpec::FlatHeal { amount: 5 },
            OutcomeSpec::DamageOverTime {
                name: None,
                per_tick: 3,
                duration: 2,
            },
        ]);
        assert_eq!(descriptor.primary, Some(OutcomeSpec::FlatHeal { amount: 5 }));
    }

    #[test]
    fn scan_beats_everything() {
        let descriptor = EffectDescriptor::from_candidates(vec![
            OutcomeSpec::Mug { base_damage: 1 },
            OutcomeSpec::Scan,
        ]);
        assert_eq!(descriptor.primary, Some(OutcomeSpec::Scan));
    }

    #[test]
    fn no_candidates_means_fallback() {
        assert!(EffectDescriptor::from_candidates(Vec::new()).primary.is_none());
    }
}
