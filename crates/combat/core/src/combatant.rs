//! Combatant snapshots: identity, pools, stats and elemental profile.

use std::collections::BTreeMap;
use std::fmt;

use crate::config::CombatConfig;
use crate::stats::StatBlock;

// ============================================================================
// Identity
// ============================================================================

/// Stable player identifier (external account key).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player#{}", self.0)
    }
}

/// Enemy template identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct EnemyId(pub u32);

impl fmt::Display for EnemyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "enemy#{}", self.0)
    }
}

/// Which side of the table a combatant sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatantKind {
    Player(PlayerId),
    Enemy(EnemyId),
}

impl CombatantKind {
    /// Numeric id used when deriving rng seeds.
    pub fn seed_key(&self) -> u64 {
        match self {
            Self::Player(id) => id.0,
            Self::Enemy(id) => u64::from(id.0) | (1 << 63),
        }
    }
}

// ============================================================================
// Pools
// ============================================================================

/// A clamped `current / max` meter (health, resource).
///
/// `current` never exceeds `max` and never drops below zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "RawPool"))]
pub struct Pool {
    current: u32,
    max: u32,
}

/// Unchecked wire shape of a [`Pool`], clamped on the way in.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawPool {
    current: u32,
    max: u32,
}

#[cfg(feature = "serde")]
impl From<RawPool> for Pool {
    fn from(raw: RawPool) -> Self {
        Self::new(raw.current, raw.max)
    }
}

impl Pool {
    pub fn new(current: u32, max: u32) -> Self {
        Self {
            current: current.min(max),
            max,
        }
    }

    pub fn full(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn is_depleted(&self) -> bool {
        self.current == 0
    }

    /// `current / max`, or `0.0` for a zero-capacity pool.
    pub fn fraction(&self) -> f64 {
        if self.max == 0 {
            0.0
        } else {
            f64::from(self.current) / f64::from(self.max)
        }
    }

    /// Removes up to `amount`, returning what was actually removed.
    pub fn drain(&mut self, amount: u32) -> u32 {
        let taken = amount.min(self.current);
        self.current -= taken;
        taken
    }

    /// Adds up to `amount`, returning what was actually restored.
    pub fn restore(&mut self, amount: u32) -> u32 {
        let room = self.max.saturating_sub(self.current);
        let added = amount.min(room);
        self.current += added;
        added
    }

    pub fn set(&mut self, value: u32) {
        self.current = value.min(self.max);
    }
}

// ============================================================================
// Role / Element
// ============================================================================

/// Encounter tier, used by role-based damage bonuses.
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
pub enum Role {
    #[default]
    Normal,
    Miniboss,
    Boss,
}

/// Elemental tag carried by abilities.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Element {
    Fire,
    Ice,
    Holy,
    NonElemental,
    Air,
}

/// How a target reacts to an element.
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
pub enum RelationKind {
    #[default]
    Normal,
    Weak,
    Resist,
    Immune,
    Absorb,
}

/// A relation plus an optional multiplier override.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementalRelation {
    pub kind: RelationKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub multiplier: Option<f64>,
}

impl ElementalRelation {
    pub fn new(kind: RelationKind) -> Self {
        Self {
            kind,
            multiplier: None,
        }
    }

    pub fn with_multiplier(kind: RelationKind, multiplier: f64) -> Self {
        Self {
            kind,
            multiplier: Some(multiplier),
        }
    }

    /// Effective multiplier for this relation. Immune is always zero.
    pub fn factor(&self, config: &CombatConfig) -> f64 {
        match self.kind {
            RelationKind::Immune => 0.0,
            RelationKind::Normal => self.multiplier.unwrap_or(1.0),
            RelationKind::Weak => self.multiplier.unwrap_or(config.weak_multiplier),
            RelationKind::Resist => self.multiplier.unwrap_or(config.resist_multiplier),
            RelationKind::Absorb => self.multiplier.unwrap_or(config.absorb_multiplier),
        }
    }
}

/// Per-element relations of one combatant. Missing entries read as normal.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ResistanceProfile {
    entries: BTreeMap<Element, ElementalRelation>,
}

impl ResistanceProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, element: Element, relation: ElementalRelation) -> Self {
        self.entries.insert(element, relation);
        self
    }

    pub fn insert(&mut self, element: Element, relation: ElementalRelation) {
        self.entries.insert(element, relation);
    }

    pub fn get(&self, element: Element) -> Option<&ElementalRelation> {
        self.entries.get(&element)
    }

    pub fn relation(&self, element: Element) -> ElementalRelation {
        self.get(element).copied().unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Element, &ElementalRelation)> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// Combatant
// ============================================================================

/// Read-only snapshot of a participant handed to the resolution engine.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub kind: CombatantKind,
    pub name: String,
    pub hp: Pool,
    pub resource: Pool,
    pub stats: StatBlock,
    pub role: Role,
    pub resistances: ResistanceProfile,
    /// Stealable currency (enemy gil pool, or the player's purse).
    pub currency: u32,
}

impl Combatant {
    pub fn player(id: PlayerId, name: impl Into<String>, hp: Pool, stats: StatBlock) -> Self {
        Self {
            kind: CombatantKind::Player(id),
            name: name.into(),
            hp,
            resource: Pool::default(),
            stats,
            role: Role::Normal,
            resistances: ResistanceProfile::default(),
            currency: 0,
        }
    }

    pub fn enemy(id: EnemyId, name: impl Into<String>, hp: Pool, stats: StatBlock) -> Self {
        Self {
            kind: CombatantKind::Enemy(id),
            name: name.into(),
            hp,
            resource: Pool::default(),
            stats,
            role: Role::Normal,
            resistances: ResistanceProfile::default(),
            currency: 0,
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.hp.is_depleted()
    }

    pub fn is_enemy(&self) -> bool {
        matches!(self.kind, CombatantKind::Enemy(_))
    }
}
