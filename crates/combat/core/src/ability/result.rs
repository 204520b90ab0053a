use crate::combatant::{Element, ElementalRelation, RelationKind};
use crate::status::StatusEffect;

/// Who receives a heal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Recipient {
    Actor,
    Target,
}

/// Target information revealed by a scan.
#[derive(Clone, Debug, PartialEq)]
pub struct ScanReport {
    pub name: String,
    pub hp: u32,
    pub max_hp: u32,
    pub relations: Vec<(Element, ElementalRelation)>,
}

/// The single primary outcome of one resolution.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    Miss,
    Damage {
        amount: u32,
        hits: u32,
    },
    Heal {
        amount: u32,
        recipient: Recipient,
    },
    SetHp {
        value: u32,
    },
    DamageOverTime {
        per_tick: u32,
        duration: u32,
        name: String,
    },
    HealOverTime {
        per_tick: u32,
        duration: u32,
        name: String,
        recipient: Recipient,
    },
    /// Resource moved from target to actor.
    Drain {
        amount: u32,
    },
    Steal {
        amount: u32,
    },
    Mug {
        damage: u32,
        stolen: u32,
    },
    Scan(ScanReport),
    StatusOnly,
}

/// Coarse outcome classification used by callers and tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResultKind {
    Miss,
    Damage,
    Heal,
    SetHp,
    Dot,
    Hot,
    Drain,
    Steal,
    Mug,
    Scan,
    StatusOnly,
}

impl Outcome {
    pub fn kind(&self) -> ResultKind {
        match self {
            Self::Miss => ResultKind::Miss,
            Self::Damage { .. } => ResultKind::Damage,
            Self::Heal { .. } => ResultKind::Heal,
            Self::SetHp { .. } => ResultKind::SetHp,
            Self::DamageOverTime { .. } => ResultKind::Dot,
            Self::HealOverTime { .. } => ResultKind::Hot,
            Self::Drain { .. } => ResultKind::Drain,
            Self::Steal { .. } => ResultKind::Steal,
            Self::Mug { .. } => ResultKind::Mug,
            Self::Scan(_) => ResultKind::Scan,
            Self::StatusOnly => ResultKind::StatusOnly,
        }
    }
}

/// Normalized result of one ability resolution. The caller applies it.
#[derive(Clone, Debug, PartialEq)]
pub struct AbilityResult {
    pub outcome: Outcome,
    pub logs: Vec<String>,
    pub status_effects: Vec<StatusEffect>,
    /// Health moved from target to actor after damage.
    pub siphon: u32,
    /// Relation consulted for this resolution, if the ability had an element.
    pub relation: Option<RelationKind>,
}

impl AbilityResult {
    pub(crate) fn new(outcome: Outcome, logs: Vec<String>) -> Self {
        Self {
            outcome,
            logs,
            status_effects: Vec::new(),
            siphon: 0,
            relation: None,
        }
    }

    pub fn kind(&self) -> ResultKind {
        self.outcome.kind()
    }

    /// Headline number: damage dealt, HP healed, value set, amount taken.
    pub fn amount(&self) -> u32 {
        match &self.outcome {
            Outcome::Damage { amount, .. }
            | Outcome::Heal { amount, .. }
            | Outcome::Drain { amount }
            | Outcome::Steal { amount } => *amount,
            Outcome::SetHp { value } => *value,
            Outcome::DamageOverTime { per_tick, .. } | Outcome::HealOverTime { per_tick, .. } => {
                *per_tick
            }
            Outcome::Mug { damage, .. } => *damage,
            Outcome::Miss | Outcome::Scan(_) | Outcome::StatusOnly => 0,
        }
    }

    pub fn is_miss(&self) -> bool {
        matches!(self.outcome, Outcome::Miss)
    }
}
