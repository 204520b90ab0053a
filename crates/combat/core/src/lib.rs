//! Deterministic combat rules shared by the runtime and offline tools.
//!
//! `combat-core` defines the data model (combatants, abilities, status
//! effects), the ability resolution engine, status ticking over in-memory
//! pools, and the pure bookkeeping behind battles: gauges, cooldowns, turn
//! order and enemy ability selection. Nothing here performs I/O or awaits.
pub mod ability;
pub mod battle;
pub mod combatant;
pub mod config;
pub mod error;
pub mod rng;
pub mod stats;
pub mod status;

pub use ability::{
    AbilityDescriptor, AbilityEngine, AbilityId, AbilityResult, EffectDescriptor, HealGate,
    Outcome, OutcomeSpec, Recipient, ResultKind, StatusLink, TargetClass,
};
pub use battle::{
    BattleLog, BattleRecord, Cooldowns, EnemyChoice, EnemyMove, GaugeBoard, Participant, Rewards,
    SpeedEdge,
};
pub use combatant::{
    Combatant, CombatantKind, Element, ElementalRelation, EnemyId, PlayerId, Pool, RelationKind,
    ResistanceProfile, Role,
};
pub use config::CombatConfig;
pub use error::{CombatError, ErrorSeverity, Rejection};
pub use rng::{Dice, PcgRng, RngOracle, compute_seed};
pub use stats::{ScalingStat, StatBlock, StatModifiers, apply_modifiers};
pub use status::{
    EffectSide, PeriodicTick, StatusCatalog, StatusEffect, StatusEffects, StatusFlags,
    StatusTemplate, TickReport,
};
