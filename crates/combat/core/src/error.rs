//! Common error infrastructure for combat-core.
//!
//! Every action the orchestrator refuses is described by a [`Rejection`]. The
//! variants are grouped by the taxonomy the runtime reports on:
//!
//! - **Validation**: the request itself is wrong (turn, cooldown, target class)
//! - **Data**: a record the request depends on is missing
//!
//! Neither kind mutates battle state. Persistence faults are not rejections;
//! they live in the runtime crate and propagate to the caller.

use crate::ability::{AbilityId, TargetClass};
use crate::combatant::PlayerId;

/// Severity level of an error, used for logging and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Invalid input, rejected without touching state.
    Validation,

    /// A record the request needs could not be found.
    Data,

    /// Unexpected state inconsistency. Indicates a bug.
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Data => "data",
            Self::Internal => "internal",
        }
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all combat-core errors.
pub trait CombatError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier for metrics and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// A refused player or system request.
///
/// The `Display` text is short and user-facing: presenters show it verbatim.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rejection {
    #[error("It is not your turn.")]
    NotYourTurn {
        requester: PlayerId,
        current: Option<PlayerId>,
    },

    #[error("That ability is on cooldown ({remaining:.1} turn(s) remaining).")]
    OnCooldown { ability: AbilityId, remaining: f64 },

    #[error("That ability can only be used in battle.")]
    RequiresBattle { ability: AbilityId, target: TargetClass },

    #[error("Not enough resource ({needed} needed, {available} available).")]
    InsufficientResource { needed: u32, available: u32 },

    #[error("You have fallen and cannot act.")]
    ActorDefeated { player: PlayerId },

    #[error("Your gauge is not full yet.")]
    NotReady { player: PlayerId },

    #[error("You have no Trance to enter.")]
    NoTrance { player: PlayerId },

    #[error("No active battle found.")]
    NoActiveBattle,

    #[error("A battle is already in progress.")]
    BattleInProgress,

    #[error("No active session.")]
    SessionNotFound,

    #[error("Ability not found.")]
    UnknownAbility { ability: AbilityId },

    #[error("Could not retrieve your stats.")]
    PlayerNotFound { player: PlayerId },

    #[error("Enemy data not found.")]
    EnemyNotFound,

    #[error("No ally remains to take the turn.")]
    NoLivingAlly,
}

impl CombatError for Rejection {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotYourTurn { .. }
            | Self::OnCooldown { .. }
            | Self::RequiresBattle { .. }
            | Self::InsufficientResource { .. }
            | Self::ActorDefeated { .. }
            | Self::NotReady { .. }
            | Self::NoTrance { .. }
            | Self::NoActiveBattle
            | Self::BattleInProgress
            | Self::NoLivingAlly => ErrorSeverity::Validation,
            Self::SessionNotFound
            | Self::UnknownAbility { .. }
            | Self::PlayerNotFound { .. }
            | Self::EnemyNotFound => ErrorSeverity::Data,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotYourTurn { .. } => "not_your_turn",
            Self::OnCooldown { .. } => "on_cooldown",
            Self::RequiresBattle { .. } => "requires_battle",
            Self::InsufficientResource { .. } => "insufficient_resource",
            Self::ActorDefeated { .. } => "actor_defeated",
            Self::NotReady { .. } => "not_ready",
            Self::NoTrance { .. } => "no_trance",
            Self::NoActiveBattle => "no_active_battle",
            Self::BattleInProgress => "battle_in_progress",
            Self::SessionNotFound => "session_not_found",
            Self::UnknownAbility { .. } => "unknown_ability",
            Self::PlayerNotFound { .. } => "player_not_found",
            Self::EnemyNotFound => "enemy_not_found",
            Self::NoLivingAlly => "no_living_ally",
        }
    }
}
