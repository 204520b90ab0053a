//! Event types for each topic.

use combat_core::{AbilityId, Participant, ResultKind};
use serde::{Deserialize, Serialize};

use crate::session::SessionId;

/// How a battle left the active state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleEnd {
    Victory,
    Defeat,
    Fled,
    TornDown,
}

/// Battle lifecycle and resolution events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BattleEvent {
    Started {
        session: SessionId,
        enemy: String,
        epoch: u64,
    },

    /// One action was resolved and applied. `ability` is `None` for a plain
    /// attack.
    ActionResolved {
        session: SessionId,
        actor: Participant,
        ability: Option<AbilityId>,
        kind: ResultKind,
        amount: u32,
    },

    Ended {
        session: SessionId,
        outcome: BattleEnd,
    },
}

/// Scheduler-driven events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GaugeEvent {
    Ready {
        session: SessionId,
        epoch: u64,
        participant: Participant,
    },
}
