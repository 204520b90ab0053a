//! Async combat runtime for multiplayer dungeon sessions.
//!
//! This crate wires the pure rules in `combat-core` to sessions, storage and
//! presentation. [`Runtime`] builds a [`BattleOrchestrator`], which handles
//! player requests, runs enemy turns and drives the per-battle ATB gauge
//! scheduler.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the builder and configuration
//! - [`battle`] is the orchestrator state machine
//! - [`status`] applies status ticks to persisted and in-battle pools
//! - [`session`] owns per-session state and its lock
//! - [`repository`] and [`presenter`] define the collaborator contracts
//! - [`events`] provides the topic-based event bus
//! - [`workers`] keeps background tasks internal to the crate
pub mod api;
pub mod battle;
pub mod events;
pub mod presenter;
pub mod repository;
pub mod runtime;
pub mod session;
pub mod status;

mod workers;

pub use api::{PresenterError, Result, RuntimeError};
pub use battle::{ActionOutcome, BattleOrchestrator, Collaborators, PlayerAction};
pub use events::{BattleEnd, BattleEvent, Event, EventBus, GaugeEvent, Topic};
pub use presenter::{
    ActionButton, BattlePresenter, BattleView, EffectBadge, FieldView, GaugeReading, PlayerPanel,
    TerminalView, TranceView,
};
pub use repository::{
    InMemoryPlayerRepo, InMemoryReferenceRepo, PlayerRecord, PlayerRepository,
    ReferenceRepository, RepositoryError,
};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use session::{
    RosterEntry, Session, SessionId, SessionRegistry, SessionState, TranceState,
};
pub use status::{CombatSide, StatusEffectEngine};
pub use workers::{GaugeListener, GaugeScheduler, GaugeSettings};
