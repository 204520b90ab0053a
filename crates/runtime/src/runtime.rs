//! High-level runtime wiring.
//!
//! The runtime owns the session registry, the event bus and the gauge
//! scheduler, and hands out the [`BattleOrchestrator`] that drives them.
//! Collaborators (repositories, presenter, rng) are injected through
//! [`RuntimeBuilder`].

use std::sync::Arc;

use tokio::sync::broadcast;

use combat_core::{CombatConfig, PcgRng, PlayerId, RngOracle};

use crate::api::{Result, RuntimeError};
use crate::battle::{BattleOrchestrator, Collaborators};
use crate::events::{Event, EventBus, Topic};
use crate::presenter::BattlePresenter;
use crate::repository::{PlayerRepository, ReferenceRepository};
use crate::session::{Session, SessionRegistry};
use crate::workers::{GaugeScheduler, GaugeSettings};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub combat: CombatConfig,
    pub event_buffer_size: usize,
    /// Queue depth between the gauge ticker and its dispatcher.
    pub command_buffer_size: usize,
    /// Fixed seed for reproducible battles. Fresh entropy per battle when
    /// unset.
    pub battle_seed: Option<u64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            combat: CombatConfig::default(),
            event_buffer_size: 100,
            command_buffer_size: 32,
            battle_seed: None,
        }
    }
}

/// Main runtime handle.
///
/// Cheap to share: every component sits behind an `Arc`.
pub struct Runtime {
    orchestrator: Arc<BattleOrchestrator>,
    sessions: Arc<SessionRegistry>,
    events: EventBus,
}

impl Runtime {
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    pub fn orchestrator(&self) -> Arc<BattleOrchestrator> {
        Arc::clone(&self.orchestrator)
    }

    pub fn sessions(&self) -> &Arc<SessionRegistry> {
        &self.sessions
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.events.subscribe(topic)
    }

    /// Opens (or returns) the session registered under `key`.
    pub fn open_session(&self, key: impl Into<String>, players: Vec<PlayerId>) -> Arc<Session> {
        self.sessions.open(key, players)
    }

    /// Stops every gauge task. Sessions and their state are left in place.
    pub fn shutdown(&self) {
        let stopped = self.orchestrator.scheduler().stop_all();
        tracing::info!(target: "combat::runtime", stopped, "runtime shut down");
    }
}

/// Builder for [`Runtime`].
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    players: Option<Arc<dyn PlayerRepository>>,
    reference: Option<Arc<dyn ReferenceRepository>>,
    presenter: Option<Arc<dyn BattlePresenter>>,
    rng: Option<Arc<dyn RngOracle>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            players: None,
            reference: None,
            presenter: None,
            rng: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the player repository (required)
    pub fn players(mut self, players: Arc<dyn PlayerRepository>) -> Self {
        self.players = Some(players);
        self
    }

    /// Set the reference-data repository (required)
    pub fn reference(mut self, reference: Arc<dyn ReferenceRepository>) -> Self {
        self.reference = Some(reference);
        self
    }

    /// Set the presentation backend (required)
    pub fn presenter(mut self, presenter: Arc<dyn BattlePresenter>) -> Self {
        self.presenter = Some(presenter);
        self
    }

    /// Set the randomness oracle. Defaults to [`PcgRng`].
    pub fn rng(mut self, rng: Arc<dyn RngOracle>) -> Self {
        self.rng = Some(rng);
        self
    }

    pub fn build(self) -> Result<Runtime> {
        let RuntimeBuilder {
            config,
            players,
            reference,
            presenter,
            rng,
        } = self;

        let collaborators = Collaborators {
            players: players.ok_or(RuntimeError::MissingComponent("a player repository"))?,
            reference: reference
                .ok_or(RuntimeError::MissingComponent("a reference repository"))?,
            presenter: presenter.ok_or(RuntimeError::MissingComponent("a presenter"))?,
            rng: rng.unwrap_or_else(|| Arc::new(PcgRng)),
        };

        let sessions = Arc::new(SessionRegistry::new(config.combat.log_capacity));
        let events = EventBus::with_capacity(config.event_buffer_size);
        let scheduler = GaugeScheduler::new(GaugeSettings::from_config(
            &config.combat,
            config.command_buffer_size,
        ));

        tracing::debug!(
            target: "combat::runtime",
            tick_ms = config.combat.gauge_tick_ms,
            seeded = config.battle_seed.is_some(),
            "runtime built"
        );

        let orchestrator = BattleOrchestrator::new(
            config.combat,
            config.battle_seed,
            Arc::clone(&sessions),
            collaborators,
            scheduler,
            events.clone(),
        );

        Ok(Runtime {
            orchestrator,
            sessions,
            events,
        })
    }
}
