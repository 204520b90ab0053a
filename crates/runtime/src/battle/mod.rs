//! Battle Orchestrator.
//!
//! The state machine that ties resolution, status ticks and the gauge
//! scheduler together:
//!
//! ```text
//! idle ──start_battle──▶ active ──┬─ enemy falls ──▶ victory ─┐
//!                                 ├─ handle_flee ──▶ fled ────┼──▶ idle
//!                                 └─ party falls ──▶ defeat ──┘
//! ```
//!
//! Every public operation locks the session for its whole duration, so
//! actions and gauge callbacks never interleave on one battle record.
//! Refused requests are rendered through the presenter and returned as
//! [`ActionOutcome::Rejected`]; only repository and presenter faults surface
//! as errors.

mod enemy_turn;
mod lifecycle;
mod outcome;
mod player_turn;
mod trance;
mod turn_end;

use std::sync::{Arc, Weak};

use async_trait::async_trait;
use combat_core::{
    AbilityEngine, AbilityId, BattleRecord, CombatConfig, CombatError, Participant, PlayerId,
    Rejection, Rewards, RngOracle, StatusCatalog, StatusEffects,
};

use crate::api::Result;
use crate::events::{Event, EventBus, GaugeEvent};
use crate::presenter::{
    ActionButton, BattlePresenter, BattleView, EffectBadge, FieldView, GaugeReading, PlayerPanel,
    TranceView,
};
use crate::repository::{PlayerRecord, PlayerRepository, ReferenceRepository};
use crate::session::{Session, SessionId, SessionRegistry, SessionState};
use crate::status::StatusEffectEngine;
use crate::workers::{GaugeListener, GaugeScheduler};

/// What a player asked to do on their turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerAction {
    Attack,
    Ability(AbilityId),
}

/// How an orchestrator operation ended. A view has been rendered for every
/// variant.
#[derive(Clone, Debug, PartialEq)]
pub enum ActionOutcome {
    Started,
    /// The battle goes on.
    Continued,
    /// An out-of-battle action resolved.
    Field,
    Victory(Rewards),
    Defeat {
        allies_remaining: bool,
    },
    Fled,
    Refreshed,
    Rejected(Rejection),
}

impl ActionOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

/// External collaborators the orchestrator drives.
#[derive(Clone)]
pub struct Collaborators {
    pub players: Arc<dyn PlayerRepository>,
    pub reference: Arc<dyn ReferenceRepository>,
    pub presenter: Arc<dyn BattlePresenter>,
    pub rng: Arc<dyn RngOracle>,
}

pub struct BattleOrchestrator {
    config: CombatConfig,
    /// Fixed battle seed for reproducible runs; fresh entropy otherwise.
    battle_seed: Option<u64>,
    sessions: Arc<SessionRegistry>,
    players: Arc<dyn PlayerRepository>,
    reference: Arc<dyn ReferenceRepository>,
    presenter: Arc<dyn BattlePresenter>,
    rng: Arc<dyn RngOracle>,
    status: StatusEffectEngine,
    scheduler: GaugeScheduler,
    events: EventBus,
    this: Weak<BattleOrchestrator>,
}

impl BattleOrchestrator {
    pub fn new(
        config: CombatConfig,
        battle_seed: Option<u64>,
        sessions: Arc<SessionRegistry>,
        collaborators: Collaborators,
        scheduler: GaugeScheduler,
        events: EventBus,
    ) -> Arc<Self> {
        let Collaborators {
            players,
            reference,
            presenter,
            rng,
        } = collaborators;
        Arc::new_cyclic(|this| Self {
            config,
            battle_seed,
            sessions,
            status: StatusEffectEngine::new(Arc::clone(&players)),
            players,
            reference,
            presenter,
            rng,
            scheduler,
            events,
            this: this.clone(),
        })
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn sessions(&self) -> &Arc<SessionRegistry> {
        &self.sessions
    }

    pub fn scheduler(&self) -> &GaugeScheduler {
        &self.scheduler
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Re-renders the session's current state.
    pub async fn update_battle_view(&self, session: SessionId) -> Result<ActionOutcome> {
        let Some(handle) = self.sessions.get(session) else {
            return self.reject(session, None, Rejection::SessionNotFound).await;
        };
        let state = handle.lock().await;
        self.render(session, &state).await?;
        Ok(ActionOutcome::Refreshed)
    }

    fn session(&self, id: SessionId) -> Option<Arc<Session>> {
        self.sessions.get(id)
    }

    fn listener(&self) -> Option<Arc<dyn GaugeListener>> {
        self.this
            .upgrade()
            .map(|this| this as Arc<dyn GaugeListener>)
    }

    fn engine<'a>(&'a self, catalog: &'a dyn StatusCatalog) -> AbilityEngine<'a> {
        AbilityEngine::new(&self.config).with_catalog(catalog)
    }

    fn seed_for(&self, epoch: u64) -> u64 {
        match self.battle_seed {
            Some(seed) => seed.wrapping_add(epoch),
            None => rand::random(),
        }
    }

    fn publish(&self, event: Event) {
        self.events.publish(event);
    }

    async fn reject(
        &self,
        session: SessionId,
        player: Option<PlayerId>,
        rejection: Rejection,
    ) -> Result<ActionOutcome> {
        tracing::debug!(
            target: "combat::orchestrator",
            session = %session,
            code = rejection.error_code(),
            severity = rejection.severity().as_str(),
            "rejected: {rejection}"
        );
        self.presenter.reject(session, player, &rejection).await?;
        Ok(ActionOutcome::Rejected(rejection))
    }

    /// Renders the battle view, or the acting player's field view when no
    /// battle is active.
    async fn render(&self, session: SessionId, state: &SessionState) -> Result<()> {
        if let Some(battle) = &state.battle {
            let view = self.battle_view(session, state, battle).await?;
            self.presenter.render_battle(session, &view).await?;
            return Ok(());
        }

        let Some(current) = state.current else {
            return Ok(());
        };
        let Some(record) = self.players.fetch(session, current).await? else {
            return Ok(());
        };
        let view = FieldView {
            player: panel(&record, &record.effects),
            actions: self.buttons(state, current, &record.abilities, true).await?,
            trance: self.trance_view(state, current, true).await?,
            log: state.log.recent(self.config.view_log_lines),
        };
        self.presenter.render_field(session, &view).await?;
        Ok(())
    }

    async fn battle_view(
        &self,
        session: SessionId,
        state: &SessionState,
        battle: &BattleRecord,
    ) -> Result<BattleView> {
        let mut player = None;
        let mut actions = Vec::new();
        let mut trance = None;
        let ready = state
            .current
            .is_some_and(|current| battle.gauges.is_ready(Participant::Player(current)));
        if let Some(current) = state.current
            && let Some(record) = self.players.fetch(session, current).await?
        {
            let effects = if battle.effects_owner == current {
                &battle.player_effects
            } else {
                &record.effects
            };
            player = Some(panel(&record, effects));
            actions = self.buttons(state, current, &record.abilities, ready).await?;
            trance = self.trance_view(state, current, ready).await?;
        }

        let mut gauges: Vec<GaugeReading> = battle
            .gauges
            .players()
            .map(|(id, gauge)| GaugeReading {
                participant: Participant::Player(id),
                name: state.player_name(id),
                fraction: gauge.fraction(),
                ready: gauge.is_ready(),
            })
            .collect();
        if let Some(gauge) = battle.gauges.gauge(Participant::Enemy) {
            gauges.push(GaugeReading {
                participant: Participant::Enemy,
                name: battle.enemy.name.clone(),
                fraction: gauge.fraction(),
                ready: gauge.is_ready(),
            });
        }

        Ok(BattleView {
            enemy_name: battle.enemy.name.clone(),
            enemy_hp: battle.enemy.hp,
            enemy_effects: EffectBadge::list(&battle.enemy_effects),
            current: state.current,
            player,
            gauges,
            log: state.log.recent(self.config.view_log_lines),
            actions,
            trance,
            ready,
            awaiting_pass: state.awaiting_pass,
        })
    }

    /// Buttons for `abilities` as seen by `player`. `ready` is whether the
    /// player may act at all right now.
    async fn buttons(
        &self,
        state: &SessionState,
        player: PlayerId,
        abilities: &[AbilityId],
        ready: bool,
    ) -> Result<Vec<ActionButton>> {
        let mut actions = Vec::with_capacity(abilities.len());
        for id in abilities {
            let Some(ability) = self.reference.ability(*id).await? else {
                continue;
            };
            let cooldown = state.cooldown_remaining(player, *id);
            actions.push(ActionButton {
                ability: *id,
                name: ability.name,
                icon: ability.icon,
                cooldown,
                enabled: ready && cooldown <= 0.0,
            });
        }
        Ok(actions)
    }

    async fn trance_view(
        &self,
        state: &SessionState,
        player: PlayerId,
        ready: bool,
    ) -> Result<Option<TranceView>> {
        let Some(trance) = state.trances.get(&player) else {
            return Ok(None);
        };
        Ok(Some(TranceView {
            name: trance.name.clone(),
            remaining: trance.remaining,
            max: trance.max,
            actions: self.buttons(state, player, &trance.abilities, ready).await?,
        }))
    }

    /// Gauge callbacks for a battle that has since ended or been replaced
    /// are dropped here. The acting player's readiness enables their
    /// actions, so it redraws the view like a refresh does.
    async fn gauge_signal(
        &self,
        session: SessionId,
        epoch: u64,
        ready: Option<Participant>,
    ) -> Result<()> {
        let Some(handle) = self.session(session) else {
            return Ok(());
        };
        let state = handle.lock().await;
        if !state
            .battle
            .as_ref()
            .is_some_and(|battle| battle.epoch == epoch)
        {
            tracing::trace!(target: "combat::orchestrator", session = %session, epoch, "stale gauge signal");
            return Ok(());
        }

        if let Some(participant) = ready {
            tracing::debug!(
                target: "combat::orchestrator",
                session = %session,
                ?participant,
                "gauge ready"
            );
            self.publish(Event::Gauge(GaugeEvent::Ready {
                session,
                epoch,
                participant,
            }));
            // Only the acting player's readiness changes what may be pressed.
            if state.current.map(Participant::Player) != Some(participant) {
                return Ok(());
            }
        }
        self.render(session, &state).await
    }
}

#[async_trait]
impl GaugeListener for BattleOrchestrator {
    async fn on_participant_ready(&self, session: SessionId, epoch: u64, player: PlayerId) {
        if let Err(err) = self
            .gauge_signal(session, epoch, Some(Participant::Player(player)))
            .await
        {
            tracing::error!(target: "combat::orchestrator", session = %session, error = %err, "gauge callback failed");
        }
    }

    async fn on_enemy_ready(&self, session: SessionId, epoch: u64) {
        if let Err(err) = self
            .gauge_signal(session, epoch, Some(Participant::Enemy))
            .await
        {
            tracing::error!(target: "combat::orchestrator", session = %session, error = %err, "gauge callback failed");
        }
    }

    async fn on_tick(&self, session: SessionId, epoch: u64) {
        if let Err(err) = self.gauge_signal(session, epoch, None).await {
            tracing::error!(target: "combat::orchestrator", session = %session, error = %err, "view refresh failed");
        }
    }
}

fn panel(record: &PlayerRecord, effects: &StatusEffects) -> PlayerPanel {
    PlayerPanel {
        id: record.id,
        name: record.name.clone(),
        hp: record.hp,
        resource: record.resource,
        effects: EffectBadge::list(effects),
        alive: record.is_alive(),
    }
}
