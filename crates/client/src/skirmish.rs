//! Scripted encounter: a small party fights one enemy until the battle ends
//! or the turn budget runs out.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use combat_content::{AbilityBook, ClassTemplate};
use combat_core::{AbilityId, EnemyId, Participant, PlayerId, TargetClass};
use combat_runtime::{
    ActionOutcome, BattleEvent, Event, InMemoryPlayerRepo, PlayerAction, PlayerRecord,
    PlayerRepository, Runtime, Session, Topic,
};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

/// Party members drawn from the first classes in the content bundle.
const PARTY_SIZE: usize = 2;

/// Gauge polls per tick while waiting for the actor to fill up.
const POLLS_PER_TICK: u32 = 4;

/// Ticks to wait for a gauge before giving up on the fight.
const MAX_WAIT_TICKS: u32 = 50;

/// How a skirmish finished.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Ending {
    Victory,
    Defeat,
    Fled,
}

pub struct Skirmish {
    runtime: Runtime,
    players: Arc<InMemoryPlayerRepo>,
    abilities: AbilityBook,
    max_turns: u32,
}

impl Skirmish {
    pub fn new(
        runtime: Runtime,
        players: Arc<InMemoryPlayerRepo>,
        abilities: AbilityBook,
        max_turns: u32,
    ) -> Self {
        Self {
            runtime,
            players,
            abilities,
            max_turns,
        }
    }

    /// Opens a session for the first classes and enrolls one character each.
    pub fn assemble(&self, classes: &[ClassTemplate]) -> Result<Arc<Session>> {
        let party: Vec<_> = classes.iter().take(PARTY_SIZE).collect();
        if party.is_empty() {
            bail!("content bundle defines no classes");
        }

        let ids: Vec<_> = (1..=party.len() as u64).map(PlayerId).collect();
        let session = self.runtime.open_session("skirmish", ids.clone());
        for (id, class) in ids.into_iter().zip(party) {
            let record = PlayerRecord::from_class(id, &class.name, class);
            self.players
                .enroll(session.id(), record)
                .with_context(|| format!("enrolling {}", class.name))?;
        }
        Ok(session)
    }

    pub async fn run(&self, session: &Session, enemy: EnemyId) -> Result<Ending> {
        let events = self.spawn_event_log();
        let ending = self.fight(session, enemy).await;
        self.runtime.orchestrator().teardown_session(session.id()).await?;
        self.runtime.shutdown();
        events.abort();
        ending
    }

    async fn fight(&self, session: &Session, enemy: EnemyId) -> Result<Ending> {
        let orchestrator = self.runtime.orchestrator();
        let id = session.id();

        let leader = self.current(session).await?;
        let outcome = orchestrator.start_battle(id, leader, enemy).await?;
        if let ActionOutcome::Rejected(rejection) = outcome {
            bail!("battle did not start: {rejection}");
        }
        if let ActionOutcome::Rejected(rejection) = orchestrator.activate_trance(id, leader).await? {
            tracing::debug!(target: "skirmish", player = %leader, "no trance: {rejection}");
        }

        for turn in 1..=self.max_turns {
            let actor = self.current(session).await?;
            if !self.until_ready(session, actor).await? {
                bail!("battle closed before {actor} could act");
            }
            let action = self.choose(session, actor).await?;
            tracing::debug!(target: "skirmish", turn, player = %actor, ?action, "acting");

            let mut outcome = orchestrator.handle_player_action(id, actor, action).await?;
            if outcome.is_rejected() && action != PlayerAction::Attack {
                outcome = orchestrator
                    .handle_player_action(id, actor, PlayerAction::Attack)
                    .await?;
            }

            match outcome {
                ActionOutcome::Victory(rewards) => {
                    tracing::info!(
                        target: "skirmish",
                        experience = rewards.experience,
                        currency = rewards.currency,
                        "victory"
                    );
                    return Ok(Ending::Victory);
                }
                ActionOutcome::Defeat {
                    allies_remaining: true,
                } => {
                    orchestrator.pass_turn(id, actor).await?;
                }
                ActionOutcome::Defeat {
                    allies_remaining: false,
                } => return Ok(Ending::Defeat),
                ActionOutcome::Fled => return Ok(Ending::Fled),
                ActionOutcome::Rejected(rejection) => {
                    bail!("{actor} cannot act: {rejection}");
                }
                _ => {}
            }
        }

        let actor = self.current(session).await?;
        tracing::info!(target: "skirmish", turns = self.max_turns, "turn budget spent, fleeing");
        if self.until_ready(session, actor).await? {
            orchestrator.handle_flee(id, actor).await?;
        }
        Ok(Ending::Fled)
    }

    /// Sleeps until `actor`'s gauge is full. Returns `false` when the battle
    /// is already over.
    async fn until_ready(&self, session: &Session, actor: PlayerId) -> Result<bool> {
        let tick = self.runtime.orchestrator().config().gauge_tick_ms;
        let poll = Duration::from_millis((tick / u64::from(POLLS_PER_TICK)).max(1));

        for _ in 0..MAX_WAIT_TICKS * POLLS_PER_TICK {
            {
                let state = session.lock().await;
                let Some(battle) = &state.battle else {
                    return Ok(false);
                };
                if battle.gauges.is_ready(Participant::Player(actor)) {
                    return Ok(true);
                }
            }
            tokio::time::sleep(poll).await;
        }
        bail!("{actor}'s gauge never filled")
    }

    async fn current(&self, session: &Session) -> Result<PlayerId> {
        session
            .lock()
            .await
            .current
            .context("session has no acting player")
    }

    /// First offensive ability that is off cooldown and affordable, trance
    /// abilities first, else a plain attack.
    async fn choose(&self, session: &Session, actor: PlayerId) -> Result<PlayerAction> {
        let Some(record) = self.players.fetch(session.id(), actor).await? else {
            return Ok(PlayerAction::Attack);
        };
        let state = session.lock().await;

        let usable = |id: &AbilityId| {
            self.abilities.get(*id).is_some_and(|ability| {
                ability.target == TargetClass::Enemy
                    && ability.resource_cost <= record.resource.current()
                    && state.cooldown_remaining(actor, *id) <= 0.0
            })
        };

        let lent = state
            .trances
            .get(&actor)
            .map(|trance| trance.abilities.as_slice())
            .unwrap_or_default();
        Ok(lent
            .iter()
            .chain(&record.abilities)
            .find(|id| usable(id))
            .map_or(PlayerAction::Attack, |id| PlayerAction::Ability(*id)))
    }

    fn spawn_event_log(&self) -> JoinHandle<()> {
        let mut events = self.runtime.subscribe(Topic::Battle);
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(Event::Battle(BattleEvent::ActionResolved {
                        actor, kind, amount, ..
                    })) => {
                        tracing::info!(target: "skirmish::events", ?actor, ?kind, amount, "resolved");
                    }
                    Ok(Event::Battle(BattleEvent::Ended { outcome, .. })) => {
                        tracing::info!(target: "skirmish::events", ?outcome, "battle ended");
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(target: "skirmish::events", skipped, "event log lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}
