//! Battle entry and exit: start, victory, defeat, flight and teardown.

use std::sync::Arc;

use combat_core::{
    BattleRecord, EnemyId, GaugeBoard, Participant, PlayerId, Rejection, StatusEffects,
};

use super::{ActionOutcome, BattleOrchestrator};
use crate::api::Result;
use crate::events::{BattleEnd, BattleEvent, Event};
use crate::presenter::TerminalView;
use crate::session::{RosterEntry, SessionId, SessionState};

impl BattleOrchestrator {
    /// Opens a battle between the session's party and a fresh `enemy`.
    ///
    /// `player` must hold the turn (or the session must have none yet) and
    /// be alive. The gauge scheduler starts ticking the new battle epoch.
    pub async fn start_battle(
        &self,
        session: SessionId,
        player: PlayerId,
        enemy: EnemyId,
    ) -> Result<ActionOutcome> {
        let Some(handle) = self.session(session) else {
            return self
                .reject(session, Some(player), Rejection::SessionNotFound)
                .await;
        };
        let mut state = handle.lock().await;

        if state.in_battle() {
            return self
                .reject(session, Some(player), Rejection::BattleInProgress)
                .await;
        }
        if state.current.is_some_and(|current| current != player) {
            let rejection = Rejection::NotYourTurn {
                requester: player,
                current: state.current,
            };
            return self.reject(session, Some(player), rejection).await;
        }
        let Some(template) = self.reference.enemy(enemy).await? else {
            return self
                .reject(session, Some(player), Rejection::EnemyNotFound)
                .await;
        };
        let Some(record) = self.players.fetch(session, player).await? else {
            return self
                .reject(session, Some(player), Rejection::PlayerNotFound { player })
                .await;
        };
        if !record.is_alive() {
            return self
                .reject(session, Some(player), Rejection::ActorDefeated { player })
                .await;
        }

        state.join(player);
        self.refresh_roster(session, &mut state).await?;

        let moves = self.reference.enemy_moves(enemy).await?;
        let catalog = self.reference.status_catalog();
        let mut effects = record.effects.clone();
        effects.merge_metadata(catalog.as_ref());

        state.epoch += 1;
        let epoch = state.epoch;
        let gauges = GaugeBoard::new(
            &state.players,
            self.config.player_gauge_max,
            self.config.enemy_gauge_max,
        );
        state.battle = Some(BattleRecord::new(
            epoch,
            template.spawn(),
            moves,
            template.rewards.clone(),
            player,
            effects,
            gauges,
            self.seed_for(epoch),
        ));
        state.current = Some(player);
        state.awaiting_pass = false;
        state.log.reset(format!("A wild {} appears!", template.name));

        tracing::info!(
            target: "combat::orchestrator",
            session = %session,
            player = %player,
            enemy = %template.name,
            epoch,
            "battle started"
        );
        self.publish(Event::Battle(BattleEvent::Started {
            session,
            enemy: template.name.clone(),
            epoch,
        }));
        if let Some(listener) = self.listener() {
            self.scheduler.start(Arc::clone(&handle), epoch, listener);
        }

        self.render(session, &state).await?;
        Ok(ActionOutcome::Started)
    }

    /// Leaves the active battle. Fleeing takes a full gauge like any other
    /// combat action. The fleeing player keeps their effects and the turn
    /// passes on.
    pub async fn handle_flee(&self, session: SessionId, player: PlayerId) -> Result<ActionOutcome> {
        let Some(handle) = self.session(session) else {
            return self
                .reject(session, Some(player), Rejection::SessionNotFound)
                .await;
        };
        let mut state = handle.lock().await;

        if !state.is_turn_of(player) {
            let rejection = Rejection::NotYourTurn {
                requester: player,
                current: state.current,
            };
            return self.reject(session, Some(player), rejection).await;
        }
        if let Some(battle) = &state.battle
            && !battle.gauges.is_ready(Participant::Player(player))
        {
            return self
                .reject(session, Some(player), Rejection::NotReady { player })
                .await;
        }
        let Some(battle) = state.battle.take() else {
            return self
                .reject(session, Some(player), Rejection::NoActiveBattle)
                .await;
        };

        self.scheduler.stop(session);
        self.players
            .save_effects(session, battle.effects_owner, &battle.player_effects)
            .await?;
        state.awaiting_pass = false;
        state.log.push("You fled the battle!");

        tracing::info!(
            target: "combat::orchestrator",
            session = %session,
            player = %player,
            enemy = %battle.enemy.name,
            "fled"
        );
        self.publish(Event::Battle(BattleEvent::Ended {
            session,
            outcome: BattleEnd::Fled,
        }));

        if let Some(rejection) = self.turn_end(session, &mut state).await? {
            return self.reject(session, None, rejection).await;
        }
        Ok(ActionOutcome::Fled)
    }

    /// Stops the session's scheduler, drops any battle and closes the
    /// session. Safe to call for sessions that are already gone.
    pub async fn teardown_session(&self, session: SessionId) -> Result<()> {
        self.scheduler.stop(session);
        let Some(handle) = self.sessions.close(session) else {
            return Ok(());
        };
        let mut state = handle.lock().await;
        if let Some(battle) = state.battle.take() {
            self.players
                .save_effects(session, battle.effects_owner, &battle.player_effects)
                .await?;
            self.publish(Event::Battle(BattleEvent::Ended {
                session,
                outcome: BattleEnd::TornDown,
            }));
        }
        tracing::info!(target: "combat::orchestrator", session = %session, "session torn down");
        Ok(())
    }

    /// Closes out a battle whose enemy has fallen: rewards go to the player
    /// holding the turn and their battle effects are cleared.
    pub(super) async fn victory(
        &self,
        session: SessionId,
        state: &mut SessionState,
    ) -> Result<ActionOutcome> {
        let Some(battle) = state.battle.take() else {
            return Ok(ActionOutcome::Continued);
        };
        self.scheduler.stop(session);

        let owner = battle.effects_owner;
        let rewards = battle.rewards.clone();
        self.players
            .save_effects(session, owner, &StatusEffects::new())
            .await?;
        self.players.award(session, owner, &rewards).await?;

        state.awaiting_pass = false;
        state.log.push(format!("{} was defeated!", battle.enemy.name));
        if rewards.experience > 0 {
            state
                .log
                .push(format!("You gained {} XP.", rewards.experience));
        }
        if rewards.currency > 0 {
            state
                .log
                .push(format!("You received {} Gil.", rewards.currency));
        }
        if let Some(loot) = &rewards.loot {
            state.log.push(format!("You found {loot}."));
        }

        tracing::info!(
            target: "combat::orchestrator",
            session = %session,
            player = %owner,
            enemy = %battle.enemy.name,
            experience = rewards.experience,
            "victory"
        );
        self.publish(Event::Battle(BattleEvent::Ended {
            session,
            outcome: BattleEnd::Victory,
        }));

        let view = TerminalView::Victory {
            enemy: battle.enemy.name.clone(),
            rewards: rewards.clone(),
            log: state.log.recent(self.config.view_log_lines),
        };
        self.presenter.render_terminal(session, &view).await?;
        Ok(ActionOutcome::Victory(rewards))
    }

    /// The player holding the turn has fallen.
    ///
    /// With allies still standing the battle stays open and the session
    /// waits for the fallen player to pass. Otherwise the battle ends in
    /// defeat.
    pub(super) async fn defeat(
        &self,
        session: SessionId,
        state: &mut SessionState,
        fallen: PlayerId,
    ) -> Result<ActionOutcome> {
        self.players.mark_dead(session, fallen).await?;
        let name = state.player_name(fallen);
        if let Some(entry) = state.roster.get_mut(&fallen) {
            entry.alive = false;
        }
        state.log.push(format!("{name} has fallen!"));

        let allies_remaining = state.living().any(|id| id != fallen);
        if allies_remaining {
            state.awaiting_pass = true;
            tracing::info!(
                target: "combat::orchestrator",
                session = %session,
                player = %fallen,
                "player fell, allies remain"
            );
            self.render(session, state).await?;
            return Ok(ActionOutcome::Defeat {
                allies_remaining: true,
            });
        }

        self.scheduler.stop(session);
        if let Some(battle) = state.battle.take() {
            self.players
                .save_effects(session, battle.effects_owner, &battle.player_effects)
                .await?;
        }
        state.awaiting_pass = false;

        tracing::info!(target: "combat::orchestrator", session = %session, "party defeated");
        self.publish(Event::Battle(BattleEvent::Ended {
            session,
            outcome: BattleEnd::Defeat,
        }));
        let view = TerminalView::Defeat {
            log: state.log.recent(self.config.view_log_lines),
        };
        self.presenter.render_terminal(session, &view).await?;
        Ok(ActionOutcome::Defeat {
            allies_remaining: false,
        })
    }

    /// Re-reads every party member's name, base stats and liveness.
    pub(super) async fn refresh_roster(
        &self,
        session: SessionId,
        state: &mut SessionState,
    ) -> Result<()> {
        for id in state.players.clone() {
            match self.players.fetch(session, id).await? {
                Some(record) => {
                    let alive = record.is_alive();
                    state.roster.insert(
                        id,
                        RosterEntry {
                            name: record.name,
                            stats: record.stats,
                            alive,
                        },
                    );
                }
                None => {
                    state.roster.remove(&id);
                }
            }
        }
        Ok(())
    }
}
