//! Player actions, in and out of battle.

use combat_core::battle::{SpeedContext, SpeedEdge, check_speed_advantage, cooldown_multiplier};
use combat_core::{AbilityDescriptor, Dice, Participant, PlayerId, Rejection, apply_modifiers};

use super::outcome::{Party, apply_result, apply_to_self};
use super::{ActionOutcome, BattleOrchestrator, PlayerAction};
use crate::api::Result;
use crate::events::{BattleEvent, Event};
use crate::repository::PlayerRecord;
use crate::session::{SessionId, SessionState};

impl BattleOrchestrator {
    /// Handles `player`'s attack or ability.
    ///
    /// Preconditions are checked in order (turn, liveness, a full gauge when
    /// in battle, ability known or lent by a trance, cooldown, resource,
    /// target legality) and the first failure is returned as a rejection
    /// without touching any state.
    /// In battle the enemy answers unless the player earned a speed edge, in
    /// which case the player's gauge stays full for the bonus action.
    pub async fn handle_player_action(
        &self,
        session: SessionId,
        player: PlayerId,
        action: PlayerAction,
    ) -> Result<ActionOutcome> {
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
        if let Some(battle) = &state.battle
            && !battle.gauges.is_ready(Participant::Player(player))
        {
            return self
                .reject(session, Some(player), Rejection::NotReady { player })
                .await;
        }

        let ability = match action {
            PlayerAction::Attack => None,
            PlayerAction::Ability(id) => {
                let descriptor = if record.knows(id) || state.trance_grants(player, id) {
                    self.reference.ability(id).await?
                } else {
                    None
                };
                let Some(descriptor) = descriptor else {
                    return self
                        .reject(session, Some(player), Rejection::UnknownAbility { ability: id })
                        .await;
                };
                let remaining = state.cooldown_remaining(player, id);
                if remaining > 0.0 {
                    let rejection = Rejection::OnCooldown {
                        ability: id,
                        remaining,
                    };
                    return self.reject(session, Some(player), rejection).await;
                }
                if record.resource.current() < descriptor.resource_cost {
                    let rejection = Rejection::InsufficientResource {
                        needed: descriptor.resource_cost,
                        available: record.resource.current(),
                    };
                    return self.reject(session, Some(player), rejection).await;
                }
                Some(descriptor)
            }
        };

        if state.in_battle() {
            return self.battle_action(session, &mut state, record, ability).await;
        }
        match ability {
            None => {
                self.reject(session, Some(player), Rejection::NoActiveBattle)
                    .await
            }
            Some(ability) if ability.target.requires_battle() => {
                let rejection = Rejection::RequiresBattle {
                    ability: ability.id,
                    target: ability.target,
                };
                self.reject(session, Some(player), rejection).await
            }
            Some(ability) => self.field_cast(session, &mut state, record, ability).await,
        }
    }

    /// Hands the turn to the next living player.
    pub async fn end_player_turn(&self, session: SessionId) -> Result<ActionOutcome> {
        let Some(handle) = self.session(session) else {
            return self.reject(session, None, Rejection::SessionNotFound).await;
        };
        let mut state = handle.lock().await;
        if let Some(rejection) = self.turn_end(session, &mut state).await? {
            return self.reject(session, None, rejection).await;
        }
        Ok(ActionOutcome::Continued)
    }

    /// A fallen player gives the turn to the next living ally.
    pub async fn pass_turn(&self, session: SessionId, player: PlayerId) -> Result<ActionOutcome> {
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

        state.awaiting_pass = false;
        if let Some(rejection) = self.turn_end(session, &mut state).await? {
            return self.reject(session, Some(player), rejection).await;
        }
        Ok(ActionOutcome::Continued)
    }

    async fn battle_action(
        &self,
        session: SessionId,
        state: &mut SessionState,
        mut record: PlayerRecord,
        ability: Option<AbilityDescriptor>,
    ) -> Result<ActionOutcome> {
        let player = record.id;
        let base_speed = self
            .players
            .base_speed(session, player)
            .await?
            .unwrap_or(self.config.default_class_speed);
        let catalog = self.reference.status_catalog();
        let engine = self.engine(catalog.as_ref());

        let SessionState {
            battle,
            log,
            cooldowns,
            ..
        } = &mut *state;
        let Some(battle) = battle.as_mut() else {
            return Ok(ActionOutcome::Continued);
        };

        if let Some(ability) = &ability {
            record.resource.drain(ability.resource_cost);
        }
        let mut actor = record.combatant();
        actor.stats = battle.player_stats(&record.stats);
        let enemy = battle.enemy_snapshot();
        let nonce = battle.next_nonce();
        let mut dice = Dice::new(self.rng.as_ref(), battle.seed, nonce, actor.kind.seed_key());

        let own_side = ability
            .as_ref()
            .is_some_and(|ability| ability.target.targets_own_side());
        let result = match &ability {
            None => engine.plain_attack(&actor, &enemy, &mut dice),
            Some(ability) if own_side => engine.resolve(&actor, &actor, ability, &mut dice),
            Some(ability) => engine.resolve(&actor, &enemy, ability, &mut dice),
        };

        let applied = {
            let mut me = Party::record(&mut record, &mut battle.player_effects);
            let mut foe = Party::combatant(&mut battle.enemy, &mut battle.enemy_effects);
            apply_result(&result, own_side, &mut me, &mut foe, None, log)
        };

        let speed = battle.player_stats(&record.stats).speed;
        let player_cooldowns = cooldowns.entry(player).or_default();
        let used = ability.as_ref().map(|ability| ability.id);
        if let Some(ability) = &ability {
            player_cooldowns.set(ability.id, ability.cooldown);
        }
        player_cooldowns.reduce_by(cooldown_multiplier(speed, base_speed), used);

        self.players
            .save_vitals(session, player, record.hp, record.resource, record.currency)
            .await?;
        self.players
            .save_effects(session, player, &battle.player_effects)
            .await?;

        tracing::debug!(
            target: "combat::orchestrator",
            session = %session,
            player = %player,
            ability = ability.as_ref().map_or("attack", |ability| ability.name.as_str()),
            kind = ?result.kind(),
            damage = applied.damage,
            healed = applied.healed,
            stolen = applied.stolen,
            "player action resolved"
        );
        self.publish(Event::Battle(BattleEvent::ActionResolved {
            session,
            actor: Participant::Player(player),
            ability: used,
            kind: result.kind(),
            amount: result.amount(),
        }));

        if !battle.enemy.is_alive() {
            battle.pending_victory = true;
            return self.victory(session, state).await;
        }
        if record.hp.is_depleted() {
            return self.defeat(session, state, player).await;
        }

        let ctx = SpeedContext {
            player_speed: speed,
            enemy_speed: battle.enemy_stats().speed,
            player_effects: &battle.player_effects,
            enemy_effects: &battle.enemy_effects,
        };
        let edge = check_speed_advantage(
            ctx,
            SpeedEdge::Player,
            self.config.speed_advantage_threshold,
            &mut battle.speed_bonus_used,
        );
        if edge == Some(SpeedEdge::Player) {
            log.push(format!("{} acts again with blistering speed!", record.name));
            self.render(session, state).await?;
            return Ok(ActionOutcome::Continued);
        }
        battle.gauges.reset(Participant::Player(player));

        self.enemy_turn(session, state).await
    }

    async fn field_cast(
        &self,
        session: SessionId,
        state: &mut SessionState,
        mut record: PlayerRecord,
        ability: AbilityDescriptor,
    ) -> Result<ActionOutcome> {
        let player = record.id;
        let base_speed = self
            .players
            .base_speed(session, player)
            .await?
            .unwrap_or(self.config.default_class_speed);
        let catalog = self.reference.status_catalog();
        let engine = self.engine(catalog.as_ref());

        record.resource.drain(ability.resource_cost);
        let mut actor = record.combatant();
        actor.stats = apply_modifiers(&record.stats, record.effects.modifiers());
        let mut dice = Dice::new(
            self.rng.as_ref(),
            self.seed_for(state.epoch),
            0,
            actor.kind.seed_key(),
        );
        let result = engine.resolve(&actor, &actor, &ability, &mut dice);

        let mut effects = std::mem::take(&mut record.effects);
        let applied = {
            let mut me = Party::record(&mut record, &mut effects);
            apply_to_self(&result, &mut me, &mut state.log)
        };
        record.effects = effects;

        let speed = apply_modifiers(&record.stats, record.effects.modifiers()).speed;
        let player_cooldowns = state.cooldowns_mut(player);
        player_cooldowns.set(ability.id, ability.cooldown);
        player_cooldowns.reduce_by(cooldown_multiplier(speed, base_speed), Some(ability.id));

        self.players
            .save_vitals(session, player, record.hp, record.resource, record.currency)
            .await?;
        self.players
            .save_effects(session, player, &record.effects)
            .await?;

        tracing::debug!(
            target: "combat::orchestrator",
            session = %session,
            player = %player,
            ability = %ability.name,
            kind = ?result.kind(),
            healed = applied.healed,
            "field ability resolved"
        );
        self.publish(Event::Battle(BattleEvent::ActionResolved {
            session,
            actor: Participant::Player(player),
            ability: Some(ability.id),
            kind: result.kind(),
            amount: result.amount(),
        }));

        self.render(session, state).await?;
        Ok(ActionOutcome::Field)
    }
}
