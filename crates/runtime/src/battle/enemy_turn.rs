//! The enemy's answer to a player action.

use combat_core::battle::{
    Fallback, SpeedContext, SpeedEdge, check_speed_advantage, choose_enemy_ability,
};
use combat_core::{Dice, EnemyChoice, Participant, Rejection, StatusFlags};

use super::outcome::{Party, apply_result};
use super::{ActionOutcome, BattleOrchestrator};
use crate::api::Result;
use crate::events::{BattleEvent, Event};
use crate::session::{SessionId, SessionState};
use crate::status::CombatSide;

impl BattleOrchestrator {
    /// Runs enemy actions until the enemy yields the turn, then ends the
    /// player's turn.
    ///
    /// Each action is preceded by one tick of both sides' effect lists. An
    /// enemy with a speed edge acts twice in a row, at most once per cycle.
    pub(super) async fn enemy_turn(
        &self,
        session: SessionId,
        state: &mut SessionState,
    ) -> Result<ActionOutcome> {
        let catalog = self.reference.status_catalog();
        let engine = self.engine(catalog.as_ref());

        loop {
            let SessionState { battle, log, .. } = &mut *state;
            let Some(battle) = battle.as_mut() else {
                return Ok(ActionOutcome::Continued);
            };

            self.status
                .tick_combat(session, CombatSide::Enemy, battle, log)
                .await?;
            if !battle.enemy.is_alive() {
                battle.pending_victory = true;
                return self.victory(session, state).await;
            }
            self.status
                .tick_combat(session, CombatSide::Player, battle, log)
                .await?;

            let owner = battle.effects_owner;
            let Some(mut target) = self.players.fetch(session, owner).await? else {
                return self
                    .reject(session, None, Rejection::PlayerNotFound { player: owner })
                    .await;
            };
            if target.hp.is_depleted() {
                return self.defeat(session, state, owner).await;
            }

            let enemy = battle.enemy_snapshot();
            let mut defender = target.combatant();
            defender.stats = battle.player_stats(&target.stats);
            let nonce = battle.next_nonce();
            let mut dice = Dice::new(self.rng.as_ref(), battle.seed, nonce, enemy.kind.seed_key());

            let silenced = battle.enemy_effects.has_flag(StatusFlags::SILENCE);
            let chosen = match choose_enemy_ability(
                &battle.enemy_moves,
                &mut battle.enemy_cooldowns,
                enemy.hp.fraction(),
                silenced,
                &mut dice,
            ) {
                EnemyChoice::Ability(ability) => Some(ability.clone()),
                EnemyChoice::PlainAttack(Fallback::Silenced) => {
                    log.push(format!("{} is silenced and can only attack!", enemy.name));
                    None
                }
                EnemyChoice::PlainAttack(Fallback::NoCandidate) => None,
            };

            let own_side = chosen
                .as_ref()
                .is_some_and(|ability| ability.target.targets_own_side());
            let result = match &chosen {
                None => engine.plain_attack(&enemy, &defender, &mut dice),
                Some(ability) if own_side => engine.resolve(&enemy, &enemy, ability, &mut dice),
                Some(ability) => engine.resolve(&enemy, &defender, ability, &mut dice),
            };

            let applied = {
                let mut me = Party::combatant(&mut battle.enemy, &mut battle.enemy_effects);
                let mut foe = Party::record(&mut target, &mut battle.player_effects);
                apply_result(
                    &result,
                    own_side,
                    &mut me,
                    &mut foe,
                    Some(self.config.barrier_divisor),
                    log,
                )
            };
            battle.gauges.reset(Participant::Enemy);

            self.players
                .save_vitals(session, owner, target.hp, target.resource, target.currency)
                .await?;
            self.players
                .save_effects(session, owner, &battle.player_effects)
                .await?;

            tracing::debug!(
                target: "combat::orchestrator",
                session = %session,
                enemy = %enemy.name,
                ability = chosen.as_ref().map_or("attack", |ability| ability.name.as_str()),
                kind = ?result.kind(),
                damage = applied.damage,
                stolen = applied.stolen,
                "enemy action resolved"
            );
            self.publish(Event::Battle(BattleEvent::ActionResolved {
                session,
                actor: Participant::Enemy,
                ability: chosen.as_ref().map(|ability| ability.id),
                kind: result.kind(),
                amount: result.amount(),
            }));

            if target.hp.is_depleted() {
                return self.defeat(session, state, owner).await;
            }

            let ctx = SpeedContext {
                player_speed: battle.player_stats(&target.stats).speed,
                enemy_speed: battle.enemy_stats().speed,
                player_effects: &battle.player_effects,
                enemy_effects: &battle.enemy_effects,
            };
            let edge = check_speed_advantage(
                ctx,
                SpeedEdge::Enemy,
                self.config.speed_advantage_threshold,
                &mut battle.speed_bonus_used,
            );
            if edge == Some(SpeedEdge::Enemy) {
                log.push(format!("{} strikes again due to speed!", battle.enemy.name));
                continue;
            }

            battle.speed_bonus_used = false;
            break;
        }

        if let Some(rejection) = self.turn_end(session, state).await? {
            return self.reject(session, None, rejection).await;
        }
        Ok(ActionOutcome::Continued)
    }
}
