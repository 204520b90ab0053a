//! Status Effect Engine: periodic effects against persisted and in-battle
//! pools.
//!
//! The arithmetic lives in [`combat_core::StatusEffects::tick`]. This layer
//! decides which pool a tick lands on, narrates it into the battle log and
//! persists what changed.

use std::sync::Arc;

use combat_core::{BattleLog, BattleRecord, PlayerId, TickReport};

use crate::repository::{PlayerRepository, Result};
use crate::session::SessionId;

/// Which side of an active battle a combat tick applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CombatSide {
    Enemy,
    /// The player who currently owns the battle's player effect list.
    Player,
}

pub struct StatusEffectEngine {
    players: Arc<dyn PlayerRepository>,
}

impl StatusEffectEngine {
    pub fn new(players: Arc<dyn PlayerRepository>) -> Self {
        Self { players }
    }

    /// One out-of-combat tick of `player`'s persisted effects.
    ///
    /// A player whose health hits zero is marked dead. Returns `None` when
    /// the player is unknown.
    pub async fn tick_world(
        &self,
        session: SessionId,
        player: PlayerId,
        log: &mut BattleLog,
    ) -> Result<Option<TickReport>> {
        let Some(mut record) = self.players.fetch(session, player).await? else {
            tracing::warn!(
                target: "combat::status",
                session = %session,
                player = %player,
                "world tick for unknown player"
            );
            return Ok(None);
        };
        if record.effects.is_empty() {
            return Ok(Some(TickReport::default()));
        }

        let report = record.effects.tick(&mut record.hp);
        log.extend(report.narrate(Some(&record.name)));

        if report.damage > 0 || report.healed > 0 {
            self.players
                .save_vitals(session, player, record.hp, record.resource, record.currency)
                .await?;
        }
        self.players
            .save_effects(session, player, &record.effects)
            .await?;

        if record.hp.is_depleted() && !record.dead {
            self.players.mark_dead(session, player).await?;
            log.push(format!("{} succumbs to their wounds.", record.name));
        }

        tracing::debug!(
            target: "combat::status",
            session = %session,
            player = %player,
            damage = report.damage,
            healed = report.healed,
            remaining = record.effects.len(),
            "world tick"
        );
        Ok(Some(report))
    }

    /// One tick of `side`'s list in an active battle.
    ///
    /// The enemy side mutates the record's enemy snapshot only. The player
    /// side mutates the effect owner's persisted health and the record's
    /// player list, and persists both. Death is left to the caller.
    pub async fn tick_combat(
        &self,
        session: SessionId,
        side: CombatSide,
        record: &mut BattleRecord,
        log: &mut BattleLog,
    ) -> Result<TickReport> {
        match side {
            CombatSide::Enemy => {
                let report = record.enemy_effects.tick(&mut record.enemy.hp);
                log.extend(report.narrate(Some(&record.enemy.name)));
                Ok(report)
            }
            CombatSide::Player => {
                let owner = record.effects_owner;
                let Some(mut player) = self.players.fetch(session, owner).await? else {
                    tracing::warn!(
                        target: "combat::status",
                        session = %session,
                        player = %owner,
                        "combat tick for unknown player"
                    );
                    return Ok(TickReport::default());
                };
                if record.player_effects.is_empty() {
                    return Ok(TickReport::default());
                }

                let report = record.player_effects.tick(&mut player.hp);
                log.extend(report.narrate(Some(&player.name)));

                self.players
                    .save_vitals(session, owner, player.hp, player.resource, player.currency)
                    .await?;
                self.players
                    .save_effects(session, owner, &record.player_effects)
                    .await?;
                Ok(report)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryPlayerRepo, PlayerRecord};
    use combat_content::ClassTemplate;
    use combat_core::{
        Combatant, EffectSide, EnemyId, GaugeBoard, PeriodicTick, Pool, Rewards, StatBlock,
        StatusEffect, StatusEffects,
    };

    const S: SessionId = SessionId(1);
    const P: PlayerId = PlayerId(1);

    fn poison(remaining: u32, per_tick: u32) -> StatusEffect {
        StatusEffect::new("Poison", remaining, EffectSide::Opposing)
            .with_tick(PeriodicTick::Damage(per_tick))
    }

    fn repo_with(hp: u32, effects: Vec<StatusEffect>) -> Arc<InMemoryPlayerRepo> {
        let class = ClassTemplate {
            id: 1,
            name: "Warrior".into(),
            hp: 40,
            resource: 0,
            stats: StatBlock::default(),
            base_speed: 10,
            abilities: Vec::new(),
            trance: None,
        };
        let mut record = PlayerRecord::from_class(P, "Ash", &class);
        record.hp = Pool::new(hp, 40);
        record.effects = StatusEffects::from_vec(effects);
        let repo = Arc::new(InMemoryPlayerRepo::new(&[class]));
        repo.enroll(S, record).unwrap();
        repo
    }

    #[tokio::test]
    async fn world_tick_persists_damage_and_expiry() {
        let repo = repo_with(40, vec![poison(1, 5)]);
        let engine = StatusEffectEngine::new(repo.clone());
        let mut log = BattleLog::with_capacity(10);

        let report = engine.tick_world(S, P, &mut log).await.unwrap().unwrap();
        assert_eq!(report.damage, 5);
        assert_eq!(
            log.recent(2),
            vec![
                "Poison deals 5 damage to Ash!".to_string(),
                "Poison has worn off.".to_string()
            ]
        );

        let stored = repo.fetch(S, P).await.unwrap().unwrap();
        assert_eq!(stored.hp.current(), 35);
        assert!(stored.effects.is_empty());

        let again = engine.tick_world(S, P, &mut log).await.unwrap().unwrap();
        assert!(again.is_empty());
    }

    #[tokio::test]
    async fn lethal_world_tick_marks_the_player_dead() {
        let repo = repo_with(3, vec![poison(2, 5)]);
        let engine = StatusEffectEngine::new(repo.clone());
        let mut log = BattleLog::with_capacity(10);

        engine.tick_world(S, P, &mut log).await.unwrap();
        let stored = repo.fetch(S, P).await.unwrap().unwrap();
        assert!(stored.dead);
        assert_eq!(stored.hp.current(), 0);
    }

    #[tokio::test]
    async fn unknown_player_is_not_an_error() {
        let repo = repo_with(40, Vec::new());
        let engine = StatusEffectEngine::new(repo);
        let mut log = BattleLog::with_capacity(10);
        assert!(
            engine
                .tick_world(S, PlayerId(9), &mut log)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn combat_ticks_hit_the_requested_side() {
        let repo = repo_with(40, Vec::new());
        let engine = StatusEffectEngine::new(repo.clone());
        let mut log = BattleLog::with_capacity(10);

        let enemy = Combatant::enemy(EnemyId(1), "Slime", Pool::full(20), StatBlock::default());
        let mut record = BattleRecord::new(
            1,
            enemy,
            Vec::new(),
            Rewards::default(),
            P,
            StatusEffects::from_vec(vec![poison(3, 4)]),
            GaugeBoard::new(&[P], 5.0, 5.0),
            7,
        );
        record.enemy_effects.insert(poison(2, 6));

        let report = engine
            .tick_combat(S, CombatSide::Enemy, &mut record, &mut log)
            .await
            .unwrap();
        assert_eq!(report.damage, 6);
        assert_eq!(record.enemy.hp.current(), 14);
        assert_eq!(repo.fetch(S, P).await.unwrap().unwrap().hp.current(), 40);

        engine
            .tick_combat(S, CombatSide::Player, &mut record, &mut log)
            .await
            .unwrap();
        let stored = repo.fetch(S, P).await.unwrap().unwrap();
        assert_eq!(stored.hp.current(), 36);
        assert_eq!(stored.effects.as_slice()[0].remaining, 2);
        assert_eq!(record.enemy.hp.current(), 14);
    }
}
