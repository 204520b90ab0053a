use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use combat_content::{ClassTemplate, TranceTemplate};
use combat_core::{PlayerId, Pool, Rewards, StatusEffects};

use crate::repository::{PlayerRecord, PlayerRepository, RepositoryError, Result};
use crate::session::SessionId;

type Key = (SessionId, PlayerId);

/// In-memory implementation of [`PlayerRepository`].
///
/// Class base speeds and trances are captured at construction so cooldown
/// scaling and trance lookups do not need a second store.
pub struct InMemoryPlayerRepo {
    records: RwLock<HashMap<Key, PlayerRecord>>,
    class_speeds: HashMap<u32, i32>,
    class_trances: HashMap<u32, TranceTemplate>,
}

impl InMemoryPlayerRepo {
    pub fn new(classes: &[ClassTemplate]) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            class_speeds: classes.iter().map(|c| (c.id, c.base_speed)).collect(),
            class_trances: classes
                .iter()
                .filter_map(|c| c.trance.clone().map(|trance| (c.id, trance)))
                .collect(),
        }
    }

    fn class_id(&self, session: SessionId, player: PlayerId) -> Result<Option<u32>> {
        let records = self
            .records
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(records.get(&(session, player)).map(|record| record.class_id))
    }

    /// Adds or replaces a player in `session`.
    pub fn enroll(&self, session: SessionId, record: PlayerRecord) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        records.insert((session, record.id), record);
        Ok(())
    }

    /// Drops every record belonging to `session`.
    pub fn forget_session(&self, session: SessionId) -> Result<usize> {
        let mut records = self
            .records
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let before = records.len();
        records.retain(|(sid, _), _| *sid != session);
        Ok(before - records.len())
    }

    fn update<F>(&self, session: SessionId, player: PlayerId, apply: F) -> Result<()>
    where
        F: FnOnce(&mut PlayerRecord),
    {
        let mut records = self
            .records
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let record = records
            .get_mut(&(session, player))
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "player",
                key: format!("{session}/{player}"),
            })?;
        apply(record);
        Ok(())
    }
}

impl Default for InMemoryPlayerRepo {
    fn default() -> Self {
        Self::new(&[])
    }
}

#[async_trait]
impl PlayerRepository for InMemoryPlayerRepo {
    async fn fetch(&self, session: SessionId, player: PlayerId) -> Result<Option<PlayerRecord>> {
        let records = self
            .records
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(records.get(&(session, player)).cloned())
    }

    async fn save_vitals(
        &self,
        session: SessionId,
        player: PlayerId,
        hp: Pool,
        resource: Pool,
        currency: u32,
    ) -> Result<()> {
        self.update(session, player, |record| {
            record.hp = hp;
            record.resource = resource;
            record.currency = currency;
        })
    }

    async fn save_effects(
        &self,
        session: SessionId,
        player: PlayerId,
        effects: &StatusEffects,
    ) -> Result<()> {
        self.update(session, player, |record| record.effects = effects.clone())
    }

    async fn base_speed(&self, session: SessionId, player: PlayerId) -> Result<Option<i32>> {
        Ok(self
            .class_id(session, player)?
            .and_then(|class| self.class_speeds.get(&class).copied()))
    }

    async fn trance(&self, session: SessionId, player: PlayerId) -> Result<Option<TranceTemplate>> {
        Ok(self
            .class_id(session, player)?
            .and_then(|class| self.class_trances.get(&class).cloned()))
    }

    async fn mark_dead(&self, session: SessionId, player: PlayerId) -> Result<()> {
        self.update(session, player, |record| {
            record.hp.set(0);
            record.dead = true;
        })
    }

    async fn award(&self, session: SessionId, player: PlayerId, rewards: &Rewards) -> Result<()> {
        self.update(session, player, |record| {
            record.experience = record.experience.saturating_add(rewards.experience);
            record.currency = record.currency.saturating_add(rewards.currency);
            if let Some(loot) = &rewards.loot {
                record.inventory.push(loot.clone());
            }
        })
    }
}
