//! Repository contracts consumed by the orchestrator.

use std::sync::Arc;

use async_trait::async_trait;
use combat_content::{EnemyTemplate, TranceTemplate};
use combat_core::{
    AbilityDescriptor, AbilityId, Element, ElementalRelation, EnemyId, EnemyMove, PlayerId, Pool,
    Rewards, StatusCatalog, StatusEffects,
};

use super::error::Result;
use super::player::PlayerRecord;
use crate::session::SessionId;

/// Store for per-session player data.
///
/// Every write is a single idempotent update keyed by session and player, so
/// a caller may re-issue it after a failure.
#[async_trait]
pub trait PlayerRepository: Send + Sync {
    async fn fetch(&self, session: SessionId, player: PlayerId) -> Result<Option<PlayerRecord>>;

    /// Overwrites health, resource and currency.
    async fn save_vitals(
        &self,
        session: SessionId,
        player: PlayerId,
        hp: Pool,
        resource: Pool,
        currency: u32,
    ) -> Result<()>;

    /// Replaces the persisted effect list.
    async fn save_effects(
        &self,
        session: SessionId,
        player: PlayerId,
        effects: &StatusEffects,
    ) -> Result<()>;

    /// Class base speed used for cooldown scaling. `None` when the player or
    /// the class is unknown.
    async fn base_speed(&self, session: SessionId, player: PlayerId) -> Result<Option<i32>>;

    /// Trance of the player's class. `None` when the class has none.
    async fn trance(&self, session: SessionId, player: PlayerId) -> Result<Option<TranceTemplate>>;

    /// Sets health to zero and flags the player as fallen.
    async fn mark_dead(&self, session: SessionId, player: PlayerId) -> Result<()>;

    /// Credits experience, currency and loot.
    async fn award(&self, session: SessionId, player: PlayerId, rewards: &Rewards) -> Result<()>;
}

/// Read-only ability, enemy and status reference data.
#[async_trait]
pub trait ReferenceRepository: Send + Sync {
    async fn ability(&self, id: AbilityId) -> Result<Option<AbilityDescriptor>>;

    async fn enemy(&self, id: EnemyId) -> Result<Option<EnemyTemplate>>;

    /// The enemy's ability links resolved to descriptors, with per-enemy
    /// weight, heal gating and accuracy applied.
    async fn enemy_moves(&self, id: EnemyId) -> Result<Vec<EnemyMove>>;

    /// Relation row for `(enemy, element)`. Unknown pairs read as normal.
    async fn relation(&self, enemy: EnemyId, element: Element) -> Result<ElementalRelation> {
        Ok(self
            .enemy(enemy)
            .await?
            .map(|template| template.resistances.relation(element))
            .unwrap_or_default())
    }

    fn status_catalog(&self) -> Arc<dyn StatusCatalog>;
}
