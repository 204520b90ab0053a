use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use combat_content::{AbilityBook, ContentBundle, EnemyTemplate, StatusTable};
use combat_core::{AbilityDescriptor, AbilityId, EnemyId, EnemyMove, StatusCatalog};

use crate::repository::{ReferenceRepository, Result};

/// Reference data served straight from a loaded content bundle.
pub struct InMemoryReferenceRepo {
    abilities: AbilityBook,
    enemies: HashMap<EnemyId, EnemyTemplate>,
    statuses: Arc<StatusTable>,
}

impl InMemoryReferenceRepo {
    pub fn new(abilities: AbilityBook, enemies: Vec<EnemyTemplate>, statuses: StatusTable) -> Self {
        Self {
            abilities,
            enemies: enemies.into_iter().map(|e| (e.id, e)).collect(),
            statuses: Arc::new(statuses),
        }
    }

    pub fn from_bundle(bundle: &ContentBundle) -> Self {
        Self::new(
            bundle.abilities.clone(),
            bundle.enemies.clone(),
            bundle.statuses.clone(),
        )
    }
}

#[async_trait]
impl ReferenceRepository for InMemoryReferenceRepo {
    async fn ability(&self, id: AbilityId) -> Result<Option<AbilityDescriptor>> {
        Ok(self.abilities.get(id).cloned())
    }

    async fn enemy(&self, id: EnemyId) -> Result<Option<EnemyTemplate>> {
        Ok(self.enemies.get(&id).cloned())
    }

    async fn enemy_moves(&self, id: EnemyId) -> Result<Vec<EnemyMove>> {
        Ok(self
            .enemies
            .get(&id)
            .map(|template| template.moves(&self.abilities))
            .unwrap_or_default())
    }

    fn status_catalog(&self) -> Arc<dyn StatusCatalog> {
        self.statuses.clone()
    }
}
