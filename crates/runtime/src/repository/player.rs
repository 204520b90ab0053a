use combat_content::ClassTemplate;
use combat_core::{AbilityId, Combatant, PlayerId, Pool, StatBlock, StatusEffects};

/// Persisted shape of one player within a session.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub name: String,
    pub class_id: u32,
    pub hp: Pool,
    pub resource: Pool,
    pub stats: StatBlock,
    /// Effects carried outside battle, and the acting player's list while a
    /// battle swaps it in.
    pub effects: StatusEffects,
    pub currency: u32,
    pub experience: u32,
    pub abilities: Vec<AbilityId>,
    pub inventory: Vec<String>,
    pub dead: bool,
}

impl PlayerRecord {
    /// A fresh character of `class` at full health and resource.
    pub fn from_class(id: PlayerId, name: impl Into<String>, class: &ClassTemplate) -> Self {
        Self {
            id,
            name: name.into(),
            class_id: class.id,
            hp: Pool::full(class.hp),
            resource: Pool::full(class.resource),
            stats: class.stats,
            effects: StatusEffects::new(),
            currency: 0,
            experience: 0,
            abilities: class.abilities.clone(),
            inventory: Vec::new(),
            dead: false,
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.dead && !self.hp.is_depleted()
    }

    pub fn knows(&self, ability: AbilityId) -> bool {
        self.abilities.contains(&ability)
    }

    /// Snapshot handed to the resolver, with base stats.
    pub fn combatant(&self) -> Combatant {
        let mut combatant = Combatant::player(self.id, &self.name, self.hp, self.stats);
        combatant.resource = self.resource;
        combatant.currency = self.currency;
        combatant
    }
}
