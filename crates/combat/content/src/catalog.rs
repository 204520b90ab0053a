//! In-memory lookup tables over loaded reference data.

use std::collections::BTreeMap;

use combat_core::{AbilityDescriptor, AbilityId, StatusCatalog, StatusTemplate};

/// Status metadata keyed by id, searchable by name.
#[derive(Clone, Debug, Default)]
pub struct StatusTable {
    templates: Vec<StatusTemplate>,
}

impl StatusTable {
    pub fn new(templates: Vec<StatusTemplate>) -> Self {
        Self { templates }
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusTemplate> {
        self.templates.iter()
    }
}

impl StatusCatalog for StatusTable {
    fn by_name(&self, name: &str) -> Option<&StatusTemplate> {
        self.templates.iter().find(|t| t.name == name)
    }

    fn by_id(&self, id: u32) -> Option<&StatusTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }
}

/// Every known ability, keyed by id.
#[derive(Clone, Debug, Default)]
pub struct AbilityBook {
    abilities: BTreeMap<AbilityId, AbilityDescriptor>,
}

impl AbilityBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_descriptors(descriptors: impl IntoIterator<Item = AbilityDescriptor>) -> Self {
        let mut book = Self::new();
        for descriptor in descriptors {
            book.insert(descriptor);
        }
        book
    }

    /// Later inserts replace earlier ones with the same id.
    pub fn insert(&mut self, descriptor: AbilityDescriptor) {
        self.abilities.insert(descriptor.id, descriptor);
    }

    pub fn get(&self, id: AbilityId) -> Option<&AbilityDescriptor> {
        self.abilities.get(&id)
    }

    /// Case-insensitive name lookup.
    pub fn by_name(&self, name: &str) -> Option<&AbilityDescriptor> {
        self.abilities
            .values()
            .find(|a| a.name.eq_ignore_ascii_case(name))
    }

    pub fn len(&self) -> usize {
        self.abilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AbilityDescriptor> {
        self.abilities.values()
    }
}
