//! Timed status effects and the per-side effect list.
//!
//! A [`StatusEffect`] is one instance afflicting one side of a battle (or a
//! player out of combat). [`StatusEffects`] is the ordered list that owns
//! them; its [`tick`](StatusEffects::tick) applies periodic damage and healing
//! and evicts expired instances. Catalog metadata (icon, modifiers, flags) is
//! merged in by name through a [`StatusCatalog`].

mod tick;

pub use tick::{TickLine, TickReport};

use bitflags::bitflags;

use crate::stats::StatModifiers;

bitflags! {
    /// Behavioural flags a status may carry.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct StatusFlags: u8 {
        /// Blocks ability use; the afflicted enemy falls back to plain attacks.
        const SILENCE = 1 << 0;
        /// Halves incoming enemy damage.
        const BARRIER = 1 << 1;
    }
}

impl StatusFlags {
    /// Flags implied by well-known effect names.
    pub fn for_effect_name(name: &str) -> Self {
        match name {
            "Silence" => Self::SILENCE,
            "Barrier" => Self::BARRIER,
            _ => Self::empty(),
        }
    }
}

/// Which side an emitted effect lands on, relative to the ability's user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectSide {
    /// The user's own side.
    Caster,
    /// The side the user is acting against.
    Opposing,
}

/// Periodic payload. Damage and heal are mutually exclusive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PeriodicTick {
    #[default]
    None,
    Damage(u32),
    Heal(u32),
}

/// One active effect instance.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub id: Option<u32>,
    pub name: String,
    /// Turns left. Always `> 0` while the instance sits in a list.
    pub remaining: u32,
    pub tick: PeriodicTick,
    pub side: EffectSide,
    pub icon: String,
    pub modifiers: StatModifiers,
    pub flags: StatusFlags,
}

impl StatusEffect {
    pub fn new(name: impl Into<String>, remaining: u32, side: EffectSide) -> Self {
        let name = name.into();
        let flags = StatusFlags::for_effect_name(&name);
        Self {
            id: None,
            name,
            remaining,
            tick: PeriodicTick::None,
            side,
            icon: String::new(),
            modifiers: StatModifiers::default(),
            flags,
        }
    }

    pub fn with_tick(mut self, tick: PeriodicTick) -> Self {
        self.tick = tick;
        self
    }

    pub fn with_modifiers(mut self, modifiers: StatModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_flags(mut self, flags: StatusFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Overwrites catalog-owned fields from `template`.
    ///
    /// Runtime fields (`remaining`, `tick`, `side`) are left alone unless the
    /// instance has no modifiers of its own.
    pub fn merge_metadata(&mut self, template: &StatusTemplate) {
        self.id = Some(template.id);
        if !template.icon.is_empty() {
            self.icon = template.icon.clone();
        }
        if self.modifiers.is_empty() {
            self.modifiers = template.modifiers;
        } else {
            self.modifiers.overlay(&template.modifiers);
        }
        self.flags |= template.flags;
    }
}

/// Catalog row describing a named status.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusTemplate {
    pub id: u32,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub icon: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub modifiers: StatModifiers,
    #[cfg_attr(feature = "serde", serde(default))]
    pub flags: StatusFlags,
}

impl StatusTemplate {
    /// Fresh instance of this status with the given duration.
    pub fn instantiate(&self, remaining: u32, side: EffectSide) -> StatusEffect {
        let mut effect = StatusEffect::new(self.name.clone(), remaining, side);
        effect.merge_metadata(self);
        effect
    }
}

/// Read access to status metadata by name or id.
pub trait StatusCatalog: Send + Sync {
    fn by_name(&self, name: &str) -> Option<&StatusTemplate>;

    fn by_id(&self, id: u32) -> Option<&StatusTemplate>;
}

/// Ordered list of effects afflicting one side.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    entries: Vec<StatusEffect>,
}

impl StatusEffects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(entries: Vec<StatusEffect>) -> Self {
        let mut list = Self::new();
        for effect in entries {
            list.insert(effect);
        }
        list
    }

    /// Adds `effect`, or refreshes the same-named instance in place.
    ///
    /// Instances with `remaining == 0` are dropped.
    pub fn insert(&mut self, effect: StatusEffect) {
        if effect.remaining == 0 {
            return;
        }
        match self.entries.iter_mut().find(|e| e.name == effect.name) {
            Some(existing) => {
                existing.remaining = effect.remaining;
                if effect.tick != PeriodicTick::None {
                    existing.tick = effect.tick;
                }
                if effect.id.is_some() {
                    existing.id = effect.id;
                }
                if !effect.icon.is_empty() {
                    existing.icon = effect.icon;
                }
                existing.modifiers.overlay(&effect.modifiers);
                existing.flags |= effect.flags;
            }
            None => self.entries.push(effect),
        }
    }

    /// Enriches every instance from `catalog` by name.
    pub fn merge_metadata(&mut self, catalog: &dyn StatusCatalog) {
        for effect in &mut self.entries {
            if let Some(template) = catalog.by_name(&effect.name) {
                effect.merge_metadata(template);
            }
        }
    }

    pub fn has_flag(&self, flag: StatusFlags) -> bool {
        self.entries.iter().any(|e| e.flags.contains(flag))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    /// Stat modifiers in list order.
    pub fn modifiers(&self) -> impl Iterator<Item = &StatModifiers> {
        self.entries.iter().map(|e| &e.modifiers)
    }

    pub fn any_speed_up(&self) -> bool {
        self.entries.iter().any(|e| e.modifiers.speed_up > 0)
    }

    pub fn any_speed_down(&self) -> bool {
        self.entries.iter().any(|e| e.modifiers.speed_down > 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn into_vec(self) -> Vec<StatusEffect> {
        self.entries
    }

    pub fn as_slice(&self) -> &[StatusEffect] {
        &self.entries
    }
}
