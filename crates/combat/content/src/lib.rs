//! Combat reference data and the loaders that read it.
//!
//! - Ability catalogs (RON, with JSON effect bags decoded at load time)
//! - Enemy templates with weighted ability links (RON)
//! - Status effect catalogs (RON)
//! - Class templates (RON)
//! - Combat tuning (TOML)
//!
//! Reference data is read-only once loaded. The runtime serves it through its
//! reference repository and never writes it back.

pub mod catalog;
pub mod templates;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalog::{AbilityBook, StatusTable};
pub use templates::{ClassTemplate, EnemyAbilityLink, EnemyTemplate, TranceTemplate};

#[cfg(feature = "loaders")]
pub use loaders::{
    AbilityLoader, AbilitySpec, ClassLoader, ConfigLoader, ContentBundle, ContentFactory,
    EnemyLoader, StatusLoader, decode_effect,
};
