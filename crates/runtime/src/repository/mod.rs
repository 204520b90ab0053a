//! Repository layer for combat runtime data.
//!
//! Two kinds of data flow through here:
//! - Player records, which change during play (health, resource, effects)
//! - Reference data (abilities, enemies, statuses), which is read-only
//!
//! The orchestrator only talks to the traits. The in-memory implementations
//! back local runs and tests.

mod error;
mod memory;
mod player;
mod traits;

pub use error::{RepositoryError, Result};
pub use memory::{InMemoryPlayerRepo, InMemoryReferenceRepo};
pub use player::PlayerRecord;
pub use traits::{PlayerRepository, ReferenceRepository};
