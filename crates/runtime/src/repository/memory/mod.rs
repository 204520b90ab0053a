//! In-memory repository implementations for tests and local runs.

mod players;
mod reference;

pub use players::InMemoryPlayerRepo;
pub use reference::InMemoryReferenceRepo;
