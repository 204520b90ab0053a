//! Sessions own everything one party's battles need.
//!
//! Each [`Session`] guards its [`SessionState`] with an async mutex. The
//! orchestrator and the gauge scheduler both take that lock, which is the only
//! way a battle record is reached, so no two mutations ever interleave.

mod registry;
mod state;

pub use registry::{Session, SessionId, SessionRegistry};
pub use state::{RosterEntry, SessionState, TranceState};
