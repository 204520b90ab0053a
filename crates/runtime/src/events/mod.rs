//! Topic-based event bus for battle observability.
//!
//! Events are best-effort: nothing in the battle flow waits on a subscriber,
//! and publishing with no subscribers is not an error.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{BattleEnd, BattleEvent, GaugeEvent};
