//! Background tasks that back the runtime orchestration.
//!
//! Only the gauge scheduler lives here for now; everything else reacts to
//! discrete requests on the caller's task.

mod gauge;

pub use gauge::{GaugeListener, GaugeScheduler, GaugeSettings};
