//! Types downstream clients interact with.

mod errors;

pub use errors::{PresenterError, Result, RuntimeError};
