//! `scholar-cache`: bounded, time-expiring store for reconciliation results.
//!
//! The cache is an explicitly constructed value owned by whatever service
//! wraps the engine. There is no process-wide instance.

mod clock;
mod handle;
mod store;

pub use clock::{Clock, ManualClock, RealClock};
pub use handle::{InvalidHandle, SessionHandle};
pub use store::{CacheConfig, ResultCache, DEFAULT_MAX_SIZE, DEFAULT_TTL};
