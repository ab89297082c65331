pub mod archive;
pub mod clock;
pub mod format;
pub mod locker;
pub mod snapshot;

// Re-export commonly used types and traits (used by test crate)
pub use clock::{Clock, SystemClock};
