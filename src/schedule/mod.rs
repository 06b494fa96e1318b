//! Timers on top of the cache: periodic polling and search debouncing.

pub mod debounce;
pub mod polling;

pub use debounce::{SearchDebouncer, DEFAULT_QUIET_WINDOW};
pub use polling::{PollEvent, PollLoader, PollingScheduler};
