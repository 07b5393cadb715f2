//! Tick-driven draw scheduling.

pub(crate) mod clock;
pub(crate) mod rate;
pub(crate) mod scheduler;
