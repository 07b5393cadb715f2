//! Visualization data derived from draw activity.

pub(crate) mod trail;
