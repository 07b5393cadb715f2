//! Pixel surfaces and the sources blits read from.

pub(crate) mod pixel;
pub(crate) mod source;
