//! Incremental drawing: chunked blits, draw operations and cyclic draw sequences.

pub(crate) mod blit;
pub(crate) mod operation;
pub(crate) mod sequence;
