use crate::draw::operation::{Activation, DrawOperation};
use crate::surface::pixel::SurfaceRef;

/// Ordered, cyclic list of draw operations; one full traversal is one frame.
///
/// The sequence starts "not yet started". The first [`DrawSequence::advance`] lands on index 0
/// without counting as a wrap; every later return to index 0 does.
#[derive(Debug, Default)]
pub struct DrawSequence {
    ops: Vec<DrawOperation>,
    current: Option<usize>,
}

impl DrawSequence {
    /// Build a sequence; list order is draw order.
    pub fn new(ops: Vec<DrawOperation>) -> Self {
        Self { ops, current: None }
    }

    /// Append an operation at the end of the cycle.
    pub fn push(&mut self, op: DrawOperation) {
        self.ops.push(op);
    }

    /// Number of operations.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Return `true` when there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Move to the next operation. Returns `true` when this wrapped back to the first one.
    ///
    /// An empty sequence never starts.
    pub fn advance(&mut self) -> bool {
        if self.ops.is_empty() {
            return false;
        }
        match self.current {
            None => {
                self.current = Some(0);
                false
            }
            Some(i) => {
                let next = (i + 1) % self.ops.len();
                self.current = Some(next);
                next == 0
            }
        }
    }

    /// Index of the current operation, `None` before the first advance.
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// The current operation.
    pub fn current(&self) -> Option<&DrawOperation> {
        self.ops.get(self.current?)
    }

    /// Activate the current operation against `dest`.
    pub fn activate_current(&mut self, dest: SurfaceRef) -> Option<Activation> {
        let i = self.current?;
        self.ops.get_mut(i).map(|op| op.activate(dest))
    }

    /// Operations in draw order.
    pub fn ops(&self) -> &[DrawOperation] {
        &self.ops
    }
}

#[cfg(test)]
#[path = "../../tests/unit/draw/sequence.rs"]
mod tests;
