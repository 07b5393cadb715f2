use std::cell::{Ref, RefCell};
use std::rc::Rc;

use crate::foundation::core::BufferId;
use crate::surface::pixel::{PixelSurface, SurfaceRef};

/// Pixel source for a blit, resolved once when the blit is built.
#[derive(Clone, Debug)]
pub enum Source {
    /// A live buffer that other components may also write (e.g. the current scanout buffer).
    Surface(SurfaceRef),
    /// An immutable decoded frame or pre-rendered element.
    Image(Rc<PixelSurface>),
}

/// Read guard over a resolved [`Source`].
pub(crate) enum SourceGuard<'a> {
    Surface(Ref<'a, PixelSurface>),
    Image(&'a PixelSurface),
}

impl std::ops::Deref for SourceGuard<'_> {
    type Target = PixelSurface;

    fn deref(&self) -> &PixelSurface {
        match self {
            Self::Surface(r) => r,
            Self::Image(p) => p,
        }
    }
}

impl Source {
    /// Wrap an owned surface as an immutable image source.
    pub fn image(surface: PixelSurface) -> Self {
        Self::Image(Rc::new(surface))
    }

    /// Identity of the underlying surface.
    pub fn id(&self) -> BufferId {
        self.read().id()
    }

    /// Source dimensions as `(width, height)`.
    pub fn size(&self) -> (u32, u32) {
        let s = self.read();
        (s.width(), s.height())
    }

    /// Return `true` when this source is the very same buffer as `dest`.
    pub fn aliases(&self, dest: &SurfaceRef) -> bool {
        match self {
            Self::Surface(s) => Rc::ptr_eq(s, dest),
            Self::Image(_) => false,
        }
    }

    pub(crate) fn read(&self) -> SourceGuard<'_> {
        match self {
            Self::Surface(s) => SourceGuard::Surface(s.borrow()),
            Self::Image(p) => SourceGuard::Image(p),
        }
    }
}

/// Result of polling a [`PendingSource`].
#[derive(Debug)]
pub enum SourcePoll {
    /// Resolution still in flight; poll again on a later turn.
    Pending,
    /// Resolution finished. `None` means the source is unavailable.
    Ready(Option<Source>),
}

#[derive(Debug)]
enum PromiseSlot {
    Waiting,
    Fulfilled(Option<Source>),
}

#[derive(Debug)]
enum PendingState {
    Ready(Option<Source>),
    Delayed {
        turns: u32,
        result: Option<Source>,
    },
    Promise(Rc<RefCell<PromiseSlot>>),
    Taken,
}

/// Single-fire source resolution in flight (`Pending` until it yields once, then spent).
///
/// Polling after the result has been taken yields `Ready(None)`.
#[derive(Debug)]
pub struct PendingSource {
    state: PendingState,
}

/// Completion half of [`PendingSource::promise`].
///
/// Dropping it without calling [`SourceResolver::fulfill`] resolves the source as unavailable.
#[derive(Debug)]
pub struct SourceResolver {
    slot: Rc<RefCell<PromiseSlot>>,
}

impl SourceResolver {
    /// Complete the paired [`PendingSource`].
    pub fn fulfill(self, source: Option<Source>) {
        *self.slot.borrow_mut() = PromiseSlot::Fulfilled(source);
    }
}

impl PendingSource {
    /// Already resolved to `source`.
    pub fn ready(source: Source) -> Self {
        Self::resolved(Some(source))
    }

    /// Already resolved as unavailable.
    pub fn unavailable() -> Self {
        Self::resolved(None)
    }

    /// Already resolved to `source`, which may be unavailable.
    pub fn resolved(source: Option<Source>) -> Self {
        Self {
            state: PendingState::Ready(source),
        }
    }

    /// Resolves to `source` after `turns` pending polls.
    pub fn delayed(turns: u32, source: Option<Source>) -> Self {
        if turns == 0 {
            return Self::resolved(source);
        }
        Self {
            state: PendingState::Delayed {
                turns,
                result: source,
            },
        }
    }

    /// Unresolved source completed later through the returned [`SourceResolver`].
    pub fn promise() -> (Self, SourceResolver) {
        let slot = Rc::new(RefCell::new(PromiseSlot::Waiting));
        (
            Self {
                state: PendingState::Promise(Rc::clone(&slot)),
            },
            SourceResolver { slot },
        )
    }

    /// Advance resolution by one turn.
    pub fn poll(&mut self) -> SourcePoll {
        match std::mem::replace(&mut self.state, PendingState::Taken) {
            PendingState::Ready(src) => SourcePoll::Ready(src),
            PendingState::Delayed { turns, result } => {
                if turns <= 1 {
                    // Becomes ready on the next poll.
                    self.state = PendingState::Ready(result);
                } else {
                    self.state = PendingState::Delayed {
                        turns: turns - 1,
                        result,
                    };
                }
                SourcePoll::Pending
            }
            PendingState::Promise(slot) => {
                let taken = match &mut *slot.borrow_mut() {
                    PromiseSlot::Fulfilled(src) => Some(src.take()),
                    PromiseSlot::Waiting => None,
                };
                match taken {
                    Some(src) => SourcePoll::Ready(src),
                    None if Rc::strong_count(&slot) == 1 => SourcePoll::Ready(None),
                    None => {
                        self.state = PendingState::Promise(slot);
                        SourcePoll::Pending
                    }
                }
            }
            PendingState::Taken => SourcePoll::Ready(None),
        }
    }
}

/// Deferred supplier of blit sources, invoked once per draw-operation activation.
pub trait SurfaceSupplier {
    /// Start resolving the source for one activation.
    fn request_source(&mut self) -> PendingSource;
}

impl<F> SurfaceSupplier for F
where
    F: FnMut() -> PendingSource,
{
    fn request_source(&mut self) -> PendingSource {
        self()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/source.rs"]
mod tests;
