//! An instrumented [`Storage`] wrapper.

use core::{alloc::Layout, cell::RefCell, fmt, ptr::NonNull};

use alloc::rc::Rc;
use hashbrown::HashMap;

use super::{Global, Storage};
use crate::error::AllocError;

#[derive(Default)]
struct State {
    live: HashMap<usize, Layout>,
    allocations: usize,
    deallocations: usize,
    limit: Option<usize>,
}

/// Records every block handed out by the wrapped provider.
///
/// Clones share their bookkeeping, so a container and every copy of its
/// allocator report into the same counters. Releasing a block that is
/// not live, or with a different layout than it was allocated with,
/// panics.
pub struct TrackingAlloc<A: Storage = Global> {
    inner: A,
    state: Rc<RefCell<State>>,
}

impl<A: Storage> TrackingAlloc<A> {
    pub fn new(inner: A) -> Self {
        TrackingAlloc {
            inner,
            state: Rc::default(),
        }
    }

    /// Fails every allocation after the first `limit` successful ones.
    pub fn with_limit(inner: A, limit: usize) -> Self {
        let alloc = Self::new(inner);
        alloc.state.borrow_mut().limit = Some(limit);
        alloc
    }

    /// Changes (or removes) the allocation limit for every clone.
    pub fn set_limit(&self, limit: Option<usize>) {
        self.state.borrow_mut().limit = limit;
    }

    /// Number of successful allocations so far.
    pub fn allocations(&self) -> usize {
        self.state.borrow().allocations
    }

    pub fn deallocations(&self) -> usize {
        self.state.borrow().deallocations
    }

    /// Number of blocks allocated and not yet released.
    pub fn live(&self) -> usize {
        self.state.borrow().live.len()
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }
}

impl<A: Storage> Clone for TrackingAlloc<A> {
    fn clone(&self) -> Self {
        TrackingAlloc {
            inner: self.inner.clone(),
            state: Rc::clone(&self.state),
        }
    }
}

impl<A: Storage> PartialEq for TrackingAlloc<A> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state) && self.inner == other.inner
    }
}

impl<A: Storage> fmt::Debug for TrackingAlloc<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("TrackingAlloc")
            .field("allocations", &state.allocations)
            .field("deallocations", &state.deallocations)
            .field("live", &state.live.len())
            .finish()
    }
}

unsafe impl<A: Storage> Storage for TrackingAlloc<A> {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        let mut state = self.state.borrow_mut();
        if let Some(limit) = state.limit
            && state.allocations >= limit
        {
            return Err(AllocError::LimitReached { limit });
        }

        let ptr = self.inner.allocate(layout)?;
        state.allocations += 1;
        // Zero-sized blocks share dangling addresses; only count them.
        if layout.size() != 0 {
            state.live.insert(ptr.addr().get(), layout);
        }
        Ok(ptr)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        {
            let mut state = self.state.borrow_mut();
            if layout.size() != 0 {
                let recorded = state.live.remove(&ptr.addr().get());
                assert_eq!(
                    recorded,
                    Some(layout),
                    "released block {ptr:p} was not live with this layout"
                );
            }
            state.deallocations += 1;
        }
        unsafe { self.inner.deallocate(ptr, layout) };
    }
}
