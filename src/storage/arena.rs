//! Fixed-capacity bump arena and the handle that exposes it as a
//! [`Storage`] provider.
//!
//! ```text
//!   Arena<N>
//!   ┌──────┬─────┬──────┬───┬─────────────────────────────┐
//!   │  A1  │ pad │  A2  │A3 │         remaining            │
//!   └──────┴─────┴──────┴───┴─────────────────────────────┘
//!                            ▲                             ▲
//!                          cursor                          N
//! ```
//!
//! Blocks are carved sequentially and never released one by one: the
//! whole buffer is reclaimed by [`Arena::reset`] or when the arena is
//! dropped. A request that does not fit fails with
//! [`AllocError::ArenaExhausted`] and leaves the cursor untouched.

use core::{
    alloc::Layout,
    cell::{Cell, UnsafeCell},
    fmt,
    mem::MaybeUninit,
    ptr::{self, NonNull},
};

use log::{debug, trace};

use super::Storage;
use crate::error::AllocError;

/// Alignment of the first byte of every arena buffer.
pub const ARENA_ALIGN: usize = 16;

#[repr(C, align(16))]
struct Buffer<const N: usize>([MaybeUninit<u8>; N]);

/// A bounded buffer of `N` bytes handing out storage front to back.
pub struct Arena<const N: usize> {
    buffer: UnsafeCell<Buffer<N>>,
    offset: Cell<usize>,
}

impl<const N: usize> Arena<N> {
    /// Creates an empty arena.
    pub const fn new() -> Self {
        Arena {
            buffer: UnsafeCell::new(Buffer([MaybeUninit::uninit(); N])),
            offset: Cell::new(0),
        }
    }

    /// Returns a storage handle over this arena.
    pub fn handle(&self) -> ArenaAlloc<'_, N> {
        ArenaAlloc::new(self)
    }

    /// Total size of the buffer in bytes.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Bytes consumed so far, padding included.
    pub fn used(&self) -> usize {
        self.offset.get()
    }

    pub fn remaining(&self) -> usize {
        N - self.offset.get()
    }

    /// Rewinds the cursor to the start of the buffer.
    ///
    /// Taking `&mut self` guarantees no handle (and so no container
    /// built on one) is still alive.
    pub fn reset(&mut self) {
        debug!("arena reset: reclaiming {} of {} bytes", self.offset.get(), N);
        self.offset.set(0);
    }

    /// Carves `size` bytes aligned to `align` off the front of the free
    /// region.
    pub fn alloc(&self, size: usize, align: usize) -> Result<NonNull<u8>, AllocError> {
        if !align.is_power_of_two() {
            return Err(AllocError::InvalidLayout);
        }

        let offset = self.offset.get();
        let base = unsafe { NonNull::new_unchecked(self.buffer.get()) }.cast::<u8>();
        let start = base.addr().get().wrapping_add(offset);
        let padding = start.wrapping_neg() & (align - 1);

        let end = offset
            .checked_add(padding)
            .and_then(|at| at.checked_add(size))
            .filter(|&end| end <= N);
        let Some(end) = end else {
            debug!(
                "arena exhausted: {} bytes (align {}) requested, {} bytes remaining",
                size,
                align,
                N - offset
            );
            return Err(AllocError::ArenaExhausted {
                requested: size,
                align,
                remaining: N - offset,
            });
        };

        self.offset.set(end);
        trace!("arena carve: {} bytes at offset {}", size, offset + padding);

        // `offset + padding <= end <= N`, so this stays inside (or one past) the buffer.
        Ok(unsafe { base.add(offset + padding) })
    }
}

impl<const N: usize> Default for Arena<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> fmt::Debug for Arena<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("capacity", &N)
            .field("used", &self.used())
            .finish()
    }
}

/// A copyable, non-owning handle over an [`Arena`].
///
/// Handles over the same arena compare equal; handles over different
/// arenas never do. The borrow ties every handle, and every container
/// holding one, to the arena's lifetime.
pub struct ArenaAlloc<'a, const N: usize> {
    arena: &'a Arena<N>,
}

impl<'a, const N: usize> ArenaAlloc<'a, N> {
    pub fn new(arena: &'a Arena<N>) -> Self {
        ArenaAlloc { arena }
    }

    /// The arena this handle draws from.
    pub fn arena(&self) -> &'a Arena<N> {
        self.arena
    }
}

impl<const N: usize> Clone for ArenaAlloc<'_, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<const N: usize> Copy for ArenaAlloc<'_, N> {}

impl<const N: usize> PartialEq for ArenaAlloc<'_, N> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.arena, other.arena)
    }
}

impl<const N: usize> Eq for ArenaAlloc<'_, N> {}

impl<const N: usize> fmt::Debug for ArenaAlloc<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ArenaAlloc")
            .field(&ptr::from_ref(self.arena))
            .finish()
    }
}

unsafe impl<const N: usize> Storage for ArenaAlloc<'_, N> {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        self.arena.alloc(layout.size(), layout.align())
    }

    /// Arena blocks are only reclaimed wholesale.
    unsafe fn deallocate(&self, _ptr: NonNull<u8>, _layout: Layout) {}
}
