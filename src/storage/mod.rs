//! # Storage providers
//!
//! A [`Storage`] hands out raw, untyped blocks described by a [`Layout`].
//! Containers decide what goes into those blocks and perform the
//! construction themselves, so a single provider type can back any
//! element or node type without a rebind step: the type only changes
//! the layout that is requested.
//!
//! ## Providers
//!
//! - [`Global`]: the global allocator.
//! - [`arena::ArenaAlloc`]: a handle over a fixed-capacity [`arena::Arena`].
//! - [`tracking::TrackingAlloc`]: wraps another provider and records
//!   every live block; used to verify release counts and to inject
//!   allocation failures.

use core::{alloc::Layout, ptr::NonNull};

use alloc::alloc::{alloc, dealloc};

use crate::error::AllocError;

pub mod arena;
pub mod tracking;


/// The capability contract a container needs from its allocator.
///
/// Two providers compare equal when a block obtained from one may be
/// released through the other.
///
/// # Safety
///
/// Implementors must return blocks that are valid for reads and writes
/// of `layout.size()` bytes, aligned to `layout.align()`, and that do not
/// overlap any other live block. `deallocate` must accept any block
/// returned by `allocate` with the same layout, including blocks into
/// which no value was ever written.
pub unsafe trait Storage: Clone + PartialEq {
    /// Allocate a block for `layout`.
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError>;

    /// Release a block previously returned by `allocate`.
    ///
    /// # Safety
    ///
    /// `ptr` must come from `allocate` on this provider (or one equal to
    /// it) with the same `layout`, and must not be released twice.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);

    /// The provider a copy-constructed container should use.
    fn select_on_copy(&self) -> Self {
        self.clone()
    }

    /// Allocate room for `count` values of `U`.
    fn allocate_for<U>(&self, count: usize) -> Result<NonNull<U>, AllocError> {
        let layout = Layout::array::<U>(count).map_err(|_| AllocError::InvalidLayout)?;
        self.allocate(layout).map(NonNull::cast)
    }

    /// Release room for `count` values of `U`.
    ///
    /// # Safety
    ///
    /// Same as [`Storage::deallocate`], with `ptr` obtained from
    /// `allocate_for::<U>(count)`.
    unsafe fn deallocate_for<U>(&self, ptr: NonNull<U>, count: usize) {
        // A layout that overflows could never have been allocated.
        if let Ok(layout) = Layout::array::<U>(count) {
            unsafe { self.deallocate(ptr.cast(), layout) };
        }
    }
}

/// The global allocator.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Global;

unsafe impl Storage for Global {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        if layout.size() == 0 {
            return Ok(dangling(layout));
        }
        let ptr = unsafe { alloc(layout) };
        NonNull::new(ptr).ok_or_else(|| AllocError::out_of_memory(layout))
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        if layout.size() != 0 {
            unsafe { dealloc(ptr.as_ptr(), layout) };
        }
    }
}

/// An aligned, non-null pointer for zero-sized requests.
pub(crate) fn dangling(layout: Layout) -> NonNull<u8> {
    NonNull::<u8>::dangling().with_addr(
        core::num::NonZeroUsize::new(layout.align()).unwrap_or(core::num::NonZeroUsize::MIN),
    )
}
