use core::{alloc::Layout, convert::Infallible};

use thiserror::Error;

/// Errors a [`Storage`](crate::storage::Storage) provider can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AllocError {
    /// The arena does not have enough room left for the request,
    /// including alignment padding.
    #[error("arena exhausted: requested {requested} bytes (align {align}), {remaining} bytes remaining")]
    ArenaExhausted {
        requested: usize,
        align: usize,
        remaining: usize,
    },

    /// The global allocator returned null.
    #[error("out of memory: failed to allocate {size} bytes (align {align})")]
    OutOfMemory { size: usize, align: usize },

    /// Size/alignment combination cannot be represented as a `Layout`.
    #[error("invalid layout")]
    InvalidLayout,

    /// A tracking allocator hit its configured allocation limit.
    #[error("allocation limit of {limit} reached")]
    LimitReached { limit: usize },
}

impl AllocError {
    pub(crate) fn out_of_memory(layout: Layout) -> Self {
        AllocError::OutOfMemory {
            size: layout.size(),
            align: layout.align(),
        }
    }
}

/// Errors from bulk list construction where building an element may fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListError<E> {
    #[error(transparent)]
    Alloc(#[from] AllocError),

    #[error("element construction failed: {0}")]
    Construct(E),
}

impl ListError<Infallible> {
    /// Narrows the error of a construction that cannot fail on its own.
    pub(crate) fn into_alloc(self) -> AllocError {
        match self {
            ListError::Alloc(err) => err,
            ListError::Construct(never) => match never {},
        }
    }
}
