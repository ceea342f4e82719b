//! Allocator-aware collections.
//!
//! - [`linked_list`]: a doubly linked list whose nodes come from a
//!   pluggable [`storage::Storage`] provider.
//! - [`storage`]: the provider contract, the global allocator, a
//!   fixed-capacity arena and an instrumented wrapper.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod error;
pub mod linked_list;
pub mod storage;

pub use error::{AllocError, ListError};
