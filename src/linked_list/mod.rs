//! # Allocator-aware doubly linked list
//!
//! [`List`] owns its nodes, but does not decide where they live: every
//! node is requested from a [`Storage`](crate::storage::Storage)
//! provider, either the global allocator or a fixed-capacity arena.
//!
//! ```text
//!          ┌──────────────────────────────────────────┐
//!          ▼                                          │
//!   ┌──────────┐    ┌──────┐    ┌──────┐    ┌──────┐  │
//!   │ sentinel │ ─▶ │  a   │ ─▶ │  b   │ ─▶ │  c   │ ─┘
//!   └──────────┘ ◀─ └──────┘ ◀─ └──────┘ ◀─ └──────┘
//! ```
//!
//! ## Core Components
//!
//! - [`list::List`]: the container.
//! - [`cursor::Cursor`] / [`cursor::CursorMut`]: positions, including the
//!   end position, used to insert and erase in the middle.
//! - [`iter`]: double-ended iterators; reverse traversal is `.rev()`.
//! - [`config::ListConfig`]: allocator policy for copy-assignment.
//!
//! ## Failure model
//!
//! Node allocation can fail. Every operation that allocates either
//! completes or leaves the list as it was and returns the
//! [`AllocError`](crate::error::AllocError). Multi-node operations
//! (bulk construction, copying) release everything they allocated before
//! reporting the failure, including when an element's `Clone` panics.
//!
//! # Examples
//!
//! ```
//! use mola_arena_list::{linked_list::List, storage::arena::Arena};
//!
//! let arena = Arena::<1024>::new();
//! let mut list = List::new_in(arena.handle());
//!
//! list.push_back(2).unwrap();
//! list.push_back(3).unwrap();
//! list.push_front(1).unwrap();
//!
//! let mut cursor = list.cursor_front_mut();
//! cursor.move_next();
//! assert_eq!(cursor.remove_current(), Some(2));
//!
//! assert_eq!(list.iter().copied().collect::<Vec<_>>(), [1, 3]);
//! assert_eq!(list.iter().rev().copied().collect::<Vec<_>>(), [3, 1]);
//! assert!(arena.used() > 0);
//! ```

pub mod config;
pub mod cursor;
pub mod iter;
pub mod list;
mod node;

pub use config::{AssignPolicy, ListConfig};
pub use list::List;

#[cfg(test)]
mod tests;
