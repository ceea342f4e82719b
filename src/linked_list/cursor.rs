//! Positions inside a [`List`].
//!
//! A cursor points either at an element or at the end position (the
//! sentinel). Moving past either end wraps through the end position,
//! following the ring.

use core::{fmt, ptr::NonNull};

use super::{
    list::List,
    node::{Link, Node},
};
use crate::{error::AllocError, storage::Storage};

/// A read-only position in a list.
pub struct Cursor<'a, T, A: Storage> {
    current: Option<NonNull<Link>>,
    list: &'a List<T, A>,
}

impl<'a, T, A: Storage> Cursor<'a, T, A> {
    pub(crate) fn new(list: &'a List<T, A>, current: Option<NonNull<Link>>) -> Self {
        Cursor { current, list }
    }

    /// Whether the cursor is at the end position.
    pub fn is_end(&self) -> bool {
        self.current.is_none()
    }

    /// The element under the cursor, or `None` at the end position.
    pub fn current(&self) -> Option<&'a T> {
        self.current.map(|link| unsafe { Node::value(link) })
    }

    pub fn move_next(&mut self) {
        self.current = unsafe { self.list.sentinel().next_of(self.current) };
    }

    pub fn move_prev(&mut self) {
        self.current = unsafe { self.list.sentinel().prev_of(self.current) };
    }

    /// The element after the cursor without moving it.
    pub fn peek_next(&self) -> Option<&'a T> {
        let mut next = *self;
        next.move_next();
        next.current()
    }

    pub fn peek_prev(&self) -> Option<&'a T> {
        let mut prev = *self;
        prev.move_prev();
        prev.current()
    }
}

impl<T, A: Storage> Clone for Cursor<'_, T, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, A: Storage> Copy for Cursor<'_, T, A> {}

/// Two cursors are equal when they point at the same position of the
/// same list.
impl<T, A: Storage> PartialEq for Cursor<'_, T, A> {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.list, other.list) && self.current == other.current
    }
}

impl<T, A: Storage> Eq for Cursor<'_, T, A> {}

impl<T: fmt::Debug, A: Storage> fmt::Debug for Cursor<'_, T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.current()).finish()
    }
}

/// A position in a list that can insert and remove elements.
pub struct CursorMut<'a, T, A: Storage> {
    current: Option<NonNull<Link>>,
    list: &'a mut List<T, A>,
}

impl<'a, T, A: Storage> CursorMut<'a, T, A> {
    pub(crate) fn new(list: &'a mut List<T, A>, current: Option<NonNull<Link>>) -> Self {
        CursorMut { current, list }
    }

    /// A read-only view of this position.
    pub fn as_cursor(&self) -> Cursor<'_, T, A> {
        Cursor::new(&*self.list, self.current)
    }

    pub fn is_end(&self) -> bool {
        self.current.is_none()
    }

    pub fn current(&mut self) -> Option<&mut T> {
        self.current.map(|link| unsafe { Node::value_mut(link) })
    }

    pub fn move_next(&mut self) {
        self.current = unsafe { self.list.sentinel().next_of(self.current) };
    }

    pub fn move_prev(&mut self) {
        self.current = unsafe { self.list.sentinel().prev_of(self.current) };
    }

    /// Inserts `value` immediately before the cursor; the cursor stays put.
    ///
    /// At the end position this appends. If the node cannot be
    /// allocated the list is unchanged and `value` is dropped.
    pub fn insert_before(&mut self, value: T) -> Result<(), AllocError> {
        self.list.insert_before(self.current, value).map(|_| ())
    }

    /// Inserts `value` immediately after the cursor; the cursor stays put.
    pub fn insert_after(&mut self, value: T) -> Result<(), AllocError> {
        let next = unsafe { self.list.sentinel().next_of(self.current) };
        self.list.insert_before(next, value).map(|_| ())
    }

    /// Removes the element under the cursor and moves to the next position.
    ///
    /// Returns `None`, without touching the list, at the end position.
    pub fn remove_current(&mut self) -> Option<T> {
        let removed = self.current?;
        unsafe {
            self.current = Link::next(removed);
            Some(self.list.unlink(removed))
        }
    }
}

impl<T: fmt::Debug, A: Storage> fmt::Debug for CursorMut<'_, T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CursorMut").field(&self.as_cursor().current()).finish()
    }
}
