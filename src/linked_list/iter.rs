use core::{fmt, iter::FusedIterator, marker::PhantomData, ptr::NonNull};

use super::{
    list::List,
    node::{Link, Node},
};
use crate::storage::Storage;

/// An iterator over shared references to the elements of a [`List`].
pub struct Iter<'a, T> {
    head: Option<NonNull<Link>>,
    tail: Option<NonNull<Link>>,
    len: usize,
    _marker: PhantomData<&'a Node<T>>,
}

impl<'a, T> Iter<'a, T> {
    /// # Safety
    ///
    /// `head` and `tail` must be the first and last of `len` consecutive
    /// nodes (both `None` when `len` is zero) that stay alive and unmodified for `'a`.
    pub(crate) unsafe fn new(
        head: Option<NonNull<Link>>,
        tail: Option<NonNull<Link>>,
        len: usize,
    ) -> Self {
        Iter {
            head,
            tail,
            len,
            _marker: PhantomData,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let current = self.head?;
        self.len -= 1;
        unsafe {
            self.head = Link::next(current);
            Some(Node::value(current))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let current = self.tail?;
        self.len -= 1;
        unsafe {
            self.tail = Link::prev(current);
            Some(Node::value(current))
        }
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter { ..*self }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter").field(&self.len).finish()
    }
}

/// An iterator over mutable references to the elements of a [`List`].
pub struct IterMut<'a, T> {
    head: Option<NonNull<Link>>,
    tail: Option<NonNull<Link>>,
    len: usize,
    _marker: PhantomData<&'a mut Node<T>>,
}

impl<'a, T> IterMut<'a, T> {
    /// # Safety
    ///
    /// As [`Iter::new`], and nothing else may access the nodes for `'a`.
    pub(crate) unsafe fn new(
        head: Option<NonNull<Link>>,
        tail: Option<NonNull<Link>>,
        len: usize,
    ) -> Self {
        IterMut {
            head,
            tail,
            len,
            _marker: PhantomData,
        }
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let current = self.head?;
        self.len -= 1;
        unsafe {
            self.head = Link::next(current);
            Some(Node::value_mut(current))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<T> DoubleEndedIterator for IterMut<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let current = self.tail?;
        self.len -= 1;
        unsafe {
            self.tail = Link::prev(current);
            Some(Node::value_mut(current))
        }
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}
impl<T> FusedIterator for IterMut<'_, T> {}

/// An owning iterator that drains a [`List`], releasing each node as it goes.
pub struct IntoIter<T, A: Storage> {
    list: List<T, A>,
}

impl<T, A: Storage> IntoIter<T, A> {
    pub(crate) fn new(list: List<T, A>) -> Self {
        IntoIter { list }
    }
}

impl<T, A: Storage> Iterator for IntoIter<T, A> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.list.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len(), Some(self.list.len()))
    }
}

impl<T, A: Storage> DoubleEndedIterator for IntoIter<T, A> {
    fn next_back(&mut self) -> Option<T> {
        self.list.pop_back()
    }
}

impl<T, A: Storage> ExactSizeIterator for IntoIter<T, A> {}
impl<T, A: Storage> FusedIterator for IntoIter<T, A> {}

unsafe impl<T: Sync> Send for Iter<'_, T> {}
unsafe impl<T: Sync> Sync for Iter<'_, T> {}
unsafe impl<T: Send> Send for IterMut<'_, T> {}
unsafe impl<T: Sync> Sync for IterMut<'_, T> {}
