use core::{convert::Infallible, fmt, marker::PhantomData, mem, ptr::NonNull};

use alloc::boxed::Box;
use log::debug;

use super::{
    config::ListConfig,
    cursor::{Cursor, CursorMut},
    iter::{IntoIter, Iter, IterMut},
    node::{Link, Node, Sentinel},
};
use crate::{
    error::{AllocError, ListError},
    storage::{Global, Storage},
};

/// A doubly linked list whose nodes come from a [`Storage`] provider.
///
/// The nodes form a single ring through a sentinel that marks the end
/// position. The sentinel is part of the list object and is never
/// allocated, so creating an empty list cannot fail and touches no
/// allocator at all. Every other node in the ring is owned by the list
/// and was allocated from `alloc`.
pub struct List<T, A: Storage = Global> {
    sentinel: Sentinel,
    len: usize,
    alloc: A,
    config: ListConfig,
    marker: PhantomData<Box<Node<T>>>,
}

impl<T> List<T> {
    /// Creates an empty list on the global allocator.
    pub const fn new() -> Self {
        Self::new_in(Global)
    }

    /// Creates a list of `len` clones of `value` on the global allocator.
    pub fn from_elem(len: usize, value: &T) -> Result<Self, AllocError>
    where
        T: Clone,
    {
        Self::from_elem_in(len, value, Global)
    }

    /// Creates a list of `len` default values on the global allocator.
    pub fn with_len(len: usize) -> Result<Self, AllocError>
    where
        T: Default,
    {
        Self::with_len_in(len, Global)
    }
}

impl<T, A: Storage> List<T, A> {
    /// Creates an empty list that allocates its nodes from `alloc`.
    pub const fn new_in(alloc: A) -> Self {
        Self::with_config_in(alloc, ListConfig::new())
    }

    /// Creates an empty list with an explicit allocator policy.
    pub const fn with_config_in(alloc: A, config: ListConfig) -> Self {
        List {
            sentinel: Sentinel::new(),
            len: 0,
            alloc,
            config,
            marker: PhantomData,
        }
    }

    /// Creates a list of `len` elements built by `f(0)`, `f(1)`, ...
    ///
    /// Each node is allocated before its value is built. If an
    /// allocation or a call to `f` fails (or panics), the pending node
    /// and every element built so far are released before the error is
    /// returned, so no partial list survives.
    pub fn try_from_fn_in<E, F>(len: usize, alloc: A, f: F) -> Result<Self, ListError<E>>
    where
        F: FnMut(usize) -> Result<T, E>,
    {
        let mut list = Self::new_in(alloc);
        if let Err(err) = list.fill(len, f) {
            debug!(
                "list construction failed after {} of {} elements, releasing them",
                list.len, len
            );
            return Err(err);
        }
        Ok(list)
    }

    /// Creates a list of `len` clones of `value`.
    pub fn from_elem_in(len: usize, value: &T, alloc: A) -> Result<Self, AllocError>
    where
        T: Clone,
    {
        Self::try_from_fn_in(len, alloc, |_| Ok::<_, Infallible>(value.clone()))
            .map_err(ListError::into_alloc)
    }

    /// Creates a list of `len` default values.
    pub fn with_len_in(len: usize, alloc: A) -> Result<Self, AllocError>
    where
        T: Default,
    {
        Self::try_from_fn_in(len, alloc, |_| Ok::<_, Infallible>(T::default()))
            .map_err(ListError::into_alloc)
    }

    fn fill<E, F>(&mut self, len: usize, mut f: F) -> Result<(), ListError<E>>
    where
        F: FnMut(usize) -> Result<T, E>,
    {
        for index in 0..len {
            let node = self.alloc.allocate(Node::<T>::LAYOUT)?.cast::<Node<T>>();
            let pending = PendingNode {
                node,
                alloc: &self.alloc,
            };
            let value = f(index).map_err(ListError::Construct)?;
            mem::forget(pending);

            unsafe {
                Node::init(node, value);
                self.sentinel.splice_before(None, Node::as_link(node));
            }
            self.len += 1;
        }
        Ok(())
    }

    /// Copies this list into a new one.
    ///
    /// The copy uses the allocator chosen by
    /// [`Storage::select_on_copy`] and keeps this list's configuration.
    /// On failure every element copied so far is released.
    pub fn try_clone(&self) -> Result<Self, AllocError>
    where
        T: Clone,
    {
        let mut copy = Self::with_config_in(self.alloc.select_on_copy(), self.config);
        for value in self {
            copy.push_back(value.clone())?;
        }
        Ok(copy)
    }

    /// Replaces the contents of this list with copies of `source`'s.
    ///
    /// The copy is built in full before anything is committed, so on
    /// failure this list is left exactly as it was, allocator included.
    /// With [`AssignPolicy::Propagate`](super::config::AssignPolicy) the
    /// list ends up using `source`'s allocator; otherwise it keeps its own.
    pub fn try_assign_from(&mut self, source: &Self) -> Result<(), AllocError>
    where
        T: Clone,
    {
        let alloc = if self.config.propagates() {
            source.alloc.clone()
        } else {
            self.alloc.clone()
        };

        let mut fresh = Self::with_config_in(alloc, self.config);
        for value in source {
            fresh.push_back(value.clone())?;
        }

        if self.config.propagates() && self.alloc != source.alloc {
            debug!("copy-assignment adopting the source list's allocator");
        }
        // The old nodes leave with `fresh` and are released by their own allocator.
        mem::swap(self, &mut fresh);
        Ok(())
    }

    /// Appends `value` at the back.
    pub fn push_back(&mut self, value: T) -> Result<(), AllocError> {
        self.insert_before(None, value).map(|_| ())
    }

    /// Prepends `value` at the front.
    pub fn push_front(&mut self, value: T) -> Result<(), AllocError> {
        self.insert_before(self.sentinel.front(), value).map(|_| ())
    }

    pub fn pop_back(&mut self) -> Option<T> {
        let back = self.sentinel.back()?;
        unsafe { Some(self.unlink(back)) }
    }

    pub fn pop_front(&mut self) -> Option<T> {
        let front = self.sentinel.front()?;
        unsafe { Some(self.unlink(front)) }
    }

    /// Removes and drops every element.
    pub fn clear(&mut self) {
        while self.pop_front().is_some() {}
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn front(&self) -> Option<&T> {
        self.sentinel.front().map(|link| unsafe { Node::value(link) })
    }

    pub fn back(&self) -> Option<&T> {
        self.sentinel.back().map(|link| unsafe { Node::value(link) })
    }

    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.sentinel.front().map(|link| unsafe { Node::value_mut(link) })
    }

    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.sentinel.back().map(|link| unsafe { Node::value_mut(link) })
    }

    /// The allocator the nodes are drawn from.
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    pub fn config(&self) -> ListConfig {
        self.config
    }

    /// Returns an iterator from front to back; use `.rev()` for back to front.
    pub fn iter(&self) -> Iter<'_, T> {
        unsafe { Iter::new(self.sentinel.front(), self.sentinel.back(), self.len) }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        unsafe { IterMut::new(self.sentinel.front(), self.sentinel.back(), self.len) }
    }

    /// A cursor at the front element, or at the end position if empty.
    pub fn cursor_front(&self) -> Cursor<'_, T, A> {
        Cursor::new(self, self.sentinel.front())
    }

    /// A cursor at the back element, or at the end position if empty.
    pub fn cursor_back(&self) -> Cursor<'_, T, A> {
        Cursor::new(self, self.sentinel.back())
    }

    /// A cursor at the end position (the sentinel).
    pub fn cursor_end(&self) -> Cursor<'_, T, A> {
        Cursor::new(self, None)
    }

    pub fn cursor_front_mut(&mut self) -> CursorMut<'_, T, A> {
        let front = self.sentinel.front();
        CursorMut::new(self, front)
    }

    pub fn cursor_back_mut(&mut self) -> CursorMut<'_, T, A> {
        let back = self.sentinel.back();
        CursorMut::new(self, back)
    }

    pub fn cursor_end_mut(&mut self) -> CursorMut<'_, T, A> {
        CursorMut::new(self, None)
    }

    pub(crate) fn sentinel(&self) -> &Sentinel {
        &self.sentinel
    }

    /// Allocates a node for `value` and splices it in before `at`, where
    /// `None` is the end position.
    ///
    /// On allocation failure `value` is dropped and the list is untouched.
    pub(crate) fn insert_before(
        &mut self,
        at: Option<NonNull<Link>>,
        value: T,
    ) -> Result<NonNull<Link>, AllocError> {
        let node = self.alloc.allocate(Node::<T>::LAYOUT)?.cast::<Node<T>>();
        unsafe {
            Node::init(node, value);
            self.sentinel.splice_before(at, Node::as_link(node));
        }
        self.len += 1;
        Ok(Node::as_link(node))
    }

    /// Detaches `link`, releases its storage and returns the value.
    ///
    /// # Safety
    ///
    /// `link` must be a node of this list.
    pub(crate) unsafe fn unlink(&mut self, link: NonNull<Link>) -> T {
        unsafe {
            self.sentinel.detach(link);
            self.len -= 1;
            let value = Node::<T>::take(link);
            self.alloc.deallocate(link.cast(), Node::<T>::LAYOUT);
            value
        }
    }

    /// Walks the ring forwards and backwards, checking the links agree,
    /// and returns the number of real nodes found.
    #[cfg(test)]
    pub(crate) fn ring_len(&self) -> usize {
        let mut count = 0;
        let mut current = None;
        unsafe {
            loop {
                let next = self.sentinel.next_of(current);
                assert_eq!(self.sentinel.prev_of(next), current, "broken back link");
                let Some(next) = next else { break };
                count += 1;
                current = Some(next);
            }
        }
        count
    }
}

/// Node storage allocated but not yet holding a value.
///
/// Released on drop, which covers both error returns and panics from
/// the element constructor.
struct PendingNode<'a, T, A: Storage> {
    node: NonNull<Node<T>>,
    alloc: &'a A,
}

impl<T, A: Storage> Drop for PendingNode<'_, T, A> {
    fn drop(&mut self) {
        unsafe { self.alloc.deallocate(self.node.cast(), Node::<T>::LAYOUT) };
    }
}

impl<T, A: Storage> Drop for List<T, A> {
    fn drop(&mut self) {
        struct DropGuard<'a, T, A: Storage>(&'a mut List<T, A>);

        impl<T, A: Storage> Drop for DropGuard<'_, T, A> {
            fn drop(&mut self) {
                // Keep releasing if an element destructor panicked.
                while self.0.pop_front().is_some() {}
            }
        }

        let guard = DropGuard(self);
        while let Some(value) = guard.0.pop_front() {
            drop(value);
        }
    }
}

impl<T> Default for List<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, A: Storage> Clone for List<T, A> {
    /// # Panics
    ///
    /// Panics if the allocator cannot supply a node; use
    /// [`List::try_clone`] to handle that case.
    fn clone(&self) -> Self {
        match self.try_clone() {
            Ok(list) => list,
            Err(err) => panic!("failed to clone list: {err}"),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        if let Err(err) = self.try_assign_from(source) {
            panic!("failed to assign list: {err}");
        }
    }
}

impl<T: fmt::Debug, A: Storage> fmt::Debug for List<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self).finish()
    }
}

impl<T: PartialEq, A: Storage> PartialEq for List<T, A> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq, A: Storage> Eq for List<T, A> {}

impl<T, A: Storage> IntoIterator for List<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}

impl<'a, T, A: Storage> IntoIterator for &'a List<T, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, A: Storage> IntoIterator for &'a mut List<T, A> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

unsafe impl<T: Send, A: Storage + Send> Send for List<T, A> {}
unsafe impl<T: Sync, A: Storage + Sync> Sync for List<T, A> {}
