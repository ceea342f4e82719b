use core::{alloc::Layout, ptr::NonNull};

/// The link part of every element node.
///
/// A `None` link stands for the list's sentinel, so nodes never hold the
/// sentinel's address and the list can be moved freely.
#[repr(C)]
pub(crate) struct Link {
    prev: Option<NonNull<Link>>,
    next: Option<NonNull<Link>>,
}

impl Link {
    pub(crate) unsafe fn next(link: NonNull<Link>) -> Option<NonNull<Link>> {
        unsafe { (*link.as_ptr()).next }
    }

    pub(crate) unsafe fn prev(link: NonNull<Link>) -> Option<NonNull<Link>> {
        unsafe { (*link.as_ptr()).prev }
    }

    unsafe fn set_next(link: NonNull<Link>, next: Option<NonNull<Link>>) {
        unsafe { (*link.as_ptr()).next = next };
    }

    unsafe fn set_prev(link: NonNull<Link>, prev: Option<NonNull<Link>>) {
        unsafe { (*link.as_ptr()).prev = prev };
    }
}

/// The link-only end of the ring, stored inside the list object.
///
/// `front` plays the sentinel's `next` and `back` its `prev`; both are
/// `None` when the list is empty. Positions are `Option<NonNull<Link>>`
/// with `None` meaning the sentinel, so moving from the back element
/// lands on the sentinel and moving on from there reaches the front.
pub(crate) struct Sentinel {
    front: Option<NonNull<Link>>,
    back: Option<NonNull<Link>>,
}

impl Sentinel {
    pub(crate) const fn new() -> Self {
        Sentinel {
            front: None,
            back: None,
        }
    }

    pub(crate) fn front(&self) -> Option<NonNull<Link>> {
        self.front
    }

    pub(crate) fn back(&self) -> Option<NonNull<Link>> {
        self.back
    }

    /// The position after `at`, following the ring through the sentinel.
    ///
    /// # Safety
    ///
    /// `at` must be the sentinel or a node of the ring this sentinel closes.
    pub(crate) unsafe fn next_of(&self, at: Option<NonNull<Link>>) -> Option<NonNull<Link>> {
        match at {
            Some(link) => unsafe { Link::next(link) },
            None => self.front,
        }
    }

    /// # Safety
    ///
    /// As [`Sentinel::next_of`].
    pub(crate) unsafe fn prev_of(&self, at: Option<NonNull<Link>>) -> Option<NonNull<Link>> {
        match at {
            Some(link) => unsafe { Link::prev(link) },
            None => self.back,
        }
    }

    /// Splices `new` into the ring immediately before `at`.
    ///
    /// # Safety
    ///
    /// `at` must be the sentinel or a node of this ring; `new` must not be
    /// part of any ring.
    pub(crate) unsafe fn splice_before(&mut self, at: Option<NonNull<Link>>, new: NonNull<Link>) {
        unsafe {
            let prev = self.prev_of(at);
            Link::set_prev(new, prev);
            Link::set_next(new, at);
            match prev {
                Some(prev) => Link::set_next(prev, Some(new)),
                None => self.front = Some(new),
            }
            match at {
                Some(at) => Link::set_prev(at, Some(new)),
                None => self.back = Some(new),
            }
        }
    }

    /// Removes `link` from the ring, joining its neighbours.
    ///
    /// # Safety
    ///
    /// `link` must be a node of this ring.
    pub(crate) unsafe fn detach(&mut self, link: NonNull<Link>) {
        unsafe {
            let prev = Link::prev(link);
            let next = Link::next(link);
            match prev {
                Some(prev) => Link::set_next(prev, next),
                None => self.front = next,
            }
            match next {
                Some(next) => Link::set_prev(next, prev),
                None => self.back = prev,
            }
            Link::set_prev(link, None);
            Link::set_next(link, None);
        }
    }
}

/// An element node: a link followed by the value.
///
/// `repr(C)` keeps the link at offset zero, so a `NonNull<Link>` to a
/// node can be cast back to the node.
#[repr(C)]
pub(crate) struct Node<T> {
    link: Link,
    value: T,
}

impl<T> Node<T> {
    pub(crate) const LAYOUT: Layout = Layout::new::<Node<T>>();

    pub(crate) fn from_link(link: NonNull<Link>) -> NonNull<Node<T>> {
        link.cast()
    }

    pub(crate) fn as_link(node: NonNull<Node<T>>) -> NonNull<Link> {
        node.cast()
    }

    /// Writes `value` into freshly allocated, uninitialised node storage.
    ///
    /// # Safety
    ///
    /// `node` must be valid for writes of `Node<T>`.
    pub(crate) unsafe fn init(node: NonNull<Node<T>>, value: T) {
        unsafe {
            let raw = node.as_ptr();
            core::ptr::addr_of_mut!((*raw).value).write(value);
            core::ptr::addr_of_mut!((*raw).link).write(Link {
                prev: None,
                next: None,
            });
        }
    }

    /// # Safety
    ///
    /// `link` must point at an initialised `Node<T>`.
    pub(crate) unsafe fn value<'a>(link: NonNull<Link>) -> &'a T {
        unsafe { &(*Node::<T>::from_link(link).as_ptr()).value }
    }

    /// # Safety
    ///
    /// As [`Node::value`], plus no other reference to the value may be live.
    pub(crate) unsafe fn value_mut<'a>(link: NonNull<Link>) -> &'a mut T {
        unsafe { &mut (*Node::<T>::from_link(link).as_ptr()).value }
    }

    /// Moves the value out, leaving the storage uninitialised.
    ///
    /// # Safety
    ///
    /// `link` must point at an initialised, detached `Node<T>`.
    pub(crate) unsafe fn take(link: NonNull<Link>) -> T {
        unsafe { core::ptr::addr_of!((*Node::<T>::from_link(link).as_ptr()).value).read() }
    }
}
