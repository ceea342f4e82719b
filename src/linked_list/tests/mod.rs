use std::{cell::Cell, rc::Rc};

mod safety;

/// Shared bookkeeping for [`Counted`] values.
#[derive(Default)]
pub(super) struct Counters {
    created: Cell<usize>,
    dropped: Cell<usize>,
    /// Makes the n-th clone (counting from 1) panic.
    fail_clone_at: Cell<Option<usize>>,
    clones: Cell<usize>,
}

impl Counters {
    pub(super) fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub(super) fn created(&self) -> usize {
        self.created.get()
    }

    pub(super) fn dropped(&self) -> usize {
        self.dropped.get()
    }

    pub(super) fn fail_clone_at(&self, nth: usize) {
        self.clones.set(0);
        self.fail_clone_at.set(Some(nth));
    }
}

/// An element type that records its own constructions and destructions.
pub(super) struct Counted {
    pub(super) value: i32,
    counters: Rc<Counters>,
}

impl Counted {
    pub(super) fn new(value: i32, counters: &Rc<Counters>) -> Self {
        counters.created.set(counters.created.get() + 1);
        Counted {
            value,
            counters: Rc::clone(counters),
        }
    }
}

impl Clone for Counted {
    fn clone(&self) -> Self {
        let clones = self.counters.clones.get() + 1;
        self.counters.clones.set(clones);
        if self.counters.fail_clone_at.get() == Some(clones) {
            panic!("clone {clones} failed");
        }
        Counted::new(self.value, &self.counters)
    }
}

impl Drop for Counted {
    fn drop(&mut self) {
        self.counters.dropped.set(self.counters.dropped.get() + 1);
    }
}

impl PartialEq for Counted {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl std::fmt::Debug for Counted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Counted({})", self.value)
    }
}

pub(super) fn values<A: crate::storage::Storage>(list: &super::List<i32, A>) -> Vec<i32> {
    list.iter().copied().collect()
}
