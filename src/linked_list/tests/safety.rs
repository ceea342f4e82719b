use std::panic::{AssertUnwindSafe, catch_unwind};

use core::{alloc::Layout, ptr::NonNull};

use crate::{
    error::{AllocError, ListError},
    linked_list::{AssignPolicy, List, ListConfig},
    storage::{Global, Storage, tracking::TrackingAlloc},
};

use super::{Counted, Counters, values};

#[test]
fn test_drop_releases_every_node_once() {
    let alloc = TrackingAlloc::new(Global);
    {
        let mut list = List::new_in(alloc.clone());
        for i in 0..8 {
            list.push_back(i).unwrap();
        }
        list.pop_front();
        list.pop_back();
        assert_eq!(alloc.live(), 6);
    }
    assert_eq!(alloc.allocations(), 8);
    assert_eq!(alloc.deallocations(), 8);
    assert_eq!(alloc.live(), 0);
}

#[test]
fn test_constructions_match_destructions() {
    let counters = Counters::new();
    {
        let mut list = List::new();
        for i in 0..5 {
            list.push_back(Counted::new(i, &counters)).unwrap();
        }
        let copy = list.clone();
        let mut assigned = List::new();
        assigned.push_back(Counted::new(-1, &counters)).unwrap();
        assigned.clone_from(&copy);

        let mut cursor = list.cursor_front_mut();
        cursor.move_next();
        drop(cursor.remove_current());
        assert_eq!(assigned, copy);
    }
    assert!(counters.created() > 0);
    assert_eq!(counters.created(), counters.dropped());
}

#[test]
fn test_push_failure_leaves_list_unchanged() {
    let alloc = TrackingAlloc::with_limit(Global, 2);
    let mut list = List::new_in(alloc.clone());
    list.push_back(1).unwrap();
    list.push_front(0).unwrap();

    assert_eq!(list.push_back(2), Err(AllocError::LimitReached { limit: 2 }));
    assert_eq!(list.push_front(-1), Err(AllocError::LimitReached { limit: 2 }));
    let mut cursor = list.cursor_back_mut();
    assert!(cursor.insert_before(5).is_err());

    assert_eq!(list.len(), 2);
    assert_eq!(list.ring_len(), 2);
    assert_eq!(values(&list), vec![0, 1]);
    assert_eq!(alloc.live(), 2);
}

#[test]
fn test_failed_push_drops_the_value() {
    let counters = Counters::new();
    let mut list = List::new_in(TrackingAlloc::with_limit(Global, 0));
    assert!(list.push_back(Counted::new(1, &counters)).is_err());
    assert_eq!(counters.created(), 1);
    assert_eq!(counters.dropped(), 1);
}

#[test]
fn test_construct_error_unwinds_everything() {
    let alloc = TrackingAlloc::new(Global);
    let result = List::try_from_fn_in(5, alloc.clone(), |i| {
        if i == 3 { Err("boom") } else { Ok(i) }
    });

    assert_eq!(result.err(), Some(ListError::Construct("boom")));
    // Three linked nodes plus the pending one for element 3.
    assert_eq!(alloc.allocations(), 4);
    assert_eq!(alloc.deallocations(), 4);
    assert_eq!(alloc.live(), 0);
}

#[test]
fn test_alloc_error_unwinds_everything() {
    let alloc = TrackingAlloc::with_limit(Global, 2);
    let result = List::try_from_fn_in(5, alloc.clone(), |i| Ok::<_, ()>(i));

    assert_eq!(
        result.err(),
        Some(ListError::Alloc(AllocError::LimitReached { limit: 2 }))
    );
    assert_eq!(alloc.live(), 0);

    let result = List::from_elem_in(3, &7, alloc.clone());
    assert_eq!(result.err(), Some(AllocError::LimitReached { limit: 2 }));
}

#[test]
fn test_construct_panic_unwinds_everything() {
    let alloc = TrackingAlloc::new(Global);
    let counters = Counters::new();

    let result = catch_unwind(AssertUnwindSafe(|| {
        List::try_from_fn_in(4, alloc.clone(), |i| {
            if i == 2 {
                panic!("element {i} failed");
            }
            Ok::<_, ()>(Counted::new(i as i32, &counters))
        })
    }));

    assert!(result.is_err());
    assert_eq!(alloc.allocations(), 3);
    assert_eq!(alloc.live(), 0);
    assert_eq!(counters.created(), counters.dropped());
}

#[test]
fn test_clone_panic_releases_partial_copy() {
    let alloc = TrackingAlloc::new(Global);
    let counters = Counters::new();
    let mut list = List::new_in(alloc.clone());
    for i in 0..5 {
        list.push_back(Counted::new(i, &counters)).unwrap();
    }

    counters.fail_clone_at(3);
    let result = catch_unwind(AssertUnwindSafe(|| list.clone()));

    assert!(result.is_err());
    assert_eq!(alloc.live(), 5);
    assert_eq!(counters.created() - counters.dropped(), 5);

    drop(list);
    assert_eq!(alloc.live(), 0);
    assert_eq!(counters.created(), counters.dropped());
}

#[test]
fn test_assign_clone_panic_leaves_destination_untouched() {
    let counters = Counters::new();
    let mut source = List::new();
    for i in 0..4 {
        source.push_back(Counted::new(i, &counters)).unwrap();
    }
    let mut target = List::new();
    target.push_back(Counted::new(10, &counters)).unwrap();
    target.push_back(Counted::new(20, &counters)).unwrap();

    counters.fail_clone_at(3);
    let result = catch_unwind(AssertUnwindSafe(|| target.clone_from(&source)));
    assert!(result.is_err());

    let kept: Vec<_> = target.iter().map(|c| c.value).collect();
    assert_eq!(kept, vec![10, 20]);
    assert_eq!(target.ring_len(), 2);

    drop(target);
    drop(source);
    assert_eq!(counters.created(), counters.dropped());
}

#[test]
fn test_assign_alloc_failure_leaves_destination_untouched() {
    let alloc = TrackingAlloc::new(Global);
    let mut source = List::new_in(alloc.clone());
    for i in 5..8 {
        source.push_back(i).unwrap();
    }
    let mut target = List::new_in(alloc.clone());
    target.push_back(1).unwrap();
    target.push_back(2).unwrap();

    // Room for one more node only.
    alloc.set_limit(Some(alloc.allocations() + 1));
    assert_eq!(
        target.try_assign_from(&source),
        Err(AllocError::LimitReached { limit: 6 })
    );

    assert_eq!(values(&target), vec![1, 2]);
    assert_eq!(target.ring_len(), 2);
    assert_eq!(alloc.live(), 5);
}

#[test]
fn test_assign_propagate_adopts_source_allocator() {
    let ours = TrackingAlloc::new(Global);
    let theirs = TrackingAlloc::new(Global);
    let config = ListConfig::new().with_assign_policy(AssignPolicy::Propagate);

    let mut target = List::with_config_in(ours.clone(), config);
    target.push_back(1).unwrap();
    let mut source = List::new_in(theirs.clone());
    source.push_back(7).unwrap();
    source.push_back(8).unwrap();
    assert_ne!(target.allocator(), source.allocator());

    target.try_assign_from(&source).unwrap();

    assert_eq!(target.allocator(), source.allocator());
    assert_eq!(target.config(), config);
    assert_eq!(values(&target), vec![7, 8]);
    assert_eq!(ours.live(), 0);
    assert_eq!(theirs.live(), 4);
}

#[test]
fn test_assign_retain_keeps_own_allocator() {
    let ours = TrackingAlloc::new(Global);
    let theirs = TrackingAlloc::new(Global);

    let mut target = List::new_in(ours.clone());
    target.push_back(1).unwrap();
    let mut source = List::new_in(theirs.clone());
    source.push_back(7).unwrap();
    source.push_back(8).unwrap();

    target.try_assign_from(&source).unwrap();

    assert_eq!(target.allocator(), &ours);
    assert_eq!(values(&target), vec![7, 8]);
    assert_eq!(ours.live(), 2);
    assert_eq!(theirs.live(), 2);
}

#[test]
fn test_assign_propagate_failure_keeps_allocator() {
    let ours = TrackingAlloc::new(Global);
    let theirs = TrackingAlloc::new(Global);
    let config = ListConfig::new().with_assign_policy(AssignPolicy::Propagate);

    let mut target = List::with_config_in(ours.clone(), config);
    target.push_back(1).unwrap();
    let mut source = List::new_in(theirs.clone());
    source.push_back(7).unwrap();
    theirs.set_limit(Some(theirs.allocations()));

    assert!(target.try_assign_from(&source).is_err());
    assert_eq!(target.allocator(), &ours);
    assert_eq!(values(&target), vec![1]);
}

#[test]
fn test_clone_inherits_allocator_by_default() {
    let alloc = TrackingAlloc::new(Global);
    let mut list = List::new_in(alloc.clone());
    list.push_back(1).unwrap();

    let copy = list.try_clone().unwrap();
    assert_eq!(copy.allocator(), list.allocator());
    assert_eq!(alloc.live(), 2);

    alloc.set_limit(Some(alloc.allocations()));
    assert_eq!(
        list.try_clone().err(),
        Some(AllocError::LimitReached { limit: 2 })
    );
}

/// Hands a copy-constructed container a fresh tracker instead of its own.
#[derive(Clone, PartialEq)]
struct FreshOnCopy(TrackingAlloc);

unsafe impl Storage for FreshOnCopy {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        self.0.allocate(layout)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        unsafe { self.0.deallocate(ptr, layout) };
    }

    fn select_on_copy(&self) -> Self {
        FreshOnCopy(TrackingAlloc::new(Global))
    }
}

#[test]
fn test_clone_uses_selected_allocator() {
    let source_alloc = FreshOnCopy(TrackingAlloc::new(Global));
    let mut list = List::new_in(source_alloc.clone());
    for i in 0..3 {
        list.push_back(i).unwrap();
    }

    let copy = list.try_clone().unwrap();
    assert!(copy.allocator() != list.allocator());
    assert_eq!(source_alloc.0.live(), 3);
    assert_eq!(copy.allocator().0.live(), 3);
    assert_eq!(values(&copy), vec![0, 1, 2]);

    let cloned = list.clone();
    assert!(cloned.allocator() != list.allocator());
    assert!(cloned.allocator() != copy.allocator());
    assert_eq!(source_alloc.0.live(), 3);
    assert_eq!(cloned.allocator().0.live(), 3);

    // Assignment keeps the destination's allocator rather than selecting one.
    let mut target = List::new_in(FreshOnCopy(TrackingAlloc::new(Global)));
    let target_alloc = target.allocator().clone();
    target.try_assign_from(&list).unwrap();
    assert!(target.allocator() == &target_alloc);
    assert_eq!(target_alloc.0.live(), 3);
    assert_eq!(source_alloc.0.live(), 3);
}

struct PanicOnDrop {
    armed: bool,
}

impl Drop for PanicOnDrop {
    fn drop(&mut self) {
        if self.armed {
            panic!("destructor failed");
        }
    }
}

#[test]
fn test_drop_continues_after_panicking_destructor() {
    let alloc = TrackingAlloc::new(Global);
    let mut list = List::new_in(alloc.clone());
    list.push_back(PanicOnDrop { armed: false }).unwrap();
    list.push_back(PanicOnDrop { armed: true }).unwrap();
    list.push_back(PanicOnDrop { armed: false }).unwrap();
    list.push_back(PanicOnDrop { armed: false }).unwrap();

    let result = catch_unwind(AssertUnwindSafe(move || drop(list)));

    assert!(result.is_err());
    assert_eq!(alloc.live(), 0);
    assert_eq!(alloc.deallocations(), 4);
}
