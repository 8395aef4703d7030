use super::*;

use std::{
    cell::Cell,
    panic::{self, AssertUnwindSafe},
    rc::Rc,
};

use crate::{dynamic_array, reserve};

/// Counts live instances through a shared counter.
struct Droppable(Rc<Cell<usize>>);

impl Droppable {

    fn new(counter: &Rc<Cell<usize>>) -> Self {
        counter.set(counter.get() + 1);
        Self(counter.clone())
    }
}

impl Drop for Droppable {

    fn drop(&mut self) {
        self.0.set(self.0.get() - 1);
    }
}

#[test]
fn new_is_empty_without_storage() {
    let arr = DynamicArray::<i32>::new();
    assert_eq!(arr.len(), 0);
    assert_eq!(arr.capacity(), 0);
    assert!(arr.is_empty());
    assert_eq!(arr.iter().next(), None);
}

#[test]
fn with_len_default_constructs() {
    let arr = DynamicArray::<String>::with_len(3);
    assert_eq!(arr.len(), 3);
    assert_eq!(arr.capacity(), 3);
    assert!(arr.iter().all(String::is_empty));
}

#[test]
fn from_elem_clones_value() {
    let arr = DynamicArray::from_elem(4, String::from("ab"));
    assert_eq!(arr, ["ab", "ab", "ab", "ab"]);
    assert_eq!(arr.capacity(), 4);
}

#[test]
fn literal_round_trip() {
    let arr = dynamic_array!['a', 'b', 'c'];
    assert_eq!(arr.len(), 3);
    assert_eq!(arr.capacity(), 3);
    let collected: Vec<char> = arr.iter().copied().collect();
    assert_eq!(collected, ['a', 'b', 'c']);
}

#[test]
fn from_slice_copies() {
    let src = [1, 2, 3, 4];
    let arr = DynamicArray::from(&src[..]);
    assert_eq!(arr, src);
    assert_eq!(arr.capacity(), 4);
}

#[test]
fn reserve_proxy_allocates_without_constructing() {
    let counter = Rc::new(Cell::new(0));
    let mut arr: DynamicArray<Droppable> = reserve(5).into();
    assert_eq!(arr.len(), 0);
    assert_eq!(arr.capacity(), 5);
    assert_eq!(counter.get(), 0);
    for _ in 0..5 {
        arr.push_back(Droppable::new(&counter));
    }
    assert_eq!(arr.capacity(), 5);
    drop(arr);
    assert_eq!(counter.get(), 0);
}

#[test]
fn push_back_doubles_capacity() {
    let mut arr = DynamicArray::new();
    let mut capacities = Vec::new();
    for i in 0..5 {
        arr.push_back(i);
        assert_eq!(arr.len(), i as usize + 1);
        capacities.push(arr.capacity());
    }
    assert_eq!(capacities, [1, 2, 4, 4, 8]);
}

#[test]
fn push_back_returns_new_element() {
    let mut arr = DynamicArray::new();
    *arr.push_back(1) += 10;
    assert_eq!(arr[0], 11);
}

#[test]
fn growth_preserves_order() {
    let mut arr = DynamicArray::new();
    for i in 0..100 {
        arr.push_back(i.to_string());
    }
    for (i, s) in arr.iter().enumerate() {
        assert_eq!(*s, i.to_string());
    }
    assert_eq!(arr.capacity(), 128);
}

#[test]
fn reserve_is_idempotent_and_never_shrinks() {
    let mut arr = dynamic_array![1, 2];
    arr.reserve(10);
    assert_eq!(arr.capacity(), 10);
    let ptr = arr.as_ptr();
    arr.reserve(10);
    assert_eq!(arr.capacity(), 10);
    assert_eq!(arr.as_ptr(), ptr);
    arr.reserve(3);
    assert_eq!(arr.capacity(), 10);
    assert_eq!(arr, [1, 2]);
}

#[test]
fn try_reserve_reports_overflow() {
    let mut arr = dynamic_array![1u64, 2, 3];
    let err = arr.try_reserve(usize::MAX).unwrap_err();
    assert_eq!(err, ArrayError::CapacityOverflow { requested: usize::MAX });
    assert_eq!(arr, [1, 2, 3]);
    assert_eq!(arr.capacity(), 3);
    assert!(arr.try_reserve(6).is_ok());
    assert_eq!(arr.capacity(), 6);
}

#[test]
fn resize_within_capacity() {
    let mut arr: DynamicArray<i32> = reserve(8).into();
    arr.push_back(7);
    arr.resize(4);
    assert_eq!(arr, [7, 0, 0, 0]);
    assert_eq!(arr.capacity(), 8);
}

#[test]
fn resize_past_capacity_fits_exactly() {
    let mut arr = dynamic_array![1, 2, 3];
    arr.resize(7);
    assert_eq!(arr, [1, 2, 3, 0, 0, 0, 0]);
    assert_eq!(arr.capacity(), 7);
}

#[test]
fn resize_shrinks_and_drops_tail() {
    let counter = Rc::new(Cell::new(0));
    let mut arr = DynamicArray::new();
    for _ in 0..6 {
        arr.push_back(Droppable::new(&counter));
    }
    arr.resize_with(2, || Droppable::new(&counter));
    assert_eq!(arr.len(), 2);
    assert_eq!(arr.capacity(), 8);
    assert_eq!(counter.get(), 2);
}

#[test]
fn clear_keeps_capacity_and_drops() {
    let counter = Rc::new(Cell::new(0));
    let mut arr = DynamicArray::new();
    for _ in 0..3 {
        arr.push_back(Droppable::new(&counter));
    }
    arr.clear();
    assert!(arr.is_empty());
    assert_eq!(arr.capacity(), 4);
    assert_eq!(counter.get(), 0);
}

#[test]
fn pop_back_drops_last() {
    let counter = Rc::new(Cell::new(0));
    let mut arr = DynamicArray::new();
    arr.push_back(Droppable::new(&counter));
    arr.push_back(Droppable::new(&counter));
    arr.pop_back();
    assert_eq!(arr.len(), 1);
    assert_eq!(counter.get(), 1);
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "pop_back on an empty DynamicArray")]
fn pop_back_on_empty_asserts_in_debug() {
    let mut arr = DynamicArray::<u8>::new();
    arr.pop_back();
}

#[test]
fn pop_returns_ownership() {
    let mut arr = dynamic_array![String::from("x"), String::from("y")];
    assert_eq!(arr.pop().as_deref(), Some("y"));
    assert_eq!(arr.pop().as_deref(), Some("x"));
    assert_eq!(arr.pop(), None);
}

#[test]
fn insert_at_every_position() {
    let base = [10, 20, 30, 40];
    for index in 0..=base.len() {
        let mut arr = DynamicArray::from(base);
        assert_eq!(*arr.insert(index, 99), 99);
        assert_eq!(arr.len(), base.len() + 1);
        assert_eq!(arr[index], 99);
        assert_eq!(&arr.as_slice()[..index], &base[..index]);
        assert_eq!(&arr.as_slice()[index + 1..], &base[index..]);
    }
}

#[test]
fn insert_at_capacity_splices_into_new_buffer() {
    let mut arr = dynamic_array![1, 2, 4];
    assert_eq!(arr.capacity(), 3);
    assert_eq!(*arr.insert(2, 3), 3);
    assert_eq!(arr, [1, 2, 3, 4]);
    assert_eq!(arr.capacity(), 6);
}

#[test]
fn insert_below_capacity_shifts_in_place() {
    let mut arr: DynamicArray<&str> = reserve(4).into();
    arr.push_back("b");
    arr.push_back("c");
    let ptr = arr.as_ptr();
    arr.insert(0, "a");
    assert_eq!(arr, ["a", "b", "c"]);
    assert_eq!(arr.as_ptr(), ptr);
}

#[test]
fn insert_into_empty() {
    let mut arr = DynamicArray::new();
    arr.insert(0, 'z');
    assert_eq!(arr, ['z']);
    assert_eq!(arr.capacity(), 1);
}

#[test]
#[should_panic(expected = "insertion index 3 out of bounds for length 2")]
fn insert_past_end_panics() {
    let mut arr = dynamic_array![1, 2];
    arr.insert(3, 0);
}

#[test]
fn erase_at_every_position() {
    let base = [1, 2, 3, 4, 5];
    for index in 0..base.len() {
        let mut arr = DynamicArray::from(base);
        let follower = arr.erase(index).next().copied();
        assert_eq!(follower, base.get(index + 1).copied());
        let mut expected = base.to_vec();
        expected.remove(index);
        assert_eq!(arr, expected);
        assert_eq!(arr.capacity(), base.len());
    }
}

#[test]
fn erase_drops_exactly_one() {
    let counter = Rc::new(Cell::new(0));
    let mut arr = DynamicArray::new();
    for _ in 0..4 {
        arr.push_back(Droppable::new(&counter));
    }
    let remaining = arr.erase(1).len();
    assert_eq!(remaining, 2);
    assert_eq!(counter.get(), 3);
    drop(arr);
    assert_eq!(counter.get(), 0);
}

#[test]
#[should_panic(expected = "removal index 2 out of bounds for length 2")]
fn erase_end_panics() {
    let mut arr = dynamic_array![1, 2];
    arr.erase(2);
}

#[test]
fn remove_returns_element() {
    let mut arr = dynamic_array!['a', 'b', 'c'];
    assert_eq!(arr.remove(0), 'a');
    assert_eq!(arr, ['b', 'c']);
}

#[test]
fn at_checks_bounds() {
    let mut arr = dynamic_array![5, 6, 7];
    assert_eq!(arr.at(2), Ok(&7));
    assert_eq!(arr.at(3), Err(ArrayError::IndexOutOfRange { index: 3, len: 3 }));
    assert_eq!(arr.at(8), Err(ArrayError::IndexOutOfRange { index: 8, len: 3 }));
    *arr.at_mut(0).unwrap() = 1;
    assert_eq!(arr[0], 1);
    assert!(arr.at_mut(3).is_err());
}

#[test]
fn at_ignores_uninitialized_capacity() {
    let arr: DynamicArray<u8> = reserve(4).into();
    assert!(arr.at(0).is_err());
}

#[test]
#[should_panic(expected = "index 3 out of bounds for length 3")]
fn index_past_end_panics() {
    let arr = dynamic_array![1, 2, 3];
    let _value = arr[3];
}

#[test]
fn get_unchecked_reads_live_slots() {
    let mut arr = dynamic_array![1, 2];
    unsafe {
        assert_eq!(*arr.get_unchecked(1), 2);
        *arr.get_unchecked_mut(0) = 3;
    }
    assert_eq!(arr, [3, 2]);
}

#[test]
fn clone_is_deep_and_tight() {
    let mut original: DynamicArray<String> = reserve(10).into();
    original.push_back("a".into());
    original.push_back("b".into());
    let mut copy = original.clone();
    assert_eq!(copy.capacity(), 2);
    copy.push_back("c".into());
    copy[0].push('!');
    assert_eq!(original, ["a", "b"]);
    assert_eq!(original.capacity(), 10);
    assert_eq!(copy, ["a!", "b", "c"]);
}

#[test]
fn clone_from_replaces_contents() {
    let counter = Rc::new(Cell::new(0));
    let mut target = DynamicArray::new();
    for _ in 0..3 {
        target.push_back(Rc::new(Droppable::new(&counter)));
    }
    let source = dynamic_array![Rc::new(Droppable::new(&counter))];
    target.clone_from(&source);
    assert_eq!(target.len(), 1);
    assert!(Rc::ptr_eq(&target[0], &source[0]));
    assert_eq!(counter.get(), 1);
}

#[test]
fn take_leaves_source_empty() {
    let mut source = dynamic_array![1, 2, 3];
    let ptr = source.as_ptr();
    let moved = source.take();
    assert_eq!(moved, [1, 2, 3]);
    assert_eq!(moved.as_ptr(), ptr);
    assert_eq!(source.len(), 0);
    assert_eq!(source.capacity(), 0);
    source.push_back(4);
    assert_eq!(source, [4]);
}

#[test]
fn move_from_releases_old_contents() {
    let counter = Rc::new(Cell::new(0));
    let mut target = DynamicArray::new();
    target.push_back(Droppable::new(&counter));
    let mut source = DynamicArray::new();
    source.push_back(Droppable::new(&counter));
    source.push_back(Droppable::new(&counter));
    target.move_from(&mut source);
    assert_eq!(counter.get(), 2);
    assert_eq!(target.len(), 2);
    assert_eq!(source.len(), 0);
    assert_eq!(source.capacity(), 0);
}

#[test]
fn swap_exchanges_everything() {
    let mut a = dynamic_array![1, 2, 3];
    let mut b: DynamicArray<i32> = reserve(9).into();
    a.swap(&mut b);
    assert!(a.is_empty());
    assert_eq!(a.capacity(), 9);
    assert_eq!(b, [1, 2, 3]);
    assert_eq!(b.capacity(), 3);
}

#[test]
fn shrink_to_fit_matches_len() {
    let mut arr = DynamicArray::new();
    for i in 0..5 {
        arr.push_back(i);
    }
    arr.shrink_to_fit();
    assert_eq!(arr.capacity(), 5);
    arr.clear();
    arr.shrink_to_fit();
    assert_eq!(arr.capacity(), 0);
}

#[test]
fn iterators_walk_both_ends() {
    let mut arr = dynamic_array![1, 2, 3, 4];
    let mut iter = arr.iter();
    assert_eq!(iter.len(), 4);
    assert_eq!(iter.next(), Some(&1));
    assert_eq!(iter.next_back(), Some(&4));
    assert_eq!(iter.as_slice(), &[2, 3]);
    for x in &mut arr {
        *x *= 2;
    }
    assert_eq!(arr.iter().rev().copied().collect::<Vec<_>>(), [8, 6, 4, 2]);
    let sum: i32 = (&arr).into_iter().sum();
    assert_eq!(sum, 20);
}

#[test]
fn into_iter_drops_unconsumed() {
    let counter = Rc::new(Cell::new(0));
    let mut arr = DynamicArray::new();
    for _ in 0..5 {
        arr.push_back(Droppable::new(&counter));
    }
    let mut iter = arr.into_iter();
    let first = iter.next();
    let last = iter.next_back();
    assert!(first.is_some() && last.is_some());
    assert_eq!(iter.len(), 3);
    drop(iter);
    assert_eq!(counter.get(), 2);
    drop((first, last));
    assert_eq!(counter.get(), 0);
}

#[test]
fn collect_and_extend() {
    let mut arr: DynamicArray<u32> = (1..=3).collect();
    assert_eq!(arr.capacity(), 4);
    arr.extend(&[4, 5]);
    arr.extend(vec![6]);
    assert_eq!(arr, [1, 2, 3, 4, 5, 6]);
    let back: Vec<u32> = arr.into_iter().collect();
    assert_eq!(back, [1, 2, 3, 4, 5, 6]);
}

#[test]
fn zero_sized_elements() {
    let mut arr = DynamicArray::new();
    for _ in 0..10 {
        arr.push_back(());
    }
    assert_eq!(arr.len(), 10);
    assert_eq!(arr.capacity(), 16);
    arr.insert(3, ());
    arr.erase(0);
    assert_eq!(arr.iter().count(), 10);
    assert_eq!(arr.into_iter().count(), 10);
}

#[test]
fn debug_lists_elements() {
    let arr = dynamic_array![1, 2];
    assert_eq!(format!("{:?}", arr), "[1, 2]");
}

#[test]
fn deref_exposes_slice_api() {
    let mut arr = dynamic_array![3, 1, 2];
    arr.sort();
    assert_eq!(arr.first(), Some(&1));
    assert_eq!(arr.last(), Some(&3));
    assert!(arr.contains(&2));
}

#[derive(Debug)]
struct PanicOnClone(Rc<Cell<usize>>, bool);

impl Clone for PanicOnClone {

    fn clone(&self) -> Self {
        if self.1 {
            panic!("clone failed")
        }
        self.0.set(self.0.get() + 1);
        Self(self.0.clone(), self.1)
    }
}

#[test]
fn panicking_clone_leaks_nothing() {
    let clones = Rc::new(Cell::new(0));
    let mut source = DynamicArray::new();
    source.push_back(PanicOnClone(clones.clone(), false));
    source.push_back(PanicOnClone(clones.clone(), true));
    let mut target = dynamic_array![PanicOnClone(clones.clone(), false)];
    let result = panic::catch_unwind(AssertUnwindSafe(|| target.clone_from(&source)));
    assert!(result.is_err());
    assert_eq!(target.len(), 1);
    // the one successful clone was dropped during unwinding
    assert_eq!(Rc::strong_count(&clones), 4);
}

#[test]
fn panicking_default_during_growth_keeps_original() {
    let counter = Rc::new(Cell::new(0));
    let mut arr = DynamicArray::new();
    arr.push_back(Droppable::new(&counter));
    arr.push_back(Droppable::new(&counter));
    let ptr = arr.as_ptr();
    let mut made = 0;
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        arr.resize_with(6, || {
            made += 1;
            if made == 3 {
                panic!("default failed")
            }
            Droppable::new(&counter)
        })
    }));
    assert!(result.is_err());
    assert_eq!(arr.len(), 2);
    assert_eq!(arr.capacity(), 2);
    assert_eq!(arr.as_ptr(), ptr);
    assert_eq!(counter.get(), 2);
}
