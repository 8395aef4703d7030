mod iter;
mod cmp;

#[cfg(test)]
mod tests;

use core::{
    fmt,
    mem::{self, ManuallyDrop},
    ops::{Deref, DerefMut, Index, IndexMut},
    ptr,
    slice,
};

use crate::{
    buffer::{Buffer, InitGuard},
    capacity_policy::{CapacityPolicy, Doubling, ExactFit},
    errors::ArrayError,
    reserve::ReserveProxy,
    trace::{self, Event, EventKind},
    const_assert,
};

pub use iter::{Iter, IterMut, IntoIter};

use ArrayError::IndexOutOfRange;

/// A growable, contiguous array built directly on a [`Buffer`].
///
/// Slots `[0, len)` of the buffer hold live values, slots
/// `[len, capacity)` are uninitialized. Appending past the capacity doubles it
/// (`0 -> 1 -> 2 -> 4 -> ...`); explicit reservations and resizes grow to the
/// exact size requested. Capacity never shrinks unless
/// [`shrink_to_fit`](Self::shrink_to_fit) is called.
///
/// Every operation that replaces the buffer builds the replacement first and
/// swaps it in afterwards, so a panic while constructing new elements leaves
/// the array as it was.
///
/// Borrowing iterators and references are invalidated by any operation that
/// reallocates or shifts elements; the borrow checker enforces this.
///
/// ```
/// use dynarr::{DynamicArray, dynamic_array};
///
/// let mut arr = DynamicArray::new();
/// arr.push_back(1);
/// arr.push_back(3);
/// arr.insert(1, 2);
/// assert_eq!(arr, [1, 2, 3]);
/// assert_eq!(arr.capacity(), 4);
///
/// assert!(arr.at(3).is_err());
/// assert_eq!(arr.at(2), Ok(&3));
///
/// let mut next = arr.erase(0);
/// assert_eq!(next.next(), Some(&mut 2));
/// assert_eq!(arr, dynamic_array![2, 3]);
/// ```
pub struct DynamicArray<T> {
    storage: Buffer<T>,
    size: usize,
}

const_assert!(
    size_of::<DynamicArray<u32>>() == size_of::<Option<DynamicArray<u32>>>(),
    "Option<DynamicArray> must use the buffer niche"
);

impl<T> DynamicArray<T> {

    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            storage: Buffer::new(),
            size: 0,
        }
    }

    /// Creates an array of `len` default values with capacity `len`.
    pub fn with_len(len: usize) -> Self
        where
            T: Default
    {
        Self::from_fn_exact(len, |_| T::default())
    }

    /// Creates an array of `len` clones of `value` with capacity `len`.
    pub fn from_elem(len: usize, value: T) -> Self
        where
            T: Clone
    {
        Self::from_fn_exact(len, |_| value.clone())
    }

    /// Creates an empty array with exactly the capacity requested by `proxy`.
    #[inline(always)]
    pub fn with_reserved(proxy: ReserveProxy) -> Self {
        Self {
            storage: Buffer::allocate(proxy.capacity()),
            size: 0,
        }
    }

    fn from_fn_exact(len: usize, mut f: impl FnMut(usize) -> T) -> Self {
        let storage = Buffer::allocate(len);
        let mut guard = InitGuard::new(&storage, 0);
        while guard.end() < len {
            let value = f(guard.end());
            guard.push(value);
        }
        let size = guard.finish();
        Self {
            storage,
            size,
        }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.size
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    #[inline(always)]
    pub fn as_ptr(&self) -> *const T {
        self.storage.as_ptr()
    }

    #[inline(always)]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.storage.as_mut_ptr()
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.storage.as_ptr(), self.size) }
    }

    #[inline(always)]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.storage.as_mut_ptr(), self.size) }
    }

    /// Returns the element at `index`, or [`ArrayError::IndexOutOfRange`].
    #[inline]
    pub fn at(&self, index: usize) -> Result<&T, ArrayError> {
        if index >= self.size {
            return Err(IndexOutOfRange { index, len: self.size })
        }
        Ok(unsafe { self.storage.slot(index).as_ref() })
    }

    #[inline]
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, ArrayError> {
        if index >= self.size {
            return Err(IndexOutOfRange { index, len: self.size })
        }
        Ok(unsafe { self.storage.slot(index).as_mut() })
    }

    /// # Safety
    /// `index` must be less than [`len`](Self::len).
    #[inline(always)]
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        debug_assert!(index < self.size, "index {} out of bounds for length {}", index, self.size);
        unsafe { self.storage.slot(index).as_ref() }
    }

    /// # Safety
    /// `index` must be less than [`len`](Self::len).
    #[inline(always)]
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(index < self.size, "index {} out of bounds for length {}", index, self.size);
        unsafe { self.storage.slot(index).as_mut() }
    }

    /// Drops every element. The capacity is kept for reuse.
    #[inline(always)]
    pub fn clear(&mut self) {
        self.truncate(0)
    }

    /// Drops the elements past `len`. Does nothing if `len >= self.len()`.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.size {
            return
        }
        let tail = self.size - len;
        // shrink first so a panicking destructor cannot cause a double drop
        self.size = len;
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                self.storage.slot(len).as_ptr(),
                tail,
            ));
        }
    }

    /// Grows the capacity to exactly `capacity` if it is currently smaller.
    ///
    /// Calling it again with the same value is a no-op; capacity never shrinks.
    pub fn reserve(&mut self, capacity: usize) {
        if let Some(new_capacity) = ExactFit::grow(self.capacity(), capacity) {
            self.relocate(Buffer::allocate(new_capacity), EventKind::Reserve);
        }
    }

    /// Like [`reserve`](Self::reserve), but reports failure instead of
    /// aborting. The array is unchanged on error.
    pub fn try_reserve(&mut self, capacity: usize) -> Result<(), ArrayError> {
        if let Some(new_capacity) = ExactFit::grow(self.capacity(), capacity) {
            self.relocate(Buffer::try_allocate(new_capacity)?, EventKind::Reserve);
        }
        Ok(())
    }

    /// Reduces the capacity to the current length.
    pub fn shrink_to_fit(&mut self) {
        if self.capacity() > self.size {
            self.relocate(Buffer::allocate(self.size), EventKind::Shrink);
        }
    }

    /// Resizes to `len`, filling new slots with [`Default::default`].
    ///
    /// Shrinking drops the trimmed elements. Growing within the capacity
    /// constructs the new elements in place. Growing past the capacity
    /// replaces the buffer with one of exactly `len` slots.
    #[inline]
    pub fn resize(&mut self, len: usize)
        where
            T: Default
    {
        self.resize_with(len, T::default)
    }

    pub fn resize_with<F>(&mut self, len: usize, mut f: F)
        where
            F: FnMut() -> T
    {
        if len <= self.size {
            self.truncate(len);
            return
        }
        if len <= self.capacity() {
            while self.size < len {
                unsafe { self.storage.slot(self.size).write(f()) }
                self.size += 1;
            }
            return
        }
        let replacement = Buffer::allocate(len);
        let mut tail = InitGuard::new(&replacement, self.size);
        while tail.end() < len {
            tail.push(f());
        }
        tail.finish();
        let old_len = self.size;
        unsafe {
            self.storage.as_non_null().copy_to_nonoverlapping(replacement.as_non_null(), old_len);
        }
        self.size = len;
        self.adopt(replacement, old_len, EventKind::ExactFit);
    }

    /// Appends `value`, doubling the capacity if the array is full.
    pub fn push_back(&mut self, value: T) -> &mut T {
        if self.size == self.capacity() {
            if let Some(new_capacity) = Doubling::grow(self.capacity(), self.one_more()) {
                self.relocate(Buffer::allocate(new_capacity), EventKind::Grow);
            }
        }
        unsafe {
            let mut slot = self.storage.slot(self.size);
            slot.write(value);
            self.size += 1;
            slot.as_mut()
        }
    }

    /// Drops the last element.
    ///
    /// The array must not be empty. This is only checked in debug builds, in
    /// release builds popping an empty array does nothing.
    #[inline]
    pub fn pop_back(&mut self) {
        debug_assert!(self.size > 0, "pop_back on an empty DynamicArray");
        drop(self.pop());
    }

    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        if self.size == 0 { return None }
        self.size -= 1;
        Some(unsafe { self.storage.slot(self.size).read() })
    }

    #[inline]
    pub fn first(&self) -> Option<&T> {
        self.as_slice().first()
    }

    #[inline]
    pub fn last(&self) -> Option<&T> {
        self.as_slice().last()
    }

    /// Inserts `value` at `index`, shifting the following elements right.
    ///
    /// # Panics
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, value: T) -> &mut T {
        let len = self.size;
        if index > len {
            panic!("insertion index {} out of bounds for length {}", index, len)
        }
        if len == self.capacity() {
            let required = self.one_more();
            let new_capacity = Doubling::grow(self.capacity(), required).unwrap_or(required);
            let replacement = Buffer::allocate(new_capacity);
            unsafe {
                let src = self.storage.as_non_null();
                let dst = replacement.as_non_null();
                src.copy_to_nonoverlapping(dst, index);
                dst.add(index).write(value);
                src.add(index).copy_to_nonoverlapping(dst.add(index + 1), len - index);
            }
            self.size += 1;
            self.adopt(replacement, len, EventKind::Grow);
        }
        else {
            unsafe {
                let slot = self.storage.slot(index);
                slot.copy_to(slot.add(1), len - index);
                slot.write(value);
            }
            self.size += 1;
        }
        unsafe { self.storage.slot(index).as_mut() }
    }

    /// Removes and drops the element at `index`, shifting the following
    /// elements left.
    ///
    /// Returns an iterator starting at the element that followed the erased
    /// one, which is empty if the last element was erased.
    ///
    /// # Panics
    /// Panics if `index >= len`.
    pub fn erase(&mut self, index: usize) -> IterMut<'_, T> {
        drop(self.remove(index));
        unsafe { IterMut::new(self.storage.slot(index), self.size - index) }
    }

    /// Removes and returns the element at `index`, shifting the following
    /// elements left.
    ///
    /// # Panics
    /// Panics if `index >= len`.
    pub fn remove(&mut self, index: usize) -> T {
        let len = self.size;
        if index >= len {
            panic!("removal index {} out of bounds for length {}", index, len)
        }
        unsafe {
            let slot = self.storage.slot(index);
            let removed = slot.read();
            slot.add(1).copy_to(slot, len - index - 1);
            self.size -= 1;
            removed
        }
    }

    /// Exchanges contents with `other` without moving any element.
    #[inline(always)]
    pub fn swap(&mut self, other: &mut Self) {
        self.storage.swap(&mut other.storage);
        mem::swap(&mut self.size, &mut other.size);
    }

    /// Moves the contents out, leaving `self` empty with no storage.
    #[inline(always)]
    pub fn take(&mut self) -> Self {
        mem::take(self)
    }

    /// Drops the current contents and takes over the contents of `other`,
    /// leaving `other` empty with no storage.
    #[inline]
    pub fn move_from(&mut self, other: &mut Self) {
        *self = other.take();
    }

    #[inline(always)]
    pub fn iter(&self) -> Iter<'_, T> {
        unsafe { Iter::new(self.storage.as_non_null(), self.size) }
    }

    #[inline(always)]
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        unsafe { IterMut::new(self.storage.as_non_null(), self.size) }
    }

    #[inline(always)]
    fn one_more(&self) -> usize {
        match self.size.checked_add(1) {
            Some(required) => required,
            None => panic!("capacity overflow"),
        }
    }

    /// Moves the live elements into `replacement` and adopts it.
    fn relocate(&mut self, replacement: Buffer<T>, kind: EventKind) {
        debug_assert!(replacement.capacity() >= self.size);
        unsafe {
            self.storage.as_non_null().copy_to_nonoverlapping(replacement.as_non_null(), self.size);
        }
        self.adopt(replacement, self.size, kind);
    }

    /// Swaps in `replacement`, whose first `self.size` slots must already be
    /// live. The old buffer is freed without dropping anything, `moved` is
    /// only reported to the trace hook.
    fn adopt(&mut self, mut replacement: Buffer<T>, moved: usize, kind: EventKind) {
        let old_capacity = self.capacity();
        self.storage.swap(&mut replacement);
        trace::emit(|| Event {
            kind,
            type_name: core::any::type_name::<T>(),
            elem_size: size_of::<T>(),
            len: moved,
            old_capacity,
            new_capacity: self.capacity(),
        });
    }
}

impl<T> Drop for DynamicArray<T> {

    fn drop(&mut self) {
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                self.storage.as_mut_ptr(),
                self.size,
            ));
        }
    }
}

impl<T> Default for DynamicArray<T> {

    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for DynamicArray<T> {

    /// Deep copy with capacity equal to the source length.
    fn clone(&self) -> Self {
        let src = self.as_slice();
        Self::from_fn_exact(src.len(), |i| src[i].clone())
    }

    /// Builds a full copy of `source` before touching `self`.
    fn clone_from(&mut self, source: &Self) {
        let mut copy = source.clone();
        self.swap(&mut copy);
    }
}

impl<T: fmt::Debug> fmt::Debug for DynamicArray<T> {

    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> From<ReserveProxy> for DynamicArray<T> {

    #[inline(always)]
    fn from(proxy: ReserveProxy) -> Self {
        Self::with_reserved(proxy)
    }
}

impl<T, const N: usize> From<[T; N]> for DynamicArray<T> {

    fn from(values: [T; N]) -> Self {
        let mut array = Self::with_reserved(crate::reserve(N));
        for value in values {
            array.push_back(value);
        }
        array
    }
}

impl<T: Clone> From<&[T]> for DynamicArray<T> {

    fn from(values: &[T]) -> Self {
        Self::from_fn_exact(values.len(), |i| values[i].clone())
    }
}

impl<T> FromIterator<T> for DynamicArray<T> {

    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut array = Self::new();
        array.extend(iter);
        array
    }
}

impl<T> Extend<T> for DynamicArray<T> {

    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<'a, T: Copy + 'a> Extend<&'a T> for DynamicArray<T> {

    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(*value);
        }
    }
}

impl<T> Index<usize> for DynamicArray<T> {

    type Output = T;

    #[inline(always)]
    fn index(&self, index: usize) -> &Self::Output {
        if index >= self.size {
            panic!("index {} out of bounds for length {}", index, self.size)
        }
        unsafe { self.storage.slot(index).as_ref() }
    }
}

impl<T> IndexMut<usize> for DynamicArray<T> {

    #[inline(always)]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        if index >= self.size {
            panic!("index {} out of bounds for length {}", index, self.size)
        }
        unsafe { self.storage.slot(index).as_mut() }
    }
}

impl<T> AsRef<[T]> for DynamicArray<T> {

    #[inline(always)]
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> AsMut<[T]> for DynamicArray<T> {

    #[inline(always)]
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T> Deref for DynamicArray<T> {

    type Target = [T];

    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T> DerefMut for DynamicArray<T> {

    #[inline(always)]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl<'a, T> IntoIterator for &'a DynamicArray<T> {

    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut DynamicArray<T> {

    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T> IntoIterator for DynamicArray<T> {

    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        let mut this = ManuallyDrop::new(self);
        let storage = mem::take(&mut this.storage);
        IntoIter::new(storage, this.size)
    }
}
