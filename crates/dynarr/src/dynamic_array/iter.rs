use core::{
    fmt,
    iter::FusedIterator,
    marker::PhantomData,
    ptr::{self, NonNull},
};

use crate::buffer::Buffer;

/// Borrowing iterator over the live elements of a
/// [`DynamicArray`](crate::DynamicArray).
pub struct Iter<'a, T> {
    ptr: NonNull<T>,
    len: usize,
    _marker: PhantomData<&'a T>,
}

/// Mutable borrowing iterator over the live elements of a
/// [`DynamicArray`](crate::DynamicArray).
pub struct IterMut<'a, T> {
    ptr: NonNull<T>,
    len: usize,
    _marker: PhantomData<&'a mut T>,
}

unsafe impl<T: Sync> Send for Iter<'_, T> {}
unsafe impl<T: Sync> Sync for Iter<'_, T> {}
unsafe impl<T: Send> Send for IterMut<'_, T> {}
unsafe impl<T: Sync> Sync for IterMut<'_, T> {}

impl<'a, T> Iter<'a, T> {

    /// # Safety
    /// `[ptr, ptr + len)` must be live values borrowed for `'a`.
    #[inline(always)]
    pub(crate) unsafe fn new(ptr: NonNull<T>, len: usize) -> Self {
        Self {
            ptr,
            len,
            _marker: PhantomData,
        }
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &'a [T] {
        unsafe { core::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl<'a, T> IterMut<'a, T> {

    /// # Safety
    /// `[ptr, ptr + len)` must be live values exclusively borrowed for `'a`.
    #[inline(always)]
    pub(crate) unsafe fn new(ptr: NonNull<T>, len: usize) -> Self {
        Self {
            ptr,
            len,
            _marker: PhantomData,
        }
    }

    #[inline(always)]
    pub fn into_slice(self) -> &'a mut [T] {
        unsafe { core::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl<T> Clone for Iter<'_, T> {

    fn clone(&self) -> Self {
        Self {
            ptr: self.ptr,
            len: self.len,
            _marker: PhantomData,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {

    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None
        }
        let item = unsafe { self.ptr.as_ref() };
        self.ptr = unsafe { self.ptr.add(1) };
        self.len -= 1;
        Some(item)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {

    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None
        }
        self.len -= 1;
        Some(unsafe { self.ptr.add(self.len).as_ref() })
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

impl<'a, T> Iterator for IterMut<'a, T> {

    type Item = &'a mut T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None
        }
        let item = unsafe { self.ptr.as_mut() };
        self.ptr = unsafe { self.ptr.add(1) };
        self.len -= 1;
        Some(item)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<T> DoubleEndedIterator for IterMut<'_, T> {

    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None
        }
        self.len -= 1;
        Some(unsafe { self.ptr.add(self.len).as_mut() })
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}
impl<T> FusedIterator for IterMut<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {

    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter").field(&self.as_slice()).finish()
    }
}

/// Owning iterator returned by
/// [`DynamicArray::into_iter`](crate::DynamicArray).
///
/// Elements not yet yielded are dropped together with the iterator.
pub struct IntoIter<T> {
    storage: Buffer<T>,
    head: usize,
    tail: usize,
}

impl<T> IntoIter<T> {

    #[inline(always)]
    pub(crate) fn new(storage: Buffer<T>, len: usize) -> Self {
        Self {
            storage,
            head: 0,
            tail: len,
        }
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &[T] {
        unsafe {
            core::slice::from_raw_parts(self.storage.slot(self.head).as_ptr(), self.tail - self.head)
        }
    }
}

impl<T> Iterator for IntoIter<T> {

    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        if self.head == self.tail {
            return None
        }
        let value = unsafe { self.storage.slot(self.head).read() };
        self.head += 1;
        Some(value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.tail - self.head;
        (len, Some(len))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {

    #[inline]
    fn next_back(&mut self) -> Option<T> {
        if self.head == self.tail {
            return None
        }
        self.tail -= 1;
        Some(unsafe { self.storage.slot(self.tail).read() })
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> FusedIterator for IntoIter<T> {}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {

    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

impl<T> Drop for IntoIter<T> {

    fn drop(&mut self) {
        let remaining = self.tail - self.head;
        self.head = self.tail;
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                self.storage.slot(self.tail - remaining).as_ptr(),
                remaining,
            ));
        }
    }
}
