use core::{
    alloc::Layout,
    marker::PhantomData,
    mem,
    ptr::{self, NonNull},
};

use std::alloc::handle_alloc_error;

use crate::{
    allocator::Allocator,
    errors::ArrayError,
    global_alloc::GLOBAL_ALLOC,
};

use ArrayError::{AllocFailed, CapacityOverflow};

/// Owned block of `capacity` uninitialized slots for `T`.
///
/// A `Buffer` only reserves and frees memory. It never constructs or drops
/// values of `T`; tracking which slots are live is up to the owner.
///
/// Zero-capacity buffers and buffers of zero-sized types own no allocation and
/// point to a dangling, well-aligned address.
pub struct Buffer<T> {
    data: NonNull<T>,
    capacity: usize,
    _marker: PhantomData<T>,
}

unsafe impl<T: Send> Send for Buffer<T> {}
unsafe impl<T: Sync> Sync for Buffer<T> {}

impl<T> Buffer<T> {

    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            data: NonNull::dangling(),
            capacity: 0,
            _marker: PhantomData,
        }
    }

    /// Allocates `capacity` uninitialized slots.
    ///
    /// # Panics
    /// Panics if the size in bytes overflows `isize::MAX`. Allocation failure
    /// is reported through [`handle_alloc_error`].
    pub fn allocate(capacity: usize) -> Self {
        let layout = match Self::layout(capacity) {
            Ok(layout) => layout,
            Err(err) => panic!("{}", err),
        };
        Self::try_allocate(capacity)
            .unwrap_or_else(|_| handle_alloc_error(layout))
    }

    pub fn try_allocate(capacity: usize) -> Result<Self, ArrayError> {
        if capacity == 0 || size_of::<T>() == 0 {
            return Ok(Self {
                data: NonNull::dangling(),
                capacity,
                _marker: PhantomData,
            })
        }
        Self::layout(capacity)?;
        let data = unsafe { GLOBAL_ALLOC
            .allocate_uninit(capacity)
            .ok_or(AllocFailed { new_capacity: capacity })?
        };
        Ok(Self {
            data,
            capacity,
            _marker: PhantomData,
        })
    }

    #[inline(always)]
    fn layout(capacity: usize) -> Result<Layout, ArrayError> {
        Layout::array::<T>(capacity)
            .map_err(|_| CapacityOverflow { requested: capacity })
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline(always)]
    pub fn as_ptr(&self) -> *const T {
        self.data.as_ptr()
    }

    #[inline(always)]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.data.as_ptr()
    }

    #[inline(always)]
    pub fn as_non_null(&self) -> NonNull<T> {
        self.data
    }

    /// Pointer to slot `index`.
    ///
    /// # Safety
    /// `index` must be at most [`capacity`](Self::capacity).
    #[inline(always)]
    pub unsafe fn slot(&self, index: usize) -> NonNull<T> {
        debug_assert!(index <= self.capacity);
        unsafe { self.data.add(index) }
    }

    /// Exchanges the blocks owned by `self` and `other`.
    #[inline(always)]
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }
}

impl<T> Default for Buffer<T> {

    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for Buffer<T> {

    fn drop(&mut self) {
        if self.capacity == 0 || size_of::<T>() == 0 {
            return
        }
        unsafe { GLOBAL_ALLOC.free_uninit(self.data, self.capacity) }
    }
}

/// Tracks values written into `[start, end)` of a buffer that is not yet
/// owned by a container, dropping them if construction unwinds.
pub(crate) struct InitGuard<'a, T> {
    buffer: &'a Buffer<T>,
    start: usize,
    end: usize,
}

impl<'a, T> InitGuard<'a, T> {

    #[inline(always)]
    pub fn new(buffer: &'a Buffer<T>, start: usize) -> Self {
        Self {
            buffer,
            start,
            end: start,
        }
    }

    #[inline(always)]
    pub fn end(&self) -> usize {
        self.end
    }

    #[inline(always)]
    pub fn push(&mut self, value: T) {
        assert!(self.end < self.buffer.capacity(), "buffer full");
        unsafe { self.buffer.slot(self.end).write(value) }
        self.end += 1;
    }

    /// Hands ownership of the written values to the caller.
    #[inline(always)]
    pub fn finish(self) -> usize {
        let end = self.end;
        mem::forget(self);
        end
    }
}

impl<T> Drop for InitGuard<'_, T> {

    fn drop(&mut self) {
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                self.buffer.slot(self.start).as_ptr(),
                self.end - self.start,
            ));
        }
    }
}
