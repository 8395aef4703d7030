/// Request to pre-size a [`DynamicArray`](crate::DynamicArray) without
/// constructing any elements.
///
/// Produced by [`reserve`] and consumed by
/// [`DynamicArray::with_reserved`](crate::DynamicArray::with_reserved) or the
/// matching [`From`] impl.
///
/// ```
/// use dynarr::{DynamicArray, reserve};
///
/// let arr: DynamicArray<String> = reserve(16).into();
/// assert_eq!(arr.len(), 0);
/// assert_eq!(arr.capacity(), 16);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[must_use]
pub struct ReserveProxy {
    capacity: usize,
}

impl ReserveProxy {

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[inline(always)]
pub fn reserve(capacity: usize) -> ReserveProxy {
    ReserveProxy { capacity }
}
