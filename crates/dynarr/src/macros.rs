/// Compile-time assertion at item position.
#[macro_export]
macro_rules! const_assert {
    ($check:expr $(,$msg:tt)*) => {
        const _: () = assert!($check $(,$msg)*);
    };
}

/// Creates a [`DynamicArray`](crate::DynamicArray) from a list of elements or
/// from a value repeated `n` times.
///
/// The resulting capacity equals the number of elements.
///
/// ```
/// use dynarr::dynamic_array;
///
/// let arr = dynamic_array![1, 2, 3];
/// assert_eq!(arr, [1, 2, 3]);
/// assert_eq!(arr.capacity(), 3);
///
/// let zeros = dynamic_array![0u8; 4];
/// assert_eq!(zeros, [0, 0, 0, 0]);
/// ```
#[macro_export]
macro_rules! dynamic_array {
    () => (
        $crate::DynamicArray::new()
    );
    ($elem:expr; $n:expr) => (
        $crate::DynamicArray::from_elem($n, $elem)
    );
    ($($elem:expr),+ $(,)?) => (
        $crate::DynamicArray::from([$($elem),+])
    );
}
