/// Decides the capacity of a replacement buffer.
pub trait CapacityPolicy {

    /// Returns the new capacity needed to hold `required` slots, or [`None`]
    /// if `current` already suffices.
    fn grow(current: usize, required: usize) -> Option<usize>;
}

/// Amortized growth used by single element appends: `max(1, 2 * current)`.
pub struct Doubling {}

impl CapacityPolicy for Doubling {

    #[inline]
    fn grow(current: usize, required: usize) -> Option<usize> {
        if required <= current {
            return None
        }
        let doubled = current.checked_mul(2).unwrap_or(usize::MAX);
        Some(doubled.max(1).max(required))
    }
}

/// Grows to exactly the requested capacity.
pub struct ExactFit {}

impl CapacityPolicy for ExactFit {

    #[inline]
    fn grow(current: usize, required: usize) -> Option<usize> {
        if required <= current { None }
        else { Some(required) }
    }
}
