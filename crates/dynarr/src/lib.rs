//! Growable contiguous array built directly on a raw owned buffer.
//!
//! [`DynamicArray`] manages element lifetimes on top of [`Buffer`], which only
//! reserves and frees uninitialized memory.

mod macros;
mod allocator;
mod global_alloc;
mod buffer;
mod errors;
mod reserve;
mod dynamic_array;

pub mod capacity_policy;
pub mod trace;

pub use allocator::Allocator;
pub use global_alloc::{GlobalAlloc, GLOBAL_ALLOC};
pub use buffer::Buffer;
pub use errors::ArrayError;
pub use capacity_policy::CapacityPolicy;
pub use reserve::{reserve, ReserveProxy};
pub use dynamic_array::{DynamicArray, Iter, IterMut, IntoIter};
pub use trace::set_trace_hook;
