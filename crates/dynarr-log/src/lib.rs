//! Leveled, colored stderr logging for the dynarr workspace.
//!
//! Filtering is configured with `RUST_LOG` (`level` or `target=level`, comma
//! separated). [`install`] forwards buffer relocations of every
//! [`DynamicArray`](dynarr::DynamicArray) to the `dynarr` target at trace level.

mod log;

pub use log::*;
