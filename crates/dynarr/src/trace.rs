//! Hook for observing buffer replacements.
//!
//! The container crate carries no logger of its own; a logger installs a
//! hook here once per process.

use std::sync::OnceLock;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EventKind {
    /// Amortized growth from an append or insertion.
    Grow,
    /// Explicit capacity reservation.
    Reserve,
    /// Growth to exactly the new length during a resize.
    ExactFit,
    /// Capacity reduced to the current length.
    Shrink,
}

#[derive(Clone, Copy, Debug)]
pub struct Event {
    pub kind: EventKind,
    pub type_name: &'static str,
    pub elem_size: usize,
    pub len: usize,
    pub old_capacity: usize,
    pub new_capacity: usize,
}

static TRACE_HOOK: OnceLock<fn(&Event)> = OnceLock::new();

/// Installs `hook`. Returns `false` if a hook was already installed.
pub fn set_trace_hook(hook: fn(&Event)) -> bool {
    TRACE_HOOK.set(hook).is_ok()
}

#[inline(always)]
pub(crate) fn emit(event: impl FnOnce() -> Event) {
    if let Some(hook) = TRACE_HOOK.get() {
        hook(&event())
    }
}
