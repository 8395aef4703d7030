#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ArrayError {
    IndexOutOfRange {
        index: usize,
        len: usize,
    },
    CapacityOverflow {
        requested: usize,
    },
    AllocFailed {
        new_capacity: usize,
    },
}

impl core::fmt::Display for ArrayError {

    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {} out of range for length {}", index, len)
            },
            Self::CapacityOverflow { requested } => {
                write!(f, "capacity {} exceeds the maximum allocation size", requested)
            },
            Self::AllocFailed { new_capacity } => {
                write!(f, "allocation failed with new capacity {}", new_capacity)
            },
        }
    }
}

impl core::error::Error for ArrayError {}
