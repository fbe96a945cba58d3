/// Ways a buffer handed to this crate can be unusable.
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum InvalidInput {
    /// A null pointer was passed where a string was expected.
    #[error("null pointer")]
    Null,
    /// The buffer ended before a terminating zero byte was found.
    #[error("no terminating zero byte within {scanned} bytes")]
    Unterminated {
        /// How many bytes were examined.
        scanned: usize,
    },
    /// The destination can't hold the requested number of bytes.
    #[error("destination holds {available} bytes, {needed} requested")]
    DestinationTooShort {
        /// The bound asked for.
        needed: usize,
        /// The actual destination length.
        available: usize,
    },
}

/// Errors returned by the fallible operations of this crate.
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The backing buffer could not be allocated.
    ///
    /// This is also returned when the requested size doesn't fit into `usize`.
    #[error("failed to allocate {requested} bytes")]
    OutOfMemory {
        /// Size of the failed allocation, in bytes.
        requested: usize,
    },
    /// A buffer passed in is null or malformed.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),
}

impl Error {
    /// Is this an allocation failure?
    pub fn is_out_of_memory(&self) -> bool {
        matches!(self, Error::OutOfMemory { .. })
    }
}
