use thiserror::Error;

/// Errors that can occur during record buffer operations.
///
/// There is deliberately no double-release condition here: releasing a buffer consumes it, so
/// releasing twice or touching a released buffer is rejected at compile time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    /// The backing storage request could not be satisfied, either because the allocator refused
    /// it or because the requested byte size does not fit in memory at all.
    #[error("allocation of {requested_bytes} bytes for {requested_records} records failed")]
    AllocationFailed {
        /// Number of records the failed request asked for.
        requested_records: usize,
        /// Number of bytes the failed request amounts to, saturated on arithmetic overflow.
        requested_bytes: usize,
    },
    /// A record index outside `[0, len)`.
    #[error("record index {index} is out of bounds for a buffer of {len} records")]
    OutOfBounds {
        /// The rejected index.
        index: usize,
        /// Number of records in the buffer.
        len: usize,
    },
}
