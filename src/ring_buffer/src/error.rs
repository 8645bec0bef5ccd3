use std::alloc::Layout;
use thiserror::Error;

/// Failure to grow the backing block of a [`RingBuffer`](crate::RingBuffer).
///
/// Returned by [`RingBuffer::try_reserve`](crate::RingBuffer::try_reserve).
/// When the error is returned, the buffer is exactly as it was before the
/// call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TryReserveError {
    /// The requested slot count does not fit in `usize` or exceeds
    /// `isize::MAX` bytes.
    #[error("requested ring buffer capacity overflows the address space")]
    CapacityOverflow,

    /// The allocator refused the request.
    #[error("memory allocation of {} bytes failed", .layout.size())]
    AllocError { layout: Layout },
}

impl TryReserveError {
    /// Escalates the error for infallible call sites, like std collections do.
    pub(crate) fn raise(self) -> ! {
        match self {
            TryReserveError::CapacityOverflow => panic!("capacity overflow"),
            TryReserveError::AllocError { layout } => std::alloc::handle_alloc_error(layout),
        }
    }
}
