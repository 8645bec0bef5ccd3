//! A growable, double-ended, random-access ring buffer.
//!
//! [`RingBuffer<T>`] stores its elements in a single allocation used
//! circularly: pushes and pops at either end are amortized O(1) and never
//! shift the other elements, indexing is O(1), and inserting or erasing in
//! the middle costs O(min(distance to front, distance to back)).
//!
//! ```
//! use ring_buffer::RingBuffer;
//!
//! let mut buf = RingBuffer::new();
//! buf.push_back(1);
//! buf.push_back(2);
//! buf.push_front(0);
//! assert_eq!(buf, [0, 1, 2]);
//!
//! buf.erase(1);
//! buf.insert(0, 9);
//! assert_eq!(buf, [9, 0, 2]);
//!
//! let cursor = buf.begin() + 1;
//! assert_eq!(cursor.get(), Some(&0));
//! assert_eq!(buf.end() - cursor, 2);
//! ```
//!
//! Out-of-range access is checked: `Index` panics, and `get`, `front`,
//! `back`, the `pop_*` methods and cursor reads return `Option`.
//!
//! Cargo features:
//! - `serde`: `Serialize`/`Deserialize` for `RingBuffer<T>` as a sequence.

pub mod buffer;
pub mod error;
mod storage;

#[cfg(feature = "serde")]
mod serde_impl;

pub use buffer::{Cursor, CursorMut, IntoIter, Iter, IterMut, RevCursor, RingBuffer};
pub use error::TryReserveError;
