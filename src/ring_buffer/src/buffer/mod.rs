pub mod cursor;
pub mod iter;
pub mod ring_buffer;
mod traits;

pub use cursor::{Cursor, CursorMut, RevCursor};
pub use iter::{IntoIter, Iter, IterMut};
pub use ring_buffer::RingBuffer;
