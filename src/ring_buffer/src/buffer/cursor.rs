/* Random-access cursors over a RingBuffer.

A cursor is a reference to its owning buffer plus a *logical* index. It never
holds an element address: every access goes back through the owner's
logical-to-physical mapping, so the cursor keeps pointing at the same logical
position however far the buffer's head rotates around the block.

Valid positions are `0..=len`; `len` is past-the-end. Positions outside that
range can still be formed by arithmetic, and reading through them yields
`None` (or panics for `Index`).
*/

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Index, IndexMut, Sub, SubAssign};
use std::ptr;

use super::ring_buffer::RingBuffer;

/// Shared cursor. Cheap to copy; borrows the buffer, so the buffer cannot be
/// mutated while the cursor is alive.
pub struct Cursor<'a, T> {
    owner: &'a RingBuffer<T>,
    index: isize,
}

impl<'a, T> Cursor<'a, T> {
    pub(crate) fn new(owner: &'a RingBuffer<T>, index: isize) -> Self {
        Self { owner, index }
    }

    /// Logical index. Equals `len` for the past-the-end cursor.
    pub fn index(&self) -> isize {
        self.index
    }

    /// Logical index as a position usable with `insert`/`erase`, if it lies
    /// in `0..=len`.
    pub fn position(&self) -> Option<usize> {
        usize::try_from(self.index)
            .ok()
            .filter(|&position| position <= self.owner.len())
    }

    pub fn owner(&self) -> &'a RingBuffer<T> {
        self.owner
    }

    pub fn is_end(&self) -> bool {
        self.index == self.owner.len() as isize
    }

    /// The element under the cursor; `None` at past-the-end.
    pub fn get(&self) -> Option<&'a T> {
        self.peek(0)
    }

    /// The element `offset` positions away from the cursor.
    pub fn peek(&self, offset: isize) -> Option<&'a T> {
        let index = self.index.checked_add(offset)?;
        usize::try_from(index)
            .ok()
            .and_then(|index| self.owner.get(index))
    }

    /// Prefix increment.
    pub fn move_next(&mut self) -> &mut Self {
        self.index += 1;
        self
    }

    /// Prefix decrement.
    pub fn move_prev(&mut self) -> &mut Self {
        self.index -= 1;
        self
    }

    /// Postfix increment: advances and returns the cursor as it was.
    pub fn fetch_next(&mut self) -> Self {
        let previous = *self;
        self.index += 1;
        previous
    }

    /// Postfix decrement: steps back and returns the cursor as it was.
    pub fn fetch_prev(&mut self) -> Self {
        let previous = *self;
        self.index -= 1;
        previous
    }

    pub fn same_owner(&self, other: &Cursor<'_, T>) -> bool {
        ptr::eq(self.owner, other.owner)
    }
}

impl<T> Clone for Cursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Cursor<'_, T> {}

impl<T> fmt::Debug for Cursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("owner", &(self.owner as *const RingBuffer<T>))
            .field("index", &self.index)
            .field("len", &self.owner.len())
            .finish()
    }
}

impl<T> PartialEq for Cursor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.same_owner(other) && self.index == other.index
    }
}

impl<T> Eq for Cursor<'_, T> {}

impl<T> PartialOrd for Cursor<'_, T> {
    /// Cursors of different buffers are unordered.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if !self.same_owner(other) {
            return None;
        }
        Some(self.index.cmp(&other.index))
    }
}

impl<T> AddAssign<isize> for Cursor<'_, T> {
    fn add_assign(&mut self, offset: isize) {
        self.index += offset;
    }
}

impl<T> SubAssign<isize> for Cursor<'_, T> {
    fn sub_assign(&mut self, offset: isize) {
        self.index -= offset;
    }
}

impl<'a, T> Add<isize> for Cursor<'a, T> {
    type Output = Cursor<'a, T>;

    fn add(mut self, offset: isize) -> Self::Output {
        self += offset;
        self
    }
}

impl<'a, T> Add<Cursor<'a, T>> for isize {
    type Output = Cursor<'a, T>;

    fn add(self, cursor: Cursor<'a, T>) -> Self::Output {
        cursor + self
    }
}

impl<'a, T> Sub<isize> for Cursor<'a, T> {
    type Output = Cursor<'a, T>;

    fn sub(mut self, offset: isize) -> Self::Output {
        self -= offset;
        self
    }
}

impl<T> Sub for Cursor<'_, T> {
    type Output = isize;

    /// Signed distance between two cursors of the same buffer.
    ///
    /// # Panics
    /// Panics if the cursors belong to different buffers.
    fn sub(self, other: Self) -> isize {
        assert!(
            self.same_owner(&other),
            "cannot measure the distance between cursors of different buffers"
        );
        self.index - other.index
    }
}

impl<T> Index<isize> for Cursor<'_, T> {
    type Output = T;

    /// Subscript relative to the cursor: `cursor[k]` is the element at
    /// `cursor.index() + k`.
    fn index(&self, offset: isize) -> &T {
        match self.peek(offset) {
            Some(value) => value,
            None => panic!(
                "cursor offset {offset} from position {} is out of bounds for length {}",
                self.index,
                self.owner.len()
            ),
        }
    }
}

/// Exclusive cursor: reads, writes, inserts and removes at its position.
///
/// Shares the representation and arithmetic of [`Cursor`]. No other cursor
/// can borrow the same buffer while it lives, so comparisons and distances
/// are taken against shared views obtained from [`CursorMut::buffer`] or
/// [`CursorMut::as_cursor`].
pub struct CursorMut<'a, T> {
    owner: &'a mut RingBuffer<T>,
    index: isize,
}

impl<'a, T> CursorMut<'a, T> {
    pub(crate) fn new(owner: &'a mut RingBuffer<T>, index: isize) -> Self {
        Self { owner, index }
    }

    pub fn index(&self) -> isize {
        self.index
    }

    pub fn position(&self) -> Option<usize> {
        self.as_cursor().position()
    }

    pub fn is_end(&self) -> bool {
        self.index == self.owner.len() as isize
    }

    fn live_position(&self) -> Option<usize> {
        usize::try_from(self.index)
            .ok()
            .filter(|&position| position < self.owner.len())
    }

    pub fn get(&self) -> Option<&T> {
        self.peek(0)
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.peek_mut(0)
    }

    pub fn peek(&self, offset: isize) -> Option<&T> {
        self.as_cursor().peek(offset)
    }

    pub fn peek_mut(&mut self, offset: isize) -> Option<&mut T> {
        let index = usize::try_from(self.index.checked_add(offset)?).ok()?;
        self.owner.get_mut(index)
    }

    pub fn move_next(&mut self) -> &mut Self {
        self.index += 1;
        self
    }

    pub fn move_prev(&mut self) -> &mut Self {
        self.index -= 1;
        self
    }

    /// Postfix increment: advances and returns a shared view of the position
    /// it left.
    pub fn fetch_next(&mut self) -> Cursor<'_, T> {
        let previous = self.index;
        self.index += 1;
        Cursor::new(self.owner, previous)
    }

    /// Postfix decrement: steps back and returns a shared view of the
    /// position it left.
    pub fn fetch_prev(&mut self) -> Cursor<'_, T> {
        let previous = self.index;
        self.index -= 1;
        Cursor::new(self.owner, previous)
    }

    /// Inserts `value` before the current position. The cursor then points at
    /// the new element.
    ///
    /// # Panics
    /// Panics if the cursor is outside `0..=len`.
    pub fn insert(&mut self, value: T) {
        let position = usize::try_from(self.index)
            .ok()
            .filter(|&position| position <= self.owner.len())
            .unwrap_or_else(|| {
                panic!(
                    "cursor position {} is out of bounds for insertion into length {}",
                    self.index,
                    self.owner.len()
                )
            });
        self.owner.insert(position, value);
    }

    /// Removes the current element. The cursor then points at the element
    /// that followed it.
    pub fn remove_current(&mut self) -> Option<T> {
        let index = self.live_position()?;
        self.owner.remove(index)
    }

    pub fn buffer(&self) -> &RingBuffer<T> {
        self.owner
    }

    /// Direct access to the buffer. The cursor keeps its logical index, so
    /// pushes and pops at the ends leave it on the same logical position.
    pub fn buffer_mut(&mut self) -> &mut RingBuffer<T> {
        self.owner
    }

    /// Read-only view at the same position.
    pub fn as_cursor(&self) -> Cursor<'_, T> {
        Cursor::new(self.owner, self.index)
    }

    pub fn into_cursor(self) -> Cursor<'a, T> {
        Cursor::new(self.owner, self.index)
    }
}

impl<'a, T> From<CursorMut<'a, T>> for Cursor<'a, T> {
    fn from(cursor: CursorMut<'a, T>) -> Self {
        cursor.into_cursor()
    }
}

impl<T> PartialEq<Cursor<'_, T>> for CursorMut<'_, T> {
    fn eq(&self, other: &Cursor<'_, T>) -> bool {
        self.as_cursor() == *other
    }
}

impl<T> PartialOrd<Cursor<'_, T>> for CursorMut<'_, T> {
    fn partial_cmp(&self, other: &Cursor<'_, T>) -> Option<Ordering> {
        self.as_cursor().partial_cmp(other)
    }
}

impl<T> Sub<Cursor<'_, T>> for &CursorMut<'_, T> {
    type Output = isize;

    /// Signed distance to a shared cursor of the same buffer.
    ///
    /// # Panics
    /// Panics if the cursors belong to different buffers.
    fn sub(self, other: Cursor<'_, T>) -> isize {
        self.as_cursor() - other
    }
}

impl<T> AddAssign<isize> for CursorMut<'_, T> {
    fn add_assign(&mut self, offset: isize) {
        self.index += offset;
    }
}

impl<T> SubAssign<isize> for CursorMut<'_, T> {
    fn sub_assign(&mut self, offset: isize) {
        self.index -= offset;
    }
}

impl<'a, T> Add<isize> for CursorMut<'a, T> {
    type Output = CursorMut<'a, T>;

    fn add(mut self, offset: isize) -> Self::Output {
        self += offset;
        self
    }
}

impl<'a, T> Add<CursorMut<'a, T>> for isize {
    type Output = CursorMut<'a, T>;

    fn add(self, cursor: CursorMut<'a, T>) -> Self::Output {
        cursor + self
    }
}

impl<'a, T> Sub<isize> for CursorMut<'a, T> {
    type Output = CursorMut<'a, T>;

    fn sub(mut self, offset: isize) -> Self::Output {
        self -= offset;
        self
    }
}

impl<T> Index<isize> for CursorMut<'_, T> {
    type Output = T;

    fn index(&self, offset: isize) -> &T {
        match self.peek(offset) {
            Some(value) => value,
            None => panic!(
                "cursor offset {offset} from position {} is out of bounds for length {}",
                self.index,
                self.owner.len()
            ),
        }
    }
}

impl<T> IndexMut<isize> for CursorMut<'_, T> {
    fn index_mut(&mut self, offset: isize) -> &mut T {
        let (index, len) = (self.index, self.owner.len());
        match self.peek_mut(offset) {
            Some(value) => value,
            None => panic!(
                "cursor offset {offset} from position {index} is out of bounds for length {len}"
            ),
        }
    }
}

impl<T> fmt::Debug for CursorMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorMut")
            .field("index", &self.index)
            .field("len", &self.owner.len())
            .finish()
    }
}

/// Reverse cursor, walking from the back towards the front.
///
/// Wraps a forward [`Cursor`] the way a reverse iterator wraps its base: the
/// element under a `RevCursor` is the one just before its base. `rbegin()`
/// has base `end()` and reads the last element; `rend()` has base `begin()`
/// and is past-the-end. Arithmetic is mirrored, so `rbegin() + k` reads
/// `buf[len - 1 - k]`.
pub struct RevCursor<'a, T> {
    base: Cursor<'a, T>,
}

impl<'a, T> RevCursor<'a, T> {
    pub(crate) fn new(base: Cursor<'a, T>) -> Self {
        Self { base }
    }

    /// The forward cursor one position after the element under `self`.
    pub fn base(&self) -> Cursor<'a, T> {
        self.base
    }

    pub fn is_end(&self) -> bool {
        self.base.index() == 0
    }

    pub fn get(&self) -> Option<&'a T> {
        self.peek(0)
    }

    /// The element `offset` positions further towards the front.
    pub fn peek(&self, offset: isize) -> Option<&'a T> {
        self.base.peek(-1 - offset)
    }

    pub fn move_next(&mut self) -> &mut Self {
        self.base.move_prev();
        self
    }

    pub fn move_prev(&mut self) -> &mut Self {
        self.base.move_next();
        self
    }

    pub fn fetch_next(&mut self) -> Self {
        let previous = *self;
        self.base.move_prev();
        previous
    }

    pub fn fetch_prev(&mut self) -> Self {
        let previous = *self;
        self.base.move_next();
        previous
    }
}

impl<T> Clone for RevCursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for RevCursor<'_, T> {}

impl<T> fmt::Debug for RevCursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RevCursor").field("base", &self.base).finish()
    }
}

impl<T> PartialEq for RevCursor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.base == other.base
    }
}

impl<T> Eq for RevCursor<'_, T> {}

impl<T> PartialOrd for RevCursor<'_, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        other.base.partial_cmp(&self.base)
    }
}

impl<T> AddAssign<isize> for RevCursor<'_, T> {
    fn add_assign(&mut self, offset: isize) {
        self.base -= offset;
    }
}

impl<T> SubAssign<isize> for RevCursor<'_, T> {
    fn sub_assign(&mut self, offset: isize) {
        self.base += offset;
    }
}

impl<'a, T> Add<isize> for RevCursor<'a, T> {
    type Output = RevCursor<'a, T>;

    fn add(mut self, offset: isize) -> Self::Output {
        self += offset;
        self
    }
}

impl<'a, T> Add<RevCursor<'a, T>> for isize {
    type Output = RevCursor<'a, T>;

    fn add(self, cursor: RevCursor<'a, T>) -> Self::Output {
        cursor + self
    }
}

impl<'a, T> Sub<isize> for RevCursor<'a, T> {
    type Output = RevCursor<'a, T>;

    fn sub(mut self, offset: isize) -> Self::Output {
        self -= offset;
        self
    }
}

impl<T> Sub for RevCursor<'_, T> {
    type Output = isize;

    /// # Panics
    /// Panics if the cursors belong to different buffers.
    fn sub(self, other: Self) -> isize {
        other.base - self.base
    }
}

impl<T> Index<isize> for RevCursor<'_, T> {
    type Output = T;

    fn index(&self, offset: isize) -> &T {
        match self.peek(offset) {
            Some(value) => value,
            None => panic!(
                "reverse cursor offset {offset} from base {} is out of bounds for length {}",
                self.base.index(),
                self.base.owner().len()
            ),
        }
    }
}
