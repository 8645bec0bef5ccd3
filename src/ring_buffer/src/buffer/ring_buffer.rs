/* A growable double-ended ring buffer.

`RingBuffer<T>` keeps its elements in one block of slots used circularly.
Logical index `i` lives in physical slot `(head + i) mod slots`, so pushing
or popping at either end never shifts the other elements.

Key details:
- One slot is always left vacant: a block of `slots` physical slots holds at
  most `slots - 1` elements, and `capacity` reports that usable count.
- Growth is triggered when a push finds `len == capacity`. The new usable
  capacity is `2 * (slots - 1) + 1`, or 2 for the first allocation, so an
  empty buffer grows 0 -> 2 -> 5 -> 11 -> 23 ...
- Growth moves every element into the new block in logical order starting at
  slot 0 (head becomes 0). Moves cannot panic, and the new block is allocated
  before anything is touched, so a failed growth leaves the buffer unchanged.
- `insert` and `erase` shift whichever side of the position is shorter, by
  pushing/popping at that end and swapping neighbours.
- The buffer is single-owner and unsynchronized. Share it across threads only
  behind external synchronization such as a `Mutex`.
*/

use std::ops::{Bound, Index, IndexMut, RangeBounds};

use tracing::{debug, trace};

use super::cursor::{Cursor, CursorMut, RevCursor};
use super::iter::{Iter, IterMut};
use crate::error::TryReserveError;
use crate::storage::RawSlots;

pub struct RingBuffer<T> {
    slots: RawSlots<T>,
    head: usize,
    len: usize,
}

impl<T> RingBuffer<T> {
    /// Creates an empty buffer. Does not allocate.
    pub const fn new() -> Self {
        Self {
            slots: RawSlots::empty(),
            head: 0,
            len: 0,
        }
    }

    /// Creates an empty buffer able to hold `capacity` elements without
    /// growing. `with_capacity(0)` does not allocate.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut buffer = Self::new();
        buffer.reserve(capacity);
        buffer
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of elements the buffer can hold before it has to grow.
    ///
    /// This excludes the one physical slot that is always kept vacant.
    pub fn capacity(&self) -> usize {
        self.slots.slot_count().saturating_sub(1)
    }

    /// Maps a logical index in `0..=slot_count` to its physical slot.
    #[inline]
    fn physical(&self, logical: usize) -> usize {
        let to_wrap = self.slots.slot_count() - self.head;
        if logical < to_wrap {
            self.head + logical
        } else {
            logical - to_wrap
        }
    }

    /// Lengths of the live run starting at `head` and of the run wrapped
    /// around to slot 0.
    #[inline]
    fn runs(&self) -> (usize, usize) {
        let first = self.len.min(self.slots.slot_count() - self.head);
        (first, self.len - first)
    }

    /// Makes sure `capacity` is at least `capacity`, growing to exactly that
    /// usable capacity if needed. Requests at or below the current capacity
    /// do nothing.
    ///
    /// # Panics
    /// Panics if the slot count overflows `usize`; aborts through
    /// [`std::alloc::handle_alloc_error`] if the allocator fails.
    pub fn reserve(&mut self, capacity: usize) {
        if let Err(err) = self.try_reserve(capacity) {
            err.raise();
        }
    }

    /// Fallible form of [`reserve`](Self::reserve). On error the buffer is
    /// unchanged.
    pub fn try_reserve(&mut self, capacity: usize) -> Result<(), TryReserveError> {
        if capacity <= self.capacity() {
            return Ok(());
        }
        debug!(
            from = self.capacity(),
            to = capacity,
            len = self.len,
            "reserving ring buffer capacity"
        );
        self.relocate(capacity)
    }

    /// Makes room for `additional` more elements. Small requests follow the
    /// regular growth sequence so repeated calls stay amortized O(1).
    pub fn reserve_additional(&mut self, additional: usize) {
        let Some(needed) = self.len.checked_add(additional) else {
            TryReserveError::CapacityOverflow.raise();
        };
        if needed <= self.capacity() {
            return;
        }
        let target = self.next_capacity().max(needed);
        self.reserve(target);
    }

    /// Usable capacity after one growth step.
    fn next_capacity(&self) -> usize {
        let slot_count = self.slots.slot_count();
        if slot_count == 0 {
            return 2;
        }
        match (slot_count - 1).checked_mul(2).and_then(|c| c.checked_add(1)) {
            Some(requested) => requested,
            None => TryReserveError::CapacityOverflow.raise(),
        }
    }

    fn grow(&mut self) {
        let requested = self.next_capacity();
        if let Err(err) = self.relocate(requested) {
            err.raise();
        }
    }

    /// Moves the live elements into a fresh block of `capacity + 1` slots,
    /// in logical order from slot 0.
    fn relocate(&mut self, capacity: usize) -> Result<(), TryReserveError> {
        let slot_count = capacity
            .checked_add(1)
            .ok_or(TryReserveError::CapacityOverflow)?;
        let mut fresh = RawSlots::allocate(slot_count)?;

        let (first, second) = self.runs();
        // SAFETY: the two runs are exactly the live slots, and `fresh` has at
        // least `len` vacant slots. The old slots are vacant afterwards and
        // the old block is only deallocated.
        unsafe {
            self.slots.move_run(self.head, &mut fresh, 0, first);
            self.slots.move_run(0, &mut fresh, first, second);
        }

        let from = self.capacity();
        self.slots = fresh;
        self.head = 0;
        trace!(from, to = self.capacity(), len = self.len, "ring buffer relocated");
        Ok(())
    }

    /// Appends an element at the back.
    ///
    /// The value is built by the caller before the call, so a panicking
    /// constructor or clone never reaches the buffer.
    pub fn push_back(&mut self, value: T) {
        if self.len >= self.capacity() {
            self.grow();
        }
        let slot = self.physical(self.len);
        // SAFETY: `len < capacity`, so the slot after the tail is vacant.
        unsafe { self.slots.write(slot, value) };
        self.len += 1;
    }

    /// Prepends an element at the front, moving `head` back one slot.
    pub fn push_front(&mut self, value: T) {
        if self.len >= self.capacity() {
            self.grow();
        }
        let slot = match self.head {
            0 => self.slots.slot_count() - 1,
            head => head - 1,
        };
        // SAFETY: `len < capacity`, so the slot before head is vacant.
        unsafe { self.slots.write(slot, value) };
        self.head = slot;
        self.len += 1;
    }

    /// Clones `value` and appends the clone. A panic in `clone` leaves the
    /// buffer untouched.
    pub fn push_back_cloned(&mut self, value: &T)
    where
        T: Clone,
    {
        let value = value.clone();
        self.push_back(value);
    }

    /// Clones `value` and prepends the clone. A panic in `clone` leaves the
    /// buffer untouched.
    pub fn push_front_cloned(&mut self, value: &T)
    where
        T: Clone,
    {
        let value = value.clone();
        self.push_front(value);
    }

    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        let slot = self.physical(self.len);
        // SAFETY: the old tail slot was live and is no longer counted.
        Some(unsafe { self.slots.read(slot) })
    }

    pub fn pop_front(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let slot = self.head;
        self.head = self.physical(1);
        self.len -= 1;
        // SAFETY: the old head slot was live and is no longer counted.
        Some(unsafe { self.slots.read(slot) })
    }

    pub fn front(&self) -> Option<&T> {
        self.get(0)
    }

    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.get_mut(0)
    }

    pub fn back(&self) -> Option<&T> {
        self.len.checked_sub(1).and_then(|last| self.get(last))
    }

    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.len.checked_sub(1).and_then(move |last| self.get_mut(last))
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        // SAFETY: logical indices below `len` are live.
        Some(unsafe { self.slots.get(self.physical(index)) })
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index >= self.len {
            return None;
        }
        let slot = self.physical(index);
        // SAFETY: logical indices below `len` are live.
        Some(unsafe { self.slots.get_mut(slot) })
    }

    /// # Safety
    /// `index < self.len()`.
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        debug_assert!(index < self.len);
        unsafe { self.slots.get(self.physical(index)) }
    }

    /// # Safety
    /// `index < self.len()`.
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(index < self.len);
        let slot = self.physical(index);
        unsafe { self.slots.get_mut(slot) }
    }

    /// Swaps the elements at logical positions `i` and `j`.
    ///
    /// # Panics
    /// Panics if either index is out of bounds.
    pub fn swap_at(&mut self, i: usize, j: usize) {
        assert!(
            i < self.len && j < self.len,
            "swap indices ({i}, {j}) out of bounds for length {}",
            self.len
        );
        let (a, b) = (self.physical(i), self.physical(j));
        // SAFETY: both positions are live.
        unsafe { self.slots.swap(a, b) };
    }

    /// Exchanges the whole contents (block, head, length) with `other`.
    pub fn swap(&mut self, other: &mut RingBuffer<T>) {
        std::mem::swap(self, other);
    }

    /// Inserts `value` so that it ends up at logical position `index`,
    /// shifting the shorter side. Returns `index`.
    ///
    /// # Panics
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, value: T) -> usize {
        assert!(
            index <= self.len,
            "insertion index (is {index}) should be <= len (is {})",
            self.len
        );

        if index < self.len - index {
            self.push_front(value);
            for cur in 0..index {
                self.swap_at(cur, cur + 1);
            }
        } else {
            self.push_back(value);
            for cur in (index + 1..self.len).rev() {
                self.swap_at(cur, cur - 1);
            }
        }
        index
    }

    /// Removes and drops the element at `index`, shifting the shorter side.
    /// Returns `index`, now the position of the element that followed.
    ///
    /// # Panics
    /// Panics if `index >= len`.
    pub fn erase(&mut self, index: usize) -> usize {
        assert!(
            index < self.len,
            "removal index (is {index}) should be < len (is {})",
            self.len
        );
        drop(self.take(index));
        index
    }

    /// Removes and returns the element at `index`, or `None` when out of
    /// bounds.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        if index >= self.len {
            return None;
        }
        Some(self.take(index))
    }

    fn take(&mut self, index: usize) -> T {
        let value = if index < self.len - index {
            for cur in (1..=index).rev() {
                self.swap_at(cur - 1, cur);
            }
            self.pop_front()
        } else {
            for cur in index..self.len - 1 {
                self.swap_at(cur, cur + 1);
            }
            self.pop_back()
        };
        match value {
            Some(value) => value,
            None => unreachable!("take called on an empty ring buffer"),
        }
    }

    /// Removes and drops the elements in `range`. The shorter surrounding run
    /// is swapped over the erased span, then the span is popped from that
    /// end. Returns the start of the range.
    ///
    /// # Panics
    /// Panics if the range is decreasing or extends past `len`.
    pub fn erase_range<R: RangeBounds<usize>>(&mut self, range: R) -> usize {
        let first = match range.start_bound() {
            Bound::Included(&start) => start,
            Bound::Excluded(&start) => start
                .checked_add(1)
                .unwrap_or_else(|| panic!("range start overflows usize")),
            Bound::Unbounded => 0,
        };
        let last = match range.end_bound() {
            Bound::Included(&end) => end
                .checked_add(1)
                .unwrap_or_else(|| panic!("range end overflows usize")),
            Bound::Excluded(&end) => end,
            Bound::Unbounded => self.len,
        };
        assert!(first <= last, "range start {first} is past range end {last}");
        assert!(
            last <= self.len,
            "range end (is {last}) should be <= len (is {})",
            self.len
        );

        let count = last - first;
        if count == 0 {
            return first;
        }

        if first < self.len - last {
            for cur in (0..first).rev() {
                self.swap_at(cur, cur + count);
            }
            for _ in 0..count {
                drop(self.pop_front());
            }
        } else {
            for cur in last..self.len {
                self.swap_at(cur, cur - count);
            }
            for _ in 0..count {
                drop(self.pop_back());
            }
        }
        first
    }

    /// Drops every element. Capacity is kept.
    ///
    /// The buffer is emptied before any destructor runs, so a panicking
    /// destructor can leak the remaining elements but never drop one twice.
    pub fn clear(&mut self) {
        if self.len == 0 {
            return;
        }
        let (first, second) = self.runs();
        let head = self.head;
        self.len = 0;
        self.head = 0;
        // SAFETY: the runs were exactly the live slots, and they are no
        // longer counted by `len`.
        unsafe { self.slots.drop_runs(head, first, second) };
    }

    /// Drops elements from the back until at most `len` remain.
    pub fn truncate(&mut self, len: usize) {
        while self.len > len {
            drop(self.pop_back());
        }
    }

    /// The contents as two slices in logical order; the second one is
    /// non-empty only when the elements wrap around the end of the block.
    pub fn as_slices(&self) -> (&[T], &[T]) {
        let (first, second) = self.runs();
        if first == 0 {
            return (&[], &[]);
        }
        // SAFETY: the runs are exactly the live slots.
        unsafe { (self.slots.run(self.head, first), self.slots.run(0, second)) }
    }

    pub fn as_mut_slices(&mut self) -> (&mut [T], &mut [T]) {
        let (first, second) = self.runs();
        if first == 0 {
            return (&mut [], &mut []);
        }
        let head = self.head;
        // SAFETY: `head..head + first` is the live front run.
        let front: *mut [T] = unsafe { self.slots.run_mut(head, first) };
        // SAFETY: the runs are live and disjoint (`head >= second` whenever
        // the contents wrap).
        unsafe { (&mut *front, self.slots.run_mut(0, second)) }
    }

    /// Moves the contents into one contiguous run and returns it.
    ///
    /// Wrapped contents are relocated into a fresh block of the same
    /// capacity.
    pub fn make_contiguous(&mut self) -> &mut [T] {
        if self.runs().1 != 0 {
            let capacity = self.capacity();
            if let Err(err) = self.relocate(capacity) {
                err.raise();
            }
        }
        self.as_mut_slices().0
    }

    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.iter().any(|candidate| candidate == value)
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        let (front, back) = self.as_mut_slices();
        IterMut::new(front, back)
    }

    /// Cursor at logical position 0.
    pub fn begin(&self) -> Cursor<'_, T> {
        Cursor::new(self, 0)
    }

    /// Past-the-end cursor, at logical position `len`.
    pub fn end(&self) -> Cursor<'_, T> {
        Cursor::new(self, self.len as isize)
    }

    /// Cursor at any logical position. Indices beyond `isize::MAX` clamp to
    /// `isize::MAX`, which is always past the end.
    pub fn cursor_at(&self, index: usize) -> Cursor<'_, T> {
        Cursor::new(self, clamp_index(index))
    }

    /// Reverse cursor at the last element.
    pub fn rbegin(&self) -> RevCursor<'_, T> {
        RevCursor::new(self.end())
    }

    /// Reverse past-the-end cursor, one step before the first element.
    pub fn rend(&self) -> RevCursor<'_, T> {
        RevCursor::new(self.begin())
    }

    pub fn begin_mut(&mut self) -> CursorMut<'_, T> {
        CursorMut::new(self, 0)
    }

    pub fn end_mut(&mut self) -> CursorMut<'_, T> {
        let len = self.len as isize;
        CursorMut::new(self, len)
    }

    pub fn cursor_at_mut(&mut self, index: usize) -> CursorMut<'_, T> {
        CursorMut::new(self, clamp_index(index))
    }
}

fn clamp_index(index: usize) -> isize {
    isize::try_from(index).unwrap_or(isize::MAX)
}

impl<T> Drop for RingBuffer<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T> Default for RingBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for RingBuffer<T> {
    /// Deep copy in logical order. If an element's `clone` panics, the
    /// partial copy is dropped and `self` is untouched.
    fn clone(&self) -> Self {
        let mut copy = Self::with_capacity(self.len);
        for value in self.iter() {
            copy.push_back_cloned(value);
        }
        copy
    }

    /// Builds a full copy of `source` first, then swaps it in; the previous
    /// contents are dropped with the temporary.
    fn clone_from(&mut self, source: &Self) {
        let mut fresh = source.clone();
        self.swap(&mut fresh);
    }
}

impl<T> Index<usize> for RingBuffer<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(value) => value,
            None => panic!(
                "index out of bounds: the len is {} but the index is {index}",
                self.len
            ),
        }
    }
}

impl<T> IndexMut<usize> for RingBuffer<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len;
        match self.get_mut(index) {
            Some(value) => value,
            None => panic!("index out of bounds: the len is {len} but the index is {index}"),
        }
    }
}
