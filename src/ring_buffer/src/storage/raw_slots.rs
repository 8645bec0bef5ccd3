/* Raw arena of element slots addressed by physical position.

`RawSlots<T>` owns one allocation of `slot_count` slots of `T` and nothing
else: it never knows which slots hold live values, so it never drops
elements. Its owner tracks liveness and is responsible for every `write`
being matched by exactly one `read` or `drop_runs`.

Zero-sized `T` never allocates; the slot count is still tracked so the
owner's circular arithmetic is unchanged.
*/

use std::alloc::{self, Layout};
use std::marker::PhantomData;
use std::ptr::{self, NonNull};
use std::slice;

use crate::error::TryReserveError;

pub(crate) struct RawSlots<T> {
    ptr: NonNull<T>,
    slot_count: usize,
    _owns: PhantomData<T>,
}

// SAFETY: `RawSlots` uniquely owns its block, like `Box<[MaybeUninit<T>]>`.
unsafe impl<T: Send> Send for RawSlots<T> {}
unsafe impl<T: Sync> Sync for RawSlots<T> {}

impl<T> RawSlots<T> {
    pub(crate) const fn empty() -> Self {
        Self {
            ptr: NonNull::dangling(),
            slot_count: 0,
            _owns: PhantomData,
        }
    }

    /// Allocates `slot_count` uninitialized slots.
    pub(crate) fn allocate(slot_count: usize) -> Result<Self, TryReserveError> {
        if slot_count == 0 {
            return Ok(Self::empty());
        }

        let layout =
            Layout::array::<T>(slot_count).map_err(|_| TryReserveError::CapacityOverflow)?;
        if layout.size() == 0 {
            return Ok(Self {
                ptr: NonNull::dangling(),
                slot_count,
                _owns: PhantomData,
            });
        }

        // SAFETY: `layout` has a non-zero size.
        let raw = unsafe { alloc::alloc(layout) };
        let ptr = NonNull::new(raw.cast::<T>()).ok_or(TryReserveError::AllocError { layout })?;

        Ok(Self {
            ptr,
            slot_count,
            _owns: PhantomData,
        })
    }

    #[inline]
    pub(crate) fn slot_count(&self) -> usize {
        self.slot_count
    }

    #[inline]
    fn slot_ptr(&self, physical: usize) -> *mut T {
        debug_assert!(physical < self.slot_count, "physical slot {physical} out of range");
        // SAFETY: `physical` is inside the allocation (or `T` is zero-sized).
        unsafe { self.ptr.as_ptr().add(physical) }
    }

    /// Constructs a value in a vacant slot.
    ///
    /// # Safety
    /// `physical < slot_count` and the slot holds no live value.
    #[inline]
    pub(crate) unsafe fn write(&mut self, physical: usize, value: T) {
        unsafe { ptr::write(self.slot_ptr(physical), value) }
    }

    /// Moves the value out, leaving the slot vacant.
    ///
    /// # Safety
    /// `physical < slot_count` and the slot holds a live value.
    #[inline]
    pub(crate) unsafe fn read(&mut self, physical: usize) -> T {
        unsafe { ptr::read(self.slot_ptr(physical)) }
    }

    /// # Safety
    /// `physical < slot_count` and the slot holds a live value.
    #[inline]
    pub(crate) unsafe fn get(&self, physical: usize) -> &T {
        unsafe { &*self.slot_ptr(physical) }
    }

    /// # Safety
    /// `physical < slot_count` and the slot holds a live value.
    #[inline]
    pub(crate) unsafe fn get_mut(&mut self, physical: usize) -> &mut T {
        unsafe { &mut *self.slot_ptr(physical) }
    }

    /// Exchanges two live slots. `a == b` is allowed.
    ///
    /// # Safety
    /// Both slots are in range and hold live values.
    #[inline]
    pub(crate) unsafe fn swap(&mut self, a: usize, b: usize) {
        unsafe { ptr::swap(self.slot_ptr(a), self.slot_ptr(b)) }
    }

    /// Views `len` contiguous live slots starting at `start`.
    ///
    /// # Safety
    /// Every slot in `start..start + len` is in range and live.
    #[inline]
    pub(crate) unsafe fn run(&self, start: usize, len: usize) -> &[T] {
        if len == 0 {
            return &[];
        }
        unsafe { slice::from_raw_parts(self.slot_ptr(start), len) }
    }

    /// # Safety
    /// Every slot in `start..start + len` is in range and live.
    #[inline]
    pub(crate) unsafe fn run_mut(&mut self, start: usize, len: usize) -> &mut [T] {
        if len == 0 {
            return &mut [];
        }
        unsafe { slice::from_raw_parts_mut(self.slot_ptr(start), len) }
    }

    /// Bitwise-moves `len` live values starting at `start` into `dest`,
    /// starting at `dest_start`. The source slots become vacant.
    ///
    /// # Safety
    /// The source run is live, the destination run is vacant, and both are in
    /// range of their respective blocks.
    pub(crate) unsafe fn move_run(
        &mut self,
        start: usize,
        dest: &mut RawSlots<T>,
        dest_start: usize,
        len: usize,
    ) {
        if len == 0 {
            return;
        }
        unsafe { ptr::copy_nonoverlapping(self.slot_ptr(start), dest.slot_ptr(dest_start), len) }
    }

    /// Drops the live runs `start..start + first` and `0..second`.
    ///
    /// The second run is still dropped if a destructor in the first one
    /// panics.
    ///
    /// # Safety
    /// Both runs are live and in range; after the call their slots are vacant.
    pub(crate) unsafe fn drop_runs(&mut self, start: usize, first: usize, second: usize) {
        struct DropRun<T>(*mut [T]);

        impl<T> Drop for DropRun<T> {
            fn drop(&mut self) {
                // SAFETY: forwarded from `drop_runs`.
                unsafe { ptr::drop_in_place(self.0) }
            }
        }

        let front: *mut [T] = unsafe { self.run_mut(start, first) };
        let back: *mut [T] = unsafe { self.run_mut(0, second) };
        let _back = DropRun(back);
        unsafe { ptr::drop_in_place(front) }
    }
}

impl<T> Drop for RawSlots<T> {
    fn drop(&mut self) {
        if self.slot_count == 0 {
            return;
        }
        let Ok(layout) = Layout::array::<T>(self.slot_count) else {
            return;
        };
        if layout.size() != 0 {
            // SAFETY: allocated in `allocate` with this exact layout.
            unsafe { alloc::dealloc(self.ptr.as_ptr().cast::<u8>(), layout) }
        }
    }
}
