pub(crate) mod raw_slots;

pub(crate) use raw_slots::RawSlots;
