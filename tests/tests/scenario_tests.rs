use ring_buffer::RingBuffer;
use ring_buffer_tests::init_tracing;

#[test]
fn test_push_erase_insert_walkthrough() {
    init_tracing();

    let mut buf = RingBuffer::new();
    buf.push_back(1);
    buf.push_back(2);
    buf.push_front(0);
    assert_eq!(buf, [0, 1, 2]);
    assert_eq!(buf.len(), 3);

    let pos = (buf.begin() + 1).position().unwrap();
    buf.erase(pos);
    assert_eq!(buf, [0, 2]);
    assert_eq!(buf.len(), 2);

    let pos = buf.begin().position().unwrap();
    buf.insert(pos, 9);
    assert_eq!(buf, [9, 0, 2]);
}

#[test]
fn test_twenty_pushes_grow_along_documented_sequence() {
    init_tracing();

    let mut buf = RingBuffer::new();
    let mut growth_events = Vec::new();
    for i in 0..20 {
        let before = buf.capacity();
        buf.push_back(i);
        if buf.capacity() != before {
            growth_events.push((before, buf.capacity()));
        }
    }

    assert!(growth_events.len() >= 4);
    assert_eq!(growth_events, vec![(0, 2), (2, 5), (5, 11), (11, 23)]);
    for (from, to) in &growth_events[1..] {
        // With `slots = capacity + 1`: next capacity = 2 * (slots - 1) + 1.
        assert_eq!(*to, 2 * from + 1);
    }
    assert_eq!(buf, (0..20).collect::<Vec<_>>());
}

#[test]
fn test_ring_arithmetic_after_many_rotations() {
    let mut buf: RingBuffer<u32> = RingBuffer::with_capacity(7);
    let mut expected = std::collections::VecDeque::new();

    for step in 0..500u32 {
        match step % 5 {
            0 | 1 => {
                buf.push_back(step);
                expected.push_back(step);
            }
            2 => {
                buf.push_front(step);
                expected.push_front(step);
            }
            _ => {
                assert_eq!(buf.pop_front(), expected.pop_front());
            }
        }
        for (i, value) in expected.iter().enumerate() {
            assert_eq!(buf[i], *value, "mismatch at logical index {i} after step {step}");
        }
    }
}

#[test]
fn test_capacity_never_decreases() {
    let mut buf = RingBuffer::new();
    let mut last = buf.capacity();
    for step in 0..300usize {
        if step % 7 < 4 {
            buf.push_back(step);
        } else if step % 7 == 4 {
            buf.pop_front();
        } else if !buf.is_empty() {
            buf.erase(buf.len() / 2);
        }
        if step % 50 == 0 {
            buf.reserve(step / 2);
            buf.clear();
        }
        assert!(buf.capacity() >= last);
        last = buf.capacity();
    }
}

#[test]
fn test_reserve_exact_capacity_is_noop() {
    let mut buf: RingBuffer<String> = RingBuffer::with_capacity(4);
    buf.push_back("a".to_string());
    let before = buf.as_slices().0.as_ptr();
    buf.reserve(buf.capacity());
    assert_eq!(buf.as_slices().0.as_ptr(), before);
    assert_eq!(buf.capacity(), 4);
}
