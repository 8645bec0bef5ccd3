use ring_buffer::RingBuffer;
use ring_buffer_tests::{ledger, tracked, values, wrapped_tracked, Tracked};

fn assert_balanced() {
    let ledger = ledger::snapshot();
    assert_eq!(
        ledger.constructed, ledger.dropped,
        "constructed {} but dropped {}",
        ledger.constructed, ledger.dropped
    );
}

#[test]
fn test_mixed_operations_balance() {
    ledger::reset();
    {
        let mut buf = RingBuffer::new();
        for i in 0..40 {
            if i % 3 == 0 {
                buf.push_front(Tracked::new(i));
            } else {
                buf.push_back(Tracked::new(i));
            }
        }
        buf.pop_back();
        buf.pop_front();
        buf.insert(5, Tracked::new(100));
        buf.insert(buf.len() - 3, Tracked::new(101));
        buf.erase(2);
        buf.erase(buf.len() - 2);
        buf.erase_range(4..9);
        buf.erase_range(buf.len() - 6..buf.len() - 1);
        buf.truncate(10);
        buf.reserve(200);

        let copy = buf.clone();
        let mut other = tracked(0..3);
        other.clone_from(&copy);
        buf.swap(&mut other);
        assert_eq!(ledger::snapshot().live(), buf.len() + other.len() + copy.len());
    }
    assert_balanced();
}

#[test]
fn test_partially_consumed_into_iter_drops_the_rest() {
    ledger::reset();
    {
        let mut iter = wrapped_tracked(&[1, 2, 3, 4, 5, 6], 2).into_iter();
        let first = iter.next().unwrap();
        let last = iter.next_back().unwrap();
        assert_eq!((first.value(), last.value()), (1, 6));
    }
    assert_balanced();
}

#[test]
fn test_cursor_mut_edits_balance() {
    ledger::reset();
    {
        let mut buf = wrapped_tracked(&[1, 2, 3, 4, 5], 1);
        {
            let mut cursor = buf.cursor_at_mut(2);
            cursor.insert(Tracked::new(30));
            cursor.move_next();
            let removed = cursor.remove_current();
            assert_eq!(removed.map(|t| t.value()), Some(3));
            cursor.buffer_mut().push_front(Tracked::new(0));
        }
        assert_eq!(values(&buf), vec![0, 1, 2, 30, 4, 5]);
    }
    assert_balanced();
}

#[test]
fn test_clear_then_reuse_balances() {
    ledger::reset();
    let mut buf = wrapped_tracked(&[1, 2, 3, 4], 4);
    let capacity = buf.capacity();
    buf.clear();
    assert_eq!(ledger::snapshot().live(), 0);
    assert_eq!(buf.capacity(), capacity);

    buf.extend((0..20).map(Tracked::new));
    drop(buf);
    assert_balanced();
}

#[test]
fn test_into_vec_moves_without_drops() {
    ledger::reset();
    let buf = wrapped_tracked(&[7, 8, 9], 3);
    let dropped = ledger::snapshot().dropped;
    let moved: Vec<Tracked> = buf.into();
    assert_eq!(ledger::snapshot().dropped, dropped);
    assert_eq!(moved.iter().map(Tracked::value).collect::<Vec<_>>(), vec![7, 8, 9]);
    drop(moved);
    assert_balanced();
}
