use crate::ByteSet;

#[test]
fn insert_contains_remove() {
    let mut set = ByteSet::new();
    assert!(set.is_empty());

    set.insert(0);
    set.insert(63);
    set.insert(64);
    set.insert(255);
    assert_eq!(set.len(), 4);
    assert!(set.contains(63));
    assert!(set.contains(64));
    assert!(!set.contains(65));

    set.remove(63);
    assert!(!set.contains(63));
    assert_eq!(set.iter().collect::<Vec<_>>(), vec![0, 64, 255]);
}

#[test]
fn runs_split_on_gaps() {
    let set: ByteSet = [1, 2, 3, 7, 9, 10, 255].into_iter().collect();
    assert_eq!(set.runs(), vec![(1, 3), (7, 7), (9, 10), (255, 255)]);
}

#[test]
fn full_range_is_one_run() {
    let set = ByteSet::range(0, 255);
    assert_eq!(set.len(), 256);
    assert_eq!(set.runs(), vec![(0, 255)]);
}

#[test]
fn set_algebra() {
    let a = ByteSet::range(b'a', b'f');
    let b = ByteSet::range(b'd', b'z');

    assert_eq!(a.intersection(&b), ByteSet::range(b'd', b'f'));
    assert_eq!(a.difference(&b), ByteSet::range(b'a', b'c'));
    assert_eq!(a.union(&b), ByteSet::range(b'a', b'z'));
    assert!(a.intersection(&ByteSet::range(b'x', b'z')).is_empty());
}

#[test]
fn key_round_trip() {
    let set: ByteSet = b"ab\n".iter().copied().collect();
    insta::assert_snapshot!(set.key(), @"[10,97,98]");
    assert_eq!(ByteSet::from_key(&set.key()), Some(set));
    assert_eq!(ByteSet::from_key("not json"), None);
    assert_eq!(ByteSet::new().key(), "[]");
}

#[test]
fn display_is_compact() {
    let set: ByteSet = ByteSet::range(b'a', b'z')
        .union(&ByteSet::range(b'0', b'1'))
        .union(&ByteSet::single(b'\n'))
        .union(&ByteSet::single(b'-'));
    insta::assert_snapshot!(set.to_string(), @r"\x0a\-01a-z");
}
