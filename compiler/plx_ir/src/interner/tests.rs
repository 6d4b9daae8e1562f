use super::*;

#[test]
fn test_intern_is_stable() {
    let interner = StringInterner::new();
    let a = interner.intern("Foo::Bar");
    let b = interner.intern("Foo::Bar");
    assert_eq!(a, b);
    assert_eq!(interner.lookup(a), "Foo::Bar");
}

#[test]
fn test_empty_is_preinterned() {
    let interner = StringInterner::new();
    assert_eq!(interner.intern(""), Name::EMPTY);
    assert!(!interner.is_empty());
}

#[test]
fn test_distinct_strings_get_distinct_names() {
    let interner = StringInterner::new();
    let before = interner.len();
    let x = interner.intern("zebra_xyz");
    let y = interner.intern("zebra_xyw");
    assert_ne!(x, y);
    assert_eq!(interner.len(), before + 2);
}

#[test]
fn test_shared_interner_clones_share_table() {
    let shared = SharedInterner::new();
    let other = shared.clone();
    let n = shared.intern("shared_name");
    assert_eq!(other.intern("shared_name"), n);
    assert_eq!(StringLookup::lookup(&other, n), "shared_name");
}

#[test]
fn test_concurrent_interning() {
    let shared = SharedInterner::new();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let interner = shared.clone();
            std::thread::spawn(move || interner.intern("threaded"))
        })
        .collect();
    let names: Vec<Name> = handles
        .into_iter()
        .map(|h| h.join().unwrap_or_default())
        .collect();
    assert!(names.windows(2).all(|w| w[0] == w[1]));
    assert_ne!(names[0], Name::EMPTY);
}

#[test]
fn test_get_does_not_insert() {
    let interner = StringInterner::new();
    let before = interner.len();
    assert_eq!(interner.get("never_seen"), None);
    assert_eq!(interner.len(), before);
    let n = interner.intern("never_seen");
    assert_eq!(interner.get("never_seen"), Some(n));
    assert_eq!(interner.get("join"), Some(interner.intern("join")));
}
