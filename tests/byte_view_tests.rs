//! `ByteView` immutability and equality scenarios.

use distcache::ByteView;

#[test]
fn mutating_a_returned_vec_does_not_affect_the_view() {
    let view = ByteView::copy_from(b"stable");
    let mut copy = view.to_vec();
    copy.clear();
    copy.extend_from_slice(b"mutated!");

    assert_eq!(view.to_vec(), b"stable".to_vec());
    assert_eq!(view.as_slice(), b"stable");
}

#[test]
fn equal_views_built_different_ways_compare_equal() {
    let from_copy = ByteView::copy_from(b"payload");
    let from_vec = ByteView::from_vec(b"payload".to_vec());
    let from_str: ByteView = "payload".into();

    assert_eq!(from_copy, from_vec);
    assert_eq!(from_vec, from_str);
}

#[test]
fn cloning_shares_storage_but_not_mutability() {
    let original = ByteView::copy_from(b"shared");
    let clone = original.clone();
    assert_eq!(original, clone);

    let mut owned = clone.to_vec();
    owned[0] = b'X';
    assert_eq!(original.as_slice(), b"shared");
}

#[test]
fn non_utf8_bytes_report_no_lossy_string() {
    let view = ByteView::copy_from(&[0xff, 0xfe, 0x00, 0xff]);
    assert_eq!(view.to_string_lossy(), None);
}
