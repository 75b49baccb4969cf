//! Process-wide registry behavior.
//!
//! The registry is global, so each test uses a unique group name to avoid
//! cross-test interference (see the crate's design notes on test isolation).

use std::sync::Arc;

use distcache::{get_group, new_group, Error, GetterFn};

fn noop_getter() -> Arc<dyn distcache::Getter> {
    Arc::new(GetterFn(|key: &str| Ok(key.as_bytes().to_vec())))
}

#[test]
fn a_registered_group_is_retrievable_by_name() {
    let group = new_group("registry-tests-roundtrip", 0, noop_getter()).unwrap();
    let looked_up = get_group("registry-tests-roundtrip").unwrap();
    assert!(Arc::ptr_eq(&group, &looked_up));
}

#[test]
fn registering_the_same_name_twice_is_rejected() {
    new_group("registry-tests-duplicate", 0, noop_getter()).unwrap();
    let err = new_group("registry-tests-duplicate", 0, noop_getter()).unwrap_err();
    assert!(matches!(err, Error::GroupAlreadyRegistered { name } if name == "registry-tests-duplicate"));
}

#[test]
fn an_unregistered_name_is_not_found() {
    assert!(get_group("registry-tests-never-registered").is_none());
}
