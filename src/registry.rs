//! Process-wide registry of named groups.
//!
//! Groups are created once and live for the process's lifetime; there is no
//! API to remove one. Reads (`get_group`) take the registry's shared lock;
//! writes (`new_group`) take the exclusive side — a deliberate improvement
//! over locking every lookup exclusively.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

use crate::config::GroupConfig;
use crate::error::{Error, Result};
use crate::group::{Getter, Group};

fn registry() -> &'static RwLock<HashMap<String, Arc<Group>>> {
    static REGISTRY: OnceLock<RwLock<HashMap<String, Arc<Group>>>> = OnceLock::new();
    REGISTRY.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Creates and registers a new group named `name`, backed by `getter`.
///
/// Fails with [`Error::GroupAlreadyRegistered`] if `name` is already taken.
/// The returned `Arc<Group>` is also retrievable later via [`get_group`].
pub fn new_group(name: &str, cache_bytes: u64, getter: Arc<dyn Getter>) -> Result<Arc<Group>> {
    new_group_with_config(
        name,
        GroupConfig {
            cache_bytes,
            ..GroupConfig::default()
        },
        getter,
    )
}

/// Like [`new_group`], with full control over the group's [`GroupConfig`].
pub fn new_group_with_config(name: &str, config: GroupConfig, getter: Arc<dyn Getter>) -> Result<Arc<Group>> {
    let mut groups = registry().write();
    if groups.contains_key(name) {
        return Err(Error::GroupAlreadyRegistered {
            name: name.to_string(),
        });
    }
    let group = Group::new_detached(name, config, getter);
    groups.insert(name.to_string(), Arc::clone(&group));
    Ok(group)
}

/// Looks up a previously registered group by name.
pub fn get_group(name: &str) -> Option<Arc<Group>> {
    registry().read().get(name).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::GetterFn;

    fn noop_getter() -> Arc<dyn Getter> {
        Arc::new(GetterFn(|key: &str| Ok(key.as_bytes().to_vec())))
    }

    #[test]
    fn a_registered_group_is_retrievable_by_name() {
        let name = "registry-roundtrip";
        let group = new_group(name, 0, noop_getter()).unwrap();
        assert_eq!(group.name(), name);
        assert!(Arc::ptr_eq(&group, &get_group(name).unwrap()));
    }

    #[test]
    fn re_registering_the_same_name_is_rejected() {
        let name = "registry-duplicate";
        new_group(name, 0, noop_getter()).unwrap();
        let err = new_group(name, 0, noop_getter()).unwrap_err();
        assert!(matches!(err, Error::GroupAlreadyRegistered { .. }));
    }

    #[test]
    fn an_unknown_name_is_absent() {
        assert!(get_group("registry-never-registered").is_none());
    }
}
