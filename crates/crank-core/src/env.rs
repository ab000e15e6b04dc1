use indexmap::IndexMap;
use std::collections::HashMap;
use std::ffi::OsString;

/// Ordered environment bindings, as written in the manifest.
pub type EnvMap = IndexMap<String, String>;

/// Compute the variables crank sets explicitly for one recipe invocation.
///
/// Global bindings are defaults: a value already present in `inherited`
/// (the calling shell) wins. Recipe-local bindings always win, and apply to
/// that invocation only. Variables not named by the manifest are not
/// returned; the child inherits them untouched.
///
/// A shell value that is not valid UTF-8 still counts as set. It is left out
/// of the result so the child inherits the raw bytes from crank.
pub fn resolve_env(
    global: &EnvMap,
    local: &EnvMap,
    inherited: &HashMap<String, OsString>,
) -> EnvMap {
    let mut resolved = EnvMap::new();
    for (name, default) in global {
        match inherited.get(name) {
            Some(value) => {
                if let Some(value) = value.to_str() {
                    resolved.insert(name.clone(), value.to_string());
                }
            }
            None => {
                resolved.insert(name.clone(), default.clone());
            }
        }
    }
    for (name, value) in local {
        resolved.insert(name.clone(), value.clone());
    }
    resolved
}
