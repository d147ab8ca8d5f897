//! Deep freeze
//!
//! Transitively marks a value graph as immutable.
//!
//! - Scalars (including `Null`) pass through untouched
//! - Composites are visited once, keyed by identity, so cycles terminate
//! - Children are frozen before their parent
//! - Freezing is idempotent and returns a handle to the same node

use std::collections::HashSet;
use tracing::trace;

use super::types::Value;

/// Freezes `value` and everything reachable from it.
pub fn deep_freeze(value: &Value) -> Value {
    let mut seen = HashSet::new();
    let marked = deep_freeze_with(value, &mut seen);
    if marked > 0 {
        trace!(marked, "deep freeze complete");
    }
    value.clone()
}

/// Freezes `value` using a caller-supplied visited set of composite
/// identities. Composites already in `seen` are skipped.
///
/// Returns the number of composites marked by this call.
pub fn deep_freeze_with(value: &Value, seen: &mut HashSet<usize>) -> usize {
    match value {
        Value::List(list) => {
            if list.is_frozen() || !seen.insert(list.id()) {
                return 0;
            }
            let marked: usize = list
                .to_vec()
                .iter()
                .map(|item| deep_freeze_with(item, seen))
                .sum();
            list.mark_frozen();
            marked + 1
        }
        Value::Map(map) => {
            if map.is_frozen() || !seen.insert(map.id()) {
                return 0;
            }
            let marked: usize = map
                .values()
                .iter()
                .map(|item| deep_freeze_with(item, seen))
                .sum();
            map.mark_frozen();
            marked + 1
        }
        _ => 0,
    }
}

/// Returns true if every composite reachable from `value` is frozen.
/// Scalars are trivially frozen.
pub fn is_deep_frozen(value: &Value) -> bool {
    check_frozen(value, &mut HashSet::new())
}

fn check_frozen(value: &Value, seen: &mut HashSet<usize>) -> bool {
    match value {
        Value::List(list) => {
            if !seen.insert(list.id()) {
                return true;
            }
            list.is_frozen() && list.to_vec().iter().all(|item| check_frozen(item, seen))
        }
        Value::Map(map) => {
            if !seen.insert(map.id()) {
                return true;
            }
            map.is_frozen() && map.values().iter().all(|item| check_frozen(item, seen))
        }
        _ => true,
    }
}
