//! Equality engine: cycle-aware structural equality.
//!
//! Each top-level call owns a [`PairSet`]. A pair of composites is entered
//! before their contents are compared and exited afterwards. Meeting a pair
//! that is already being compared returns `true` ("equal so far"), which is
//! what terminates comparisons of cyclic graphs.
//!
//! Consequence of that rule: two cyclic structures are compared by what they
//! unfold to, not by how their references are wired, so differences that are
//! only reachable through an already-active pair are never inspected. This
//! trade-off is part of the contract; removing it would remove the termination
//! guarantee.

use tracing::trace;

use crate::identity::{IdentityPair, PairSet};
use crate::value::{Value, ValueList, ValueMap, ValueSet};
use crate::value_object::{ValueObject, object_key};

/// Structural equality of two values and everything they reference.
pub fn equals(a: &Value, b: &Value) -> bool {
    if std::ptr::eq(a, b) {
        return true;
    }
    let mut visited = PairSet::new();
    deep_equals(a, b, &mut visited)
}

/// Structural equality of two value objects.
pub fn object_equals(a: &dyn ValueObject, b: &dyn ValueObject) -> bool {
    let mut visited = PairSet::new();
    objects_equal(a, b, &mut visited)
}

/// Element-wise comparison, dispatched by category.
pub(crate) fn deep_equals(a: &Value, b: &Value, visited: &mut PairSet) -> bool {
    if std::ptr::eq(a, b) {
        return true;
    }
    match (a, b) {
        (Value::Object(x), Value::Object(y)) => objects_equal(x.as_ref(), y.as_ref(), visited),
        (Value::Bytes(x), Value::Bytes(y)) => x.ptr_eq(y) || x.as_slice() == y.as_slice(),
        (Value::List(x), Value::List(y)) => {
            let pair = IdentityPair::new(x.key(), y.key());
            guarded(pair, visited, |visited| lists_equal(x, y, visited))
        }
        (Value::Set(x), Value::Set(y)) => {
            let pair = IdentityPair::new(x.key(), y.key());
            guarded(pair, visited, |visited| sets_equal(x, y, visited))
        }
        (Value::Map(x), Value::Map(y)) => {
            let pair = IdentityPair::new(x.key(), y.key());
            guarded(pair, visited, |visited| maps_equal(x, y, visited))
        }
        (Value::Opaque(x), Value::Opaque(y)) => {
            std::ptr::addr_eq(std::sync::Arc::as_ptr(x), std::sync::Arc::as_ptr(y))
                || x.opaque_eq(y.as_ref())
        }
        (Value::Handle(x), Value::Handle(y)) => x.ptr_eq(y),
        _ => leaf_equals(a, b),
    }
}

fn objects_equal(a: &dyn ValueObject, b: &dyn ValueObject, visited: &mut PairSet) -> bool {
    let pair = IdentityPair::new(object_key(a), object_key(b));
    if pair.is_reflexive() {
        return true;
    }

    // Different kinds never compare equal, which also settles the case where
    // both objects have no identity values at all.
    if a.kind() != b.kind() {
        return false;
    }

    guarded(pair, visited, |visited| {
        let left = a.identity_values();
        let right = b.identity_values();
        left.len() == right.len()
            && left
                .iter()
                .zip(right.iter())
                .all(|(l, r)| deep_equals(l, r, visited))
    })
}

/// Runs `compare` with `pair` on the stack; a reference-identical or already
/// active pair is equal without looking further.
fn guarded(
    pair: IdentityPair,
    visited: &mut PairSet,
    compare: impl FnOnce(&mut PairSet) -> bool,
) -> bool {
    if pair.is_reflexive() {
        return true;
    }
    if !visited.enter(pair) {
        trace!(depth = visited.len(), "revisited pair; assuming equal");
        return true;
    }
    let equal = compare(visited);
    visited.exit(pair);
    equal
}

fn lists_equal(a: &ValueList, b: &ValueList, visited: &mut PairSet) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b.iter())
            .all(|(l, r)| deep_equals(l, r, visited))
}

/// Size check, then a matched search: every left member must pair off with a
/// distinct, not yet matched right member. Quadratic, but independent of
/// iteration order and of any hashing shortcut.
fn sets_equal(a: &ValueSet, b: &ValueSet, visited: &mut PairSet) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut matched = vec![false; b.len()];
    for left in a.iter() {
        let mut found = false;
        for (index, right) in b.iter().enumerate() {
            if !matched[index] && deep_equals(left, right, visited) {
                matched[index] = true;
                found = true;
                break;
            }
        }
        if !found {
            return false;
        }
    }
    true
}

/// Key presence uses the right-hand map's own key equality; values recurse
/// within this traversal.
fn maps_equal(a: &ValueMap, b: &ValueMap, visited: &mut PairSet) -> bool {
    a.len() == b.len()
        && a.iter().all(|(key, value)| match b.get(key) {
            Some(other) => deep_equals(value, other, visited),
            None => false,
        })
}

/// Leaves compare with their own equality. Mismatched variants (including
/// `Int` against `Float`) are unequal.
fn leaf_equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Int(x), Value::Int(y)) => x == y,
        (Value::Float(x), Value::Float(y)) => x == y,
        (Value::Text(x), Value::Text(y)) => x == y,
        (Value::Timestamp(x), Value::Timestamp(y)) => x == y,
        (Value::Duration(x), Value::Duration(y)) => x == y,
        (Value::Uuid(x), Value::Uuid(y)) => x == y,
        (Value::Symbol(x), Value::Symbol(y)) => x == y,
        _ => false,
    }
}
