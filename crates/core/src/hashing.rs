//! Hashing engine: a digest consistent with [`equality`](crate::equality).
//!
//! Values are folded with a Jenkins-style one-at-a-time combiner kept within 29
//! bits. Hashes are stable within a process but are not meant to be persisted
//! or compared across processes.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use tracing::{debug, trace};

use crate::identity::{IdentitySet, RefKey};
use crate::value::{Value, ValueList, ValueMap, ValueSet};
use crate::value_object::{ValueObject, object_key};

/// Every hash produced by the engine fits in this mask.
pub const HASH_MASK: u32 = 0x1fff_ffff;

/// Byte buffers longer than this are hashed by sampling.
pub const SAMPLED_HASH_THRESHOLD: usize = 1024;

/// Upper bound on the interior bytes read when sampling a large buffer.
pub const SAMPLE_BUDGET: usize = 256;

const LIST_SEED: u32 = 0x0b5e_55ed;
const SET_SEED: u32 = 0x05e7_5e75;
const MAP_SEED: u32 = 0x0ea9_ab1e;

/// Hash of a value and everything it references.
pub fn hash_code(value: &Value) -> u32 {
    let mut visited = IdentitySet::new();
    hash_value(value, &mut visited)
}

/// Hash of a value object.
pub fn object_hash(object: &dyn ValueObject) -> u32 {
    let mut visited = IdentitySet::new();
    hash_object(object, &mut visited)
}

/// Folds `value` into `hash`.
pub fn combine(hash: u32, value: u32) -> u32 {
    let mut hash = HASH_MASK & hash.wrapping_add(value);
    hash = HASH_MASK & hash.wrapping_add((0x0007_ffff & hash) << 10);
    hash ^ (hash >> 6)
}

/// Final avalanche step applied once all values are folded in.
pub fn finish(hash: u32) -> u32 {
    let mut hash = HASH_MASK & hash.wrapping_add((0x03ff_ffff & hash) << 3);
    hash ^= hash >> 11;
    HASH_MASK & hash.wrapping_add((0x0000_3fff & hash) << 15)
}

/// Native `Hash` of `value`, folded into the engine's range.
pub fn native_hash<T: Hash + ?Sized>(value: &T) -> u32 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    fold(hasher.finish())
}

fn fold(hash: u64) -> u32 {
    ((hash ^ (hash >> 32)) as u32) & HASH_MASK
}

pub(crate) fn hash_value(value: &Value, visited: &mut IdentitySet) -> u32 {
    match value {
        Value::Object(object) => hash_object(object.as_ref(), visited),
        Value::Bytes(bytes) => hash_bytes(bytes.as_slice()),
        Value::List(list) => guarded(list.key(), visited, |visited| hash_list(list, visited)),
        Value::Set(set) => guarded(set.key(), visited, |visited| hash_set(set, visited)),
        Value::Map(map) => guarded(map.key(), visited, |visited| hash_entries(map, visited)),
        Value::Opaque(opaque) => fold(opaque.opaque_hash()),
        // Never call into a foreign type's own hash; it may not terminate.
        Value::Handle(handle) => native_hash(&handle.addr()),
        Value::Null => native_hash(&()),
        Value::Bool(b) => native_hash(b),
        Value::Int(n) => native_hash(n),
        Value::Float(f) => native_hash(&float_bits(*f)),
        Value::Text(text) => native_hash(&**text),
        Value::Timestamp(ts) => native_hash(ts),
        Value::Duration(d) => native_hash(d),
        Value::Uuid(id) => native_hash(id),
        Value::Symbol(symbol) => native_hash(symbol),
    }
}

/// `0.0 == -0.0`, so both must hash alike.
fn float_bits(f: f64) -> u64 {
    if f == 0.0 { 0.0f64.to_bits() } else { f.to_bits() }
}

/// Seeds with the declared kind (its type identity, matching `Kind: Eq`), then
/// folds identity values in order.
fn hash_object(object: &dyn ValueObject, visited: &mut IdentitySet) -> u32 {
    let key = object_key(object);
    if !visited.enter(key) {
        trace!(kind = object.kind().name(), "revisited object; contributes zero");
        return 0;
    }
    let seed = native_hash(&object.kind());
    let folded = object
        .identity_values()
        .iter()
        .fold(seed, |hash, value| combine(hash, hash_value(value, visited)));
    visited.exit(key);
    finish(folded)
}

fn guarded(key: RefKey, visited: &mut IdentitySet, hash: impl FnOnce(&mut IdentitySet) -> u32) -> u32 {
    if !visited.enter(key) {
        trace!(depth = visited.len(), "revisited container; contributes zero");
        return 0;
    }
    let result = hash(visited);
    visited.exit(key);
    result
}

fn hash_list(list: &ValueList, visited: &mut IdentitySet) -> u32 {
    list.iter()
        .fold(LIST_SEED, |hash, item| combine(hash, hash_value(item, visited)))
}

/// XOR keeps the result independent of member order.
fn hash_set(set: &ValueSet, visited: &mut IdentitySet) -> u32 {
    let members = set
        .iter()
        .fold(0, |acc, member| acc ^ hash_value(member, visited));
    combine(SET_SEED, members)
}

fn hash_entries(map: &ValueMap, visited: &mut IdentitySet) -> u32 {
    let entries = map.iter().fold(0, |acc, (key, value)| {
        let key_hash = hash_value(key, visited);
        acc ^ combine(key_hash, hash_value(value, visited))
    });
    combine(MAP_SEED, entries)
}

/// Hashes every byte of small buffers. Buffers above
/// [`SAMPLED_HASH_THRESHOLD`] are sampled at a stride (first byte included)
/// together with the last byte and the length.
///
/// Sampling trades precision for bounded cost: two large buffers that differ
/// only in unsampled bytes collide. That stays consistent with equality, which
/// is always byte-exact, but the hash discriminates less than a full one.
fn hash_bytes(bytes: &[u8]) -> u32 {
    if bytes.len() <= SAMPLED_HASH_THRESHOLD {
        return native_hash(bytes);
    }
    let stride = bytes.len().div_ceil(SAMPLE_BUDGET);
    debug!(len = bytes.len(), stride, "hashing large byte buffer by sampling");

    let mut hasher = DefaultHasher::new();
    hasher.write_usize(bytes.len());
    for byte in bytes.iter().step_by(stride) {
        hasher.write_u8(*byte);
    }
    if let Some(last) = bytes.last() {
        hasher.write_u8(*last);
    }
    fold(hasher.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Tagged(&'static str, i64);

    impl ValueObject for Tagged {
        fn identity_values(&self) -> Vec<Value> {
            vec![Value::from(self.0), Value::from(self.1)]
        }
    }

    #[test]
    fn combine_matches_reference_values() {
        assert_eq!(combine(0, 1), 1041);
        assert_eq!(combine(0, 0), 0);
        assert_eq!(finish(0), 0);
    }

    #[test]
    fn results_stay_within_mask() {
        for (h, v) in [(u32::MAX, u32::MAX), (HASH_MASK, HASH_MASK), (12345, 0xdead_beef)] {
            assert!(combine(h, v) <= HASH_MASK);
            assert!(finish(h) <= HASH_MASK);
        }
    }

    #[test]
    fn combine_is_position_sensitive() {
        let forward = combine(combine(7, 1), 2);
        let backward = combine(combine(7, 2), 1);
        assert_ne!(forward, backward);
    }

    #[test]
    fn zero_signs_hash_alike() {
        assert_eq!(hash_code(&Value::from(0.0)), hash_code(&Value::from(-0.0)));
    }

    #[test]
    fn set_hash_ignores_order_list_hash_does_not() {
        let items = [Value::from(1), Value::from("b"), Value::from(true)];
        let reversed: Vec<Value> = items.iter().rev().cloned().collect();

        assert_eq!(
            hash_code(&Value::set(items.clone())),
            hash_code(&Value::set(reversed.clone()))
        );
        assert_ne!(
            hash_code(&Value::list(items)),
            hash_code(&Value::list(reversed))
        );
    }

    #[test]
    fn object_hash_depends_on_kind_and_values() {
        let a = object_hash(&Tagged("x", 1));
        assert_eq!(a, object_hash(&Tagged("x", 1)));
        assert_ne!(a, object_hash(&Tagged("x", 2)));
    }

    /// Same type, display name chosen per instance.
    struct Labelled(bool);

    impl ValueObject for Labelled {
        fn identity_values(&self) -> Vec<Value> {
            Vec::new()
        }

        fn kind(&self) -> crate::value_object::Kind {
            let kind = crate::value_object::Kind::of::<Self>();
            if self.0 { kind.named("Alpha") } else { kind.named("Beta") }
        }
    }

    #[test]
    fn renamed_kinds_hash_like_they_compare() {
        let alpha = Labelled(true);
        let beta = Labelled(false);
        assert!(crate::equality::object_equals(&alpha, &beta));
        assert_eq!(object_hash(&alpha), object_hash(&beta));
    }

    #[test]
    fn small_buffers_hash_every_byte() {
        let a = Value::bytes(vec![1u8, 2, 3, 4, 5]);
        let b = Value::bytes(vec![1u8, 2, 3, 4, 6]);
        assert_ne!(hash_code(&a), hash_code(&b));
    }

    #[test]
    fn large_buffers_are_sampled() {
        let len = 4096;
        let stride = len / SAMPLE_BUDGET;
        let base = vec![0u8; len];

        let mut unsampled = base.clone();
        unsampled[1] = 0xff;
        let mut sampled = base.clone();
        sampled[stride] = 0xff;
        let mut last = base.clone();
        last[len - 1] = 0xff;

        let base_hash = hash_bytes(&base);
        assert_eq!(base_hash, hash_bytes(&unsampled));
        assert_ne!(base_hash, hash_bytes(&sampled));
        assert_ne!(base_hash, hash_bytes(&last));
    }

    #[test]
    fn handles_hash_by_reference() {
        let handle = Value::handle(vec![1u8]);
        assert_eq!(hash_code(&handle), hash_code(&handle.clone()));
    }
}
