//! Reference identities and the per-call visited trackers used to break cycles.
//!
//! Every top-level traversal owns a fresh tracker. Composites are entered before
//! their children are visited and exited afterwards, so the tracker only ever
//! holds the composites currently on the call stack. Siblings that share a
//! reference are therefore both traversed in full; only a genuine revisit of an
//! ancestor is short-circuited.

use std::any::TypeId;
use std::collections::HashSet;

/// Reference identity of a shared value: the address of its allocation plus
/// the type stored there.
///
/// The type component keeps zero-sized values of different types (which may
/// share an address) from aliasing each other.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct RefKey {
    addr: usize,
    type_id: TypeId,
}

impl RefKey {
    /// Identity of the value behind `value`, typed by `T`.
    pub fn of<T: ?Sized + 'static>(value: &T) -> Self {
        Self::new(std::ptr::from_ref(value).cast::<()>(), TypeId::of::<T>())
    }

    /// Identity from a raw address and an explicit type.
    pub fn new(addr: *const (), type_id: TypeId) -> Self {
        Self {
            addr: addr as usize,
            type_id,
        }
    }
}

/// Two references currently being compared, stored in visiting order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct IdentityPair {
    pub left: RefKey,
    pub right: RefKey,
}

impl IdentityPair {
    pub fn new(left: RefKey, right: RefKey) -> Self {
        Self { left, right }
    }

    /// Both sides are the same reference.
    pub fn is_reflexive(&self) -> bool {
        self.left == self.right
    }

    pub fn swapped(self) -> Self {
        Self {
            left: self.right,
            right: self.left,
        }
    }
}

/// Pairs on the stack of one equality traversal.
///
/// Detection is orientation-free: `(a, b)` and `(b, a)` count as the same pair,
/// which keeps `equals(a, b)` and `equals(b, a)` on mirrored paths.
#[derive(Debug, Default)]
pub struct PairSet {
    active: HashSet<IdentityPair>,
}

impl PairSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `pair` as being compared. Returns `false` if it (in either
    /// orientation) already is.
    pub fn enter(&mut self, pair: IdentityPair) -> bool {
        if self.contains(pair) {
            return false;
        }
        self.active.insert(pair)
    }

    pub fn exit(&mut self, pair: IdentityPair) {
        self.active.remove(&pair);
    }

    pub fn contains(&self, pair: IdentityPair) -> bool {
        self.active.contains(&pair) || self.active.contains(&pair.swapped())
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

/// References on the stack of one hashing or formatting traversal.
#[derive(Debug, Default)]
pub struct IdentitySet {
    active: HashSet<RefKey>,
}

impl IdentitySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `key` as on the stack. Returns `false` on a revisit.
    pub fn enter(&mut self, key: RefKey) -> bool {
        self.active.insert(key)
    }

    pub fn exit(&mut self, key: RefKey) {
        self.active.remove(&key);
    }

    pub fn contains(&self, key: RefKey) -> bool {
        self.active.contains(&key)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ref_key_tracks_address_not_contents() {
        let a = String::from("same");
        let b = String::from("same");
        assert_eq!(RefKey::of(&a), RefKey::of(&a));
        assert_ne!(RefKey::of(&a), RefKey::of(&b));
    }

    #[test]
    fn zero_sized_values_of_different_types_do_not_alias() {
        struct First;
        struct Second;
        let first = First;
        let second = Second;
        let a = RefKey::new(std::ptr::from_ref(&first).cast(), TypeId::of::<First>());
        let b = RefKey::new(std::ptr::from_ref(&second).cast(), TypeId::of::<Second>());
        assert_ne!(a, b);
    }

    #[test]
    fn pair_detection_ignores_orientation() {
        let (x, y) = (1u8, 2u8);
        let pair = IdentityPair::new(RefKey::of(&x), RefKey::of(&y));
        let mut set = PairSet::new();

        assert!(set.enter(pair));
        assert!(!set.enter(pair.swapped()));
        set.exit(pair);
        assert!(set.is_empty());
        assert!(set.enter(pair.swapped()));
    }

    #[test]
    fn identity_set_enter_exit_discipline() {
        let node = vec![1, 2, 3];
        let key = RefKey::of(&node);
        let mut set = IdentitySet::new();

        assert!(set.enter(key));
        assert!(!set.enter(key));
        assert_eq!(set.len(), 1);
        set.exit(key);
        assert!(!set.contains(key));
        assert!(set.enter(key));
    }
}
