//! Value object trait: equality by value, not identity.
//!
//! A value object is defined entirely by an ordered list of identity values.
//! Equality, hashing and display for the object are all derived from that list
//! by the engine, including for graphs where objects refer back to each other.

use std::any::{Any, TypeId};

use crate::format::LayoutConfig;
use crate::identity::RefKey;
use crate::value::Value;

/// Capability implemented by every value-semantic type.
///
/// ## Contract
///
/// - `identity_values` must be stable for the lifetime of the object and free
///   of side effects. The engine assumes immutability; it does not enforce it.
/// - Order matters. The engine never sorts or canonicalizes the list, so two
///   objects listing the same values in different positions are unequal.
/// - Objects of different [`Kind`]s are never equal.
///
/// ## Usage Pattern
///
/// ```ignore
/// struct Money {
///     amount: i64,
///     currency: String,
/// }
///
/// impl ValueObject for Money {
///     fn identity_values(&self) -> Vec<Value> {
///         vec![self.amount.into(), self.currency.as_str().into()]
///     }
/// }
///
/// valsem_core::value_semantics!(Money);
///
/// let m1 = Money { amount: 100, currency: "USD".to_string() };
/// let m2 = Money { amount: 100, currency: "USD".to_string() };
/// assert_eq!(m1, m2);
/// assert_eq!(m1.to_string(), "Money(100, USD)");
/// ```
pub trait ValueObject: Any + Send + Sync {
    /// The ordered values that define this object's identity.
    fn identity_values(&self) -> Vec<Value>;

    /// Declared kind of the object. Defaults to the Rust type.
    fn kind(&self) -> Kind {
        Kind::of::<Self>()
    }

    /// Layout used when this object is formatted, either at the top level or
    /// nested inside another object.
    fn layout(&self) -> LayoutConfig {
        LayoutConfig::default()
    }
}

/// Reference identity of a value object, typed by its concrete kind.
pub(crate) fn object_key(object: &dyn ValueObject) -> RefKey {
    RefKey::new(std::ptr::from_ref(object).cast::<()>(), object.kind().id())
}

/// Declared kind of a value object: a type identity plus a display name.
///
/// Kinds compare and hash by type identity only; the name is what the
/// formatter prints.
#[derive(Debug, Copy, Clone)]
pub struct Kind {
    id: TypeId,
    name: &'static str,
}

impl Kind {
    /// Kind of `T`, named after the last path segment of its type name.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: short_type_name(std::any::type_name::<T>()),
        }
    }

    /// Same kind, displayed under a different name.
    pub fn named(self, name: &'static str) -> Self {
        Self { name, ..self }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for Kind {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Kind {}

impl core::hash::Hash for Kind {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl core::fmt::Display for Kind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name)
    }
}

/// `my_crate::shapes::Point<f64>` -> `Point`.
pub(crate) fn short_type_name(full: &'static str) -> &'static str {
    let base = match full.find('<') {
        Some(end) => &full[..end],
        None => full,
    };
    match base.rfind("::") {
        Some(start) => &base[start + 2..],
        None => base,
    }
}

/// Implements `PartialEq`, `Eq`, `Hash`, `Display` and `Debug` for one or more
/// [`ValueObject`] types by routing through the engine.
#[macro_export]
macro_rules! value_semantics {
    ($($t:ty),+ $(,)?) => {
        $(
            impl ::core::cmp::PartialEq for $t {
                fn eq(&self, other: &Self) -> bool {
                    $crate::equality::object_equals(self, other)
                }
            }

            impl ::core::cmp::Eq for $t {}

            impl ::core::hash::Hash for $t {
                fn hash<H: ::core::hash::Hasher>(&self, state: &mut H) {
                    state.write_u32($crate::hashing::object_hash(self));
                }
            }

            impl ::core::fmt::Display for $t {
                fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                    f.write_str(&$crate::format::format_object(self))
                }
            }

            impl ::core::fmt::Debug for $t {
                fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                    f.write_str(&$crate::format::format_object(self))
                }
            }
        )+
    };
}
