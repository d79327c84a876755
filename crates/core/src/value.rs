//! The dynamic value model the engine traverses.
//!
//! [`Value`] is a tagged union of leaves (scalars that can never take part in a
//! reference cycle) and composites (shared, reference-counted values that can).
//! Cloning a composite clones the handle, not the contents, so a clone keeps the
//! reference identity the cycle trackers key on.

use std::any::Any;
use std::borrow::Cow;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use downcast_rs::{DowncastSync, impl_downcast};
use uuid::Uuid;

use crate::identity::RefKey;
use crate::value_object::{ValueObject, short_type_name};
use crate::{equality, format, hashing};

/// A value reachable from a value object's identity values.
///
/// `PartialEq`, `Hash`, `Display` and `Debug` all go through the engine.
/// Every value equals itself by reference. Beyond that floats follow IEEE
/// equality, so a copy of a `Float(NaN)` is unequal to the original and a
/// NaN-bearing value cannot be looked up as a `HashMap` key.
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(Arc<str>),
    Timestamp(DateTime<Utc>),
    Duration(Duration),
    Uuid(Uuid),
    Symbol(Symbol),
    Bytes(Bytes),
    List(ValueList),
    Set(ValueSet),
    Map(ValueMap),
    Object(Arc<dyn ValueObject>),
    /// Foreign value compared and hashed with its own `Eq + Hash`.
    Opaque(Arc<dyn Opaque>),
    /// Foreign value compared and hashed by reference identity.
    Handle(Handle),
}

impl Value {
    pub fn text(text: impl Into<Arc<str>>) -> Self {
        Self::Text(text.into())
    }

    pub fn bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self::Bytes(Bytes::new(bytes))
    }

    pub fn list<I: IntoIterator<Item = Value>>(items: I) -> Self {
        Self::List(items.into_iter().collect())
    }

    pub fn set<I: IntoIterator<Item = Value>>(items: I) -> Self {
        Self::Set(items.into_iter().collect())
    }

    pub fn map<I: IntoIterator<Item = (Value, Value)>>(entries: I) -> Self {
        Self::Map(entries.into_iter().collect())
    }

    pub fn object<T: ValueObject>(object: T) -> Self {
        Self::Object(Arc::new(object))
    }

    pub fn symbol(
        kind: impl Into<Cow<'static, str>>,
        name: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::Symbol(Symbol::new(kind, name))
    }

    pub fn atom<A: Atom + ?Sized>(atom: &A) -> Self {
        Self::Symbol(atom.symbol())
    }

    pub fn opaque<T: Opaque>(value: T) -> Self {
        Self::Opaque(Arc::new(value))
    }

    pub fn handle<T: Any + Send + Sync>(value: T) -> Self {
        Self::Handle(Handle::new(value))
    }

    /// Leaves never need cycle tracking.
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            Value::Null
                | Value::Bool(_)
                | Value::Int(_)
                | Value::Float(_)
                | Value::Text(_)
                | Value::Timestamp(_)
                | Value::Duration(_)
                | Value::Uuid(_)
                | Value::Symbol(_)
        )
    }

    pub fn is_composite(&self) -> bool {
        !self.is_leaf()
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Runtime type name used by type-based naming.
    pub fn type_name(&self) -> Cow<'static, str> {
        match self {
            Value::Null => Cow::Borrowed("null"),
            Value::Bool(_) => Cow::Borrowed("bool"),
            Value::Int(_) => Cow::Borrowed("i64"),
            Value::Float(_) => Cow::Borrowed("f64"),
            Value::Text(_) => Cow::Borrowed("string"),
            Value::Timestamp(_) => Cow::Borrowed("datetime"),
            Value::Duration(_) => Cow::Borrowed("duration"),
            Value::Uuid(_) => Cow::Borrowed("uuid"),
            Value::Symbol(symbol) => symbol.kind.clone(),
            Value::Bytes(_) => Cow::Borrowed("bytes"),
            Value::List(_) => Cow::Borrowed("list"),
            Value::Set(_) => Cow::Borrowed("set"),
            Value::Map(_) => Cow::Borrowed("map"),
            Value::Object(object) => Cow::Borrowed(object.kind().name()),
            Value::Opaque(opaque) => Cow::Borrowed(opaque.short_name()),
            Value::Handle(handle) => Cow::Borrowed(handle.type_name()),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        equality::equals(self, other)
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(hashing::hash_code(self));
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format::format(self))
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format::format(self))
    }
}

/// Enum-like atom: a member name qualified by the kind it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol {
    kind: Cow<'static, str>,
    name: Cow<'static, str>,
}

impl Symbol {
    pub fn new(kind: impl Into<Cow<'static, str>>, name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.kind, self.name)
    }
}

/// Conversion for enum-like types that participate as symbolic atoms.
pub trait Atom {
    fn symbol(&self) -> Symbol;
}

/// Fixed-size, shared binary buffer.
#[derive(Clone)]
pub struct Bytes(Arc<[u8]>);

impl Bytes {
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }
}

/// Ordered sequence. Equality and hashing are position-sensitive.
#[derive(Clone)]
pub struct ValueList(Arc<[Value]>);

impl ValueList {
    pub fn new(items: Vec<Value>) -> Self {
        Self(items.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.0
    }

    pub(crate) fn key(&self) -> RefKey {
        RefKey::of::<[Value]>(&self.0)
    }
}

impl FromIterator<Value> for ValueList {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Unique-element collection. Member order is kept for display but is not
/// significant for equality or hashing.
#[derive(Clone)]
pub struct ValueSet(Arc<[Value]>);

impl ValueSet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.iter()
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.0.iter().any(|member| member == value)
    }

    pub(crate) fn key(&self) -> RefKey {
        RefKey::of::<[Value]>(&self.0)
    }
}

impl FromIterator<Value> for ValueSet {
    /// Keeps the first occurrence of each distinct value.
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let mut members: Vec<Value> = Vec::new();
        for value in iter {
            if !members.contains(&value) {
                members.push(value);
            }
        }
        Self(members.into())
    }
}

/// Key/value mapping with insertion-ordered entries.
#[derive(Clone)]
pub struct ValueMap(Arc<[(Value, Value)]>);

impl ValueMap {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (Value, Value)> {
        self.0.iter()
    }

    /// Looks a key up with the map's key equality (`Value: PartialEq`).
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.0
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, value)| value)
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.get(key).is_some()
    }

    pub(crate) fn key(&self) -> RefKey {
        RefKey::of::<[(Value, Value)]>(&self.0)
    }
}

impl FromIterator<(Value, Value)> for ValueMap {
    /// A repeated key replaces the earlier value in place.
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
        let mut entries: Vec<(Value, Value)> = Vec::new();
        for (key, value) in iter {
            match entries.iter_mut().find(|(existing, _)| *existing == key) {
                Some(entry) => entry.1 = value,
                None => entries.push((key, value)),
            }
        }
        Self(entries.into())
    }
}

/// Foreign value with its own equality and hash.
///
/// Implemented for every `Eq + Hash + Debug` type; the engine treats such values
/// as terminals and never looks inside them.
pub trait Opaque: DowncastSync + fmt::Debug {
    fn opaque_eq(&self, other: &dyn Opaque) -> bool;
    fn opaque_hash(&self) -> u64;
    fn short_name(&self) -> &'static str;
}
impl_downcast!(sync Opaque);

impl<T> Opaque for T
where
    T: Any + Send + Sync + Eq + Hash + fmt::Debug,
{
    fn opaque_eq(&self, other: &dyn Opaque) -> bool {
        other.downcast_ref::<T>().is_some_and(|other| self == other)
    }

    fn opaque_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }

    fn short_name(&self) -> &'static str {
        short_type_name(std::any::type_name::<T>())
    }
}

/// Foreign value that only has reference identity.
#[derive(Clone)]
pub struct Handle {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Handle {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self {
            inner: value,
            type_name: short_type_name(std::any::type_name::<T>()),
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.inner), Arc::as_ptr(&other.inner))
    }

    pub(crate) fn addr(&self) -> usize {
        Arc::as_ptr(&self.inner).cast::<()>() as usize
    }
}

macro_rules! impl_from_scalar {
    ($($source:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$source> for Value {
                fn from(value: $source) -> Self {
                    Value::$variant(value.into())
                }
            }
        )+
    };
}

impl_from_scalar!(
    bool => Bool,
    i64 => Int,
    i32 => Int,
    u32 => Int,
    f64 => Float,
    f32 => Float,
    &str => Text,
    String => Text,
    Arc<str> => Text,
    DateTime<Utc> => Timestamp,
    Duration => Duration,
    Uuid => Uuid,
    Symbol => Symbol,
    Bytes => Bytes,
    ValueList => List,
    ValueSet => Set,
    ValueMap => Map,
    Handle => Handle,
);

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::list(items.into_iter().map(Into::into))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl<T: ValueObject> From<Arc<T>> for Value {
    fn from(object: Arc<T>) -> Self {
        Value::Object(object)
    }
}

impl From<Arc<dyn ValueObject>> for Value {
    fn from(object: Arc<dyn ValueObject>) -> Self {
        Value::Object(object)
    }
}
