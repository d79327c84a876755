//! `valsem-core`: structural value semantics.
//!
//! Types opt in by implementing [`ValueObject`], exposing an ordered list of
//! identity values. From that single capability the engine derives:
//!
//! - **equality** ([`equals`]): deep, structural, cycle-aware;
//! - **hashing** ([`hash_code`]): consistent with equality;
//! - **display** ([`format()`] / [`format_with`]): configurable via [`LayoutConfig`].
//!
//! Every call is self-contained. Cycle trackers live for one top-level call and
//! no state is shared between calls, so the engine can be used from many threads
//! as long as the graphs are not mutated concurrently.

pub mod equality;
pub mod error;
pub mod format;
pub mod hashing;
pub mod identity;
pub mod value;
pub mod value_object;

pub use equality::{equals, object_equals};
pub use error::{ConfigError, ConfigResult};
pub use format::{LayoutConfig, NameGenerator, NamingStrategy, format, format_object, format_object_with, format_with};
pub use hashing::{hash_code, object_hash};
pub use value::{Atom, Bytes, Handle, Opaque, Symbol, Value, ValueList, ValueMap, ValueSet};
pub use value_object::{Kind, ValueObject};
