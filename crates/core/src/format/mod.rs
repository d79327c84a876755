//! Formatter: human-readable rendering of values and value objects.
//!
//! A value object renders as `Kind(v0, v1, ...)` according to its
//! [`LayoutConfig`]. Nested objects use their own layout, not the parent's.
//! Containers use `[...]` for lists and `{...}` for sets and maps.
//!
//! Each top-level call tracks the composites currently being rendered; a
//! revisit renders as a placeholder instead of recursing:
//!
//! - object: `(circular ref)`
//! - list: `[/* circular ref */]`
//! - set or map: `{/* circular ref */}`

pub mod layout;
pub mod naming;

pub use layout::{LayoutConfig, NameGenerator, NamingStrategy};

use tracing::trace;

use crate::identity::{IdentitySet, RefKey};
use crate::value::{Bytes, Value};
use crate::value_object::{ValueObject, object_key};

pub const CIRCULAR_OBJECT: &str = "(circular ref)";
pub const CIRCULAR_LIST: &str = "[/* circular ref */]";
pub const CIRCULAR_COLLECTION: &str = "{/* circular ref */}";

/// Byte buffers up to this length are rendered byte by byte.
pub const INLINE_BYTES_LIMIT: usize = 32;

const INDENT: &str = "  ";

/// Renders a value; objects use their own layout.
pub fn format(value: &Value) -> String {
    let mut visited = IdentitySet::new();
    prop_to_string(value, &mut visited)
}

/// Renders a value, applying `config` if it is a value object. Objects nested
/// inside still use their own layout.
pub fn format_with(value: &Value, config: &LayoutConfig) -> String {
    match value {
        Value::Object(object) => format_object_with(object.as_ref(), config),
        other => format(other),
    }
}

pub fn format_object(object: &dyn ValueObject) -> String {
    format_object_with(object, &object.layout())
}

pub fn format_object_with(object: &dyn ValueObject, config: &LayoutConfig) -> String {
    let mut visited = IdentitySet::new();
    render_object(object, config, &mut visited)
}

fn render_object(object: &dyn ValueObject, config: &LayoutConfig, visited: &mut IdentitySet) -> String {
    let key = object_key(object);
    if !visited.enter(key) {
        trace!(kind = object.kind().name(), "revisited object while formatting");
        return CIRCULAR_OBJECT.to_string();
    }

    let values = object.identity_values();
    let names = config
        .include_names
        .then(|| naming::resolve_names(&values, config));

    let mut items = Vec::with_capacity(values.len());
    for (index, value) in values.iter().enumerate() {
        let rendered = prop_to_string(value, visited);
        match names.as_ref().and_then(|names| names.get(index)) {
            Some(name) => items.push(format!("{name}: {rendered}")),
            None => items.push(rendered),
        }
    }
    visited.exit(key);

    let type_name = if config.include_type_name {
        object.kind().name()
    } else {
        ""
    };
    layout_items(type_name, &items, config)
}

/// Wraps rendered items in `type_name(...)` using the configured layout.
fn layout_items(type_name: &str, items: &[String], config: &LayoutConfig) -> String {
    if items.is_empty() {
        return format!("{type_name}()");
    }
    let separator = config.separator();
    if config.multi_line {
        let body = items
            .iter()
            .map(|item| format!("{INDENT}{}", item.replace('\n', &format!("\n{INDENT}"))))
            .collect::<Vec<_>>()
            .join(separator);
        format!("{type_name}(\n{body}\n)")
    } else {
        format!("{type_name}({})", items.join(separator))
    }
}

/// Renders one value within an ongoing traversal.
fn prop_to_string(value: &Value, visited: &mut IdentitySet) -> String {
    match value {
        Value::Object(object) => {
            let config = object.layout();
            render_object(object.as_ref(), &config, visited)
        }
        Value::Bytes(bytes) => render_bytes(bytes),
        Value::List(list) => guarded(list.key(), CIRCULAR_LIST, visited, |visited| {
            let items: Vec<String> = list.iter().map(|item| prop_to_string(item, visited)).collect();
            format!("[{}]", items.join(", "))
        }),
        Value::Set(set) => guarded(set.key(), CIRCULAR_COLLECTION, visited, |visited| {
            let items: Vec<String> = set.iter().map(|item| prop_to_string(item, visited)).collect();
            format!("{{{}}}", items.join(", "))
        }),
        Value::Map(map) => guarded(map.key(), CIRCULAR_COLLECTION, visited, |visited| {
            let entries: Vec<String> = map
                .iter()
                .map(|(key, value)| {
                    let key = prop_to_string(key, visited);
                    format!("{key}: {}", prop_to_string(value, visited))
                })
                .collect();
            format!("{{{}}}", entries.join(", "))
        }),
        Value::Opaque(opaque) => format!("{opaque:?}"),
        Value::Handle(handle) => format!("<{}>", handle.type_name()),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int(n) => n.to_string(),
        Value::Float(f) => render_float(*f),
        Value::Text(text) => text.to_string(),
        Value::Timestamp(ts) => ts.to_rfc3339(),
        Value::Duration(d) => d.to_string(),
        Value::Uuid(id) => id.to_string(),
        Value::Symbol(symbol) => symbol.to_string(),
    }
}

fn guarded(
    key: RefKey,
    placeholder: &str,
    visited: &mut IdentitySet,
    render: impl FnOnce(&mut IdentitySet) -> String,
) -> String {
    if !visited.enter(key) {
        trace!(placeholder, "revisited container while formatting");
        return placeholder.to_string();
    }
    let rendered = render(visited);
    visited.exit(key);
    rendered
}

/// Fixed notation with at least one decimal place (`2.0`, `1e21` as
/// `1000000000000000000000.0`). Non-finite values print as `NaN`, `inf`, `-inf`.
fn render_float(f: f64) -> String {
    let rendered = f.to_string();
    if f.is_finite() && !rendered.contains('.') {
        format!("{rendered}.0")
    } else {
        rendered
    }
}

fn render_bytes(bytes: &Bytes) -> String {
    if bytes.len() > INLINE_BYTES_LIMIT {
        return format!("Bytes ({} bytes)", bytes.len());
    }
    let items: Vec<String> = bytes.as_slice().iter().map(u8::to_string).collect();
    format!("[{}]", items.join(", "))
}
