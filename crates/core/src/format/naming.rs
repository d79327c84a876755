//! Name inference for formatted values.

use crate::format::layout::{LayoutConfig, NamingStrategy};
use crate::value::Value;

/// Text up to this many characters is treated as a name by smart naming.
pub const SHORT_TEXT_LIMIT: usize = 20;

/// Names for each value: explicit names first, then the configured strategy.
pub fn resolve_names(values: &[Value], config: &LayoutConfig) -> Vec<String> {
    let explicit = config.explicit_names.as_deref().unwrap_or(&[]);
    values
        .iter()
        .enumerate()
        .map(|(index, value)| match explicit.get(index) {
            Some(name) => name.clone(),
            None => infer_name(&config.naming, value, index),
        })
        .collect()
}

pub fn infer_name(strategy: &NamingStrategy, value: &Value, index: usize) -> String {
    match strategy {
        NamingStrategy::Positional => positional(index),
        NamingStrategy::TypeBased => value.type_name().to_lowercase(),
        NamingStrategy::Smart => smart_name(value, index),
        NamingStrategy::Custom(generator) => generator
            .generate(value, index)
            .unwrap_or_else(|| positional(index)),
    }
}

pub fn positional(index: usize) -> String {
    format!("value{index}")
}

fn smart_name(value: &Value, index: usize) -> String {
    let name = match value {
        Value::Text(text) if text.contains('@') => "email",
        Value::Text(text) if text.chars().count() <= SHORT_TEXT_LIMIT => "name",
        Value::Text(_) => "text",
        Value::Int(n) if (0..=150).contains(n) => "age",
        Value::Int(n) if *n > 1_000_000_000 => "timestamp",
        Value::Int(_) => "number",
        Value::Float(_) => "decimal",
        Value::Bool(_) => "flag",
        Value::List(_) => "items",
        Value::Set(_) => "collection",
        Value::Map(_) => "data",
        Value::Bytes(_) => "bytes",
        Value::Null => return format!("nullValue{index}"),
        Value::Object(object) => return object.kind().name().to_lowercase(),
        _ => return positional(index),
    };
    name.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_names_fall_back_positionally() {
        let values = [Value::from("v0"), Value::from("v1"), Value::from("v2")];
        let config = LayoutConfig::default().with_explicit_names(["first"]);
        assert_eq!(resolve_names(&values, &config), ["first", "value1", "value2"]);
    }

    #[test]
    fn explicit_names_then_strategy() {
        let values = [Value::from(1), Value::from(true)];
        let config = LayoutConfig::default()
            .with_explicit_names(["id"])
            .with_naming(NamingStrategy::TypeBased);
        assert_eq!(resolve_names(&values, &config), ["id", "bool"]);
    }

    #[test]
    fn type_based_names_are_lower_cased() {
        let values = [Value::from(1), Value::from("a"), Value::from(2.5), Value::Null];
        let names: Vec<String> = values
            .iter()
            .enumerate()
            .map(|(i, v)| infer_name(&NamingStrategy::TypeBased, v, i))
            .collect();
        assert_eq!(names, ["i64", "string", "f64", "null"]);
    }

    #[test]
    fn smart_names_follow_value_shape() {
        let cases = [
            (Value::from("ada@example.com"), "email"),
            (Value::from("Ada"), "name"),
            (Value::from("a considerably longer piece of prose"), "text"),
            (Value::from(36), "age"),
            (Value::from(1_700_000_000i64), "timestamp"),
            (Value::from(-4), "number"),
            (Value::from(151), "number"),
            (Value::from(2.5), "decimal"),
            (Value::from(false), "flag"),
            (Value::list([Value::from(1)]), "items"),
            (Value::set([Value::from(1)]), "collection"),
            (Value::map([(Value::from("k"), Value::from(1))]), "data"),
            (Value::bytes(vec![0u8; 4]), "bytes"),
        ];
        for (value, expected) in cases {
            assert_eq!(infer_name(&NamingStrategy::Smart, &value, 0), expected);
        }
        assert_eq!(infer_name(&NamingStrategy::Smart, &Value::Null, 3), "nullValue3");
        assert_eq!(
            infer_name(&NamingStrategy::Smart, &Value::symbol("Color", "red"), 5),
            "value5"
        );
    }

    #[test]
    fn custom_generator_may_decline() {
        let strategy = NamingStrategy::custom(|value, index| {
            value.as_int().map(|_| format!("n{index}"))
        });
        assert_eq!(infer_name(&strategy, &Value::from(9), 2), "n2");
        assert_eq!(infer_name(&strategy, &Value::from("x"), 2), "value2");
    }
}
