//! Walk through the engine: equality, hashing, formatting, and a cycle.
//!
//! Run with `RUST_LOG=valsem_core=trace` to see cycle short-circuits logged.

use std::sync::{Arc, OnceLock};

use valsem_core::{
    LayoutConfig, Value, ValueObject, equals, format, format_with, hash_code, value_semantics,
};

struct Money {
    amount: i64,
    currency: &'static str,
}

impl ValueObject for Money {
    fn identity_values(&self) -> Vec<Value> {
        vec![self.amount.into(), self.currency.into()]
    }

    fn layout(&self) -> LayoutConfig {
        LayoutConfig::default().with_explicit_names(["amount", "currency"])
    }
}

value_semantics!(Money);

struct Employee {
    name: &'static str,
    manager: OnceLock<Value>,
}

impl ValueObject for Employee {
    fn identity_values(&self) -> Vec<Value> {
        vec![
            self.name.into(),
            self.manager.get().cloned().unwrap_or(Value::Null),
        ]
    }
}

fn main() -> anyhow::Result<()> {
    valsem_observability::init();

    let price = Money { amount: 100, currency: "USD" };
    let same = Money { amount: 100, currency: "USD" };
    tracing::info!(equal = price == same, display = %price, "money");

    let config = LayoutConfig::from_json(r#"{ "include_names": true, "multi_line": true, "naming": "smart" }"#)?;
    let order = Value::list([
        Value::from(Arc::new(price)),
        Value::from("ada@example.com"),
        Value::from(42),
    ]);
    println!("{}", format(&order));

    // Two employees who manage each other.
    let boss = Arc::new(Employee { name: "Grace", manager: OnceLock::new() });
    let deputy = Arc::new(Employee { name: "Alan", manager: OnceLock::new() });
    let _ = boss.manager.set(Value::from(deputy.clone()));
    let _ = deputy.manager.set(Value::from(boss.clone()));

    let root = Value::from(boss);
    println!("{}", format_with(&root, &config));
    tracing::info!(
        reflexive = equals(&root, &root),
        hash = hash_code(&root),
        "cyclic graph handled"
    );

    Ok(())
}
