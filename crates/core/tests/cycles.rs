use std::sync::{Arc, OnceLock};

use valsem_core::{LayoutConfig, Value, ValueObject, equals, format, format_object, hash_code};

/// Graph node whose outgoing edge is set after construction, so cycles can be
/// closed.
struct Node {
    label: &'static str,
    next: OnceLock<Value>,
}

impl Node {
    fn new(label: &'static str) -> Arc<Self> {
        Arc::new(Self {
            label,
            next: OnceLock::new(),
        })
    }

    fn link(&self, next: impl Into<Value>) {
        let _ = self.next.set(next.into());
    }
}

impl ValueObject for Node {
    fn identity_values(&self) -> Vec<Value> {
        vec![
            Value::from(self.label),
            self.next.get().cloned().unwrap_or(Value::Null),
        ]
    }
}

/// `a -> b -> a`, returned as a value rooted at `a`.
fn mutual(a: &'static str, b: &'static str) -> Value {
    let first = Node::new(a);
    let second = Node::new(b);
    first.link(second.clone());
    second.link(first.clone());
    Value::from(first)
}

#[test]
fn mutual_references_terminate_in_every_traversal() {
    let a = mutual("a", "b");
    let a2 = mutual("a", "b");

    assert!(equals(&a, &a));
    assert!(equals(&a, &a2));
    assert!(equals(&a2, &a));
    assert_eq!(hash_code(&a), hash_code(&a2));
    assert_eq!(hash_code(&a), hash_code(&a));
    assert_eq!(format(&a), "Node(a, Node(b, (circular ref)))");
    assert_eq!(format(&a), format(&a2));
}

#[test]
fn mutual_references_with_different_labels_are_unequal() {
    let a = mutual("a", "b");
    let c = mutual("a", "c");
    assert!(!equals(&a, &c));
    assert!(!equals(&c, &a));
}

#[test]
fn self_reference_is_reflexive() {
    let node = Node::new("loop");
    node.link(node.clone());
    let value = Value::from(node.clone());

    assert!(equals(&value, &value.clone()));
    assert_eq!(format_object(node.as_ref()), "Node(loop, (circular ref))");
    assert_eq!(hash_code(&value), hash_code(&value));
}

#[test]
fn revisited_list_renders_placeholder() {
    let a = Node::new("a");
    let b = Node::new("b");
    let list = Value::list([Value::from(b.clone())]);
    a.link(list.clone());
    b.link(list);

    let root = Value::from(a);
    assert_eq!(format(&root), "Node(a, [Node(b, [/* circular ref */])])");
    assert!(equals(&root, &root));
    let _ = hash_code(&root);
}

#[test]
fn revisited_set_and_map_render_placeholder() {
    let a = Node::new("a");
    let set = Value::set([Value::from(a.clone())]);
    a.link(set.clone());
    assert_eq!(format(&set), "{Node(a, {/* circular ref */})}");

    let b = Node::new("b");
    let map = Value::map([(Value::from("b"), Value::from(b.clone()))]);
    b.link(map.clone());
    assert_eq!(format(&map), "{b: Node(b, {/* circular ref */})}");
}

#[test]
fn cyclic_containers_compare_and_hash_by_shape() {
    let build = |label: &'static str| {
        let node = Node::new(label);
        let set = Value::set([Value::from(node.clone()), Value::from(1)]);
        node.link(set.clone());
        set
    };
    let left = build("n");
    let right = build("n");
    let other = build("m");

    assert!(equals(&left, &right));
    assert_eq!(hash_code(&left), hash_code(&right));
    assert!(!equals(&left, &other));
}

#[test]
fn multi_line_cycles_stay_readable() {
    struct Pretty(Arc<Node>);

    impl ValueObject for Pretty {
        fn identity_values(&self) -> Vec<Value> {
            vec![Value::from(self.0.clone())]
        }

        fn layout(&self) -> LayoutConfig {
            LayoutConfig::pretty()
        }
    }

    let node = Node::new("x");
    node.link(node.clone());
    assert_eq!(
        format_object(&Pretty(node)),
        "Pretty(\n  value0: Node(x, (circular ref))\n)"
    );
}
