//! Property tests for the load/save cycle and the builder conversions.

use metatest_core::{
    deserialize, serialize, to_logical, to_test, LogicalOperand, LogicalOperator,
    LogicalPredicate, PropertyPredicate, SelectPredicate, TestAction, TestActions,
    TestDefinition, TestPredicate,
};
use proptest::prelude::*;
use serde_json::Map;

// ── Strategies ──────────────────────────────────────────────────────

fn property_predicate() -> impl Strategy<Value = PropertyPredicate> {
    (
        "[a-z_][a-zA-Z0-9_.]{0,15}",
        prop::option::of(prop::sample::select(vec![
            "exists",
            "equals",
            "contains_any",
            "greater_than",
            "regex_match",
        ])),
        prop::option::of(prop::collection::vec("[ -~]{0,12}", 0..4)),
    )
        .prop_map(|(property, operator, values)| PropertyPredicate {
            property,
            operator: operator.map(str::to_owned),
            values,
        })
}

/// Predicates built only from what the deserializer can produce, other
/// than `Unparseable`: leaves, lists, and combinators over any of those.
fn stored_predicate() -> impl Strategy<Value = TestPredicate> {
    let leaf = property_predicate().prop_map(TestPredicate::Property);
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(TestPredicate::List),
            inner.clone().prop_map(|p| TestPredicate::And(Box::new(p))),
            inner.clone().prop_map(|p| TestPredicate::Or(Box::new(p))),
            inner.prop_map(|p| TestPredicate::Not(Box::new(p))),
        ]
    })
}

/// Predicates whose combinators always hold a list, with no bare lists.
/// This is exactly the set the builder conversion preserves.
fn list_combinator_predicate() -> impl Strategy<Value = TestPredicate> {
    let leaf = property_predicate().prop_map(TestPredicate::Property);
    leaf.prop_recursive(4, 32, 4, |inner| {
        (
            prop::sample::select(LogicalOperator::ALL.to_vec()),
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(operator, operands)| match operator {
                LogicalOperator::And => TestPredicate::and(operands),
                LogicalOperator::Or => TestPredicate::or(operands),
                LogicalOperator::Not => TestPredicate::not(operands),
            })
    })
}

fn logical_operand() -> impl Strategy<Value = LogicalOperand> {
    let leaf = property_predicate().prop_map(LogicalOperand::Property);
    leaf.prop_recursive(4, 32, 4, |inner| {
        (
            prop::sample::select(LogicalOperator::ALL.to_vec()),
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(operator, operands)| {
                LogicalOperand::Logical(LogicalPredicate { operator, operands })
            })
    })
}

fn action() -> impl Strategy<Value = TestAction> {
    (
        prop::sample::select(vec!["ADD_TAGS", "REMOVE_TAGS", "ADD_OWNERS", "SET_DOMAIN"]),
        prop::collection::vec("urn:li:[a-z]{1,8}:[a-z0-9]{1,8}", 0..3),
    )
        .prop_map(|(action_type, values)| TestAction {
            action_type: action_type.to_string(),
            values,
        })
}

fn definition() -> impl Strategy<Value = TestDefinition> {
    (
        prop::collection::vec("[a-zA-Z]{1,12}", 0..4),
        prop::option::of(stored_predicate()),
        stored_predicate(),
        prop::option::of((
            prop::collection::vec(action(), 0..3),
            prop::collection::vec(action(), 0..3),
        )),
    )
        .prop_map(|(types, conditions, rules, actions)| TestDefinition {
            on: SelectPredicate { types, conditions },
            rules,
            actions: actions.map(|(passing, failing)| TestActions { passing, failing }),
            extra: Map::new(),
        })
}

// ── Properties ──────────────────────────────────────────────────────

proptest! {
    /// Saving and reloading a definition changes nothing.
    #[test]
    fn load_after_save_is_identity(def in definition()) {
        prop_assert_eq!(deserialize(&serialize(&def)), def);
    }

    /// Serializing twice yields the same text.
    #[test]
    fn serialize_is_idempotent(def in definition()) {
        let once = serialize(&def);
        let twice = serialize(&deserialize(&once));
        prop_assert_eq!(once, twice);
    }

    /// Builder form round-trips stored predicates whose combinators hold lists.
    #[test]
    fn builder_round_trip_preserves_list_combinators(pred in list_combinator_predicate()) {
        prop_assert_eq!(to_test(&to_logical(&pred)), pred);
    }

    /// Stored form round-trips every builder tree.
    #[test]
    fn stored_round_trip_preserves_builder_trees(operand in logical_operand()) {
        prop_assert_eq!(to_logical(&to_test(&operand)), operand);
    }

    /// A builder tree converts to stored form with the same leaves in order.
    #[test]
    fn builder_conversion_keeps_leaf_order(operand in logical_operand()) {
        fn leaves(v: &serde_json::Value, out: &mut Vec<String>) {
            match v {
                serde_json::Value::Array(items) => items.iter().for_each(|i| leaves(i, out)),
                serde_json::Value::Object(obj) => {
                    if let Some(p) = obj.get("property").and_then(|p| p.as_str()) {
                        out.push(p.to_string());
                    }
                    for key in ["and", "or", "not", "operands"] {
                        if let Some(inner) = obj.get(key) {
                            leaves(inner, out);
                        }
                    }
                }
                _ => {}
            }
        }
        let mut before = Vec::new();
        leaves(&operand.to_value(), &mut before);
        let mut after = Vec::new();
        leaves(&to_test(&operand).to_value(), &mut after);
        prop_assert_eq!(before, after);
    }
}

#[test]
fn test_singular_not_gains_list_through_builder() {
    let stored = TestPredicate::Not(Box::new(TestPredicate::Property(
        PropertyPredicate::new("owners").with_operator("exists"),
    )));
    let round = to_test(&to_logical(&stored));
    assert_eq!(
        round,
        TestPredicate::not(vec![TestPredicate::Property(
            PropertyPredicate::new("owners").with_operator("exists")
        )])
    );
}
