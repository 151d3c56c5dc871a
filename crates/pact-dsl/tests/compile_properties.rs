//! Integration tests for matcher-tree compilation and pact assembly.
//!
//! Property tests cover the behaviour that must hold for any key, primitive
//! or pattern; the scenario tests walk full documents end to end.

use assert_json_diff::{assert_json_eq, assert_json_include};
use pact_dsl::{
    compile, presets, DslError, DslValue, Matcher, MatchingRule, Pact, PactConfig, RequestSpec,
    ResponseSpec,
};
use proptest::prelude::*;
use serde_json::{json, Value};

const PATTERNS: [&str; 5] = [r"\d+", r"\s+", r"[a-z]+", r"^[A-Z]{3}$", r"\w+@\w+\.com"];

fn key() -> impl Strategy<Value = String> {
    "[a-z][a-zA-Z_]{0,11}"
}

fn primitive() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[ -~]{0,16}".prop_map(Value::from),
    ]
}

fn leaf() -> impl Strategy<Value = DslValue> {
    prop_oneof![
        primitive().prop_map(DslValue::from),
        primitive().prop_map(|v| DslValue::from(Matcher::like(v))),
        (prop::sample::select(PATTERNS.to_vec()), "[a-z]{1,8}")
            .prop_map(|(pattern, example)| DslValue::from(Matcher::term(pattern, example))),
    ]
}

proptest! {
    #[test]
    fn primitives_pass_through_without_rules(k in key(), v in primitive()) {
        let root = DslValue::object([(k.clone(), DslValue::from(v.clone()))]);
        let compiled = compile(&root).unwrap();

        prop_assert_eq!(compiled.body, json!({ k.clone(): v }));
        prop_assert!(compiled.matching_rules.is_empty());
    }

    #[test]
    fn regex_matchers_record_their_pattern(
        k in key(),
        pattern in prop::sample::select(PATTERNS.to_vec()),
        example in primitive(),
    ) {
        let root = DslValue::object([(k.clone(), Matcher::term(pattern, example.clone()))]);
        let compiled = compile(&root).unwrap();

        prop_assert_eq!(&compiled.body, &json!({ k.clone(): example }));
        prop_assert_eq!(compiled.matching_rules.len(), 1);
        prop_assert_eq!(
            compiled.rule_at(&format!("$.body.{k}")),
            Some(&MatchingRule::regex(pattern))
        );
    }

    #[test]
    fn array_min_like_repeats_the_compiled_template(
        k in key(),
        f in key(),
        n in 0usize..8,
        example in primitive(),
    ) {
        let template = DslValue::object([(f.clone(), Matcher::like(example.clone()))]);
        let root = DslValue::object([(k.clone(), Matcher::array_min_like(n, template))]);
        let compiled = compile(&root).unwrap();

        let items = compiled.body[&k].as_array().unwrap();
        prop_assert_eq!(items.len(), n);
        for item in items {
            prop_assert_eq!(item, &json!({ f.clone(): example.clone() }));
        }
        prop_assert_eq!(compiled.rule_at(&format!("$.body.{k}")), Some(&MatchingRule::min(n)));
        prop_assert_eq!(
            compiled.rule_at(&format!("$.body.{k}[*].{f}")),
            Some(&MatchingRule::type_match())
        );
        prop_assert_eq!(compiled.matching_rules.len(), 2);
    }

    #[test]
    fn key_order_does_not_change_the_result(
        entries in prop::collection::btree_map(key(), leaf(), 1..8),
    ) {
        let forward: Vec<_> = entries.clone().into_iter().collect();
        let mut backward = forward.clone();
        backward.reverse();

        let a = compile(&DslValue::object(forward)).unwrap();
        let b = compile(&DslValue::object(backward)).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn repeated_compilation_is_idempotent(
        entries in prop::collection::btree_map(key(), leaf(), 1..8),
    ) {
        let root = DslValue::object(entries);
        let first = compile(&root).unwrap();
        let second = compile(&root).unwrap();
        prop_assert_eq!(first, second);
    }
}

#[test]
fn nested_users_rules_compose_wildcards() {
    let mut level = DslValue::object([("user", Matcher::term(r"\s+", "someusername"))]);
    for _ in 0..2 {
        level = DslValue::object([(
            "user",
            DslValue::object([("users", Matcher::array_min_like(3, level))]),
        )]);
    }
    let root = DslValue::object([("users", Matcher::array_min_like(3, level))]);

    let compiled = compile(&root).unwrap();

    assert_json_eq!(
        serde_json::to_value(&compiled.matching_rules).unwrap(),
        json!({
            "$.body.users": {"match": "type", "min": 3},
            "$.body.users[*].user.users": {"match": "type", "min": 3},
            "$.body.users[*].user.users[*].user.users": {"match": "type", "min": 3},
            "$.body.users[*].user.users[*].user.users[*].user": {"match": "regex", "regex": "\\s+"}
        })
    );
}

#[test]
fn decoded_json_document_compiles_like_the_builder_form() {
    let document = json!({
        "animals": {
            "pact:matcher:type": "type",
            "min": 1,
            "value": {
                "name": "Fred",
                "children": {
                    "pact:matcher:type": "type",
                    "min": 1,
                    "value": {"age": {"pact:matcher:type": "type", "value": 9}}
                }
            }
        }
    });

    let decoded = DslValue::from_json(&document).unwrap();
    let built = DslValue::object([(
        "animals",
        Matcher::array_min_like(
            1,
            DslValue::object([
                ("name", DslValue::from("Fred")),
                (
                    "children",
                    Matcher::array_min_like(1, DslValue::object([("age", Matcher::like(9))]))
                        .into(),
                ),
            ]),
        ),
    )]);
    assert_eq!(decoded, built);

    let compiled = compile(&decoded).unwrap();
    assert_json_eq!(
        compiled.body,
        json!({"animals": [{"name": "Fred", "children": [{"age": 9}]}]})
    );
    assert_json_eq!(
        serde_json::to_value(&compiled.matching_rules).unwrap(),
        json!({
            "$.body.animals": {"match": "type", "min": 1},
            "$.body.animals[*].children": {"match": "type", "min": 1},
            "$.body.animals[*].children[*].age": {"match": "type"}
        })
    );
}

#[test]
fn randomized_presets_are_replicated_not_regenerated() {
    let root = DslValue::object([(
        "ids",
        Matcher::array_min_like(4, DslValue::object([("id", presets::uuid())])),
    )]);
    let compiled = compile(&root).unwrap();

    let ids = compiled.body["ids"].as_array().unwrap();
    assert_eq!(ids.len(), 4);
    assert!(ids.iter().all(|id| id == &ids[0]));
}

#[test]
fn errors_deep_in_the_tree_abort_everything() {
    let document = json!({
        "ok": {"pact:matcher:type": "type", "value": 1},
        "items": [1, {"nested": {"pact:matcher:type": "equality", "value": 2}}]
    });
    let err = DslValue::from_json(&document).unwrap_err();
    assert!(
        matches!(err, DslError::UnknownMatcher { ref path, .. } if path == "$.items[1].nested"),
        "unexpected error: {err}"
    );
}

#[test]
fn full_pact_document() {
    let config = PactConfig::from_yaml_str("consumer: web\nprovider: users-api\n").unwrap();
    let mut pact = Pact::from_config(&config);

    let interaction = pact
        .interaction("a request to create a user")
        .given("no users exist")
        .with_request(
            RequestSpec::post(Matcher::term(r"/users(/\d+)?", "/users"))
                .header("Content-Type", "application/json")
                .body(DslValue::object([
                    ("name", DslValue::from(Matcher::like("bob"))),
                    ("email", Matcher::term(r"\w+@\w+\.com", "bob@example.com").into()),
                ])),
        )
        .unwrap()
        .will_respond_with(
            ResponseSpec::new(201).body(DslValue::object([
                ("id", DslValue::from(Matcher::like(42))),
                ("roles", Matcher::array_max_like(2, "admin").into()),
            ])),
        )
        .unwrap();
    pact.add_interaction(interaction).unwrap();

    let document = pact.to_json_value().unwrap();
    assert_json_include!(
        actual: document,
        expected: json!({
            "consumer": {"name": "web"},
            "provider": {"name": "users-api"},
            "interactions": [{
                "description": "a request to create a user",
                "providerState": "no users exist",
                "request": {
                    "method": "POST",
                    "path": "/users",
                    "headers": {"Content-Type": "application/json"},
                    "body": {"name": "bob", "email": "bob@example.com"},
                    "matchingRules": {
                        "$.path": {"match": "regex", "regex": "/users(/\\d+)?"},
                        "$.body.name": {"match": "type"},
                        "$.body.email": {"match": "regex", "regex": "\\w+@\\w+\\.com"}
                    }
                },
                "response": {
                    "status": 201,
                    "body": {"id": 42, "roles": ["admin", "admin"]},
                    "matchingRules": {
                        "$.body.id": {"match": "type"},
                        "$.body.roles": {"match": "type", "max": 2}
                    }
                }
            }],
            "metadata": {"pactSpecification": {"version": "2.0.0"}}
        })
    );
}
