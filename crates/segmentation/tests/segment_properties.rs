//! Filter laws checked over generated users and rule sets, plus the
//! worked examples operators rely on.

use proptest::prelude::*;
use segment_core::{Operator, Rule, User, Value};
use segment_engine::{filter_users, rule_matches};

const FIELDS: [&str; 5] = ["postCount", "isPro", "location", "lastSeen", "score"];

fn arb_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        (-50i64..50).prop_map(|n| Value::Number(n as f64)),
        "[a-zA-Z0-9 ]{0,6}".prop_map(Value::Text),
        (1u32..=12, 1u32..=28).prop_map(|(m, d)| Value::Text(format!("2024-{m:02}-{d:02}"))),
    ]
}

fn arb_user() -> impl Strategy<Value = User> {
    (0i64..1000, prop::collection::vec((0usize..FIELDS.len(), arb_value()), 0..5)).prop_map(
        |(id, fields)| {
            let mut user = User::new().with("id", id);
            for (idx, value) in fields {
                user.insert(FIELDS[idx], value);
            }
            user
        },
    )
}

fn arb_rule() -> impl Strategy<Value = Rule> {
    let field = prop_oneof![
        (0usize..FIELDS.len()).prop_map(|i| FIELDS[i].to_string()),
        Just(String::new()),
        Just("ghost".to_string()),
    ];
    let operator = prop_oneof![
        4 => (0usize..Operator::ALL.len()).prop_map(|i| Some(Operator::ALL[i])),
        1 => Just(None),
    ];
    (field, operator, arb_value()).prop_map(|(field, operator, value)| Rule {
        id: String::new(),
        field,
        operator,
        value,
    })
}

proptest! {
    #[test]
    fn filter_is_idempotent(
        users in prop::collection::vec(arb_user(), 0..20),
        rules in prop::collection::vec(arb_rule(), 0..4),
    ) {
        prop_assert_eq!(filter_users(&users, &rules), filter_users(&users, &rules));
    }

    #[test]
    fn filter_preserves_input_order(
        users in prop::collection::vec(arb_user(), 0..20),
        rules in prop::collection::vec(arb_rule(), 1..4),
    ) {
        let result = filter_users(&users, &rules);
        let mut remaining = users.iter();
        for member in &result {
            prop_assert!(remaining.any(|u| u == member));
        }
    }

    #[test]
    fn empty_rules_select_nobody(users in prop::collection::vec(arb_user(), 0..20)) {
        prop_assert!(filter_users(&users, &[]).is_empty());
    }

    #[test]
    fn membership_is_conjunction_of_rules(
        users in prop::collection::vec(arb_user(), 0..20),
        rules in prop::collection::vec(arb_rule(), 1..4),
    ) {
        let expected: Vec<User> = users
            .iter()
            .filter(|u| rules.iter().all(|r| rule_matches(u, r)))
            .cloned()
            .collect();
        prop_assert_eq!(filter_users(&users, &rules), expected);
    }
}

fn rule(field: &str, operator: Operator, value: &str) -> Rule {
    Rule::new(field, operator, value)
}

#[test]
fn numeric_rule_selects_second_user() {
    let users = vec![
        User::new().with("postCount", 10_i64),
        User::new().with("postCount", 40_i64),
    ];
    let result = filter_users(&users, &[rule("postCount", Operator::GreaterThan, "30")]);
    assert_eq!(result, vec![users[1].clone()]);
}

#[test]
fn boolean_rule_is_case_insensitive() {
    let users = vec![User::new().with("isPro", true)];
    assert_eq!(filter_users(&users, &[rule("isPro", Operator::Equals, "true")]).len(), 1);
    assert_eq!(filter_users(&users, &[rule("isPro", Operator::Equals, "TRUE")]).len(), 1);
    assert!(filter_users(&users, &[rule("isPro", Operator::Equals, "yes")]).is_empty());
}

#[test]
fn contains_rule_folds_case() {
    let users = vec![User::new().with("location", "New York")];
    assert_eq!(filter_users(&users, &[rule("location", Operator::Contains, "york")]).len(), 1);
}

#[test]
fn not_contains_fails_on_numeric_field() {
    let users = vec![User::new().with("postCount", 5_i64)];
    assert!(filter_users(&users, &[rule("postCount", Operator::NotContains, "5")]).is_empty());
}

#[test]
fn dates_compare_as_timestamps() {
    let users = vec![
        User::new().with("lastSeen", "2024-01-01"),
        User::new().with("lastSeen", "2024-12-01"),
    ];
    let result = filter_users(&users, &[rule("lastSeen", Operator::LessThan, "2024-06-01")]);
    assert_eq!(result, vec![users[0].clone()]);
}

#[test]
fn bad_numeric_rule_matches_nobody() {
    let users = vec![
        User::new().with("postCount", 10_i64),
        User::new().with("postCount", 40_i64),
    ];
    let result = filter_users(&users, &[rule("postCount", Operator::GreaterThan, "not-a-number")]);
    assert!(result.is_empty());
}
