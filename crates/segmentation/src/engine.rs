//! Segment filter — selects the users that satisfy every rule of a segment.

use segment_core::{Rule, User};
use tracing::trace;

use crate::predicates::compare_values;

/// Whether `user` satisfies a single rule. Rules without a field or
/// operator never match.
pub fn rule_matches(user: &User, rule: &Rule) -> bool {
    let Some(operator) = rule.operator else {
        return false;
    };
    if rule.field.is_empty() {
        return false;
    }
    compare_values(user.get(&rule.field), operator, &rule.value)
}

/// Whether `user` satisfies all `rules`. An empty rule list selects nobody.
pub fn matches_all(user: &User, rules: &[Rule]) -> bool {
    !rules.is_empty() && rules.iter().all(|rule| rule_matches(user, rule))
}

/// Borrowing variant of [`filter_users`].
pub fn matching_users<'a>(users: &'a [User], rules: &[Rule]) -> Vec<&'a User> {
    if rules.is_empty() {
        return Vec::new();
    }
    let matched: Vec<&User> = users.iter().filter(|u| matches_all(u, rules)).collect();
    trace!(
        users = users.len(),
        rules = rules.len(),
        matched = matched.len(),
        "Filtered users"
    );
    matched
}

/// The users satisfying every rule, in input order.
pub fn filter_users(users: &[User], rules: &[Rule]) -> Vec<User> {
    matching_users(users, rules).into_iter().cloned().collect()
}
