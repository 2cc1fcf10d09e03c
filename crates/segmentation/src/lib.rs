//! Rule-based user segmentation: value coercion, condition evaluation,
//! segment filtering, and the in-memory segment store.

pub mod builder;
pub mod coercion;
pub mod engine;
pub mod predicates;
pub mod store;

pub use builder::SegmentBuilder;
pub use coercion::{coerce, Comparable};
pub use engine::{filter_users, matches_all, matching_users, rule_matches};
pub use predicates::{compare_values, evaluate};
pub use store::SegmentStore;
