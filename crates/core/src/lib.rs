//! Shared data model, configuration, and error types for Segment Studio.

pub mod config;
pub mod error;
pub mod segment;
pub mod types;

pub use config::AppConfig;
pub use error::{SegmentError, SegmentResult};
pub use segment::{Operator, Rule, Segment};
pub use types::{User, Value};
