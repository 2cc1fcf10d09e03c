//! Loading user and segment collections from disk.

use segment_core::{Segment, SegmentResult, User};
use std::path::Path;
use tracing::info;

use crate::import::parse_users;
use crate::schema::ImportSchema;

/// Read a user collection. `.json` files hold an array of objects; anything
/// else is parsed as CSV through `schema`.
pub fn read_users_file(path: impl AsRef<Path>, schema: &ImportSchema) -> SegmentResult<Vec<User>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let users: Vec<User> = if is_json(path) {
        serde_json::from_str(&text)?
    } else {
        parse_users(&text, schema)?
    };
    info!(path = %path.display(), users = users.len(), "Users loaded");
    Ok(users)
}

/// Read a JSON array of segments.
pub fn read_segments_file(path: impl AsRef<Path>) -> SegmentResult<Vec<Segment>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let segments: Vec<Segment> = serde_json::from_str(&text)?;
    info!(path = %path.display(), segments = segments.len(), "Segments loaded");
    Ok(segments)
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| e.eq_ignore_ascii_case("json"))
}
