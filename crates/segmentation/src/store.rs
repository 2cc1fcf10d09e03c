//! In-memory store for the user collection and segment definitions.
//!
//! Readers get snapshots: the user list is shared behind an `Arc` and
//! replaced wholesale on import, so a membership query never observes a
//! half-imported collection.

use indexmap::IndexMap;
use parking_lot::RwLock;
use segment_core::{Rule, Segment, SegmentError, SegmentResult, User};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::builder::SegmentBuilder;
use crate::engine::filter_users;

pub struct SegmentStore {
    users: RwLock<Arc<Vec<User>>>,
    segments: RwLock<IndexMap<String, Segment>>,
}

impl SegmentStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(Arc::new(Vec::new())),
            segments: RwLock::new(IndexMap::new()),
        }
    }

    pub fn with_users(users: Vec<User>) -> Self {
        let store = Self::new();
        store.import_users(users);
        store
    }

    /// Current user collection.
    pub fn users(&self) -> Arc<Vec<User>> {
        self.users.read().clone()
    }

    pub fn user_count(&self) -> usize {
        self.users.read().len()
    }

    /// Replace the user collection. Returns the new size.
    pub fn import_users(&self, users: Vec<User>) -> usize {
        let count = users.len();
        *self.users.write() = Arc::new(users);
        info!(users = count, "User collection replaced");
        count
    }

    pub fn list_segments(&self) -> Vec<Segment> {
        self.segments.read().values().cloned().collect()
    }

    pub fn get_segment(&self, id: &str) -> Option<Segment> {
        self.segments.read().get(id).cloned()
    }

    /// Create a segment under a freshly generated id.
    pub fn add_segment(&self, name: impl Into<String>, rules: Vec<Rule>) -> Segment {
        let segment = Segment {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            rules,
        };
        self.segments
            .write()
            .insert(segment.id.clone(), segment.clone());
        info!(segment_id = %segment.id, name = %segment.name, "Segment created");
        segment
    }

    /// Insert a segment keeping its id; fails if the id is taken.
    pub fn insert_segment(&self, segment: Segment) -> SegmentResult<()> {
        let mut segments = self.segments.write();
        if segments.contains_key(&segment.id) {
            return Err(SegmentError::DuplicateSegment(segment.id));
        }
        debug!(segment_id = %segment.id, rules = segment.rules.len(), "Segment inserted");
        segments.insert(segment.id.clone(), segment);
        Ok(())
    }

    pub fn update_segment(&self, segment: Segment) -> SegmentResult<()> {
        let mut segments = self.segments.write();
        match segments.get_mut(&segment.id) {
            Some(existing) => {
                info!(segment_id = %segment.id, rules = segment.rules.len(), "Segment updated");
                *existing = segment;
                Ok(())
            }
            None => Err(SegmentError::SegmentNotFound(segment.id)),
        }
    }

    pub fn delete_segment(&self, id: &str) -> SegmentResult<Segment> {
        let removed = self.segments.write().shift_remove(id);
        match removed {
            Some(segment) => {
                info!(segment_id = %id, "Segment deleted");
                Ok(segment)
            }
            None => Err(SegmentError::SegmentNotFound(id.to_string())),
        }
    }

    /// Users currently in the segment. Recomputed on every call.
    pub fn members(&self, id: &str) -> SegmentResult<Vec<User>> {
        let segment = self
            .get_segment(id)
            .ok_or_else(|| SegmentError::SegmentNotFound(id.to_string()))?;
        let users = self.users();
        if segment.rules.is_empty() {
            warn!(segment_id = %id, "Segment has no rules; membership is empty");
        }
        let members = filter_users(&users, &segment.rules);
        debug!(
            segment_id = %id,
            users = users.len(),
            members = members.len(),
            "Segment membership computed"
        );
        Ok(members)
    }

    pub fn member_count(&self, id: &str) -> SegmentResult<usize> {
        self.members(id).map(|m| m.len())
    }

    /// Install the three starter segments shown to new workspaces.
    pub fn seed_demo_segments(&self) {
        let demo = [
            SegmentBuilder::new("Power Users")
                .id("1")
                .greater_than("postCount", 30_i64)
                .equals("isPro", true)
                .build(),
            SegmentBuilder::new("New Yorkers")
                .id("2")
                .equals("location", "New York")
                .build(),
            SegmentBuilder::new("Inactive London Users")
                .id("3")
                .equals("location", "London")
                .less_than("lastSeen", "2024-05-19")
                .build(),
        ];
        for segment in demo {
            if let Err(e) = self.insert_segment(segment) {
                warn!(error = %e, "Skipping demo segment");
            }
        }
        info!(segments = self.segments.read().len(), "Demo segments seeded");
    }
}

impl Default for SegmentStore {
    fn default() -> Self {
        Self::new()
    }
}
