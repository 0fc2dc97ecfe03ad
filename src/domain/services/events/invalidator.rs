use std::collections::{HashMap, hash_map::Entry};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::info;

use super::event_types::EventResult;
use super::subscriber::CourseEventHandler;
use crate::domain::models::{CourseEvent, CourseId};

/// Tracks which courses changed since similarity data was last computed.
///
/// For every course id the latest event timestamp seen is kept. Applying an event twice, or
/// applying an older duplicate after a newer one, leaves the index unchanged. Entries stay
/// until [`clear_through`](Self::clear_through) covers them, so size is bounded by the number
/// of distinct courses changed since the last catalog read.
#[derive(Debug, Default)]
pub struct SimilarityIndexInvalidator {
    stale: RwLock<HashMap<CourseId, DateTime<Utc>>>,
}

impl SimilarityIndexInvalidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `event`; returns true if the index changed
    pub fn invalidate(&self, event: &CourseEvent) -> bool {
        let mut stale = self.stale.write();
        match stale.entry(event.course_id().clone()) {
            Entry::Occupied(seen) if *seen.get() >= event.timestamp() => false,
            Entry::Occupied(mut seen) => {
                seen.insert(event.timestamp());
                true
            }
            Entry::Vacant(slot) => {
                slot.insert(event.timestamp());
                true
            }
        }
    }

    /// Latest event time recorded for `id`
    pub fn last_changed(&self, id: &CourseId) -> Option<DateTime<Utc>> {
        self.stale.read().get(id).copied()
    }

    /// Forgets entries whose latest change is not after `cutoff`; returns how many were dropped
    pub fn clear_through(&self, cutoff: DateTime<Utc>) -> usize {
        let mut stale = self.stale.write();
        let before = stale.len();
        stale.retain(|_, changed| *changed > cutoff);
        before - stale.len()
    }

    pub fn stale_count(&self) -> usize {
        self.stale.read().len()
    }
}

#[async_trait]
impl CourseEventHandler for SimilarityIndexInvalidator {
    async fn handle(&self, event: &CourseEvent) -> EventResult<()> {
        if self.invalidate(event) {
            info!(
                "Course {} {}, similarity index entry marked stale",
                event.course_id(),
                event.event_type()
            );
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "similarity-index-invalidator"
    }
}
