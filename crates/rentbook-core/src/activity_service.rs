//! Audit trail helpers shared by every mutating service.

use serde_json::Value;
use uuid::Uuid;

use rentbook_domain::{ActivityKind, ActivityLog, EntityKind, PropertyBook};

use crate::{Page, PageRequest};

pub struct ActivityService;

impl ActivityService {
    /// Appends a log entry and returns its identifier.
    pub fn record(
        book: &mut PropertyBook,
        kind: ActivityKind,
        entity_id: Option<Uuid>,
        message: impl Into<String>,
        meta: Option<Value>,
    ) -> Uuid {
        let mut entry = ActivityLog::new(kind, entity_id, message);
        if let Some(meta) = meta {
            entry = entry.with_meta(meta);
        }
        let id = entry.id;
        book.push_log(entry);
        id
    }

    /// Log entries newest first, optionally narrowed to one entity kind.
    pub fn list(
        book: &PropertyBook,
        entity: Option<EntityKind>,
        request: PageRequest,
    ) -> Page<&ActivityLog> {
        let mut entries: Vec<&ActivityLog> = book
            .logs
            .iter()
            .rev()
            .filter(|entry| entity.map_or(true, |kind| entry.entity == kind))
            .collect();
        // Stable sort keeps later insertions first among equal timestamps.
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Page::from_ordered(entries, request)
    }
}
