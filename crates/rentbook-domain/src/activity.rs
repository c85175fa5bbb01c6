//! Append-only audit trail of changes made to the property book.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    RoomCreated,
    RoomUpdated,
    RoomDeleted,
    PersonCreated,
    PersonUpdated,
    PersonDeleted,
    PaymentCreated,
    PaymentUpdated,
}

impl ActivityKind {
    pub fn entity(self) -> EntityKind {
        match self {
            ActivityKind::RoomCreated | ActivityKind::RoomUpdated | ActivityKind::RoomDeleted => {
                EntityKind::Room
            }
            ActivityKind::PersonCreated
            | ActivityKind::PersonUpdated
            | ActivityKind::PersonDeleted => EntityKind::Person,
            ActivityKind::PaymentCreated | ActivityKind::PaymentUpdated => EntityKind::Payment,
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ActivityKind::RoomCreated => "room_created",
            ActivityKind::RoomUpdated => "room_updated",
            ActivityKind::RoomDeleted => "room_deleted",
            ActivityKind::PersonCreated => "person_created",
            ActivityKind::PersonUpdated => "person_updated",
            ActivityKind::PersonDeleted => "person_deleted",
            ActivityKind::PaymentCreated => "payment_created",
            ActivityKind::PaymentUpdated => "payment_updated",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Room,
    Person,
    Payment,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityLog {
    pub id: Uuid,
    pub kind: ActivityKind,
    pub entity: EntityKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<Uuid>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl ActivityLog {
    pub fn new(kind: ActivityKind, entity_id: Option<Uuid>, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            entity: kind.entity(),
            entity_id,
            message: message.into(),
            meta: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_meta(mut self, meta: serde_json::Value) -> Self {
        self.meta = Some(meta);
        self
    }
}
