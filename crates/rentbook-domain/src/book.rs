//! The property book: every room, person, payment, and log entry of one property.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    activity::ActivityLog, calendar::BillingPeriod, payment::Payment, person::Person, room::Room,
};

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyBook {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub people: Vec<Person>,
    /// Append-only; corrections are new entries for the same period.
    #[serde(default)]
    pub payments: Vec<Payment>,
    #[serde(default)]
    pub logs: Vec<ActivityLog>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "PropertyBook::schema_version_default")]
    pub schema_version: u8,
}

impl PropertyBook {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            rooms: Vec::new(),
            people: Vec::new(),
            payments: Vec::new(),
            logs: Vec::new(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn room(&self, id: Uuid) -> Option<&Room> {
        self.rooms.iter().find(|room| room.id == id)
    }

    pub fn room_mut(&mut self, id: Uuid) -> Option<&mut Room> {
        self.rooms.iter_mut().find(|room| room.id == id)
    }

    pub fn room_by_number(&self, readable_id: u32) -> Option<&Room> {
        self.rooms.iter().find(|room| room.readable_id == readable_id)
    }

    pub fn person(&self, id: Uuid) -> Option<&Person> {
        self.people.iter().find(|person| person.id == id)
    }

    pub fn person_mut(&mut self, id: Uuid) -> Option<&mut Person> {
        self.people.iter_mut().find(|person| person.id == id)
    }

    /// The person currently assigned to `room_id`, if any.
    pub fn occupant_of(&self, room_id: Uuid) -> Option<&Person> {
        self.people
            .iter()
            .find(|person| person.room_id == Some(room_id))
    }

    pub fn payment(&self, id: Uuid) -> Option<&Payment> {
        self.payments.iter().find(|payment| payment.id == id)
    }

    pub fn payment_mut(&mut self, id: Uuid) -> Option<&mut Payment> {
        self.payments.iter_mut().find(|payment| payment.id == id)
    }

    pub fn push_log(&mut self, entry: ActivityLog) {
        self.logs.push(entry);
        self.touch();
    }

    /// Latest billing period that has any payment booked against it.
    pub fn latest_recorded_period(&self) -> Option<BillingPeriod> {
        self.payments.iter().map(Payment::period).max()
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}
