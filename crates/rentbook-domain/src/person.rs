use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    calendar::BsDate,
    common::{Displayable, Identifiable},
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// A tenant household, optionally assigned to a room.
pub struct Person {
    pub id: Uuid,
    pub name: String,
    pub number_of_people: u32,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub room_id: Option<Uuid>,
    /// Move-in date; its month is the first billing period of the tenancy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_on: Option<BsDate>,
    /// Day of the month rent is expected by.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline_day: Option<u32>,
    pub created_at: DateTime<Utc>,
}

impl Person {
    pub fn new(name: impl Into<String>, number_of_people: u32, phone: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            number_of_people,
            phone: phone.into(),
            email: None,
            room_id: None,
            assigned_on: None,
            deadline_day: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_deadline_day(mut self, day: u32) -> Self {
        self.deadline_day = Some(day);
        self
    }
}

impl Identifiable for Person {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for Person {
    fn display_label(&self) -> String {
        format!("{} ({})", self.name, self.phone)
    }
}
