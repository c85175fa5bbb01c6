use serde_json::json;
use tracing::info;
use uuid::Uuid;

use rentbook_domain::{ActivityKind, BsDate, Person, PropertyBook};

use crate::{ActivityService, CoreError};

/// Input for [`PersonService::add`].
#[derive(Debug, Clone)]
pub struct NewPerson {
    pub name: String,
    pub number_of_people: u32,
    pub phone: String,
    pub email: Option<String>,
    pub deadline_day: Option<u32>,
    /// Room to move into straight away, with the move-in date.
    pub assignment: Option<(Uuid, BsDate)>,
}

impl NewPerson {
    pub fn new(name: impl Into<String>, number_of_people: u32, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            number_of_people,
            phone: phone.into(),
            email: None,
            deadline_day: None,
            assignment: None,
        }
    }

    pub fn assigned_to(mut self, room_id: Uuid, on: BsDate) -> Self {
        self.assignment = Some((room_id, on));
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct PersonUpdate {
    pub name: Option<String>,
    pub number_of_people: Option<u32>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub deadline_day: Option<u32>,
}

pub struct PersonService;

impl PersonService {
    pub fn add(book: &mut PropertyBook, new: NewPerson) -> Result<Uuid, CoreError> {
        let name = Self::validate_name(&new.name)?;
        Self::validate_household(new.number_of_people)?;
        let phone = Self::validate_phone(&new.phone)?;
        if let Some(day) = new.deadline_day {
            Self::validate_deadline(day)?;
        }
        if let Some((room_id, _)) = new.assignment {
            Self::ensure_vacant(book, room_id)?;
        }

        let mut person = Person::new(name, new.number_of_people, phone);
        person.email = new.email.filter(|email| !email.trim().is_empty());
        person.deadline_day = new.deadline_day;
        let id = person.id;
        let label = person.name.clone();
        book.people.push(person);
        ActivityService::record(
            book,
            ActivityKind::PersonCreated,
            Some(id),
            format!("{label} added"),
            Some(json!({ "number_of_people": new.number_of_people })),
        );
        info!(person = %label, "person added");

        if let Some((room_id, on)) = new.assignment {
            Self::assign(book, id, room_id, on)?;
        }
        Ok(id)
    }

    pub fn update(book: &mut PropertyBook, id: Uuid, changes: PersonUpdate) -> Result<(), CoreError> {
        let name = changes.name.as_deref().map(Self::validate_name).transpose()?;
        let phone = changes.phone.as_deref().map(Self::validate_phone).transpose()?;
        if let Some(count) = changes.number_of_people {
            Self::validate_household(count)?;
        }
        if let Some(day) = changes.deadline_day {
            Self::validate_deadline(day)?;
        }

        let person = book
            .person_mut(id)
            .ok_or_else(|| CoreError::PersonNotFound(id.to_string()))?;
        if let Some(name) = name {
            person.name = name;
        }
        if let Some(phone) = phone {
            person.phone = phone;
        }
        if let Some(count) = changes.number_of_people {
            person.number_of_people = count;
        }
        if let Some(email) = changes.email {
            person.email = Some(email).filter(|email| !email.trim().is_empty());
        }
        if let Some(day) = changes.deadline_day {
            person.deadline_day = Some(day);
        }
        let label = person.name.clone();
        ActivityService::record(
            book,
            ActivityKind::PersonUpdated,
            Some(id),
            format!("{label} updated"),
            None,
        );
        Ok(())
    }

    /// Moves a person into a vacant room, freeing whichever room they held before.
    pub fn assign(
        book: &mut PropertyBook,
        person_id: Uuid,
        room_id: Uuid,
        on: BsDate,
    ) -> Result<(), CoreError> {
        let previous = book
            .person(person_id)
            .ok_or_else(|| CoreError::PersonNotFound(person_id.to_string()))?
            .room_id;
        if previous == Some(room_id) {
            return Err(CoreError::InvalidOperation(
                "person already occupies that room".into(),
            ));
        }
        Self::ensure_vacant(book, room_id)?;

        if let Some(old_room) = previous {
            Self::set_occupied(book, old_room, false);
        }
        let readable_id = Self::set_occupied(book, room_id, true);
        let person = book
            .person_mut(person_id)
            .ok_or_else(|| CoreError::PersonNotFound(person_id.to_string()))?;
        person.room_id = Some(room_id);
        person.assigned_on = Some(on);
        let label = person.name.clone();

        ActivityService::record(
            book,
            ActivityKind::PersonUpdated,
            Some(person_id),
            format!("{label} assigned to room {}", readable_id.unwrap_or_default()),
            Some(json!({ "room_id": room_id, "assigned_on": on.to_string() })),
        );
        info!(person = %label, room = ?readable_id, %on, "person assigned");
        Ok(())
    }

    pub fn unassign(book: &mut PropertyBook, person_id: Uuid) -> Result<(), CoreError> {
        let person = book
            .person_mut(person_id)
            .ok_or_else(|| CoreError::PersonNotFound(person_id.to_string()))?;
        let room_id = person.room_id.take().ok_or_else(|| {
            CoreError::InvalidOperation(format!("{} has no room assigned", person.name))
        })?;
        person.assigned_on = None;
        let label = person.name.clone();
        let readable_id = Self::set_occupied(book, room_id, false);
        ActivityService::record(
            book,
            ActivityKind::PersonUpdated,
            Some(person_id),
            format!("{label} left room {}", readable_id.unwrap_or_default()),
            Some(json!({ "room_id": room_id })),
        );
        info!(person = %label, room = ?readable_id, "person unassigned");
        Ok(())
    }

    pub fn remove(book: &mut PropertyBook, id: Uuid) -> Result<(), CoreError> {
        let person = book
            .person(id)
            .ok_or_else(|| CoreError::PersonNotFound(id.to_string()))?;
        if book.payments.iter().any(|payment| payment.person_id == id) {
            return Err(CoreError::InvalidOperation(format!(
                "{} has recorded payments",
                person.name
            )));
        }
        let label = person.name.clone();
        if let Some(room_id) = person.room_id {
            Self::set_occupied(book, room_id, false);
        }
        book.people.retain(|person| person.id != id);
        ActivityService::record(
            book,
            ActivityKind::PersonDeleted,
            Some(id),
            format!("{label} removed"),
            None,
        );
        info!(person = %label, "person removed");
        Ok(())
    }

    /// People sorted by name, case-insensitively.
    pub fn list(book: &PropertyBook) -> Vec<&Person> {
        let mut people: Vec<&Person> = book.people.iter().collect();
        people.sort_by_key(|person| person.name.to_lowercase());
        people
    }

    /// Finds a person by exact name, ignoring case.
    pub fn find_by_name<'a>(book: &'a PropertyBook, name: &str) -> Result<&'a Person, CoreError> {
        let needle = name.trim().to_lowercase();
        let mut matches = book
            .people
            .iter()
            .filter(|person| person.name.trim().to_lowercase() == needle);
        match (matches.next(), matches.next()) {
            (Some(person), None) => Ok(person),
            (Some(_), Some(_)) => Err(CoreError::Validation(format!(
                "more than one person is named `{name}`"
            ))),
            (None, _) => Err(CoreError::PersonNotFound(name.to_string())),
        }
    }

    fn ensure_vacant(book: &PropertyBook, room_id: Uuid) -> Result<(), CoreError> {
        let room = book
            .room(room_id)
            .ok_or_else(|| CoreError::RoomNotFound(room_id.to_string()))?;
        if room.is_occupied || book.occupant_of(room_id).is_some() {
            Err(CoreError::InvalidOperation(format!(
                "room {} is already occupied",
                room.readable_id
            )))
        } else {
            Ok(())
        }
    }

    fn set_occupied(book: &mut PropertyBook, room_id: Uuid, occupied: bool) -> Option<u32> {
        book.room_mut(room_id).map(|room| {
            room.is_occupied = occupied;
            room.readable_id
        })
    }

    fn validate_name(candidate: &str) -> Result<String, CoreError> {
        let trimmed = candidate.trim();
        if trimmed.is_empty() {
            Err(CoreError::Validation("name must not be empty".into()))
        } else {
            Ok(trimmed.to_string())
        }
    }

    fn validate_phone(candidate: &str) -> Result<String, CoreError> {
        let trimmed = candidate.trim();
        if trimmed.is_empty() {
            Err(CoreError::Validation("phone must not be empty".into()))
        } else {
            Ok(trimmed.to_string())
        }
    }

    fn validate_household(count: u32) -> Result<(), CoreError> {
        if count == 0 {
            Err(CoreError::Validation(
                "number of people must be at least 1".into(),
            ))
        } else {
            Ok(())
        }
    }

    fn validate_deadline(day: u32) -> Result<(), CoreError> {
        if (1..=32).contains(&day) {
            Ok(())
        } else {
            Err(CoreError::Validation(format!(
                "deadline day {day} is outside 1..=32"
            )))
        }
    }
}
