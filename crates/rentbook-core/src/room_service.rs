use rust_decimal::Decimal;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use rentbook_domain::{ensure_non_negative, round2, ActivityKind, PropertyBook, Room};

use crate::{ActivityService, CoreError};

/// Partial update for a room; `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct RoomUpdate {
    pub rent: Option<Decimal>,
    pub water_price: Option<Decimal>,
    pub is_occupied: Option<bool>,
}

impl RoomUpdate {
    pub fn is_empty(&self) -> bool {
        self.rent.is_none() && self.water_price.is_none() && self.is_occupied.is_none()
    }
}

pub struct RoomService;

impl RoomService {
    pub fn add(
        book: &mut PropertyBook,
        readable_id: u32,
        rent: Decimal,
        water_price: Decimal,
    ) -> Result<Uuid, CoreError> {
        if readable_id == 0 {
            return Err(CoreError::Validation("room number must be positive".into()));
        }
        if book.room_by_number(readable_id).is_some() {
            return Err(CoreError::Validation(format!(
                "room {readable_id} already exists"
            )));
        }
        let rent = round2(ensure_non_negative("rent", rent)?);
        let water_price = round2(ensure_non_negative("water price", water_price)?);

        let room = Room::new(readable_id, rent, water_price);
        let id = room.id;
        book.rooms.push(room);
        ActivityService::record(
            book,
            ActivityKind::RoomCreated,
            Some(id),
            format!("Room {readable_id} created"),
            Some(json!({ "readable_id": readable_id, "rent": rent, "water_price": water_price })),
        );
        info!(room = readable_id, %rent, %water_price, "room added");
        Ok(id)
    }

    pub fn update(book: &mut PropertyBook, id: Uuid, changes: RoomUpdate) -> Result<(), CoreError> {
        if changes.is_empty() {
            return Err(CoreError::Validation("nothing to update".into()));
        }
        let rent = changes
            .rent
            .map(|value| ensure_non_negative("rent", value).map(round2))
            .transpose()?;
        let water_price = changes
            .water_price
            .map(|value| ensure_non_negative("water price", value).map(round2))
            .transpose()?;

        let room = book
            .room_mut(id)
            .ok_or_else(|| CoreError::RoomNotFound(id.to_string()))?;
        if let Some(rent) = rent {
            room.rent = rent;
        }
        if let Some(water_price) = water_price {
            room.water_price = water_price;
        }
        if let Some(occupied) = changes.is_occupied {
            room.is_occupied = occupied;
        }
        let readable_id = room.readable_id;
        let meta = json!({
            "rent": room.rent,
            "water_price": room.water_price,
            "is_occupied": room.is_occupied,
        });
        ActivityService::record(
            book,
            ActivityKind::RoomUpdated,
            Some(id),
            format!("Room {readable_id} updated"),
            Some(meta),
        );
        info!(room = readable_id, "room updated");
        Ok(())
    }

    pub fn remove(book: &mut PropertyBook, id: Uuid) -> Result<(), CoreError> {
        let room = book
            .room(id)
            .ok_or_else(|| CoreError::RoomNotFound(id.to_string()))?;
        let readable_id = room.readable_id;
        if room.is_occupied || book.occupant_of(id).is_some() {
            return Err(CoreError::InvalidOperation(format!(
                "room {readable_id} is occupied"
            )));
        }
        if book.payments.iter().any(|payment| payment.room_id == id) {
            return Err(CoreError::InvalidOperation(format!(
                "room {readable_id} has recorded payments"
            )));
        }
        book.rooms.retain(|room| room.id != id);
        ActivityService::record(
            book,
            ActivityKind::RoomDeleted,
            Some(id),
            format!("Room {readable_id} deleted"),
            None,
        );
        info!(room = readable_id, "room removed");
        Ok(())
    }

    /// Rooms ordered by their door number.
    pub fn list(book: &PropertyBook) -> Vec<&Room> {
        let mut rooms: Vec<&Room> = book.rooms.iter().collect();
        rooms.sort_by_key(|room| room.readable_id);
        rooms
    }

    pub fn find_by_number(book: &PropertyBook, readable_id: u32) -> Result<&Room, CoreError> {
        book.room_by_number(readable_id)
            .ok_or_else(|| CoreError::RoomNotFound(format!("room {readable_id}")))
    }
}
