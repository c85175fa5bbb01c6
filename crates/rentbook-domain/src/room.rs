use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::{Displayable, Identifiable};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// A rentable room with its fixed monthly prices.
pub struct Room {
    pub id: Uuid,
    /// Number painted on the door; unique within a property.
    pub readable_id: u32,
    pub rent: Decimal,
    #[serde(default)]
    pub water_price: Decimal,
    #[serde(default)]
    pub is_occupied: bool,
    pub created_at: DateTime<Utc>,
}

impl Room {
    pub fn new(readable_id: u32, rent: Decimal, water_price: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            readable_id,
            rent,
            water_price,
            is_occupied: false,
            created_at: Utc::now(),
        }
    }
}

impl Identifiable for Room {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for Room {
    fn display_label(&self) -> String {
        format!("Room {}", self.readable_id)
    }
}
