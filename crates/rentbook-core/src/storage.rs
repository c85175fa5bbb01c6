use std::collections::HashSet;
use std::path::PathBuf;

use rentbook_domain::PropertyBook;

use crate::{CoreError, LedgerEngine};

/// Describes a persisted backup snapshot of a property book.
#[derive(Debug, Clone)]
pub struct BookBackupInfo {
    pub book: String,
    pub id: String,
    pub created_at: String,
    pub path: PathBuf,
}

/// Persistence backends that store whole property book snapshots and their backups.
///
/// Payments are appended by the services; a backend only ever sees complete snapshots.
pub trait PropertyStorage: Send + Sync {
    fn save_book(&self, name: &str, book: &PropertyBook) -> Result<(), CoreError>;
    fn load_book(&self, name: &str) -> Result<PropertyBook, CoreError>;
    fn book_exists(&self, name: &str) -> bool;
    fn list_books(&self) -> Result<Vec<String>, CoreError>;
    fn backup_book(
        &self,
        name: &str,
        book: &PropertyBook,
        note: Option<&str>,
    ) -> Result<BookBackupInfo, CoreError>;
    fn list_backups(&self, name: &str) -> Result<Vec<BookBackupInfo>, CoreError>;
    fn restore_backup(&self, backup: &BookBackupInfo) -> Result<PropertyBook, CoreError>;
}

/// Detects dangling references and unreconciled ledger entries in a loaded snapshot.
pub fn book_warnings(book: &PropertyBook) -> Vec<String> {
    let room_ids: HashSet<_> = book.rooms.iter().map(|room| room.id).collect();
    let person_ids: HashSet<_> = book.people.iter().map(|person| person.id).collect();
    let mut warnings = Vec::new();

    let mut numbers = HashSet::new();
    for room in &book.rooms {
        if !numbers.insert(room.readable_id) {
            warnings.push(format!("room number {} is used twice", room.readable_id));
        }
    }

    for person in &book.people {
        if let Some(room_id) = person.room_id {
            if !room_ids.contains(&room_id) {
                warnings.push(format!(
                    "person {} is assigned to unknown room {}",
                    person.name, room_id
                ));
            }
        }
    }

    for payment in &book.payments {
        if !room_ids.contains(&payment.room_id) {
            warnings.push(format!(
                "payment {} references unknown room {}",
                payment.id, payment.room_id
            ));
        }
        if !person_ids.contains(&payment.person_id) {
            warnings.push(format!(
                "payment {} references unknown person {}",
                payment.id, payment.person_id
            ));
        }
        if let Err(err) = LedgerEngine::verify_record(&payment.record) {
            warnings.push(format!("payment {}: {}", payment.id, err));
        }
    }
    warnings
}
