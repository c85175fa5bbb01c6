//! Application facade: owns the loaded property book, its storage, and configuration.
//!
//! Every mutation runs against a draft copy of the book and is persisted before the
//! draft replaces the in-memory state, so a failed command leaves nothing half applied.

use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use rentbook_config::{Config, ConfigManager};
use rentbook_core::{
    book_warnings, ActivityService, BookBackupInfo, ChainedAnchor, Clock, CoreError,
    FixedAnchor, LatestRecordedAnchor, MonthlyIncome, NewPerson, OverduePeriod, Page,
    PageRequest, PaymentFilter, PaymentPreview, PaymentRequest, PaymentService, PeriodAnchor,
    PersonService, PersonUpdate, PropertyStorage, RoomAttention, RoomService, RoomUpdate,
    SummaryService, SystemClock,
};
use rentbook_domain::{
    ActivityLog, AdministrativeStatus, BillingPeriod, BsDate, EntityKind, Payment, Person,
    PropertyBook, Room,
};
use rentbook_storage_json::{JsonBookStorage, StoragePaths};

use crate::errors::RentbookError;

pub type AppResult<T> = Result<T, RentbookError>;

/// What happened while opening the book.
#[derive(Debug, Clone, Default)]
pub struct OpenReport {
    pub created: bool,
    pub warnings: Vec<String>,
}

pub struct RentbookApp {
    storage: Box<dyn PropertyStorage>,
    config_manager: ConfigManager,
    config: Config,
    book: PropertyBook,
    clock: Box<dyn Clock>,
}

impl RentbookApp {
    /// Opens the configured book under the manager's base directory, creating it if needed.
    pub fn open(config_manager: ConfigManager) -> AppResult<(Self, OpenReport)> {
        let config = config_manager.load()?;
        let data_root = config.resolve_data_root(config_manager.base_dir());
        let storage =
            JsonBookStorage::with_retention(StoragePaths::under(&data_root), config.backup_retention)?;
        Self::with_storage(Box::new(storage), config_manager, config, Box::new(SystemClock))
    }

    pub fn with_storage(
        storage: Box<dyn PropertyStorage>,
        config_manager: ConfigManager,
        config: Config,
        clock: Box<dyn Clock>,
    ) -> AppResult<(Self, OpenReport)> {
        let name = config.book_name.clone();
        let (book, created) = if storage.book_exists(&name) {
            (storage.load_book(&name)?, false)
        } else {
            let book = PropertyBook::new(&name);
            storage.save_book(&name, &book)?;
            info!(book = %name, "created new property book");
            (book, true)
        };
        let warnings = book_warnings(&book);
        for warning in &warnings {
            warn!(book = %name, "{warning}");
        }
        let app = Self {
            storage,
            config_manager,
            config,
            book,
            clock,
        };
        Ok((app, OpenReport { created, warnings }))
    }

    pub fn book(&self) -> &PropertyBook {
        &self.book
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_manager(&self) -> &ConfigManager {
        &self.config_manager
    }

    pub fn book_name(&self) -> &str {
        &self.config.book_name
    }

    /// The pinned period from configuration, else the latest period with a payment.
    pub fn as_of(&self) -> AppResult<BillingPeriod> {
        let mut anchor = ChainedAnchor::new();
        if let Some(period) = self.config.current_period {
            anchor = anchor.then(FixedAnchor(period));
        }
        anchor
            .then(LatestRecordedAnchor)
            .current_period(&self.book)
            .ok_or(RentbookError::NoCurrentPeriod)
    }

    /// Pins (or with `None`, unpins) the current billing period and saves the configuration.
    pub fn set_as_of(&mut self, period: Option<BillingPeriod>) -> AppResult<()> {
        let mut config = self.config.clone();
        config.current_period = period;
        self.config_manager.save(&config)?;
        self.config = config;
        Ok(())
    }

    pub fn set_config_value(&mut self, key: &str, value: &str) -> AppResult<()> {
        let mut config = self.config.clone();
        config.set(key, value)?;
        self.config_manager.save(&config)?;
        self.config = config;
        info!(key, value, "configuration updated");
        Ok(())
    }

    /// Replaces the configuration with a saved backup. Storage settings apply on next open.
    pub fn restore_config(&mut self, backup_name: &str) -> AppResult<()> {
        let config = self.config_manager.restore(backup_name)?;
        self.config_manager.save(&config)?;
        self.config = config;
        info!(backup = backup_name, "configuration restored");
        Ok(())
    }

    pub fn rooms(&self) -> Vec<&Room> {
        RoomService::list(&self.book)
    }

    pub fn room_id(&self, number: u32) -> AppResult<Uuid> {
        Ok(RoomService::find_by_number(&self.book, number)?.id)
    }

    pub fn add_room(&mut self, number: u32, rent: Decimal, water: Decimal) -> AppResult<Uuid> {
        self.commit(|book| RoomService::add(book, number, rent, water))
    }

    pub fn update_room(&mut self, number: u32, changes: RoomUpdate) -> AppResult<()> {
        let id = self.room_id(number)?;
        self.commit(|book| RoomService::update(book, id, changes))
    }

    pub fn remove_room(&mut self, number: u32) -> AppResult<()> {
        let id = self.room_id(number)?;
        self.commit(|book| RoomService::remove(book, id))
    }

    pub fn people(&self) -> Vec<&Person> {
        PersonService::list(&self.book)
    }

    pub fn person_id(&self, name: &str) -> AppResult<Uuid> {
        Ok(PersonService::find_by_name(&self.book, name)?.id)
    }

    pub fn add_person(&mut self, person: NewPerson) -> AppResult<Uuid> {
        self.commit(|book| PersonService::add(book, person))
    }

    pub fn update_person(&mut self, name: &str, changes: PersonUpdate) -> AppResult<()> {
        let id = self.person_id(name)?;
        self.commit(|book| PersonService::update(book, id, changes))
    }

    pub fn assign_person(&mut self, name: &str, room: u32, on: BsDate) -> AppResult<()> {
        let person_id = self.person_id(name)?;
        let room_id = self.room_id(room)?;
        self.commit(|book| PersonService::assign(book, person_id, room_id, on))
    }

    pub fn unassign_person(&mut self, name: &str) -> AppResult<()> {
        let id = self.person_id(name)?;
        self.commit(|book| PersonService::unassign(book, id))
    }

    pub fn remove_person(&mut self, name: &str) -> AppResult<()> {
        let id = self.person_id(name)?;
        self.commit(|book| PersonService::remove(book, id))
    }

    /// Books a payment at the configured unit rate and returns the stored entry.
    pub fn record_payment(&mut self, request: PaymentRequest) -> AppResult<&Payment> {
        let as_of = self.as_of().unwrap_or(request.period);
        let unit_rate = self.config.unit_rate;
        let recorded_at = self.clock.now();
        let id = self.commit(|book| {
            PaymentService::record(book, request, unit_rate, as_of, recorded_at)
        })?;
        self.book
            .payment(id)
            .ok_or_else(|| CoreError::PaymentNotFound(id).into())
    }

    pub fn preview_payment(&self, request: &PaymentRequest) -> AppResult<PaymentPreview> {
        let as_of = self.as_of().unwrap_or(request.period);
        Ok(PaymentService::preview(
            &self.book,
            request,
            self.config.unit_rate,
            as_of,
            self.clock.now(),
        )?)
    }

    pub fn suggest_period(&self, room: u32) -> AppResult<BillingPeriod> {
        let room_id = self.room_id(room)?;
        let as_of = self.as_of()?;
        Ok(PaymentService::suggest_period(&self.book, room_id, as_of)?)
    }

    /// Marks the payment whose id starts with `prefix` as failed or refunded.
    pub fn void_payment(&mut self, prefix: &str, status: AdministrativeStatus) -> AppResult<Uuid> {
        let id = self.payment_by_prefix(prefix)?;
        self.commit(|book| PaymentService::mark_administrative(book, id, status))?;
        Ok(id)
    }

    pub fn payments(&self, filter: &PaymentFilter, page: PageRequest) -> Page<&Payment> {
        PaymentService::list(&self.book, filter, page)
    }

    pub fn overdue(&self, room: u32) -> AppResult<Vec<OverduePeriod>> {
        let room_id = self.room_id(room)?;
        Ok(PaymentService::overdue(&self.book, room_id, self.as_of()?)?)
    }

    pub fn rooms_by_attention(&self) -> AppResult<Vec<RoomAttention>> {
        Ok(PaymentService::rooms_by_attention(&self.book, self.as_of()?)?)
    }

    /// Monthly and cumulative rent income for a Bikram Sambat year.
    pub fn income(&self, year: i32) -> AppResult<(Vec<MonthlyIncome>, Vec<MonthlyIncome>)> {
        Ok((
            SummaryService::monthly_series(&self.book, year)?,
            SummaryService::cumulative_series(&self.book, year)?,
        ))
    }

    pub fn logs(&self, entity: Option<EntityKind>, page: PageRequest) -> Page<&ActivityLog> {
        ActivityService::list(&self.book, entity, page)
    }

    pub fn backup(&self, note: Option<&str>) -> AppResult<BookBackupInfo> {
        let info = self
            .storage
            .backup_book(&self.config.book_name, &self.book, note)?;
        info!(backup = %info.id, "backup created");
        Ok(info)
    }

    /// Backups of the current book, newest first.
    pub fn backups(&self) -> AppResult<Vec<BookBackupInfo>> {
        Ok(self.storage.list_backups(&self.config.book_name)?)
    }

    /// Restores the backup named `id`, replacing the in-memory book.
    pub fn restore(&mut self, id: &str) -> AppResult<BookBackupInfo> {
        let backup = self
            .backups()?
            .into_iter()
            .find(|backup| backup.id == id)
            .ok_or_else(|| CoreError::Storage(format!("backup `{id}` not found")))?;
        self.book = self.storage.restore_backup(&backup)?;
        info!(backup = %backup.id, "backup restored");
        Ok(backup)
    }

    fn payment_by_prefix(&self, prefix: &str) -> AppResult<Uuid> {
        let needle = prefix.trim().to_ascii_lowercase().replace('-', "");
        if needle.is_empty() {
            return Err(CoreError::InvalidInput("payment id must not be empty".into()).into());
        }
        let mut matches = self
            .book
            .payments
            .iter()
            .filter(|payment| payment.id.simple().to_string().starts_with(&needle));
        match (matches.next(), matches.next()) {
            (Some(payment), None) => Ok(payment.id),
            (Some(_), Some(_)) => Err(CoreError::InvalidInput(format!(
                "payment id `{prefix}` is ambiguous"
            ))
            .into()),
            (None, _) => Err(CoreError::InvalidInput(format!("no payment matches `{prefix}`")).into()),
        }
    }

    fn commit<T>(
        &mut self,
        change: impl FnOnce(&mut PropertyBook) -> Result<T, CoreError>,
    ) -> AppResult<T> {
        let mut draft = self.book.clone();
        let value = change(&mut draft)?;
        self.storage.save_book(&self.config.book_name, &draft)?;
        self.book = draft;
        Ok(value)
    }
}
