use std::{
    cmp::Reverse,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::{debug, warn};

use rentbook_core::{book_warnings, BookBackupInfo, CoreError, PropertyStorage};
use rentbook_domain::{PropertyBook, CURRENT_SCHEMA_VERSION};

const BOOK_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const TMP_SUFFIX: &str = "tmp";
pub const DEFAULT_RETENTION: usize = 5;

/// Where books and their backups live on disk.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    pub book_root: PathBuf,
    pub backup_root: PathBuf,
}

impl StoragePaths {
    /// `books/` and `backups/` under one data directory.
    pub fn under(root: &Path) -> Self {
        Self {
            book_root: root.join("books"),
            backup_root: root.join("backups"),
        }
    }
}

/// Filesystem-backed JSON persistence for property books and their backups.
#[derive(Debug, Clone)]
pub struct JsonBookStorage {
    paths: StoragePaths,
    retention: usize,
}

impl JsonBookStorage {
    pub fn new(paths: StoragePaths) -> Result<Self, CoreError> {
        Self::with_retention(paths, DEFAULT_RETENTION)
    }

    pub fn with_retention(paths: StoragePaths, retention: usize) -> Result<Self, CoreError> {
        fs::create_dir_all(&paths.book_root)?;
        fs::create_dir_all(&paths.backup_root)?;
        Ok(Self {
            paths,
            retention: retention.max(1),
        })
    }

    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }

    pub fn book_path(&self, name: &str) -> PathBuf {
        self.paths
            .book_root
            .join(format!("{}.{}", canonical_name(name), BOOK_EXTENSION))
    }

    pub fn list_backup_metadata(&self, name: &str) -> Result<Vec<BackupMetadata>, CoreError> {
        let mut rows = Vec::new();
        for entry in self.list_backups(name)? {
            let size_bytes = fs::metadata(&entry.path)
                .map(|meta| meta.len())
                .unwrap_or(0);
            rows.push(BackupMetadata {
                created_at: parse_backup_timestamp(&entry.id),
                name: entry.id,
                size_bytes,
                path: entry.path,
            });
        }
        Ok(rows)
    }

    fn backup_dir(&self, name: &str) -> PathBuf {
        self.paths.backup_root.join(canonical_name(name))
    }

    /// Picks a file name that sorts after every backup already taken in the same second.
    fn next_backup_path(&self, name: &str, note: Option<&str>) -> (PathBuf, String, String) {
        let dir = self.backup_dir(name);
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let prefix = format!("{}_{}", canonical_name(name), timestamp);
        let sequence = fs::read_dir(&dir)
            .into_iter()
            .flatten()
            .flatten()
            .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
            .filter(|file_name| file_name.starts_with(&prefix))
            .map(|file_name| backup_sequence(&file_name) + 1)
            .max()
            .unwrap_or(0);

        let mut stem = prefix;
        if sequence > 0 {
            stem.push_str(&format!("-{sequence}"));
        }
        if let Some(label) = sanitize_backup_note(note) {
            stem.push('_');
            stem.push_str(&label);
        }
        let file_name = format!("{stem}.{BOOK_EXTENSION}");
        (dir.join(&file_name), file_name, timestamp)
    }

    fn backup_existing_file(&self, name: &str, path: &Path) -> Result<(), CoreError> {
        if !path.exists() {
            return Ok(());
        }
        fs::create_dir_all(self.backup_dir(name))?;
        let (backup_path, file_name, _) = self.next_backup_path(name, None);
        fs::copy(path, &backup_path)?;
        debug!(book = name, backup = %file_name, "previous snapshot copied to backups");
        self.prune_backups(name)
    }

    fn prune_backups(&self, name: &str) -> Result<(), CoreError> {
        let entries = self.list_backups(name)?;
        for entry in entries.into_iter().skip(self.retention) {
            if let Err(err) = fs::remove_file(&entry.path) {
                warn!(backup = %entry.id, error = %err, "failed to prune backup");
            }
        }
        Ok(())
    }
}

impl PropertyStorage for JsonBookStorage {
    fn save_book(&self, name: &str, book: &PropertyBook) -> Result<(), CoreError> {
        let path = self.book_path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        self.backup_existing_file(name, &path)?;
        save_book_to_path(book, &path)
    }

    fn load_book(&self, name: &str) -> Result<PropertyBook, CoreError> {
        let path = self.book_path(name);
        if !path.exists() {
            return Err(CoreError::Storage(format!("book `{name}` not found")));
        }
        load_book_from_path(&path)
    }

    fn book_exists(&self, name: &str) -> bool {
        self.book_path(name).is_file()
    }

    fn list_books(&self) -> Result<Vec<String>, CoreError> {
        if !self.paths.book_root.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.paths.book_root)? {
            let path = entry?.path();
            if !path.is_file()
                || path.extension().and_then(|ext| ext.to_str()) != Some(BOOK_EXTENSION)
            {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn backup_book(
        &self,
        name: &str,
        book: &PropertyBook,
        note: Option<&str>,
    ) -> Result<BookBackupInfo, CoreError> {
        fs::create_dir_all(self.backup_dir(name))?;
        let (path, file_name, timestamp) = self.next_backup_path(name, note);
        write_atomic(&path, &serialize_book(book)?)?;
        self.prune_backups(name)?;
        Ok(BookBackupInfo {
            book: canonical_name(name),
            id: file_name,
            created_at: timestamp,
            path,
        })
    }

    /// Newest first.
    fn list_backups(&self, name: &str) -> Result<Vec<BookBackupInfo>, CoreError> {
        let dir = self.backup_dir(name);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let slug = canonical_name(name);
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BOOK_EXTENSION) {
                continue;
            }
            if let Some(file_name) = path.file_name().and_then(|name| name.to_str()) {
                entries.push(BookBackupInfo {
                    book: slug.clone(),
                    id: file_name.to_string(),
                    created_at: parse_backup_timestamp(file_name)
                        .map(|ts| ts.to_rfc3339())
                        .unwrap_or_else(|| file_name.to_string()),
                    path: path.clone(),
                });
            }
        }
        entries.sort_by_key(|info| {
            Reverse((
                parse_backup_timestamp(&info.id),
                backup_sequence(&info.id),
                info.id.clone(),
            ))
        });
        Ok(entries)
    }

    fn restore_backup(&self, backup: &BookBackupInfo) -> Result<PropertyBook, CoreError> {
        if !backup.path.exists() {
            return Err(CoreError::Storage(format!(
                "backup `{}` not found",
                backup.id
            )));
        }
        let book = load_book_from_path(&backup.path)?;
        let target = self.book_path(&backup.book);
        self.backup_existing_file(&backup.book, &target)?;
        save_book_to_path(&book, &target)?;
        Ok(book)
    }
}

/// Saves a book to an arbitrary path through a temp file and rename.
pub fn save_book_to_path(book: &PropertyBook, path: &Path) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    write_atomic(&tmp, &serialize_book(book)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Loads a book and reports anything suspicious in it through `tracing`.
pub fn load_book_from_path(path: &Path) -> Result<PropertyBook, CoreError> {
    let data = fs::read_to_string(path)?;
    let book: PropertyBook =
        serde_json::from_str(&data).map_err(|err| CoreError::Serde(err.to_string()))?;
    if book.schema_version > CURRENT_SCHEMA_VERSION {
        return Err(CoreError::Storage(format!(
            "book schema version {} is newer than supported version {}",
            book.schema_version, CURRENT_SCHEMA_VERSION
        )));
    }
    for warning in book_warnings(&book) {
        warn!(path = %path.display(), "{warning}");
    }
    Ok(book)
}

#[derive(Debug, Clone)]
pub struct BackupMetadata {
    pub name: String,
    pub created_at: Option<DateTime<Utc>>,
    pub size_bytes: u64,
    pub path: PathBuf,
}

fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches(|c| c == '_' || c == '-').is_empty() {
        "property".into()
    } else {
        sanitized
    }
}

fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if !sanitized.is_empty() && !last_dash {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-').to_string();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Finds the `YYYYMMDD_HHMMSS` pair anywhere in a backup file name.
fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let stem = name.strip_suffix(&format!(".{BOOK_EXTENSION}"))?;
    let segments: Vec<&str> = stem.split('_').collect();
    segments.windows(2).find_map(|pair| {
        let time = pair[1].split('-').next()?;
        if !is_digits(pair[0], 8) || !is_digits(time, 6) {
            return None;
        }
        NaiveDateTime::parse_from_str(&format!("{}{}", pair[0], time), "%Y%m%d%H%M%S")
            .ok()
            .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
    })
}

/// Same-second backups carry a `-N` suffix on the time segment.
fn backup_sequence(name: &str) -> u32 {
    name.split('_')
        .find_map(|segment| {
            let (time, seq) = segment.split_once('-')?;
            if is_digits(time, 6) {
                seq.split('.').next()?.parse().ok()
            } else {
                None
            }
        })
        .unwrap_or(0)
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.{TMP_SUFFIX}"),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    Ok(())
}

fn serialize_book(book: &PropertyBook) -> Result<String, CoreError> {
    serde_json::to_string_pretty(book).map_err(|err| CoreError::Serde(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_slugged() {
        assert_eq!(canonical_name("Sharma Niwas"), "sharma_niwas");
        assert_eq!(canonical_name("  "), "property");
    }

    #[test]
    fn backup_names_round_trip_their_timestamp() {
        let parsed = parse_backup_timestamp("property_20241001_101530-2_before-import.json")
            .expect("timestamp");
        assert_eq!(parsed.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-10-01 10:15:30");
        assert_eq!(
            backup_sequence("property_20241001_101530-2_before-import.json"),
            2
        );
        assert_eq!(backup_sequence("property_20241001_101530.json"), 0);
    }

    #[test]
    fn notes_are_sanitized() {
        assert_eq!(
            sanitize_backup_note(Some(" Before Dashain!! ")),
            Some("before-dashain".into())
        );
        assert_eq!(sanitize_backup_note(Some("***")), None);
    }
}
