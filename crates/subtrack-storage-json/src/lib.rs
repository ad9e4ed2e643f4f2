use std::{
    cmp::Reverse,
    fs::{self, File},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use chrono::{Duration, NaiveDateTime, Utc};
use subtrack_core::{
    storage::{BackupInfo, SubscriptionRepository},
    StorageError,
};
use subtrack_domain::Subscription;
use tracing::{debug, warn};

/// Storage key of the collection blob.
pub const STORAGE_KEY: &str = "subtracker_subscriptions";
const EXTENSION: &str = "json";
const BACKUP_PREFIX: &str = "subscriptions";
const BACKUP_DIR: &str = "backups";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S%3f";
const TMP_SUFFIX: &str = "tmp";
pub const DEFAULT_RETENTION: usize = 5;

/// Filesystem-backed JSON persistence for the subscription collection and its
/// backups.
///
/// Layout under `root`:
///
/// ```text
/// subtracker_subscriptions.json
/// backups/subscriptions_<YYYYMMDD>_<HHMMSSmmm>[_<note>].json
/// ```
#[derive(Debug, Clone)]
pub struct JsonSubscriptionStorage {
    root: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonSubscriptionStorage {
    pub fn new(root: PathBuf) -> Result<Self, StorageError> {
        Self::with_retention(root, DEFAULT_RETENTION)
    }

    pub fn with_retention(root: PathBuf, retention: usize) -> Result<Self, StorageError> {
        let backups_dir = root.join(BACKUP_DIR);
        fs::create_dir_all(&root)?;
        fs::create_dir_all(&backups_dir)?;
        Ok(Self {
            root,
            backups_dir,
            retention: retention.max(1),
        })
    }

    pub fn collection_path(&self) -> PathBuf {
        self.root.join(format!("{}.{}", STORAGE_KEY, EXTENSION))
    }

    pub fn backups_dir(&self) -> &Path {
        &self.backups_dir
    }

    pub fn retention(&self) -> usize {
        self.retention
    }

    fn write_backup(&self, data: &str, note: Option<&str>) -> Result<BackupInfo, StorageError> {
        fs::create_dir_all(&self.backups_dir)?;
        let (file_name, created_at) = self.next_backup_name(note)?;
        let path = self.backups_dir.join(&file_name);
        let tmp = tmp_path(&path);
        write_file(&tmp, data)?;
        fs::rename(&tmp, &path)?;
        debug!(backup = %file_name, "backup written");
        self.prune_backups()?;
        Ok(BackupInfo {
            id: file_name,
            created_at,
            path,
        })
    }

    /// Copies the current blob aside before it is replaced.
    fn backup_existing_file(&self, path: &Path) -> Result<(), StorageError> {
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(()),
            Err(err) => return Err(err.into()),
        };
        self.write_backup(&data, None)?;
        Ok(())
    }

    fn next_backup_name(&self, note: Option<&str>) -> Result<(String, String), StorageError> {
        let taken: Vec<String> = self
            .list_backups()?
            .into_iter()
            .filter_map(|info| backup_timestamp_segment(&info.id).map(str::to_string))
            .collect();
        let mut stamp = Utc::now().naive_utc();
        let mut formatted = stamp.format(BACKUP_TIMESTAMP_FORMAT).to_string();
        while taken.iter().any(|existing| existing == &formatted) {
            stamp += Duration::milliseconds(1);
            formatted = stamp.format(BACKUP_TIMESTAMP_FORMAT).to_string();
        }
        let mut stem = format!("{}_{}", BACKUP_PREFIX, formatted);
        if let Some(label) = sanitize_backup_note(note) {
            stem.push('_');
            stem.push_str(&label);
        }
        let created_at = stamp.format("%Y-%m-%d %H:%M:%S").to_string();
        Ok((format!("{}.{}", stem, EXTENSION), created_at))
    }

    fn prune_backups(&self) -> Result<(), StorageError> {
        let entries = self.list_backups()?;
        for entry in entries.into_iter().skip(self.retention) {
            debug!(backup = %entry.id, "pruning backup");
            let _ = fs::remove_file(entry.path);
        }
        Ok(())
    }

    fn resolve_backup(&self, id: &str) -> Result<PathBuf, StorageError> {
        let candidate = Path::new(id);
        let is_plain_name = candidate.file_name().and_then(|name| name.to_str()) == Some(id);
        let path = self.backups_dir.join(id);
        if !is_plain_name || !path.is_file() {
            return Err(StorageError::BackupNotFound(id.to_string()));
        }
        Ok(path)
    }
}

impl SubscriptionRepository for JsonSubscriptionStorage {
    fn load(&self) -> Result<Option<Vec<Subscription>>, StorageError> {
        let path = self.collection_path();
        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no persisted collection");
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };
        let subscriptions = parse_collection(&data, &path)?;
        debug!(count = subscriptions.len(), "collection loaded");
        Ok(Some(subscriptions))
    }

    fn save(&self, subscriptions: &[Subscription]) -> Result<(), StorageError> {
        let path = self.collection_path();
        let payload = serialize_collection(subscriptions)?;
        self.backup_existing_file(&path)?;
        let tmp = tmp_path(&path);
        write_file(&tmp, &payload)?;
        fs::rename(&tmp, &path)?;
        debug!(count = subscriptions.len(), "collection saved");
        Ok(())
    }

    fn backup(&self, note: Option<&str>) -> Result<BackupInfo, StorageError> {
        let path = self.collection_path();
        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => serialize_collection(&[])?,
            Err(err) => return Err(err.into()),
        };
        self.write_backup(&data, note)
    }

    /// Newest first.
    fn list_backups(&self) -> Result<Vec<BackupInfo>, StorageError> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|ext| ext.to_str()) != Some(EXTENSION) {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            let Some(stamp) = parse_backup_timestamp(file_name) else {
                continue;
            };
            entries.push((
                stamp,
                BackupInfo {
                    id: file_name.to_string(),
                    created_at: stamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                    path: path.clone(),
                },
            ));
        }
        entries.sort_by(|(a_stamp, a), (b_stamp, b)| {
            Reverse(a_stamp)
                .cmp(&Reverse(b_stamp))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(entries.into_iter().map(|(_, info)| info).collect())
    }

    fn read_backup(&self, id: &str) -> Result<Vec<Subscription>, StorageError> {
        let path = self.resolve_backup(id)?;
        let data = fs::read_to_string(&path)?;
        parse_collection(&data, &path)
    }

    fn export_to_path(&self, subscriptions: &[Subscription], path: &Path) -> Result<(), StorageError> {
        save_collection_to_path(subscriptions, path)
    }

    fn import_from_path(&self, path: &Path) -> Result<Vec<Subscription>, StorageError> {
        load_collection_from_path(path)
    }
}

/// Writes a collection to an arbitrary path, staging through a temp file.
pub fn save_collection_to_path(subscriptions: &[Subscription], path: &Path) -> Result<(), StorageError> {
    let payload = serialize_collection(subscriptions)?;
    let tmp = tmp_path(path);
    write_file(&tmp, &payload)?;
    fs::rename(&tmp, path)?;
    debug!(path = %path.display(), count = subscriptions.len(), "collection exported");
    Ok(())
}

/// Loads a collection from the provided filesystem path.
pub fn load_collection_from_path(path: &Path) -> Result<Vec<Subscription>, StorageError> {
    let data = fs::read_to_string(path)?;
    parse_collection(&data, path)
}

fn parse_collection(data: &str, path: &Path) -> Result<Vec<Subscription>, StorageError> {
    serde_json::from_str(data).map_err(|err| {
        warn!(path = %path.display(), error = %err, "corrupt subscription collection");
        StorageError::Corrupt(format!("{}: {}", path.display(), err))
    })
}

fn serialize_collection(subscriptions: &[Subscription]) -> Result<String, StorageError> {
    serde_json::to_string_pretty(subscriptions).map_err(|err| StorageError::Serde(err.to_string()))
}

fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    if raw.is_empty() {
        return None;
    }
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
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// `subscriptions_20240101_120000123_note.json` -> `20240101_120000123`
fn backup_timestamp_segment(name: &str) -> Option<&str> {
    let stem = name.strip_suffix(&format!(".{}", EXTENSION))?;
    let rest = stem.strip_prefix(BACKUP_PREFIX)?.strip_prefix('_')?;
    let date = rest.get(..8)?;
    let time = rest.get(9..18)?;
    if rest.as_bytes().get(8) != Some(&b'_') || !is_digits(date, 8) || !is_digits(time, 9) {
        return None;
    }
    match rest.as_bytes().get(18) {
        None | Some(b'_') => Some(&rest[..18]),
        Some(_) => None,
    }
}

fn parse_backup_timestamp(name: &str) -> Option<NaiveDateTime> {
    let segment = backup_timestamp_segment(name)?;
    NaiveDateTime::parse_from_str(segment, BACKUP_TIMESTAMP_FORMAT).ok()
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_file(path: &Path, data: &str) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notes_are_slugged() {
        assert_eq!(sanitize_backup_note(Some("  Before Import! ")), Some("before-import".into()));
        assert_eq!(sanitize_backup_note(Some("a_b")), Some("a-b".into()));
        assert_eq!(sanitize_backup_note(Some("***")), None);
        assert_eq!(sanitize_backup_note(None), None);
    }

    #[test]
    fn backup_names_parse() {
        let stamp = parse_backup_timestamp("subscriptions_20240102_030405678.json").unwrap();
        assert_eq!(stamp.format("%Y-%m-%d %H:%M:%S%.3f").to_string(), "2024-01-02 03:04:05.678");
        assert!(parse_backup_timestamp("subscriptions_20240102_030405678_pre-import.json").is_some());
        assert!(parse_backup_timestamp("subscriptions_20240102_0304.json").is_none());
        assert!(parse_backup_timestamp("ledger_20240102_030405678.json").is_none());
        assert!(parse_backup_timestamp("notes.txt").is_none());
    }

    #[test]
    fn tmp_path_appends_suffix() {
        let tmp = tmp_path(Path::new("/data/subtracker_subscriptions.json"));
        assert_eq!(tmp, PathBuf::from("/data/subtracker_subscriptions.json.tmp"));
    }
}
