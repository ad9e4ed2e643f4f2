use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use subtrack_domain::Subscription;

use crate::StorageError;

/// Describes a persisted backup artifact of the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupInfo {
    pub id: String,
    pub created_at: String,
    pub path: PathBuf,
}

/// Durable store for the whole subscription collection.
///
/// `save` replaces the stored collection atomically: an observer sees either
/// the previous collection or the new one, never a mix.
pub trait SubscriptionRepository: Send + Sync {
    /// Returns `None` when nothing has been persisted yet.
    fn load(&self) -> Result<Option<Vec<Subscription>>, StorageError>;
    fn save(&self, subscriptions: &[Subscription]) -> Result<(), StorageError>;

    fn backup(&self, _note: Option<&str>) -> Result<BackupInfo, StorageError> {
        Err(StorageError::Unsupported("backup"))
    }

    fn list_backups(&self) -> Result<Vec<BackupInfo>, StorageError> {
        Ok(Vec::new())
    }

    /// Reads a backup without touching the live collection.
    fn read_backup(&self, _id: &str) -> Result<Vec<Subscription>, StorageError> {
        Err(StorageError::Unsupported("restore"))
    }

    fn export_to_path(&self, _subscriptions: &[Subscription], _path: &Path) -> Result<(), StorageError> {
        Err(StorageError::Unsupported("export"))
    }

    fn import_from_path(&self, _path: &Path) -> Result<Vec<Subscription>, StorageError> {
        Err(StorageError::Unsupported("import"))
    }
}

/// Volatile repository, handy for tests and previews.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    stored: Mutex<Option<Vec<Subscription>>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subscriptions(subscriptions: Vec<Subscription>) -> Self {
        Self {
            stored: Mutex::new(Some(subscriptions)),
        }
    }
}

impl SubscriptionRepository for MemoryRepository {
    fn load(&self) -> Result<Option<Vec<Subscription>>, StorageError> {
        let guard = self
            .stored
            .lock()
            .map_err(|_| StorageError::Corrupt("memory repository lock poisoned".into()))?;
        Ok(guard.clone())
    }

    fn save(&self, subscriptions: &[Subscription]) -> Result<(), StorageError> {
        let mut guard = self
            .stored
            .lock()
            .map_err(|_| StorageError::Corrupt("memory repository lock poisoned".into()))?;
        *guard = Some(subscriptions.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_repository_starts_absent() {
        let repo = MemoryRepository::new();
        assert!(repo.load().unwrap().is_none());
        repo.save(&[]).unwrap();
        assert_eq!(repo.load().unwrap(), Some(Vec::new()));
    }

    #[test]
    fn optional_operations_report_unsupported() {
        let repo = MemoryRepository::new();
        assert!(matches!(repo.backup(None), Err(StorageError::Unsupported("backup"))));
        assert!(repo.list_backups().unwrap().is_empty());
    }
}
