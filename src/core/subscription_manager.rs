use std::path::Path;

use chrono::NaiveDate;
use subtrack_core::{
    billing_progress, next_payment_date,
    storage::{BackupInfo, SubscriptionRepository},
    BillingProgress, CategorySummary, Clock, CollectionStats, CoreError, CycleBreakdown,
    SubscriptionService, SummaryService, SystemClock, UpcomingPayment,
};
use subtrack_domain::{NewSubscription, Subscription, SubscriptionId, SubscriptionPatch};
use tracing::{debug, info};

/// Facade that owns the cached collection, persistence, and the clock.
///
/// Every mutation works on a copy of the cache, persists the whole copy, and
/// only then swaps it in. A failed save leaves the cache as it was. Taking
/// `&mut self` serializes writes.
pub struct SubscriptionManager {
    subscriptions: Vec<Subscription>,
    storage: Box<dyn SubscriptionRepository>,
    clock: Box<dyn Clock>,
    default_currency: Option<String>,
}

impl SubscriptionManager {
    pub fn new(storage: Box<dyn SubscriptionRepository>, clock: Box<dyn Clock>) -> Self {
        Self {
            subscriptions: Vec::new(),
            storage,
            clock,
            default_currency: None,
        }
    }

    pub fn with_system_clock(storage: Box<dyn SubscriptionRepository>) -> Self {
        Self::new(storage, Box::new(SystemClock))
    }

    /// Currency given to drafts that do not name one.
    pub fn set_default_currency(&mut self, code: impl Into<String>) {
        self.default_currency = Some(code.into());
    }

    pub fn storage(&self) -> &dyn SubscriptionRepository {
        self.storage.as_ref()
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Replaces the cache with the persisted collection; absent means empty.
    pub fn load(&mut self) -> Result<usize, CoreError> {
        let loaded = self.storage.load()?.unwrap_or_default();
        info!(count = loaded.len(), "subscriptions loaded");
        self.subscriptions = loaded;
        Ok(self.subscriptions.len())
    }

    pub fn list(&self) -> &[Subscription] {
        &self.subscriptions
    }

    pub fn get(&self, id: &SubscriptionId) -> Result<&Subscription, CoreError> {
        SubscriptionService::get(&self.subscriptions, id)
    }

    pub fn add(&mut self, mut draft: NewSubscription) -> Result<Subscription, CoreError> {
        if draft.currency.is_none() {
            draft.currency = self.default_currency.clone();
        }
        let mut snapshot = self.subscriptions.clone();
        let added = SubscriptionService::add(&mut snapshot, draft, self.clock.timestamp())?;
        self.commit(snapshot)?;
        Ok(added)
    }

    pub fn update(
        &mut self,
        id: &SubscriptionId,
        patch: SubscriptionPatch,
    ) -> Result<Subscription, CoreError> {
        let mut snapshot = self.subscriptions.clone();
        let updated = SubscriptionService::update(&mut snapshot, id, patch, self.clock.timestamp())?;
        self.commit(snapshot)?;
        Ok(updated)
    }

    pub fn delete(&mut self, id: &SubscriptionId) -> Result<Subscription, CoreError> {
        let mut snapshot = self.subscriptions.clone();
        let removed = SubscriptionService::remove(&mut snapshot, id)?;
        self.commit(snapshot)?;
        Ok(removed)
    }

    /// Persists an empty collection and returns how many records were dropped.
    pub fn clear_all(&mut self) -> Result<usize, CoreError> {
        let dropped = self.subscriptions.len();
        self.commit(Vec::new())?;
        Ok(dropped)
    }

    pub fn export(&self, path: &Path) -> Result<usize, CoreError> {
        self.storage.export_to_path(&self.subscriptions, path)?;
        Ok(self.subscriptions.len())
    }

    /// Replaces the whole collection with the file's contents after every
    /// record passes validation.
    pub fn import(&mut self, path: &Path) -> Result<usize, CoreError> {
        let incoming = self.storage.import_from_path(path)?;
        let snapshot = SubscriptionService::prepare_replacement(incoming)?;
        let count = snapshot.len();
        self.commit(snapshot)?;
        info!(count, path = %path.display(), "subscriptions imported");
        Ok(count)
    }

    pub fn backup(&self, note: Option<&str>) -> Result<BackupInfo, CoreError> {
        Ok(self.storage.backup(note)?)
    }

    pub fn list_backups(&self) -> Result<Vec<BackupInfo>, CoreError> {
        Ok(self.storage.list_backups()?)
    }

    /// Makes a backup the live collection. Backed-up records are restored
    /// verbatim, unknown billing cycles included.
    pub fn restore_backup(&mut self, id: &str) -> Result<usize, CoreError> {
        let restored = self.storage.read_backup(id)?;
        let count = restored.len();
        self.commit(restored)?;
        info!(backup = id, count, "backup restored");
        Ok(count)
    }

    pub fn total_monthly_cost(&self) -> f64 {
        SummaryService::total_monthly_cost(&self.subscriptions)
    }

    pub fn total_annual_cost(&self) -> f64 {
        SummaryService::total_annual_cost(&self.subscriptions)
    }

    pub fn by_category(&self) -> Vec<CategorySummary<'_>> {
        SummaryService::by_category(&self.subscriptions)
    }

    pub fn cost_breakdown(&self) -> CycleBreakdown {
        SummaryService::cost_breakdown_by_cycle(&self.subscriptions)
    }

    pub fn upcoming_payments(&self, window_days: u32) -> Vec<UpcomingPayment<'_>> {
        SummaryService::upcoming_payments(&self.subscriptions, self.clock.today(), window_days)
    }

    pub fn next_payment(&self, id: &SubscriptionId) -> Result<NaiveDate, CoreError> {
        let sub = self.get(id)?;
        Ok(next_payment_date(
            sub.start_date,
            &sub.billing_cycle,
            self.clock.today(),
        ))
    }

    pub fn billing_progress(&self, id: &SubscriptionId) -> Result<BillingProgress, CoreError> {
        let sub = self.get(id)?;
        Ok(billing_progress(
            sub.start_date,
            &sub.billing_cycle,
            self.clock.now(),
        ))
    }

    pub fn stats(&self) -> CollectionStats {
        SummaryService::collection_stats(&self.subscriptions)
    }

    fn commit(&mut self, snapshot: Vec<Subscription>) -> Result<(), CoreError> {
        self.storage.save(&snapshot)?;
        debug!(count = snapshot.len(), "collection committed");
        self.subscriptions = snapshot;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use subtrack_core::{FixedClock, MemoryRepository};
    use subtrack_domain::BillingCycle;

    fn seeded() -> Vec<Subscription> {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        vec![Subscription::from_draft(
            NewSubscription::new("Seeded", 6.0, BillingCycle::Quarterly, start),
            created,
        )]
    }

    fn manager_over(repo: MemoryRepository) -> SubscriptionManager {
        let today = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        SubscriptionManager::new(Box::new(repo), Box::new(FixedClock::at_date(today)))
    }

    #[test]
    fn load_reads_seeded_repository() {
        let mut manager = manager_over(MemoryRepository::with_subscriptions(seeded()));
        assert_eq!(manager.load().unwrap(), 1);
        assert_eq!(manager.total_monthly_cost(), 2.0);
        let id = manager.list()[0].id.clone();
        assert_eq!(
            manager.next_payment(&id).unwrap(),
            NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()
        );
    }

    #[test]
    fn add_falls_back_to_default_currency() {
        let mut manager = manager_over(MemoryRepository::new());
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        manager.set_default_currency("CHF");
        let plain = manager
            .add(NewSubscription::new("Plain", 1.0, BillingCycle::Monthly, start))
            .unwrap();
        let explicit = manager
            .add(NewSubscription::new("Euro", 1.0, BillingCycle::Monthly, start).with_currency("eur"))
            .unwrap();
        assert_eq!(plain.currency, "CHF");
        assert_eq!(explicit.currency, "EUR");
        assert_eq!(manager.storage().load().unwrap().map(|subs| subs.len()), Some(2));
    }
}
