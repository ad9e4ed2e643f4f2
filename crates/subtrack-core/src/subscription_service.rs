//! Collection mutations behind the validation gate.
//!
//! Each function works on a caller-owned snapshot; persisting the result is
//! the caller's job.

use chrono::{DateTime, Utc};
use subtrack_domain::{NewSubscription, Subscription, SubscriptionId, SubscriptionPatch};
use tracing::debug;

use crate::{
    validation::{validate_collection, validate_new, validate_record},
    CoreError,
};

pub struct SubscriptionService;

impl SubscriptionService {
    /// Validates the draft, assigns id and timestamps, and appends it.
    pub fn add(
        subscriptions: &mut Vec<Subscription>,
        draft: NewSubscription,
        now: DateTime<Utc>,
    ) -> Result<Subscription, CoreError> {
        let draft = validate_new(draft)?;
        let mut record = Subscription::from_draft(draft, now);
        while subscriptions.iter().any(|sub| sub.id == record.id) {
            record.id = SubscriptionId::new();
        }
        debug!(id = %record.id, name = %record.name, "subscription added");
        subscriptions.push(record.clone());
        Ok(record)
    }

    /// Merges `patch` into the record and refreshes `updated_at`, even when
    /// the patch changes nothing.
    pub fn update(
        subscriptions: &mut [Subscription],
        id: &SubscriptionId,
        patch: SubscriptionPatch,
        now: DateTime<Utc>,
    ) -> Result<Subscription, CoreError> {
        let slot = subscriptions
            .iter_mut()
            .find(|sub| &sub.id == id)
            .ok_or_else(|| CoreError::NotFound(id.clone()))?;
        let mut merged = slot.clone();
        merged.apply_patch(patch);
        validate_record(&mut merged)?;
        merged.touch(now);
        *slot = merged.clone();
        debug!(id = %id, "subscription updated");
        Ok(merged)
    }

    pub fn remove(
        subscriptions: &mut Vec<Subscription>,
        id: &SubscriptionId,
    ) -> Result<Subscription, CoreError> {
        let index = subscriptions
            .iter()
            .position(|sub| &sub.id == id)
            .ok_or_else(|| CoreError::NotFound(id.clone()))?;
        debug!(id = %id, "subscription removed");
        Ok(subscriptions.remove(index))
    }

    pub fn get<'a>(
        subscriptions: &'a [Subscription],
        id: &SubscriptionId,
    ) -> Result<&'a Subscription, CoreError> {
        subscriptions
            .iter()
            .find(|sub| &sub.id == id)
            .ok_or_else(|| CoreError::NotFound(id.clone()))
    }

    /// Validates an incoming collection (e.g. an import) as a whole.
    pub fn prepare_replacement(
        mut incoming: Vec<Subscription>,
    ) -> Result<Vec<Subscription>, CoreError> {
        validate_collection(&mut incoming)?;
        Ok(incoming)
    }
}
