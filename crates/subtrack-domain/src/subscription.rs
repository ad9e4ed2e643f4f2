//! Domain model for a recurring subscription and its draft/patch inputs.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{billing_cycle::BillingCycle, category::effective_category};

/// Currency assigned when a record does not carry one.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Opaque identifier; legacy collections may carry non-UUID strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionId(String);

impl SubscriptionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SubscriptionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for SubscriptionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: SubscriptionId,
    pub name: String,
    pub cost: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "BillingCycle::unspecified")]
    pub billing_cycle: BillingCycle,
    #[serde(with = "calendar_date")]
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    /// Materializes a draft, assigning a fresh id and both timestamps.
    pub fn from_draft(draft: NewSubscription, now: DateTime<Utc>) -> Self {
        Self {
            id: SubscriptionId::new(),
            name: draft.name,
            cost: draft.cost,
            currency: draft
                .currency
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            billing_cycle: draft.billing_cycle,
            start_date: draft.start_date,
            category: draft.category,
            notes: draft.notes,
            created_at: now,
            updated_at: now,
        }
    }

    /// Grouping key for category views; blank categories map to "Other".
    pub fn effective_category(&self) -> &str {
        effective_category(self.category.as_deref())
    }

    /// Merges the supplied fields, leaving `id` and `created_at` untouched.
    pub fn apply_patch(&mut self, patch: SubscriptionPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(cost) = patch.cost {
            self.cost = cost;
        }
        if let Some(currency) = patch.currency {
            self.currency = currency;
        }
        if let Some(cycle) = patch.billing_cycle {
            self.billing_cycle = cycle;
        }
        if let Some(start_date) = patch.start_date {
            self.start_date = start_date;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

/// User input for a new record, before id and timestamps exist.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubscription {
    pub name: String,
    pub cost: f64,
    pub currency: Option<String>,
    pub billing_cycle: BillingCycle,
    pub start_date: NaiveDate,
    pub category: Option<String>,
    pub notes: Option<String>,
}

impl NewSubscription {
    pub fn new(
        name: impl Into<String>,
        cost: f64,
        billing_cycle: BillingCycle,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            name: name.into(),
            cost,
            currency: None,
            billing_cycle,
            start_date,
            category: None,
            notes: None,
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Partial update. `None` keeps the stored value; for the optional text
/// fields `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubscriptionPatch {
    pub name: Option<String>,
    pub cost: Option<f64>,
    pub currency: Option<String>,
    pub billing_cycle: Option<BillingCycle>,
    pub start_date: Option<NaiveDate>,
    pub category: Option<Option<String>>,
    pub notes: Option<Option<String>>,
}

impl SubscriptionPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

/// Parses a calendar date from `YYYY-MM-DD` or an ISO-8601 date-time.
///
/// Date-times keep the calendar date as written, whatever their offset.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(stamp.date_naive());
    }
    chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|stamp| stamp.date())
}

mod calendar_date {
    use chrono::NaiveDate;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format("%Y-%m-%d").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_calendar_date(&raw)
            .ok_or_else(|| D::Error::custom(format!("invalid calendar date `{raw}`")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn from_draft_assigns_identity_and_defaults() {
        let draft = NewSubscription::new("Netflix", 15.49, BillingCycle::Monthly, date(2024, 1, 5));
        let sub = Subscription::from_draft(draft, stamp());

        assert!(!sub.id.as_str().is_empty());
        assert_eq!(sub.currency, DEFAULT_CURRENCY);
        assert_eq!(sub.created_at, stamp());
        assert_eq!(sub.updated_at, stamp());
        assert_eq!(sub.effective_category(), "Other");
    }

    #[test]
    fn apply_patch_merges_only_supplied_fields() {
        let draft = NewSubscription::new("Gym", 40.0, BillingCycle::Monthly, date(2024, 1, 1))
            .with_category("Fitness")
            .with_notes("front desk");
        let mut sub = Subscription::from_draft(draft, stamp());
        let id = sub.id.clone();

        sub.apply_patch(SubscriptionPatch {
            cost: Some(45.0),
            notes: Some(None),
            ..SubscriptionPatch::default()
        });

        assert_eq!(sub.id, id);
        assert_eq!(sub.name, "Gym");
        assert_eq!(sub.cost, 45.0);
        assert_eq!(sub.category.as_deref(), Some("Fitness"));
        assert_eq!(sub.notes, None);
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let draft = NewSubscription::new("Spotify", 9.99, BillingCycle::Monthly, date(2024, 2, 29));
        let sub = Subscription::from_draft(draft, stamp());
        let value = serde_json::to_value(&sub).unwrap();

        assert_eq!(value["billingCycle"], "monthly");
        assert_eq!(value["startDate"], "2024-02-29");
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
        assert!(value.get("category").is_none());
    }

    #[test]
    fn deserializes_legacy_records() {
        let json = r#"{
            "id": "lq2k7x1abc",
            "name": "Cloud",
            "cost": 2.99,
            "billingCycle": "monthly",
            "startDate": "2024-01-15T00:00:00.000Z",
            "category": "",
            "createdAt": "2024-01-15T10:00:00.000Z",
            "updatedAt": "2024-01-15T10:00:00.000Z"
        }"#;
        let sub: Subscription = serde_json::from_str(json).unwrap();

        assert_eq!(sub.id.as_str(), "lq2k7x1abc");
        assert_eq!(sub.currency, "USD");
        assert_eq!(sub.start_date, date(2024, 1, 15));
        assert_eq!(sub.effective_category(), "Other");
    }

    #[test]
    fn missing_cycle_is_kept_as_unspecified() {
        let json = r#"{
            "id": "a",
            "name": "Mystery",
            "cost": 1.0,
            "startDate": "2024-01-01",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        }"#;
        let sub: Subscription = serde_json::from_str(json).unwrap();
        assert!(!sub.billing_cycle.is_known());
    }

    #[test]
    fn rejects_malformed_start_date() {
        let json = r#"{
            "id": "a",
            "name": "Broken",
            "cost": 1.0,
            "billingCycle": "weekly",
            "startDate": "next tuesday",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        }"#;
        assert!(serde_json::from_str::<Subscription>(json).is_err());
    }

    #[test]
    fn empty_patch_is_detected() {
        assert!(SubscriptionPatch::default().is_empty());
        let patch = SubscriptionPatch {
            name: Some("x".into()),
            ..SubscriptionPatch::default()
        };
        assert!(!patch.is_empty());
    }
}
