//! Construction/update gate for subscription records.
//!
//! Unlike the cycle math, the gate is strict: unknown billing cycles stop here.

use std::collections::HashSet;

use subtrack_domain::{BillingCycle, NewSubscription, Subscription, DEFAULT_CURRENCY};

use crate::error::ValidationError;

pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(())
}

pub fn validate_cost(cost: f64) -> Result<(), ValidationError> {
    if !cost.is_finite() {
        return Err(ValidationError::NonFiniteCost(cost));
    }
    if cost < 0.0 {
        return Err(ValidationError::NegativeCost(cost));
    }
    Ok(())
}

pub fn validate_cycle(cycle: &BillingCycle) -> Result<(), ValidationError> {
    match cycle {
        BillingCycle::Other(raw) => Err(ValidationError::UnknownBillingCycle(raw.clone())),
        _ => Ok(()),
    }
}

/// Upper-cases a three-letter currency code; blank input means the default.
pub fn normalize_currency(code: Option<&str>) -> Result<String, ValidationError> {
    let code = match code.map(str::trim) {
        Some(code) if !code.is_empty() => code,
        _ => return Ok(DEFAULT_CURRENCY.to_string()),
    };
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::InvalidCurrency(code.to_string()));
    }
    Ok(code.to_ascii_uppercase())
}

/// Checks and normalizes a draft before it becomes a record.
pub fn validate_new(mut draft: NewSubscription) -> Result<NewSubscription, ValidationError> {
    validate_name(&draft.name)?;
    validate_cost(draft.cost)?;
    validate_cycle(&draft.billing_cycle)?;
    draft.name = draft.name.trim().to_string();
    draft.currency = Some(normalize_currency(draft.currency.as_deref())?);
    draft.category = normalize_optional(draft.category);
    draft.notes = normalize_optional(draft.notes);
    Ok(draft)
}

/// Checks a complete record, e.g. after a patch merge or on import.
pub fn validate_record(record: &mut Subscription) -> Result<(), ValidationError> {
    validate_name(&record.name)?;
    validate_cost(record.cost)?;
    validate_cycle(&record.billing_cycle)?;
    record.name = record.name.trim().to_string();
    record.currency = normalize_currency(Some(&record.currency))?;
    record.category = normalize_optional(record.category.take());
    record.notes = normalize_optional(record.notes.take());
    Ok(())
}

/// Validates a whole collection and rejects repeated ids.
pub fn validate_collection(records: &mut [Subscription]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for record in records.iter_mut() {
        if !seen.insert(record.id.clone()) {
            return Err(ValidationError::DuplicateId(record.id.clone()));
        }
        validate_record(record)?;
    }
    Ok(())
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}
