//! Aggregation helpers that fold a subscription collection into summary views.
//!
//! Nothing is cached: every view is recomputed from the slice it is given.

use std::collections::{BTreeSet, HashMap};

use chrono::{Duration, NaiveDate};
use subtrack_domain::{BillingCycle, Subscription};

use crate::cycle_math::{days_between, monthly_equivalent, next_payment_date};

/// Default forward-looking window for upcoming payments, in days.
pub const DEFAULT_UPCOMING_WINDOW_DAYS: u32 = 30;

/// Subscriptions sharing a category, with their monthly weight.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummary<'a> {
    pub category: String,
    pub subscriptions: Vec<&'a Subscription>,
    pub total_monthly_cost: f64,
    pub count: usize,
    /// Share of the overall monthly total, 0 when the overall total is 0.
    pub percentage_of_total: f64,
}

/// Raw (not normalized) cost summed per billing cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CycleBreakdown {
    pub weekly: f64,
    pub monthly: f64,
    pub quarterly: f64,
    pub yearly: f64,
}

impl CycleBreakdown {
    pub fn get(&self, cycle: &BillingCycle) -> Option<f64> {
        match cycle {
            BillingCycle::Weekly => Some(self.weekly),
            BillingCycle::Monthly => Some(self.monthly),
            BillingCycle::Quarterly => Some(self.quarterly),
            BillingCycle::Yearly => Some(self.yearly),
            BillingCycle::Other(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpcomingPayment<'a> {
    pub subscription: &'a Subscription,
    pub next_payment: NaiveDate,
    pub days_until: i64,
}

/// Counts shown on the settings/overview screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionStats {
    pub total: usize,
    pub categories: usize,
    pub weekly: usize,
    pub monthly: usize,
    pub quarterly: usize,
    pub yearly: usize,
    pub unknown_cycle: usize,
}

/// Aggregates subscription collections for dashboards and analytics.
pub struct SummaryService;

impl SummaryService {
    /// Sum of monthly equivalents; 0 for an empty collection.
    pub fn total_monthly_cost(subscriptions: &[Subscription]) -> f64 {
        subscriptions
            .iter()
            .map(|sub| monthly_equivalent(sub.cost, &sub.billing_cycle))
            .sum()
    }

    /// Always `total_monthly_cost * 12`, so both figures agree by construction.
    pub fn total_annual_cost(subscriptions: &[Subscription]) -> f64 {
        Self::total_monthly_cost(subscriptions) * 12.0
    }

    /// Groups by effective category, heaviest first; ties sort by name.
    ///
    /// Categories whose monthly total is zero are left out.
    pub fn by_category(subscriptions: &[Subscription]) -> Vec<CategorySummary<'_>> {
        let overall = Self::total_monthly_cost(subscriptions);
        let mut order: Vec<String> = Vec::new();
        let mut grouped: HashMap<String, Vec<&Subscription>> = HashMap::new();
        for sub in subscriptions {
            let key = sub.effective_category().to_string();
            grouped
                .entry(key.clone())
                .or_insert_with(|| {
                    order.push(key);
                    Vec::new()
                })
                .push(sub);
        }

        let mut summaries: Vec<CategorySummary<'_>> = order
            .into_iter()
            .filter_map(|category| {
                let members = grouped.remove(&category)?;
                let total: f64 = members
                    .iter()
                    .map(|sub| monthly_equivalent(sub.cost, &sub.billing_cycle))
                    .sum();
                if total == 0.0 {
                    return None;
                }
                let percentage_of_total = if overall > 0.0 {
                    total / overall * 100.0
                } else {
                    0.0
                };
                Some(CategorySummary {
                    category,
                    count: members.len(),
                    subscriptions: members,
                    total_monthly_cost: total,
                    percentage_of_total,
                })
            })
            .collect();

        summaries.sort_by(|a, b| {
            b.total_monthly_cost
                .total_cmp(&a.total_monthly_cost)
                .then_with(|| a.category.cmp(&b.category))
        });
        summaries
    }

    /// Raw cost per cycle bucket; unknown cycles are dropped from every bucket.
    pub fn cost_breakdown_by_cycle(subscriptions: &[Subscription]) -> CycleBreakdown {
        subscriptions
            .iter()
            .fold(CycleBreakdown::default(), |mut acc, sub| {
                match sub.billing_cycle {
                    BillingCycle::Weekly => acc.weekly += sub.cost,
                    BillingCycle::Monthly => acc.monthly += sub.cost,
                    BillingCycle::Quarterly => acc.quarterly += sub.cost,
                    BillingCycle::Yearly => acc.yearly += sub.cost,
                    BillingCycle::Other(_) => {}
                }
                acc
            })
    }

    /// Payments due in `[today, today + window_days]`, soonest first.
    ///
    /// Ties keep collection order.
    pub fn upcoming_payments(
        subscriptions: &[Subscription],
        today: NaiveDate,
        window_days: u32,
    ) -> Vec<UpcomingPayment<'_>> {
        let horizon = today
            .checked_add_signed(Duration::days(i64::from(window_days)))
            .unwrap_or(NaiveDate::MAX);
        let mut upcoming: Vec<UpcomingPayment<'_>> = subscriptions
            .iter()
            .map(|sub| {
                let next_payment = next_payment_date(sub.start_date, &sub.billing_cycle, today);
                UpcomingPayment {
                    subscription: sub,
                    next_payment,
                    days_until: days_between(today, next_payment),
                }
            })
            .filter(|payment| payment.next_payment >= today && payment.next_payment <= horizon)
            .collect();
        // `sort_by_key` is stable.
        upcoming.sort_by_key(|payment| payment.next_payment);
        upcoming
    }

    pub fn collection_stats(subscriptions: &[Subscription]) -> CollectionStats {
        let categories: BTreeSet<&str> = subscriptions
            .iter()
            .map(Subscription::effective_category)
            .collect();
        let mut stats = CollectionStats {
            total: subscriptions.len(),
            categories: categories.len(),
            ..CollectionStats::default()
        };
        for sub in subscriptions {
            match sub.billing_cycle {
                BillingCycle::Weekly => stats.weekly += 1,
                BillingCycle::Monthly => stats.monthly += 1,
                BillingCycle::Quarterly => stats.quarterly += 1,
                BillingCycle::Yearly => stats.yearly += 1,
                BillingCycle::Other(_) => stats.unknown_cycle += 1,
            }
        }
        stats
    }
}
