//! Billing-cycle arithmetic for a single subscription.
//!
//! Every function here is pure: the current time is always passed in. Cycle
//! terms form the sequence `start, start + 1 cycle, start + 2 cycles, ...`
//! where term `k` is computed directly from the start date, so month-end
//! clamping never drifts (Jan 31 -> Feb 29 -> Mar 31 -> Apr 30).

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime};
use subtrack_domain::BillingCycle;
use tracing::warn;

/// Average number of weeks in a month (365.25 days / 12 months / 7 days).
pub const WEEKS_PER_MONTH: f64 = 365.25 / 12.0 / 7.0;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Where `now` sits inside the current billing cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BillingProgress {
    /// Fraction of the cycle elapsed, clamped to `[0, 1]`.
    pub progress: f64,
    /// Whole days until the cycle ends, rounded up, never negative.
    pub days_remaining: i64,
    pub cycle_start: NaiveDate,
    pub cycle_end: NaiveDate,
}

/// Normalizes a cost to a monthly rate.
///
/// Unknown cycles return `cost` unchanged.
pub fn monthly_equivalent(cost: f64, cycle: &BillingCycle) -> f64 {
    match cycle {
        BillingCycle::Weekly => cost * WEEKS_PER_MONTH,
        BillingCycle::Monthly => cost,
        BillingCycle::Quarterly => cost / 3.0,
        BillingCycle::Yearly => cost / 12.0,
        BillingCycle::Other(raw) => {
            warn!(cycle = %raw, "unknown billing cycle, using cost as monthly equivalent");
            cost
        }
    }
}

/// Returns term `index` of the cycle sequence anchored at `start`.
///
/// `None` for unknown cycles or when the date leaves chrono's range.
pub fn cycle_term(start: NaiveDate, cycle: &BillingCycle, index: u32) -> Option<NaiveDate> {
    match cycle {
        BillingCycle::Weekly => start.checked_add_days(Days::new(7 * u64::from(index))),
        BillingCycle::Monthly => start.checked_add_months(Months::new(index)),
        BillingCycle::Quarterly => start.checked_add_months(Months::new(index.checked_mul(3)?)),
        BillingCycle::Yearly => start.checked_add_months(Months::new(index.checked_mul(12)?)),
        BillingCycle::Other(_) => None,
    }
}

/// The smallest cycle term on or after `today`.
///
/// A start date on or after `today` is returned as is. Unknown cycles return
/// `start`.
pub fn next_payment_date(start: NaiveDate, cycle: &BillingCycle, today: NaiveDate) -> NaiveDate {
    if !cycle.is_known() {
        warn!(cycle = %cycle, "unknown billing cycle, next payment falls back to start date");
        return start;
    }
    if start >= today {
        return start;
    }
    first_index_on_or_after(start, cycle, today)
        .and_then(|index| cycle_term(start, cycle, index))
        .unwrap_or(NaiveDate::MAX)
}

/// Locates the cycle `[cycle_start, cycle_end)` containing `now`.
///
/// Cycle boundaries are local midnights. When the subscription has not
/// started yet, the first cycle is reported with zero progress and
/// `days_remaining` counts down to the end of that first cycle.
pub fn billing_progress(start: NaiveDate, cycle: &BillingCycle, now: NaiveDateTime) -> BillingProgress {
    let unknown = BillingProgress {
        progress: 0.0,
        days_remaining: 0,
        cycle_start: start,
        cycle_end: start,
    };
    if !cycle.is_known() {
        warn!(cycle = %cycle, "unknown billing cycle, reporting empty progress");
        return unknown;
    }

    let today = now.date();
    if start > today {
        let cycle_end = cycle_term(start, cycle, 1).unwrap_or(start);
        return BillingProgress {
            progress: 0.0,
            days_remaining: days_until_instant(midnight(cycle_end), now),
            cycle_start: start,
            cycle_end,
        };
    }

    // First term strictly after today, so the one before it is <= today.
    let Some(end_index) = today
        .succ_opt()
        .and_then(|tomorrow| first_index_on_or_after(start, cycle, tomorrow))
    else {
        return unknown;
    };
    let start_index = end_index.saturating_sub(1);
    let (Some(cycle_start), Some(cycle_end)) = (
        cycle_term(start, cycle, start_index),
        cycle_term(start, cycle, end_index),
    ) else {
        return unknown;
    };

    let begin = midnight(cycle_start);
    let end = midnight(cycle_end);
    let total = (end - begin).num_milliseconds() as f64;
    let elapsed = (now - begin).num_milliseconds() as f64;
    let progress = if total > 0.0 {
        (elapsed / total).clamp(0.0, 1.0)
    } else {
        0.0
    };

    BillingProgress {
        progress,
        days_remaining: days_until_instant(end, now),
        cycle_start,
        cycle_end,
    }
}

/// Calendar days from `today` until `date`; negative when `date` is past.
pub fn days_between(today: NaiveDate, date: NaiveDate) -> i64 {
    (date - today).num_days()
}

fn first_index_on_or_after(start: NaiveDate, cycle: &BillingCycle, date: NaiveDate) -> Option<u32> {
    if start >= date {
        return Some(0);
    }
    // Lower bound on the answer: the term at `estimate - 1` is always before `date`.
    let estimate = match cycle {
        BillingCycle::Weekly => (date - start).num_days() / 7,
        BillingCycle::Monthly => months_between(start, date),
        BillingCycle::Quarterly => months_between(start, date) / 3,
        BillingCycle::Yearly => months_between(start, date) / 12,
        BillingCycle::Other(_) => return None,
    };
    let mut index = u32::try_from(estimate).ok()?;
    loop {
        if cycle_term(start, cycle, index)? >= date {
            return Some(index);
        }
        index = index.checked_add(1)?;
    }
}

fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    let from_idx = i64::from(from.year()) * 12 + i64::from(from.month0());
    let to_idx = i64::from(to.year()) * 12 + i64::from(to.month0());
    to_idx - from_idx
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

fn days_until_instant(target: NaiveDateTime, now: NaiveDateTime) -> i64 {
    let seconds = (target - now).num_milliseconds() as f64 / 1000.0;
    (seconds / SECONDS_PER_DAY).ceil().max(0.0) as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(h, 0, 0).unwrap()
    }

    #[test]
    fn monthly_equivalent_scales_each_cycle() {
        assert!((monthly_equivalent(10.0, &BillingCycle::Weekly) - 43.482142857).abs() < 1e-6);
        assert_eq!(monthly_equivalent(12.0, &BillingCycle::Monthly), 12.0);
        assert_eq!(monthly_equivalent(30.0, &BillingCycle::Quarterly), 10.0);
        assert_eq!(monthly_equivalent(120.0, &BillingCycle::Yearly), 10.0);
    }

    #[test]
    fn monthly_equivalent_unknown_cycle_is_identity() {
        let cycle = BillingCycle::from_raw("fortnightly");
        assert_eq!(monthly_equivalent(7.5, &cycle), 7.5);
    }

    #[test]
    fn weekly_next_payment_steps_to_first_term_on_or_after_today() {
        let next = next_payment_date(date(2024, 1, 1), &BillingCycle::Weekly, date(2024, 1, 10));
        assert_eq!(next, date(2024, 1, 15));
    }

    #[test]
    fn next_payment_on_start_date_takes_no_step() {
        let start = date(2024, 5, 20);
        assert_eq!(next_payment_date(start, &BillingCycle::Monthly, start), start);
    }

    #[test]
    fn next_payment_on_later_term_returns_that_term() {
        let next = next_payment_date(date(2024, 1, 15), &BillingCycle::Monthly, date(2024, 3, 15));
        assert_eq!(next, date(2024, 3, 15));
    }

    #[test]
    fn future_start_is_the_next_payment() {
        let start = date(2030, 6, 1);
        assert_eq!(
            next_payment_date(start, &BillingCycle::Yearly, date(2024, 1, 1)),
            start
        );
    }

    #[test]
    fn month_end_start_clamps_without_drifting() {
        let start = date(2024, 1, 31);
        let cycle = BillingCycle::Monthly;
        assert_eq!(cycle_term(start, &cycle, 1), Some(date(2024, 2, 29)));
        assert_eq!(cycle_term(start, &cycle, 2), Some(date(2024, 3, 31)));
        assert_eq!(cycle_term(start, &cycle, 3), Some(date(2024, 4, 30)));
        assert_eq!(next_payment_date(start, &cycle, date(2024, 2, 15)), date(2024, 2, 29));
        assert_eq!(next_payment_date(start, &cycle, date(2024, 3, 1)), date(2024, 3, 31));
        assert_eq!(next_payment_date(start, &cycle, date(2023, 2, 1)), start);
    }

    #[test]
    fn leap_day_yearly_lands_on_feb_28_in_common_years() {
        let start = date(2024, 2, 29);
        let cycle = BillingCycle::Yearly;
        assert_eq!(next_payment_date(start, &cycle, date(2024, 3, 1)), date(2025, 2, 28));
        assert_eq!(next_payment_date(start, &cycle, date(2027, 3, 1)), date(2028, 2, 29));
    }

    #[test]
    fn quarterly_next_payment_crosses_year_boundary() {
        let next = next_payment_date(date(2023, 11, 30), &BillingCycle::Quarterly, date(2024, 3, 1));
        assert_eq!(next, date(2024, 5, 30));
    }

    #[test]
    fn unknown_cycle_next_payment_is_start() {
        let start = date(2020, 1, 1);
        let cycle = BillingCycle::from_raw("");
        assert_eq!(next_payment_date(start, &cycle, date(2024, 1, 1)), start);
    }

    #[test]
    fn progress_mid_monthly_cycle() {
        let progress = billing_progress(date(2024, 1, 1), &BillingCycle::Monthly, at(2024, 3, 16, 12));
        assert_eq!(progress.cycle_start, date(2024, 3, 1));
        assert_eq!(progress.cycle_end, date(2024, 4, 1));
        // 15.5 of 31 days.
        assert!((progress.progress - 0.5).abs() < 1e-9);
        assert_eq!(progress.days_remaining, 16);
    }

    #[test]
    fn progress_on_boundary_starts_new_cycle() {
        let progress = billing_progress(date(2024, 1, 1), &BillingCycle::Weekly, at(2024, 1, 8, 0));
        assert_eq!(progress.cycle_start, date(2024, 1, 8));
        assert_eq!(progress.cycle_end, date(2024, 1, 15));
        assert_eq!(progress.progress, 0.0);
        assert_eq!(progress.days_remaining, 7);
    }

    #[test]
    fn progress_before_start_reports_first_cycle() {
        let now = at(2024, 1, 1, 12);
        let progress = billing_progress(date(2024, 1, 11), &BillingCycle::Monthly, now);
        assert_eq!(progress.cycle_start, date(2024, 1, 11));
        assert_eq!(progress.cycle_end, date(2024, 2, 11));
        assert_eq!(progress.progress, 0.0);
        // Counts to the end of the first cycle, not to the first charge.
        assert_eq!(progress.days_remaining, 41);
    }

    #[test]
    fn progress_unknown_cycle_is_empty() {
        let start = date(2024, 1, 1);
        let progress = billing_progress(start, &BillingCycle::from_raw("daily"), at(2024, 2, 1, 0));
        assert_eq!(
            progress,
            BillingProgress {
                progress: 0.0,
                days_remaining: 0,
                cycle_start: start,
                cycle_end: start,
            }
        );
    }

    #[test]
    fn progress_is_idempotent() {
        let now = at(2024, 7, 4, 18);
        let first = billing_progress(date(2022, 2, 28), &BillingCycle::Quarterly, now);
        let second = billing_progress(date(2022, 2, 28), &BillingCycle::Quarterly, now);
        assert_eq!(first, second);
    }

    #[test]
    fn days_between_counts_calendar_days() {
        assert_eq!(days_between(date(2024, 1, 1), date(2024, 1, 31)), 30);
        assert_eq!(days_between(date(2024, 1, 2), date(2024, 1, 1)), -1);
    }

    fn known_cycle() -> impl Strategy<Value = BillingCycle> {
        prop_oneof![
            Just(BillingCycle::Weekly),
            Just(BillingCycle::Monthly),
            Just(BillingCycle::Quarterly),
            Just(BillingCycle::Yearly),
        ]
    }

    fn any_date() -> impl Strategy<Value = NaiveDate> {
        (0i64..20_000).prop_map(|offset| date(1990, 1, 1) + chrono::Duration::days(offset))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn next_payment_is_minimal_term_on_or_after_today(
            start in any_date(),
            today in any_date(),
            cycle in known_cycle(),
        ) {
            let next = next_payment_date(start, &cycle, today);
            prop_assert!(next >= today);
            if next > start {
                // The term before `next` must already be in the past.
                let mut index = 0u32;
                while cycle_term(start, &cycle, index + 1).unwrap() <= next {
                    index += 1;
                }
                prop_assert_eq!(cycle_term(start, &cycle, index).unwrap(), next);
                prop_assert!(cycle_term(start, &cycle, index - 1).unwrap() < today);
            }
        }

        #[test]
        fn progress_interval_contains_now(
            start in any_date(),
            now_date in any_date(),
            hour in 0u32..24,
            cycle in known_cycle(),
        ) {
            let now = now_date.and_hms_opt(hour, 0, 0).unwrap();
            let result = billing_progress(start, &cycle, now);
            prop_assert!((0.0..=1.0).contains(&result.progress));
            prop_assert!(result.days_remaining >= 0);
            prop_assert!(result.cycle_start < result.cycle_end);
            let seconds_left = (midnight(result.cycle_end) - now).num_seconds() as f64;
            let expected_days = (seconds_left / SECONDS_PER_DAY).ceil().max(0.0) as i64;
            prop_assert_eq!(result.days_remaining, expected_days);
            if start <= now_date {
                prop_assert!(midnight(result.cycle_start) <= now);
                prop_assert!(now < midnight(result.cycle_end));
            }
        }

        #[test]
        fn monthly_equivalent_is_linear_in_cost(
            cost in 0.0f64..10_000.0,
            factor in 0.0f64..100.0,
            cycle in known_cycle(),
        ) {
            let scaled = monthly_equivalent(cost * factor, &cycle);
            let expected = monthly_equivalent(cost, &cycle) * factor;
            prop_assert!((scaled - expected).abs() <= 1e-6 * expected.abs().max(1.0));
        }
    }
}
