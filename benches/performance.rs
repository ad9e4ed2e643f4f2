use chrono::{Duration, NaiveDate, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use subtrack::domain::{BillingCycle, NewSubscription, Subscription};
use subtrack::services::{monthly_equivalent, next_payment_date, SummaryService};
use subtrack::storage::{load_collection_from_path, save_collection_to_path};
use tempfile::tempdir;

fn build_sample_collection(count: usize) -> Vec<Subscription> {
    let start = NaiveDate::from_ymd_opt(2020, 1, 31).unwrap();
    let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let categories = ["Streaming", "Music", "Software", "Fitness", "Other"];

    (0..count)
        .map(|idx| {
            let cycle = BillingCycle::KNOWN[idx % BillingCycle::KNOWN.len()].clone();
            let draft = NewSubscription::new(
                format!("Service {idx}"),
                4.99 + (idx % 50) as f64,
                cycle,
                start + Duration::days((idx % 900) as i64),
            )
            .with_category(categories[idx % categories.len()]);
            Subscription::from_draft(draft, created)
        })
        .collect()
}

fn bench_cycle_math(c: &mut Criterion) {
    let start = NaiveDate::from_ymd_opt(2015, 1, 31).unwrap();
    let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();

    c.bench_function("next_payment_monthly_10y", |b| {
        b.iter(|| next_payment_date(black_box(start), &BillingCycle::Monthly, black_box(today)))
    });
    c.bench_function("next_payment_weekly_10y", |b| {
        b.iter(|| next_payment_date(black_box(start), &BillingCycle::Weekly, black_box(today)))
    });
    c.bench_function("monthly_equivalent", |b| {
        b.iter(|| monthly_equivalent(black_box(120.0), &BillingCycle::Yearly))
    });
}

fn bench_summaries(c: &mut Criterion) {
    let collection = build_sample_collection(black_box(5_000));
    let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();

    c.bench_function("totals_5k", |b| {
        b.iter(|| SummaryService::total_monthly_cost(black_box(&collection)))
    });
    c.bench_function("by_category_5k", |b| {
        b.iter(|| black_box(SummaryService::by_category(&collection)))
    });
    c.bench_function("upcoming_30d_5k", |b| {
        b.iter(|| black_box(SummaryService::upcoming_payments(&collection, today, 30)))
    });
}

fn bench_collection_io(c: &mut Criterion) {
    let collection = build_sample_collection(5_000);
    let dir = tempdir().expect("tempdir");
    let file_path = dir.path().join("subscriptions.json");

    c.bench_function("collection_save_5k", |b| {
        b.iter(|| save_collection_to_path(&collection, &file_path).expect("save collection"))
    });

    save_collection_to_path(&collection, &file_path).expect("seed");

    c.bench_function("collection_load_5k", |b| {
        b.iter(|| black_box(load_collection_from_path(&file_path).expect("load collection")))
    });
}

criterion_group!(benches, bench_cycle_math, bench_summaries, bench_collection_io);
criterion_main!(benches);
