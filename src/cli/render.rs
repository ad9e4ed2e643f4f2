//! Text rendering for shell views. Everything here returns plain strings so
//! views can be snapshot-tested without a terminal.

use chrono::NaiveDate;
use subtrack_core::{
    format::{
        due_label, format_currency, icon_color, icon_initials, CurrencyFormatter, DateFormatter,
        EnUsFormatter,
    },
    monthly_equivalent, next_payment_date, storage::BackupInfo, BillingProgress, CategorySummary,
    CollectionStats, CycleBreakdown, UpcomingPayment,
};
use subtrack_domain::{category_color, is_known_category, BillingCycle, Subscription};

const ID_PREVIEW: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

pub struct Table {
    columns: Vec<(&'static str, Alignment)>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<(&'static str, Alignment)>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    fn widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, (header, _))| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(idx))
                    .map(|cell| cell.chars().count())
                    .fold(header.chars().count(), usize::max)
            })
            .collect()
    }

    fn render_row(&self, cells: &[&str], widths: &[usize]) -> String {
        let rendered: Vec<String> = self
            .columns
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(idx, ((_, align), width))| {
                let cell = cells.get(idx).copied().unwrap_or("");
                match align {
                    Alignment::Left => format!("{cell:<width$}"),
                    Alignment::Right => format!("{cell:>width$}"),
                }
            })
            .collect();
        rendered.join("  ").trim_end().to_string()
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let headers: Vec<&str> = self.columns.iter().map(|(header, _)| *header).collect();
        let mut lines = vec![self.render_row(&headers, &widths)];
        let rule_width = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        lines.push("-".repeat(rule_width));
        for row in &self.rows {
            let cells: Vec<&str> = row.iter().map(String::as_str).collect();
            lines.push(self.render_row(&cells, &widths));
        }
        lines.join("\n")
    }
}

pub fn short_id(sub: &Subscription) -> String {
    sub.id.as_str().chars().take(ID_PREVIEW).collect()
}

pub fn subscription_table(subscriptions: &[Subscription], today: NaiveDate) -> String {
    if subscriptions.is_empty() {
        return "No subscriptions yet. Add one with `add <name> <cost> <cycle>`.".into();
    }
    let mut table = Table::new(vec![
        ("ID", Alignment::Left),
        ("Name", Alignment::Left),
        ("Cost", Alignment::Right),
        ("Cycle", Alignment::Left),
        ("Monthly", Alignment::Right),
        ("Next", Alignment::Left),
        ("Category", Alignment::Left),
    ]);
    for sub in subscriptions {
        let next = next_payment_date(sub.start_date, &sub.billing_cycle, today);
        table.push(vec![
            short_id(sub),
            sub.name.clone(),
            format_currency(sub.cost, &sub.currency),
            sub.billing_cycle.label().to_string(),
            format_currency(monthly_equivalent(sub.cost, &sub.billing_cycle), &sub.currency),
            due_label(next, today),
            sub.effective_category().to_string(),
        ]);
    }
    table.render()
}

pub fn subscription_detail(sub: &Subscription, today: NaiveDate, progress: &BillingProgress) -> String {
    let formatter = EnUsFormatter;
    let next = next_payment_date(sub.start_date, &sub.billing_cycle, today);
    let mut lines = vec![
        format!("[{} {}] {}", icon_initials(&sub.name), icon_color(&sub.name), sub.name),
        format!("  id        : {}", sub.id),
        format!(
            "  cost      : {} {}",
            formatter.format_amount(sub.cost, &sub.currency),
            sub.billing_cycle.label().to_lowercase()
        ),
        format!(
            "  monthly   : {}",
            formatter.format_amount(monthly_equivalent(sub.cost, &sub.billing_cycle), &sub.currency)
        ),
        format!(
            "  charges   : {} per year",
            sub.billing_cycle.payments_per_year()
        ),
        format!("  started   : {}", formatter.format_date(sub.start_date)),
        format!(
            "  next      : {} ({})",
            formatter.format_date(next),
            due_label(next, today)
        ),
        format!(
            "  cycle     : {} -> {}, {:.0}% elapsed, {} day(s) left",
            formatter.format_date(progress.cycle_start),
            formatter.format_date(progress.cycle_end),
            progress.progress * 100.0,
            progress.days_remaining
        ),
        format!(
            "  category  : {} {}",
            sub.effective_category(),
            category_color(sub.effective_category())
        ),
    ];
    if !is_known_category(sub.effective_category()) {
        lines.push("  custom    : category outside the catalog, shown with the Other color".into());
    }
    if let Some(notes) = &sub.notes {
        lines.push(format!("  notes     : {notes}"));
    }
    if !sub.billing_cycle.is_known() {
        lines.push("  warning   : unrecognized billing cycle, figures use fallbacks".into());
    }
    lines.join("\n")
}

pub fn summary_report(monthly: f64, annual: f64, count: usize, currency: &str) -> String {
    [
        format!("Subscriptions : {count}"),
        format!("Monthly total : {}", format_currency(monthly, currency)),
        format!("Annual total  : {}", format_currency(annual, currency)),
    ]
    .join("\n")
}

pub fn category_report(summaries: &[CategorySummary<'_>], currency: &str) -> String {
    if summaries.is_empty() {
        return "No spending to group yet.".into();
    }
    let mut table = Table::new(vec![
        ("Category", Alignment::Left),
        ("Count", Alignment::Right),
        ("Monthly", Alignment::Right),
        ("Share", Alignment::Right),
    ]);
    for summary in summaries {
        table.push(vec![
            summary.category.clone(),
            summary.count.to_string(),
            format_currency(summary.total_monthly_cost, currency),
            format!("{:.1}%", summary.percentage_of_total),
        ]);
    }
    table.render()
}

pub fn breakdown_report(breakdown: &CycleBreakdown, currency: &str) -> String {
    let mut table = Table::new(vec![("Cycle", Alignment::Left), ("Billed", Alignment::Right)]);
    for cycle in BillingCycle::KNOWN {
        let amount = breakdown.get(&cycle).unwrap_or_default();
        table.push(vec![cycle.label().to_string(), format_currency(amount, currency)]);
    }
    table.render()
}

pub fn upcoming_report(payments: &[UpcomingPayment<'_>], today: NaiveDate, window_days: u32) -> String {
    if payments.is_empty() {
        return format!("Nothing due in the next {window_days} days.");
    }
    let mut table = Table::new(vec![
        ("Due", Alignment::Left),
        ("Date", Alignment::Left),
        ("Name", Alignment::Left),
        ("Amount", Alignment::Right),
    ]);
    for payment in payments {
        let sub = payment.subscription;
        table.push(vec![
            due_label(payment.next_payment, today),
            payment.next_payment.format("%Y-%m-%d").to_string(),
            sub.name.clone(),
            format_currency(sub.cost, &sub.currency),
        ]);
    }
    table.render()
}

pub fn stats_report(stats: &CollectionStats) -> String {
    let mut lines = vec![
        format!("Subscriptions : {}", stats.total),
        format!("Categories    : {}", stats.categories),
        format!("Weekly        : {}", stats.weekly),
        format!("Monthly       : {}", stats.monthly),
        format!("Quarterly     : {}", stats.quarterly),
        format!("Yearly        : {}", stats.yearly),
    ];
    if stats.unknown_cycle > 0 {
        lines.push(format!("Unrecognized  : {}", stats.unknown_cycle));
    }
    lines.join("\n")
}

pub fn backup_report(backups: &[BackupInfo]) -> String {
    if backups.is_empty() {
        return "No backups yet.".into();
    }
    let mut table = Table::new(vec![("Backup", Alignment::Left), ("Created (UTC)", Alignment::Left)]);
    for backup in backups {
        table.push(vec![backup.id.clone(), backup.created_at.clone()]);
    }
    table.render()
}
