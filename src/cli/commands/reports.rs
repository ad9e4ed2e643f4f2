use crate::cli::args::{parse_days, ParsedArgs};
use crate::cli::context::{CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::render;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("summary", "Monthly and annual totals", "summary", cmd_summary),
        CommandEntry::new(
            "upcoming",
            "Payments due soon",
            "upcoming [days]",
            cmd_upcoming,
        ),
        CommandEntry::new(
            "categories",
            "Monthly spend per category",
            "categories",
            cmd_categories,
        ),
        CommandEntry::new(
            "breakdown",
            "Billed amounts per cycle",
            "breakdown",
            cmd_breakdown,
        ),
        CommandEntry::new("stats", "Collection statistics", "stats", cmd_stats),
    ]
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let manager = &context.manager;
    output::section("Summary");
    output::block(&render::summary_report(
        manager.total_monthly_cost(),
        manager.total_annual_cost(),
        manager.list().len(),
        &context.config.currency,
    ));
    Ok(())
}

fn cmd_upcoming(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &[], &[])?;
    let window = match parsed.positionals.first() {
        Some(raw) => parse_days(raw)?,
        None => context.config.upcoming_window_days,
    };
    let today = context.manager.today();
    let payments = context.manager.upcoming_payments(window);
    output::section(format!("Upcoming ({window} days)"));
    output::block(&render::upcoming_report(&payments, today, window));
    Ok(())
}

fn cmd_categories(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let summaries = context.manager.by_category();
    output::section("Categories");
    output::block(&render::category_report(&summaries, &context.config.currency));
    Ok(())
}

fn cmd_breakdown(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section("By billing cycle");
    output::block(&render::breakdown_report(
        &context.manager.cost_breakdown(),
        &context.config.currency,
    ));
    Ok(())
}

fn cmd_stats(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section("Statistics");
    output::block(&render::stats_report(&context.manager.stats()));
    Ok(())
}
