use subtrack_domain::{NewSubscription, SubscriptionPatch};

use crate::cli::args::{
    optional_text, parse_cost, parse_cycle, parse_date, ParsedArgs,
};
use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::render;

const ADD_OPTIONS: &[&str] = &["start", "currency", "category", "notes"];
const UPDATE_OPTIONS: &[&str] = &[
    "name", "cost", "cycle", "start", "currency", "category", "notes",
];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("list", "List subscriptions", "list [--json]", cmd_list),
        CommandEntry::new("show", "Show one subscription", "show <id>", cmd_show),
        CommandEntry::new(
            "add",
            "Add a subscription",
            "add <name> <cost> <weekly|monthly|quarterly|yearly> [--start YYYY-MM-DD] [--currency CODE] [--category NAME] [--notes TEXT]",
            cmd_add,
        ),
        CommandEntry::new(
            "update",
            "Change fields of a subscription",
            "update <id> [--name N] [--cost C] [--cycle CYCLE] [--start YYYY-MM-DD] [--currency CODE] [--category NAME] [--notes TEXT]",
            cmd_update,
        ),
        CommandEntry::new("delete", "Delete a subscription", "delete <id>", cmd_delete),
    ]
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &[], &["json"])?;
    let subscriptions = context.manager.list();
    if parsed.has("json") {
        output::block(&serde_json::to_string_pretty(subscriptions)?);
        return Ok(());
    }
    output::block(&render::subscription_table(subscriptions, context.manager.today()));
    Ok(())
}

fn cmd_show(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &[], &[])?;
    let id = context.resolve_id(parsed.positional(0, "id")?)?;
    let progress = context.manager.billing_progress(&id)?;
    let sub = context.manager.get(&id)?;
    output::block(&render::subscription_detail(sub, context.manager.today(), &progress));
    Ok(())
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, ADD_OPTIONS, &[])?;
    let name = parsed.positional(0, "name")?;
    let cost = parse_cost(parsed.positional(1, "cost")?)?;
    let cycle = parse_cycle(parsed.positional(2, "cycle")?)?;
    if parsed.positionals.len() > 3 {
        return Err(CommandError::InvalidArguments(
            "too many arguments; quote names that contain spaces".into(),
        ));
    }
    let start = match parsed.get("start") {
        Some(raw) => parse_date(raw)?,
        None => context.manager.today(),
    };

    let mut draft = NewSubscription::new(name, cost, cycle, start);
    if let Some(currency) = parsed.get("currency") {
        draft = draft.with_currency(currency);
    }
    if let Some(category) = parsed.get("category").and_then(optional_text) {
        draft = draft.with_category(category);
    }
    if let Some(notes) = parsed.get("notes").and_then(optional_text) {
        draft = draft.with_notes(notes);
    }

    let added = context.manager.add(draft)?;
    output::success(format!("Added `{}` ({})", added.name, added.id));
    Ok(())
}

fn cmd_update(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, UPDATE_OPTIONS, &[])?;
    let id = context.resolve_id(parsed.positional(0, "id")?)?;

    let patch = SubscriptionPatch {
        name: parsed.get("name").map(str::to_string),
        cost: parsed.get("cost").map(parse_cost).transpose()?,
        currency: parsed.get("currency").map(str::to_string),
        billing_cycle: parsed.get("cycle").map(parse_cycle).transpose()?,
        start_date: parsed.get("start").map(parse_date).transpose()?,
        category: parsed.get("category").map(optional_text),
        notes: parsed.get("notes").map(optional_text),
    };
    if patch.is_empty() {
        output::warning("No changes given; only the modification time will move.");
    }

    let updated = context.manager.update(&id, patch)?;
    output::success(format!("Updated `{}`", updated.name));
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &[], &[])?;
    let id = context.resolve_id(parsed.positional(0, "id")?)?;
    let removed = context.manager.delete(&id)?;
    output::success(format!("Deleted `{}`", removed.name));
    Ok(())
}
