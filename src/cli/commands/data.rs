use std::path::Path;

use crate::cli::args::ParsedArgs;
use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::render;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("clear", "Delete every subscription", "clear --yes", cmd_clear),
        CommandEntry::new("export", "Write the collection to a file", "export <path>", cmd_export),
        CommandEntry::new(
            "import",
            "Replace the collection with a file's contents",
            "import <path>",
            cmd_import,
        ),
        CommandEntry::new("backup", "Snapshot the saved collection", "backup [note]", cmd_backup),
        CommandEntry::new("backups", "List backups, newest first", "backups", cmd_backups),
        CommandEntry::new(
            "restore",
            "Make a backup the live collection",
            "restore <backup>",
            cmd_restore,
        ),
    ]
}

fn cmd_clear(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &[], &["yes"])?;
    if !parsed.has("yes") {
        return Err(CommandError::InvalidArguments(
            "`clear` removes every subscription; run `clear --yes` to confirm".into(),
        ));
    }
    let dropped = context.manager.clear_all()?;
    output::success(format!("Removed {dropped} subscription(s)"));
    Ok(())
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &[], &[])?;
    let path = Path::new(parsed.positional(0, "path")?);
    let count = context.manager.export(path)?;
    output::success(format!("Exported {count} subscription(s) to {}", path.display()));
    Ok(())
}

fn cmd_import(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &[], &[])?;
    let path = Path::new(parsed.positional(0, "path")?);
    let count = context.manager.import(path)?;
    output::success(format!("Imported {count} subscription(s) from {}", path.display()));
    Ok(())
}

fn cmd_backup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let note = (!args.is_empty()).then(|| args.join(" "));
    let info = context.manager.backup(note.as_deref())?;
    output::success(format!("Backup created: {}", info.id));
    Ok(())
}

fn cmd_backups(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let backups = context.manager.list_backups()?;
    output::section("Backups");
    output::block(&render::backup_report(&backups));
    Ok(())
}

fn cmd_restore(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &[], &[])?;
    let backup = parsed.positional(0, "backup")?;
    let count = context.manager.restore_backup(backup)?;
    output::success(format!("Restored {count} subscription(s) from {backup}"));
    Ok(())
}
