pub mod data;
pub mod reports;
pub mod subscriptions;
pub mod system;

use crate::cli::registry::CommandEntry;

pub(crate) fn all_definitions() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(subscriptions::definitions());
    commands.extend(reports::definitions());
    commands.extend(data::definitions());
    commands.extend(system::definitions());
    commands
}
