//! `/composter` administrative command.

use crate::world::player::Permissions;

pub const RELOAD_PERMISSION: &str = "littlecomposter.reload";

pub const NO_PERMISSION_MESSAGE: &str = "You don't have permission for this command!";

/// Who runs a command
#[derive(Debug, Clone, Copy)]
pub enum CommandSender<'a> {
    /// Server console, allowed everything
    Console,
    Player(&'a Permissions),
}

impl CommandSender<'_> {
    pub fn has_permission(&self, node: &str) -> bool {
        match self {
            Self::Console => true,
            Self::Player(perms) => perms.has(node),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminCommand {
    NoPermission,
    Reload,
    Help,
}

pub fn parse_admin_command(sender: CommandSender<'_>, args: &[&str]) -> AdminCommand {
    if !sender.has_permission(RELOAD_PERMISSION) {
        return AdminCommand::NoPermission;
    }

    match args.first() {
        Some(&"reload") => AdminCommand::Reload,
        _ => AdminCommand::Help,
    }
}

pub fn help_lines() -> Vec<String> {
    vec![
        "> Composter Help:".into(),
        "".into(),
        "  /composter reload  Reloads compost materials from config.".into(),
        "".into(),
        ">".into(),
    ]
}

pub fn reloaded_message(recipes: usize) -> String {
    format!("Loaded {recipes} recipes.")
}
