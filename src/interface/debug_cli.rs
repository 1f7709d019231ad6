//! Text console: read stdin → parse command → run it and print the reply

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use bevy::app::AppExit;
use bevy::prelude::*;
use once_cell::sync::Lazy;

use crate::composter::command::{
    help_lines, parse_admin_command, reloaded_message, AdminCommand, CommandSender, NO_PERMISSION_MESSAGE,
};
use crate::composter::ItemKind;
use crate::core::events::LogEvent;
use crate::core::settings::ServerSettings;
use crate::core::states::AppState;
use crate::data::{self, Compostables};
use crate::world::block::{Block, BlockKind, BlockState, BlockWorld};
use crate::world::events::PlayerInteractEvent;
use crate::world::inventory::ItemStack;
use crate::world::player::{HeldItem, Permissions, Player};

static CLI_BUFFER: Lazy<Arc<Mutex<VecDeque<String>>>> = Lazy::new(|| Arc::new(Mutex::new(VecDeque::new())));

/// Plugin entry
pub struct DebugCliPlugin;

impl Plugin for DebugCliPlugin {
    fn build(&self, app: &mut App) {
        {
            let buffer = CLI_BUFFER.clone();
            std::thread::spawn(move || {
                use std::io::{self, BufRead};
                let stdin = io::stdin();
                for line in stdin.lock().lines().map_while(Result::ok) {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    match buffer.lock() {
                        Ok(mut buf) => buf.push_back(line.to_string()),
                        Err(_) => break,
                    }
                }
            });
        }
        app
            // raw input lines
            .add_event::<CliLine>()
            .add_systems(Update, read_stdin)
            // commands only run once the server is up
            .add_systems(Update, execute_cli_commands.run_if(in_state(AppState::Running)));
    }
}

/* ---------------------------- Events & commands ---------------------------- */

/// One line typed into the terminal
#[derive(Event)]
struct CliLine(String);

#[derive(Debug, PartialEq)]
enum Command {
    Help,
    Status,
    Exit,
    /// `/composter ...`, run by the console or by the player
    Composter { as_player: bool, args: Vec<String> },
    Grant(String),
    Revoke(String),
    Place { kind: BlockKind, at: IVec3, facing: Option<String> },
    Give { at: IVec3, kind: ItemKind, count: u32 },
    Hold { kind: ItemKind, count: u32 },
    Use(IVec3),
    Inspect(IVec3),
    /// Known command, bad arguments
    Invalid(String),
    Unsupported(String),
}

/* ---------------------------- stdin ---------------------------- */

fn read_stdin(mut writer: EventWriter<CliLine>) {
    let Ok(mut buffer) = CLI_BUFFER.lock() else {
        return;
    };
    while let Some(line) = buffer.pop_front() {
        writer.write(CliLine(line));
    }
}

/* ---------------------------- Execution ---------------------------- */

#[allow(clippy::too_many_arguments)]
fn execute_cli_commands(
    mut line_reader: EventReader<CliLine>,
    mut app_exit: EventWriter<AppExit>,
    mut log: EventWriter<LogEvent>,
    mut ev_interact: EventWriter<PlayerInteractEvent>,
    state: Res<State<AppState>>,
    settings: Res<ServerSettings>,
    mut compostables: ResMut<Compostables>,
    mut world: ResMut<BlockWorld>,
    mut q_player: Query<(Entity, &Player, &mut HeldItem, &mut Permissions)>,
) {
    for CliLine(input) in line_reader.read() {
        match parse_command(input) {
            Command::Help => {
                log.write(LogEvent(
                    "Commands:
  help                              show this list
  status                            show server state
  exit / quit                       stop the server
  composter [reload]                run /composter as the console
  player composter [reload]         run /composter as the player
  grant <permission>                give the player a permission
  revoke <permission>               take a permission away
  place <block> <x> <y> <z> [facing]  place composter / hopper / chest / stone
  give <x> <y> <z> <item> [count]   put items into a block inventory
  hold <item> [count]               put items in the player's hand
  use <x> <y> <z>                   player uses the held item on a block
  inspect <x> <y> <z>               dump a block"
                        .into(),
                ));
            }

            Command::Status => {
                log.write(LogEvent(format!(
                    "State: {:?}, Compostables: {}, Blocks: {}",
                    state.get(),
                    compostables.len(),
                    world.len()
                )));
            }

            Command::Exit => {
                log.write(LogEvent("Bye~".into()));
                app_exit.write(AppExit::Success);
            }

            Command::Composter { as_player, args } => {
                let args: Vec<&str> = args.iter().map(String::as_str).collect();
                let command = if as_player {
                    let Ok((_, _, _, perms)) = q_player.single() else {
                        log.write(LogEvent("No player online".into()));
                        continue;
                    };
                    parse_admin_command(CommandSender::Player(perms), &args)
                } else {
                    parse_admin_command(CommandSender::Console, &args)
                };

                match command {
                    AdminCommand::NoPermission => {
                        log.write(LogEvent(NO_PERMISSION_MESSAGE.into()));
                    }
                    AdminCommand::Reload => match data::reload(&settings, &mut compostables) {
                        Ok(n) => {
                            log.write(LogEvent(reloaded_message(n)));
                        }
                        Err(e) => {
                            error!("Reload failed: {e}");
                            log.write(LogEvent(format!("Reload failed, kept {} recipes: {e}", compostables.len())));
                        }
                    },
                    AdminCommand::Help => {
                        for line in help_lines() {
                            log.write(LogEvent(line));
                        }
                    }
                }
            }

            Command::Grant(node) => {
                if let Ok((_, player, _, mut perms)) = q_player.single_mut() {
                    log.write(LogEvent(format!("Granted {node} to {}", player.name)));
                    perms.0.insert(node);
                }
            }

            Command::Revoke(node) => {
                if let Ok((_, player, _, mut perms)) = q_player.single_mut() {
                    if perms.0.remove(&node) {
                        log.write(LogEvent(format!("Revoked {node} from {}", player.name)));
                    } else {
                        log.write(LogEvent(format!("{} does not have {node}", player.name)));
                    }
                }
            }

            Command::Place { kind, at, facing } => {
                let block = match (kind, facing) {
                    (BlockKind::Hopper, Some(facing)) => Block::hopper(facing),
                    (kind, _) => Block::new(kind),
                };
                world.set(at, block);
                log.write(LogEvent(format!("Placed {kind} at {at}")));
            }

            Command::Give { at, kind, count } => {
                let Some(inventory) = world.get_mut(at).and_then(|b| b.inventory.as_mut()) else {
                    log.write(LogEvent(format!("No inventory at {at}")));
                    continue;
                };
                let leftover = inventory.add(&kind, count);
                log.write(LogEvent(format!("Gave {kind} ×{} to {at}", count - leftover)));
                if leftover > 0 {
                    warn!("Inventory at {at} is full, dropped {leftover} {kind}");
                }
            }

            Command::Hold { kind, count } => {
                if let Ok((_, player, mut held, _)) = q_player.single_mut() {
                    log.write(LogEvent(format!("{} now holds {kind} ×{count}", player.name)));
                    held.0 = (count > 0).then(|| ItemStack::new(kind, count));
                }
            }

            Command::Use(at) => {
                if let Ok((entity, _, _, _)) = q_player.single() {
                    ev_interact.write(PlayerInteractEvent { player: entity, block: at });
                }
            }

            Command::Inspect(at) => {
                let text = match world.get(at) {
                    None => "air".to_string(),
                    Some(block) => serde_json::to_string_pretty(block).unwrap_or_else(|e| format!("{block:?} ({e})")),
                };
                log.write(LogEvent(format!("{at}: {text}")));
                if let Some(BlockState::Levelled(l)) = world.get(at).map(|b| &b.state) {
                    log.write(LogEvent(format!("level {}/{}", l.level, l.maximum_level)));
                }
            }

            Command::Invalid(msg) => {
                log.write(LogEvent(msg));
            }

            Command::Unsupported(cmd) => {
                log.write(LogEvent(format!("Unsupported command: {cmd}")));
            }
        }
    }
}

/* ---------------------------- Parsing ---------------------------- */

fn parse_command(input: &str) -> Command {
    let mut parts = input.split_whitespace();
    let cmd = parts.next().unwrap_or("").to_lowercase();
    let rest: Vec<&str> = parts.collect();

    match cmd.as_str() {
        "help" | "h" | "?" => Command::Help,
        "status" | "s" => Command::Status,
        "exit" | "quit" | "q" => Command::Exit,
        "composter" => Command::Composter {
            as_player: false,
            args: rest.iter().map(|s| s.to_string()).collect(),
        },
        "player" => match rest.split_first() {
            Some((&"composter", args)) => Command::Composter {
                as_player: true,
                args: args.iter().map(|s| s.to_string()).collect(),
            },
            _ => Command::Invalid("usage: player composter [reload]".into()),
        },
        "grant" | "revoke" => match rest.first() {
            Some(node) if cmd == "grant" => Command::Grant(node.to_string()),
            Some(node) => Command::Revoke(node.to_string()),
            None => Command::Invalid(format!("usage: {cmd} <permission>")),
        },
        "place" => {
            let kind = rest.first().and_then(|s| s.parse::<BlockKind>().ok());
            match (kind, parse_pos(rest.get(1..4))) {
                (Some(kind), Some(at)) => Command::Place {
                    kind,
                    at,
                    facing: rest.get(4).map(|s| s.to_string()),
                },
                _ => Command::Invalid("usage: place <composter|hopper|chest|stone> <x> <y> <z> [facing]".into()),
            }
        }
        "give" => {
            let kind = rest.get(3).and_then(|s| s.parse::<ItemKind>().ok());
            let count = rest.get(4).and_then(|s| s.parse().ok()).unwrap_or(1);
            match (parse_pos(rest.get(0..3)), kind) {
                (Some(at), Some(kind)) => Command::Give { at, kind, count },
                _ => Command::Invalid("usage: give <x> <y> <z> <item> [count]".into()),
            }
        }
        "hold" => match rest.first().and_then(|s| s.parse::<ItemKind>().ok()) {
            Some(kind) => Command::Hold {
                kind,
                count: rest.get(1).and_then(|s| s.parse().ok()).unwrap_or(1),
            },
            None => Command::Invalid("usage: hold <item> [count]".into()),
        },
        "use" => match parse_pos(rest.get(0..3)) {
            Some(at) => Command::Use(at),
            None => Command::Invalid("usage: use <x> <y> <z>".into()),
        },
        "inspect" => match parse_pos(rest.get(0..3)) {
            Some(at) => Command::Inspect(at),
            None => Command::Invalid("usage: inspect <x> <y> <z>".into()),
        },
        other => Command::Unsupported(other.into()),
    }
}

fn parse_pos(coords: Option<&[&str]>) -> Option<IVec3> {
    let [x, y, z] = coords? else {
        return None;
    };
    Some(IVec3::new(x.parse().ok()?, y.parse().ok()?, z.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_composter_commands() {
        assert_eq!(
            parse_command("composter reload"),
            Command::Composter {
                as_player: false,
                args: vec!["reload".into()]
            }
        );
        assert_eq!(
            parse_command("player composter"),
            Command::Composter {
                as_player: true,
                args: vec![]
            }
        );
        assert!(matches!(parse_command("player dance"), Command::Invalid(_)));
    }

    #[test]
    fn parses_world_commands() {
        assert_eq!(
            parse_command("place hopper 0 -1 2 up"),
            Command::Place {
                kind: BlockKind::Hopper,
                at: IVec3::new(0, -1, 2),
                facing: Some("up".into())
            }
        );
        assert_eq!(
            parse_command("give 1 2 3 minecraft:bone 16"),
            Command::Give {
                at: IVec3::new(1, 2, 3),
                kind: "bone".parse().unwrap(),
                count: 16
            }
        );
        assert_eq!(
            parse_command("hold rotten_flesh"),
            Command::Hold {
                kind: "rotten_flesh".parse().unwrap(),
                count: 1
            }
        );
        assert_eq!(parse_command("use 0 1 0"), Command::Use(IVec3::Y));
        assert_eq!(parse_command("INSPECT 0 0 0"), Command::Inspect(IVec3::ZERO));
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(matches!(parse_command("place dirt 0 0 0"), Command::Invalid(_)));
        assert!(matches!(parse_command("use 0 x 0"), Command::Invalid(_)));
        assert!(matches!(parse_command("inspect 0 0"), Command::Invalid(_)));
        assert!(matches!(parse_command("grant"), Command::Invalid(_)));
        assert_eq!(parse_command("dance"), Command::Unsupported("dance".into()));
    }
}
