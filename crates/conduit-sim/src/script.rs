//! Line-oriented driver scripts.
//!
//! ```text
//! # comments and blank lines are ignored
//! add 0 0 0                  # conduit:item unless a type is given
//! add 0 1 0 conduit:basic_fluid
//! attach 2 0 0 east          # interface on a face, then refresh
//! block 1 0 0 east           # close a face, then refresh
//! unblock 1 0 0 east
//! detach 2 0 0 east
//! remove 1 0 0
//! route 0 0 0 furthest       # pick a destination from a segment
//! routes 0 0 0               # every cached path from a segment
//! networks
//! save layout.json
//! load layout.json
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use conduit_network::{
    Direction, NetworkManager, Position, RoundRobinCursor, RoutingMode, SegmentType, StaticWorld,
};
use thiserror::Error;
use tracing::{debug, info};

/// Script errors.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// Line could not be parsed
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Network operation failed
    #[error("line {line}: {source}")]
    Network {
        line: usize,
        #[source]
        source: conduit_network::Error,
    },

    /// Reading or writing a layout file failed
    #[error("line {line}: {source}")]
    Io {
        line: usize,
        #[source]
        source: std::io::Error,
    },
}

/// One script command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(Position, Option<SegmentType>),
    Remove(Position),
    Attach(Position, Direction),
    Detach(Position, Direction),
    Block(Position, Direction),
    Unblock(Position, Direction),
    Route(Position, RoutingMode),
    Routes(Position),
    Networks,
    Save(PathBuf),
    Load(PathBuf),
}

/// Parse one line; `None` for blank lines and comments.
pub fn parse_line(line: &str) -> Result<Option<Command>, String> {
    let line = line.split('#').next().unwrap_or_default().trim();
    if line.is_empty() {
        return Ok(None);
    }

    let words: Vec<&str> = line.split_whitespace().collect();
    let (name, args) = match words.split_first() {
        Some((name, args)) => (*name, args),
        None => return Ok(None),
    };

    let command = match name {
        "add" => Command::Add(position(args)?, args.get(3).map(|t| SegmentType::new(*t))),
        "remove" => Command::Remove(position(args)?),
        "attach" => Command::Attach(position(args)?, direction(args)?),
        "detach" => Command::Detach(position(args)?, direction(args)?),
        "block" => Command::Block(position(args)?, direction(args)?),
        "unblock" => Command::Unblock(position(args)?, direction(args)?),
        "route" => Command::Route(position(args)?, mode(args.get(3).copied())?),
        "routes" => Command::Routes(position(args)?),
        "networks" => Command::Networks,
        "save" => Command::Save(path(args)?),
        "load" => Command::Load(path(args)?),
        other => return Err(format!("unknown command `{other}`")),
    };
    Ok(Some(command))
}

fn position(args: &[&str]) -> Result<Position, String> {
    let coord = |i: usize| -> Result<i32, String> {
        let raw = args.get(i).ok_or("expected x y z")?;
        raw.parse().map_err(|_| format!("bad coordinate `{raw}`"))
    };
    Ok(Position::new(coord(0)?, coord(1)?, coord(2)?))
}

fn direction(args: &[&str]) -> Result<Direction, String> {
    let raw = args.get(3).ok_or("expected a direction")?;
    Direction::from_name(&raw.to_ascii_lowercase()).ok_or_else(|| format!("bad direction `{raw}`"))
}

fn mode(raw: Option<&str>) -> Result<RoutingMode, String> {
    match raw {
        None | Some("nearest") => Ok(RoutingMode::Nearest),
        Some("furthest") => Ok(RoutingMode::Furthest),
        Some("round_robin") | Some("roundrobin") => Ok(RoutingMode::RoundRobin),
        Some(other) => Err(format!("bad routing mode `{other}`")),
    }
}

fn path(args: &[&str]) -> Result<PathBuf, String> {
    args.first()
        .map(PathBuf::from)
        .ok_or_else(|| "expected a file path".to_string())
}

/// A manager, the world it lives in, and a round-robin cursor per sender.
pub struct Session {
    manager: NetworkManager,
    world: StaticWorld,
    cursors: HashMap<Position, RoundRobinCursor>,
    default_type: SegmentType,
    output: Vec<String>,
}

impl Session {
    /// Create a session around a manager.
    pub fn new(manager: NetworkManager) -> Self {
        let default_type = manager.config().baseline_segment_type.clone();
        Self {
            manager,
            world: StaticWorld::new(),
            cursors: HashMap::new(),
            default_type,
            output: Vec::new(),
        }
    }

    /// The manager being driven.
    pub fn manager(&self) -> &NetworkManager {
        &self.manager
    }

    /// Take the lines printed since the last call.
    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }

    /// Run a whole script, stopping at the first error.
    pub fn run_script(&mut self, script: &str) -> Result<(), ScriptError> {
        for (index, raw) in script.lines().enumerate() {
            let line = index + 1;
            let command = parse_line(raw).map_err(|message| ScriptError::Parse { line, message })?;
            if let Some(command) = command {
                self.execute(line, command)?;
            }
        }
        Ok(())
    }

    /// Run one command.
    pub fn execute(&mut self, line: usize, command: Command) -> Result<(), ScriptError> {
        let network_err = |source| ScriptError::Network { line, source };
        debug!(line, ?command, "Executing");

        match command {
            Command::Add(pos, kind) => {
                let kind = kind.unwrap_or_else(|| self.default_type.clone());
                let id = self
                    .manager
                    .add_segment(&self.world, pos, &kind)
                    .map_err(network_err)?;
                self.output.push(format!("added {kind} at {pos} -> {id}"));
            }
            Command::Remove(pos) => {
                self.manager
                    .remove_segment(&self.world, pos)
                    .map_err(network_err)?;
                self.output.push(format!("removed {pos}"));
            }
            Command::Attach(pos, dir) => {
                self.world.attach(pos, dir);
                self.refresh(pos).map_err(network_err)?;
            }
            Command::Detach(pos, dir) => {
                self.world.detach(pos, dir);
                self.refresh(pos).map_err(network_err)?;
            }
            Command::Block(pos, dir) => {
                self.world.block(pos, dir);
                self.refresh(pos).map_err(network_err)?;
                self.refresh(pos.offset(dir)).map_err(network_err)?;
            }
            Command::Unblock(pos, dir) => {
                self.world.unblock(pos, dir);
                self.refresh(pos).map_err(network_err)?;
                self.refresh(pos.offset(dir)).map_err(network_err)?;
            }
            Command::Route(from, mode) => {
                let cursor = self.cursors.entry(from).or_default();
                let picked = self
                    .manager
                    .select_destination(&self.world, from, mode, cursor, None);
                let text = match picked {
                    Some(dest) => format!("route {from} ({mode:?}) -> {dest}"),
                    None => format!("route {from} ({mode:?}) -> none"),
                };
                self.output.push(text);
            }
            Command::Routes(from) => self.print_routes(from),
            Command::Networks => self.print_networks(),
            Command::Save(path) => {
                let json = self.manager.to_json().map_err(network_err)?;
                std::fs::write(&path, json).map_err(|source| ScriptError::Io { line, source })?;
                info!(path = %path.display(), "Saved layout");
            }
            Command::Load(path) => {
                let json = std::fs::read_to_string(&path).map_err(|source| ScriptError::Io { line, source })?;
                self.manager
                    .from_json(&self.world, &json)
                    .map_err(network_err)?;
                info!(path = %path.display(), "Loaded layout");
            }
        }
        Ok(())
    }

    /// Refresh the segment at `pos`; faces of empty cells need nothing.
    fn refresh(&mut self, pos: Position) -> conduit_network::Result<()> {
        if self.manager.segment(pos).is_none() {
            return Ok(());
        }
        self.manager.refresh(&self.world, pos)
    }

    fn print_routes(&mut self, from: Position) {
        let Some(network) = self
            .manager
            .network_of(from)
            .and_then(|n| n.downcast_ref::<conduit_network::ItemNetwork>())
        else {
            self.output.push(format!("routes {from}: not an item network"));
            return;
        };

        let mut lines: Vec<String> = network
            .path_cache()
            .paths_from(from)
            .map(|(dest, path)| {
                let usable = if dest.is_usable(&self.world) { "" } else { " (unusable)" };
                format!("  {dest}: {} nodes{usable}", path.len())
            })
            .collect();
        lines.sort();
        self.output.push(format!("routes {from}: {}", lines.len()));
        self.output.extend(lines);
    }

    fn print_networks(&mut self) {
        let mut lines = vec![format!(
            "networks: {} ({} segments)",
            self.manager.network_count(),
            self.manager.segment_count()
        )];
        for network in self.manager.networks() {
            lines.push(format!(
                "  {} {} origin {} members {}",
                network.id(),
                network.network_type(),
                network.origin(),
                self.manager.members(network.id()).len()
            ));
        }
        self.output.extend(lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conduit_network::ManagerConfig;

    fn session() -> Session {
        Session::new(NetworkManager::with_defaults(ManagerConfig::seeded(3)))
    }

    #[test]
    fn parses_commands() {
        assert_eq!(parse_line("  # just a comment").unwrap(), None);
        assert_eq!(
            parse_line("add 1 -2 3 conduit:basic_fluid").unwrap(),
            Some(Command::Add(
                Position::new(1, -2, 3),
                Some(SegmentType::new("conduit:basic_fluid"))
            ))
        );
        assert_eq!(
            parse_line("block 0 0 0 East # closes a face").unwrap(),
            Some(Command::Block(Position::ORIGIN, Direction::East))
        );
        assert_eq!(
            parse_line("route 0 0 0").unwrap(),
            Some(Command::Route(Position::ORIGIN, RoutingMode::Nearest))
        );
    }

    #[test]
    fn rejects_bad_lines() {
        assert!(parse_line("add 1 2").is_err());
        assert!(parse_line("attach 0 0 0 sideways").is_err());
        assert!(parse_line("route 0 0 0 random").is_err());
        assert!(parse_line("teleport").is_err());
    }

    #[test]
    fn runs_a_split_script() {
        let mut session = session();
        session
            .run_script("add 0 0 0\nadd 1 0 0\nadd 2 0 0\nremove 1 0 0\nnetworks\n")
            .unwrap();
        assert_eq!(session.manager().network_count(), 2);
        let output = session.take_output();
        assert!(output.iter().any(|l| l.starts_with("networks: 2 (2 segments)")));
    }

    #[test]
    fn block_splits_and_route_follows_interfaces() {
        let mut session = session();
        session
            .run_script(
                "add 0 0 0\nadd 1 0 0\nadd 2 0 0\nattach 2 0 0 east\nroute 0 0 0 furthest\nblock 1 0 0 east\nroute 0 0 0\n",
            )
            .unwrap();
        let output = session.take_output();
        assert!(output.contains(&"route (0, 0, 0) (Furthest) -> (2, 0, 0) via east".to_string()));
        assert!(output.contains(&"route (0, 0, 0) (Nearest) -> none".to_string()));
        assert_eq!(session.manager().network_count(), 2);
    }

    #[test]
    fn round_robin_cursor_is_kept_per_sender() {
        let mut session = session();
        session
            .run_script(
                "add 0 0 0\nadd 1 0 0\nadd 2 0 0\nattach 0 0 0 west\nattach 2 0 0 east\n\
                 route 0 0 0 round_robin\nroute 2 0 0 round_robin\nroute 0 0 0 round_robin\n",
            )
            .unwrap();
        let routes: Vec<String> = session
            .take_output()
            .into_iter()
            .filter(|line| line.starts_with("route "))
            .collect();
        assert_eq!(
            routes,
            vec![
                "route (0, 0, 0) (RoundRobin) -> (0, 0, 0) via west".to_string(),
                "route (2, 0, 0) (RoundRobin) -> (0, 0, 0) via west".to_string(),
                "route (0, 0, 0) (RoundRobin) -> (2, 0, 0) via east".to_string(),
            ]
        );
    }

    #[test]
    fn errors_carry_line_numbers() {
        let mut session = session();
        let err = session.run_script("add 0 0 0\nadd 0 0 0\n").unwrap_err();
        assert!(matches!(err, ScriptError::Network { line: 2, .. }));
    }
}
