//! Conduit Network Simulator
//!
//! Drive a network manager from a line script and print what happened.
//!
//! ```text
//! conduit-sim [SCRIPT]
//! ```
//!
//! Reads the script from `SCRIPT`, or stdin when no path is given. Logging
//! honours `RUST_LOG`; `CONDUIT_SEED` makes network ids reproducible.

mod script;

use std::io::Read;

use conduit_network::{ManagerConfig, NetworkManager};
use script::Session;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "conduit_sim=info,conduit_network=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let script = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let config = ManagerConfig::from_env();
    tracing::info!(seed = ?config.seed, "Starting conduit simulation");

    let mut session = Session::new(NetworkManager::with_defaults(config));
    let result = session.run_script(&script);

    for line in session.take_output() {
        println!("{line}");
    }
    result?;

    let manager = session.manager();
    println!();
    println!("Simulation complete:");
    println!("  Segments: {}", manager.segment_count());
    println!("  Networks: {}", manager.network_count());
    println!("  Unsaved changes: {}", manager.is_dirty());

    Ok(())
}
