//! Battle client binary.
//!
//! Main entry point for running a scripted battle in the terminal.
//!
//! # Architecture
//!
//! This binary is the composition root that assembles:
//! 1. Battle setup (content, rules, script host) via BattleBuilder
//! 2. Frontend (presentation and player input)
//!
//! # Features
//!
//! - `frontend-cli`: terminal presentation (default)
//!
//! # Examples
//!
//! ```bash
//! # Bundled content, teams from battle.toml
//! cargo run -p battle-client
//!
//! # Two AI teams, seeded tie-break, JSON event log
//! BATTLE_TEAMS=warband,raiders BATTLE_SEED=7 BATTLE_EVENT_LOG=events.jsonl \
//!     cargo run -p battle-client
//! ```

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    #[cfg(feature = "frontend-cli")]
    {
        run_cli().await?;
    }

    #[cfg(not(feature = "frontend-cli"))]
    {
        compile_error!("At least one frontend feature must be enabled (frontend-cli)");
    }

    Ok(())
}

/// Run the CLI frontend.
#[cfg(feature = "frontend-cli")]
async fn run_cli() -> Result<()> {
    use battle_client::Client;
    use client_bootstrap::{BattleBuilder, ClientConfig};
    use client_frontend_cli::{CliConfig, CliFrontend, logging};

    // 1. Load configuration from environment
    let client_config = ClientConfig::from_env();
    let cli_config = CliConfig::from_env();

    // 2. Setup logging; the guard flushes the log file on exit
    let _guard = logging::setup_logging(client_config.session_id.as_deref())?;

    tracing::info!("Starting battle client");
    tracing::info!("Data directory: {}", client_config.data_dir.display());

    // 3. Load content and assemble the battle
    let event_log = client_config.event_log.clone();
    let setup = BattleBuilder::new(client_config).build()?;

    // 4. Build Frontend
    let frontend = CliFrontend::new(cli_config).with_event_log(event_log);

    // 5. Build and run
    let client = Client::builder().setup(setup).frontend(frontend).build()?;
    let report = client.run().await?;

    tracing::info!(rounds = report.rounds, "Client shutdown complete");
    Ok(())
}
