//! apex-presence: mirrors Apex Legends rich presence from Steam to Discord.
//! Single-process binary: reads the Steam event feed, translates each
//! presence snapshot and publishes it over Discord IPC.

use clap::Parser;

mod bridge;
mod cli;
mod cmd_translate;

use apex_presence_source_steam::SourceConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    let filter = std::env::var("APEX_PRESENCE_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());
    // Logs go to stderr so dry-run and translate output stay clean.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    let command = args
        .command
        .unwrap_or_else(|| cli::Command::Run(cli::RunOpts::default()));

    match command {
        cli::Command::Run(opts) => {
            tracing::info!("apex-presence starting (app {})", args.app_id);
            let config = SourceConfig {
                app_id: args.app_id,
                account_id: args.account_id,
            };
            bridge::run_bridge(opts, config, args.client_id, args.ipc_path).await?;
        }
        cli::Command::Translate(opts) => {
            cmd_translate::cmd_translate(opts.file.as_deref())?;
        }
    }

    Ok(())
}
