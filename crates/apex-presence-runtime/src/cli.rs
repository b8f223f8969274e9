//! CLI definition using clap derive.

use std::path::PathBuf;

use apex_presence_source_steam::source::APEX_LEGENDS_APP_ID;
use clap::{Parser, Subcommand};

/// Discord application that owns the presence assets.
pub const DEFAULT_CLIENT_ID: &str = "893911040713191444";

#[derive(Parser)]
#[command(
    name = "apex-presence",
    about = "Mirror Apex Legends rich presence from Steam to Discord"
)]
pub struct Cli {
    /// Discord application (client) id
    #[arg(long, global = true, env = "APEX_PRESENCE_CLIENT_ID", default_value = DEFAULT_CLIENT_ID)]
    pub client_id: String,

    /// Steam app id that enables the bridge while running
    #[arg(long, global = true, env = "APEX_PRESENCE_APP_ID", default_value_t = APEX_LEGENDS_APP_ID)]
    pub app_id: u32,

    /// Mirror presence for this Steam account id (default: the logged-in account)
    #[arg(long, global = true, env = "APEX_PRESENCE_ACCOUNT_ID")]
    pub account_id: Option<u32>,

    /// Discord IPC socket (default: probe discord-ipc-0..9)
    #[arg(long, global = true, env = "APEX_PRESENCE_IPC_PATH")]
    pub ipc_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Read the Steam event feed and publish to Discord (default)
    Run(RunOpts),
    /// Translate a single presence snapshot and print the activity JSON
    Translate(TranslateOpts),
}

#[derive(clap::Args, Default)]
pub struct RunOpts {
    /// Event feed file (default: stdin)
    #[arg(long, short = 'i')]
    pub input: Option<PathBuf>,

    /// Print activities as JSON lines instead of publishing them
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(clap::Args)]
pub struct TranslateOpts {
    /// Snapshot file: a `{key: value}` object or a `[{key, value}]` list
    /// (default: stdin)
    pub file: Option<PathBuf>,
}
