use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "charms-resolve")]
#[command(about = "Resolve a Charms user's avatar and print the bound profile")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
    /// Platform user id
    pub user_id: String,

    /// Display name from the platform, if known
    #[arg(long)]
    pub name: Option<String>,

    /// Platform-provided photo URL
    #[arg(long, value_name = "URL")]
    pub avatar: Option<String>,

    /// Profile API base URL (overrides CHARMS_API_URL)
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Serve lookups from a JSON fixture instead of the API
    #[arg(long, value_name = "PATH")]
    pub fixture: Option<PathBuf>,

    /// Do not write discovered avatars back
    #[arg(long)]
    pub no_persist: bool,
}
