use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Returns the version string, including the git hash for dev builds.
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{}", VERSION, GIT_HASH)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "sitepad")]
#[command(version = get_version())]
#[command(about = "JSON-backed content admin and static page regenerator", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Site root directory (page files, data/, assets/, backups/)
    #[arg(short, long, global = true, default_value = ".")]
    pub root: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the admin gateway
    Serve {
        /// Bind address (overrides the configured one)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Regenerate every page from the stored documents
    Regen,

    /// Archive the data directory, image assets, and page files
    Backup,

    /// Initialize a site root with default documents
    Init,
}
