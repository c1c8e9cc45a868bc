use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    version,
    name = "protoc-resolve",
    about = "Locate or fetch a runnable protoc from a path, PATH, a URL, or a Maven repository"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config (defaults to ./protoc-resolve.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace). RUST_LOG wins when set.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve protoc, trying sources in order: path, PATH, url, repository.
    /// Examples:
    ///   protoc-resolve resolve --version 3.25.1
    ///   protoc-resolve resolve --system-path --version 3.25.1
    ///   protoc-resolve resolve --url https://example.com/protoc-linux
    Resolve {
        /// Version to fetch from the Maven repository
        #[arg(long)]
        version: Option<String>,
        /// Remote or file URL to fetch
        #[arg(long)]
        url: Option<String>,
        /// Literal path to use if it exists
        #[arg(long)]
        path: Option<PathBuf>,
        /// Search PATH for protoc before any download
        #[arg(long)]
        system_path: bool,
        /// Extension for files downloaded from --url
        #[arg(long)]
        extension: Option<String>,
    },
    /// Resolve a single reference: a path, a URL, or mvn:group:artifact:version[:classifier[:type]]
    Fetch {
        #[arg(value_name = "REFERENCE")]
        reference: String,
        /// Extension for the cached file when REFERENCE is a remote URL
        #[arg(long)]
        extension: Option<String>,
    },
    /// Print the cache path a URL would be downloaded to (no download)
    CachePath {
        #[arg(value_name = "URL")]
        url: String,
        #[arg(long)]
        extension: Option<String>,
    },
    /// Show detected OS, architecture, PATH and PATHEXT
    Env {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}
