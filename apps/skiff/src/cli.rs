use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::logging::{LogConfig, LogLevel};

#[derive(Parser, Debug)]
#[command(
    name = "skiff",
    about = "Synchronize terminal preference profiles and decode relay bootstrap fragments",
    author,
    version
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        env = "SKIFF_DATA_DIR",
        value_name = "PATH",
        help = "Directory holding settings.json and profiles/ (defaults to the platform data dir)"
    )]
    pub data_dir: Option<PathBuf>,

    #[command(flatten)]
    pub logging: LoggingArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone)]
pub struct LoggingArgs {
    #[arg(
        long = "log-level",
        value_enum,
        env = "SKIFF_LOG_LEVEL",
        default_value_t = LogLevel::Warn,
        help = "Minimum log level (error, warn, info, debug, trace)"
    )]
    pub level: LogLevel,

    #[arg(
        long = "log-file",
        value_name = "PATH",
        env = "SKIFF_LOG_FILE",
        help = "Write structured logs to the specified file"
    )]
    pub file: Option<PathBuf>,
}

impl LoggingArgs {
    pub fn to_config(&self) -> LogConfig {
        LogConfig {
            level: self.level,
            file: self.file.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Export or import preference profiles
    Prefs {
        #[command(subcommand)]
        command: PrefsCommand,
    },
    /// Decode a relay bootstrap fragment into its endpoint
    Bootstrap(BootstrapArgs),
}

#[derive(Subcommand, Debug)]
pub enum PrefsCommand {
    /// Export all preference profiles as a portable JSON blob
    Export {
        #[arg(
            long,
            short = 'o',
            value_name = "PATH",
            help = "Write the blob to a file instead of stdout"
        )]
        output: Option<PathBuf>,
    },
    /// Import a previously exported preference blob
    Import {
        #[arg(value_name = "PATH", help = "Blob file produced by `skiff prefs export`")]
        path: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct BootstrapArgs {
    #[arg(
        value_name = "FRAGMENT",
        help = "Relay fragment, either '@host[:port]' or a base64url JSON payload; a leading '#' is ignored"
    )]
    pub fragment: String,

    #[arg(long, help = "Emit the endpoint as JSON")]
    pub json: bool,
}
