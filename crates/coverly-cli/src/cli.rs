//! Clap derive structures for the `coverly` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// coverly -- drive motorized shutters from the command line
#[derive(Debug, Parser)]
#[command(
    name = "coverly",
    version,
    about = "Control motorized shutters and their remotes from the command line",
    long_about = "One-shot commands against a shutter controller's REST API.\n\n\
        Controllers are addressed through named profiles (see `coverly config`)\n\
        or directly with --url.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Controller profile to use
    #[arg(long, short = 'p', env = "COVERLY_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Controller URL (bypasses profiles)
    #[arg(long, short = 'u', env = "COVERLY_URL", global = true)]
    pub url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "COVERLY_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "COVERLY_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List devices and move them
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// List remotes and their linked devices
    #[command(alias = "r")]
    Remotes(RemotesArgs),

    /// Send a raw controller command (e.g. "new1W Kitchen")
    #[command(alias = "cmd")]
    Command(CommandArgs),

    /// Show or change the MQTT bridge settings
    Mqtt(MqttArgs),

    /// Show the address of the last remote the controller heard
    Lastaddr,

    /// Print the controller's log buffer
    Logs,

    /// Download the devices or remotes map
    Export(ExportArgs),

    /// Upload a devices or remotes map
    Import(ImportArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Devices ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List devices with their position
    #[command(alias = "ls")]
    List,

    /// Open, stop, or close a device
    Action {
        /// Device ID
        device: String,

        /// Motion to request
        #[arg(value_enum)]
        action: MotionArg,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MotionArg {
    Open,
    Stop,
    Close,
}

// ── Remotes ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RemotesArgs {
    #[command(subcommand)]
    pub command: RemotesCommand,
}

#[derive(Debug, Subcommand)]
pub enum RemotesCommand {
    /// List remotes with their linked devices
    #[command(alias = "ls")]
    List,
}

// ── Command ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CommandArgs {
    /// Command text, passed through verbatim
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,

    /// Address the command to a device
    #[arg(long, short = 'd', conflicts_with = "remote")]
    pub device: Option<String>,

    /// Address the command to a remote
    #[arg(long, short = 'r')]
    pub remote: Option<String>,
}

// ── MQTT ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct MqttArgs {
    #[command(subcommand)]
    pub command: MqttCommand,
}

#[derive(Debug, Subcommand)]
pub enum MqttCommand {
    /// Show the current MQTT settings
    Show,

    /// Change MQTT settings; omitted fields keep their value
    Set {
        #[arg(long)]
        user: Option<String>,

        /// Broker address
        #[arg(long)]
        server: Option<String>,

        #[arg(long)]
        password: Option<String>,

        /// Discovery prefix
        #[arg(long)]
        discovery: Option<String>,
    },
}

// ── Export / Import ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MapKind {
    /// Device map (1W.json)
    Devices,
    /// Remote map (RemoteMap.json)
    Remotes,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Which map to download
    #[arg(value_enum)]
    pub kind: MapKind,

    /// Destination file (defaults to the controller's file name)
    #[arg(long = "file", short = 'f')]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Which map to upload
    #[arg(value_enum)]
    pub kind: MapKind,

    /// JSON file to upload
    pub file: PathBuf,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create or update a profile in the config file
    Init {
        /// Controller URL, e.g. http://192.168.1.40
        #[arg(long = "controller", value_name = "URL")]
        controller: String,

        /// Profile name
        #[arg(long, default_value = "default")]
        name: String,

        /// Keep the push channel offline after a disconnect
        #[arg(long)]
        no_reconnect: bool,

        /// Make this the default profile
        #[arg(long)]
        set_default: bool,
    },

    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
