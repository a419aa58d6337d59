//! Clap derive structures for the `enerctl` CLI.
//!
//! Defines the command tree, global flags, and shared argument groups.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// enerctl -- console for the energy management backend
#[derive(Debug, Parser)]
#[command(
    name = "enerctl",
    version,
    about = "Manage users and energy devices from the command line",
    long_about = "Command-line console for an energy management REST backend.\n\n\
        Lists, creates, edits and deletes users and their devices, and prints\n\
        the consumption report.",
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
    /// Backend profile to use
    #[arg(long, short = 'p', env = "ENERCTL_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend base URL (overrides profile)
    #[arg(long, short = 'u', env = "ENERCTL_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "ENERCTL_OUTPUT",
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

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "ENERCTL_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "ENERCTL_TIMEOUT", global = true)]
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
    /// YAML
    Yaml,
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
    /// Manage registered users
    #[command(alias = "u")]
    Users(UsersArgs),

    /// Manage energy devices
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Print the energy consumption report
    #[command(alias = "reports")]
    Report,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  USERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List users
    #[command(alias = "ls")]
    List,

    /// Show one user
    Get {
        /// User ID
        id: String,
    },

    /// Register a new user
    #[command(alias = "add")]
    Create {
        #[command(flatten)]
        fields: UserFieldArgs,

        /// Start from a JSON record; flags override its fields
        #[arg(long, short = 'F', value_name = "PATH")]
        from_file: Option<PathBuf>,
    },

    /// Edit a user; unspecified fields keep their current values
    #[command(alias = "edit")]
    Update {
        /// User ID
        id: String,

        #[command(flatten)]
        fields: UserFieldArgs,
    },

    /// Delete a user
    #[command(alias = "rm")]
    Delete {
        /// User ID
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct UserFieldArgs {
    /// Full name
    #[arg(long)]
    pub name: Option<String>,

    /// Email address
    #[arg(long)]
    pub email: Option<String>,

    /// Account type: residential (RESIDENCIAL) or business (EMPRESARIAL)
    #[arg(long, short = 't', value_name = "TYPE")]
    pub account_type: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  DEVICES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List devices
    #[command(alias = "ls")]
    List,

    /// Show one device
    Get {
        /// Device ID
        id: String,
    },

    /// Register a new device (starts switched off unless --status is given)
    #[command(alias = "add")]
    Create {
        #[command(flatten)]
        fields: DeviceFieldArgs,

        /// Start from a JSON record; flags override its fields
        #[arg(long, short = 'F', value_name = "PATH")]
        from_file: Option<PathBuf>,
    },

    /// Edit a device; unspecified fields keep their current values
    #[command(alias = "edit")]
    Update {
        /// Device ID
        id: String,

        #[command(flatten)]
        fields: DeviceFieldArgs,
    },

    /// Delete a device
    #[command(alias = "rm")]
    Delete {
        /// Device ID
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct DeviceFieldArgs {
    /// Device name
    #[arg(long)]
    pub name: Option<String>,

    /// Device type (free text, e.g. "appliance")
    #[arg(long = "type", value_name = "TYPE")]
    pub device_type: Option<String>,

    /// Where the device is installed
    #[arg(long)]
    pub location: Option<String>,

    /// Energy consumption in kWh
    #[arg(long, value_name = "KWH")]
    pub consumption: Option<String>,

    /// Power status: on (LIGADO) or off (DESLIGADO)
    #[arg(long)]
    pub status: Option<String>,

    /// ID of the owning user
    #[arg(long, value_name = "ID")]
    pub user_id: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Set a profile value
    Set {
        /// Profile key: api_url, ca_cert, insecure, timeout
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Print the config file location
    Path,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
