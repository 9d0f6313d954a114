//! Clap derive structures for the `slicewatch` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

use slicewatch_core::{AlertSeverity, QosClass};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// slicewatch -- terminal dashboard for 5G network slices
#[derive(Debug, Parser)]
#[command(
    name = "slicewatch",
    version,
    about = "Monitor and manage network slices from the command line",
    long_about = "A terminal client for network-slice managers.\n\n\
        One-shot subcommands query or mutate slices and alerts; `watch`\n\
        runs the live polling dashboard in the terminal.",
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
    /// Slice manager base URL (overrides config file)
    #[arg(long, short = 's', env = "SLICEWATCH_SERVER", global = true)]
    pub server: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SLICEWATCH_OUTPUT",
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

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "SLICEWATCH_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "SLICEWATCH_TIMEOUT", default_value = "30", global = true)]
    pub timeout: u64,
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
    /// Inspect and manage slices
    #[command(alias = "sl")]
    Slices(SlicesArgs),

    /// Inspect and manage alerts
    #[command(alias = "al")]
    Alerts(AlertsArgs),

    /// Run the live polling dashboard
    Watch(WatchArgs),

    /// Check slice manager liveness
    Ping,
}

// ── Slices ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SlicesArgs {
    #[command(subcommand)]
    pub command: SlicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum SlicesCommand {
    /// List all slices
    #[command(alias = "ls")]
    List,

    /// Show full detail and alerts for one slice
    Show {
        /// Slice id
        id: String,
    },

    /// Provision a new slice
    Create {
        /// Slice name
        name: String,

        /// Owning tenant
        #[arg(long, short = 't')]
        tenant: String,

        /// QoS class
        #[arg(long, default_value = "bronze")]
        qos: QosClassArg,

        /// Comma-separated device ids (duplicates forwarded as-is)
        #[arg(long, short = 'd', default_value = "")]
        devices: String,
    },

    /// Attach a device to a slice
    AddDevice {
        /// Slice id
        id: String,

        /// Device id
        device_id: String,
    },
}

// ── Alerts ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AlertsArgs {
    #[command(subcommand)]
    pub command: AlertsCommand,
}

#[derive(Debug, Subcommand)]
pub enum AlertsCommand {
    /// List alerts, across all slices or scoped to one
    #[command(alias = "ls")]
    List {
        /// Only alerts for this slice
        #[arg(long)]
        slice: Option<String>,
    },

    /// Raise an alert against a slice
    Trigger {
        /// Slice id
        slice: String,

        /// Alert title
        title: String,

        /// Alert description
        #[arg(long, short = 'd')]
        description: String,

        /// Severity
        #[arg(long, default_value = "warning")]
        severity: SeverityArg,
    },

    /// Mark an alert resolved
    Resolve {
        /// Alert id
        id: String,
    },
}

// ── Watch ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Start with this slice selected instead of the first one
    #[arg(long)]
    pub slice: Option<String>,

    /// Poll interval (e.g. "5s", "500ms")
    #[arg(long, short = 'i', default_value = "5s", value_parser = humantime::parse_duration)]
    pub interval: std::time::Duration,
}

// ── Value-enum bridges to domain enums ───────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum QosClassArg {
    Gold,
    Silver,
    Bronze,
}

impl From<QosClassArg> for QosClass {
    fn from(arg: QosClassArg) -> Self {
        match arg {
            QosClassArg::Gold => Self::Gold,
            QosClassArg::Silver => Self::Silver,
            QosClassArg::Bronze => Self::Bronze,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SeverityArg {
    Info,
    Warning,
    Critical,
}

impl From<SeverityArg> for AlertSeverity {
    fn from(arg: SeverityArg) -> Self {
        match arg {
            SeverityArg::Info => Self::Info,
            SeverityArg::Warning => Self::Warning,
            SeverityArg::Critical => Self::Critical,
        }
    }
}
