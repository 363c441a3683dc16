//! Clap derive structures for the `rsctl` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// rsctl -- operator CLI for Redfish management controllers
#[derive(Debug, Parser)]
#[command(
    name = "rsctl",
    version,
    about = "Manage a Redfish management controller from the command line",
    long_about = "Operator CLI for a Redfish management controller.\n\n\
        Reads and changes manager, network, time, certificate and power\n\
        settings, and follows long-running controller tasks to completion.",
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
    /// Config profile to use
    #[arg(long, env = "RSCTL_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Controller host, IP, or URL (overrides profile)
    #[arg(long, short = 'a', env = "RSCTL_ADDRESS", global = true)]
    pub address: Option<String>,

    /// Account user name
    #[arg(long, short = 'u', env = "RSCTL_USERNAME", global = true)]
    pub username: Option<String>,

    /// Account password (prompted when omitted)
    #[arg(
        long,
        short = 'p',
        env = "RSCTL_PASSWORD",
        global = true,
        hide_env_values = true
    )]
    pub password: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "RSCTL_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

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
    #[arg(long, short = 'k', env = "RSCTL_INSECURE", global = true)]
    pub insecure: bool,

    /// CA certificate (PEM) used to verify the controller
    #[arg(long, env = "RSCTL_CA_CERT", global = true)]
    pub ca_cert: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, env = "RSCTL_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Login attempts before giving up
    #[arg(long, env = "RSCTL_MAX_RETRY", global = true)]
    pub max_retry: Option<u32>,
}

// ── Shared Enums ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables and detail views (default)
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

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    Enable,
    Disable,
}

impl Toggle {
    pub fn enabled(self) -> bool {
        self == Self::Enable
    }
}

/// Redfish `ResetType` for the host system.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PowerState {
    #[value(name = "On", alias = "on")]
    On,
    #[value(name = "GracefulShutdown", alias = "graceful-shutdown")]
    GracefulShutdown,
    #[value(name = "ForceOff", alias = "force-off")]
    ForceOff,
    #[value(name = "GracefulRestart", alias = "graceful-restart")]
    GracefulRestart,
    #[value(name = "ForceRestart", alias = "force-restart")]
    ForceRestart,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Management controller operations
    #[command(alias = "mgr", alias = "m")]
    Manager(ManagerArgs),

    /// Host system information and power control
    #[command(alias = "sys")]
    System(SystemArgs),

    /// Controller task service
    Tasks(TasksArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Manager ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ManagerArgs {
    #[command(subcommand)]
    pub command: ManagerCommand,
}

#[derive(Debug, Subcommand)]
pub enum ManagerCommand {
    /// Show model, firmware, clock and OEM settings
    Get,

    /// Restart the management controller
    Restart,

    /// Reset all controller settings to factory defaults
    FactoryReset,

    /// Change the account password and verify it with a new login
    ChangePassword {
        /// New password (prompted when omitted)
        #[arg(long, env = "RSCTL_NEW_PASSWORD", hide_env_values = true)]
        new_password: Option<String>,
    },

    /// Upload and apply a firmware image
    Update {
        /// Firmware image file
        fw_file: PathBuf,
    },

    /// Ethernet, mDNS and proxy settings
    #[command(alias = "net")]
    Network(NetworkArgs),

    /// Clock and NTP settings
    Time(TimeArgs),

    /// HTTPS certificate
    Cert(CertArgs),

    /// Trusted CA certificates
    TrustedCert(TrustedCertArgs),
}

// ── Network ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct NetworkArgs {
    #[command(subcommand)]
    pub command: NetworkCommand,
}

#[derive(Debug, Subcommand)]
pub enum NetworkCommand {
    /// Show Ethernet, mDNS and proxy settings
    Get,

    /// Change Ethernet, mDNS and proxy settings
    Set(NetworkSetArgs),
}

#[derive(Debug, Args)]
pub struct NetworkSetArgs {
    /// Enable or disable DHCP
    #[arg(long)]
    pub dhcp: Option<Toggle>,

    /// Static IPv4 address (requires DHCP disabled and a subnet mask)
    #[arg(long)]
    pub static_address: Option<String>,

    /// Static IPv4 subnet mask
    #[arg(long)]
    pub subnet_mask: Option<String>,

    /// Static IPv4 gateway
    #[arg(long)]
    pub gateway: Option<String>,

    /// Static DNS server (repeatable)
    #[arg(long = "name-server")]
    pub name_servers: Option<Vec<String>>,

    /// Use the DNS servers handed out by DHCP
    #[arg(long)]
    pub use_dhcp_dns: Option<Toggle>,

    /// Enable or disable the HTTP proxy
    #[arg(long)]
    pub proxy: Option<Toggle>,

    /// Proxy server URI
    #[arg(long)]
    pub proxy_server: Option<String>,

    /// Address excluded from the proxy (repeatable)
    #[arg(long)]
    pub proxy_exclude: Option<Vec<String>>,

    /// Enable or disable mDNS discovery
    #[arg(long)]
    pub mdns: Option<Toggle>,
}

// ── Time ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct TimeArgs {
    #[command(subcommand)]
    pub command: TimeCommand,
}

#[derive(Debug, Subcommand)]
pub enum TimeCommand {
    /// Show clock and NTP settings
    Get,

    /// Change clock or NTP settings
    Set {
        /// Date and time, e.g. 2024-06-07T12:29:01-03:00
        #[arg(long)]
        time: Option<String>,

        /// Local offset as [+-]HH:MM
        #[arg(long, allow_hyphen_values = true)]
        offset: Option<String>,

        /// Enable or disable NTP
        #[arg(long)]
        ntp: Option<Toggle>,

        /// NTP server (repeatable)
        #[arg(long = "ntp-server")]
        ntp_servers: Option<Vec<String>>,
    },
}

// ── Certificates ─────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CertArgs {
    #[command(subcommand)]
    pub command: CertCommand,
}

#[derive(Debug, Subcommand)]
pub enum CertCommand {
    /// Show the HTTPS certificate
    Get,

    /// Replace the HTTPS certificate
    Replace {
        /// Certificate file (PEM)
        cert_file: PathBuf,
        /// Private key file (PEM)
        key_file: PathBuf,
    },
}

#[derive(Debug, Args)]
pub struct TrustedCertArgs {
    #[command(subcommand)]
    pub command: TrustedCertCommand,
}

#[derive(Debug, Subcommand)]
pub enum TrustedCertCommand {
    /// List trusted certificates
    #[command(alias = "ls")]
    List,

    /// Add a trusted certificate
    Add {
        /// Certificate file (PEM)
        cert_file: PathBuf,
    },

    /// Delete a trusted certificate
    #[command(alias = "rm")]
    Delete {
        /// Certificate ID
        cert_id: String,
    },
}

// ── System ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SystemArgs {
    #[command(subcommand)]
    pub command: SystemCommand,
}

#[derive(Debug, Subcommand)]
pub enum SystemCommand {
    /// Show host system information
    Get,

    /// Send a power command and follow it to completion
    Power {
        /// Reset type
        state: PowerState,
    },
}

// ── Tasks ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct TasksArgs {
    #[command(subcommand)]
    pub command: TasksCommand,
}

#[derive(Debug, Subcommand)]
pub enum TasksCommand {
    /// List tasks
    #[command(alias = "ls")]
    List {
        /// Only tasks still running
        #[arg(long, short = 'r')]
        running: bool,
    },

    /// Show one task
    Get {
        /// Task ID
        task_id: String,
    },

    /// Cancel a running task
    Cancel {
        /// Task ID
        task_id: String,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration (passwords masked)
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
