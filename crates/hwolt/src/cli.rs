//! Clap derive structures for the `hwolt` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Only depends on clap so `build.rs` can include it for man pages.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// hwolt -- drive Huawei OLTs from the command line
#[derive(Debug, Parser)]
#[command(
    name = "hwolt",
    version,
    about = "Manage Huawei OLTs (MA56xx/MA58xx) over SSH",
    long_about = "Translates ONT, port, VLAN and service-port operations into \
        Huawei OLT CLI commands and runs them over an interactive SSH shell,\n\
        directly or through a SOCKS5 proxy.",
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
    /// OLT profile to use
    #[arg(long, short = 'p', env = "HWOLT_PROFILE", global = true)]
    pub profile: Option<String>,

    /// OLT management address (overrides profile)
    #[arg(long, short = 'H', env = "HWOLT_HOST", global = true)]
    pub host: Option<String>,

    /// SSH port (overrides profile)
    #[arg(long = "port", env = "HWOLT_PORT", global = true)]
    pub ssh_port: Option<u16>,

    /// Login name (overrides profile)
    #[arg(long, short = 'u', env = "HWOLT_USERNAME", global = true)]
    pub username: Option<String>,

    /// Login password (prefer the keyring: `hwolt config set-password`)
    #[arg(long, env = "HWOLT_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Tunnel through a SOCKS5 proxy (host:port)
    #[arg(long, env = "HWOLT_PROXY", global = true)]
    pub proxy: Option<String>,

    /// Channel timeout in seconds (0 blocks until output arrives)
    #[arg(long, env = "HWOLT_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Echo every sent line as `[Debug] <line>`
    #[arg(long, env = "HWOLT_DEBUG", global = true)]
    pub debug: bool,

    /// Refuse commands issued outside their CLI mode
    #[arg(long, global = true)]
    pub enforce_modes: bool,

    /// Output format
    #[arg(long, short = 'o', env = "HWOLT_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

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
}

impl GlobalOpts {
    pub fn output_format(&self) -> OutputFormat {
        self.output.clone().unwrap_or(OutputFormat::Text)
    }
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Raw device output (default)
    Text,
    /// Pretty-printed JSON
    Json,
    /// YAML
    Yaml,
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

/// `enable` / `disable` switch for port features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub fn is_on(self) -> bool {
        self == Self::On
    }
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Send raw CLI lines after login and print the replies
    Send(SendArgs),

    /// Register, inspect and manage ONTs
    Ont(OntArgs),

    /// Manage GPON ports
    Port(PortArgs),

    /// Confirm or inspect boards
    Board(BoardArgs),

    /// Manage VLANs
    Vlan(VlanArgs),

    /// Manage service ports
    #[command(alias = "sp")]
    ServicePort(ServicePortArgs),

    /// Manage IGMP users
    Igmp(IgmpArgs),

    /// Manage multicast VLAN members
    #[command(alias = "mc")]
    Multicast(MulticastArgs),

    /// Read-only device queries
    Display(DisplayArgs),

    /// Diagnose-mode queries
    Diagnose(DiagnoseArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Addressing Arguments ──────────────────────────────────────

/// A GPON board, `frame/slot`.
#[derive(Debug, Clone, Args)]
pub struct BoardLocation {
    /// Frame number
    #[arg(long, default_value = "0")]
    pub frame: u16,

    /// Slot of the GPON board
    #[arg(long, short = 's')]
    pub slot: u16,
}

/// One ONT: board, PON port and ONT ID.
#[derive(Debug, Clone, Args)]
pub struct OntTarget {
    #[command(flatten)]
    pub board: BoardLocation,

    /// PON port on the board
    #[arg(value_name = "PORT")]
    pub pon: u16,

    /// ONT ID on the port
    pub ont: u32,
}

/// One PON port on a board.
#[derive(Debug, Clone, Args)]
pub struct PonTarget {
    #[command(flatten)]
    pub board: BoardLocation,

    /// PON port on the board
    #[arg(value_name = "PORT")]
    pub pon: u16,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SEND
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SendArgs {
    /// Lines to send, in order (written verbatim)
    #[arg(required = true, value_name = "LINE")]
    pub lines: Vec<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ONT
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct OntArgs {
    #[command(subcommand)]
    pub command: OntCommand,
}

#[derive(Debug, Subcommand)]
pub enum OntCommand {
    /// Register an ONT by serial number
    Add {
        #[command(flatten)]
        board: BoardLocation,

        /// PON port on the board
        #[arg(value_name = "PORT", required_unless_present = "from_file")]
        pon: Option<u16>,

        /// ONT serial number (e.g. 48575443A1B2C3D4)
        #[arg(long, required_unless_present = "from_file")]
        serial: Option<String>,

        /// ONT line profile ID
        #[arg(long, default_value = "1")]
        line_profile: u32,

        /// ONT service profile ID
        #[arg(long, default_value = "1")]
        service_profile: u32,

        /// Description (no spaces; written verbatim)
        #[arg(long, required_unless_present = "from_file")]
        description: Option<String>,

        /// Registration from JSON file (overrides individual flags)
        #[arg(long, short = 'F', conflicts_with_all = &["pon", "serial", "description"])]
        from_file: Option<PathBuf>,
    },

    /// Delete an ONT
    #[command(alias = "rm")]
    Delete(OntTarget),

    /// Reboot an ONT
    Reset(OntTarget),

    /// Activate a deactivated ONT
    Activate(OntTarget),

    /// Deactivate an ONT
    Deactivate(OntTarget),

    /// Show ONT info
    Info(OntTarget),

    /// Show ONT optical levels
    Optical(OntTarget),

    /// Show ONT registration history
    Register(OntTarget),

    /// Show ONT WAN info
    Wan(OntTarget),

    /// Show ONT firmware version
    Version(OntTarget),

    /// List unregistered ONTs on one port
    Autofind(PonTarget),

    /// Change the ONT description
    Describe {
        #[command(flatten)]
        target: OntTarget,

        /// New description (no spaces; written verbatim)
        #[arg(long)]
        description: String,
    },

    /// Set the native VLAN of an ONT Ethernet port
    NativeVlan {
        #[command(flatten)]
        target: OntTarget,

        /// ONT Ethernet port number
        #[arg(long)]
        eth: u16,

        /// VLAN ID
        #[arg(long, value_parser = clap::value_parser!(u16).range(1..=4094))]
        vlan: u16,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PORT
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct PortArgs {
    #[command(subcommand)]
    pub command: PortCommand,
}

#[derive(Debug, Subcommand)]
pub enum PortCommand {
    /// Bring a PON port up (`undo shutdown`)
    Enable(PonTarget),

    /// Shut a PON port down
    Disable(PonTarget),

    /// Toggle ONT auto-discovery
    AutoFind {
        #[command(flatten)]
        target: PonTarget,

        #[arg(value_enum)]
        state: Toggle,
    },

    /// Toggle forward error correction
    Fec {
        #[command(flatten)]
        target: PonTarget,

        #[arg(value_enum)]
        state: Toggle,
    },

    /// Bind an alarm profile
    AlarmProfile {
        #[command(flatten)]
        target: PonTarget,

        /// Alarm profile ID
        profile_id: u32,
    },

    /// Show port state
    State(PonTarget),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  BOARD
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct BoardArgs {
    #[command(subcommand)]
    pub command: BoardCommand,
}

#[derive(Debug, Subcommand)]
pub enum BoardCommand {
    /// Confirm newly inserted boards in a frame
    Confirm {
        /// Frame number
        #[arg(default_value = "0")]
        frame: u16,
    },

    /// Show the boards in a frame
    Show {
        /// Frame number
        #[arg(default_value = "0")]
        frame: u16,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  VLAN
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct VlanArgs {
    #[command(subcommand)]
    pub command: VlanCommand,
}

#[derive(Debug, Subcommand)]
pub enum VlanCommand {
    /// Create a smart VLAN
    Add {
        #[arg(value_parser = clap::value_parser!(u16).range(1..=4094))]
        vlan: u16,
    },

    /// Delete a VLAN
    #[command(alias = "rm")]
    Delete {
        #[arg(value_parser = clap::value_parser!(u16).range(1..=4094))]
        vlan: u16,
    },

    /// Bind a VLAN to an uplink port
    Bind {
        #[arg(value_parser = clap::value_parser!(u16).range(1..=4094))]
        vlan: u16,

        #[command(flatten)]
        board: BoardLocation,

        /// Uplink port on the board
        #[arg(long)]
        uplink: u16,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SERVICE PORT
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ServicePortArgs {
    #[command(subcommand)]
    pub command: ServicePortCommand,
}

#[derive(Debug, Subcommand)]
pub enum ServicePortCommand {
    /// Create a service port binding an ONT GEM port to a VLAN
    Add {
        /// Service-port index
        #[arg(required_unless_present = "from_file")]
        index: Option<u32>,

        /// Network-side VLAN
        #[arg(long, required_unless_present = "from_file")]
        vlan: Option<u16>,

        /// Frame number
        #[arg(long, default_value = "0")]
        frame: u16,

        /// Slot of the GPON board
        #[arg(long, short = 's', required_unless_present = "from_file")]
        slot: Option<u16>,

        /// PON port on the board
        #[arg(long = "pon", required_unless_present = "from_file")]
        pon: Option<u16>,

        /// ONT ID
        #[arg(long, required_unless_present = "from_file")]
        ont: Option<u32>,

        /// GEM port index
        #[arg(long, default_value = "1")]
        gemport: u32,

        /// Subscriber-side VLAN tag
        #[arg(long, required_unless_present = "from_file")]
        user_vlan: Option<u16>,

        /// Service port from JSON file (overrides individual flags)
        #[arg(
            long,
            short = 'F',
            conflicts_with_all = &["index", "vlan", "slot", "pon", "ont", "user_vlan"]
        )]
        from_file: Option<PathBuf>,
    },

    /// Delete a service port
    #[command(alias = "rm")]
    Delete { index: u32 },

    /// Show one service port
    Show { index: u32 },

    /// Show the service ports of one ONT
    Ont(OntTarget),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  IGMP / MULTICAST
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct IgmpArgs {
    #[command(subcommand)]
    pub command: IgmpCommand,
}

#[derive(Debug, Subcommand)]
pub enum IgmpCommand {
    /// Add a service port as an IGMP user (no auth)
    Add { index: u32 },

    /// Remove an IGMP user
    Delete { index: u32 },
}

#[derive(Debug, Args)]
pub struct MulticastArgs {
    #[command(subcommand)]
    pub command: MulticastCommand,
}

#[derive(Debug, Subcommand)]
pub enum MulticastCommand {
    /// Add a service port to a multicast VLAN
    Add {
        /// Multicast VLAN
        #[arg(long)]
        vlan: u16,

        /// Service-port index
        index: u32,
    },

    /// Remove a service port from a multicast VLAN
    Delete {
        /// Multicast VLAN
        #[arg(long)]
        vlan: u16,

        /// Service-port index
        index: u32,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  DISPLAY / DIAGNOSE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct DisplayArgs {
    #[command(subcommand)]
    pub command: DisplayCommand,
}

#[derive(Debug, Subcommand)]
pub enum DisplayCommand {
    /// Software version
    Version,

    /// Running configuration lines matching a filter
    Config {
        /// Text passed to `| include`
        filter: String,
    },

    /// Unregistered ONTs on every port
    Autofind,

    /// Look up an ONT by serial number
    OntBySn { serial: String },
}

#[derive(Debug, Args)]
pub struct DiagnoseArgs {
    #[command(subcommand)]
    pub command: DiagnoseCommand,
}

#[derive(Debug, Subcommand)]
pub enum DiagnoseCommand {
    /// Line quality counters of one ONT
    LineQuality {
        /// PON port
        #[arg(value_name = "PORT")]
        pon: u16,

        /// ONT ID
        ont: u32,
    },
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

    /// Set a value on the active profile
    Set {
        /// Profile key (host, port, username, password_env, proxy, timeout, debug, enforce_modes)
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

    /// Store the active profile's password in the system keyring
    SetPassword,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
