// ── CLI mode tracking ──
//
// Huawei OLT shells nest modes: user (`>`), enable (`#`), config
// (`(config)#`) and the sub-modes entered from config. The session keeps
// its best guess of the current mode, updated as mode-entry commands are
// sent. Nothing is read back from the device to confirm a transition.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The mode the device shell is believed to be in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum CliMode {
    /// Right after login (`MA5800>`).
    #[default]
    User,
    /// Privileged mode after `enable` (`MA5800#`).
    Enable,
    /// Global configuration (`MA5800(config)#`).
    Config,
    /// `interface gpon F/S` (`MA5800(config-if-gpon-0/3)#`).
    Interface { frame: u16, slot: u16 },
    /// Diagnostic mode (`MA5800(diagnose)%%`).
    Diagnose,
    /// IPTV / multicast user management (`MA5800(config-btv)#`).
    Btv,
    /// Multicast VLAN configuration (`MA5800(config-mvlan100)#`).
    MulticastVlan { vlan: u16 },
}

impl CliMode {
    pub fn kind(self) -> ModeKind {
        match self {
            Self::User => ModeKind::User,
            Self::Enable => ModeKind::Enable,
            Self::Config => ModeKind::Config,
            Self::Interface { .. } => ModeKind::Interface,
            Self::Diagnose => ModeKind::Diagnose,
            Self::Btv => ModeKind::Btv,
            Self::MulticastVlan { .. } => ModeKind::MulticastVlan,
        }
    }

    /// The mode `quit` returns to.
    ///
    /// `quit` in user mode ends the login on the device; the tracked mode
    /// stays `User` since there is nothing above it.
    pub fn parent(self) -> Self {
        match self {
            Self::User | Self::Enable => Self::User,
            Self::Config => Self::Enable,
            Self::Interface { .. } | Self::Diagnose | Self::Btv | Self::MulticastVlan { .. } => {
                Self::Config
            }
        }
    }

    /// Nesting depth below user mode.
    pub fn depth(self) -> usize {
        match self.kind() {
            ModeKind::User => 0,
            ModeKind::Enable => 1,
            ModeKind::Config => 2,
            _ => 3,
        }
    }
}

impl fmt::Display for CliMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interface { frame, slot } => write!(f, "interface gpon {frame}/{slot}"),
            Self::MulticastVlan { vlan } => write!(f, "multicast-vlan {vlan}"),
            other => write!(f, "{}", other.kind()),
        }
    }
}

/// Data-less mode discriminant, used for requirement checks and messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum ModeKind {
    User,
    Enable,
    Config,
    Interface,
    Diagnose,
    Btv,
    MulticastVlan,
}
