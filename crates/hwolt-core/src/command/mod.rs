// ── Command catalog ──
//
// Every line the session can send is a `CliCommand` variant. `Display`
// renders the exact text written to the device (without the trailing
// newline, which `Session::send` appends). Parameterised lines keep the
// trailing space the device CLI tolerates; bare mode keywords do not.

pub mod requests;

use std::fmt;

use strum::IntoStaticStr;

use crate::mode::{CliMode, ModeKind};

pub use requests::{GponPort, OntRegistration, ServicePortRequest};

/// One OLT command line with typed parameters.
#[derive(Debug, Clone, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum CliCommand {
    // ── Mode navigation ──────────────────────────────────────────────
    Enable,
    Config,
    Diagnose,
    Btv,
    Mmi,
    Interface {
        frame: u16,
        slot: u16,
    },
    MulticastVlan {
        vlan: u16,
    },
    Quit,
    Scroll {
        lines: u32,
    },

    // ── Board / system ───────────────────────────────────────────────
    BoardConfirm {
        frame: u16,
    },
    DisplayBoard {
        frame: u16,
    },
    DisplayVersion,

    // ── VLAN ─────────────────────────────────────────────────────────
    VlanAdd {
        vlan: u16,
    },
    VlanDelete {
        vlan: u16,
    },
    PortVlan {
        vlan: u16,
        frame: u16,
        slot: u16,
        port: u16,
    },

    // ── Service ports ────────────────────────────────────────────────
    ServicePortAdd(ServicePortRequest),
    ServicePortDelete {
        index: u32,
    },
    DisplayServicePort {
        index: u32,
    },
    DisplayServicePortOnt {
        location: GponPort,
        ont: u32,
    },

    // ── Config-level displays ────────────────────────────────────────
    DisplayOntAutofindAll,
    DisplayOntInfoBySn {
        serial: String,
    },
    DisplayCurrentConfiguration {
        filter: String,
    },

    // ── GPON port (interface mode) ───────────────────────────────────
    PortOntAutoFind {
        port: u16,
        enable: bool,
    },
    PortFec {
        port: u16,
        enable: bool,
    },
    PortAlarmProfile {
        port: u16,
        profile_id: u32,
    },
    PortEnable {
        port: u16,
    },
    PortDisable {
        port: u16,
    },

    // ── ONT (interface mode) ─────────────────────────────────────────
    OntAdd(OntRegistration),
    OntDelete {
        port: u16,
        ont: u32,
    },
    OntReset {
        port: u16,
        ont: u32,
    },
    OntActivate {
        port: u16,
        ont: u32,
    },
    OntDeactivate {
        port: u16,
        ont: u32,
    },
    OntModifyDescription {
        port: u16,
        ont: u32,
        description: String,
    },
    OntPortNativeVlan {
        port: u16,
        ont: u32,
        eth: u16,
        vlan: u16,
    },
    DisplayOntInfo {
        port: u16,
        ont: u32,
    },
    DisplayOntOpticalInfo {
        port: u16,
        ont: u32,
    },
    DisplayOntRegisterInfo {
        port: u16,
        ont: u32,
    },
    DisplayOntWanInfo {
        port: u16,
        ont: u32,
    },
    DisplayOntVersion {
        port: u16,
        ont: u32,
    },
    DisplayOntAutofind {
        port: u16,
    },
    DisplayPortState {
        port: u16,
    },

    // ── Multicast ────────────────────────────────────────────────────
    IgmpUserAdd {
        index: u32,
    },
    IgmpUserDelete {
        index: u32,
    },
    MulticastMemberAdd {
        index: u32,
    },
    MulticastMemberDelete {
        index: u32,
    },

    // ── Diagnostics ──────────────────────────────────────────────────
    DisplayOntLineQuality {
        port: u16,
        ont: u32,
    },
}

fn switch(enable: bool) -> &'static str {
    if enable { "enable" } else { "disable" }
}

impl fmt::Display for CliCommand {
    #[allow(clippy::too_many_lines)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enable => f.write_str("enable"),
            Self::Config => f.write_str("config"),
            Self::Diagnose => f.write_str("diagnose"),
            Self::Btv => f.write_str("btv"),
            Self::Mmi => f.write_str("mmi-mode enable"),
            Self::Interface { frame, slot } => write!(f, "interface gpon {frame}/{slot} "),
            Self::MulticastVlan { vlan } => write!(f, "multicast-vlan {vlan} "),
            Self::Quit => f.write_str("quit"),
            Self::Scroll { lines } => write!(f, "scroll {lines} "),

            Self::BoardConfirm { frame } => write!(f, "board confirm {frame} "),
            Self::DisplayBoard { frame } => write!(f, "display board {frame} "),
            Self::DisplayVersion => f.write_str("display version "),

            Self::VlanAdd { vlan } => write!(f, "vlan {vlan} smart "),
            Self::VlanDelete { vlan } => write!(f, "undo vlan {vlan} "),
            Self::PortVlan {
                vlan,
                frame,
                slot,
                port,
            } => write!(f, "port vlan {vlan} {frame}/{slot} {port} "),

            Self::ServicePortAdd(req) => write!(
                f,
                "service-port {} vlan {} gpon {} ont {} gemport {} multi-service user-vlan {} tag-transform translate ",
                req.index, req.vlan, req.location, req.ont, req.gemport, req.user_vlan
            ),
            Self::ServicePortDelete { index } => write!(f, "undo service-port {index} "),
            Self::DisplayServicePort { index } => write!(f, "display service-port {index} "),
            Self::DisplayServicePortOnt { location, ont } => {
                write!(f, "display service-port port {location} ont {ont} ")
            }

            Self::DisplayOntAutofindAll => f.write_str("display ont autofind all "),
            Self::DisplayOntInfoBySn { serial } => write!(f, "display ont info by-sn {serial} "),
            Self::DisplayCurrentConfiguration { filter } => {
                write!(f, "display current-configuration | include {filter} ")
            }

            Self::PortOntAutoFind { port, enable } => {
                write!(f, "port {port} ont-auto-find {} ", switch(*enable))
            }
            Self::PortFec { port, enable } => write!(f, "port {port} fec {} ", switch(*enable)),
            Self::PortAlarmProfile { port, profile_id } => {
                write!(f, "port {port} alarm-profile profile-id {profile_id} ")
            }
            Self::PortEnable { port } => write!(f, "undo shutdown {port} "),
            Self::PortDisable { port } => write!(f, "shutdown {port} "),

            Self::OntAdd(req) => write!(
                f,
                "ont add {} sn-auth {} omci ont-lineprofile-id {} ont-srvprofile-id {} desc {} ",
                req.port, req.serial, req.line_profile, req.service_profile, req.description
            ),
            Self::OntDelete { port, ont } => write!(f, "ont delete {port} {ont} "),
            Self::OntReset { port, ont } => write!(f, "ont reset {port} {ont} "),
            Self::OntActivate { port, ont } => write!(f, "ont activate {port} {ont} "),
            Self::OntDeactivate { port, ont } => write!(f, "ont deactivate {port} {ont} "),
            Self::OntModifyDescription {
                port,
                ont,
                description,
            } => write!(f, "ont modify {port} {ont} desc {description} "),
            Self::OntPortNativeVlan {
                port,
                ont,
                eth,
                vlan,
            } => write!(f, "ont port native-vlan {port} {ont} eth {eth} vlan {vlan} "),
            Self::DisplayOntInfo { port, ont } => write!(f, "display ont info {port} {ont} "),
            Self::DisplayOntOpticalInfo { port, ont } => {
                write!(f, "display ont optical-info {port} {ont} ")
            }
            Self::DisplayOntRegisterInfo { port, ont } => {
                write!(f, "display ont register-info {port} {ont} ")
            }
            Self::DisplayOntWanInfo { port, ont } => {
                write!(f, "display ont wan-info {port} {ont} ")
            }
            Self::DisplayOntVersion { port, ont } => {
                write!(f, "display ont version {port} {ont} ")
            }
            Self::DisplayOntAutofind { port } => write!(f, "display ont autofind {port} "),
            Self::DisplayPortState { port } => write!(f, "display port state {port} "),

            Self::IgmpUserAdd { index } => {
                write!(f, "igmp user add service-port {index} no-auth ")
            }
            Self::IgmpUserDelete { index } => {
                write!(f, "igmp user delete service-port {index} ")
            }
            Self::MulticastMemberAdd { index } => {
                write!(f, "multicast-vlan member service-port {index} ")
            }
            Self::MulticastMemberDelete { index } => {
                write!(f, "undo multicast-vlan member service-port {index} ")
            }

            Self::DisplayOntLineQuality { port, ont } => {
                write!(f, "display ont line-quality {port} {ont} ")
            }
        }
    }
}

impl CliCommand {
    /// Short kebab-case name of the command, e.g. `ont-add`.
    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// The mode this command must be issued from.
    ///
    /// `None` means any mode. `display version` reports `Enable` but is
    /// accepted anywhere past user mode; see [`is_allowed_in`](Self::is_allowed_in).
    pub fn required_mode(&self) -> Option<ModeKind> {
        match self {
            Self::Quit | Self::Scroll { .. } => None,

            Self::Enable => Some(ModeKind::User),
            Self::Config | Self::DisplayVersion => Some(ModeKind::Enable),
            Self::Mmi | Self::DisplayOntLineQuality { .. } => Some(ModeKind::Diagnose),

            Self::Diagnose
            | Self::Btv
            | Self::Interface { .. }
            | Self::MulticastVlan { .. }
            | Self::BoardConfirm { .. }
            | Self::DisplayBoard { .. }
            | Self::VlanAdd { .. }
            | Self::VlanDelete { .. }
            | Self::PortVlan { .. }
            | Self::ServicePortAdd(_)
            | Self::ServicePortDelete { .. }
            | Self::DisplayServicePort { .. }
            | Self::DisplayServicePortOnt { .. }
            | Self::DisplayOntAutofindAll
            | Self::DisplayOntInfoBySn { .. }
            | Self::DisplayCurrentConfiguration { .. } => Some(ModeKind::Config),

            Self::PortOntAutoFind { .. }
            | Self::PortFec { .. }
            | Self::PortAlarmProfile { .. }
            | Self::PortEnable { .. }
            | Self::PortDisable { .. }
            | Self::OntAdd(_)
            | Self::OntDelete { .. }
            | Self::OntReset { .. }
            | Self::OntActivate { .. }
            | Self::OntDeactivate { .. }
            | Self::OntModifyDescription { .. }
            | Self::OntPortNativeVlan { .. }
            | Self::DisplayOntInfo { .. }
            | Self::DisplayOntOpticalInfo { .. }
            | Self::DisplayOntRegisterInfo { .. }
            | Self::DisplayOntWanInfo { .. }
            | Self::DisplayOntVersion { .. }
            | Self::DisplayOntAutofind { .. }
            | Self::DisplayPortState { .. } => Some(ModeKind::Interface),

            Self::IgmpUserAdd { .. } | Self::IgmpUserDelete { .. } => Some(ModeKind::Btv),
            Self::MulticastMemberAdd { .. } | Self::MulticastMemberDelete { .. } => {
                Some(ModeKind::MulticastVlan)
            }
        }
    }

    pub fn is_allowed_in(&self, mode: CliMode) -> bool {
        match (self, self.required_mode()) {
            (_, None) => true,
            (Self::DisplayVersion, Some(_)) => mode.kind() != ModeKind::User,
            (_, Some(required)) => mode.kind() == required,
        }
    }

    /// The mode the device is expected to be in after this command, if it
    /// changes the mode at all.
    pub fn mode_after(&self, current: CliMode) -> Option<CliMode> {
        match self {
            Self::Enable => Some(CliMode::Enable),
            Self::Config => Some(CliMode::Config),
            Self::Diagnose => Some(CliMode::Diagnose),
            Self::Btv => Some(CliMode::Btv),
            Self::Interface { frame, slot } => Some(CliMode::Interface {
                frame: *frame,
                slot: *slot,
            }),
            Self::MulticastVlan { vlan } => Some(CliMode::MulticastVlan { vlan: *vlan }),
            Self::Quit => Some(current.parent()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn mode_keywords_have_no_trailing_space() {
        for cmd in [
            CliCommand::Enable,
            CliCommand::Config,
            CliCommand::Diagnose,
            CliCommand::Btv,
            CliCommand::Quit,
        ] {
            let line = cmd.to_string();
            assert_eq!(line, line.trim_end());
        }
        assert_eq!(CliCommand::Mmi.to_string(), "mmi-mode enable");
    }

    #[test]
    fn switches_render_enable_and_disable() {
        assert_eq!(
            CliCommand::PortFec {
                port: 2,
                enable: false
            }
            .to_string(),
            "port 2 fec disable "
        );
        assert_eq!(
            CliCommand::PortOntAutoFind {
                port: 0,
                enable: true
            }
            .to_string(),
            "port 0 ont-auto-find enable "
        );
    }

    #[test]
    fn names_are_kebab_case() {
        assert_eq!(CliCommand::DisplayOntAutofindAll.name(), "display-ont-autofind-all");
        assert_eq!(CliCommand::Scroll { lines: 1 }.name(), "scroll");
    }

    #[test]
    fn interface_commands_need_interface_mode() {
        let cmd = CliCommand::DisplayOntInfo { port: 1, ont: 5 };
        assert!(cmd.is_allowed_in(CliMode::Interface { frame: 0, slot: 1 }));
        assert!(!cmd.is_allowed_in(CliMode::Config));
    }

    #[test]
    fn display_version_allowed_past_user_mode() {
        let cmd = CliCommand::DisplayVersion;
        assert!(!cmd.is_allowed_in(CliMode::User));
        assert!(cmd.is_allowed_in(CliMode::Enable));
        assert!(cmd.is_allowed_in(CliMode::Btv));
    }

    #[test]
    fn quit_and_scroll_allowed_everywhere() {
        for mode in [CliMode::User, CliMode::Diagnose, CliMode::MulticastVlan { vlan: 9 }] {
            assert!(CliCommand::Quit.is_allowed_in(mode));
            assert!(CliCommand::Scroll { lines: 512 }.is_allowed_in(mode));
        }
    }

    #[test]
    fn mode_transitions() {
        assert_eq!(
            CliCommand::Interface { frame: 0, slot: 3 }.mode_after(CliMode::Config),
            Some(CliMode::Interface { frame: 0, slot: 3 })
        );
        assert_eq!(
            CliCommand::Quit.mode_after(CliMode::Btv),
            Some(CliMode::Config)
        );
        assert_eq!(CliCommand::Mmi.mode_after(CliMode::Diagnose), None);
        assert_eq!(
            CliCommand::VlanAdd { vlan: 100 }.mode_after(CliMode::Config),
            None
        );
    }
}
