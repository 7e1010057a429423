// ── Device session facade ──
//
// One `Session` owns one shell channel to one OLT. All operations are
// blocking and take `&mut self`; command methods return `&mut Self` so a
// caller can chain `session.enable()?.config()?.interface(0, 3)?`.

use std::fmt;
use std::io::{self, Write};

use tracing::{debug, trace, warn};

use hwolt_api::{Credentials, ShellChannel, SshChannel};

use crate::command::{CliCommand, GponPort, OntRegistration, ServicePortRequest};
use crate::config::SessionConfig;
use crate::error::CoreError;
use crate::mode::{CliMode, ModeKind};

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Channel open, not logged in yet (or the login was rejected).
    Unauthenticated,
    Authenticated,
    /// `disconnect()` was called. Terminal.
    Closed,
}

/// A logged-in (or about to be) CLI session with a Huawei OLT.
pub struct Session<C: ShellChannel = SshChannel> {
    channel: C,
    credentials: Credentials,
    debug: bool,
    enforce_modes: bool,
    mode: CliMode,
    state: SessionState,
    debug_sink: Box<dyn Write>,
}

impl<C: ShellChannel + fmt::Debug> fmt::Debug for Session<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("channel", &self.channel)
            .field("username", &self.credentials.username())
            .field("debug", &self.debug)
            .field("enforce_modes", &self.enforce_modes)
            .field("mode", &self.mode)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Session<SshChannel> {
    /// Open the TCP transport (direct or through the configured SOCKS5
    /// proxy) and run the SSH handshake. Does not log in.
    pub fn open(config: SessionConfig) -> Result<Self, CoreError> {
        debug!(
            olt = %config.target,
            proxy = config.proxy.as_ref().map(ToString::to_string),
            "opening session"
        );
        let channel = SshChannel::connect(&config.target, &config.transport(), config.timeout)?;
        Ok(Self::with_channel(config, channel))
    }
}

impl<C: ShellChannel> Session<C> {
    /// Wrap an already-open channel.
    pub fn with_channel(config: SessionConfig, mut channel: C) -> Self {
        channel.set_timeout(config.timeout);
        Self {
            channel,
            credentials: config.credentials,
            debug: config.debug,
            enforce_modes: config.enforce_modes,
            mode: CliMode::User,
            state: SessionState::Unauthenticated,
            debug_sink: Box::new(io::stdout()),
        }
    }

    /// Send `[Debug] <line>` notices somewhere other than stdout.
    #[must_use]
    pub fn with_debug_sink(mut self, sink: impl Write + 'static) -> Self {
        self.debug_sink = Box::new(sink);
        self
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Log in and discard the post-login banner.
    ///
    /// A rejected login returns [`CoreError::AuthenticationFailed`], which
    /// is fatal: the session stays unauthenticated and refuses every
    /// command afterwards. Calling `connect` on a logged-in session is a
    /// no-op.
    pub fn connect(&mut self) -> Result<&mut Self, CoreError> {
        match self.state {
            SessionState::Closed => return Err(CoreError::SessionClosed),
            SessionState::Authenticated => return Ok(self),
            SessionState::Unauthenticated => {}
        }

        if let Err(e) = self.channel.login(&self.credentials) {
            let err = CoreError::from(e);
            warn!(username = self.credentials.username(), error = %err, "login failed");
            return Err(err);
        }
        self.state = SessionState::Authenticated;
        self.mode = CliMode::User;

        let banner = self.channel.read()?;
        debug!(
            username = self.credentials.username(),
            banner_len = banner.len(),
            "logged in"
        );
        Ok(self)
    }

    /// Close the channel. A second call returns [`CoreError::SessionClosed`].
    pub fn disconnect(&mut self) -> Result<(), CoreError> {
        if self.state == SessionState::Closed {
            return Err(CoreError::SessionClosed);
        }
        self.state = SessionState::Closed;
        self.channel.disconnect()?;
        debug!("session closed");
        Ok(())
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::Authenticated
    }

    /// The mode the session believes the device is in.
    pub fn mode(&self) -> CliMode {
        self.mode
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    // ── Raw I/O ──────────────────────────────────────────────────────

    /// Write one line to the device, appending `\n`.
    ///
    /// In debug mode a `[Debug] <line>` notice also goes to the debug sink.
    /// The notice never replaces the write: the line is always sent.
    /// The text is written as-is; nothing is escaped.
    pub fn send(&mut self, command: &str) -> Result<&mut Self, CoreError> {
        self.ensure_authenticated()?;

        let mut line = String::with_capacity(command.len() + 1);
        line.push_str(command);
        line.push('\n');
        self.channel.write(line.as_bytes())?;
        trace!(line = command, "sent");

        if self.debug {
            // A broken sink must not fail the command that was already sent.
            let _ = writeln!(self.debug_sink, "[Debug] {command}");
            let _ = self.debug_sink.flush();
        }
        Ok(self)
    }

    /// Next chunk of device output, decoded lossily as UTF-8.
    pub fn read(&mut self) -> Result<String, CoreError> {
        self.ensure_authenticated()?;
        let bytes = self.channel.read()?;
        trace!(len = bytes.len(), "received");
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Send a catalog command and update the tracked mode.
    ///
    /// With `enforce_modes` set, a command issued outside its mode fails
    /// with [`CoreError::WrongMode`] and nothing is written.
    pub fn execute(&mut self, command: &CliCommand) -> Result<&mut Self, CoreError> {
        self.ensure_authenticated()?;

        if self.enforce_modes && !command.is_allowed_in(self.mode) {
            if let Some(required) = command.required_mode() {
                return Err(CoreError::WrongMode {
                    command: command.name().to_owned(),
                    required,
                    current: self.mode,
                });
            }
        }

        self.send(&command.to_string())?;

        if let Some(next) = command.mode_after(self.mode) {
            debug!(from = %self.mode, to = %next, "mode change");
            self.mode = next;
        }
        Ok(self)
    }

    /// Walk the device to `target`, quitting out of unrelated modes first.
    ///
    /// Uses the tracked mode only; if the device is somewhere else the
    /// emitted commands will be wrong.
    pub fn enter(&mut self, target: CliMode) -> Result<&mut Self, CoreError> {
        while self.mode != target && self.mode.depth() >= target.depth() {
            self.quit()?;
        }
        while self.mode != target {
            let step = match self.mode.kind() {
                ModeKind::User => CliCommand::Enable,
                ModeKind::Enable => CliCommand::Config,
                ModeKind::Config => entry_command(target)?,
                _ => {
                    return Err(CoreError::Validation {
                        message: format!("no path from {} to {target}", self.mode),
                    });
                }
            };
            self.execute(&step)?;
        }
        Ok(self)
    }

    fn ensure_authenticated(&self) -> Result<(), CoreError> {
        match self.state {
            SessionState::Authenticated => Ok(()),
            SessionState::Unauthenticated => Err(CoreError::NotAuthenticated),
            SessionState::Closed => Err(CoreError::SessionClosed),
        }
    }

    // ── Mode navigation ──────────────────────────────────────────────

    pub fn enable(&mut self) -> Result<&mut Self, CoreError> {
        self.execute(&CliCommand::Enable)
    }

    pub fn config(&mut self) -> Result<&mut Self, CoreError> {
        self.execute(&CliCommand::Config)
    }

    pub fn diagnose(&mut self) -> Result<&mut Self, CoreError> {
        self.execute(&CliCommand::Diagnose)
    }

    pub fn btv(&mut self) -> Result<&mut Self, CoreError> {
        self.execute(&CliCommand::Btv)
    }

    /// `mmi-mode enable`, available from diagnose mode.
    pub fn mmi(&mut self) -> Result<&mut Self, CoreError> {
        self.execute(&CliCommand::Mmi)
    }

    /// Enter `interface gpon frame/slot`.
    pub fn interface(&mut self, frame: u16, slot: u16) -> Result<&mut Self, CoreError> {
        self.execute(&CliCommand::Interface { frame, slot })
    }

    pub fn multicast_vlan(&mut self, vlan: u16) -> Result<&mut Self, CoreError> {
        self.execute(&CliCommand::MulticastVlan { vlan })
    }

    /// Leave the current mode. From user mode this ends the login on the
    /// device side.
    pub fn quit(&mut self) -> Result<&mut Self, CoreError> {
        self.execute(&CliCommand::Quit)
    }

    /// Set the number of lines shown before the device pages output.
    pub fn scroll(&mut self, lines: u32) -> Result<&mut Self, CoreError> {
        self.execute(&CliCommand::Scroll { lines })
    }

    // ── Board / system ───────────────────────────────────────────────

    pub fn board_confirm(&mut self, frame: u16) -> Result<&mut Self, CoreError> {
        self.execute(&CliCommand::BoardConfirm { frame })
    }

    pub fn display_board(&mut self, frame: u16) -> Result<&mut Self, CoreError> {
        self.execute(&CliCommand::DisplayBoard { frame })
    }

    pub fn display_version(&mut self) -> Result<&mut Self, CoreError> {
        self.execute(&CliCommand::DisplayVersion)
    }

    // ── VLAN ─────────────────────────────────────────────────────────

    /// Create a smart VLAN.
    pub fn vlan_add(&mut self, vlan: u16) -> Result<&mut Self, CoreError> {
        self.execute(&CliCommand::VlanAdd { vlan })
    }

    pub fn vlan_delete(&mut self, vlan: u16) -> Result<&mut Self, CoreError> {
        self.execute(&CliCommand::VlanDelete { vlan })
    }

    /// Bind a VLAN to an uplink port.
    pub fn port_vlan(
        &mut self,
        vlan: u16,
        frame: u16,
        slot: u16,
        port: u16,
    ) -> Result<&mut Self, CoreError> {
        self.execute(&CliCommand::PortVlan {
            vlan,
            frame,
            slot,
            port,
        })
    }

    // ── Service ports ────────────────────────────────────────────────

    pub fn service_port_add(&mut self, request: ServicePortRequest) -> Result<&mut Self, CoreError> {
        self.execute(&CliCommand::ServicePortAdd(request))
    }

    pub fn service_port_delete(&mut self, index: u32) -> Result<&mut Self, CoreError> {
        self.execute(&CliCommand::ServicePortDelete { index })
    }

    pub fn display_service_port(&mut self, index: u32) -> Result<&mut Self, CoreError> {
        self.execute(&CliCommand::DisplayServicePort { index })
    }

    /// Service ports bound to one ONT.
    pub fn display_service_port_ont(
        &mut self,
        frame: u16,
        slot: u16,
        port: u16,
        ont: u32,
    ) -> Result<&mut Self, CoreError> {
        self.execute(&CliCommand::DisplayServicePortOnt {
            location: GponPort::new(frame, slot, port),
            ont,
        })
    }

    // ── Config-level displays ────────────────────────────────────────

    pub fn display_ont_autofind_all(&mut self) -> Result<&mut Self, CoreError> {
        self.execute(&CliCommand::DisplayOntAutofindAll)
    }

    pub fn display_ont_info_by_sn(&mut self, serial: &str) -> Result<&mut Self, CoreError> {
        self.execute(&CliCommand::DisplayOntInfoBySn {
            serial: serial.to_owned(),
        })
    }

    /// `display current-configuration | include <filter>`.
    pub fn display_current_configuration(
        &mut self,
        filter: &str,
    ) -> Result<&mut Self, CoreError> {
        self.execute(&CliCommand::DisplayCurrentConfiguration {
            filter: filter.to_owned(),
        })
    }

    // ── GPON port (interface mode) ───────────────────────────────────

    pub fn port_ont_auto_find(&mut self, port: u16, enable: bool) -> Result<&mut Self, CoreError> {
        self.execute(&CliCommand::PortOntAutoFind { port, enable })
    }

    pub fn port_fec(&mut self, port: u16, enable: bool) -> Result<&mut Self, CoreError> {
        self.execute(&CliCommand::PortFec { port, enable })
    }

    pub fn port_alarm_profile(&mut self, port: u16, profile_id: u32) -> Result<&mut Self, CoreError> {
        self.execute(&CliCommand::PortAlarmProfile { port, profile_id })
    }

    /// `undo shutdown <port>`.
    pub fn port_enable(&mut self, port: u16) -> Result<&mut Self, CoreError> {
        self.execute(&CliCommand::PortEnable { port })
    }

    pub fn port_disable(&mut self, port: u16) -> Result<&mut Self, CoreError> {
        self.execute(&CliCommand::PortDisable { port })
    }

    // ── ONT (interface mode) ─────────────────────────────────────────

    /// Register an ONT by serial number.
    pub fn ont_add(
        &mut self,
        port: u16,
        serial: &str,
        line_profile: u32,
        service_profile: u32,
        description: &str,
    ) -> Result<&mut Self, CoreError> {
        self.ont_register(OntRegistration {
            port,
            serial: serial.to_owned(),
            line_profile,
            service_profile,
            description: description.to_owned(),
        })
    }

    /// [`ont_add`](Self::ont_add) taking a prepared request.
    pub fn ont_register(&mut self, registration: OntRegistration) -> Result<&mut Self, CoreError> {
        self.execute(&CliCommand::OntAdd(registration))
    }

    pub fn ont_delete(&mut self, port: u16, ont: u32) -> Result<&mut Self, CoreError> {
        self.execute(&CliCommand::OntDelete { port, ont })
    }

    pub fn ont_reset(&mut self, port: u16, ont: u32) -> Result<&mut Self, CoreError> {
        self.execute(&CliCommand::OntReset { port, ont })
    }

    pub fn ont_activate(&mut self, port: u16, ont: u32) -> Result<&mut Self, CoreError> {
        self.execute(&CliCommand::OntActivate { port, ont })
    }

    pub fn ont_deactivate(&mut self, port: u16, ont: u32) -> Result<&mut Self, CoreError> {
        self.execute(&CliCommand::OntDeactivate { port, ont })
    }

    pub fn ont_modify_description(
        &mut self,
        port: u16,
        ont: u32,
        description: &str,
    ) -> Result<&mut Self, CoreError> {
        self.execute(&CliCommand::OntModifyDescription {
            port,
            ont,
            description: description.to_owned(),
        })
    }

    /// Set the untagged VLAN on one ONT Ethernet port.
    pub fn ont_port_native_vlan(
        &mut self,
        port: u16,
        ont: u32,
        eth: u16,
        vlan: u16,
    ) -> Result<&mut Self, CoreError> {
        self.execute(&CliCommand::OntPortNativeVlan {
            port,
            ont,
            eth,
            vlan,
        })
    }

    pub fn display_ont_info(&mut self, port: u16, ont: u32) -> Result<&mut Self, CoreError> {
        self.execute(&CliCommand::DisplayOntInfo { port, ont })
    }

    pub fn display_ont_optical_info(&mut self, port: u16, ont: u32) -> Result<&mut Self, CoreError> {
        self.execute(&CliCommand::DisplayOntOpticalInfo { port, ont })
    }

    pub fn display_ont_register_info(
        &mut self,
        port: u16,
        ont: u32,
    ) -> Result<&mut Self, CoreError> {
        self.execute(&CliCommand::DisplayOntRegisterInfo { port, ont })
    }

    pub fn display_ont_wan_info(&mut self, port: u16, ont: u32) -> Result<&mut Self, CoreError> {
        self.execute(&CliCommand::DisplayOntWanInfo { port, ont })
    }

    pub fn display_ont_version(&mut self, port: u16, ont: u32) -> Result<&mut Self, CoreError> {
        self.execute(&CliCommand::DisplayOntVersion { port, ont })
    }

    /// ONTs discovered on one port but not registered.
    pub fn display_ont_autofind(&mut self, port: u16) -> Result<&mut Self, CoreError> {
        self.execute(&CliCommand::DisplayOntAutofind { port })
    }

    pub fn display_port_state(&mut self, port: u16) -> Result<&mut Self, CoreError> {
        self.execute(&CliCommand::DisplayPortState { port })
    }

    // ── Multicast ────────────────────────────────────────────────────

    pub fn igmp_user_add(&mut self, index: u32) -> Result<&mut Self, CoreError> {
        self.execute(&CliCommand::IgmpUserAdd { index })
    }

    pub fn igmp_user_delete(&mut self, index: u32) -> Result<&mut Self, CoreError> {
        self.execute(&CliCommand::IgmpUserDelete { index })
    }

    pub fn multicast_member_add(&mut self, index: u32) -> Result<&mut Self, CoreError> {
        self.execute(&CliCommand::MulticastMemberAdd { index })
    }

    pub fn multicast_member_delete(&mut self, index: u32) -> Result<&mut Self, CoreError> {
        self.execute(&CliCommand::MulticastMemberDelete { index })
    }

    // ── Diagnostics ──────────────────────────────────────────────────

    pub fn display_ont_line_quality(&mut self, port: u16, ont: u32) -> Result<&mut Self, CoreError> {
        self.execute(&CliCommand::DisplayOntLineQuality { port, ont })
    }
}

/// The command that enters `target` from config mode.
fn entry_command(target: CliMode) -> Result<CliCommand, CoreError> {
    match target {
        CliMode::Interface { frame, slot } => Ok(CliCommand::Interface { frame, slot }),
        CliMode::MulticastVlan { vlan } => Ok(CliCommand::MulticastVlan { vlan }),
        CliMode::Diagnose => Ok(CliCommand::Diagnose),
        CliMode::Btv => Ok(CliCommand::Btv),
        CliMode::User | CliMode::Enable | CliMode::Config => Err(CoreError::Validation {
            message: format!("{target} is not entered from config mode"),
        }),
    }
}
