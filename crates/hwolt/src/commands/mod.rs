//! Command dispatch: bridges CLI args -> catalog commands -> device run -> output.
//!
//! Every device subcommand reduces to a [`Plan`]: the mode to work in and
//! the catalog lines to send there. [`run_plan`] drives one session
//! through it and prints the transcript.

pub mod board;
pub mod config_cmd;
pub mod diagnose;
pub mod display;
pub mod igmp;
pub mod multicast;
pub mod ont;
pub mod port;
pub mod send;
pub mod service_port;
pub mod util;
pub mod vlan;

use std::io::{self, Write};

use tracing::{debug, info};

use hwolt_core::{CliCommand, CliMode, CoreError, Session, ShellChannel};

use crate::cli::{Command, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output::{self, Exchange};

/// What one device subcommand does on the OLT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    /// Mode the commands run in.
    pub mode: CliMode,
    pub commands: Vec<CliCommand>,
}

impl Plan {
    pub fn new(mode: CliMode, commands: Vec<CliCommand>) -> Self {
        Self { mode, commands }
    }

    pub fn single(mode: CliMode, command: CliCommand) -> Self {
        Self::new(mode, vec![command])
    }
}

/// Dispatch a device-bound command to the appropriate handler.
pub fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Send(args) => send::handle(args, global),
        Command::Ont(args) => ont::handle(args, global),
        Command::Port(args) => run(port::plan(args), global),
        Command::Board(args) => run(board::plan(args), global),
        Command::Vlan(args) => vlan::handle(args, global),
        Command::ServicePort(args) => service_port::handle(args, global),
        Command::Igmp(args) => run(igmp::plan(args), global),
        Command::Multicast(args) => run(multicast::plan(args), global),
        Command::Display(args) => run(display::plan(args), global),
        Command::Diagnose(args) => run(diagnose::plan(args), global),
        Command::Config(args) => config_cmd::handle(args, global),
        // Completions are handled before dispatch
        Command::Completions(_) => unreachable!(),
    }
}

/// Open a session for this invocation, run `plan`, print the transcript.
pub fn run(plan: Plan, global: &GlobalOpts) -> Result<(), CliError> {
    let exchanges = with_session(global, move |session| run_plan(session, &plan))?;
    print_transcript(&exchanges, global);
    Ok(())
}

/// Open and log in, hand the session to `work`, then always disconnect.
pub fn with_session<T>(
    global: &GlobalOpts,
    work: impl FnOnce(&mut Session) -> Result<T, CoreError>,
) -> Result<T, CliError> {
    let (profile, session_config) = config::session_config(global)?;
    info!(olt = %session_config.target, "connecting");

    let mut session = Session::open(session_config)?.with_debug_sink(notice_sink(global));
    if let Err(e) = session.connect() {
        let _ = session.disconnect();
        return Err(match e {
            CoreError::AuthenticationFailed { .. } => CliError::AuthFailed { profile },
            other => other.into(),
        });
    }

    let result = work(&mut session);
    if let Err(e) = session.disconnect() {
        debug!(error = %e, "disconnect failed");
    }
    result.map_err(CliError::from)
}

/// Where `[Debug]` notices go. Stdout carries the transcript only.
fn notice_sink(global: &GlobalOpts) -> Box<dyn Write> {
    if global.quiet {
        Box::new(io::sink())
    } else {
        Box::new(io::stderr())
    }
}

/// Navigate to the plan's mode, send each command and collect its reply,
/// then quit back to user mode.
///
/// Output produced by the navigation itself is drained and dropped.
pub fn run_plan<C: ShellChannel>(
    session: &mut Session<C>,
    plan: &Plan,
) -> Result<Vec<Exchange>, CoreError> {
    if session.mode() != plan.mode {
        session.enter(plan.mode)?;
        session.read()?;
    }

    let mut exchanges = Vec::with_capacity(plan.commands.len());
    for command in &plan.commands {
        debug!(command = command.name(), mode = %session.mode(), "executing");
        session.execute(command)?;
        let output = session.read()?;
        exchanges.push(Exchange {
            command: command.to_string(),
            output,
        });
    }

    if session.mode() != CliMode::User {
        session.enter(CliMode::User)?;
        session.read()?;
    }
    Ok(exchanges)
}

pub fn print_transcript(exchanges: &[Exchange], global: &GlobalOpts) {
    let out = output::render_transcript(
        &global.output_format(),
        exchanges,
        output::should_color(&global.color),
    );
    output::print_output(&out, global.quiet);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;
    use std::time::Duration;

    use hwolt_core::{Credentials, SessionConfig};

    use crate::cli::OutputFormat;

    use super::*;

    /// Records writes; answers each read with the next queued chunk.
    #[derive(Default)]
    pub(crate) struct Recorder {
        pub written: Vec<u8>,
        pub replies: VecDeque<Vec<u8>>,
    }

    impl ShellChannel for Recorder {
        fn login(&mut self, _: &Credentials) -> Result<(), hwolt_core::ApiError> {
            Ok(())
        }
        fn write(&mut self, data: &[u8]) -> Result<usize, hwolt_core::ApiError> {
            self.written.extend_from_slice(data);
            Ok(data.len())
        }
        fn read(&mut self) -> Result<Vec<u8>, hwolt_core::ApiError> {
            Ok(self.replies.pop_front().unwrap_or_default())
        }
        fn set_timeout(&mut self, _: Option<Duration>) {}
        fn disconnect(&mut self) -> Result<(), hwolt_core::ApiError> {
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct Notices(Rc<RefCell<Vec<u8>>>);

    impl Write for Notices {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Lines a plan writes to a fresh, logged-in session.
    pub(crate) fn wire(plan: &Plan) -> Vec<String> {
        let target = "192.0.2.10:22".parse().unwrap();
        let config = SessionConfig::new(target, Credentials::new("root", "admin123".to_owned()));
        let mut session = Session::with_channel(config, Recorder::default());
        session.connect().unwrap();
        run_plan(&mut session, plan).unwrap();
        String::from_utf8(session.channel().written.clone())
            .unwrap()
            .lines()
            .map(str::to_owned)
            .collect()
    }

    #[test]
    fn plan_runs_inside_its_mode_and_returns_to_user() {
        let plan = Plan::single(
            CliMode::Interface { frame: 0, slot: 3 },
            CliCommand::PortEnable { port: 1 },
        );
        assert_eq!(
            wire(&plan),
            ["enable", "config", "interface gpon 0/3 ", "undo shutdown 1 ", "quit", "quit", "quit"]
        );
    }

    #[test]
    fn transcript_pairs_each_command_with_its_reply() {
        let target = "192.0.2.10:22".parse().unwrap();
        let config = SessionConfig::new(target, Credentials::new("root", "x".to_owned()));
        let channel = Recorder {
            replies: VecDeque::from([
                b"banner".to_vec(),
                b"nav".to_vec(),
                b"VERSION : V800R021".to_vec(),
            ]),
            ..Recorder::default()
        };
        let mut session = Session::with_channel(config, channel);
        session.connect().unwrap();

        let plan = Plan::single(CliMode::Enable, CliCommand::DisplayVersion);
        let exchanges = run_plan(&mut session, &plan).unwrap();

        assert_eq!(exchanges.len(), 1);
        assert_eq!(exchanges[0].command, "display version ");
        assert_eq!(exchanges[0].output, "VERSION : V800R021");
    }

    #[test]
    fn debug_notices_stay_out_of_json_transcript() {
        let target = "192.0.2.10:22".parse().unwrap();
        let config = SessionConfig::new(target, Credentials::new("root", "x".to_owned()))
            .with_debug(true);
        let channel = Recorder {
            replies: VecDeque::from([
                b"banner".to_vec(),
                b"nav".to_vec(),
                b"VERSION : V800R021".to_vec(),
            ]),
            ..Recorder::default()
        };
        let notices = Notices::default();
        let mut session = Session::with_channel(config, channel).with_debug_sink(notices.clone());
        session.connect().unwrap();

        let plan = Plan::single(CliMode::Enable, CliCommand::DisplayVersion);
        let exchanges = run_plan(&mut session, &plan).unwrap();
        let rendered = output::render_transcript(&OutputFormat::Json, &exchanges, false);

        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed[0]["command"], "display version ");
        assert!(!rendered.contains("[Debug]"));
        let notices = String::from_utf8(notices.0.borrow().clone()).unwrap();
        assert!(notices.starts_with("[Debug] enable\n[Debug] display version \n"), "{notices}");
    }
}
