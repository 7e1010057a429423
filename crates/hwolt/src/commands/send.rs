//! Raw line sender.
//!
//! Lines go out exactly as typed, right after login. Mode changes they
//! cause are not tracked and nothing is quit afterwards.

use tracing::debug;

use hwolt_core::{CoreError, Session, ShellChannel};

use crate::cli::{GlobalOpts, SendArgs};
use crate::error::CliError;
use crate::output::Exchange;

/// Send each line and pair it with the output read after it.
pub fn send_lines<C: ShellChannel>(
    session: &mut Session<C>,
    lines: &[String],
) -> Result<Vec<Exchange>, CoreError> {
    let mut exchanges = Vec::with_capacity(lines.len());
    for line in lines {
        debug!(line = %line, "sending raw line");
        session.send(line)?;
        let output = session.read()?;
        exchanges.push(Exchange {
            command: line.clone(),
            output,
        });
    }
    Ok(exchanges)
}

pub fn handle(args: SendArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let exchanges = super::with_session(global, |session| send_lines(session, &args.lines))?;
    super::print_transcript(&exchanges, global);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::VecDeque;

    use hwolt_core::{CliMode, Credentials, SessionConfig};

    use super::*;
    use crate::commands::tests::Recorder;

    #[test]
    fn lines_are_sent_verbatim_and_mode_is_untouched() {
        let target = "192.0.2.10:22".parse().unwrap();
        let config = SessionConfig::new(target, Credentials::new("root", "x".to_owned()));
        let channel = Recorder {
            replies: VecDeque::from([b"banner".to_vec(), b"MA5800>".to_vec(), b"ok".to_vec()]),
            ..Recorder::default()
        };
        let mut session = Session::with_channel(config, channel);
        session.connect().unwrap();

        let lines = vec!["enable".to_owned(), "display time".to_owned()];
        let exchanges = send_lines(&mut session, &lines).unwrap();

        assert_eq!(session.channel().written, b"enable\ndisplay time\n");
        assert_eq!(session.mode(), CliMode::User);
        assert_eq!(exchanges[0].output, "MA5800>");
        assert_eq!(exchanges[1].command, "display time");
    }
}
