//! Board command handlers.

use hwolt_core::{CliCommand, CliMode};

use crate::cli::{BoardArgs, BoardCommand};

use super::Plan;

pub fn plan(args: BoardArgs) -> Plan {
    let command = match args.command {
        BoardCommand::Confirm { frame } => CliCommand::BoardConfirm { frame },
        BoardCommand::Show { frame } => CliCommand::DisplayBoard { frame },
    };
    Plan::single(CliMode::Config, command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::wire;

    #[test]
    fn confirm_runs_in_config_mode() {
        let p = plan(BoardArgs {
            command: BoardCommand::Confirm { frame: 0 },
        });
        assert_eq!(
            wire(&p),
            ["enable", "config", "board confirm 0 ", "quit", "quit"]
        );
    }
}
