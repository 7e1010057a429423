//! Read-only display handlers.

use hwolt_core::{CliCommand, CliMode};

use crate::cli::{DisplayArgs, DisplayCommand};

use super::Plan;

pub fn plan(args: DisplayArgs) -> Plan {
    match args.command {
        DisplayCommand::Version => Plan::single(CliMode::Enable, CliCommand::DisplayVersion),
        DisplayCommand::Config { filter } => Plan::single(
            CliMode::Config,
            CliCommand::DisplayCurrentConfiguration { filter },
        ),
        DisplayCommand::Autofind => Plan::single(CliMode::Config, CliCommand::DisplayOntAutofindAll),
        DisplayCommand::OntBySn { serial } => {
            Plan::single(CliMode::Config, CliCommand::DisplayOntInfoBySn { serial })
        }
    }
}
