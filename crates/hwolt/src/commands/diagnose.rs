//! Diagnose-mode handlers.

use hwolt_core::{CliCommand, CliMode};

use crate::cli::{DiagnoseArgs, DiagnoseCommand};

use super::Plan;

pub fn plan(args: DiagnoseArgs) -> Plan {
    match args.command {
        DiagnoseCommand::LineQuality { pon, ont } => Plan::single(
            CliMode::Diagnose,
            CliCommand::DisplayOntLineQuality { port: pon, ont },
        ),
    }
}
