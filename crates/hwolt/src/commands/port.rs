//! GPON port command handlers.

use hwolt_core::{CliCommand, CliMode};

use crate::cli::{PonTarget, PortArgs, PortCommand};

use super::Plan;

fn on_port(target: &PonTarget, command: CliCommand) -> Plan {
    Plan::single(
        CliMode::Interface {
            frame: target.board.frame,
            slot: target.board.slot,
        },
        command,
    )
}

pub fn plan(args: PortArgs) -> Plan {
    match args.command {
        PortCommand::Enable(t) => on_port(&t, CliCommand::PortEnable { port: t.pon }),
        PortCommand::Disable(t) => on_port(&t, CliCommand::PortDisable { port: t.pon }),
        PortCommand::AutoFind { target, state } => on_port(
            &target,
            CliCommand::PortOntAutoFind {
                port: target.pon,
                enable: state.is_on(),
            },
        ),
        PortCommand::Fec { target, state } => on_port(
            &target,
            CliCommand::PortFec {
                port: target.pon,
                enable: state.is_on(),
            },
        ),
        PortCommand::AlarmProfile { target, profile_id } => on_port(
            &target,
            CliCommand::PortAlarmProfile {
                port: target.pon,
                profile_id,
            },
        ),
        PortCommand::State(t) => on_port(&t, CliCommand::DisplayPortState { port: t.pon }),
    }
}
