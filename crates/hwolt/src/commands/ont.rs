//! ONT command handlers.
//!
//! Everything here runs inside `interface gpon F/S` for the ONT's board.

use hwolt_core::{CliCommand, CliMode, OntRegistration};

use crate::cli::{BoardLocation, GlobalOpts, OntArgs, OntCommand, OntTarget};
use crate::error::CliError;

use super::{Plan, util};

fn board_mode(board: &BoardLocation) -> CliMode {
    CliMode::Interface {
        frame: board.frame,
        slot: board.slot,
    }
}

fn on_target(target: &OntTarget, build: impl FnOnce(u16, u32) -> CliCommand) -> Plan {
    Plan::single(board_mode(&target.board), build(target.pon, target.ont))
}

/// Translate an ONT subcommand into the lines it sends.
pub fn plan(cmd: OntCommand) -> Result<Plan, CliError> {
    let plan = match cmd {
        OntCommand::Add {
            board,
            pon,
            serial,
            line_profile,
            service_profile,
            description,
            from_file,
        } => {
            let registration = if let Some(path) = from_file {
                util::read_json_file::<OntRegistration>(&path)?
            } else {
                OntRegistration {
                    port: pon.ok_or_else(|| util::required("port"))?,
                    serial: serial.ok_or_else(|| util::required("serial"))?,
                    line_profile,
                    service_profile,
                    description: description.ok_or_else(|| util::required("description"))?,
                }
            };
            Plan::single(board_mode(&board), CliCommand::OntAdd(registration))
        }
        OntCommand::Delete(t) => on_target(&t, |port, ont| CliCommand::OntDelete { port, ont }),
        OntCommand::Reset(t) => on_target(&t, |port, ont| CliCommand::OntReset { port, ont }),
        OntCommand::Activate(t) => {
            on_target(&t, |port, ont| CliCommand::OntActivate { port, ont })
        }
        OntCommand::Deactivate(t) => {
            on_target(&t, |port, ont| CliCommand::OntDeactivate { port, ont })
        }
        OntCommand::Info(t) => on_target(&t, |port, ont| CliCommand::DisplayOntInfo { port, ont }),
        OntCommand::Optical(t) => {
            on_target(&t, |port, ont| CliCommand::DisplayOntOpticalInfo { port, ont })
        }
        OntCommand::Register(t) => {
            on_target(&t, |port, ont| CliCommand::DisplayOntRegisterInfo { port, ont })
        }
        OntCommand::Wan(t) => {
            on_target(&t, |port, ont| CliCommand::DisplayOntWanInfo { port, ont })
        }
        OntCommand::Version(t) => {
            on_target(&t, |port, ont| CliCommand::DisplayOntVersion { port, ont })
        }
        OntCommand::Autofind(t) => Plan::single(
            board_mode(&t.board),
            CliCommand::DisplayOntAutofind { port: t.pon },
        ),
        OntCommand::Describe {
            target,
            description,
        } => on_target(&target, |port, ont| CliCommand::OntModifyDescription {
            port,
            ont,
            description,
        }),
        OntCommand::NativeVlan { target, eth, vlan } => {
            on_target(&target, |port, ont| CliCommand::OntPortNativeVlan {
                port,
                ont,
                eth,
                vlan,
            })
        }
    };
    Ok(plan)
}

pub fn handle(args: OntArgs, global: &GlobalOpts) -> Result<(), CliError> {
    if let OntCommand::Delete(ref t) = args.command {
        let location = format!("{}/{}/{}", t.board.frame, t.board.slot, t.pon);
        if !util::confirm(
            &format!("Delete ONT {} on {location}? Its service ports stop working.", t.ont),
            "ont delete",
            global.yes,
        )? {
            return Ok(());
        }
    }
    super::run(plan(args.command)?, global)
}
