//! VLAN command handlers.

use hwolt_core::{CliCommand, CliMode};

use crate::cli::{GlobalOpts, VlanArgs, VlanCommand};
use crate::error::CliError;

use super::{Plan, util};

pub fn plan(cmd: VlanCommand) -> Plan {
    let command = match cmd {
        VlanCommand::Add { vlan } => CliCommand::VlanAdd { vlan },
        VlanCommand::Delete { vlan } => CliCommand::VlanDelete { vlan },
        VlanCommand::Bind {
            vlan,
            board,
            uplink,
        } => CliCommand::PortVlan {
            vlan,
            frame: board.frame,
            slot: board.slot,
            port: uplink,
        },
    };
    Plan::single(CliMode::Config, command)
}

pub fn handle(args: VlanArgs, global: &GlobalOpts) -> Result<(), CliError> {
    if let VlanCommand::Delete { vlan } = args.command {
        if !util::confirm(
            &format!("Delete VLAN {vlan}? Service ports on it lose traffic."),
            "vlan delete",
            global.yes,
        )? {
            return Ok(());
        }
    }
    super::run(plan(args.command), global)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::BoardLocation;

    #[test]
    fn bind_names_the_uplink() {
        let p = plan(VlanCommand::Bind {
            vlan: 100,
            board: BoardLocation { frame: 0, slot: 9 },
            uplink: 0,
        });
        assert_eq!(p.mode, CliMode::Config);
        assert_eq!(p.commands[0].to_string(), "port vlan 100 0/9 0 ");
    }

    #[test]
    fn add_creates_smart_vlan() {
        let p = plan(VlanCommand::Add { vlan: 200 });
        assert_eq!(p.commands[0].to_string(), "vlan 200 smart ");
    }
}
