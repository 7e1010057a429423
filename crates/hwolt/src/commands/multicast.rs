//! Multicast VLAN membership handlers.

use hwolt_core::{CliCommand, CliMode};

use crate::cli::{MulticastArgs, MulticastCommand};

use super::Plan;

pub fn plan(args: MulticastArgs) -> Plan {
    let (vlan, command) = match args.command {
        MulticastCommand::Add { vlan, index } => (vlan, CliCommand::MulticastMemberAdd { index }),
        MulticastCommand::Delete { vlan, index } => {
            (vlan, CliCommand::MulticastMemberDelete { index })
        }
    };
    Plan::single(CliMode::MulticastVlan { vlan }, command)
}
