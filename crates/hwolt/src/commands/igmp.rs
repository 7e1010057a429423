//! IGMP user handlers (btv mode).

use hwolt_core::{CliCommand, CliMode};

use crate::cli::{IgmpArgs, IgmpCommand};

use super::Plan;

pub fn plan(args: IgmpArgs) -> Plan {
    let command = match args.command {
        IgmpCommand::Add { index } => CliCommand::IgmpUserAdd { index },
        IgmpCommand::Delete { index } => CliCommand::IgmpUserDelete { index },
    };
    Plan::single(CliMode::Btv, command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::wire;

    #[test]
    fn add_goes_through_btv() {
        let p = plan(IgmpArgs {
            command: IgmpCommand::Add { index: 120 },
        });
        assert_eq!(
            wire(&p),
            [
                "enable",
                "config",
                "btv",
                "igmp user add service-port 120 no-auth ",
                "quit",
                "quit",
                "quit",
            ]
        );
    }
}
