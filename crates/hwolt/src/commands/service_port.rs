//! Service-port command handlers.

use hwolt_core::{CliCommand, CliMode, GponPort, ServicePortRequest};

use crate::cli::{GlobalOpts, ServicePortArgs, ServicePortCommand};
use crate::error::CliError;

use super::{Plan, util};

pub fn plan(cmd: ServicePortCommand) -> Result<Plan, CliError> {
    let command = match cmd {
        ServicePortCommand::Add {
            index,
            vlan,
            frame,
            slot,
            pon,
            ont,
            gemport,
            user_vlan,
            from_file,
        } => {
            let request = if let Some(path) = from_file {
                util::read_json_file::<ServicePortRequest>(&path)?
            } else {
                ServicePortRequest {
                    index: index.ok_or_else(|| util::required("index"))?,
                    vlan: vlan.ok_or_else(|| util::required("vlan"))?,
                    location: GponPort::new(
                        frame,
                        slot.ok_or_else(|| util::required("slot"))?,
                        pon.ok_or_else(|| util::required("pon"))?,
                    ),
                    ont: ont.ok_or_else(|| util::required("ont"))?,
                    gemport,
                    user_vlan: user_vlan.ok_or_else(|| util::required("user-vlan"))?,
                }
            };
            CliCommand::ServicePortAdd(request)
        }
        ServicePortCommand::Delete { index } => CliCommand::ServicePortDelete { index },
        ServicePortCommand::Show { index } => CliCommand::DisplayServicePort { index },
        ServicePortCommand::Ont(t) => CliCommand::DisplayServicePortOnt {
            location: GponPort::new(t.board.frame, t.board.slot, t.pon),
            ont: t.ont,
        },
    };
    Ok(Plan::single(CliMode::Config, command))
}

pub fn handle(args: ServicePortArgs, global: &GlobalOpts) -> Result<(), CliError> {
    if let ServicePortCommand::Delete { index } = args.command {
        if !util::confirm(
            &format!("Delete service port {index}?"),
            "service-port delete",
            global.yes,
        )? {
            return Ok(());
        }
    }
    super::run(plan(args.command)?, global)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::cli::{Cli, Command};
    use crate::commands::tests::wire;

    fn parse(args: &[&str]) -> ServicePortCommand {
        let mut argv = vec!["hwolt", "service-port"];
        argv.extend_from_slice(args);
        match Cli::parse_from(argv).command {
            Command::ServicePort(a) => a.command,
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn add_from_flags() {
        let cmd = parse(&[
            "add", "120", "--vlan", "100", "--slot", "1", "--pon", "2", "--ont", "5",
            "--user-vlan", "10",
        ]);
        assert_eq!(
            wire(&plan(cmd).unwrap()),
            [
                "enable",
                "config",
                "service-port 120 vlan 100 gpon 0/1/2 ont 5 gemport 1 multi-service \
                 user-vlan 10 tag-transform translate ",
                "quit",
                "quit",
            ]
        );
    }

    #[test]
    fn add_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sp.json");
        std::fs::write(
            &path,
            r#"{"index":7,"vlan":300,"frame":0,"slot":3,"port":1,"ont":9,"gemport":2,"user_vlan":30}"#,
        )
        .unwrap();

        let plan = plan(parse(&["add", "--from-file", path.to_str().unwrap()])).unwrap();
        assert_eq!(
            plan.commands[0].to_string(),
            "service-port 7 vlan 300 gpon 0/3/1 ont 9 gemport 2 multi-service user-vlan 30 \
             tag-transform translate "
        );
    }

    #[test]
    fn ont_lookup_uses_full_location() {
        let plan = plan(parse(&["ont", "--slot", "1", "2", "5"])).unwrap();
        assert_eq!(
            plan.commands[0].to_string(),
            "display service-port port 0/1/2 ont 5 "
        );
    }

    #[test]
    fn missing_fields_without_file_are_rejected() {
        let err = plan(ServicePortCommand::Add {
            index: Some(1),
            vlan: None,
            frame: 0,
            slot: Some(1),
            pon: Some(1),
            ont: Some(1),
            gemport: 1,
            user_vlan: Some(1),
            from_file: None,
        })
        .unwrap_err();
        assert!(matches!(err, CliError::Validation { ref field, .. } if field == "vlan"));
    }
}
