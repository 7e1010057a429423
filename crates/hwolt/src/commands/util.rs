//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal there is nobody to ask, so the action is refused.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Error for a field that only `--from-file` may leave out.
pub fn required(field: &str) -> CliError {
    CliError::Validation {
        field: field.into(),
        reason: "required unless --from-file is given".into(),
    }
}

/// Read and parse a JSON file for `--from-file` flags.
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: "from-file".into(),
        reason: format!("{}: {e}", path.display()),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use hwolt_core::OntRegistration;

    use super::*;

    #[test]
    fn yes_flag_skips_prompt() {
        assert!(confirm("Delete?", "delete", true).unwrap());
    }

    #[test]
    fn reads_typed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ont.json");
        std::fs::write(
            &path,
            r#"{"port":1,"serial":"48575443A1B2C3D4","line_profile":10,"service_profile":20,"description":"flat-12"}"#,
        )
        .unwrap();

        let reg: OntRegistration = read_json_file(&path).unwrap();
        assert_eq!(reg.serial, "48575443A1B2C3D4");
        assert_eq!(reg.line_profile, 10);
    }

    #[test]
    fn malformed_json_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{").unwrap();

        let err = read_json_file::<OntRegistration>(&path).unwrap_err();
        assert!(matches!(err, CliError::Validation { ref reason, .. } if reason.contains("broken.json")));
    }
}
