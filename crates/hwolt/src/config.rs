//! CLI configuration -- thin wrapper around `hwolt_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--host, --password, etc.).

use secrecy::SecretString;

use hwolt_core::{Credentials, SessionConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use hwolt_config::{
    Config, ConfigError, Defaults, Profile, config_path, keyring_entry, load_config,
    load_config_or_default, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build the `SessionConfig` for this invocation, with the name of the
/// profile it came from.
///
/// CLI flags (and their `HWOLT_*` env vars) take priority over profile
/// values. A profile named explicitly with `--profile` must exist; the
/// default profile may be absent when `--host` supplies the target.
pub fn session_config(global: &GlobalOpts) -> Result<(String, SessionConfig), CliError> {
    let config = load_config()?;
    let name = active_profile_name(global, &config);

    let mut profile = match config.profiles.get(&name) {
        Some(p) => p.clone(),
        None if global.profile.is_some() => {
            let available: Vec<&str> = config.profiles.keys().map(String::as_str).collect();
            return Err(CliError::ProfileNotFound {
                name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            });
        }
        None => Profile::default(),
    };

    apply_overrides(&mut profile, global);

    if profile.host.trim().is_empty() {
        return Err(CliError::MissingHost {
            path: config_path().display().to_string(),
        });
    }

    let target = hwolt_config::profile_target(&profile)?;
    let username = hwolt_config::resolve_username(&profile, &name)?;
    let password = match global.password {
        Some(ref pw) => SecretString::from(pw.clone()),
        None => hwolt_config::resolve_password(&profile, &name)?,
    };

    let session = hwolt_config::session_config_from(
        &profile,
        &config.defaults,
        target,
        Credentials::new(username, password),
    )?;
    Ok((name, session))
}

/// Fold the global flags into a profile copy.
fn apply_overrides(profile: &mut Profile, global: &GlobalOpts) {
    if let Some(ref host) = global.host {
        profile.host.clone_from(host);
    }
    if global.ssh_port.is_some() {
        profile.port = global.ssh_port;
    }
    if global.username.is_some() {
        profile.username.clone_from(&global.username);
    }
    if global.proxy.is_some() {
        profile.proxy.clone_from(&global.proxy);
    }
    if global.timeout.is_some() {
        profile.timeout = global.timeout;
    }
    if global.debug {
        profile.debug = Some(true);
    }
    if global.enforce_modes {
        profile.enforce_modes = Some(true);
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["hwolt"];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["display", "version"]);
        Cli::parse_from(argv).global
    }

    #[test]
    fn flags_override_profile_values() {
        let mut profile = Profile {
            host: "10.0.0.2".into(),
            port: Some(2222),
            username: Some("noc".into()),
            timeout: Some(9),
            ..Profile::default()
        };
        let g = global(&[
            "--host", "10.9.9.9", "--port", "22", "-u", "root", "--timeout", "0", "--debug",
        ]);
        apply_overrides(&mut profile, &g);

        assert_eq!(profile.host, "10.9.9.9");
        assert_eq!(profile.port(), 22);
        assert_eq!(profile.username.as_deref(), Some("root"));
        assert_eq!(profile.timeout, Some(0));
        assert_eq!(profile.debug, Some(true));
        assert_eq!(profile.enforce_modes, None);
    }

    #[test]
    fn absent_flags_keep_profile_values() {
        let mut profile = Profile {
            host: "10.0.0.2".into(),
            proxy: Some("127.0.0.1:1080".into()),
            debug: Some(true),
            ..Profile::default()
        };
        apply_overrides(&mut profile, &global(&[]));

        assert_eq!(profile.host, "10.0.0.2");
        assert_eq!(profile.proxy.as_deref(), Some("127.0.0.1:1080"));
        assert_eq!(profile.debug, Some(true));
    }
}
