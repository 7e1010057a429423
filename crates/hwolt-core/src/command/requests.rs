// ── Typed request structs for multi-field commands ──
//
// Commands with more than a couple of parameters take one of these
// instead of a long positional argument list. They deserialize from JSON
// so the CLI can read them from `--from-file`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A GPON port addressed as `frame/slot/port`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GponPort {
    pub frame: u16,
    pub slot: u16,
    pub port: u16,
}

impl GponPort {
    pub fn new(frame: u16, slot: u16, port: u16) -> Self {
        Self { frame, slot, port }
    }
}

impl fmt::Display for GponPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.frame, self.slot, self.port)
    }
}

// ── ONT ────────────────────────────────────────────────────────────

/// Register an ONT by serial number on a port of the current GPON board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OntRegistration {
    /// Port on the board selected with `interface gpon F/S`.
    pub port: u16,
    /// ONT serial number, e.g. `48575443A1B2C3D4`.
    pub serial: String,
    pub line_profile: u32,
    pub service_profile: u32,
    /// Free text. Written verbatim; spaces split it on the device side.
    pub description: String,
}

// ── Service port ───────────────────────────────────────────────────

/// Bind a subscriber VLAN on an ONT GEM port to a network VLAN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePortRequest {
    /// Service-port index to create.
    pub index: u32,
    /// Network-side VLAN.
    pub vlan: u16,
    #[serde(flatten)]
    pub location: GponPort,
    pub ont: u32,
    pub gemport: u32,
    /// VLAN tag the ONT puts on subscriber traffic.
    pub user_vlan: u16,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn gpon_port_display() {
        assert_eq!(GponPort::new(0, 3, 7).to_string(), "0/3/7");
    }

    #[test]
    fn service_port_from_flat_json() {
        let req: ServicePortRequest = serde_json::from_str(
            r#"{"index": 120, "vlan": 100, "frame": 0, "slot": 1, "port": 2,
                "ont": 5, "gemport": 1, "user_vlan": 10}"#,
        )
        .unwrap();
        assert_eq!(req.location, GponPort::new(0, 1, 2));
        assert_eq!(req.user_vlan, 10);
    }

    #[test]
    fn ont_registration_from_json() {
        let req: OntRegistration = serde_json::from_str(
            r#"{"port": 0, "serial": "48575443A1B2C3D4", "line_profile": 1,
                "service_profile": 2, "description": "test"}"#,
        )
        .unwrap();
        assert_eq!(req.serial, "48575443A1B2C3D4");
        assert_eq!(req.service_profile, 2);
    }
}
