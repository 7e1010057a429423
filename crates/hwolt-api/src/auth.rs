use secrecy::{ExposeSecret, SecretString};

/// Login material for the OLT's SSH service.
///
/// Opaque to this crate: nothing is validated locally, the device is the
/// only judge. The password stays wrapped so it never lands in logs or
/// `Debug` output.
#[derive(Debug, Clone)]
pub struct Credentials {
    username: String,
    password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<SecretString>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &SecretString {
        &self.password
    }

    /// Borrow the plaintext password for the SSH auth call.
    pub(crate) fn expose_password(&self) -> &str {
        self.password.expose_secret()
    }
}
