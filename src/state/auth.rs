//! Shared-secret gate in front of the admin panel.
//!
//! Plain string comparison against one fixed password: no hashing,
//! no lockout, no expiry. It only keeps casual visitors out of the editor.

use tracing::{info, warn};

use crate::error::AuthError;

#[derive(Debug, Clone)]
pub struct AdminGate {
    secret: String,
    authenticated: bool,
}

impl AdminGate {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            authenticated: false,
        }
    }

    /// Check `password`; on a match the session stays unlocked until sign-out
    pub fn authenticate(&mut self, password: &str) -> Result<(), AuthError> {
        if password == self.secret {
            self.authenticated = true;
            info!("🔓 Admin unlocked");
            Ok(())
        } else {
            warn!("🔒 Admin login rejected");
            Err(AuthError::WrongPassword)
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn sign_out(&mut self) {
        self.authenticated = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ADMIN_PASSWORD;

    #[test]
    fn test_correct_password_unlocks() {
        let mut gate = AdminGate::new(ADMIN_PASSWORD);
        assert!(gate.authenticate("1111").is_ok());
        assert!(gate.is_authenticated());
    }

    #[test]
    fn test_wrong_password_is_rejected_and_retry_allowed() {
        let mut gate = AdminGate::new(ADMIN_PASSWORD);
        let err = gate.authenticate("1234").unwrap_err();
        assert_eq!(err.to_string(), "Wrong password");
        assert!(!gate.is_authenticated());

        assert!(gate.authenticate("").is_err());
        assert!(gate.authenticate("1111").is_ok());
    }

    #[test]
    fn test_sign_out() {
        let mut gate = AdminGate::new(ADMIN_PASSWORD);
        gate.authenticate("1111").unwrap();
        gate.sign_out();
        assert!(!gate.is_authenticated());
    }
}
