//! Nominal login session
//!
//! There is no real authentication: logging in records an email and an
//! opaque token in a session file under the data directory, and protected
//! commands check that the file exists. This mirrors what the tracker is —
//! a single-user, single-device tool where identity is a label.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::Config;
use crate::error::{Error, Result};

/// A logged-in identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// The email the user logged in with
    pub user: String,
    /// Opaque token minted at login
    pub token: String,
    /// When the session was created
    pub logged_in_at: DateTime<Utc>,
}

impl Session {
    fn new(email: &str) -> Self {
        Self {
            user: email.to_string(),
            token: format!("token_{}", uuid::Uuid::new_v4().simple()),
            logged_in_at: Utc::now(),
        }
    }

    /// Read a session from a specific path. Missing file means no session.
    pub fn load_from(path: &Path) -> Result<Option<Session>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn store_at(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// Log in with the given email, replacing any existing session.
pub fn login(email: &str) -> Result<Session> {
    login_at(&Config::session_path(), email)
}

/// Log in against a specific session path.
pub fn login_at(path: &Path, email: &str) -> Result<Session> {
    let email = email.trim();
    if email.is_empty() {
        return Err(Error::Auth("email must not be empty".to_string()));
    }

    let session = Session::new(email);
    session.store_at(path)?;
    tracing::info!(user = %session.user, "Logged in");
    Ok(session)
}

/// Remove the current session. Not an error if none exists.
pub fn logout() -> Result<()> {
    logout_at(&Config::session_path())
}

/// Remove the session at a specific path.
pub fn logout_at(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::info!("Logged out");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// The current session, if any.
pub fn current() -> Result<Option<Session>> {
    Session::load_from(&Config::session_path())
}

/// Whether a session exists.
pub fn is_authenticated() -> bool {
    matches!(current(), Ok(Some(_)))
}

/// The current session, or an error telling the user how to log in.
pub fn require_session() -> Result<Session> {
    current()?.ok_or_else(|| {
        Error::Auth("not logged in; run `taskmeter login <email>` first".to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_login_logout_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");

        let session = login_at(&path, "ada@example.com").unwrap();
        assert_eq!(session.user, "ada@example.com");
        assert!(session.token.starts_with("token_"));

        let loaded = Session::load_from(&path).unwrap().expect("session stored");
        assert_eq!(loaded.user, session.user);
        assert_eq!(loaded.token, session.token);

        logout_at(&path).unwrap();
        assert!(Session::load_from(&path).unwrap().is_none());
    }

    #[test]
    fn test_logout_without_session_is_ok() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        logout_at(&path).unwrap();
    }

    #[test]
    fn test_login_replaces_existing_session() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");

        let first = login_at(&path, "ada@example.com").unwrap();
        let second = login_at(&path, "grace@example.com").unwrap();
        assert_ne!(first.token, second.token);

        let loaded = Session::load_from(&path).unwrap().unwrap();
        assert_eq!(loaded.user, "grace@example.com");
    }

    #[test]
    fn test_empty_email_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        assert!(matches!(login_at(&path, "  "), Err(Error::Auth(_))));
    }
}
