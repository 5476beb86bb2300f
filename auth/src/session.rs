use crate::digest::rolling_digest;
use crate::store::{AccountRecord, CredentialStore, SessionUser};
use crate::{AuthError, AuthResult};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

const MIN_NAME_CHARS: usize = 2;
const MIN_PASSWORD_CHARS: usize = 6;

/// Login, registration, and logout over a [`CredentialStore`].
///
/// Holds the current session in memory and mirrors it to storage so it
/// survives restarts. Emails are stored and compared lower-cased; the
/// password check uses the demo rolling digest.
pub struct SessionManager<S: CredentialStore> {
    store: S,
    current: Option<SessionUser>,
}

impl<S: CredentialStore> SessionManager<S> {
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store,
            current: None,
        }
    }

    /// Reload the persisted session, discarding unreadable data.
    pub fn restore(&mut self) {
        self.current = match self.store.load_session() {
            Ok(session) => session,
            Err(error) => {
                debug!(%error, "discarding unreadable persisted session");
                None
            }
        };
    }

    #[must_use]
    pub fn current_user(&self) -> Option<&SessionUser> {
        self.current.as_ref()
    }

    pub fn login(&mut self, email: &str, password: &str) -> AuthResult<SessionUser> {
        let email = normalize_email(email);
        let accounts = self.store.load_accounts()?;
        let account = accounts.get(&email).ok_or(AuthError::AccountNotFound)?;

        if account.password_hash != rolling_digest(password) {
            return Err(AuthError::IncorrectPassword);
        }

        let user = SessionUser {
            id: rolling_digest(&email),
            name: account.name.clone(),
            email,
        };
        self.set_session(user.clone())?;
        debug!(email = %user.email, "logged in");
        Ok(user)
    }

    pub fn register(&mut self, name: &str, email: &str, password: &str) -> AuthResult<SessionUser> {
        let name = name.trim();
        if name.chars().count() < MIN_NAME_CHARS {
            return Err(AuthError::NameTooShort);
        }
        if !is_valid_email(email) {
            return Err(AuthError::InvalidEmail);
        }
        if password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(AuthError::PasswordTooShort);
        }

        let email = normalize_email(email);
        let mut accounts = self.store.load_accounts()?;
        if accounts.contains_key(&email) {
            return Err(AuthError::DuplicateAccount);
        }
        accounts.insert(
            email.clone(),
            AccountRecord {
                name: name.to_string(),
                password_hash: rolling_digest(password),
            },
        );
        self.store.save_accounts(&accounts)?;

        let user = SessionUser {
            id: rolling_digest(&email),
            name: name.to_string(),
            email,
        };
        self.set_session(user.clone())?;
        debug!(email = %user.email, "registered");
        Ok(user)
    }

    /// Clear the in-memory and persisted session.
    pub fn logout(&mut self) -> AuthResult<()> {
        self.current = None;
        self.store.clear_session()
    }

    fn set_session(&mut self, user: SessionUser) -> AuthResult<()> {
        self.store.save_session(&user)?;
        self.current = Some(user);
        Ok(())
    }
}

fn normalize_email(email: &str) -> String {
    email.to_lowercase()
}

fn is_valid_email(email: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"))
        .is_match(email)
}
