use crate::{AuthError, AuthResult};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// A registered account, keyed externally by normalized email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub name: String,
    /// Rolling digest of the password. A demo placeholder, not a real hash.
    pub password_hash: String,
}

/// The currently authenticated identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// All registered accounts, keyed by normalized email.
pub type AccountMap = HashMap<String, AccountRecord>;

/// Durable storage for the account map and the current session.
///
/// No transactions and no cross-process coordination; a single client is
/// assumed.
pub trait CredentialStore {
    fn load_accounts(&self) -> AuthResult<AccountMap>;
    fn save_accounts(&mut self, accounts: &AccountMap) -> AuthResult<()>;
    fn load_session(&self) -> AuthResult<Option<SessionUser>>;
    fn save_session(&mut self, session: &SessionUser) -> AuthResult<()>;
    fn clear_session(&mut self) -> AuthResult<()>;
}

const ACCOUNTS_FILE: &str = "accounts.json";
const SESSION_FILE: &str = "session.json";
const APP_DIR: &str = "plantguard";

/// JSON-file storage under an application directory. Missing files read as
/// empty; writes create the directory on demand.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store under the platform config directory (`<config>/plantguard`).
    pub fn open_default() -> AuthResult<Self> {
        let base = dirs::config_dir().ok_or_else(|| {
            AuthError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no platform config directory",
            ))
        })?;
        Ok(Self::open(base.join(APP_DIR)))
    }

    /// Store under an explicit directory.
    #[must_use]
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn read_json<T: DeserializeOwned>(&self, file: &str) -> AuthResult<Option<T>> {
        let path = self.dir.join(file);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn write_json<T: Serialize>(&self, file: &str, value: &T) -> AuthResult<()> {
        fs::create_dir_all(&self.dir)?;
        let content = serde_json::to_string_pretty(value)?;
        fs::write(self.dir.join(file), content)?;
        Ok(())
    }
}

impl CredentialStore for FileStore {
    fn load_accounts(&self) -> AuthResult<AccountMap> {
        Ok(self.read_json(ACCOUNTS_FILE)?.unwrap_or_default())
    }

    fn save_accounts(&mut self, accounts: &AccountMap) -> AuthResult<()> {
        self.write_json(ACCOUNTS_FILE, accounts)
    }

    fn load_session(&self) -> AuthResult<Option<SessionUser>> {
        self.read_json(SESSION_FILE)
    }

    fn save_session(&mut self, session: &SessionUser) -> AuthResult<()> {
        self.write_json(SESSION_FILE, session)
    }

    fn clear_session(&mut self) -> AuthResult<()> {
        let path = self.dir.join(SESSION_FILE);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    accounts: AccountMap,
    session: Option<SessionUser>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryStore {
    fn load_accounts(&self) -> AuthResult<AccountMap> {
        Ok(self.accounts.clone())
    }

    fn save_accounts(&mut self, accounts: &AccountMap) -> AuthResult<()> {
        self.accounts = accounts.clone();
        Ok(())
    }

    fn load_session(&self) -> AuthResult<Option<SessionUser>> {
        Ok(self.session.clone())
    }

    fn save_session(&mut self, session: &SessionUser) -> AuthResult<()> {
        self.session = Some(session.clone());
        Ok(())
    }

    fn clear_session(&mut self) -> AuthResult<()> {
        self.session = None;
        Ok(())
    }
}
