mod digest;
mod errors;
mod session;
mod store;

pub use digest::rolling_digest;
pub use errors::*;
pub use session::SessionManager;
pub use store::{AccountMap, AccountRecord, CredentialStore, FileStore, MemoryStore, SessionUser};
