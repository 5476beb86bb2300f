use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Name must be at least 2 characters.")]
    NameTooShort,
    #[error("Invalid email address.")]
    InvalidEmail,
    #[error("Password must be at least 6 characters.")]
    PasswordTooShort,
    #[error("An account with this email already exists.")]
    DuplicateAccount,
    #[error("No account found with this email.")]
    AccountNotFound,
    #[error("Incorrect password.")]
    IncorrectPassword,
    /// The backing storage could not be read or written.
    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),
    /// Stored data exists but does not decode.
    #[error("Corrupt stored data: {0}")]
    Corrupt(#[from] serde_json::Error),
}

impl AuthError {
    /// Whether this is one of the pre-storage validation failures.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::NameTooShort | Self::InvalidEmail | Self::PasswordTooShort
        )
    }
}

pub type AuthResult<T> = Result<T, AuthError>;
