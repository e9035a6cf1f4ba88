use thiserror::Error;

use crate::backend::BackendError;
use crate::provider::{AuthErrorCode, ProviderError};

#[derive(Debug, Error, Clone)]
pub enum SessionError {
    /// Provider-reported failure; the provider's error code is preserved for
    /// the caller.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("No user is currently signed in")]
    NoUserSignedIn,

    /// Interactive Google sign-in failed somewhere in the flow. Deliberately
    /// carries no detail about which step.
    #[error("Failed to complete Google authentication")]
    GoogleAuthFailed,

    /// The backend refused the redirect-completion token exchange.
    #[error("Token exchange failed: {0}")]
    TokenExchange(#[from] BackendError),

    #[error("Password does not meet requirements: {0}")]
    WeakPassword(String),
}

impl SessionError {
    /// The provider's stable error code, when this error carries one.
    pub fn auth_code(&self) -> Option<&AuthErrorCode> {
        match self {
            Self::Provider(e) => Some(&e.code),
            _ => None,
        }
    }
}
