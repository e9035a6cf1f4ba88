use std::fmt;

use thiserror::Error;

/// Stable error codes reported by the identity provider.
///
/// Codes arrive on the wire as `auth/...` strings. Unrecognized codes are
/// carried through verbatim in [`AuthErrorCode::Other`] so callers can still
/// match on them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthErrorCode {
    InvalidEmail,
    InvalidCredential,
    UserNotFound,
    TooManyRequests,
    RequiresRecentLogin,
    ExpiredActionCode,
    InvalidActionCode,
    Other(String),
}

impl AuthErrorCode {
    pub fn as_str(&self) -> &str {
        match self {
            Self::InvalidEmail => "auth/invalid-email",
            Self::InvalidCredential => "auth/invalid-credential",
            Self::UserNotFound => "auth/user-not-found",
            Self::TooManyRequests => "auth/too-many-requests",
            Self::RequiresRecentLogin => "auth/requires-recent-login",
            Self::ExpiredActionCode => "auth/expired-action-code",
            Self::InvalidActionCode => "auth/invalid-action-code",
            Self::Other(code) => code,
        }
    }

    /// Human-readable message for display. Provider codes are quite
    /// unreadable, so map the common ones to friendlier text; anything
    /// unmapped falls back to a generic message.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidEmail => "Please enter a valid email address.",
            Self::InvalidCredential => "Email or password is incorrect. Please try again.",
            Self::ExpiredActionCode => "Reset link has expired. Please request a new one.",
            Self::InvalidActionCode => {
                "Reset link is invalid or already used. Please request a new one."
            }
            _ => "An unexpected error occurred. Please try again.",
        }
    }
}

impl From<&str> for AuthErrorCode {
    fn from(code: &str) -> Self {
        match code {
            "auth/invalid-email" => Self::InvalidEmail,
            "auth/invalid-credential" => Self::InvalidCredential,
            "auth/user-not-found" => Self::UserNotFound,
            "auth/too-many-requests" => Self::TooManyRequests,
            "auth/requires-recent-login" => Self::RequiresRecentLogin,
            "auth/expired-action-code" => Self::ExpiredActionCode,
            "auth/invalid-action-code" => Self::InvalidActionCode,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for AuthErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure reported by the identity provider, carrying its stable error code
/// and the provider's message.
#[derive(Debug, Error, Clone)]
#[error("{code}: {message}")]
pub struct ProviderError {
    pub code: AuthErrorCode,
    pub message: String,
}

impl ProviderError {
    pub fn new(code: AuthErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Build from a raw `auth/...` code string.
    pub fn from_code(code: &str, message: impl Into<String>) -> Self {
        Self::new(AuthErrorCode::from(code), message)
    }
}
