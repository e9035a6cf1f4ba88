//! Parsing of provider-issued password reset links.
//!
//! Reset emails carry action links with query parameters of the form
//! `?mode=resetPassword&oobCode=xxx`. The out-of-band code is what
//! [`SessionSynchronizer::confirm_password_reset`](crate::SessionSynchronizer::confirm_password_reset)
//! needs.

use thiserror::Error;
use url::Url;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResetLinkError {
    #[error("Invalid link: {0}")]
    InvalidUrl(String),

    #[error("No reset token found in link")]
    MissingCode,

    /// The link is a valid action link but not a password reset, e.g. an
    /// email verification link.
    #[error("Not a password reset link")]
    WrongMode,
}

/// Out-of-band confirmation code extracted from a reset link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetToken {
    oob_code: String,
}

impl ResetToken {
    pub fn oob_code(&self) -> &str {
        &self.oob_code
    }
}

pub fn parse_reset_link(link: &str) -> Result<ResetToken, ResetLinkError> {
    let url = Url::parse(link).map_err(|e| ResetLinkError::InvalidUrl(e.to_string()))?;

    let mut mode = None;
    let mut oob_code = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "mode" => mode = Some(value.into_owned()),
            "oobCode" => oob_code = Some(value.into_owned()),
            _ => {}
        }
    }

    // Missing code takes precedence over wrong mode.
    let oob_code = oob_code.ok_or(ResetLinkError::MissingCode)?;
    match mode.as_deref() {
        Some("resetPassword") => Ok(ResetToken { oob_code }),
        _ => Err(ResetLinkError::WrongMode),
    }
}
