use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::errors::ProviderError;

/// The provider's representation of an authenticated principal.
#[async_trait]
pub trait Identity: Send + Sync {
    /// Stable subject id.
    fn uid(&self) -> &str;

    fn email(&self) -> Option<&str>;

    fn email_verified(&self) -> bool;

    /// Mint a short-lived bearer token for authorizing backend calls.
    async fn mint_id_token(&self) -> Result<String, ProviderError>;
}

/// Auth-state change pushed by the identity provider.
#[derive(Clone)]
pub enum AuthStateEvent {
    SignedIn(Arc<dyn Identity>),
    SignedOut,
}

impl fmt::Debug for AuthStateEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SignedIn(identity) => f.debug_tuple("SignedIn").field(&identity.uid()).finish(),
            Self::SignedOut => f.write_str("SignedOut"),
        }
    }
}

/// Cancellation handle for an auth-state observer registration.
///
/// The registration is severed exactly once, either by an explicit
/// [`cancel`](Self::cancel) or when the handle is dropped.
pub struct AuthStateSubscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send>>,
}

impl AuthStateSubscription {
    pub fn new(unsubscribe: impl FnOnce() + Send + 'static) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    pub fn cancel(mut self) {
        self.sever();
    }

    fn sever(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Drop for AuthStateSubscription {
    fn drop(&mut self) {
        self.sever();
    }
}

impl fmt::Debug for AuthStateSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthStateSubscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}

/// Capability set of the external identity provider.
///
/// Sign-in, sign-out, token refresh and credential storage all live behind
/// this trait; the crate only observes their effects through the auth-state
/// event stream.
#[async_trait]
pub trait IdentityProvider: Send + Sync + 'static {
    /// Register an observer for auth-state changes. Events are pushed into
    /// `events` in the order the provider emits them; the returned handle
    /// severs delivery when cancelled.
    fn subscribe_auth_state(
        &self,
        events: mpsc::UnboundedSender<AuthStateEvent>,
    ) -> AuthStateSubscription;

    async fn sign_in_with_password(&self, email: &str, password: &str)
    -> Result<(), ProviderError>;

    async fn sign_out(&self) -> Result<(), ProviderError>;

    /// Interactive provider-hosted consent flow (popup). Resolves with the
    /// signed-in identity once the user completes the flow.
    async fn sign_in_with_google(&self) -> Result<Arc<dyn Identity>, ProviderError>;

    /// Result of a previously started full-page redirect flow, if one is
    /// pending. `None` means no redirect flow was in progress.
    async fn redirect_result(&self) -> Result<Option<Arc<dyn Identity>>, ProviderError>;

    async fn send_password_reset_email(&self, email: &str) -> Result<(), ProviderError>;

    /// Update the password of the currently signed-in identity. The provider
    /// may demand a recent re-authentication.
    async fn update_password(&self, new_password: &str) -> Result<(), ProviderError>;

    /// Complete an out-of-band password reset using the code from the reset
    /// email.
    async fn confirm_password_reset(
        &self,
        oob_code: &str,
        new_password: &str,
    ) -> Result<(), ProviderError>;
}
