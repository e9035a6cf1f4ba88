use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{mpsc, watch};

use crate::backend::ProfileBackend;
use crate::password::unmet_requirements;
use crate::provider::{AuthStateEvent, AuthStateSubscription, Identity, IdentityProvider};

use super::errors::SessionError;
use super::types::{SessionState, SessionUser};

/// Outcome of resolving a pending full-page redirect sign-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectOutcome {
    /// No redirect flow was pending.
    NoRedirect,
    /// A redirect flow completed and its id token was exchanged with the
    /// backend.
    Completed,
}

/// Single source of truth for "who is logged in".
///
/// Reconciles push-style auth-state events from the identity provider with a
/// pull-style backend profile fetch, and exposes the session-mutating
/// operations. None of the operations writes session state directly; state
/// only changes when the provider delivers an event.
pub struct SessionSynchronizer {
    provider: Arc<dyn IdentityProvider>,
    backend: Arc<dyn ProfileBackend>,
    state: watch::Receiver<SessionState>,
    shutdown: Arc<AtomicBool>,
    subscription: Mutex<Option<AuthStateSubscription>>,
}

impl SessionSynchronizer {
    /// Subscribe to the provider's auth-state stream and begin reconciling.
    ///
    /// Must be called from within a tokio runtime; events are handled on a
    /// spawned task until the subscription closes or [`close`](Self::close)
    /// is called. Until the first event arrives the state reads as loading
    /// with no session.
    pub fn start(provider: Arc<dyn IdentityProvider>, backend: Arc<dyn ProfileBackend>) -> Self {
        let (state_tx, state_rx) = watch::channel(SessionState::loading());
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let subscription = provider.subscribe_auth_state(event_tx);
        let shutdown = Arc::new(AtomicBool::new(false));

        tokio::spawn(run_event_loop(
            event_rx,
            state_tx,
            Arc::clone(&backend),
            Arc::clone(&shutdown),
        ));

        Self {
            provider,
            backend,
            state: state_rx,
            shutdown,
            subscription: Mutex::new(Some(subscription)),
        }
    }

    /// Latest `(session, loading)` snapshot.
    pub fn current(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn current_user(&self) -> Option<SessionUser> {
        self.state.borrow().session.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    /// Receiver observing every state replacement, for consumers that await
    /// changes rather than poll.
    pub fn watch(&self) -> watch::Receiver<SessionState> {
        self.state.clone()
    }

    /// Tear down: cancel the provider subscription (exactly once) and bar all
    /// further state writes, including from fetches already in flight.
    pub fn close(&self) {
        self.shutdown.store(true, Ordering::Release);
        if let Ok(mut subscription) = self.subscription.lock() {
            if let Some(subscription) = subscription.take() {
                subscription.cancel();
            }
        }
    }

    /// Sign in with email and password. Success here only acknowledges the
    /// request; the session updates when the provider emits the sign-in
    /// event.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), SessionError> {
        self.provider
            .sign_in_with_password(email, password)
            .await
            .map_err(|e| {
                tracing::error!("Login error: {e}");
                SessionError::from(e)
            })
    }

    pub async fn logout(&self) -> Result<(), SessionError> {
        self.provider.sign_out().await.map_err(|e| {
            tracing::error!("Logout error: {e}");
            SessionError::from(e)
        })
    }

    /// Interactive Google sign-in; on completion the resulting id token is
    /// handed to the backend so it can establish its own session. Every
    /// failure in this flow collapses to [`SessionError::GoogleAuthFailed`]
    /// so provider internals are not leaked to the caller.
    pub async fn google_auth(&self) -> Result<(), SessionError> {
        let identity = self.provider.sign_in_with_google().await.map_err(|e| {
            tracing::error!("Google auth error: {e}");
            SessionError::GoogleAuthFailed
        })?;

        let id_token = identity.mint_id_token().await.map_err(|e| {
            tracing::error!("Google auth token mint error: {e}");
            SessionError::GoogleAuthFailed
        })?;

        self.backend.exchange_id_token(&id_token).await.map_err(|e| {
            tracing::error!("Google auth token exchange error: {e}");
            SessionError::GoogleAuthFailed
        })
    }

    /// Resolve the result of a full-page redirect sign-in, if one is pending.
    ///
    /// Unlike [`google_auth`](Self::google_auth), a backend rejection here
    /// surfaces the backend's error message so the caller can display it.
    pub async fn complete_redirect_sign_in(&self) -> Result<RedirectOutcome, SessionError> {
        let pending = self.provider.redirect_result().await.map_err(|e| {
            tracing::error!("Auth callback error: {e}");
            SessionError::GoogleAuthFailed
        })?;

        let Some(identity) = pending else {
            return Ok(RedirectOutcome::NoRedirect);
        };

        let id_token = identity.mint_id_token().await.map_err(|e| {
            tracing::error!("Auth callback token mint error: {e}");
            SessionError::GoogleAuthFailed
        })?;

        self.backend.exchange_id_token(&id_token).await?;
        Ok(RedirectOutcome::Completed)
    }

    /// Ask the provider to send an out-of-band password reset email.
    pub async fn request_password_reset(&self, email: &str) -> Result<(), SessionError> {
        self.provider
            .send_password_reset_email(email)
            .await
            .map_err(|e| {
                tracing::error!("Password reset request error: {e}");
                SessionError::from(e)
            })
    }

    /// Update the password of the currently signed-in user.
    ///
    /// Errors with [`SessionError::NoUserSignedIn`] when the session is
    /// absent, leaving state untouched. The provider may still fail with
    /// `auth/requires-recent-login`.
    pub async fn update_user_password(&self, new_password: &str) -> Result<(), SessionError> {
        if self.state.borrow().session.is_none() {
            return Err(SessionError::NoUserSignedIn);
        }

        self.provider.update_password(new_password).await.map_err(|e| {
            tracing::error!("Password update error: {e}");
            SessionError::from(e)
        })
    }

    /// Complete an email-delivered password reset. The new password is
    /// checked against the local requirements before the provider is
    /// involved; the provider may fail with `auth/expired-action-code` or
    /// `auth/invalid-action-code`.
    pub async fn confirm_password_reset(
        &self,
        oob_code: &str,
        new_password: &str,
    ) -> Result<(), SessionError> {
        let unmet = unmet_requirements(new_password);
        if !unmet.is_empty() {
            return Err(SessionError::WeakPassword(unmet.join(", ")));
        }

        self.provider
            .confirm_password_reset(oob_code, new_password)
            .await
            .map_err(|e| {
                tracing::error!("Password reset confirmation error: {e}");
                SessionError::from(e)
            })
    }
}

impl Drop for SessionSynchronizer {
    fn drop(&mut self) {
        self.close();
    }
}

/// Single writer of the session state.
///
/// Events are handled strictly in arrival order on this one task; pending
/// events are coalesced to the newest before the profile fetch, so a slow
/// fetch for a stale event can never overwrite the state a newer event
/// produced. The shutdown flag is rechecked after every await: once teardown
/// starts, no write may happen even if the provider keeps delivering.
async fn run_event_loop(
    mut events: mpsc::UnboundedReceiver<AuthStateEvent>,
    state: watch::Sender<SessionState>,
    backend: Arc<dyn ProfileBackend>,
    shutdown: Arc<AtomicBool>,
) {
    while let Some(mut event) = events.recv().await {
        while let Ok(newer) = events.try_recv() {
            event = newer;
        }

        let session = match event {
            AuthStateEvent::SignedOut => None,
            AuthStateEvent::SignedIn(identity) => {
                tracing::debug!("Auth-state event: signed in as {}", identity.uid());
                Some(resolve_user(backend.as_ref(), identity).await)
            }
        };

        if shutdown.load(Ordering::Acquire) {
            return;
        }
        if state.send(SessionState::resolved(session)).is_err() {
            return;
        }
    }
}

/// Combine the provider identity with the backend profile. Token mint or
/// profile fetch failures degrade to an identity-only session; authentication
/// success is never blocked by a backend outage.
async fn resolve_user(backend: &dyn ProfileBackend, identity: Arc<dyn Identity>) -> SessionUser {
    let token = match identity.mint_id_token().await {
        Ok(token) => token,
        Err(e) => {
            tracing::warn!("Token mint failed, degrading to identity-only session: {e}");
            return SessionUser::new(identity, None);
        }
    };

    match backend.fetch_profile(&token).await {
        Ok(profile) => SessionUser::new(identity, Some(profile)),
        Err(e) => {
            tracing::warn!("Profile fetch failed, degrading to identity-only session: {e}");
            SessionUser::new(identity, None)
        }
    }
}
