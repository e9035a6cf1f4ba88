//! Test doubles for the identity provider and the profile backend.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::backend::{BackendError, Profile, ProfileBackend};
use crate::provider::{
    AuthStateEvent, AuthStateSubscription, Identity, IdentityProvider, ProviderError,
};

/// Build a flat profile from string pairs.
pub(crate) fn profile(pairs: &[(&str, &str)]) -> Profile {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
        .collect()
}

pub(crate) struct MockIdentity {
    uid: String,
    email: Option<String>,
    verified: bool,
    fail_mint: bool,
}

impl MockIdentity {
    pub(crate) fn signed_in(uid: &str) -> Arc<dyn Identity> {
        Arc::new(Self {
            uid: uid.to_string(),
            email: Some(format!("{uid}@example.com")),
            verified: true,
            fail_mint: false,
        })
    }

    pub(crate) fn with_mint_failure(uid: &str) -> Arc<dyn Identity> {
        Arc::new(Self {
            uid: uid.to_string(),
            email: None,
            verified: false,
            fail_mint: true,
        })
    }
}

#[async_trait]
impl Identity for MockIdentity {
    fn uid(&self) -> &str {
        &self.uid
    }

    fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    fn email_verified(&self) -> bool {
        self.verified
    }

    async fn mint_id_token(&self) -> Result<String, ProviderError> {
        if self.fail_mint {
            return Err(ProviderError::from_code(
                "auth/internal-error",
                "Token mint failed",
            ));
        }
        Ok(format!("token-for-{}", self.uid))
    }
}

/// Provider double. Deliberately keeps its event sender alive after
/// unsubscribe so tests can verify that teardown alone bars state writes.
pub(crate) struct MockProvider {
    events: Mutex<Option<mpsc::UnboundedSender<AuthStateEvent>>>,
    unsubscribes: Arc<AtomicUsize>,
    sign_in_error: Mutex<Option<ProviderError>>,
    sign_out_error: Mutex<Option<ProviderError>>,
    google_error: Mutex<Option<ProviderError>>,
    google_identity: Mutex<Option<Arc<dyn Identity>>>,
    redirect_identity: Mutex<Option<Arc<dyn Identity>>>,
    password_reset_error: Mutex<Option<ProviderError>>,
    update_password_error: Mutex<Option<ProviderError>>,
    confirm_reset_error: Mutex<Option<ProviderError>>,
    password_updates: AtomicUsize,
    reset_confirmations: AtomicUsize,
}

impl MockProvider {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            events: Mutex::new(None),
            unsubscribes: Arc::new(AtomicUsize::new(0)),
            sign_in_error: Mutex::new(None),
            sign_out_error: Mutex::new(None),
            google_error: Mutex::new(None),
            google_identity: Mutex::new(None),
            redirect_identity: Mutex::new(None),
            password_reset_error: Mutex::new(None),
            update_password_error: Mutex::new(None),
            confirm_reset_error: Mutex::new(None),
            password_updates: AtomicUsize::new(0),
            reset_confirmations: AtomicUsize::new(0),
        })
    }

    pub(crate) fn emit(&self, event: AuthStateEvent) {
        if let Some(tx) = self.events.lock().unwrap().as_ref() {
            let _ = tx.send(event);
        }
    }

    pub(crate) fn unsubscribe_count(&self) -> usize {
        self.unsubscribes.load(Ordering::SeqCst)
    }

    pub(crate) fn password_updates(&self) -> usize {
        self.password_updates.load(Ordering::SeqCst)
    }

    pub(crate) fn reset_confirmations(&self) -> usize {
        self.reset_confirmations.load(Ordering::SeqCst)
    }

    pub(crate) fn fail_sign_in(&self, error: ProviderError) {
        *self.sign_in_error.lock().unwrap() = Some(error);
    }

    pub(crate) fn fail_google(&self, error: ProviderError) {
        *self.google_error.lock().unwrap() = Some(error);
    }

    pub(crate) fn set_google_identity(&self, identity: Arc<dyn Identity>) {
        *self.google_identity.lock().unwrap() = Some(identity);
    }

    pub(crate) fn set_redirect_identity(&self, identity: Arc<dyn Identity>) {
        *self.redirect_identity.lock().unwrap() = Some(identity);
    }

    pub(crate) fn fail_password_reset(&self, error: ProviderError) {
        *self.password_reset_error.lock().unwrap() = Some(error);
    }

    pub(crate) fn fail_update_password(&self, error: ProviderError) {
        *self.update_password_error.lock().unwrap() = Some(error);
    }

    pub(crate) fn fail_confirm_reset(&self, error: ProviderError) {
        *self.confirm_reset_error.lock().unwrap() = Some(error);
    }

    fn configured(slot: &Mutex<Option<ProviderError>>) -> Result<(), ProviderError> {
        match slot.lock().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl IdentityProvider for MockProvider {
    fn subscribe_auth_state(
        &self,
        events: mpsc::UnboundedSender<AuthStateEvent>,
    ) -> AuthStateSubscription {
        *self.events.lock().unwrap() = Some(events);
        let unsubscribes = Arc::clone(&self.unsubscribes);
        AuthStateSubscription::new(move || {
            unsubscribes.fetch_add(1, Ordering::SeqCst);
        })
    }

    async fn sign_in_with_password(
        &self,
        _email: &str,
        _password: &str,
    ) -> Result<(), ProviderError> {
        Self::configured(&self.sign_in_error)
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        Self::configured(&self.sign_out_error)
    }

    async fn sign_in_with_google(&self) -> Result<Arc<dyn Identity>, ProviderError> {
        Self::configured(&self.google_error)?;
        self.google_identity
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ProviderError::from_code("auth/internal-error", "No identity staged"))
    }

    async fn redirect_result(&self) -> Result<Option<Arc<dyn Identity>>, ProviderError> {
        Ok(self.redirect_identity.lock().unwrap().take())
    }

    async fn send_password_reset_email(&self, _email: &str) -> Result<(), ProviderError> {
        Self::configured(&self.password_reset_error)
    }

    async fn update_password(&self, _new_password: &str) -> Result<(), ProviderError> {
        Self::configured(&self.update_password_error)?;
        self.password_updates.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn confirm_password_reset(
        &self,
        _oob_code: &str,
        _new_password: &str,
    ) -> Result<(), ProviderError> {
        Self::configured(&self.confirm_reset_error)?;
        self.reset_confirmations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Backend double with configurable results and an optional artificial delay
/// for exercising in-flight fetches.
pub(crate) struct MockBackend {
    profile_result: Mutex<Result<Profile, BackendError>>,
    exchange_error: Mutex<Option<BackendError>>,
    delay: Mutex<Option<Duration>>,
    profile_calls: AtomicUsize,
    exchanged: Mutex<Vec<String>>,
}

impl MockBackend {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            profile_result: Mutex::new(Ok(Profile::new())),
            exchange_error: Mutex::new(None),
            delay: Mutex::new(None),
            profile_calls: AtomicUsize::new(0),
            exchanged: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn set_profile(&self, profile: Profile) {
        *self.profile_result.lock().unwrap() = Ok(profile);
    }

    pub(crate) fn fail_profile(&self, error: BackendError) {
        *self.profile_result.lock().unwrap() = Err(error);
    }

    pub(crate) fn fail_exchange(&self, error: BackendError) {
        *self.exchange_error.lock().unwrap() = Some(error);
    }

    pub(crate) fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub(crate) fn profile_calls(&self) -> usize {
        self.profile_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn exchanged_tokens(&self) -> Vec<String> {
        self.exchanged.lock().unwrap().clone()
    }

    async fn maybe_delay(&self) {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl ProfileBackend for MockBackend {
    async fn fetch_profile(&self, _bearer_token: &str) -> Result<Profile, BackendError> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        self.maybe_delay().await;
        self.profile_result.lock().unwrap().clone()
    }

    async fn exchange_id_token(&self, id_token: &str) -> Result<(), BackendError> {
        self.maybe_delay().await;
        if let Some(error) = self.exchange_error.lock().unwrap().take() {
            return Err(error);
        }
        self.exchanged.lock().unwrap().push(id_token.to_string());
        Ok(())
    }
}
