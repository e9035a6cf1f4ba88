//! Walks the session synchronizer through a sign-in/sign-out round trip
//! against an in-process identity provider and a canned profile backend.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use auth_session::{
    AuthStateEvent, AuthStateSubscription, BackendError, Identity, IdentityProvider, Profile,
    ProfileBackend, ProviderError, SessionState, SessionSynchronizer,
};

struct DemoIdentity {
    uid: String,
    email: String,
}

#[async_trait]
impl Identity for DemoIdentity {
    fn uid(&self) -> &str {
        &self.uid
    }

    fn email(&self) -> Option<&str> {
        Some(&self.email)
    }

    fn email_verified(&self) -> bool {
        true
    }

    async fn mint_id_token(&self) -> Result<String, ProviderError> {
        Ok(format!("demo-token-{}", self.uid))
    }
}

/// In-process provider: sign-in and sign-out immediately emit the matching
/// auth-state event, the way a real SDK adapter would after its network round
/// trip.
struct DemoProvider {
    events: Mutex<Option<mpsc::UnboundedSender<AuthStateEvent>>>,
}

impl DemoProvider {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            events: Mutex::new(None),
        })
    }

    fn emit(&self, event: AuthStateEvent) {
        if let Some(tx) = self.events.lock().unwrap().as_ref() {
            let _ = tx.send(event);
        }
    }
}

#[async_trait]
impl IdentityProvider for DemoProvider {
    fn subscribe_auth_state(
        &self,
        events: mpsc::UnboundedSender<AuthStateEvent>,
    ) -> AuthStateSubscription {
        *self.events.lock().unwrap() = Some(events);
        AuthStateSubscription::new(|| tracing::info!("Auth-state subscription cancelled"))
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<(), ProviderError> {
        if password != "demo" {
            return Err(ProviderError::from_code(
                "auth/invalid-credential",
                "INVALID_LOGIN_CREDENTIALS",
            ));
        }
        self.emit(AuthStateEvent::SignedIn(Arc::new(DemoIdentity {
            uid: "demo-user".to_string(),
            email: email.to_string(),
        })));
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        self.emit(AuthStateEvent::SignedOut);
        Ok(())
    }

    async fn sign_in_with_google(&self) -> Result<Arc<dyn Identity>, ProviderError> {
        Err(ProviderError::from_code(
            "auth/operation-not-allowed",
            "No interactive flow in the demo",
        ))
    }

    async fn redirect_result(&self) -> Result<Option<Arc<dyn Identity>>, ProviderError> {
        Ok(None)
    }

    async fn send_password_reset_email(&self, email: &str) -> Result<(), ProviderError> {
        tracing::info!("Would send a reset email to {email}");
        Ok(())
    }

    async fn update_password(&self, _new_password: &str) -> Result<(), ProviderError> {
        Ok(())
    }

    async fn confirm_password_reset(
        &self,
        _oob_code: &str,
        _new_password: &str,
    ) -> Result<(), ProviderError> {
        Ok(())
    }
}

/// Canned backend so the demo runs without a server.
struct DemoBackend;

#[async_trait]
impl ProfileBackend for DemoBackend {
    async fn fetch_profile(&self, bearer_token: &str) -> Result<Profile, BackendError> {
        tracing::debug!("Profile fetch authorized by {bearer_token}");
        let profile: Profile =
            serde_json::from_value(serde_json::json!({ "plan": "pro", "display_name": "Demo" }))
                .map_err(|e| BackendError::Serde(e.to_string()))?;
        Ok(profile)
    }

    async fn exchange_id_token(&self, _id_token: &str) -> Result<(), BackendError> {
        Ok(())
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "auth_session=debug,demo_session=debug,info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn describe(state: &SessionState) -> String {
    match (&state.session, state.is_loading) {
        (_, true) => "resolving...".to_string(),
        (Some(user), _) => format!(
            "signed in as {} (plan: {})",
            user.email().unwrap_or("<no email>"),
            user.field("plan").and_then(|v| v.as_str()).unwrap_or("none"),
        ),
        (None, _) => "signed out".to_string(),
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let provider = DemoProvider::new();
    let sync = SessionSynchronizer::start(
        Arc::clone(&provider) as Arc<dyn IdentityProvider>,
        Arc::new(DemoBackend),
    );
    let mut states = sync.watch();

    tracing::info!("Initial state: {}", describe(&sync.current()));

    if let Err(e) = sync.login("demo@example.com", "wrong").await {
        tracing::warn!("Expected login failure: {e}");
    }

    sync.login("demo@example.com", "demo")
        .await
        .expect("Demo credentials are accepted");
    states.changed().await.expect("State update after sign-in");
    tracing::info!("After login: {}", describe(&states.borrow()));

    sync.update_user_password("Abcdef1!")
        .await
        .expect("Password update while signed in");
    tracing::info!("Password updated");

    sync.logout().await.expect("Sign-out is accepted");
    states.changed().await.expect("State update after sign-out");
    tracing::info!("After logout: {}", describe(&states.borrow()));

    sync.close();
}
