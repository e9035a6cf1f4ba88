//! auth_session - Client-side authentication session synchronization
//!
//! This crate reconciles an external identity provider's asynchronous
//! auth-state events with local application state and an optional backend
//! profile fetch. The provider and the backend are consumed through traits,
//! so the synchronizer can be driven by a real SDK adapter in production and
//! by test doubles in tests.

mod backend;
mod config;
mod password;
mod provider;
mod reset_link;
mod session;

pub use backend::{BackendError, HttpBackend, Profile, ProfileBackend};

pub use provider::{
    AuthErrorCode, AuthStateEvent, AuthStateSubscription, Identity, IdentityProvider,
    ProviderError,
};

pub use session::{
    RedirectOutcome, SessionError, SessionState, SessionSynchronizer, SessionUser,
};

pub use password::{PasswordStrength, password_strength, unmet_requirements};

pub use reset_link::{ResetLinkError, ResetToken, parse_reset_link};

pub use config::AUTH_BACKEND_URL;
