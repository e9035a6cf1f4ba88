mod errors;
mod types;

pub use errors::{AuthErrorCode, ProviderError};
pub use types::{AuthStateEvent, AuthStateSubscription, Identity, IdentityProvider};
