use serde::Deserialize;
use serde_json::{Map, Value};

/// Application-specific profile fields returned by `GET /auth/profile`.
///
/// Kept as a flat JSON object so fields can be merged shallowly into the
/// session view-model without this crate knowing the backend's schema.
pub type Profile = Map<String, Value>;

/// Error body returned by `POST /auth/token` on rejection.
#[derive(Debug, Deserialize)]
pub(super) struct TokenExchangeRejection {
    pub(super) error: String,
}
