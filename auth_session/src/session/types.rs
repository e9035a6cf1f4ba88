use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::backend::Profile;
use crate::provider::Identity;

/// Application-visible view of the signed-in principal: identity fields from
/// the provider merged shallowly with optional profile fields from the
/// backend.
#[derive(Clone)]
pub struct SessionUser {
    identity: Arc<dyn Identity>,
    profile: Option<Profile>,
}

impl SessionUser {
    pub(crate) fn new(identity: Arc<dyn Identity>, profile: Option<Profile>) -> Self {
        Self { identity, profile }
    }

    pub fn uid(&self) -> &str {
        self.identity.uid()
    }

    pub fn email(&self) -> Option<&str> {
        self.identity.email()
    }

    pub fn email_verified(&self) -> bool {
        self.identity.email_verified()
    }

    pub fn identity(&self) -> &Arc<dyn Identity> {
        &self.identity
    }

    /// Whether the backend profile fetch succeeded for this session.
    pub fn has_profile(&self) -> bool {
        self.profile.is_some()
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    /// Shallow lookup of a backend profile field.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.profile.as_ref().and_then(|profile| profile.get(name))
    }
}

impl fmt::Debug for SessionUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionUser")
            .field("uid", &self.uid())
            .field("has_profile", &self.has_profile())
            .finish()
    }
}

/// Latest session snapshot plus the initial-resolution flag.
///
/// `is_loading` is true only between synchronizer creation and the first
/// auth-state event; every update is a total replacement of the previous
/// value.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub session: Option<SessionUser>,
    pub is_loading: bool,
}

impl SessionState {
    pub(crate) fn loading() -> Self {
        Self {
            session: None,
            is_loading: true,
        }
    }

    pub(crate) fn resolved(session: Option<SessionUser>) -> Self {
        Self {
            session,
            is_loading: false,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }
}
