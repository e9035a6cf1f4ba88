mod client;
mod errors;
mod types;

pub use client::{HttpBackend, ProfileBackend};
pub use errors::BackendError;
pub use types::Profile;
