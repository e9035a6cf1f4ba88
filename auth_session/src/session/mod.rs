mod errors;
mod synchronizer;
#[cfg(test)]
mod test_utils;
mod types;

pub use errors::SessionError;
pub use synchronizer::{RedirectOutcome, SessionSynchronizer};
pub use types::{SessionState, SessionUser};
