#![forbid(unsafe_code)]

//! Contract errors.
//!
//! These indicate a bug in the calling code. Capacity queuing and ambient
//! vetoes are not errors; see [`SpawnOutcome`](crate::SpawnOutcome).

/// A misuse of the registration or spawn API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DialogError {
    /// A registration name or spawn reference was empty.
    #[error("dialog name must be a non-empty string")]
    InvalidName,
    /// No delegate is registered under the given name.
    #[error("no dialog delegate registered under \"{0}\"")]
    UnknownDelegate(String),
    /// The delegate's text resolved to an empty string.
    #[error("dialog text must not be empty")]
    EmptyText,
}
