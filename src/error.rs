//! Error taxonomy for the recommendation pipeline.
//!
//! Fatal startup failures (missing API key, unreadable store) use plain
//! `anyhow` with context chains and abort before the interactive loop.
//! Everything that can go wrong *per turn* is a [`CurioError`] so the session
//! can tell the recoverable kinds apart and keep looping.

use thiserror::Error;

/// Errors surfaced by one `recommend` invocation.
#[derive(Error, Debug)]
pub enum CurioError {
    /// The mood text was empty or whitespace-only. No provider is called.
    #[error("mood description is empty")]
    InvalidInput,

    /// The reasoning provider could not be reached (network, auth, HTTP error).
    #[error("reasoning provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// The reasoning provider answered, but with nothing usable.
    #[error("reasoning provider returned no usable output: {0}")]
    ProviderRefusal(String),

    /// The embedding model failed on this input.
    #[error("embedding failed: {0}")]
    Embedding(String),

    /// The vector store could not be queried. The store is required for every
    /// turn, so a mid-session query failure maps here too.
    #[error("vector store unavailable: {0}")]
    StoreUnavailable(String),

    /// The store returned zero results for the query.
    #[error("no artwork matched the query")]
    NoMatch,
}

impl CurioError {
    /// One-line message shown to the operator. Nothing below the session
    /// boundary is printed beyond this.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidInput => "Please describe how you are feeling first.",
            Self::ProviderUnavailable(_) | Self::ProviderRefusal(_) => {
                "Sorry, I couldn't reach the curator right now. Please try again."
            }
            Self::Embedding(_) | Self::StoreUnavailable(_) => {
                "Sorry, something went wrong while searching the collection."
            }
            Self::NoMatch => {
                "Sorry, I couldn't find a suitable artwork. Try describing your mood differently."
            }
        }
    }
}
