/// Convenience result type used across Deckwright.
pub type DeckResult<T> = Result<T, DeckError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Only [`DeckError::Input`] and [`DeckError::Persistence`] are expected to
/// reach callers of the high-level generation API; provider and rasterization
/// failures are recovered internally by fallback tiers.
#[derive(thiserror::Error, Debug)]
pub enum DeckError {
    /// Missing or unreadable template/content source, or an empty descriptor
    /// list. Raised before any external calls are made.
    #[error("input error: {0}")]
    Input(String),

    /// A remote image provider timed out, returned a non-success status, or
    /// produced no usable result. Always recovered by the acquisition
    /// pipeline's fallback chain.
    #[error("image provider error: {0}")]
    Provider(String),

    /// Malformed or unexpected content encountered while placing shapes.
    #[error("assembly error: {0}")]
    Assembly(String),

    /// The final save of the deck failed.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DeckError {
    /// Build a [`DeckError::Input`] value.
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    /// Build a [`DeckError::Provider`] value.
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    /// Build a [`DeckError::Assembly`] value.
    pub fn assembly(msg: impl Into<String>) -> Self {
        Self::Assembly(msg.into())
    }

    /// Build a [`DeckError::Persistence`] value.
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
