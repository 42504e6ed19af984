use thiserror::Error;

/// Failures of the layer around the simulation: storage, request parsing, resets.
///
/// The simulation itself (decay, actions, classification, sprites) cannot fail.
#[derive(Debug, Error)]
pub enum PetError {
    /// Wrapper around IO errors (data directory, lock files, renames).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapper around serde_json errors while reading or writing the pet record.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Action category outside feed/play/clean/discipline/cure.
    #[error("unknown action: {0}")]
    UnknownAction(String),

    /// Missing or unrecognized subtype refused because strict actions are enabled.
    #[error("unsupported {category} type: {subtype}")]
    RejectedSubtype { category: String, subtype: String },

    /// Reset requested with an empty, over-long or control-character name.
    #[error("invalid pet name: {0:?}")]
    InvalidName(String),
}

impl PetError {
    /// True for errors caused by the request rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PetError::UnknownAction(_) | PetError::RejectedSubtype { .. } | PetError::InvalidName(_)
        )
    }
}
