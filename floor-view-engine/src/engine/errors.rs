use thiserror::Error;

/// Failures raised by the viewer.
///
/// Initialisation failures (`MissingSurface`, `MissingConfig`, `InvalidConfig`)
/// abort the viewer instance. Lookup misses are recoverable and are logged by
/// the caller without interrupting the rest of a status snapshot.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViewerError {
    #[error("required rendering surface is missing: {0}")]
    MissingSurface(&'static str),

    #[error("required configuration is missing: {0}")]
    MissingConfig(&'static str),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("object with id '{0}' not found")]
    ObjectNotFound(String),

    #[error("object with id '{0}' has no recolorable material")]
    NotRecolorable(String),
}

impl ViewerError {
    /// Whether the error aborts viewer construction.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::MissingSurface(_) | Self::MissingConfig(_) | Self::InvalidConfig(_)
        )
    }
}
