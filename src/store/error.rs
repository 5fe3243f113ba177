use thiserror::Error;

/// Structural problems with an untyped action.
#[derive(Debug, Error)]
pub enum InvalidActionError {
    #[error("Action must be an object, got nothing")]
    Missing,

    #[error("Action must be an object, got {found}")]
    NotAnObject { found: &'static str },

    #[error("Action must be an object, got an array")]
    Array,

    #[error("Action must have a type")]
    MissingType,

    /// The `type` is known but the remaining fields don't fit it.
    #[error("Malformed '{kind}' action: {source}")]
    Malformed {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors returned by a dispatch. The store's state is unchanged and no
/// subscriber has run when either is returned.
#[derive(Debug, Error)]
pub enum DispatchError<E: std::error::Error + 'static> {
    #[error(transparent)]
    InvalidAction(#[from] InvalidActionError),

    #[error("Reducer rejected action: {0}")]
    Reducer(#[source] E),
}

impl<E: std::error::Error + 'static> DispatchError<E> {
    pub fn is_invalid_action(&self) -> bool {
        matches!(self, Self::InvalidAction(_))
    }

    /// The reducer's own error, if that is what failed.
    pub fn reducer_error(&self) -> Option<&E> {
        match self {
            Self::Reducer(err) => Some(err),
            Self::InvalidAction(_) => None,
        }
    }
}
