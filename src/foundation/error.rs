/// Result type used across patterntext.
pub type PatternResult<T> = Result<T, PatternError>;

/// Errors raised while building or rendering pattern text.
#[derive(thiserror::Error, Debug)]
pub enum PatternError {
    /// A value was built from arguments it cannot hold, such as an empty piece list.
    #[error("construction error: {0}")]
    Construction(String),

    /// Attribute access over several pieces did not agree.
    #[error("broadcast error: {0}")]
    Broadcast(String),

    /// Invalid pattern, piece or design data.
    #[error("validation error: {0}")]
    Validation(String),

    /// No template is registered or on disk under this name.
    #[error("template not found: {name}")]
    TemplateNotFound { name: String },

    /// A template was found but failed to compile or render.
    #[error("template error in '{name}': {message}")]
    TemplateRender { name: String, message: String },

    /// Errors when serializing or deserializing input and context data.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PatternError {
    /// Build a [`PatternError::Construction`] value.
    pub fn construction(msg: impl Into<String>) -> Self {
        Self::Construction(msg.into())
    }

    /// Build a [`PatternError::Broadcast`] value.
    pub fn broadcast(msg: impl Into<String>) -> Self {
        Self::Broadcast(msg.into())
    }

    /// Build a [`PatternError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PatternError::TemplateNotFound`] value.
    pub fn template_not_found(name: impl Into<String>) -> Self {
        Self::TemplateNotFound { name: name.into() }
    }

    /// Build a [`PatternError::TemplateRender`] value.
    pub fn template_render(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TemplateRender {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Build a [`PatternError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for PatternError {
    fn from(err: serde_json::Error) -> Self {
        Self::serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
